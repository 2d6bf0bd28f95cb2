pub mod vec3;
pub mod camera;

pub use vec3::Vec3;
pub use camera::{navigation, Camera, CameraSnapshot};
