pub mod shading;

pub use shading::{shade, BACKGROUND, LIGHT_DIRECTION, UNWRITTEN};
