//! Coupes 3D de fractales tricomplexes rendues par ray marching.
//!
//! Le noyau est pur : une `CameraSnapshot` et des `RenderParameters`
//! immuables entrent, un tampon RGBA sort. L'interface (fenêtre, souris,
//! widgets) reste à l'extérieur ; la CLI `tricomplex-cli` en est un exemple.

pub mod error;
pub mod fractal;
pub mod geometry;
pub mod color;
pub mod render;
pub mod io;

pub use error::FractalError;
pub use fractal::{AxisEmbedding, HitRefinement, RenderParameters, SetFamily, Tricomplex};
pub use geometry::{Camera, CameraSnapshot, Vec3};
pub use render::{render, render_parallel, CancelToken, NeverCancel, RenderMessage, RenderSession};
