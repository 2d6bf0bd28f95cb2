pub mod cancel;
pub mod raymarch;
pub mod session;

pub use cancel::{CancelToken, NeverCancel};
pub use raymarch::{estimate_normal, march, render, render_parallel, trace_ray, FOV_DEGREES, MAX_RAY_DISTANCE};
pub use session::{RenderMessage, RenderSession};
