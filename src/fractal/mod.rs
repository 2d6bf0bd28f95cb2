pub mod tricomplex;
pub mod types;
pub mod field;

pub use tricomplex::{unit_from_cli_name, Tricomplex, BASIS_LABELS};
pub use types::{AxisEmbedding, HitRefinement, RenderParameters, SetFamily};
pub use field::{density, embed, is_inside};
