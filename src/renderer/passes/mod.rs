//! Fixed pipeline passes shared across render paths.

pub mod bloom;
pub mod post_process;
pub mod shadow;

pub use bloom::Bloom;
pub use post_process::PostProcessPipeline;
pub use shadow::{ShadowPass, SHADOW_MAP_RESOLUTION};
