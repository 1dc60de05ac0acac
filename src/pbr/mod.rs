//! Physically-based shading math: sampling kernels and tone operators.

pub mod sampling;
pub mod tonemap;

pub use tonemap::ToneMappingMode;
