//! Texture abstraction.

use std::sync::Arc;

/// Dimensionality of a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Regular 2D texture.
    D2,
    /// Six-faced cubemap.
    Cubemap,
    /// 3D texture (color grading LUT).
    D3,
}

/// An externally allocated texture object.
pub trait Texture {
    /// Bind to the given texture unit (0-15 by the pipeline's convention,
    /// see [`crate::material::units`]).
    fn bind(&self, unit: u32);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn kind(&self) -> TextureKind;

    /// Regenerate the full mip chain from level 0. Optional capability;
    /// the default is a no-op for backends without mip generation.
    fn generate_mipmaps(&self) {}

    fn is_cubemap(&self) -> bool {
        self.kind() == TextureKind::Cubemap
    }
}

/// Shared texture handle. GPU resources that cross component boundaries are
/// reference counted so a consumer never outlives its dependency.
pub type TextureRef = Arc<dyn Texture>;
