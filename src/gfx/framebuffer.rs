//! Framebuffer abstraction.

use std::sync::Arc;

use super::state::CubeFace;
use super::texture::TextureRef;

/// An externally allocated framebuffer object.
///
/// Attachment methods take `&self`: a framebuffer is a handle to driver
/// state, and implementations use interior mutability the same way a raw
/// GL object name would.
pub trait Framebuffer {
    /// Bind as the active render target.
    fn bind(&self);

    /// Restore the default (screen) framebuffer.
    fn unbind(&self);

    fn attach_color(&self, texture: TextureRef, slot: u32);

    fn attach_depth(&self, texture: TextureRef);

    fn attach_depth_stencil(&self, texture: TextureRef);

    /// Attach one cubemap face at the given mip level to color slot 0.
    /// Used by the environment precompute to render each capture face.
    fn attach_cubemap_face(&self, texture: &TextureRef, face: CubeFace, mip: u32);

    /// Completeness check. Every component validates completeness before
    /// first use and treats an incomplete target as a creation failure.
    fn is_complete(&self) -> bool;

    fn width(&self) -> u32;

    fn height(&self) -> u32;
}

/// Shared framebuffer handle.
pub type FramebufferRef = Arc<dyn Framebuffer>;
