//! Graphics device abstraction.
//!
//! A [`GraphicsDevice`] is the single mutable, globally shared resource of
//! the pipeline: the bound framebuffer, viewport, depth/stencil/blend modes
//! all live behind it. Ordering is enforced purely by call sequence — each
//! pass binds its target, issues draws, and restores any state it changed
//! before returning control.
//!
//! The trait doubles as the resource factory. Factories return `Option`:
//! allocation failure is a degraded state the caller handles, never a panic.

use super::framebuffer::FramebufferRef;
use super::state::{BlendFactor, CompareFunc, CullFace, StencilOp, TextureDesc, TextureFormat};
use super::texture::TextureRef;

/// Geometry the device can draw. The pipeline never inspects vertex data;
/// meshes are bound and drawn as opaque collaborator objects.
pub trait Mesh {
    /// Bind vertex/index state for drawing.
    fn bind(&self);

    /// Number of indices submitted per draw.
    fn index_count(&self) -> u32;
}

/// Shared mesh handle.
pub type MeshRef = std::sync::Arc<dyn Mesh>;

/// Synchronous command submission + resource creation.
pub trait GraphicsDevice {
    // =========================================================================
    // Clearing
    // =========================================================================

    /// Clear color, depth and stencil of the bound target.
    fn clear(&mut self, color: [f32; 4]);

    /// Clear only the depth buffer.
    fn clear_depth(&mut self);

    /// Clear only the stencil buffer.
    fn clear_stencil(&mut self);

    // =========================================================================
    // Viewport
    // =========================================================================

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn viewport(&self) -> (i32, i32, u32, u32);

    /// Save the current viewport on an internal stack.
    fn push_viewport(&mut self);

    /// Restore the most recently pushed viewport. Underflow is a logged
    /// no-op on the implementation side.
    fn pop_viewport(&mut self);

    // =========================================================================
    // Depth testing
    // =========================================================================

    fn enable_depth_test(&mut self);

    fn disable_depth_test(&mut self);

    fn depth_test_enabled(&self) -> bool;

    fn set_depth_func(&mut self, func: CompareFunc);

    fn set_depth_mask(&mut self, write: bool);

    // =========================================================================
    // Stencil testing
    // =========================================================================

    fn enable_stencil_test(&mut self);

    fn disable_stencil_test(&mut self);

    fn set_stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32);

    fn set_stencil_op(&mut self, stencil_fail: StencilOp, depth_fail: StencilOp, depth_pass: StencilOp);

    fn set_stencil_mask(&mut self, mask: u32);

    // =========================================================================
    // Blending
    // =========================================================================

    fn enable_blending(&mut self);

    fn disable_blending(&mut self);

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor);

    // =========================================================================
    // Face culling
    // =========================================================================

    fn enable_face_culling(&mut self);

    fn disable_face_culling(&mut self);

    fn set_cull_face(&mut self, face: CullFace);

    // =========================================================================
    // Polygon offset (shadow acne suppression)
    // =========================================================================

    fn enable_polygon_offset(&mut self, factor: f32, units: f32);

    fn disable_polygon_offset(&mut self);

    // =========================================================================
    // Draw submission
    // =========================================================================

    /// Bind and draw an indexed mesh with the currently bound shader.
    fn draw_mesh(&mut self, mesh: &dyn Mesh);

    /// Draw a fullscreen quad (post-process and LUT passes).
    fn draw_fullscreen_quad(&mut self);

    /// Draw a unit cube (cubemap capture and skybox passes).
    fn draw_unit_cube(&mut self);

    // =========================================================================
    // Resource factories
    // =========================================================================

    fn create_texture_2d(&mut self, desc: &TextureDesc) -> Option<TextureRef>;

    /// Create a 2D texture initialized from raw texel bytes laid out
    /// row-major in `desc.format`.
    fn create_texture_2d_with_data(&mut self, desc: &TextureDesc, data: &[u8]) -> Option<TextureRef>;

    /// Create a square cubemap with `mip_levels` allocated levels per face.
    fn create_cubemap(&mut self, resolution: u32, format: TextureFormat, mip_levels: u32) -> Option<TextureRef>;

    /// Create a cubic 3D texture initialized from raw texel bytes
    /// (color grading LUTs).
    fn create_texture_3d_with_data(&mut self, size: u32, format: TextureFormat, data: &[u8]) -> Option<TextureRef>;

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Option<FramebufferRef>;
}
