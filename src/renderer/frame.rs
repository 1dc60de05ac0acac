//! Shared data structures for the multi-pass pipeline.

use glam::{Mat4, Vec3};
use parking_lot::RwLock;

use crate::gfx::{FramebufferRef, GraphicsDevice, TextureRef};
use crate::material::PbrMaterial;
use crate::scene::{DirectionalLight, PointLight, RenderCamera, SceneObject};

use super::ibl::IblMaps;

/// Output of the shadow mapping pass. Produced once per frame; consumed
/// read-only by the active render path and the outline pass.
#[derive(Clone, Default)]
pub struct ShadowData {
    pub shadow_map: Option<TextureRef>,
    pub light_space_matrix: Mat4,
    /// Callers must check this before binding the shadow texture.
    pub valid: bool,
}

/// The frame packet: everything a render path needs to execute its main
/// pass. Built by the orchestrator and handed to the active path; borrowed
/// references are valid exactly for the duration of one `execute` call.
pub struct RenderPassData<'a> {
    pub scene: &'a [SceneObject],
    pub camera: &'a RenderCamera,
    pub device: &'a mut dyn GraphicsDevice,

    pub shadow: ShadowData,

    /// Target framebuffer for HDR output.
    pub target: FramebufferRef,

    /// The shared scene material the path shades every object through.
    pub material: &'a RwLock<PbrMaterial>,

    // IBL resources — all three maps or none, never a partial triple.
    pub ibl: Option<&'a IblMaps>,
    pub use_ibl: bool,
    pub ibl_intensity: f32,

    // Light data
    pub dir_light: Option<&'a DirectionalLight>,
    pub point_lights: &'a [PointLight],

    // Lower hemisphere fallback
    pub lower_hemisphere_color: Vec3,
    pub lower_hemisphere_intensity: f32,

    pub clear_color: [f32; 4],
}
