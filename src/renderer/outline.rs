//! Stencil-based selection outline.
//!
//! Two passes over the selected object only: pass 1 writes its silhouette
//! into the stencil buffer while shading it normally, pass 2 re-draws the
//! mesh scaled up where the stencil does not match, producing a fringe in a
//! flat outline color.

use glam::{Mat3, Mat4, Vec3, Vec4};
use parking_lot::RwLock;

use crate::gfx::{CompareFunc, GraphicsDevice, ShaderProgram, ShaderProgramExt, ShaderRef, StencilOp};
use crate::material::PbrMaterial;
use crate::scene::{RenderCamera, SceneObject};

/// Lower bound of the outline scale factor.
pub const MIN_OUTLINE_SCALE: f32 = 1.01;

/// Upper bound of the outline scale factor.
pub const MAX_OUTLINE_SCALE: f32 = 1.3;

/// Outline configuration owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct OutlineSettings {
    pub enabled: bool,
    pub color: Vec4,
    /// Mesh scale of the second pass, clamped to
    /// [`MIN_OUTLINE_SCALE`, `MAX_OUTLINE_SCALE`].
    pub scale: f32,
    /// Index of the selected object; `None` disables the pass.
    pub selected: Option<usize>,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Vec4::new(1.0, 0.6, 0.0, 1.0),
            scale: 1.05,
            selected: None,
        }
    }
}

/// Render the outline for the selected object. No-op when outlines are
/// disabled, the shader is invalid or the selection is out of range;
/// depth/stencil state is fully restored before returning.
pub fn render(
    scene: &[SceneObject],
    camera: &RenderCamera,
    device: &mut dyn GraphicsDevice,
    material: &RwLock<PbrMaterial>,
    outline_shader: &ShaderRef,
    settings: &OutlineSettings,
) {
    if !settings.enabled || !outline_shader.is_valid() {
        return;
    }
    let Some(obj) = settings.selected.and_then(|i| scene.get(i)) else {
        return;
    };
    let Some(mesh) = obj.mesh.as_ref().filter(|_| obj.active) else {
        return;
    };

    // =========================================================================
    // Pass 1: fill the stencil buffer with the object's silhouette
    // =========================================================================
    device.clear_stencil();
    device.enable_stencil_test();
    device.set_stencil_func(CompareFunc::Always, 1, 0xFF);
    device.set_stencil_op(StencilOp::Keep, StencilOp::Keep, StencilOp::Replace);
    device.set_stencil_mask(0xFF);
    device.set_depth_func(CompareFunc::LessEqual);

    let model = obj.transform.model_matrix();
    {
        let mut material = material.write();

        material.set_albedo(obj.color.truncate());
        material.set_alpha(obj.color.w);
        material.set_metallic(obj.metallic);
        material.set_roughness(obj.roughness);
        material.set_ao(1.0);
        material.set_albedo_texture(obj.albedo_texture.clone());

        material.bind();

        let shader = material.shader();
        shader.set_mat4("u_View", camera.view_matrix);
        shader.set_mat4("u_Projection", camera.projection_matrix);
        shader.set_mat4("u_Model", model);
        shader.set_mat3("u_NormalMatrix", Mat3::from_mat4(model).inverse().transpose());
    }
    device.draw_mesh(mesh.as_ref());

    device.set_depth_func(CompareFunc::Less);

    // =========================================================================
    // Pass 2: scaled-up re-draw where stencil != 1
    // =========================================================================
    device.set_stencil_func(CompareFunc::NotEqual, 1, 0xFF);
    device.set_stencil_mask(0x00);
    device.set_depth_mask(false);

    let scale = settings.scale.clamp(MIN_OUTLINE_SCALE, MAX_OUTLINE_SCALE);
    let scaled_model = model * Mat4::from_scale(Vec3::splat(scale));

    outline_shader.bind();
    outline_shader.set_mat4("u_View", camera.view_matrix);
    outline_shader.set_mat4("u_Projection", camera.projection_matrix);
    outline_shader.set_vec4("u_OutlineColor", settings.color);
    outline_shader.set_mat4("u_Model", scaled_model);

    device.draw_mesh(mesh.as_ref());

    // Restore state
    device.set_depth_mask(true);
    device.set_stencil_mask(0xFF);
    device.disable_stencil_test();
}
