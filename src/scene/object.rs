//! Renderable scene objects.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::gfx::{GraphicsDevice, MeshRef, TextureRef};

use super::camera::RenderCamera;

/// Position, rotation and scale of one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Everything the pipeline reads to draw one object.
///
/// Objects are owned by the application's scene layer; the pipeline receives
/// them as a slice valid for the duration of one `render` call.
#[derive(Clone)]
pub struct SceneObject {
    pub name: String,
    /// Shared — many objects can use the same mesh. `None` skips the object.
    pub mesh: Option<MeshRef>,
    pub transform: Transform,
    /// RGBA tint / albedo. Alpha below 1.0 marks the object transparent.
    pub color: Vec4,
    pub metallic: f32,
    pub roughness: f32,
    /// Optional albedo texture, multiplied by `color`.
    pub albedo_texture: Option<TextureRef>,
    pub active: bool,
}

impl SceneObject {
    #[must_use]
    pub fn new(mesh: MeshRef) -> Self {
        Self {
            name: "Object".to_owned(),
            mesh: Some(mesh),
            transform: Transform::default(),
            color: Vec4::ONE,
            metallic: 0.0,
            roughness: 0.5,
            albedo_texture: None,
            active: true,
        }
    }

    /// Whether the object is drawn in the sorted, blended transparent set.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.color.w < 1.0
    }

    /// Whether the object participates in rendering at all.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.active && self.mesh.is_some()
    }
}

/// Application-owned skybox, rendered into the HDR target after the main
/// pass. Shared with the renderer for at most the application's lifetime.
pub trait Skybox {
    fn render(&self, camera: &RenderCamera, device: &mut dyn GraphicsDevice);
}
