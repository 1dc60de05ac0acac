//! Shader + parameter bundle with a single atomic bind.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::gfx::{ShaderProgram, ShaderProgramExt, ShaderRef, Texture, TextureRef, UniformValue};

use super::parameter::{ParameterStore, TextureSlot};

/// A shader program together with the parameter state it renders with.
///
/// `bind()` is the single contract: bind the shader, bind every texture slot
/// to its unit (setting the matching integer sampler uniform), then upload
/// every stored parameter by dispatching on its type tag.
pub struct RenderMaterial {
    name: String,
    shader: ShaderRef,
    store: ParameterStore,
}

impl RenderMaterial {
    pub fn new(shader: ShaderRef, name: impl Into<String>) -> Self {
        let name = name.into();
        if !shader.is_valid() {
            log::warn!("RenderMaterial '{name}' created with an invalid shader");
        }
        Self {
            name,
            shader,
            store: ParameterStore::new(),
        }
    }

    /// Bind shader, textures and parameters. A guarded no-op when the shader
    /// program is invalid.
    pub fn bind(&self) {
        if !self.shader.is_valid() {
            log::error!("RenderMaterial::bind called with invalid shader: {}", self.name);
            return;
        }

        self.shader.bind();
        self.bind_textures();
        self.upload_parameters();
    }

    fn bind_textures(&self) {
        for slot in self.store.texture_slots() {
            slot.texture.bind(slot.unit);
            self.shader.set_i32(&slot.uniform_name, slot.unit as i32);
        }
    }

    fn upload_parameters(&self) {
        for (name, value) in self.store.iter() {
            self.shader.set_uniform(name, value);
        }
    }

    // =========================================================================
    // Parameter setters
    // =========================================================================

    pub fn set_f32(&mut self, name: &str, value: f32) {
        self.store.set(name, value);
    }

    pub fn set_i32(&mut self, name: &str, value: i32) {
        self.store.set(name, value);
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.store.set(name, value);
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.store.set(name, value);
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.store.set(name, value);
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.store.set(name, value);
    }

    pub fn set_mat3(&mut self, name: &str, value: Mat3) {
        self.store.set(name, value);
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.store.set(name, value);
    }

    pub fn set_texture(&mut self, name: &str, texture: Option<TextureRef>, unit: u32, is_cubemap: bool) {
        self.store.set_texture(name, texture, unit, is_cubemap);
    }

    // =========================================================================
    // Parameter queries
    // =========================================================================

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<UniformValue> {
        self.store.get(name)
    }

    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    #[must_use]
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.store.get(name) {
            Some(UniformValue::Float(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        match self.store.get(name) {
            Some(UniformValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.store.get(name) {
            Some(UniformValue::Bool(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        match self.store.get(name) {
            Some(UniformValue::Vec3(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_vec4(&self, name: &str) -> Option<Vec4> {
        match self.store.get(name) {
            Some(UniformValue::Vec4(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        match self.store.get(name) {
            Some(UniformValue::Mat4(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn texture_slot(&self, name: &str) -> Option<&TextureSlot> {
        self.store.texture_slot(name)
    }

    #[must_use]
    pub fn texture_slot_count(&self) -> usize {
        self.store.texture_slot_count()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shader(&self) -> &ShaderRef {
        &self.shader
    }

    pub fn set_shader(&mut self, shader: ShaderRef) {
        self.shader = shader;
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shader.is_valid()
    }
}
