//! Forward rendering: every object fully shaded in a single pass.

use glam::Mat3;

use crate::gfx::{BlendFactor, Framebuffer, ShaderProgram, ShaderProgramExt};
use crate::renderer::frame::RenderPassData;
use crate::renderer::ibl::MAX_REFLECTION_LOD;
use crate::scene::{SceneObject, MAX_POINT_LIGHTS};

use super::{RenderPath, RenderPathType};

/// Traditional forward path. Simple and correct, but scales with
/// lights × objects; Forward+ exists for the many-light case.
pub struct ForwardRenderPath {
    valid: bool,
}

impl ForwardRenderPath {
    #[must_use]
    pub fn new() -> Self {
        Self { valid: false }
    }

    /// Upload per-frame lighting state: camera, point and directional
    /// lights, shadow matrix + map, IBL maps + intensity, lower hemisphere.
    fn setup_lighting(data: &mut RenderPassData<'_>) {
        let mut material = data.material.write();
        let shader = material.shader().clone();
        shader.bind();

        // Camera matrices go directly on the shader, not through the
        // material parameter map
        shader.set_mat4("u_View", data.camera.view_matrix);
        shader.set_mat4("u_Projection", data.camera.projection_matrix);
        shader.set_vec3("u_ViewPos", data.camera.position);

        // Point lights
        let light_count = data.point_lights.len().min(MAX_POINT_LIGHTS);
        if data.point_lights.len() > MAX_POINT_LIGHTS {
            log::debug!(
                "point light count {} exceeds limit {MAX_POINT_LIGHTS}, truncating",
                data.point_lights.len()
            );
        }
        shader.set_i32("u_LightCount", light_count as i32);
        for (i, light) in data.point_lights.iter().take(light_count).enumerate() {
            shader.set_vec3(&format!("u_LightPositions[{i}]"), light.position);
            shader.set_vec3(&format!("u_LightColors[{i}]"), light.diffuse);
        }

        // Directional light
        if let Some(dir_light) = data.dir_light {
            shader.set_bool("u_UseDirLight", true);
            shader.set_vec3("u_DirLightDirection", dir_light.normalized_direction());
            shader.set_vec3("u_DirLightColor", dir_light.diffuse);
        } else {
            shader.set_bool("u_UseDirLight", false);
        }

        // Shadow mapping: matrix directly on the shader, texture via the
        // material slot table
        let shadow_usable = data.shadow.valid && data.shadow.shadow_map.is_some();
        material.set_use_shadows(shadow_usable);
        if shadow_usable {
            shader.set_mat4("u_LightSpaceMatrix", data.shadow.light_space_matrix);
            if let Some(map) = &data.shadow.shadow_map {
                material.set_shadow_map(map.clone());
            }
        }

        // IBL: textures via material slots, scalars directly on the shader.
        // `data.ibl` is all-three-or-none by construction.
        let ibl_active = data.use_ibl && data.ibl.is_some();
        material.set_use_ibl(ibl_active);
        if let Some(ibl) = data.ibl.filter(|_| ibl_active) {
            material.set_irradiance_map(ibl.irradiance.clone());
            material.set_prefiltered_map(ibl.prefiltered.clone());
            material.set_brdf_lut(ibl.brdf_lut.clone());
            shader.set_f32("u_MaxReflectionLOD", MAX_REFLECTION_LOD);
            shader.set_f32("u_IBLIntensity", data.ibl_intensity);
        } else {
            shader.set_f32("u_IBLIntensity", 0.0);
        }

        // Lower hemisphere fallback
        material.set_lower_hemisphere_color(data.lower_hemisphere_color);
        material.set_lower_hemisphere_intensity(data.lower_hemisphere_intensity);
    }

    /// Draw all renderable objects: opaque in scene order, then transparent
    /// back-to-front with blending enabled and depth writes off.
    ///
    /// Transparents with equal camera distance keep their original scene
    /// order (sort key: distance descending, then scene index ascending).
    fn render_scene_objects(data: &mut RenderPassData<'_>) {
        let scene = data.scene;
        let mut opaque: Vec<usize> = Vec::new();
        let mut transparent: Vec<(usize, f32)> = Vec::new();

        let cam_pos = data.camera.position;
        for (i, obj) in scene.iter().enumerate() {
            if !obj.is_renderable() {
                continue;
            }
            if obj.is_transparent() {
                let distance = (obj.transform.translation - cam_pos).length();
                transparent.push((i, distance));
            } else {
                opaque.push(i);
            }
        }

        for idx in opaque {
            Self::render_single_object(&scene[idx], data);
        }

        if !transparent.is_empty() {
            transparent.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

            data.device.enable_blending();
            data.device
                .set_blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
            data.device.set_depth_mask(false);

            for (idx, _) in transparent {
                Self::render_single_object(&scene[idx], data);
            }

            data.device.set_depth_mask(true);
            data.device.disable_blending();
        }
    }

    fn render_single_object(obj: &SceneObject, data: &mut RenderPassData<'_>) {
        let Some(mesh) = &obj.mesh else {
            return;
        };

        {
            let mut material = data.material.write();

            material.set_albedo(obj.color.truncate());
            material.set_alpha(obj.color.w);
            material.set_metallic(obj.metallic);
            material.set_roughness(obj.roughness);
            material.set_ao(1.0);
            material.set_albedo_texture(obj.albedo_texture.clone());

            // Bind material: shader + textures + PBR uniform upload
            material.bind();

            // Per-object matrices directly on the shader, after bind
            let shader = material.shader();
            let model = obj.transform.model_matrix();
            let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
            shader.set_mat4("u_Model", model);
            shader.set_mat3("u_NormalMatrix", normal_matrix);
        }

        data.device.draw_mesh(mesh.as_ref());
    }
}

impl Default for ForwardRenderPath {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPath for ForwardRenderPath {
    fn on_attach(&mut self, _width: u32, _height: u32) {
        self.valid = true;
        log::info!("ForwardRenderPath attached");
    }

    fn on_detach(&mut self) {
        self.valid = false;
        log::info!("ForwardRenderPath detached");
    }

    fn execute(&mut self, data: &mut RenderPassData<'_>) {
        if !self.valid {
            return;
        }

        data.target.bind();
        data.device.clear(data.clear_color);

        Self::setup_lighting(data);
        Self::render_scene_objects(data);
    }

    fn needs_depth_prepass(&self) -> bool {
        false
    }

    fn on_resize(&mut self, _width: u32, _height: u32) {
        // No path-specific framebuffers to resize
    }

    fn name(&self) -> &'static str {
        "Forward"
    }

    fn path_type(&self) -> RenderPathType {
        RenderPathType::Forward
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}
