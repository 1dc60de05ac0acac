//! Metallic-roughness PBR material.

use bitflags::bitflags;
use glam::{Mat3, Mat4, Vec3};

use crate::gfx::{ShaderRef, TextureRef};
use crate::material::units;

use super::render_material::RenderMaterial;

bitflags! {
    /// Which optional texture maps are currently bound. Each flag mirrors a
    /// `u_Use*` boolean in the parameter store.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MapFlags: u32 {
        const ALBEDO             = 1 << 0;
        const NORMAL             = 1 << 1;
        const METALLIC_ROUGHNESS = 1 << 2;
        const AO                 = 1 << 3;
        const EMISSIVE           = 1 << 4;
    }
}

/// Roughness floor keeping the microfacet distribution non-singular.
pub const MIN_ROUGHNESS: f32 = 0.05;

/// Material for the default lit shader: metallic-roughness parameters,
/// optional texture maps with paired use-flags, IBL and shadow inputs.
///
/// Wraps a [`RenderMaterial`]; every setter writes through to the parameter
/// store so a single `bind()` uploads a consistent snapshot.
pub struct PbrMaterial {
    material: RenderMaterial,

    // Cached values for the convenience getters
    albedo: Vec3,
    metallic: f32,
    roughness: f32,
    ao: f32,
    alpha: f32,
    maps: MapFlags,
    use_ibl: bool,
    use_shadows: bool,
}

impl PbrMaterial {
    pub fn new(shader: ShaderRef, name: impl Into<String>) -> Self {
        let mut material = RenderMaterial::new(shader, name);

        // Default PBR state, uploaded on the first bind
        material.set_vec3("u_Albedo", Vec3::ONE);
        material.set_f32("u_Metallic", 0.0);
        material.set_f32("u_Roughness", 0.5);
        material.set_f32("u_AO", 1.0);
        material.set_f32("u_Alpha", 1.0);
        material.set_bool("u_UseAlbedoTexture", false);
        material.set_bool("u_UseNormalMap", false);
        material.set_bool("u_UseMetallicRoughnessTexture", false);
        material.set_bool("u_UseAOTexture", false);
        material.set_bool("u_UseEmissiveTexture", false);
        material.set_bool("u_UseIBL", false);
        material.set_bool("u_UseShadows", false);

        Self {
            material,
            albedo: Vec3::ONE,
            metallic: 0.0,
            roughness: 0.5,
            ao: 1.0,
            alpha: 1.0,
            maps: MapFlags::empty(),
            use_ibl: false,
            use_shadows: false,
        }
    }

    /// Bind shader, textures and the full parameter snapshot.
    pub fn bind(&self) {
        self.material.bind();
    }

    // =========================================================================
    // PBR properties (metallic-roughness workflow)
    // =========================================================================

    pub fn set_albedo(&mut self, albedo: Vec3) {
        self.albedo = albedo;
        self.material.set_vec3("u_Albedo", albedo);
    }

    #[must_use]
    pub fn albedo(&self) -> Vec3 {
        self.albedo
    }

    pub fn set_metallic(&mut self, metallic: f32) {
        self.metallic = metallic.clamp(0.0, 1.0);
        self.material.set_f32("u_Metallic", self.metallic);
    }

    #[must_use]
    pub fn metallic(&self) -> f32 {
        self.metallic
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness.clamp(MIN_ROUGHNESS, 1.0);
        self.material.set_f32("u_Roughness", self.roughness);
    }

    #[must_use]
    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn set_ao(&mut self, ao: f32) {
        self.ao = ao.clamp(0.0, 1.0);
        self.material.set_f32("u_AO", self.ao);
    }

    #[must_use]
    pub fn ao(&self) -> f32 {
        self.ao
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
        self.material.set_f32("u_Alpha", self.alpha);
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    // =========================================================================
    // Texture maps
    // =========================================================================
    // Setting `None` clears both the slot and the use-flag so no stale
    // binding survives.

    pub fn set_albedo_texture(&mut self, texture: Option<TextureRef>) {
        self.maps.set(MapFlags::ALBEDO, texture.is_some());
        self.material
            .set_bool("u_UseAlbedoTexture", texture.is_some());
        self.material
            .set_texture("u_AlbedoTexture", texture, units::ALBEDO, false);
    }

    pub fn set_normal_texture(&mut self, texture: Option<TextureRef>) {
        self.maps.set(MapFlags::NORMAL, texture.is_some());
        self.material.set_bool("u_UseNormalMap", texture.is_some());
        self.material
            .set_texture("u_NormalTexture", texture, units::NORMAL, false);
    }

    pub fn set_metallic_roughness_texture(&mut self, texture: Option<TextureRef>) {
        self.maps.set(MapFlags::METALLIC_ROUGHNESS, texture.is_some());
        self.material
            .set_bool("u_UseMetallicRoughnessTexture", texture.is_some());
        self.material.set_texture(
            "u_MetallicRoughnessTexture",
            texture,
            units::METALLIC_ROUGHNESS,
            false,
        );
    }

    pub fn set_ao_texture(&mut self, texture: Option<TextureRef>) {
        self.maps.set(MapFlags::AO, texture.is_some());
        self.material.set_bool("u_UseAOTexture", texture.is_some());
        self.material
            .set_texture("u_AOTexture", texture, units::AO, false);
    }

    pub fn set_emissive_texture(&mut self, texture: Option<TextureRef>) {
        self.maps.set(MapFlags::EMISSIVE, texture.is_some());
        self.material
            .set_bool("u_UseEmissiveTexture", texture.is_some());
        self.material
            .set_texture("u_EmissiveTexture", texture, units::EMISSIVE, false);
    }

    #[must_use]
    pub fn maps(&self) -> MapFlags {
        self.maps
    }

    // =========================================================================
    // IBL maps
    // =========================================================================

    pub fn set_irradiance_map(&mut self, map: TextureRef) {
        self.material
            .set_texture("u_IrradianceMap", Some(map), units::IRRADIANCE, true);
    }

    pub fn set_prefiltered_map(&mut self, map: TextureRef) {
        self.material
            .set_texture("u_PrefilteredMap", Some(map), units::PREFILTERED, true);
    }

    pub fn set_brdf_lut(&mut self, lut: TextureRef) {
        self.material
            .set_texture("u_BRDF_LUT", Some(lut), units::BRDF_LUT, false);
    }

    pub fn set_use_ibl(&mut self, use_ibl: bool) {
        self.use_ibl = use_ibl;
        self.material.set_bool("u_UseIBL", use_ibl);
    }

    #[must_use]
    pub fn use_ibl(&self) -> bool {
        self.use_ibl
    }

    // =========================================================================
    // Shadow mapping
    // =========================================================================

    pub fn set_shadow_map(&mut self, shadow_map: TextureRef) {
        self.material
            .set_texture("u_ShadowMap", Some(shadow_map), units::SHADOW_MAP, false);
    }

    pub fn set_light_space_matrix(&mut self, matrix: Mat4) {
        self.material.set_mat4("u_LightSpaceMatrix", matrix);
    }

    pub fn set_use_shadows(&mut self, use_shadows: bool) {
        self.use_shadows = use_shadows;
        self.material.set_bool("u_UseShadows", use_shadows);
    }

    #[must_use]
    pub fn use_shadows(&self) -> bool {
        self.use_shadows
    }

    // =========================================================================
    // Lower hemisphere fallback
    // =========================================================================

    pub fn set_lower_hemisphere_color(&mut self, color: Vec3) {
        self.material.set_vec3("u_LowerHemisphereColor", color);
    }

    pub fn set_lower_hemisphere_intensity(&mut self, intensity: f32) {
        self.material
            .set_f32("u_LowerHemisphereIntensity", intensity);
    }

    // =========================================================================
    // Transforms (per-object, set before each draw)
    // =========================================================================

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.material.set_mat4("u_Model", model);
    }

    pub fn set_normal_matrix(&mut self, normal_matrix: Mat3) {
        self.material.set_mat3("u_NormalMatrix", normal_matrix);
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.material.set_mat4("u_View", view);
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.material.set_mat4("u_Projection", projection);
    }

    pub fn set_view_position(&mut self, view_pos: Vec3) {
        self.material.set_vec3("u_ViewPos", view_pos);
    }

    pub fn set_transforms(&mut self, model: Mat4, view: Mat4, projection: Mat4, view_pos: Vec3, normal_matrix: Mat3) {
        self.set_model_matrix(model);
        self.set_normal_matrix(normal_matrix);
        self.set_view_matrix(view);
        self.set_projection_matrix(projection);
        self.set_view_position(view_pos);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn material(&self) -> &RenderMaterial {
        &self.material
    }

    #[must_use]
    pub fn material_mut(&mut self) -> &mut RenderMaterial {
        &mut self.material
    }

    #[must_use]
    pub fn shader(&self) -> &ShaderRef {
        self.material.shader()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.material.is_valid()
    }
}
