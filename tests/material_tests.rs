//! Material system tests
//!
//! - last-write-wins parameter semantics (same and differing types)
//! - texture slot deduplication and clearing
//! - PBR clamps and paired use-flags
//! - the atomic bind contract against a recording shader

mod common;

use glam::{Mat4, Vec3};
use prism::gfx::{TextureDesc, TextureFormat, UniformValue};
use prism::material::{units, MapFlags, PbrMaterial, RenderMaterial, MIN_ROUGHNESS};
use prism::GraphicsDevice;

use common::{shader_ref, RecordingDevice, RecordingShader};

// ============================================================================
// RenderMaterial parameter semantics
// ============================================================================

#[test]
fn parameter_last_write_wins() {
    let shader = RecordingShader::new("lit");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");

    material.set_f32("u_Roughness", 0.25);
    material.set_f32("u_Roughness", 0.75);

    assert_eq!(material.get_f32("u_Roughness"), Some(0.75));
}

#[test]
fn parameter_type_is_replaced_by_later_write() {
    let shader = RecordingShader::new("lit");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");

    material.set_f32("u_Value", 1.0);
    material.set_vec3("u_Value", Vec3::new(1.0, 2.0, 3.0));

    // A name maps to exactly one active type at a time
    assert_eq!(material.get_f32("u_Value"), None);
    assert_eq!(material.get_vec3("u_Value"), Some(Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn typed_getter_rejects_mismatched_type() {
    let shader = RecordingShader::new("lit");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");

    material.set_mat4("u_Model", Mat4::IDENTITY);

    assert_eq!(material.get_f32("u_Model"), None);
    assert_eq!(material.get_mat4("u_Model"), Some(Mat4::IDENTITY));
}

#[test]
fn texture_slots_deduplicate_by_uniform_name() {
    let shader = RecordingShader::new("lit");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");
    let mut device = RecordingDevice::new();

    let desc = TextureDesc::new(4, 4, TextureFormat::Rgba8);
    let tex_a = device.create_texture_2d(&desc).unwrap();
    let tex_b = device.create_texture_2d(&desc).unwrap();

    material.set_texture("u_AlbedoTexture", Some(tex_a), 0, false);
    material.set_texture("u_AlbedoTexture", Some(tex_b), 3, false);

    assert_eq!(material.texture_slot_count(), 1);
    let slot = material.texture_slot("u_AlbedoTexture").unwrap();
    assert_eq!(slot.unit, 3);
}

#[test]
fn clearing_texture_removes_slot() {
    let shader = RecordingShader::new("lit");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");
    let mut device = RecordingDevice::new();

    let tex = device
        .create_texture_2d(&TextureDesc::new(4, 4, TextureFormat::Rgba8))
        .unwrap();
    material.set_texture("u_AlbedoTexture", Some(tex), 0, false);
    material.set_texture("u_AlbedoTexture", None, 0, false);

    assert_eq!(material.texture_slot_count(), 0);
}

// ============================================================================
// Bind contract
// ============================================================================

#[test]
fn bind_uploads_parameters_and_samplers() {
    let shader = RecordingShader::new("lit");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");
    let mut device = RecordingDevice::new();

    let tex = device
        .create_texture_2d(&TextureDesc::new(4, 4, TextureFormat::Rgba8))
        .unwrap();
    material.set_f32("u_Roughness", 0.4);
    material.set_vec3("u_Albedo", Vec3::ONE);
    material.set_texture("u_AlbedoTexture", Some(tex), 2, false);

    material.bind();

    assert_eq!(shader.bind_count.get(), 1);
    assert_eq!(shader.uniform("u_Roughness"), Some(UniformValue::Float(0.4)));
    assert_eq!(shader.uniform("u_Albedo"), Some(UniformValue::Vec3(Vec3::ONE)));
    // Sampler uniform set to the slot's unit
    assert_eq!(shader.uniform("u_AlbedoTexture"), Some(UniformValue::Int(2)));
}

#[test]
fn bind_with_invalid_shader_is_a_no_op() {
    let shader = RecordingShader::new_invalid("broken");
    let mut material = RenderMaterial::new(shader_ref(&shader), "test");
    material.set_f32("u_Roughness", 0.4);

    material.bind();

    assert_eq!(shader.bind_count.get(), 0);
    assert_eq!(shader.upload_count(), 0);
}

// ============================================================================
// PbrMaterial
// ============================================================================

#[test]
fn metallic_and_ao_clamp_to_unit_range() {
    let shader = RecordingShader::new("lit");
    let mut material = PbrMaterial::new(shader_ref(&shader), "pbr");

    material.set_metallic(1.8);
    material.set_ao(-0.2);

    assert_eq!(material.metallic(), 1.0);
    assert_eq!(material.ao(), 0.0);
}

#[test]
fn roughness_has_a_floor_against_singular_distributions() {
    let shader = RecordingShader::new("lit");
    let mut material = PbrMaterial::new(shader_ref(&shader), "pbr");

    material.set_roughness(0.0);
    assert_eq!(material.roughness(), MIN_ROUGHNESS);

    material.set_roughness(2.0);
    assert_eq!(material.roughness(), 1.0);
}

#[test]
fn setting_texture_none_clears_use_flag() {
    let shader = RecordingShader::new("lit");
    let mut material = PbrMaterial::new(shader_ref(&shader), "pbr");
    let mut device = RecordingDevice::new();

    let tex = device
        .create_texture_2d(&TextureDesc::new(4, 4, TextureFormat::Rgba8))
        .unwrap();

    material.set_albedo_texture(Some(tex));
    assert!(material.maps().contains(MapFlags::ALBEDO));
    assert_eq!(material.material().get_bool("u_UseAlbedoTexture"), Some(true));

    material.set_albedo_texture(None);
    assert!(!material.maps().contains(MapFlags::ALBEDO));
    assert_eq!(material.material().get_bool("u_UseAlbedoTexture"), Some(false));
    assert!(material.material().texture_slot("u_AlbedoTexture").is_none());
}

#[test]
fn ibl_maps_bind_to_their_fixed_units() {
    let shader = RecordingShader::new("lit");
    let mut material = PbrMaterial::new(shader_ref(&shader), "pbr");
    let mut device = RecordingDevice::new();

    let irradiance = device.create_cubemap(32, TextureFormat::Rgb16F, 1).unwrap();
    let prefiltered = device.create_cubemap(512, TextureFormat::Rgb16F, 5).unwrap();
    let brdf = device
        .create_texture_2d(&TextureDesc::new(512, 512, TextureFormat::Rg16F))
        .unwrap();

    material.set_irradiance_map(irradiance);
    material.set_prefiltered_map(prefiltered);
    material.set_brdf_lut(brdf);

    let irradiance_slot = material.material().texture_slot("u_IrradianceMap").unwrap();
    assert_eq!(irradiance_slot.unit, units::IRRADIANCE);
    assert!(irradiance_slot.is_cubemap);

    let prefiltered_slot = material.material().texture_slot("u_PrefilteredMap").unwrap();
    assert_eq!(prefiltered_slot.unit, units::PREFILTERED);
    assert!(prefiltered_slot.is_cubemap);

    let brdf_slot = material.material().texture_slot("u_BRDF_LUT").unwrap();
    assert_eq!(brdf_slot.unit, units::BRDF_LUT);
    assert!(!brdf_slot.is_cubemap);
}

#[test]
fn pbr_defaults_are_uploaded_on_first_bind() {
    let shader = RecordingShader::new("lit");
    let material = PbrMaterial::new(shader_ref(&shader), "pbr");

    material.bind();

    assert_eq!(shader.uniform("u_Metallic"), Some(UniformValue::Float(0.0)));
    assert_eq!(shader.uniform("u_Roughness"), Some(UniformValue::Float(0.5)));
    assert_eq!(shader.uniform("u_AO"), Some(UniformValue::Float(1.0)));
    assert_eq!(shader.uniform("u_UseIBL"), Some(UniformValue::Bool(false)));
    assert_eq!(shader.uniform("u_UseShadows"), Some(UniformValue::Bool(false)));
}
