//! Material system: typed parameter storage and the PBR material layered on
//! top of it.

pub mod parameter;
pub mod pbr_material;
pub mod render_material;

pub use parameter::{ParameterStore, TextureSlot};
pub use pbr_material::{MapFlags, PbrMaterial, MIN_ROUGHNESS};
pub use render_material::RenderMaterial;

/// Fixed texture unit assignments for the whole pipeline.
///
/// Materials and passes share one 0-15 unit space; these constants keep the
/// two sides from colliding.
pub mod units {
    // Material textures (0-4)
    pub const ALBEDO: u32 = 0;
    pub const NORMAL: u32 = 1;
    pub const METALLIC_ROUGHNESS: u32 = 2;
    pub const AO: u32 = 3;
    pub const EMISSIVE: u32 = 4;

    // IBL textures (5-7)
    pub const IRRADIANCE: u32 = 5;
    pub const PREFILTERED: u32 = 6;
    pub const BRDF_LUT: u32 = 7;

    // Shadow map (8)
    pub const SHADOW_MAP: u32 = 8;

    // Post-processing (9-11)
    pub const HDR_BUFFER: u32 = 9;
    pub const BLOOM_TEXTURE: u32 = 10;
    pub const COLOR_GRADING_LUT: u32 = 11;

    // User/custom (12-15)
    pub const CUSTOM_0: u32 = 12;
    pub const CUSTOM_1: u32 = 13;
    pub const CUSTOM_2: u32 = 14;
    pub const CUSTOM_3: u32 = 15;
}
