//! Environment precompute: cubemap conversion, irradiance convolution,
//! specular prefiltering and the BRDF lookup table.
//!
//! One-shot, offline-style generation. Each operation renders six faces of a
//! unit cube into a scratch framebuffer using a fixed capture rig (90° FOV
//! projection, one view matrix per face) and a capture shader encoding the
//! relevant physics:
//!
//! - irradiance convolution integrates hemisphere samples weighted by
//!   cos(θ)·sin(θ)
//! - prefiltering importance-samples the GGX distribution via a Hammersley
//!   sequence, with roughness = mip / (mip_levels - 1)
//! - the BRDF LUT integrates the split-sum approximation over a fullscreen
//!   quad
//!
//! Failure policy: a missing shader, invalid resolution or incomplete
//! scratch framebuffer aborts that map's generation and returns `None`.
//! Partial IBL is not a valid state — [`EnvironmentPrecompute::generate_ibl`]
//! yields all three maps or nothing.

use glam::{Mat4, Vec3};

use crate::gfx::{
    CubeFace, Framebuffer, GraphicsDevice, ShaderProgram, ShaderProgramExt, ShaderRef, Texture,
    TextureDesc, TextureFormat, TextureRef,
};
use crate::pbr::sampling;

/// Largest per-face resolution any capture operation accepts.
pub const MAX_CAPTURE_RESOLUTION: u32 = 8192;

/// Default irradiance cubemap face resolution (diffuse term is low frequency).
pub const IRRADIANCE_RESOLUTION: u32 = 32;

/// Default prefiltered-environment base face resolution.
pub const PREFILTER_BASE_RESOLUTION: u32 = 512;

/// Fixed prefiltered mip chain length; mip index encodes roughness.
pub const PREFILTER_MIP_LEVELS: u32 = 5;

/// Default BRDF lookup-table resolution.
pub const BRDF_LUT_RESOLUTION: u32 = 512;

/// Highest sampleable prefiltered LOD, uploaded as `u_MaxReflectionLOD`.
pub const MAX_REFLECTION_LOD: f32 = (PREFILTER_MIP_LEVELS - 1) as f32;

/// The complete IBL triple. Immutable after generation; regenerating means
/// replacing the whole value.
#[derive(Clone)]
pub struct IblMaps {
    /// Low-resolution diffuse irradiance cubemap.
    pub irradiance: TextureRef,
    /// Prefiltered specular cubemap; mip index encodes roughness.
    pub prefiltered: TextureRef,
    /// 2D Fresnel scale/bias table indexed by (N·V, roughness).
    pub brdf_lut: TextureRef,
}

/// Capture shader programs, compiled by the application's shader layer.
pub struct EnvironmentShaders {
    pub equirect: ShaderRef,
    pub irradiance: ShaderRef,
    pub prefilter: ShaderRef,
    pub brdf: ShaderRef,
}

/// One-shot generator for environment lighting resources.
pub struct EnvironmentPrecompute {
    shaders: EnvironmentShaders,
}

/// Shared 90° FOV projection covering one cube face exactly.
#[must_use]
pub fn capture_projection() -> Mat4 {
    Mat4::perspective_rh_gl(90.0_f32.to_radians(), 1.0, 0.1, 10.0)
}

/// View matrices for the six capture faces, in [`CubeFace::ALL`] order.
#[must_use]
pub fn capture_views() -> [Mat4; 6] {
    [
        Mat4::look_at_rh(Vec3::ZERO, Vec3::X, Vec3::NEG_Y),
        Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_X, Vec3::NEG_Y),
        Mat4::look_at_rh(Vec3::ZERO, Vec3::Y, Vec3::Z),
        Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Y, Vec3::NEG_Z),
        Mat4::look_at_rh(Vec3::ZERO, Vec3::Z, Vec3::NEG_Y),
        Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::NEG_Y),
    ]
}

fn valid_resolution(resolution: u32, what: &str) -> bool {
    if resolution == 0 || resolution > MAX_CAPTURE_RESOLUTION {
        log::error!("{what}: invalid resolution {resolution} (must be 1-{MAX_CAPTURE_RESOLUTION})");
        return false;
    }
    true
}

impl EnvironmentPrecompute {
    #[must_use]
    pub fn new(shaders: EnvironmentShaders) -> Self {
        Self { shaders }
    }

    /// Convert an equirectangular HDR texture into a cubemap with a full mip
    /// chain, rendering the source onto each face.
    pub fn equirect_to_cubemap(
        &self,
        device: &mut dyn GraphicsDevice,
        source: &TextureRef,
        resolution: u32,
    ) -> Option<TextureRef> {
        if source.is_cubemap() {
            log::error!("equirect_to_cubemap: input must be a 2D equirectangular map");
            return None;
        }
        if !valid_resolution(resolution, "equirect_to_cubemap") {
            return None;
        }
        if !self.shaders.equirect.is_valid() {
            log::error!("equirect_to_cubemap: conversion shader is invalid");
            return None;
        }

        log::info!("Converting equirectangular map to cubemap ({resolution}x{resolution} per face)");

        let mip_levels = full_mip_chain(resolution);
        let cubemap = device.create_cubemap(resolution, TextureFormat::Rgb16F, mip_levels)?;

        let shader = &self.shaders.equirect;
        shader.bind();
        shader.set_mat4("u_Projection", capture_projection());
        source.bind(0);
        shader.set_i32("u_EquirectangularMap", 0);

        self.render_capture_faces(device, shader, &cubemap, resolution, 0, "equirect_to_cubemap")?;

        // Mip chain from the freshly rendered base level; the prefilter step
        // and trilinear skybox sampling both rely on it.
        cubemap.generate_mipmaps();

        log::info!("Cubemap conversion complete ({mip_levels} mip levels)");
        Some(cubemap)
    }

    /// Convolve an environment cubemap into a diffuse irradiance cubemap.
    pub fn generate_irradiance(
        &self,
        device: &mut dyn GraphicsDevice,
        environment: &TextureRef,
        resolution: u32,
    ) -> Option<TextureRef> {
        if !environment.is_cubemap() {
            log::error!("generate_irradiance: input must be a cubemap");
            return None;
        }
        if !valid_resolution(resolution, "generate_irradiance") {
            return None;
        }
        if !self.shaders.irradiance.is_valid() {
            log::error!("generate_irradiance: convolution shader is invalid");
            return None;
        }

        log::info!("Generating irradiance map ({resolution}x{resolution})");

        let cubemap = device.create_cubemap(resolution, TextureFormat::Rgb16F, 1)?;

        let shader = &self.shaders.irradiance;
        shader.bind();
        shader.set_mat4("u_Projection", capture_projection());
        environment.bind(0);
        shader.set_i32("u_EnvironmentMap", 0);

        self.render_capture_faces(device, shader, &cubemap, resolution, 0, "generate_irradiance")?;

        log::info!("Irradiance map complete");
        Some(cubemap)
    }

    /// Prefilter an environment cubemap into a specular mip chain where the
    /// mip index encodes roughness.
    pub fn generate_prefiltered(
        &self,
        device: &mut dyn GraphicsDevice,
        environment: &TextureRef,
        base_resolution: u32,
        mip_levels: u32,
    ) -> Option<TextureRef> {
        if !environment.is_cubemap() {
            log::error!("generate_prefiltered: input must be a cubemap");
            return None;
        }
        if !valid_resolution(base_resolution, "generate_prefiltered") {
            return None;
        }
        if mip_levels == 0 || (base_resolution >> (mip_levels - 1)) == 0 {
            log::error!("generate_prefiltered: {mip_levels} mip levels do not fit a {base_resolution} base");
            return None;
        }
        if !self.shaders.prefilter.is_valid() {
            log::error!("generate_prefiltered: prefilter shader is invalid");
            return None;
        }

        log::info!("Generating pre-filtered environment map ({base_resolution}x{base_resolution})");

        let cubemap = device.create_cubemap(base_resolution, TextureFormat::Rgb16F, mip_levels)?;

        let shader = &self.shaders.prefilter;
        shader.bind();
        shader.set_mat4("u_Projection", capture_projection());
        environment.bind(0);
        shader.set_i32("u_EnvironmentMap", 0);

        for mip in 0..mip_levels {
            let mip_resolution = (base_resolution >> mip).max(1);
            let roughness = sampling::roughness_for_mip(mip, mip_levels);
            shader.set_f32("u_Roughness", roughness);

            self.render_capture_faces(device, shader, &cubemap, mip_resolution, mip, "generate_prefiltered")?;
        }

        log::info!("Pre-filtered environment map complete ({mip_levels} mip levels)");
        Some(cubemap)
    }

    /// Integrate the split-sum BRDF into a 2D RG lookup table on the GPU.
    pub fn generate_brdf_lut(&self, device: &mut dyn GraphicsDevice, resolution: u32) -> Option<TextureRef> {
        if !valid_resolution(resolution, "generate_brdf_lut") {
            return None;
        }
        if !self.shaders.brdf.is_valid() {
            log::error!("generate_brdf_lut: integration shader is invalid");
            return None;
        }

        log::info!("Generating BRDF LUT ({resolution}x{resolution})");

        let lut = device.create_texture_2d(&TextureDesc::new(resolution, resolution, TextureFormat::Rg16F))?;

        let framebuffer = device.create_framebuffer(resolution, resolution)?;
        framebuffer.attach_color(lut.clone(), 0);
        if !framebuffer.is_complete() {
            log::error!("generate_brdf_lut: framebuffer incomplete");
            return None;
        }

        device.push_viewport();
        framebuffer.bind();
        device.set_viewport(0, 0, resolution, resolution);
        device.clear([0.0, 0.0, 0.0, 1.0]);

        self.shaders.brdf.bind();
        device.draw_fullscreen_quad();

        framebuffer.unbind();
        device.pop_viewport();

        log::info!("BRDF LUT complete");
        Some(lut)
    }

    /// Generate the complete IBL triple with the default resolutions.
    ///
    /// All three maps succeed or the whole operation yields `None`; a partial
    /// triple can never reach a caller.
    pub fn generate_ibl(&self, device: &mut dyn GraphicsDevice, environment: &TextureRef) -> Option<IblMaps> {
        let irradiance = self.generate_irradiance(device, environment, IRRADIANCE_RESOLUTION);
        let prefiltered =
            self.generate_prefiltered(device, environment, PREFILTER_BASE_RESOLUTION, PREFILTER_MIP_LEVELS);
        let brdf_lut = self.generate_brdf_lut(device, BRDF_LUT_RESOLUTION);

        match (irradiance, prefiltered, brdf_lut) {
            (Some(irradiance), Some(prefiltered), Some(brdf_lut)) => Some(IblMaps {
                irradiance,
                prefiltered,
                brdf_lut,
            }),
            _ => {
                log::warn!("IBL generation incomplete; image-based lighting disabled");
                None
            }
        }
    }

    /// Render all six faces of `cubemap` at `mip` through the bound shader,
    /// validating scratch-framebuffer completeness per face.
    fn render_capture_faces(
        &self,
        device: &mut dyn GraphicsDevice,
        shader: &ShaderRef,
        cubemap: &TextureRef,
        resolution: u32,
        mip: u32,
        what: &str,
    ) -> Option<()> {
        let framebuffer = device.create_framebuffer(resolution, resolution)?;
        let views = capture_views();

        device.push_viewport();
        framebuffer.bind();
        device.set_viewport(0, 0, resolution, resolution);

        for face in CubeFace::ALL {
            shader.set_mat4("u_View", views[face.index()]);
            framebuffer.attach_cubemap_face(cubemap, face, mip);

            if !framebuffer.is_complete() {
                log::error!("{what}: framebuffer incomplete for face {}", face.index());
                framebuffer.unbind();
                device.pop_viewport();
                return None;
            }

            device.clear([0.0, 0.0, 0.0, 1.0]);
            device.draw_unit_cube();
        }

        framebuffer.unbind();
        device.pop_viewport();
        Some(())
    }
}

/// Integrate the split-sum BRDF on the CPU and upload the result.
///
/// Environment-independent alternative to [`EnvironmentPrecompute::generate_brdf_lut`]
/// for backends without float render targets; texels are RG16F pairs of
/// (scale, bias) computed with [`sampling::integrate_brdf`].
pub fn generate_brdf_lut_cpu(device: &mut dyn GraphicsDevice, resolution: u32) -> Option<TextureRef> {
    if !valid_resolution(resolution, "generate_brdf_lut_cpu") {
        return None;
    }

    log::info!("Integrating BRDF LUT on the CPU ({resolution}x{resolution})");

    let mut texels: Vec<f32> = Vec::with_capacity((resolution * resolution * 2) as usize);
    for y in 0..resolution {
        // +0.5 samples the texel center
        let roughness = (y as f32 + 0.5) / resolution as f32;
        for x in 0..resolution {
            let n_dot_v = (x as f32 + 0.5) / resolution as f32;
            let (scale, bias) = sampling::integrate_brdf(n_dot_v, roughness);
            texels.push(scale);
            texels.push(bias);
        }
    }

    let desc = TextureDesc::new(resolution, resolution, TextureFormat::Rg16F);
    device.create_texture_2d_with_data(&desc, bytemuck::cast_slice(&texels))
}

/// Number of mip levels in a full chain for a square `resolution` texture.
#[must_use]
pub fn full_mip_chain(resolution: u32) -> u32 {
    32 - resolution.max(1).leading_zeros()
}
