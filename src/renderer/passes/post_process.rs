//! Post-process composition: bloom → tone mapping → color grading.
//!
//! Reads the HDR scene color and renders the final LDR result to the screen
//! framebuffer. Leaves depth testing re-enabled on return.

use crate::gfx::{
    GraphicsDevice, ShaderProgram, ShaderProgramExt, ShaderRef, Texture, TextureFormat, TextureRef,
};
use crate::material::units;
use crate::pbr::ToneMappingMode;

use super::bloom::Bloom;

/// Edge size of the generated neutral color-grading LUT.
const NEUTRAL_LUT_SIZE: u32 = 16;

/// Composes Bloom output with tone mapping and color grading into the final
/// screen image.
pub struct PostProcessPipeline {
    bloom: Option<Bloom>,
    tonemap_shader: ShaderRef,
    color_grading_lut: Option<TextureRef>,

    // Bloom parameters
    enable_bloom: bool,
    bloom_threshold: f32,
    bloom_knee: f32,
    bloom_intensity: f32,
    bloom_blur_passes: u32,

    // Tone mapping parameters
    tone_mapping_mode: ToneMappingMode,
    exposure: f32,
    gamma: f32,
    white_point: f32,

    // Color grading parameters
    enable_color_grading: bool,
    lut_contribution: f32,
    saturation: f32,
    contrast: f32,
    brightness: f32,

    width: u32,
    height: u32,
    valid: bool,
}

impl PostProcessPipeline {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        tonemap_shader: ShaderRef,
        bloom_extract_shader: ShaderRef,
        bloom_blur_shader: ShaderRef,
        width: u32,
        height: u32,
    ) -> Self {
        // Bloom runs at half resolution, clamped to at least 1x1
        let bloom = Bloom::new(
            device,
            bloom_extract_shader,
            bloom_blur_shader,
            (width / 2).max(1),
            (height / 2).max(1),
        );
        if !bloom.is_valid() {
            log::error!("PostProcessPipeline: failed to create Bloom processor");
        }

        let valid = tonemap_shader.is_valid();
        if !valid {
            log::error!("PostProcessPipeline: tone mapping shader is invalid");
        }

        let color_grading_lut = create_neutral_lut(device, NEUTRAL_LUT_SIZE);
        if color_grading_lut.is_none() {
            log::warn!("PostProcessPipeline: failed to create color grading LUT");
        }

        if valid {
            log::info!("PostProcessPipeline created: {width}x{height}");
        }

        Self {
            bloom: Some(bloom),
            tonemap_shader,
            color_grading_lut,
            enable_bloom: true,
            bloom_threshold: 1.5,
            bloom_knee: 0.5,
            bloom_intensity: 0.04,
            bloom_blur_passes: 5,
            tone_mapping_mode: ToneMappingMode::AcesFilmic,
            exposure: 1.0,
            gamma: 2.2,
            white_point: 4.0,
            enable_color_grading: false,
            lut_contribution: 1.0,
            saturation: 1.0,
            contrast: 1.0,
            brightness: 0.0,
            width,
            height,
            valid,
        }
    }

    /// Process the HDR color texture and composite to the screen
    /// framebuffer. Depth testing is re-enabled before returning.
    pub fn process(
        &mut self,
        device: &mut dyn GraphicsDevice,
        hdr_color_texture: &TextureRef,
        window_width: u32,
        window_height: u32,
    ) {
        if !self.valid {
            return;
        }

        // Pass 1: bloom
        let bloom_texture = match &mut self.bloom {
            Some(bloom) if self.enable_bloom && bloom.is_valid() => {
                bloom.set_threshold(self.bloom_threshold);
                bloom.set_knee(self.bloom_knee);
                bloom.set_blur_passes(self.bloom_blur_passes);
                Some(bloom.process(device, hdr_color_texture))
            }
            _ => None,
        };

        // Pass 2: tone mapping + grading to screen
        device.set_viewport(0, 0, window_width, window_height);
        device.clear([0.0, 0.0, 0.0, 1.0]);
        device.disable_depth_test();

        let shader = &self.tonemap_shader;
        shader.bind();

        hdr_color_texture.bind(units::HDR_BUFFER);
        shader.set_i32("u_HDRBuffer", units::HDR_BUFFER as i32);

        shader.set_i32("u_ToneMappingMode", self.tone_mapping_mode.index());
        shader.set_f32("u_Exposure", self.exposure);
        shader.set_f32("u_Gamma", self.gamma);
        shader.set_f32("u_WhitePoint", self.white_point);

        // Bloom composite, only when the texture actually exists
        let bloom_active = bloom_texture.is_some();
        shader.set_bool("u_EnableBloom", bloom_active);
        shader.set_f32("u_BloomIntensity", self.bloom_intensity);
        if let Some(bloom_texture) = &bloom_texture {
            bloom_texture.bind(units::BLOOM_TEXTURE);
            shader.set_i32("u_BloomTexture", units::BLOOM_TEXTURE as i32);
        }

        // Color grading, only when the LUT actually exists
        let grading_active = self.enable_color_grading && self.color_grading_lut.is_some();
        shader.set_bool("u_EnableColorGrading", grading_active);
        shader.set_f32("u_LUTContribution", self.lut_contribution);
        shader.set_f32("u_Saturation", self.saturation);
        shader.set_f32("u_Contrast", self.contrast);
        shader.set_f32("u_Brightness", self.brightness);
        if grading_active {
            if let Some(lut) = &self.color_grading_lut {
                lut.bind(units::COLOR_GRADING_LUT);
                shader.set_i32("u_ColorGradingLUT", units::COLOR_GRADING_LUT as i32);
            }
        }

        device.draw_fullscreen_quad();

        device.enable_depth_test();
    }

    /// Recreate the bloom buffers at half the new resolution (clamped to at
    /// least 1x1); the previous buffers survive a failed recreation.
    pub fn on_resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) {
        self.width = width;
        self.height = height;

        if let Some(bloom) = &mut self.bloom {
            bloom.resize(device, (width / 2).max(1), (height / 2).max(1));
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn bloom(&self) -> Option<&Bloom> {
        self.bloom.as_ref()
    }

    // =========================================================================
    // Bloom settings
    // =========================================================================

    pub fn set_enable_bloom(&mut self, enable: bool) {
        self.enable_bloom = enable;
    }

    pub fn set_bloom_threshold(&mut self, threshold: f32) {
        self.bloom_threshold = threshold;
    }

    pub fn set_bloom_knee(&mut self, knee: f32) {
        self.bloom_knee = knee;
    }

    pub fn set_bloom_intensity(&mut self, intensity: f32) {
        self.bloom_intensity = intensity;
    }

    pub fn set_bloom_blur_passes(&mut self, passes: u32) {
        self.bloom_blur_passes = passes;
    }

    #[must_use]
    pub fn enable_bloom(&self) -> bool {
        self.enable_bloom
    }

    #[must_use]
    pub fn bloom_threshold(&self) -> f32 {
        self.bloom_threshold
    }

    #[must_use]
    pub fn bloom_knee(&self) -> f32 {
        self.bloom_knee
    }

    #[must_use]
    pub fn bloom_intensity(&self) -> f32 {
        self.bloom_intensity
    }

    #[must_use]
    pub fn bloom_blur_passes(&self) -> u32 {
        self.bloom_blur_passes
    }

    // =========================================================================
    // Tone mapping settings
    // =========================================================================

    pub fn set_tone_mapping_mode(&mut self, mode: ToneMappingMode) {
        self.tone_mapping_mode = mode;
    }

    pub fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure;
    }

    pub fn set_gamma(&mut self, gamma: f32) {
        self.gamma = gamma;
    }

    pub fn set_white_point(&mut self, white_point: f32) {
        self.white_point = white_point;
    }

    #[must_use]
    pub fn tone_mapping_mode(&self) -> ToneMappingMode {
        self.tone_mapping_mode
    }

    #[must_use]
    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    #[must_use]
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    #[must_use]
    pub fn white_point(&self) -> f32 {
        self.white_point
    }

    // =========================================================================
    // Color grading settings
    // =========================================================================

    pub fn set_enable_color_grading(&mut self, enable: bool) {
        self.enable_color_grading = enable;
    }

    pub fn set_lut_contribution(&mut self, contribution: f32) {
        self.lut_contribution = contribution;
    }

    pub fn set_saturation(&mut self, saturation: f32) {
        self.saturation = saturation;
    }

    pub fn set_contrast(&mut self, contrast: f32) {
        self.contrast = contrast;
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness;
    }

    #[must_use]
    pub fn enable_color_grading(&self) -> bool {
        self.enable_color_grading
    }

    #[must_use]
    pub fn lut_contribution(&self) -> f32 {
        self.lut_contribution
    }

    #[must_use]
    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    #[must_use]
    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    #[must_use]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }
}

/// Build an identity 3D grading LUT: each axis is a linear ramp of the
/// matching channel, so sampling it is a no-op until a graded LUT replaces
/// it.
fn create_neutral_lut(device: &mut dyn GraphicsDevice, size: u32) -> Option<TextureRef> {
    let mut data = Vec::with_capacity((size * size * size * 4) as usize);
    let max = (size - 1).max(1) as f32;

    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                data.push((r as f32 / max * 255.0).round() as u8);
                data.push((g as f32 / max * 255.0).round() as u8);
                data.push((b as f32 / max * 255.0).round() as u8);
                data.push(255);
            }
        }
    }

    device.create_texture_3d_with_data(size, TextureFormat::Rgba8, &data)
}
