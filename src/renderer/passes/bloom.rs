//! Bloom: bright-region extraction plus ping-ponged separable blur.
//!
//! Pass 1 extracts bright regions with a soft (quadratic-knee) luminance
//! threshold, scaling color by the surviving fraction so hue is preserved
//! (see [`crate::pbr::tonemap::extract_contribution`]). Pass 2 runs N
//! separable 5-tap Gaussian iterations, alternating horizontal and vertical
//! between two equal-size buffers; ownership of the "current result" flips
//! every iteration and a buffer is never read and written in the same pass.

use std::sync::Arc;

use glam::Vec2;

use crate::gfx::{
    Framebuffer, FramebufferRef, GraphicsDevice, ShaderProgram, ShaderProgramExt, ShaderRef,
    Texture, TextureDesc, TextureFormat, TextureRef,
};

struct BloomBuffers {
    extract_fb: FramebufferRef,
    extract_texture: TextureRef,
    blur_fb: [FramebufferRef; 2],
    blur_textures: [TextureRef; 2],
    width: u32,
    height: u32,
}

impl BloomBuffers {
    fn create(device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Option<Self> {
        let desc = TextureDesc::new(width, height, TextureFormat::Rgb16F);

        let extract_texture = device.create_texture_2d(&desc)?;
        let blur_texture_1 = device.create_texture_2d(&desc)?;
        let blur_texture_2 = device.create_texture_2d(&desc)?;

        let extract_fb = device.create_framebuffer(width, height)?;
        extract_fb.attach_color(extract_texture.clone(), 0);

        let blur_fb_1 = device.create_framebuffer(width, height)?;
        blur_fb_1.attach_color(blur_texture_1.clone(), 0);

        let blur_fb_2 = device.create_framebuffer(width, height)?;
        blur_fb_2.attach_color(blur_texture_2.clone(), 0);

        if !extract_fb.is_complete() || !blur_fb_1.is_complete() || !blur_fb_2.is_complete() {
            log::error!("Bloom: framebuffers not complete");
            return None;
        }

        Some(Self {
            extract_fb,
            extract_texture,
            blur_fb: [blur_fb_1, blur_fb_2],
            blur_textures: [blur_texture_1, blur_texture_2],
            width,
            height,
        })
    }
}

/// Multi-pass bright-extract + ping-pong blur.
pub struct Bloom {
    buffers: Option<BloomBuffers>,
    extract_shader: ShaderRef,
    blur_shader: ShaderRef,

    threshold: f32,
    knee: f32,
    intensity: f32,
    blur_passes: u32,
}

impl Bloom {
    pub fn new(
        device: &mut dyn GraphicsDevice,
        extract_shader: ShaderRef,
        blur_shader: ShaderRef,
        width: u32,
        height: u32,
    ) -> Self {
        let shaders_valid = extract_shader.is_valid() && blur_shader.is_valid();
        if !shaders_valid {
            log::error!("Bloom: extract or blur shader is invalid");
        }

        let buffers = if shaders_valid {
            BloomBuffers::create(device, width, height)
        } else {
            None
        };

        if let Some(buffers) = &buffers {
            log::info!("Bloom created: {}x{}", buffers.width, buffers.height);
        }

        Self {
            buffers,
            extract_shader,
            blur_shader,
            threshold: 1.0,
            knee: 0.1,
            intensity: 0.04,
            blur_passes: 5,
        }
    }

    /// Recreate the internal buffers for a new resolution. On failure the
    /// previous buffers are kept and `false` is returned.
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> bool {
        match BloomBuffers::create(device, width, height) {
            Some(buffers) => {
                self.buffers = Some(buffers);
                true
            }
            None => {
                log::error!("Bloom: failed to recreate buffers at {width}x{height}, keeping previous");
                false
            }
        }
    }

    /// Extract and blur `hdr_texture`.
    ///
    /// Returns the blurred bloom texture, or the unmodified input if this
    /// instance failed to initialize — callers must not assume blur occurred.
    pub fn process(&self, device: &mut dyn GraphicsDevice, hdr_texture: &TextureRef) -> TextureRef {
        let Some(buffers) = &self.buffers else {
            log::error!("Bloom::process called on invalid instance");
            return hdr_texture.clone();
        };

        // Fullscreen passes on color-only targets; restore afterwards.
        let depth_was_enabled = device.depth_test_enabled();
        device.disable_depth_test();

        // =====================================================================
        // Pass 1: extract bright regions
        // =====================================================================
        buffers.extract_fb.bind();
        device.clear([0.0, 0.0, 0.0, 1.0]);

        self.extract_shader.bind();
        self.extract_shader.set_i32("u_HDRBuffer", 0);
        self.extract_shader.set_f32("u_Threshold", self.threshold);
        self.extract_shader.set_f32("u_Knee", self.knee);

        hdr_texture.bind(0);
        device.draw_fullscreen_quad();

        buffers.extract_fb.unbind();

        // =====================================================================
        // Pass 2: separable blur, ping-ponged between the two buffers
        // =====================================================================
        self.blur_shader.bind();
        self.blur_shader.set_vec2(
            "u_TextureSize",
            Vec2::new(buffers.width as f32, buffers.height as f32),
        );

        let mut source = buffers.extract_texture.clone();

        for _ in 0..self.blur_passes {
            // If the current source is blur buffer 0, the horizontal pass
            // writes into buffer 1 and the vertical pass back into 0, and
            // vice versa — source and destination never alias.
            let source_is_first = Arc::ptr_eq(&source, &buffers.blur_textures[0]);
            let (intermediate, fin) = if source_is_first { (1, 0) } else { (0, 1) };

            // Horizontal: source → intermediate
            buffers.blur_fb[intermediate].bind();
            device.clear([0.0, 0.0, 0.0, 1.0]);
            self.blur_shader.set_bool("u_Horizontal", true);
            self.blur_shader.set_i32("u_Image", 0);
            source.bind(0);
            device.draw_fullscreen_quad();
            buffers.blur_fb[intermediate].unbind();

            // Vertical: intermediate → final
            buffers.blur_fb[fin].bind();
            device.clear([0.0, 0.0, 0.0, 1.0]);
            self.blur_shader.set_bool("u_Horizontal", false);
            self.blur_shader.set_i32("u_Image", 0);
            buffers.blur_textures[intermediate].bind(0);
            device.draw_fullscreen_quad();
            buffers.blur_fb[fin].unbind();

            source = buffers.blur_textures[fin].clone();
        }

        if depth_was_enabled {
            device.enable_depth_test();
        }

        source
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn set_knee(&mut self, knee: f32) {
        self.knee = knee;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    pub fn set_blur_passes(&mut self, passes: u32) {
        self.blur_passes = passes;
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    #[must_use]
    pub fn knee(&self) -> f32 {
        self.knee
    }

    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    #[must_use]
    pub fn blur_passes(&self) -> u32 {
        self.blur_passes
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.buffers.is_some()
    }

    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.buffers.as_ref().map(|b| (b.width, b.height))
    }
}
