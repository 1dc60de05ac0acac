//! Frame orchestration.
//!
//! [`SceneRenderer`] owns the HDR target, the shadow pass, the active render
//! path and the post-process pipeline, and sequences one frame:
//!
//! 1. shadow pass (when a directional light and a valid pass exist)
//! 2. active render path into the HDR target
//! 3. skybox into the HDR target
//! 4. stencil outline
//! 5. post-processing to the screen framebuffer
//! 6. depth test re-enabled (post-process leaves it disabled)
//!
//! Every stage degrades rather than aborts: a failed resource logs a warning
//! and disables its feature while the rest of the pipeline continues.

pub mod frame;
pub mod ibl;
pub mod outline;
pub mod passes;
pub mod path;

use std::sync::Arc;

use glam::{Vec3, Vec4};
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::errors::{RenderError, Result};
use crate::gfx::{
    Framebuffer, FramebufferRef, GraphicsDevice, ShaderProgram, ShaderRef, TextureDesc,
    TextureFormat, TextureRef,
};
use crate::material::PbrMaterial;
use crate::scene::{DirectionalLight, PointLight, RenderCamera, SceneObject, Skybox, MAX_POINT_LIGHTS};

use frame::{RenderPassData, ShadowData};
use ibl::IblMaps;
use outline::{OutlineSettings, MAX_OUTLINE_SCALE, MIN_OUTLINE_SCALE};
use passes::{PostProcessPipeline, ShadowPass, SHADOW_MAP_RESOLUTION};
use path::{create_render_path, RenderPath, RenderPathType};

/// Shared, single-writer handle to the scene material.
pub type SharedMaterial = Arc<RwLock<PbrMaterial>>;

/// Wrap a material for sharing between the application and the renderer.
#[must_use]
pub fn shared_material(material: PbrMaterial) -> SharedMaterial {
    Arc::new(RwLock::new(material))
}

/// Shader programs the orchestrator wires into its fixed passes. All are
/// compiled by the application's shader layer.
pub struct RendererShaders {
    /// The default lit (PBR) shader. Must be valid — setup aborts otherwise.
    pub default_lit: ShaderRef,
    pub shadow_depth: ShaderRef,
    pub tonemap: ShaderRef,
    pub bloom_extract: ShaderRef,
    pub bloom_blur: ShaderRef,
    pub outline: ShaderRef,
}

struct HdrTarget {
    framebuffer: FramebufferRef,
    color: TextureRef,
    depth: TextureRef,
}

/// Central orchestrator for the rendering pipeline.
pub struct SceneRenderer {
    active_path: Box<dyn RenderPath>,
    path_type: RenderPathType,
    shadow_pass: ShadowPass,
    post_process: PostProcessPipeline,

    hdr: Option<HdrTarget>,
    hdr_enabled: bool,

    default_lit_shader: ShaderRef,
    material: Option<SharedMaterial>,

    // IBL — all three maps or none
    ibl: Option<IblMaps>,
    use_ibl: bool,
    ibl_intensity: f32,

    // Lights, copied from the application each time the setters run
    dir_light: Option<DirectionalLight>,
    point_lights: SmallVec<[PointLight; MAX_POINT_LIGHTS]>,

    // Lower hemisphere fallback
    lower_hemisphere_color: Vec3,
    lower_hemisphere_intensity: f32,

    // Skybox, shared with the application
    skybox: Option<Arc<dyn Skybox>>,
    show_skybox: bool,

    // Stencil outlines
    outline_shader: ShaderRef,
    outline: OutlineSettings,

    clear_color: [f32; 4],

    width: u32,
    height: u32,
}

impl SceneRenderer {
    /// Create the renderer and its fixed passes.
    ///
    /// The one fatal setup condition is an invalid default lit shader; every
    /// other resource failure leaves the matching feature disabled.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        shaders: RendererShaders,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width > 8192 || height > 8192 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        if !shaders.default_lit.is_valid() {
            return Err(RenderError::ShaderInvalid("default lit shader".to_owned()));
        }

        let hdr = create_hdr_target(device, width, height);
        let hdr_enabled = hdr.is_some();

        let shadow_pass = ShadowPass::new(device, shaders.shadow_depth, SHADOW_MAP_RESOLUTION);

        let post_process = PostProcessPipeline::new(
            device,
            shaders.tonemap,
            shaders.bloom_extract,
            shaders.bloom_blur,
            width,
            height,
        );

        let (mut active_path, path_type) = create_render_path(RenderPathType::Forward);
        active_path.on_attach(width, height);

        log::info!("SceneRenderer created: {width}x{height}, path={}", active_path.name());

        Ok(Self {
            active_path,
            path_type,
            shadow_pass,
            post_process,
            hdr,
            hdr_enabled,
            default_lit_shader: shaders.default_lit,
            material: None,
            ibl: None,
            use_ibl: true,
            ibl_intensity: 0.3,
            dir_light: None,
            point_lights: SmallVec::new(),
            lower_hemisphere_color: Vec3::new(0.15, 0.15, 0.2),
            lower_hemisphere_intensity: 0.5,
            skybox: None,
            show_skybox: true,
            outline_shader: shaders.outline,
            outline: OutlineSettings::default(),
            clear_color: [0.1, 0.1, 0.15, 1.0],
            width,
            height,
        })
    }

    /// Execute the full pipeline for one frame.
    pub fn render(&mut self, scene: &[SceneObject], camera: &RenderCamera, device: &mut dyn GraphicsDevice) {
        if !self.hdr_enabled {
            log::debug!("SceneRenderer::render skipped: HDR target unavailable");
            return;
        }
        let Some(hdr) = &self.hdr else {
            return;
        };
        let Some(material) = &self.material else {
            log::debug!("SceneRenderer::render skipped: no material set");
            return;
        };
        if !self.default_lit_shader.is_valid() {
            log::debug!("SceneRenderer::render skipped: default lit shader invalid");
            return;
        }

        // =====================================================================
        // 1. Shadow pass (shared across all render paths)
        // =====================================================================
        let shadow = match (&self.dir_light, self.shadow_pass.is_valid()) {
            (Some(light), true) => self.shadow_pass.process(scene, light, device),
            _ => ShadowData::default(),
        };

        // =====================================================================
        // 2. Main render path (polymorphic dispatch)
        // =====================================================================
        if self.active_path.is_valid() {
            let mut data = RenderPassData {
                scene,
                camera,
                device: &mut *device,
                shadow,
                target: hdr.framebuffer.clone(),
                material: material.as_ref(),
                ibl: self.ibl.as_ref(),
                use_ibl: self.use_ibl,
                ibl_intensity: self.ibl_intensity,
                dir_light: self.dir_light.as_ref(),
                point_lights: &self.point_lights,
                lower_hemisphere_color: self.lower_hemisphere_color,
                lower_hemisphere_intensity: self.lower_hemisphere_intensity,
                clear_color: self.clear_color,
            };
            self.active_path.execute(&mut data);
        }

        // Re-bind the HDR target: the skybox and outline always land there
        // even if the main pass was skipped or unbound it
        hdr.framebuffer.bind();

        // =====================================================================
        // 3. Skybox (into the HDR target, after the main pass)
        // =====================================================================
        if self.show_skybox {
            if let Some(skybox) = &self.skybox {
                skybox.render(camera, device);
            }
        }

        // =====================================================================
        // 4. Stencil outline (into the HDR target)
        // =====================================================================
        outline::render(scene, camera, device, material, &self.outline_shader, &self.outline);

        hdr.framebuffer.unbind();

        // =====================================================================
        // 5. Post-processing (bloom → tone mapping → screen)
        // =====================================================================
        if self.post_process.is_valid() {
            self.post_process
                .process(device, &hdr.color, self.width, self.height);
        }

        // Post-processing leaves depth testing disabled
        device.enable_depth_test();
    }

    // =========================================================================
    // Render path switching
    // =========================================================================

    pub fn set_render_path(&mut self, requested: RenderPathType) {
        if self.path_type == requested {
            return;
        }

        self.active_path.on_detach();

        let (mut path, actual) = create_render_path(requested);
        path.on_attach(self.width, self.height);

        self.active_path = path;
        self.path_type = actual;
        log::info!("Render path switched to: {}", self.active_path.name());
    }

    #[must_use]
    pub fn render_path_type(&self) -> RenderPathType {
        self.path_type
    }

    #[must_use]
    pub fn render_path_name(&self) -> &'static str {
        self.active_path.name()
    }

    /// Path-specific debug UI hook.
    pub fn debug_ui(&mut self) {
        self.active_path.debug_ui();
    }

    // =========================================================================
    // Resize
    // =========================================================================

    /// Recreate the HDR target at the new size. On failure the previous
    /// target and dimensions are restored verbatim — no partial resize is
    /// observable — and the resize is not propagated.
    pub fn on_resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let old_hdr = self.hdr.take();
        let (old_width, old_height) = (self.width, self.height);

        self.width = width;
        self.height = height;
        self.hdr = create_hdr_target(device, width, height);
        self.hdr_enabled = self.hdr.is_some();

        if !self.hdr_enabled {
            // Restore previous resources and dimensions on failure
            self.hdr = old_hdr;
            self.hdr_enabled = self.hdr.is_some();
            self.width = old_width;
            self.height = old_height;
            return;
        }

        self.active_path.on_resize(width, height);
        self.post_process.on_resize(device, width, height);
    }

    // =========================================================================
    // External resource setters
    // =========================================================================

    pub fn set_default_lit_shader(&mut self, shader: ShaderRef) {
        self.default_lit_shader = shader;
    }

    pub fn set_material(&mut self, material: SharedMaterial) {
        self.material = Some(material);
    }

    #[must_use]
    pub fn material(&self) -> Option<&SharedMaterial> {
        self.material.as_ref()
    }

    // IBL

    /// Install (or clear) the IBL triple. All three maps arrive together or
    /// not at all, so a partial set can never be observed.
    pub fn set_ibl_maps(&mut self, maps: Option<IblMaps>) {
        self.ibl = maps;
    }

    pub fn set_use_ibl(&mut self, use_ibl: bool) {
        self.use_ibl = use_ibl;
    }

    pub fn set_ibl_intensity(&mut self, intensity: f32) {
        self.ibl_intensity = intensity;
    }

    #[must_use]
    pub fn use_ibl(&self) -> bool {
        self.use_ibl
    }

    #[must_use]
    pub fn ibl_intensity(&self) -> f32 {
        self.ibl_intensity
    }

    // Lights

    pub fn set_directional_light(&mut self, light: Option<DirectionalLight>) {
        self.dir_light = light;
    }

    /// Copy the point lights for this frame. Slices longer than
    /// [`MAX_POINT_LIGHTS`] are truncated with a warning.
    pub fn set_point_lights(&mut self, lights: &[PointLight]) {
        if lights.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "set_point_lights: {} lights exceed the limit of {MAX_POINT_LIGHTS}, truncating",
                lights.len()
            );
        }
        self.point_lights.clear();
        self.point_lights
            .extend(lights.iter().take(MAX_POINT_LIGHTS).copied());
    }

    // Lower hemisphere

    pub fn set_lower_hemisphere_color(&mut self, color: Vec3) {
        self.lower_hemisphere_color = color;
    }

    pub fn set_lower_hemisphere_intensity(&mut self, intensity: f32) {
        self.lower_hemisphere_intensity = intensity;
    }

    #[must_use]
    pub fn lower_hemisphere_color(&self) -> Vec3 {
        self.lower_hemisphere_color
    }

    #[must_use]
    pub fn lower_hemisphere_intensity(&self) -> f32 {
        self.lower_hemisphere_intensity
    }

    // Skybox

    pub fn set_skybox(&mut self, skybox: Option<Arc<dyn Skybox>>) {
        self.skybox = skybox;
    }

    pub fn set_show_skybox(&mut self, show: bool) {
        self.show_skybox = show;
    }

    #[must_use]
    pub fn show_skybox(&self) -> bool {
        self.show_skybox
    }

    // Stencil outlines

    pub fn set_outline_shader(&mut self, shader: ShaderRef) {
        self.outline_shader = shader;
    }

    pub fn set_enable_outlines(&mut self, enable: bool) {
        self.outline.enabled = enable;
    }

    pub fn set_outline_color(&mut self, color: Vec4) {
        self.outline.color = color;
    }

    /// Outline scale factor, clamped to the supported range.
    pub fn set_outline_scale(&mut self, scale: f32) {
        self.outline.scale = scale.clamp(MIN_OUTLINE_SCALE, MAX_OUTLINE_SCALE);
    }

    pub fn set_selected_object(&mut self, index: Option<usize>) {
        self.outline.selected = index;
    }

    #[must_use]
    pub fn outlines_enabled(&self) -> bool {
        self.outline.enabled
    }

    #[must_use]
    pub fn outline_color(&self) -> Vec4 {
        self.outline.color
    }

    #[must_use]
    pub fn outline_scale(&self) -> f32 {
        self.outline.scale
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<usize> {
        self.outline.selected
    }

    // Clear color

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    #[must_use]
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    // =========================================================================
    // Component access
    // =========================================================================

    #[must_use]
    pub fn post_process(&self) -> &PostProcessPipeline {
        &self.post_process
    }

    #[must_use]
    pub fn post_process_mut(&mut self) -> &mut PostProcessPipeline {
        &mut self.post_process
    }

    #[must_use]
    pub fn shadow_pass(&self) -> &ShadowPass {
        &self.shadow_pass
    }

    // HDR state

    #[must_use]
    pub fn hdr_framebuffer(&self) -> Option<&FramebufferRef> {
        self.hdr.as_ref().map(|h| &h.framebuffer)
    }

    #[must_use]
    pub fn hdr_color_texture(&self) -> Option<&TextureRef> {
        self.hdr.as_ref().map(|h| &h.color)
    }

    #[must_use]
    pub fn hdr_depth_texture(&self) -> Option<&TextureRef> {
        self.hdr.as_ref().map(|h| &h.depth)
    }

    #[must_use]
    pub fn is_hdr_enabled(&self) -> bool {
        self.hdr_enabled
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Create the HDR target: RGB16F color + combined depth/stencil, validated
/// for completeness before use.
fn create_hdr_target(device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Option<HdrTarget> {
    let color = device.create_texture_2d(&TextureDesc::new(width, height, TextureFormat::Rgb16F))?;
    let depth = device.create_texture_2d(&TextureDesc::new(width, height, TextureFormat::Depth24Stencil8))?;

    let framebuffer = device.create_framebuffer(width, height)?;
    framebuffer.attach_color(color.clone(), 0);
    framebuffer.attach_depth_stencil(depth.clone());

    if !framebuffer.is_complete() {
        log::error!("SceneRenderer: HDR framebuffer not complete");
        return None;
    }

    Some(HdrTarget {
        framebuffer,
        color,
        depth,
    })
}
