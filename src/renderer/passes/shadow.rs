//! Directional shadow map generation.

use glam::{Mat4, Vec3};

use crate::gfx::{
    Framebuffer, FramebufferRef, GraphicsDevice, ShaderProgram, ShaderProgramExt, ShaderRef,
    TextureDesc, TextureFormat, TextureRef, TextureWrap,
};
use crate::renderer::frame::ShadowData;
use crate::scene::{DirectionalLight, SceneObject};

/// Default shadow map resolution.
pub const SHADOW_MAP_RESOLUTION: u32 = 2048;

/// Half-extent of the light-space orthographic volume.
const ORTHO_EXTENT: f32 = 15.0;

/// Distance the virtual light position is pulled back along its direction.
const LIGHT_DISTANCE: f32 = 15.0;

/// Polygon offset applied while rendering shadow depth, against acne.
const POLYGON_OFFSET: (f32, f32) = (2.0, 4.0);

/// Light-space transform for a directional light: an orthographic projection
/// composed with a look-at from a virtual position back along the light
/// direction. The "up" axis switches to +Z when the light is near vertical
/// so the view matrix stays non-degenerate.
#[must_use]
pub fn light_space_matrix(light: &DirectionalLight) -> Mat4 {
    let light_dir = light.normalized_direction();
    let light_pos = -light_dir * LIGHT_DISTANCE;

    let mut up = Vec3::Y;
    if light_dir.dot(up).abs() > 0.999 {
        up = Vec3::Z;
    }

    let view = Mat4::look_at_rh(light_pos, Vec3::ZERO, up);
    let projection = Mat4::orthographic_rh_gl(
        -ORTHO_EXTENT,
        ORTHO_EXTENT,
        -ORTHO_EXTENT,
        ORTHO_EXTENT,
        0.1,
        30.0,
    );

    projection * view
}

/// Depth-only light-space render producing a shadow map + light-space
/// matrix per frame.
///
/// The depth texture is border-clamped with a white border so silhouette
/// edges sample as lit.
pub struct ShadowPass {
    framebuffer: Option<FramebufferRef>,
    depth_texture: Option<TextureRef>,
    shader: ShaderRef,
    resolution: u32,
    valid: bool,
}

impl ShadowPass {
    /// Create the pass. On any resource failure the pass marks itself
    /// invalid and every `process` call becomes a guarded no-op.
    pub fn new(device: &mut dyn GraphicsDevice, shader: ShaderRef, resolution: u32) -> Self {
        let mut pass = Self {
            framebuffer: None,
            depth_texture: None,
            shader,
            resolution,
            valid: false,
        };

        let desc = TextureDesc::new(resolution, resolution, TextureFormat::Depth24)
            .with_wrap(TextureWrap::ClampToBorder)
            .with_border_color([1.0, 1.0, 1.0, 1.0]);

        let Some(depth_texture) = device.create_texture_2d(&desc) else {
            log::error!("ShadowPass: failed to create depth texture");
            return pass;
        };

        let Some(framebuffer) = device.create_framebuffer(resolution, resolution) else {
            log::error!("ShadowPass: failed to create framebuffer");
            return pass;
        };
        framebuffer.attach_depth(depth_texture.clone());

        if !framebuffer.is_complete() {
            log::error!("ShadowPass: framebuffer not complete");
            return pass;
        }

        if !pass.shader.is_valid() {
            log::error!("ShadowPass: shadow depth shader is invalid");
            return pass;
        }

        pass.framebuffer = Some(framebuffer);
        pass.depth_texture = Some(depth_texture);
        pass.valid = true;
        log::info!("ShadowPass created: {resolution}x{resolution}");
        pass
    }

    /// Render every renderable scene object's depth from the light's point
    /// of view. Returns a default (invalid) result if the pass never
    /// initialized.
    pub fn process(
        &self,
        scene: &[SceneObject],
        light: &DirectionalLight,
        device: &mut dyn GraphicsDevice,
    ) -> ShadowData {
        let (Some(framebuffer), Some(depth_texture)) = (&self.framebuffer, &self.depth_texture) else {
            log::error!("ShadowPass::process called on invalid instance");
            return ShadowData::default();
        };
        if !self.valid {
            log::error!("ShadowPass::process called on invalid instance");
            return ShadowData::default();
        }

        let light_space = light_space_matrix(light);

        device.push_viewport();
        framebuffer.bind();
        device.set_viewport(0, 0, self.resolution, self.resolution);
        device.clear_depth();

        device.enable_polygon_offset(POLYGON_OFFSET.0, POLYGON_OFFSET.1);

        self.shader.bind();
        self.shader.set_mat4("u_LightSpaceMatrix", light_space);

        for obj in scene {
            let Some(mesh) = obj.mesh.as_ref().filter(|_| obj.active) else {
                continue;
            };
            self.shader.set_mat4("u_Model", obj.transform.model_matrix());
            device.draw_mesh(mesh.as_ref());
        }

        device.disable_polygon_offset();
        framebuffer.unbind();
        device.pop_viewport();

        ShadowData {
            shadow_map: Some(depth_texture.clone()),
            light_space_matrix: light_space,
            valid: true,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    #[must_use]
    pub fn shadow_map(&self) -> Option<&TextureRef> {
        self.depth_texture.as_ref()
    }
}
