//! Recording stubs for driving the pipeline without a GPU.
//!
//! The device, shaders, textures and framebuffers all write into one shared
//! event log, so tests can assert on call order, state restoration and
//! resource usage.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use prism::gfx::{
    BlendFactor, CompareFunc, CubeFace, CullFace, Framebuffer, FramebufferRef, GraphicsDevice,
    Mesh, ShaderProgram, ShaderRef, StencilOp, Texture, TextureDesc, TextureFormat, TextureKind,
    TextureRef, UniformValue,
};

/// Initialize env_logger once for a test binary; repeated calls are no-ops.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Clear([f32; 4]),
    ClearDepth,
    ClearStencil,
    SetViewport(i32, i32, u32, u32),
    PushViewport,
    PopViewport,
    EnableDepthTest,
    DisableDepthTest,
    SetDepthFunc(CompareFunc),
    SetDepthMask(bool),
    EnableStencilTest,
    DisableStencilTest,
    SetStencilFunc(CompareFunc, i32, u32),
    SetStencilOp(StencilOp, StencilOp, StencilOp),
    SetStencilMask(u32),
    EnableBlending,
    DisableBlending,
    SetBlendFunc(BlendFactor, BlendFactor),
    EnableFaceCulling,
    DisableFaceCulling,
    SetCullFace(CullFace),
    EnablePolygonOffset(f32, f32),
    DisablePolygonOffset,
    BindMesh(u64),
    DrawMesh(u32),
    DrawFullscreenQuad,
    DrawUnitCube,
    BindFramebuffer(u64),
    UnbindFramebuffer(u64),
    BindTexture { texture: u64, unit: u32 },
    GenerateMipmaps(u64),
    AttachCubemapFace { framebuffer: u64, texture: u64, face: usize, mip: u32 },
    BindShader(String),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

// ============================================================================
// Shader stub
// ============================================================================

/// Records every bind and uniform upload.
pub struct RecordingShader {
    pub name: String,
    pub valid: bool,
    pub bind_count: Cell<u32>,
    uniforms: RefCell<HashMap<String, UniformValue>>,
    history: RefCell<Vec<(String, UniformValue)>>,
    log: RefCell<Option<EventLog>>,
}

impl RecordingShader {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            valid: true,
            bind_count: Cell::new(0),
            uniforms: RefCell::new(HashMap::new()),
            history: RefCell::new(Vec::new()),
            log: RefCell::new(None),
        })
    }

    pub fn new_invalid(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            valid: false,
            bind_count: Cell::new(0),
            uniforms: RefCell::new(HashMap::new()),
            history: RefCell::new(Vec::new()),
            log: RefCell::new(None),
        })
    }

    /// Route bind events into a device's log.
    pub fn attach_log(&self, log: &EventLog) {
        *self.log.borrow_mut() = Some(log.clone());
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.borrow().get(name).copied()
    }

    /// All uploads of `name`, in order.
    pub fn uploads_of(&self, name: &str) -> Vec<UniformValue> {
        self.history
            .borrow()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn upload_count(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }
}

impl ShaderProgram for RecordingShader {
    fn bind(&self) {
        self.bind_count.set(self.bind_count.get() + 1);
        if let Some(log) = self.log.borrow().as_ref() {
            log.borrow_mut().push(Event::BindShader(self.name.clone()));
        }
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn set_uniform(&self, name: &str, value: UniformValue) {
        self.uniforms.borrow_mut().insert(name.to_owned(), value);
        self.history.borrow_mut().push((name.to_owned(), value));
    }
}

pub fn shader_ref(shader: &Arc<RecordingShader>) -> ShaderRef {
    shader.clone()
}

// ============================================================================
// Texture / framebuffer / mesh stubs
// ============================================================================

pub struct StubTexture {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub kind: TextureKind,
    log: EventLog,
}

impl Texture for StubTexture {
    fn bind(&self, unit: u32) {
        self.log.borrow_mut().push(Event::BindTexture {
            texture: self.id,
            unit,
        });
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn kind(&self) -> TextureKind {
        self.kind
    }

    fn generate_mipmaps(&self) {
        self.log.borrow_mut().push(Event::GenerateMipmaps(self.id));
    }
}

pub struct StubFramebuffer {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub complete: Cell<bool>,
    log: EventLog,
}

impl Framebuffer for StubFramebuffer {
    fn bind(&self) {
        self.log.borrow_mut().push(Event::BindFramebuffer(self.id));
    }

    fn unbind(&self) {
        self.log.borrow_mut().push(Event::UnbindFramebuffer(self.id));
    }

    fn attach_color(&self, _texture: TextureRef, _slot: u32) {}

    fn attach_depth(&self, _texture: TextureRef) {}

    fn attach_depth_stencil(&self, _texture: TextureRef) {}

    fn attach_cubemap_face(&self, texture: &TextureRef, face: CubeFace, mip: u32) {
        // The stub can't see the texture id through the trait object, so it
        // records width as a stand-in identity.
        self.log.borrow_mut().push(Event::AttachCubemapFace {
            framebuffer: self.id,
            texture: u64::from(texture.width()),
            face: face.index(),
            mip,
        });
    }

    fn is_complete(&self) -> bool {
        self.complete.get()
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

pub struct StubMesh {
    pub id: u64,
    log: EventLog,
}

impl Mesh for StubMesh {
    fn bind(&self) {
        self.log.borrow_mut().push(Event::BindMesh(self.id));
    }

    fn index_count(&self) -> u32 {
        36
    }
}

// ============================================================================
// Recording device
// ============================================================================

pub struct RecordingDevice {
    log: EventLog,
    next_id: u64,
    viewport: (i32, i32, u32, u32),
    viewport_stack: Vec<(i32, i32, u32, u32)>,
    depth_test: bool,
    /// When set, created framebuffers report incomplete.
    pub fail_framebuffers: bool,
    /// When set, texture factories return `None`.
    pub fail_textures: bool,
    /// Byte length of the last `*_with_data` upload.
    pub last_upload_len: Option<usize>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            next_id: 1,
            viewport: (0, 0, 1280, 720),
            viewport_stack: Vec::new(),
            depth_test: true,
            fail_framebuffers: false,
            fail_textures: false,
            last_upload_len: None,
        }
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn clear_events(&mut self) {
        self.log.borrow_mut().clear();
    }

    pub fn make_mesh(&mut self, id: u64) -> Arc<StubMesh> {
        Arc::new(StubMesh {
            id,
            log: self.log.clone(),
        })
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn clear(&mut self, color: [f32; 4]) {
        self.push(Event::Clear(color));
    }

    fn clear_depth(&mut self) {
        self.push(Event::ClearDepth);
    }

    fn clear_stencil(&mut self) {
        self.push(Event::ClearStencil);
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        self.push(Event::SetViewport(x, y, width, height));
    }

    fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    fn push_viewport(&mut self) {
        self.viewport_stack.push(self.viewport);
        self.push(Event::PushViewport);
    }

    fn pop_viewport(&mut self) {
        if let Some(viewport) = self.viewport_stack.pop() {
            self.viewport = viewport;
        }
        self.push(Event::PopViewport);
    }

    fn enable_depth_test(&mut self) {
        self.depth_test = true;
        self.push(Event::EnableDepthTest);
    }

    fn disable_depth_test(&mut self) {
        self.depth_test = false;
        self.push(Event::DisableDepthTest);
    }

    fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    fn set_depth_func(&mut self, func: CompareFunc) {
        self.push(Event::SetDepthFunc(func));
    }

    fn set_depth_mask(&mut self, write: bool) {
        self.push(Event::SetDepthMask(write));
    }

    fn enable_stencil_test(&mut self) {
        self.push(Event::EnableStencilTest);
    }

    fn disable_stencil_test(&mut self) {
        self.push(Event::DisableStencilTest);
    }

    fn set_stencil_func(&mut self, func: CompareFunc, reference: i32, mask: u32) {
        self.push(Event::SetStencilFunc(func, reference, mask));
    }

    fn set_stencil_op(&mut self, stencil_fail: StencilOp, depth_fail: StencilOp, depth_pass: StencilOp) {
        self.push(Event::SetStencilOp(stencil_fail, depth_fail, depth_pass));
    }

    fn set_stencil_mask(&mut self, mask: u32) {
        self.push(Event::SetStencilMask(mask));
    }

    fn enable_blending(&mut self) {
        self.push(Event::EnableBlending);
    }

    fn disable_blending(&mut self) {
        self.push(Event::DisableBlending);
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.push(Event::SetBlendFunc(src, dst));
    }

    fn enable_face_culling(&mut self) {
        self.push(Event::EnableFaceCulling);
    }

    fn disable_face_culling(&mut self) {
        self.push(Event::DisableFaceCulling);
    }

    fn set_cull_face(&mut self, face: CullFace) {
        self.push(Event::SetCullFace(face));
    }

    fn enable_polygon_offset(&mut self, factor: f32, units: f32) {
        self.push(Event::EnablePolygonOffset(factor, units));
    }

    fn disable_polygon_offset(&mut self) {
        self.push(Event::DisablePolygonOffset);
    }

    fn draw_mesh(&mut self, mesh: &dyn Mesh) {
        mesh.bind();
        self.push(Event::DrawMesh(mesh.index_count()));
    }

    fn draw_fullscreen_quad(&mut self) {
        self.push(Event::DrawFullscreenQuad);
    }

    fn draw_unit_cube(&mut self) {
        self.push(Event::DrawUnitCube);
    }

    fn create_texture_2d(&mut self, desc: &TextureDesc) -> Option<TextureRef> {
        if self.fail_textures {
            return None;
        }
        let id = self.alloc_id();
        Some(Arc::new(StubTexture {
            id,
            width: desc.width,
            height: desc.height,
            kind: TextureKind::D2,
            log: self.log.clone(),
        }))
    }

    fn create_texture_2d_with_data(&mut self, desc: &TextureDesc, data: &[u8]) -> Option<TextureRef> {
        self.last_upload_len = Some(data.len());
        self.create_texture_2d(desc)
    }

    fn create_cubemap(&mut self, resolution: u32, _format: TextureFormat, _mip_levels: u32) -> Option<TextureRef> {
        if self.fail_textures {
            return None;
        }
        let id = self.alloc_id();
        Some(Arc::new(StubTexture {
            id,
            width: resolution,
            height: resolution,
            kind: TextureKind::Cubemap,
            log: self.log.clone(),
        }))
    }

    fn create_texture_3d_with_data(&mut self, size: u32, _format: TextureFormat, data: &[u8]) -> Option<TextureRef> {
        if self.fail_textures {
            return None;
        }
        self.last_upload_len = Some(data.len());
        let id = self.alloc_id();
        Some(Arc::new(StubTexture {
            id,
            width: size,
            height: size,
            kind: TextureKind::D3,
            log: self.log.clone(),
        }))
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Option<FramebufferRef> {
        let id = self.alloc_id();
        Some(Arc::new(StubFramebuffer {
            id,
            width,
            height,
            complete: Cell::new(!self.fail_framebuffers),
            log: self.log.clone(),
        }))
    }
}
