//! Graphics seam: the abstractions the pipeline renders through.
//!
//! Everything in here is a collaborator contract — the concrete device,
//! shader compiler, textures and framebuffers live with the application's
//! backend. The pipeline is written entirely against these traits, which is
//! also what makes it testable with recording stubs.

pub mod device;
pub mod framebuffer;
pub mod shader;
pub mod state;
pub mod texture;

pub use device::{GraphicsDevice, Mesh, MeshRef};
pub use framebuffer::{Framebuffer, FramebufferRef};
pub use shader::{ShaderProgram, ShaderProgramExt, ShaderRef, UniformValue};
pub use state::{
    BlendFactor, CompareFunc, CubeFace, CullFace, StencilOp, TextureDesc, TextureFilter,
    TextureFormat, TextureWrap,
};
pub use texture::{Texture, TextureKind, TextureRef};
