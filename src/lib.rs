#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Prism: a physically-based forward rendering pipeline.
//!
//! The crate is the renderer core only — it shades scenes it is handed
//! through a graphics seam ([`gfx`]) whose concrete device, shaders,
//! textures and framebuffers belong to the application's backend. On top of
//! that seam it provides:
//!
//! - a typed material parameter system and a metallic-roughness PBR material
//!   ([`material`])
//! - one-shot environment precomputation: equirect→cubemap, irradiance,
//!   specular prefiltering and the BRDF lookup table ([`renderer::ibl`])
//! - per-frame passes: shadow mapping, a polymorphic main path, stencil
//!   outlining, bloom and tone-mapping/color-grading post-processing
//! - the [`renderer::SceneRenderer`] orchestrator sequencing it all

pub mod errors;
pub mod gfx;
pub mod material;
pub mod pbr;
pub mod renderer;
pub mod scene;

pub use errors::{RenderError, Result};
pub use gfx::{GraphicsDevice, ShaderProgram, ShaderProgramExt, Texture, UniformValue};
pub use material::{PbrMaterial, RenderMaterial};
pub use pbr::ToneMappingMode;
pub use renderer::frame::{RenderPassData, ShadowData};
pub use renderer::ibl::{EnvironmentPrecompute, EnvironmentShaders, IblMaps};
pub use renderer::passes::{Bloom, PostProcessPipeline, ShadowPass};
pub use renderer::path::{ForwardRenderPath, RenderPath, RenderPathType};
pub use renderer::{shared_material, RendererShaders, SceneRenderer, SharedMaterial};
pub use scene::{DirectionalLight, PointLight, RenderCamera, SceneObject, Skybox, Transform};
