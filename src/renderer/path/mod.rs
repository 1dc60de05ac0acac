//! Render path strategies.
//!
//! A [`RenderPath`] is the swappable main-pass strategy: Forward today,
//! Forward+ and Deferred reserved. The factory substitutes Forward with a
//! logged warning for the reserved tags rather than silently aliasing them.

pub mod forward;

use super::frame::RenderPassData;

pub use forward::ForwardRenderPath;

/// Render path selection for runtime switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderPathType {
    #[default]
    Forward,
    /// Reserved: tiled light culling. Currently falls back to Forward.
    ForwardPlus,
    /// Reserved: G-buffer lighting. Currently falls back to Forward.
    Deferred,
}

impl std::fmt::Display for RenderPathType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RenderPathType::Forward => "Forward",
            RenderPathType::ForwardPlus => "Forward+",
            RenderPathType::Deferred => "Deferred",
        })
    }
}

/// A main-pass rendering strategy.
///
/// The orchestrator delegates the shading of one frame to the active path;
/// paths own any path-specific resources between `on_attach` and
/// `on_detach`.
pub trait RenderPath {
    /// Initialize path-specific resources at the given target size.
    fn on_attach(&mut self, width: u32, height: u32);

    /// Release path-specific resources when switching away.
    fn on_detach(&mut self);

    /// Shade one frame into the packet's target framebuffer.
    fn execute(&mut self, data: &mut RenderPassData<'_>);

    /// Whether this path requires a depth/normal prepass.
    /// Forward: no. Forward+: yes (tile culling). Deferred: no (G-buffer).
    fn needs_depth_prepass(&self) -> bool;

    /// Handle target resize.
    fn on_resize(&mut self, width: u32, height: u32);

    /// Path-specific debug UI hook (tile heatmaps, G-buffer views).
    fn debug_ui(&mut self) {}

    /// Human-readable name for UI and logging.
    fn name(&self) -> &'static str;

    fn path_type(&self) -> RenderPathType;

    /// Whether the path initialized and is ready to execute.
    fn is_valid(&self) -> bool;
}

/// Construct the strategy for `requested`. Reserved types fall back to
/// Forward with a logged warning; the returned type is the one actually
/// instantiated.
#[must_use]
pub fn create_render_path(requested: RenderPathType) -> (Box<dyn RenderPath>, RenderPathType) {
    match requested {
        RenderPathType::Forward => (Box::new(ForwardRenderPath::new()), RenderPathType::Forward),
        RenderPathType::ForwardPlus => {
            log::warn!("Forward+ not yet implemented, falling back to Forward");
            (Box::new(ForwardRenderPath::new()), RenderPathType::Forward)
        }
        RenderPathType::Deferred => {
            log::warn!("Deferred not yet implemented, falling back to Forward");
            (Box::new(ForwardRenderPath::new()), RenderPathType::Forward)
        }
    }
}
