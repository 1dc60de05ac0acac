//! Error Types
//!
//! The main error type [`RenderError`] covers the failure modes that abort
//! renderer *setup*. Per-frame failures are never surfaced as errors: they
//! degrade to a logged warning plus a disabled feature, communicated through
//! validity flags (`is_valid()`) and `Option` returns.

use thiserror::Error;

/// The main error type for the Prism renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    // ========================================================================
    // Resource Creation Errors
    // ========================================================================
    /// A shader program required at setup time failed to compile or link.
    #[error("Shader program invalid: {0}")]
    ShaderInvalid(String),

    /// A framebuffer failed its completeness check.
    #[error("Framebuffer incomplete: {0}")]
    FramebufferIncomplete(String),

    /// A texture or framebuffer was requested with out-of-range dimensions.
    #[error("Invalid resolution: {width}x{height} (must be 1-8192 per side)")]
    InvalidResolution {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    // ========================================================================
    // Missing Dependency Errors
    // ========================================================================
    /// A collaborator resource the operation cannot proceed without.
    #[error("Missing resource: {0}")]
    MissingResource(String),
}

/// Alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;
