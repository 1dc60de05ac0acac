//! Camera state as consumed by the pipeline.

use glam::{Mat4, Vec3};

/// The per-frame camera snapshot a render path shades with.
///
/// The application's camera controller is a collaborator; the pipeline only
/// needs the resolved matrices and world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCamera {
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
    pub position: Vec3,
}

impl RenderCamera {
    #[must_use]
    pub fn new(view_matrix: Mat4, projection_matrix: Mat4, position: Vec3) -> Self {
        Self {
            view_matrix,
            projection_matrix,
            position,
        }
    }

    /// Convenience constructor for a perspective camera looking at a target.
    #[must_use]
    pub fn look_at(position: Vec3, target: Vec3, fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            view_matrix: Mat4::look_at_rh(position, target, Vec3::Y),
            projection_matrix: Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far),
            position,
        }
    }
}

impl Default for RenderCamera {
    fn default() -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            position: Vec3::ZERO,
        }
    }
}
