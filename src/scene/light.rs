//! Light sources consumed by the render paths.

use glam::Vec3;

/// Maximum number of point lights the forward path uploads per frame.
/// Longer slices are truncated with a logged warning.
pub const MAX_POINT_LIGHTS: usize = 4;

/// A light source infinitely far away (sun). All rays are parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light is traveling (not necessarily normalized).
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
        }
    }
}

impl DirectionalLight {
    #[must_use]
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_color(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            ambient: color * 0.2,
            diffuse: color * 0.8,
            specular: color,
        }
    }

    /// Normalized travel direction, as uploaded to shaders.
    #[must_use]
    pub fn normalized_direction(&self) -> Vec3 {
        self.direction.normalize()
    }
}

/// A light source radiating from a point, with distance attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl PointLight {
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_color(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            ambient: color * 0.1,
            diffuse: color * 0.8,
            specular: color,
            ..Default::default()
        }
    }
}
