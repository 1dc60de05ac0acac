//! Shader program abstraction.
//!
//! The pipeline treats a compiled shader program as an opaque object with
//! three capabilities: bind, validity query, and named-uniform upload. The
//! uniform value itself is a closed sum type so upload sites dispatch on the
//! tag instead of on overloads.

use std::sync::Arc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// A typed uniform value.
///
/// This is also the material parameter value type: a material parameter is
/// exactly "a uniform waiting to be uploaded".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    /// Human-readable tag name, for logging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            UniformValue::Float(_) => "float",
            UniformValue::Int(_) => "int",
            UniformValue::Bool(_) => "bool",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat3(_) => "mat3",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self {
        UniformValue::Mat3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

/// An opaque, externally compiled shader program.
///
/// Implementations live with the application's graphics backend; tests
/// inject recording stubs.
pub trait ShaderProgram {
    /// Make this program the active one.
    fn bind(&self);

    /// Whether the program compiled and linked successfully.
    fn is_valid(&self) -> bool;

    /// Upload a named uniform. Unknown names are an implementation-side
    /// no-op, matching how GL treats unresolved uniform locations.
    fn set_uniform(&self, name: &str, value: UniformValue);
}

/// Shared shader program handle.
pub type ShaderRef = Arc<dyn ShaderProgram>;

/// Typed upload sugar over [`ShaderProgram::set_uniform`].
pub trait ShaderProgramExt {
    fn set_f32(&self, name: &str, value: f32);
    fn set_i32(&self, name: &str, value: i32);
    fn set_bool(&self, name: &str, value: bool);
    fn set_vec2(&self, name: &str, value: Vec2);
    fn set_vec3(&self, name: &str, value: Vec3);
    fn set_vec4(&self, name: &str, value: Vec4);
    fn set_mat3(&self, name: &str, value: Mat3);
    fn set_mat4(&self, name: &str, value: Mat4);
}

impl<S: ShaderProgram + ?Sized> ShaderProgramExt for S {
    fn set_f32(&self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_i32(&self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_vec2(&self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_mat3(&self, name: &str, value: Mat3) {
        self.set_uniform(name, UniformValue::Mat3(value));
    }

    fn set_mat4(&self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }
}
