//! Scene-facing data types: lights, camera snapshot, renderable objects.

pub mod camera;
pub mod light;
pub mod object;

pub use camera::RenderCamera;
pub use light::{DirectionalLight, PointLight, MAX_POINT_LIGHTS};
pub use object::{SceneObject, Skybox, Transform};
