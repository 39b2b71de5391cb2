/// Dice Core Library - lighting, transforms and animation for the dice scene
///
/// This library holds the platform-independent part of the renderer: the
/// analytic lighting model, the nested pivot-rotation composer, the
/// input-driven animation state, and the scene driver that feeds any
/// [`RenderBackend`].

pub mod animation;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod projection;
pub mod scene;
pub mod shader;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationState, Direction, RotationChannel, ROTATION_SPEED};
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use lighting::{DampingFunction, LightModel, ShadingStage, SurfacePoint};
pub use projection::{Camera, ScreenPoint};
pub use scene::{ConfigUpdate, CubeEntity, LightConfig, LightUniforms, RenderBackend, Scene};
pub use transform::{compose_model_view, Transform, TransformComposer};
