/// The dice scene: light configuration, the three cubes, and the per-frame
/// driver that hands them to a render backend
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::animation::AnimationState;
use crate::geometry::Mesh;
use crate::lighting::{DampingFunction, LightModel, ShadingStage};
use crate::transform::TransformComposer;

/// Camera position handed to backends as `uViewPosition`
pub const VIEW_POSITION: [f32; 3] = [0.0, 0.0, 10.0];

/// Shininess the interactive controls use
pub const DEFAULT_SHININESS: f32 = 16.0;

/// Lighting parameters shared by every cube for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub power: f32,
    /// Eye-space point the light direction is computed against
    pub direction: Vector3<f32>,
    pub shininess: f32,
    pub model: LightModel,
    pub damping: DampingFunction,
    pub shading: ShadingStage,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            power: 1.0,
            direction: Vector3::zeros(),
            shininess: DEFAULT_SHININESS,
            model: LightModel::Lambert,
            damping: DampingFunction::None,
            shading: ShadingStage::Fragment,
        }
    }
}

/// One field change coming from the controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigUpdate {
    Power(f32),
    Direction(Vector3<f32>),
    Shininess(f32),
    Model(LightModel),
    Damping(DampingFunction),
    Shading(ShadingStage),
}

impl LightConfig {
    pub fn apply(&mut self, update: ConfigUpdate) {
        tracing::debug!(?update, "light config updated");
        match update {
            ConfigUpdate::Power(power) => self.power = power,
            ConfigUpdate::Direction(direction) => self.direction = direction,
            ConfigUpdate::Shininess(shininess) => self.shininess = shininess,
            ConfigUpdate::Model(model) => self.model = model,
            ConfigUpdate::Damping(damping) => self.damping = damping,
            ConfigUpdate::Shading(shading) => self.shading = shading,
        }
    }

    /// Raw values as bound to the shading programs
    pub fn uniforms(&self) -> LightUniforms {
        LightUniforms {
            light_power: self.power,
            light_direction: self.direction.into(),
            damping_function: self.damping.code(),
            light_model: self.model.code(),
            shading: self.shading.code(),
            light_shininess: self.shininess,
            view_position: VIEW_POSITION,
        }
    }
}

/// Uniform values for one frame, selectors kept as integer codes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniforms {
    pub light_power: f32,
    pub light_direction: [f32; 3],
    pub damping_function: i32,
    pub light_model: i32,
    pub shading: i32,
    pub light_shininess: f32,
    pub view_position: [f32; 3],
}

/// A single die resting on the pedestal
#[derive(Debug, Clone)]
pub struct CubeEntity {
    pub base_position: Vector3<f32>,
    pub size: f32,
    /// Unpremultiplied RGBA
    pub color: Vector4<f32>,
    pub mesh: Mesh,
}

impl CubeEntity {
    pub fn new(size: f32, color: Vector4<f32>, base_position: Vector3<f32>) -> Self {
        Self {
            base_position,
            size,
            color,
            mesh: Mesh::cube(size),
        }
    }

    /// The three dice of the default scene: center, left, right
    pub fn default_dice() -> Vec<CubeEntity> {
        vec![
            CubeEntity::new(
                1.0,
                Vector4::new(221.0 / 255.0, 1.0, 0.0, 1.0),
                Vector3::new(0.0, 0.0, -10.0),
            ),
            CubeEntity::new(
                0.9,
                Vector4::new(192.0 / 255.0, 192.0 / 255.0, 192.0 / 255.0, 1.0),
                Vector3::new(-1.9, -0.1, -10.0),
            ),
            CubeEntity::new(
                0.8,
                Vector4::new(166.0 / 255.0, 124.0 / 255.0, 0.0, 1.0),
                Vector3::new(1.8, -0.2, -10.0),
            ),
        ]
    }
}

/// Target of the per-frame draw calls
pub trait RenderBackend {
    type Error;

    fn begin_frame(&mut self, projection: &Matrix4<f32>) -> Result<(), Self::Error>;

    fn draw_cube(
        &mut self,
        cube: &CubeEntity,
        model_view: &Matrix4<f32>,
        uniforms: &LightUniforms,
    ) -> Result<(), Self::Error>;

    fn end_frame(&mut self) -> Result<(), Self::Error>;
}

/// Owns the dice, their animation and the light; draws one frame at a time
#[derive(Debug, Clone)]
pub struct Scene {
    pub cubes: Vec<CubeEntity>,
    pub animation: AnimationState,
    pub light: LightConfig,
    pub composer: TransformComposer,
}

impl Scene {
    pub fn new(cubes: Vec<CubeEntity>, light: LightConfig) -> Self {
        Self {
            cubes,
            animation: AnimationState::default(),
            light,
            composer: TransformComposer::default(),
        }
    }

    pub fn model_view(&self, cube: &CubeEntity) -> Matrix4<f32> {
        self.composer.compose(&cube.base_position, self.animation.angles())
    }

    /// Draw every cube with the current state, then advance the animation
    ///
    /// A backend error aborts the frame before the animation ticks.
    pub fn render_frame<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        projection: &Matrix4<f32>,
    ) -> Result<(), B::Error> {
        let uniforms = self.light.uniforms();
        backend.begin_frame(projection)?;
        for cube in &self.cubes {
            let model_view = self.model_view(cube);
            backend.draw_cube(cube, &model_view, &uniforms)?;
        }
        backend.end_frame()?;
        self.animation.tick();
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CubeEntity::default_dice(), LightConfig::default())
    }
}
