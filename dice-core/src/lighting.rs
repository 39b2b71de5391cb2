/// Analytic lighting model shared by the vertex and fragment stages
///
/// Every function here mirrors one function of the GLSL library in
/// [`crate::shader`], so the software rasterizer and the GPU programs shade
/// identically. Selectors are passed as raw integer codes, the same way they
/// arrive in uniforms: unknown codes fall through to the neutral branch.
use nalgebra::{Vector3, Vector4};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Intensity returned whenever a stage or model is inactive
pub const NEUTRAL_LIGHT: f32 = 1.0;

/// Cel shading bands as (threshold, output level), checked top down
pub const CEL_BANDS: [(f32, f32); 3] = [(0.95, 1.0), (0.5, 0.7), (0.2, 0.4)];

/// Level used below the lowest cel band
pub const CEL_FLOOR: f32 = 0.1;

/// Reflectance model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightModel {
    Lambert,
    Phong,
    CelShaded,
}

impl LightModel {
    pub fn code(self) -> i32 {
        match self {
            LightModel::Lambert => 0,
            LightModel::Phong => 1,
            LightModel::CelShaded => 2,
        }
    }

    /// Next model in display order, wrapping around
    pub fn next(self) -> Self {
        match self {
            LightModel::Lambert => LightModel::Phong,
            LightModel::Phong => LightModel::CelShaded,
            LightModel::CelShaded => LightModel::Lambert,
        }
    }
}

impl TryFrom<i32> for LightModel {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(LightModel::Lambert),
            1 => Ok(LightModel::Phong),
            2 => Ok(LightModel::CelShaded),
            other => Err(Error::UnknownLightModel(other)),
        }
    }
}

/// Post-process applied to the evaluated intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DampingFunction {
    None,
    Squared,
}

impl DampingFunction {
    pub fn code(self) -> i32 {
        match self {
            DampingFunction::None => 0,
            DampingFunction::Squared => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            DampingFunction::None => DampingFunction::Squared,
            DampingFunction::Squared => DampingFunction::None,
        }
    }
}

impl TryFrom<i32> for DampingFunction {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(DampingFunction::None),
            1 => Ok(DampingFunction::Squared),
            other => Err(Error::UnknownDampingFunction(other)),
        }
    }
}

/// Which pipeline stage evaluates the lighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingStage {
    Fragment,
    Vertex,
}

impl ShadingStage {
    pub fn code(self) -> i32 {
        match self {
            ShadingStage::Fragment => 0,
            ShadingStage::Vertex => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ShadingStage::Fragment => ShadingStage::Vertex,
            ShadingStage::Vertex => ShadingStage::Fragment,
        }
    }
}

impl TryFrom<i32> for ShadingStage {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(ShadingStage::Fragment),
            1 => Ok(ShadingStage::Vertex),
            other => Err(Error::UnknownShadingStage(other)),
        }
    }
}

/// Geometry of the point being shaded
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    /// Unit normal in view space
    pub normal: Vector3<f32>,
    /// View-space position
    pub position_eye: Vector3<f32>,
    /// Untransformed vertex position
    pub vertex: Vector4<f32>,
}

impl SurfacePoint {
    pub fn new(normal: Vector3<f32>, position_eye: Vector3<f32>, vertex: Vector4<f32>) -> Self {
        Self {
            normal,
            position_eye,
            vertex,
        }
    }
}

pub fn positive_dot(left: &Vector3<f32>, right: &Vector3<f32>) -> f32 {
    left.dot(right).max(0.0)
}

/// Reflect `incident` about `normal` (GLSL `reflect`)
pub fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Effective light direction at an eye-space position
///
/// The configured light vector is treated as an eye-space position, so the
/// default of the origin lights every surface from the camera.
pub fn light_direction_from(light: &Vector3<f32>, position_eye: &Vector3<f32>) -> Vector3<f32> {
    (light - position_eye).normalize()
}

pub fn lambert(normal: &Vector3<f32>, light_dir: &Vector3<f32>, power: f32) -> f32 {
    normal.dot(&light_dir.normalize()).max(0.0) * power
}

pub fn phong(
    normal: &Vector3<f32>,
    light_dir: &Vector3<f32>,
    view_position: &Vector3<f32>,
    power: f32,
    shininess: f32,
) -> f32 {
    let diffuse = positive_dot(normal, light_dir);
    let reflection = reflect(&-light_dir, normal).normalize();
    let specular = positive_dot(&reflection, &-view_position.normalize()).powf(shininess);
    (diffuse + specular) * power
}

pub fn cel_shaded(normal: &Vector3<f32>, light_dir: &Vector3<f32>, power: f32) -> f32 {
    quantize_cel(lambert(normal, light_dir, power))
}

/// Snap an intensity onto the fixed cel bands
pub fn quantize_cel(intensity: f32) -> f32 {
    CEL_BANDS
        .iter()
        .find(|(threshold, _)| intensity >= *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(CEL_FLOOR)
}

/// Evaluate the selected model if `shading` names the `current` stage
///
/// Returns [`NEUTRAL_LIGHT`] when the stage is inactive or the model code is
/// unknown.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_lighting(
    shading: i32,
    current: i32,
    light_model: i32,
    normal: &Vector3<f32>,
    _vertex: &Vector4<f32>,
    light_dir: &Vector3<f32>,
    view_position: &Vector3<f32>,
    power: f32,
    shininess: f32,
) -> f32 {
    if shading != current {
        return NEUTRAL_LIGHT;
    }
    match light_model {
        0 => lambert(normal, light_dir, power),
        1 => phong(normal, light_dir, view_position, power, shininess),
        2 => cel_shaded(normal, light_dir, power),
        _ => NEUTRAL_LIGHT,
    }
}

/// [`evaluate_lighting`] for a [`SurfacePoint`], with the light direction
/// derived from `light` and the surface's eye-space position
#[allow(clippy::too_many_arguments)]
pub fn shade_point(
    shading: i32,
    current: i32,
    light_model: i32,
    damping: i32,
    point: &SurfacePoint,
    light: &Vector3<f32>,
    power: f32,
    shininess: f32,
) -> f32 {
    let light_dir = light_direction_from(light, &point.position_eye);
    let intensity = evaluate_lighting(
        shading,
        current,
        light_model,
        &point.normal,
        &point.vertex,
        &light_dir,
        &point.position_eye,
        power,
        shininess,
    );
    damp_light(damping, intensity)
}

pub fn damp_light(damping_function: i32, light: f32) -> f32 {
    match damping_function {
        1 => light * light,
        _ => light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Vector4<f32> {
        Vector4::new(0.0, 0.0, 0.0, 1.0)
    }

    fn eval(model: i32, normal: Vector3<f32>, light: Vector3<f32>) -> f32 {
        evaluate_lighting(
            1,
            1,
            model,
            &normal,
            &origin(),
            &light,
            &Vector3::new(0.0, 0.0, -5.0),
            1.0,
            16.0,
        )
    }

    #[test]
    fn test_lambert_facing_and_away() {
        let light = Vector3::new(0.0, 0.0, 1.0);
        assert!((lambert(&Vector3::new(0.0, 0.0, 1.0), &light, 1.0) - 1.0).abs() < 1e-6);
        assert_eq!(lambert(&Vector3::new(0.0, 0.0, -1.0), &light, 1.0), 0.0);
    }

    #[test]
    fn test_lambert_bounded_by_power() {
        let light = Vector3::new(1.0, 2.0, 3.0).normalize();
        for i in 0..32 {
            let angle = i as f32 * 0.2;
            let normal = Vector3::new(angle.cos(), angle.sin(), (angle * 0.5).sin()).normalize();
            let value = lambert(&normal, &light, 2.5);
            assert!((0.0..=2.5 + 1e-6).contains(&value));
            if normal.dot(&light) <= 0.0 {
                assert_eq!(value, 0.0);
            }
        }
    }

    #[test]
    fn test_lambert_normalizes_light_vector() {
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let value = lambert(&normal, &Vector3::new(0.0, 10.0, 0.0), 0.5);
        assert!((value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cel_levels() {
        let allowed = [1.0, 0.7, 0.4, 0.1];
        for i in 0..=100 {
            let level = quantize_cel(i as f32 / 100.0);
            assert!(allowed.contains(&level), "unexpected level {level}");
        }
        assert_eq!(quantize_cel(0.95), 1.0);
        assert_eq!(quantize_cel(0.94), 0.7);
        assert_eq!(quantize_cel(0.5), 0.7);
        assert_eq!(quantize_cel(0.2), 0.4);
        assert_eq!(quantize_cel(0.19), 0.1);
        assert_eq!(quantize_cel(0.0), 0.1);
    }

    #[test]
    fn test_cel_back_face_gets_floor() {
        let value = eval(2, Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(value, CEL_FLOOR);
    }

    #[test]
    fn test_phong_head_on_adds_full_specular() {
        // Light and eye both straight ahead of the surface
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let position = Vector3::new(0.0, 0.0, -5.0);
        let value = phong(&normal, &light_dir, &position, 1.0, 16.0);
        assert!((value - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_phong_grazing_has_no_specular() {
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let position = Vector3::new(0.0, 0.0, -5.0);
        let value = phong(&normal, &light_dir, &position, 1.0, 16.0);
        assert!(value.abs() < 1e-6);
    }

    #[test]
    fn test_reflect_matches_glsl() {
        let incident = Vector3::new(1.0, -1.0, 0.0);
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let reflected = reflect(&incident, &normal);
        assert!((reflected - Vector3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_inactive_stage_is_neutral() {
        let value = evaluate_lighting(
            0,
            1,
            0,
            &Vector3::new(0.0, 0.0, -1.0),
            &origin(),
            &Vector3::new(0.0, 0.0, 1.0),
            &Vector3::zeros(),
            1.0,
            16.0,
        );
        assert_eq!(value, NEUTRAL_LIGHT);
    }

    #[test]
    fn test_unknown_model_is_neutral() {
        let value = eval(7, Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(value, NEUTRAL_LIGHT);
        let value = eval(-1, Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(value, NEUTRAL_LIGHT);
    }

    #[test]
    fn test_damping() {
        for x in [0.0_f32, 0.3, 1.0, 1.7, -2.0] {
            assert_eq!(damp_light(0, x), x);
            assert_eq!(damp_light(1, x), x * x);
            assert_eq!(damp_light(5, x), x);
        }
    }

    #[test]
    fn test_light_direction_from_origin() {
        let dir = light_direction_from(&Vector3::zeros(), &Vector3::new(0.0, 0.0, -10.0));
        assert!((dir - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_shade_point_applies_damping() {
        let point = SurfacePoint::new(
            Vector3::new(0.0, 0.6, 0.8),
            Vector3::new(0.0, 0.0, -10.0),
            origin(),
        );
        let plain = shade_point(1, 1, 0, 0, &point, &Vector3::zeros(), 1.0, 16.0);
        let damped = shade_point(1, 1, 0, 1, &point, &Vector3::zeros(), 1.0, 16.0);
        assert!((plain - 0.8).abs() < 1e-6);
        assert!((damped - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_codes_round_trip() {
        for model in [LightModel::Lambert, LightModel::Phong, LightModel::CelShaded] {
            assert_eq!(LightModel::try_from(model.code()).ok(), Some(model));
        }
        assert!(LightModel::try_from(3).is_err());
        assert!(DampingFunction::try_from(2).is_err());
        assert_eq!(ShadingStage::try_from(1).ok(), Some(ShadingStage::Vertex));
        assert_eq!(LightModel::CelShaded.next(), LightModel::Lambert);
        assert_eq!(ShadingStage::Vertex.toggle(), ShadingStage::Fragment);
    }
}
