//! End-to-end checks across animation, transforms and lighting

use dice_core::lighting::{self, evaluate_lighting};
use dice_core::{
    compose_model_view, AnimationState, CubeEntity, LightConfig, LightModel, RotationChannel,
    Transform, ROTATION_SPEED,
};
use nalgebra::{Vector3, Vector4};

#[test]
fn animation_ticks_without_wraparound() {
    let mut state = AnimationState::new(RotationChannel::SelfSpin);
    state.set_channel_speed(RotationChannel::SelfSpin, ROTATION_SPEED);

    state.tick();
    assert_eq!(state.angles(), &[0.015, 0.0, 0.0]);

    for _ in 1..1000 {
        state.tick();
    }
    assert!((state.angles()[0] - 15.0).abs() < 1e-3);
}

#[test]
fn lambert_front_and_back() {
    let light = LightConfig {
        model: LightModel::Lambert,
        power: 1.0,
        direction: Vector3::new(0.0, 0.0, 1.0),
        ..LightConfig::default()
    };
    let uniforms = light.uniforms();
    let vertex = Vector4::new(0.0, 0.0, 0.0, 1.0);
    let view = Vector3::new(0.0, 0.0, -10.0);

    let front = evaluate_lighting(
        uniforms.shading,
        uniforms.shading,
        uniforms.light_model,
        &Vector3::new(0.0, 0.0, 1.0),
        &vertex,
        &light.direction,
        &view,
        uniforms.light_power,
        uniforms.light_shininess,
    );
    let back = evaluate_lighting(
        uniforms.shading,
        uniforms.shading,
        uniforms.light_model,
        &Vector3::new(0.0, 0.0, -1.0),
        &vertex,
        &light.direction,
        &view,
        uniforms.light_power,
        uniforms.light_shininess,
    );

    assert_eq!(lighting::damp_light(uniforms.damping_function, front), 1.0);
    assert_eq!(lighting::damp_light(uniforms.damping_function, back), 0.0);
}

#[test]
fn default_dice_translate_to_base_positions() {
    let expected = [
        Vector3::new(0.0, 0.0, -10.0),
        Vector3::new(-1.9, -0.1, -10.0),
        Vector3::new(1.8, -0.2, -10.0),
    ];
    let dice = CubeEntity::default_dice();
    assert_eq!(dice.len(), expected.len());

    for (cube, base) in dice.iter().zip(expected) {
        let matrix = compose_model_view(&cube.base_position, &[0.0, 0.0, 0.0]);
        assert_eq!(Transform::translation_of(&matrix), base);
    }
}

#[test]
fn spinning_dice_stay_put_while_pedestal_turns_them() {
    let dice = CubeEntity::default_dice();
    let mut state = AnimationState::new(RotationChannel::SelfSpin);
    state.set_channel_speed(RotationChannel::SelfSpin, 0.4);
    for _ in 0..5 {
        state.tick();
    }
    for cube in &dice {
        let matrix = compose_model_view(&cube.base_position, state.angles());
        assert!((Transform::translation_of(&matrix) - cube.base_position).norm() < 1e-5);
    }

    state.set_channel_speed(RotationChannel::PedestalPivot, std::f32::consts::PI);
    state.tick();
    // Half a turn about the pedestal center mirrors the side dice in x
    let left = compose_model_view(&dice[1].base_position, state.angles());
    let moved = Transform::translation_of(&left);
    assert!((moved - Vector3::new(1.9, -0.1, -10.0)).norm() < 1e-4);
}
