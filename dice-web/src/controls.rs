//! Translation of raw page control values into scene updates

use dice_core::{ConfigUpdate, DampingFunction, Direction, LightConfig, LightModel, ShadingStage};

/// Direction for a `KeyboardEvent.key` value
pub fn direction_for(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Apply the values read from the page's light controls
///
/// Values that don't name a known option are logged and leave the previous
/// setting in place. Returns how many values were rejected.
pub fn apply_controls(light: &mut LightConfig, power: f32, damping: i32, shading: i32, model: i32) -> usize {
    let mut rejected = 0;

    if power.is_finite() {
        light.apply(ConfigUpdate::Power(power));
    } else {
        tracing::warn!(power, "ignoring non-finite light power");
        rejected += 1;
    }

    match DampingFunction::try_from(damping) {
        Ok(damping) => light.apply(ConfigUpdate::Damping(damping)),
        Err(err) => {
            tracing::warn!(%err, "ignoring damping control");
            rejected += 1;
        }
    }

    match ShadingStage::try_from(shading) {
        Ok(shading) => light.apply(ConfigUpdate::Shading(shading)),
        Err(err) => {
            tracing::warn!(%err, "ignoring shading control");
            rejected += 1;
        }
    }

    match LightModel::try_from(model) {
        Ok(model) => light.apply(ConfigUpdate::Model(model)),
        Err(err) => {
            tracing::warn!(%err, "ignoring light model control");
            rejected += 1;
        }
    }

    rejected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(direction_for("ArrowLeft"), Some(Direction::Left));
        assert_eq!(direction_for("ArrowRight"), Some(Direction::Right));
        assert_eq!(direction_for("ArrowUp"), None);
    }

    #[test]
    fn test_valid_controls() {
        let mut light = LightConfig::default();
        assert_eq!(apply_controls(&mut light, 0.6, 1, 1, 2), 0);
        assert_eq!(light.power, 0.6);
        assert_eq!(light.damping, DampingFunction::Squared);
        assert_eq!(light.shading, ShadingStage::Vertex);
        assert_eq!(light.model, LightModel::CelShaded);
    }

    #[test]
    fn test_invalid_controls_keep_previous() {
        let mut light = LightConfig::default();
        assert_eq!(apply_controls(&mut light, f32::NAN, 4, -1, 3), 4);
        assert_eq!(light, LightConfig::default());
    }
}
