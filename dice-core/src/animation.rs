/// Accumulated rotation angles driven by user input
use serde::Deserialize;

use crate::error::{Error, Result};

/// Angular speed applied while a direction key is held (radians per frame)
pub const ROTATION_SPEED: f32 = 0.015;

/// Which of the three nested rotations is being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationChannel {
    /// Each cube spins about its own origin
    SelfSpin,
    /// All cubes swing about the pedestal center
    PedestalPivot,
    /// All cubes swing about the world origin
    WorldPivot,
}

impl RotationChannel {
    pub const ALL: [RotationChannel; 3] = [
        RotationChannel::SelfSpin,
        RotationChannel::PedestalPivot,
        RotationChannel::WorldPivot,
    ];

    pub fn index(self) -> usize {
        match self {
            RotationChannel::SelfSpin => 0,
            RotationChannel::PedestalPivot => 1,
            RotationChannel::WorldPivot => 2,
        }
    }
}

impl TryFrom<usize> for RotationChannel {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidChannel(index))
    }
}

/// Direction key reported by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Rotation angles (in radians) plus the single active channel and its speed
#[derive(Debug, Clone, Copy)]
pub struct AnimationState {
    angles: [f32; 3],
    active: RotationChannel,
    speed: f32,
}

impl AnimationState {
    pub fn new(active: RotationChannel) -> Self {
        Self {
            angles: [0.0; 3],
            active,
            speed: 0.0,
        }
    }

    pub fn angles(&self) -> &[f32; 3] {
        &self.angles
    }

    pub fn active_channel(&self) -> RotationChannel {
        self.active
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Drive `channel` at `speed`; every other channel stops
    pub fn set_channel_speed(&mut self, channel: RotationChannel, speed: f32) {
        self.active = channel;
        self.speed = speed;
    }

    /// Switch the active channel, keeping the current speed
    pub fn select_channel(&mut self, channel: RotationChannel) {
        tracing::debug!(?channel, "rotation channel selected");
        self.active = channel;
    }

    /// Key down sets the speed for the active channel, key up clears it
    pub fn direction_key(&mut self, direction: Direction, pressed: bool) {
        let speed = match (direction, pressed) {
            (_, false) => 0.0,
            (Direction::Left, true) => -ROTATION_SPEED,
            (Direction::Right, true) => ROTATION_SPEED,
        };
        self.set_channel_speed(self.active, speed);
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    /// Advance the active angle by the current speed; call once per frame
    /// after drawing
    pub fn tick(&mut self) {
        self.angles[self.active.index()] += self.speed;
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(RotationChannel::PedestalPivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates_active_channel() {
        let mut state = AnimationState::new(RotationChannel::SelfSpin);
        state.set_channel_speed(RotationChannel::SelfSpin, ROTATION_SPEED);
        state.tick();
        assert_eq!(state.angles(), &[0.015, 0.0, 0.0]);

        for _ in 1..1000 {
            state.tick();
        }
        assert!((state.angles()[0] - 15.0).abs() < 1e-3);
        assert_eq!(state.angles()[1], 0.0);
        assert_eq!(state.angles()[2], 0.0);
    }

    #[test]
    fn test_no_wraparound() {
        let mut state = AnimationState::default();
        state.set_channel_speed(RotationChannel::WorldPivot, 1.0);
        for _ in 0..10 {
            state.tick();
        }
        assert!((state.angles()[2] - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_keys() {
        let mut state = AnimationState::default();
        assert_eq!(state.active_channel(), RotationChannel::PedestalPivot);

        state.direction_key(Direction::Left, true);
        assert_eq!(state.speed(), -ROTATION_SPEED);
        state.tick();
        assert!((state.angles()[1] + ROTATION_SPEED).abs() < 1e-6);

        state.direction_key(Direction::Left, false);
        assert_eq!(state.speed(), 0.0);
        state.direction_key(Direction::Right, true);
        assert_eq!(state.speed(), ROTATION_SPEED);
    }

    #[test]
    fn test_select_channel_keeps_speed() {
        let mut state = AnimationState::default();
        state.direction_key(Direction::Right, true);
        state.select_channel(RotationChannel::WorldPivot);
        state.tick();
        assert_eq!(state.angles(), &[0.0, 0.0, ROTATION_SPEED]);
    }

    #[test]
    fn test_channel_from_index() {
        assert_eq!(RotationChannel::try_from(0usize).ok(), Some(RotationChannel::SelfSpin));
        assert_eq!(RotationChannel::try_from(2usize).ok(), Some(RotationChannel::WorldPivot));
        assert!(matches!(RotationChannel::try_from(3usize), Err(Error::InvalidChannel(3))));
    }
}
