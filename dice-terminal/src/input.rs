/// Keyboard mapping for the terminal app
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use dice_core::{Direction, RotationChannel};

/// Step applied to the light power by `+` and `-`
pub const POWER_STEP: f32 = 0.1;

/// What a key event asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Rotate { direction: Direction, pressed: bool },
    SelectChannel(RotationChannel),
    Stop,
    CycleLightModel,
    CycleDamping,
    ToggleShading,
    AdjustPower(f32),
}

/// Translate a key event into a command
///
/// Release events only drive the arrow keys, and only arrive when the
/// terminal supports the keyboard enhancement protocol.
pub fn map_key(event: &KeyEvent) -> Option<Command> {
    let pressed = match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => true,
        KeyEventKind::Release => false,
    };

    match event.code {
        KeyCode::Left => Some(Command::Rotate {
            direction: Direction::Left,
            pressed,
        }),
        KeyCode::Right => Some(Command::Rotate {
            direction: Direction::Right,
            pressed,
        }),
        _ if !pressed => None,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('1') => Some(Command::SelectChannel(RotationChannel::SelfSpin)),
        KeyCode::Char('2') => Some(Command::SelectChannel(RotationChannel::PedestalPivot)),
        KeyCode::Char('3') => Some(Command::SelectChannel(RotationChannel::WorldPivot)),
        KeyCode::Char(' ') => Some(Command::Stop),
        KeyCode::Char('m' | 'M') => Some(Command::CycleLightModel),
        KeyCode::Char('d' | 'D') => Some(Command::CycleDamping),
        KeyCode::Char('v' | 'V') => Some(Command::ToggleShading),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::AdjustPower(POWER_STEP)),
        KeyCode::Char('-') => Some(Command::AdjustPower(-POWER_STEP)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_arrow_press_and_release() {
        assert_eq!(
            map_key(&key(KeyCode::Left, KeyEventKind::Press)),
            Some(Command::Rotate {
                direction: Direction::Left,
                pressed: true
            })
        );
        assert_eq!(
            map_key(&key(KeyCode::Right, KeyEventKind::Release)),
            Some(Command::Rotate {
                direction: Direction::Right,
                pressed: false
            })
        );
    }

    #[test]
    fn test_mode_keys() {
        assert_eq!(
            map_key(&key(KeyCode::Char('3'), KeyEventKind::Press)),
            Some(Command::SelectChannel(RotationChannel::WorldPivot))
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('1'), KeyEventKind::Press)),
            Some(Command::SelectChannel(RotationChannel::SelfSpin))
        );
    }

    #[test]
    fn test_release_of_other_keys_is_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('q'), KeyEventKind::Release)), None);
        assert_eq!(map_key(&key(KeyCode::Char('m'), KeyEventKind::Release)), None);
    }

    #[test]
    fn test_letter_keys_ignore_case() {
        for (lower, upper) in [('q', 'Q'), ('m', 'M'), ('d', 'D'), ('v', 'V')] {
            let expected = map_key(&key(KeyCode::Char(lower), KeyEventKind::Press));
            assert!(expected.is_some());
            assert_eq!(map_key(&key(KeyCode::Char(upper), KeyEventKind::Press)), expected);
        }
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(map_key(&key(KeyCode::Char('x'), KeyEventKind::Press)), None);
    }
}
