//! Keyboard input mapping.
//!
//! Raw keyboard keys are folded into the few [`LogicalKey`]s the game cares
//! about. [`InputState`] holds the bindings (arrow keys and WASD for
//! movement, Enter/Space to confirm, Escape for the menu) and turns polled
//! key-down state into press/release [`KeyEvent`]s, one per transition.
use raylib::prelude::KeyboardKey;
use rustc_hash::FxHashSet;

use crate::components::physics::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Menu,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 6] = [
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Up,
        LogicalKey::Down,
        LogicalKey::Confirm,
        LogicalKey::Menu,
    ];

    /// Movement direction for the four direction keys.
    pub fn direction(self) -> Option<Direction> {
        match self {
            LogicalKey::Left => Some(Direction::Left),
            LogicalKey::Right => Some(Direction::Right),
            LogicalKey::Up => Some(Direction::Up),
            LogicalKey::Down => Some(Direction::Down),
            LogicalKey::Confirm | LogicalKey::Menu => None,
        }
    }
}

/// A logical key going down (`pressed`) or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: LogicalKey,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: LogicalKey) -> Self {
        Self { key, pressed: true }
    }

    pub fn up(key: LogicalKey) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Key bindings plus the logical keys currently held.
#[derive(Debug, Clone)]
pub struct InputState {
    pub bindings: Vec<(LogicalKey, KeyboardKey)>,
    held: FxHashSet<LogicalKey>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            bindings: vec![
                (LogicalKey::Left, KeyboardKey::KEY_LEFT),
                (LogicalKey::Left, KeyboardKey::KEY_A),
                (LogicalKey::Right, KeyboardKey::KEY_RIGHT),
                (LogicalKey::Right, KeyboardKey::KEY_D),
                (LogicalKey::Up, KeyboardKey::KEY_UP),
                (LogicalKey::Up, KeyboardKey::KEY_W),
                (LogicalKey::Down, KeyboardKey::KEY_DOWN),
                (LogicalKey::Down, KeyboardKey::KEY_S),
                (LogicalKey::Confirm, KeyboardKey::KEY_ENTER),
                (LogicalKey::Confirm, KeyboardKey::KEY_SPACE),
                (LogicalKey::Menu, KeyboardKey::KEY_ESCAPE),
            ],
            held: FxHashSet::default(),
        }
    }
}

impl InputState {
    /// Compare the bound keys' down state against what was held last poll and
    /// return one event per logical key whose state changed. A logical key is
    /// down while any of its bindings is.
    pub fn update(&mut self, is_down: impl Fn(KeyboardKey) -> bool) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for key in LogicalKey::ALL {
            let down = self
                .bindings
                .iter()
                .any(|(logical, raw)| *logical == key && is_down(*raw));
            let was_down = self.held.contains(&key);
            if down && !was_down {
                self.held.insert(key);
                events.push(KeyEvent::down(key));
            } else if !down && was_down {
                self.held.remove(&key);
                events.push(KeyEvent::up(key));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_only_on_transitions() {
        let mut input = InputState::default();
        let events = input.update(|k| k == KeyboardKey::KEY_A);
        assert_eq!(events, vec![KeyEvent::down(LogicalKey::Left)]);
        assert!(input.update(|k| k == KeyboardKey::KEY_A).is_empty());
        let events = input.update(|_| false);
        assert_eq!(events, vec![KeyEvent::up(LogicalKey::Left)]);
    }

    #[test]
    fn test_two_bindings_fold_into_one_key() {
        let mut input = InputState::default();
        input.update(|k| k == KeyboardKey::KEY_LEFT);
        // switching from arrow to A while still holding left emits nothing
        assert!(input.update(|k| k == KeyboardKey::KEY_A).is_empty());
        assert!(input.held.contains(&LogicalKey::Left));
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(LogicalKey::Up.direction(), Some(Direction::Up));
        assert_eq!(LogicalKey::Confirm.direction(), None);
    }
}
