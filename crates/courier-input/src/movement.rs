//! Movement intent derived from discrete key state.

use glam::DVec2;

use crate::action_map::{Action, InputMap};
use crate::keyboard::KeyboardState;

/// Held state of the movement keys for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
}

impl MoveKeys {
    /// Read the movement actions from the keyboard through `map`.
    #[must_use]
    pub fn from_keyboard(map: &InputMap, keyboard: &KeyboardState) -> Self {
        Self {
            forward: map.is_active(Action::MoveForward, keyboard),
            backward: map.is_active(Action::MoveBack, keyboard),
            left: map.is_active(Action::MoveLeft, keyboard),
            right: map.is_active(Action::MoveRight, keyboard),
            run: map.is_active(Action::Run, keyboard),
        }
    }

    /// 2D intent with `x` = strafe right and `y` = forward.
    ///
    /// Opposite keys cancel; diagonals are normalized to unit length so
    /// they are not faster than straight movement.
    #[must_use]
    pub fn intent(&self) -> DVec2 {
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        DVec2::new(
            axis(self.right, self.left),
            axis(self.forward, self.backward),
        )
        .normalize_or_zero()
    }

    #[must_use]
    pub fn to_input(&self) -> MovementInput {
        MovementInput {
            intent: self.intent(),
            run: self.run,
        }
    }
}

/// What the locomotion controller consumes each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    /// Unit-or-zero direction, `x` = right, `y` = forward.
    pub intent: DVec2,
    pub run: bool,
}

impl MovementInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn new(intent: DVec2, run: bool) -> Self {
        Self { intent, run }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_no_keys_no_intent() {
        assert_eq!(MoveKeys::default().intent(), DVec2::ZERO);
    }

    #[test]
    fn test_forward_only() {
        let keys = MoveKeys {
            forward: true,
            ..Default::default()
        };
        assert_eq!(keys.intent(), DVec2::new(0.0, 1.0));
    }

    #[test]
    fn test_diagonal_is_unit_length() {
        let keys = MoveKeys {
            forward: true,
            left: true,
            ..Default::default()
        };
        let intent = keys.intent();
        assert!((intent.length() - 1.0).abs() < 1e-12);
        assert!(intent.x < 0.0 && intent.y > 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let keys = MoveKeys {
            forward: true,
            backward: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(keys.intent(), DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_from_keyboard_with_default_map() {
        let map = InputMap::default();
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyS));
        kb.process_raw(RawKeyEvent::pressed(KeyCode::ShiftLeft));
        let keys = MoveKeys::from_keyboard(&map, &kb);
        assert!(keys.backward && keys.run);
        assert!(!keys.forward && !keys.left && !keys.right);
        let input = keys.to_input();
        assert_eq!(input.intent, DVec2::new(0.0, -1.0));
        assert!(input.run);
    }
}
