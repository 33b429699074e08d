//! Frame-coherent keyboard state.
//!
//! [`KeyboardState`] accumulates key events during a frame and answers, for
//! any physical key, whether it is held, was pressed this frame, or was
//! released this frame. Physical key codes keep WASD in the same place on
//! every keyboard layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Platform-independent description of one key transition.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    /// OS auto-repeat; ignored.
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Held / just-pressed / just-released key sets.
///
/// Feed events with [`process_event`](Self::process_event) or
/// [`process_raw`](Self::process_raw), read during the frame, then call
/// [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&event.key) {
                    self.just_released.insert(event.key);
                }
            }
        }
    }

    /// Release every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.pressed.drain());
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    #[must_use]
    pub fn is_code_pressed(&self, code: KeyCode) -> bool {
        self.is_pressed(PhysicalKey::Code(code))
    }

    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Clears the per-frame transition sets. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
