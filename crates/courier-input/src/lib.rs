//! Keyboard input for the courier: frame-coherent key state, rebindable
//! movement actions, and the normalized movement intent handed to the
//! locomotion controller.

pub mod action_map;
pub mod keyboard;
pub mod movement;

pub use action_map::{Action, InputError, InputMap, KeyBinding};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use movement::{MoveKeys, MovementInput};
