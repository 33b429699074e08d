//! Movement actions and their rebindable key bindings.
//!
//! [`InputMap`] maps each [`Action`] to one or more physical keys and
//! persists as a user-editable RON file. Unreadable or malformed files fall
//! back to the default layout (WASD / arrows + Shift).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Serde helper for [`KeyCode`], which has no serde support of its own.
/// Keys are written by name, e.g. `"KeyW"` or `"ShiftLeft"`.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use winit::keyboard::KeyCode;

    const KEY_NAMES: &[(&str, KeyCode)] = &[
        ("KeyA", KeyCode::KeyA),
        ("KeyC", KeyCode::KeyC),
        ("KeyD", KeyCode::KeyD),
        ("KeyE", KeyCode::KeyE),
        ("KeyF", KeyCode::KeyF),
        ("KeyH", KeyCode::KeyH),
        ("KeyI", KeyCode::KeyI),
        ("KeyJ", KeyCode::KeyJ),
        ("KeyK", KeyCode::KeyK),
        ("KeyL", KeyCode::KeyL),
        ("KeyQ", KeyCode::KeyQ),
        ("KeyR", KeyCode::KeyR),
        ("KeyS", KeyCode::KeyS),
        ("KeyW", KeyCode::KeyW),
        ("KeyZ", KeyCode::KeyZ),
        ("ArrowUp", KeyCode::ArrowUp),
        ("ArrowDown", KeyCode::ArrowDown),
        ("ArrowLeft", KeyCode::ArrowLeft),
        ("ArrowRight", KeyCode::ArrowRight),
        ("ShiftLeft", KeyCode::ShiftLeft),
        ("ShiftRight", KeyCode::ShiftRight),
        ("ControlLeft", KeyCode::ControlLeft),
        ("ControlRight", KeyCode::ControlRight),
        ("AltLeft", KeyCode::AltLeft),
        ("Space", KeyCode::Space),
        ("Tab", KeyCode::Tab),
    ];

    pub fn name_of(code: KeyCode) -> Option<&'static str> {
        KEY_NAMES
            .iter()
            .find_map(|&(name, c)| (c == code).then_some(name))
    }

    pub fn code_of(name: &str) -> Option<KeyCode> {
        KEY_NAMES
            .iter()
            .find_map(|&(n, code)| (n == name).then_some(code))
    }

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        let name = name_of(*code)
            .ok_or_else(|| serde::ser::Error::custom(format!("unbindable key: {code:?}")))?;
        s.serialize_str(name)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        code_of(&name).ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Errors from persisting an [`InputMap`].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to write key bindings: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to serialize key bindings: {0}")]
    Serialize(#[source] ron::Error),
}

/// Movement actions understood by the locomotion controller.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    /// Held to run instead of walk.
    Run,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Run,
    ];
}

/// A physical key bound to an action.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBinding(#[serde(with = "keycode_serde")] pub KeyCode);

/// Action → keys table. Any bound key activates its action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    pub bindings: HashMap<Action, Vec<KeyBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        let bindings = HashMap::from([
            (
                Action::MoveForward,
                vec![KeyBinding(KeyCode::KeyW), KeyBinding(KeyCode::ArrowUp)],
            ),
            (
                Action::MoveBack,
                vec![KeyBinding(KeyCode::KeyS), KeyBinding(KeyCode::ArrowDown)],
            ),
            (
                Action::MoveLeft,
                vec![KeyBinding(KeyCode::KeyA), KeyBinding(KeyCode::ArrowLeft)],
            ),
            (
                Action::MoveRight,
                vec![KeyBinding(KeyCode::KeyD), KeyBinding(KeyCode::ArrowRight)],
            ),
            (
                Action::Run,
                vec![KeyBinding(KeyCode::ShiftLeft), KeyBinding(KeyCode::ShiftRight)],
            ),
        ]);
        Self { bindings }
    }
}

impl InputMap {
    /// Replace the bindings for `action`.
    pub fn set_bindings(&mut self, action: Action, keys: Vec<KeyBinding>) {
        self.bindings.insert(action, keys);
    }

    #[must_use]
    pub fn bindings_for(&self, action: Action) -> &[KeyBinding] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Whether any key bound to `action` is held.
    #[must_use]
    pub fn is_active(&self, action: Action, keyboard: &KeyboardState) -> bool {
        self.bindings_for(action)
            .iter()
            .any(|KeyBinding(code)| keyboard.is_code_pressed(*code))
    }

    /// Keys bound to more than one action, with the actions sharing them.
    #[must_use]
    pub fn conflicts(&self) -> Vec<(KeyBinding, Vec<Action>)> {
        let mut seen: HashMap<KeyBinding, Vec<Action>> = HashMap::new();
        for action in Action::ALL {
            for key in self.bindings_for(action) {
                let users = seen.entry(*key).or_default();
                if !users.contains(&action) {
                    users.push(action);
                }
            }
        }
        let mut conflicts: Vec<_> = seen
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .collect();
        conflicts.sort_by_key(|(key, _)| format!("{:?}", key.0));
        conflicts
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn save(&self, path: &Path) -> Result<(), InputError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(InputError::Write)?;
        }
        let ron_str = self.to_ron().map_err(InputError::Serialize)?;
        std::fs::write(path, ron_str).map_err(InputError::Write)
    }

    /// Load bindings from `path`, falling back to the defaults (with a
    /// warning) if the file is missing or malformed.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_ron(&contents).unwrap_or_else(|e| {
                warn!(
                    "Malformed key binding file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }),
            Err(e) => {
                warn!(
                    "Could not read key binding file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Platform location of `input.ron`.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("courier").join("input.ron"))
    }
}
