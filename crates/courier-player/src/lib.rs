//! Avatar locomotion on the tiny planet and the third-person camera that
//! follows it.

pub mod agent;
pub mod locomotion;
pub mod planet_camera;
pub mod settings;
mod smoothing;

pub use agent::{AgentState, AnimationState};
pub use locomotion::{SurfaceLocomotion, TickReport};
pub use planet_camera::{CameraMode, CameraTransform, PlanetCamera};
pub use settings::{CameraSettings, CameraSmoothing, LocomotionSettings, SettingsError};
pub use smoothing::blend_factor;
