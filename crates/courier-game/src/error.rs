use courier_config::ConfigError;
use courier_manifold::ManifoldError;
use courier_player::SettingsError;

/// Anything that stops the demo from starting.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid planet: {0}")]
    Planet(#[from] ManifoldError),

    #[error("invalid tuning: {0}")]
    Settings(#[from] SettingsError),

    #[error("tick rate must be positive, got {0}")]
    TickRate(u32),

    #[error("frame time must be at least {min} s, got {got}")]
    FrameTime { got: f64, min: f64 },

    #[error("run duration must be finite and non-negative, got {0}")]
    Duration(f64),

    #[error("flat camera needs a flat world, but sessions always walk a planet")]
    FlatCamera,
}
