//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub planet: PlanetConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub simulation: SimulationConfig,
    pub debug: DebugConfig,
}

/// The sphere the world is built on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet radius in world units.
    pub radius: f64,
    /// Planet center in world space.
    pub center: (f64, f64, f64),
    /// Buildings, lamp posts and trees scattered around the planet.
    pub prop_count: u32,
    /// Number of NPCs scattered around the planet.
    pub npc_count: u32,
    /// NPCs closer than this (arc length) turn to face the player.
    pub npc_notice_distance: f64,
    /// Seed for prop and NPC placement. Same seed, same planet.
    pub seed: u64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            center: (0.0, 0.0, 0.0),
            prop_count: 24,
            npc_count: 6,
            npc_notice_distance: 6.0,
            seed: 0x5eed,
        }
    }
}

/// Avatar movement tuning and spawn point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f64,
    pub run_multiplier: f64,
    /// Longest timestep integrated in one tick, in seconds.
    pub max_delta_time: f64,
    pub idle_threshold: f64,
    pub radius: f64,
    pub body_height: f64,
    pub collision_skin: f64,
    /// Slide along obstacles instead of stopping dead.
    pub slide: bool,
    pub spawn_lat: f64,
    pub spawn_lon: f64,
    /// Initial heading in degrees.
    pub spawn_heading: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            run_multiplier: 2.0,
            max_delta_time: 0.1,
            idle_threshold: 0.01,
            radius: 0.5,
            body_height: 1.0,
            collision_skin: 0.05,
            slide: true,
            spawn_lat: 0.0,
            spawn_lon: 0.0,
            spawn_heading: 0.0,
        }
    }
}

/// Follow camera tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Use the flat-world camera instead of following the sphere. Planet
    /// sessions refuse to start with it set.
    pub flat: bool,
    pub distance: f64,
    pub height: f64,
    pub look_at_height: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub collision_skin: f64,
    pub pivot_height: f64,
    /// Per-frame blend at 60 Hz (0.0 - 1.0).
    pub position_smoothing: f64,
    pub look_at_smoothing: f64,
    pub up_smoothing: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            flat: false,
            distance: 10.0,
            height: 5.0,
            look_at_height: 1.5,
            min_distance: 2.0,
            max_distance: 30.0,
            collision_skin: 0.5,
            pivot_height: 1.5,
            position_smoothing: 0.1,
            look_at_smoothing: 0.15,
            up_smoothing: 0.1,
        }
    }
}

/// Headless run parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed update rate in Hz.
    pub tick_rate: u32,
    /// Simulated frame time fed to the loop, in seconds.
    pub frame_time: f64,
    /// Total simulated seconds before the run ends.
    pub duration: f64,
    /// Seconds between frame reports.
    pub report_interval: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            frame_time: 1.0 / 60.0,
            duration: 30.0,
            report_interval: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,courier_player=trace").
    pub log_level: String,
    /// Write JSON logs next to the config file.
    pub log_to_file: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

/// Platform config directory for the demo, e.g. `~/.config/courier`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("courier"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let ron_str =
            ron::ser::to_string_pretty(&Config::default(), ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("radius: 50.0"));
        assert!(ron_str.contains("tick_rate: 60"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.camera.flat = true;
        config.planet.center = (1.0, -2.0, 3.5);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(planet: (radius: 80.0))").unwrap();
        assert_eq!(config.planet.radius, 80.0);
        assert_eq!(config.planet.npc_count, PlanetConfig::default().npc_count);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(jetpack: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_ron_comments_accepted() {
        let config: Config = ron::from_str("// courier\n(\n  // nothing set\n)").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.player.walk_speed = 9.5;
        config.simulation.duration = 4.0;
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load_or_create(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.camera.distance = 14.0;
        modified.save(dir.path()).unwrap();
        let reloaded = config.reload(dir.path()).unwrap().unwrap();
        assert_eq!(reloaded.camera.distance, 14.0);
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
