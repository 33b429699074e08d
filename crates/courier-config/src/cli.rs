//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Courier command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "courier", about = "Tiny-planet walking demo")]
pub struct CliArgs {
    /// Planet radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Simulated seconds to run.
    #[arg(long)]
    pub duration: Option<f64>,

    /// Avatar walking speed.
    #[arg(long)]
    pub walk_speed: Option<f64>,

    /// Camera follow distance.
    #[arg(long)]
    pub camera_distance: Option<f64>,

    /// Use the flat-world camera (flat worlds only).
    #[arg(long)]
    pub flat_camera: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(r) = args.radius {
            self.planet.radius = r;
        }
        if let Some(d) = args.duration {
            self.simulation.duration = d;
        }
        if let Some(s) = args.walk_speed {
            self.player.walk_speed = s;
        }
        if let Some(d) = args.camera_distance {
            self.camera.distance = d;
        }
        if args.flat_camera {
            self.camera.flat = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            radius: Some(120.0),
            flat_camera: true,
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.planet.radius, 120.0);
        assert!(config.camera.flat);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.player.walk_speed, 6.0);
        assert_eq!(config.simulation.duration, 30.0);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "courier",
            "--duration",
            "5",
            "--camera-distance",
            "12.5",
            "--flat-camera",
        ]);
        assert_eq!(args.duration, Some(5.0));
        assert_eq!(args.camera_distance, Some(12.5));
        assert!(args.flat_camera);
        assert!(args.config.is_none());
    }
}
