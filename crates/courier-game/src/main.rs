//! Courier: a headless walk around a tiny planet.
//!
//! Loads `config.ron` (creating it on first run), builds a planet with
//! props and NPCs, and drives the avatar along a scripted key route through
//! the fixed-timestep loop. The follow camera and avatar pose are logged at
//! the configured report interval.
//!
//! Run with: `cargo run -p courier-game -- --duration 20`

use std::process::ExitCode;

use clap::Parser;
use courier_config::{CliArgs, Config, default_config_dir};
use courier_game::{GameError, Route, Session, TraceFrameSink};
use courier_input::InputMap;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("courier: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), GameError> {
    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);

    let file_logging = cfg!(debug_assertions) || config.debug.log_to_file;
    courier_log::init_logging(
        Some(&config_dir.join("logs")),
        file_logging,
        Some(&config),
    );

    info!("Courier - tiny planet walk");
    info!(
        "Planet: radius={:.1}, props={}, npcs={} | Run: {:.1}s at {} Hz",
        config.planet.radius,
        config.planet.prop_count,
        config.planet.npc_count,
        config.simulation.duration,
        config.simulation.tick_rate,
    );

    let input_map = InputMap::default_config_path()
        .filter(|path| path.exists())
        .map(|path| InputMap::load(&path))
        .unwrap_or_default();

    let mut session = Session::new(&config, input_map, Route::demo())?;
    let mut sink = TraceFrameSink::new(config.simulation.report_interval);
    let summary = session.run(&mut sink);

    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        sim_time = format_args!("{:.2}", summary.sim_time),
        travelled = format_args!("{:.2}", summary.travelled),
        blocked_ticks = summary.blocked_ticks,
        reports = sink.reported(),
        "run complete"
    );
    Ok(())
}
