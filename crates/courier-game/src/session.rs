//! One headless play session: world, avatar, camera and the loop that
//! drives them.

use courier_collision::RayCaster;
use courier_config::{CameraConfig, Config, PlayerConfig};
use courier_input::{InputMap, KeyboardState, MoveKeys};
use courier_player::{
    AgentState, AnimationState, CameraSettings, CameraSmoothing, CameraTransform,
    LocomotionSettings, PlanetCamera, SurfaceLocomotion,
};
use tracing::{debug, info};

use crate::error::GameError;
use crate::game_loop::FixedStepLoop;
use crate::render::{FrameSink, FrameSnapshot};
use crate::route::Route;
use crate::world::World;

/// Shortest frame a run accepts. Anything below would spin for billions of
/// frames before the run ends.
pub const MIN_FRAME_TIME: f64 = 1e-4;

pub fn locomotion_settings(player: &PlayerConfig) -> LocomotionSettings {
    LocomotionSettings {
        walk_speed: player.walk_speed,
        run_multiplier: player.run_multiplier,
        max_delta_time: player.max_delta_time,
        idle_threshold: player.idle_threshold,
        agent_radius: player.radius,
        body_height: player.body_height,
        collision_skin: player.collision_skin,
        slide: player.slide,
    }
}

pub fn camera_settings(camera: &CameraConfig) -> CameraSettings {
    CameraSettings {
        distance: camera.distance,
        height: camera.height,
        look_at_height: camera.look_at_height,
        min_distance: camera.min_distance,
        max_distance: camera.max_distance,
        collision_skin: camera.collision_skin,
        pivot_height: camera.pivot_height,
        smoothing: CameraSmoothing {
            position: camera.position_smoothing,
            look_at: camera.look_at_smoothing,
            up: camera.up_smoothing,
        },
    }
}

/// Totals for a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub sim_time: f64,
    /// Arc length the avatar walked.
    pub travelled: f64,
    /// Ticks in which an obstacle shortened the step.
    pub blocked_ticks: u64,
}

/// Per-tick simulation state, split from the loop so the loop's closures
/// can borrow it mutably.
struct Sim {
    world: World,
    locomotion: SurfaceLocomotion,
    camera: PlanetCamera,
    player: AgentState,
    keyboard: KeyboardState,
    input_map: InputMap,
    route: Route,
    last_camera: Option<CameraTransform>,
    watching: usize,
    summary: RunSummary,
}

impl Sim {
    fn step(&mut self, dt: f64, sim_time: f64) {
        self.route.drive(sim_time, &mut self.keyboard);
        let input = MoveKeys::from_keyboard(&self.input_map, &self.keyboard).to_input();

        let obstacles: &dyn RayCaster = &self.world.obstacles;
        let report = self.locomotion.tick(
            &mut self.player,
            &input,
            dt,
            &self.world.manifold,
            Some(obstacles),
        );
        if report.blocked {
            self.summary.blocked_ticks += 1;
        }
        self.summary.travelled += report.travelled;

        let (position, heading) = (self.player.position, self.player.heading);
        self.last_camera = self.camera.update(position, heading, dt, Some(obstacles));
        self.watching = self.world.update_npcs(self.player.position);
        self.keyboard.clear_transients();
    }

    fn snapshot(&self, sim_time: f64, alpha: f64) -> Option<FrameSnapshot> {
        let camera = self.last_camera?;
        let manifold = &self.world.manifold;
        Some(FrameSnapshot {
            sim_time,
            alpha,
            camera,
            avatar_position: self.player.position,
            avatar_orientation: self.player.orientation(manifold),
            animation: self.player.animation,
            lat_lon: self.player.lat_lon(manifold),
            watching_npcs: self.watching,
        })
    }
}

pub struct Session {
    sim: Sim,
    game_loop: FixedStepLoop,
    frame_time: f64,
    duration: f64,
}

impl Session {
    /// Build the world and the avatar rig from `config`.
    pub fn new(config: &Config, input_map: InputMap, route: Route) -> Result<Self, GameError> {
        let timing = &config.simulation;
        if timing.tick_rate == 0 {
            return Err(GameError::TickRate(0));
        }
        if !timing.frame_time.is_finite() || timing.frame_time < MIN_FRAME_TIME {
            return Err(GameError::FrameTime {
                got: timing.frame_time,
                min: MIN_FRAME_TIME,
            });
        }
        if !timing.duration.is_finite() || timing.duration < 0.0 {
            return Err(GameError::Duration(timing.duration));
        }
        // The flat rig keeps world +Y as up and would sit inside the planet.
        if config.camera.flat {
            return Err(GameError::FlatCamera);
        }
        let player_cfg = &config.player;
        let world = World::generate(&config.planet, player_cfg.spawn_lat, player_cfg.spawn_lon)?;

        let locomotion = SurfaceLocomotion::new(locomotion_settings(player_cfg))?;
        let camera = PlanetCamera::new(camera_settings(&config.camera), Some(world.manifold))?;
        let player = AgentState::spawn(
            &world.manifold,
            player_cfg.spawn_lat,
            player_cfg.spawn_lon,
            player_cfg.spawn_heading.to_radians(),
        );

        for (key, actions) in input_map.conflicts() {
            debug!(?key, ?actions, "key bound to several actions");
        }

        info!(
            spawn = %player.lat_lon(&world.manifold),
            camera = ?camera.mode(),
            tick_rate = config.simulation.tick_rate,
            "session ready"
        );

        Ok(Self {
            sim: Sim {
                world,
                locomotion,
                camera,
                player,
                keyboard: KeyboardState::new(),
                input_map,
                route,
                last_camera: None,
                watching: 0,
                summary: RunSummary::default(),
            },
            game_loop: FixedStepLoop::new(config.simulation.tick_rate),
            frame_time: config.simulation.frame_time,
            duration: config.simulation.duration,
        })
    }

    pub fn player(&self) -> &AgentState {
        &self.sim.player
    }

    pub fn world(&self) -> &World {
        &self.sim.world
    }

    pub fn camera(&self) -> &PlanetCamera {
        &self.sim.camera
    }

    /// Run one frame and present it.
    pub fn frame(&mut self, frame_time: f64, sink: &mut dyn FrameSink) {
        let sim = &mut self.sim;
        let mut rendered = None;
        self.game_loop.advance(
            frame_time,
            |dt, sim_time| sim.step(dt, sim_time),
            |alpha| rendered = Some(alpha),
        );
        if let Some(alpha) = rendered
            && let Some(snapshot) = sim.snapshot(self.game_loop.total_sim_time(), alpha)
        {
            sink.present(&snapshot);
        }
    }

    /// Run until the configured duration has been simulated.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> RunSummary {
        while self.game_loop.total_sim_time() < self.duration {
            self.frame(self.frame_time, sink);
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.game_loop.frame_count(),
            ticks: self.game_loop.update_count(),
            sim_time: self.game_loop.total_sim_time(),
            ..self.sim.summary
        }
    }

    pub fn animation(&self) -> AnimationState {
        self.sim.player.animation
    }
}
