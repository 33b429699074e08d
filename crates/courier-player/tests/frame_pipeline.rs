//! Keyboard → locomotion → camera, the way the game loop drives them.

use courier_collision::{ObstacleSet, ObstacleShape};
use courier_input::{InputMap, KeyboardState, MoveKeys, RawKeyEvent};
use courier_manifold::SphereManifold;
use courier_player::{
    AgentState, AnimationState, CameraSettings, LocomotionSettings, PlanetCamera,
    SurfaceLocomotion,
};
use winit::keyboard::KeyCode;

const DT: f64 = 1.0 / 60.0;

struct Rig {
    manifold: SphereManifold,
    locomotion: SurfaceLocomotion,
    camera: PlanetCamera,
    agent: AgentState,
    keyboard: KeyboardState,
    map: InputMap,
}

impl Rig {
    fn new() -> Self {
        let manifold = SphereManifold::at_origin(50.0).unwrap();
        Self {
            locomotion: SurfaceLocomotion::new(LocomotionSettings::default()).unwrap(),
            camera: PlanetCamera::new(CameraSettings::default(), Some(manifold)).unwrap(),
            agent: AgentState::spawn(&manifold, 0.0, 0.0, 0.0),
            keyboard: KeyboardState::new(),
            map: InputMap::default(),
            manifold,
        }
    }

    fn frame(&mut self, obstacles: Option<&ObstacleSet>) -> AnimationState {
        let input = MoveKeys::from_keyboard(&self.map, &self.keyboard).to_input();
        let caster = obstacles.map(|o| o as &dyn courier_collision::RayCaster);
        let report = self
            .locomotion
            .tick(&mut self.agent, &input, DT, &self.manifold, caster);
        self.camera
            .update(self.agent.position, self.agent.heading, DT, caster);
        self.keyboard.clear_transients();
        report.animation
    }
}

#[test]
fn walking_keeps_agent_and_camera_consistent() {
    let mut rig = Rig::new();
    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));

    for _ in 0..300 {
        assert_eq!(rig.frame(None), AnimationState::Walk);
        let r = rig.agent.position.length();
        assert!((r - 50.0).abs() < 1e-6, "agent left the surface: {r}");
    }

    let travelled = 300.0 * DT * rig.locomotion.settings().walk_speed;
    let ll = rig.agent.lat_lon(&rig.manifold);
    let expected_lat = travelled / 50.0 * 180.0 / std::f64::consts::PI;
    assert!((ll.lat - expected_lat).abs() < 1e-6, "lat {}", ll.lat);

    let cam = rig.camera.current().unwrap();
    assert!((cam.up.length() - 1.0).abs() < 1e-9);
    let ideal = rig
        .camera
        .ideal_target(rig.agent.position, rig.agent.heading);
    // Smoothed follow lags, but only by a bounded amount at walking speed.
    assert!((cam.position - ideal.position).length() < 5.0);
}

#[test]
fn holding_forward_crosses_the_pole_without_camera_pops() {
    let mut rig = Rig::new();
    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));

    let mut max_lat = f64::MIN;
    let mut max_ideal_jump: f64 = 0.0;
    let mut max_camera_jump: f64 = 0.0;
    let mut last_ideal = rig
        .camera
        .ideal_target(rig.agent.position, rig.agent.heading)
        .position;
    let mut last_camera = None;
    // Twenty seconds of walking covers well over a quarter of the planet.
    for _ in 0..1200 {
        rig.frame(None);
        max_lat = max_lat.max(rig.agent.lat_lon(&rig.manifold).lat);

        let ideal = rig
            .camera
            .ideal_target(rig.agent.position, rig.agent.heading)
            .position;
        max_ideal_jump = max_ideal_jump.max(ideal.distance(last_ideal));
        last_ideal = ideal;

        let camera = rig.camera.current().unwrap().position;
        if let Some(last) = last_camera {
            max_camera_jump = max_camera_jump.max(camera.distance(last));
        }
        last_camera = Some(camera);
    }

    assert!(max_lat > 70.0, "agent stuck below {max_lat}");
    assert!(max_ideal_jump < 1.0, "ideal camera jumped {max_ideal_jump}");
    assert!(max_camera_jump < 1.0, "camera jumped {max_camera_jump}");
}

#[test]
fn releasing_keys_idles_without_turning() {
    let mut rig = Rig::new();
    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::KeyD));
    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));
    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::ShiftLeft));
    for _ in 0..30 {
        assert_eq!(rig.frame(None), AnimationState::Run);
    }
    let heading = rig.agent.heading;
    let relative = (heading - rig.agent.control_heading).rem_euclid(std::f64::consts::TAU);
    assert!((relative - std::f64::consts::FRAC_PI_4).abs() < 1e-9);

    rig.keyboard.release_all();
    for _ in 0..120 {
        assert_eq!(rig.frame(None), AnimationState::Idle);
    }
    assert_eq!(rig.agent.heading, heading);
}

#[test]
fn strafing_around_the_equator_returns_home() {
    let mut rig = Rig::new();
    let home = rig.agent.position;
    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::KeyD));

    let circumference = std::f64::consts::TAU * 50.0;
    let per_tick = rig.locomotion.settings().walk_speed * DT;
    let ticks = (circumference / per_tick).round() as usize;
    for _ in 0..ticks {
        rig.frame(None);
    }
    assert!(rig.manifold.arc_distance(home, rig.agent.position) < per_tick);
    assert!(rig.agent.lat_lon(&rig.manifold).lat.abs() < 1e-6);
    assert!(rig.camera.current().unwrap().position.is_finite());
}

#[test]
fn obstacle_blocks_agent_and_camera_stays_outside() {
    let mut rig = Rig::new();
    let ahead = rig.manifold.local_axes(rig.agent.position, 0.0).forward;
    let base = rig.manifold.move_on_surface(rig.agent.position, ahead, 3.0);
    let mut obstacles = ObstacleSet::new();
    obstacles.push(ObstacleShape::standing_capsule(
        base,
        rig.manifold.up_vector(base),
        6.0,
        0.4,
    ));

    rig.keyboard.process_raw(RawKeyEvent::pressed(KeyCode::KeyW));
    for _ in 0..300 {
        rig.frame(Some(&obstacles));
    }

    let walked = rig.manifold.arc_distance(
        rig.manifold.lat_lon_to_position(0.0, 0.0),
        rig.agent.position,
    );
    assert!(walked < 3.0 - 0.4, "walked {walked}");
    assert!(walked > 1.5, "walked {walked}");

    let cam = rig.camera.current().unwrap();
    assert!(!obstacles.iter().any(|o| o.contains(cam.position, 0.0)));
}
