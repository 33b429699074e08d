//! Scripted key presses standing in for a player at the keyboard.

use courier_input::{KeyboardState, RawKeyEvent};
use winit::keyboard::KeyCode;

/// Hold `keys` for `duration` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteStep {
    pub duration: f64,
    pub keys: Vec<KeyCode>,
}

impl RouteStep {
    pub fn new(duration: f64, keys: &[KeyCode]) -> Self {
        Self {
            duration: duration.max(0.0),
            keys: keys.to_vec(),
        }
    }
}

/// A looping sequence of [`RouteStep`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    steps: Vec<RouteStep>,
    total: f64,
}

impl Route {
    pub fn new(steps: Vec<RouteStep>) -> Self {
        let total = steps.iter().map(|s| s.duration).sum();
        Self { steps, total }
    }

    /// A stroll around the spawn point: walk, run a diagonal, pause, strafe,
    /// back up, then stand still.
    pub fn demo() -> Self {
        use KeyCode::{KeyA, KeyD, KeyS, KeyW, ShiftLeft};
        Self::new(vec![
            RouteStep::new(4.0, &[KeyW]),
            RouteStep::new(3.0, &[KeyW, KeyD, ShiftLeft]),
            RouteStep::new(1.0, &[]),
            RouteStep::new(3.0, &[KeyA]),
            RouteStep::new(2.0, &[KeyS]),
            RouteStep::new(2.0, &[]),
        ])
    }

    pub fn total_duration(&self) -> f64 {
        self.total
    }

    /// Keys held at `time` seconds, wrapping around the end of the route.
    pub fn keys_at(&self, time: f64) -> &[KeyCode] {
        if self.total <= 0.0 || !time.is_finite() {
            return &[];
        }
        let mut t = time.rem_euclid(self.total);
        for step in &self.steps {
            if t < step.duration {
                return &step.keys;
            }
            t -= step.duration;
        }
        &[]
    }

    /// Press and release keys on `keyboard` so it matches the route at `time`.
    pub fn drive(&self, time: f64, keyboard: &mut KeyboardState) {
        let held = self.keys_at(time);
        for step in &self.steps {
            for &key in &step.keys {
                if !held.contains(&key) && keyboard.is_code_pressed(key) {
                    keyboard.process_raw(RawKeyEvent::released(key));
                }
            }
        }
        for &key in held {
            keyboard.process_raw(RawKeyEvent::pressed(key));
        }
    }
}
