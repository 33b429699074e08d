//! Typed, validated tuning for the locomotion controller and the camera.
//!
//! Both structs are checked once, when the controller or camera is built;
//! the per-tick code trusts them.

/// A tuning value outside its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

fn check(
    field: &'static str,
    value: f64,
    requirement: &'static str,
    ok: impl Fn(f64) -> bool,
) -> Result<(), SettingsError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            requirement,
            value,
        })
    }
}

/// Tuning for [`SurfaceLocomotion`](crate::SurfaceLocomotion).
#[derive(Clone, Debug, PartialEq)]
pub struct LocomotionSettings {
    /// Walking speed in world units (arc length) per second.
    pub walk_speed: f64,
    /// Speed multiplier while the run key is held.
    pub run_multiplier: f64,
    /// Largest timestep integrated in one tick; longer frames are clamped.
    pub max_delta_time: f64,
    /// Intent magnitudes at or below this count as idle.
    pub idle_threshold: f64,
    /// Radius of the swept body sphere.
    pub agent_radius: f64,
    /// Height above the feet at which the body sphere is swept.
    pub body_height: f64,
    /// Gap kept between the body and anything it walks into.
    pub collision_skin: f64,
    /// Redirect blocked travel along the obstacle instead of stopping.
    pub slide: bool,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            run_multiplier: 2.0,
            max_delta_time: 0.1,
            idle_threshold: 0.01,
            agent_radius: 0.5,
            body_height: 1.0,
            collision_skin: 0.05,
            slide: true,
        }
    }
}

impl LocomotionSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        check("walk_speed", self.walk_speed, "non-negative", |v| v >= 0.0)?;
        check("run_multiplier", self.run_multiplier, "positive", |v| v > 0.0)?;
        check("max_delta_time", self.max_delta_time, "positive", |v| v > 0.0)?;
        check("idle_threshold", self.idle_threshold, "in [0, 1)", |v| {
            (0.0..1.0).contains(&v)
        })?;
        check("agent_radius", self.agent_radius, "non-negative", |v| v >= 0.0)?;
        check("body_height", self.body_height, "non-negative", |v| v >= 0.0)?;
        check("collision_skin", self.collision_skin, "non-negative", |v| v >= 0.0)?;
        Ok(())
    }

    /// Ground speed for the current run state.
    pub fn speed(&self, running: bool) -> f64 {
        if running {
            self.walk_speed * self.run_multiplier
        } else {
            self.walk_speed
        }
    }
}

/// Per-frame blend fractions at 60 Hz; see [`blend_factor`](crate::blend_factor).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSmoothing {
    pub position: f64,
    pub look_at: f64,
    pub up: f64,
}

impl Default for CameraSmoothing {
    fn default() -> Self {
        Self {
            position: 0.1,
            look_at: 0.15,
            up: 0.1,
        }
    }
}

impl CameraSmoothing {
    fn validate(&self) -> Result<(), SettingsError> {
        let in_unit = |v: f64| v > 0.0 && v <= 1.0;
        check("smoothing.position", self.position, "in (0, 1]", in_unit)?;
        check("smoothing.look_at", self.look_at, "in (0, 1]", in_unit)?;
        check("smoothing.up", self.up, "in (0, 1]", in_unit)
    }
}

/// Tuning for [`PlanetCamera`](crate::PlanetCamera).
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
    /// Desired distance behind the target along its forward axis.
    pub distance: f64,
    /// Desired height above the target along its up axis.
    pub height: f64,
    /// Aim point height above the target's feet.
    pub look_at_height: f64,
    /// Closest the camera may be pulled in by collision or zoom.
    pub min_distance: f64,
    /// Farthest the camera may zoom out.
    pub max_distance: f64,
    /// Gap kept between the camera and geometry it is pulled in front of.
    pub collision_skin: f64,
    /// Height above the target's feet where the collision ray starts.
    pub pivot_height: f64,
    pub smoothing: CameraSmoothing,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 10.0,
            height: 5.0,
            look_at_height: 1.5,
            min_distance: 2.0,
            max_distance: 30.0,
            collision_skin: 0.5,
            pivot_height: 1.5,
            smoothing: CameraSmoothing::default(),
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        check("min_distance", self.min_distance, "non-negative", |v| v >= 0.0)?;
        let min = self.min_distance;
        check("max_distance", self.max_distance, "at least min_distance", |v| v >= min)?;
        let max = self.max_distance;
        check("distance", self.distance, "within [min_distance, max_distance]", |v| {
            (min..=max).contains(&v)
        })?;
        check("height", self.height, "finite", |_| true)?;
        check("look_at_height", self.look_at_height, "finite", |_| true)?;
        check("collision_skin", self.collision_skin, "non-negative", |v| v >= 0.0)?;
        check("pivot_height", self.pivot_height, "finite", |_| true)?;
        self.smoothing.validate()
    }
}
