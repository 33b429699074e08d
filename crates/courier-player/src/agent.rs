//! Per-agent movement state shared by the player and NPCs.

use std::f64::consts::TAU;
use std::fmt;

use courier_manifold::{LatLon, SphereManifold};
use glam::{DQuat, DVec2, DVec3};

/// Animation signal derived each tick for the animation collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Run,
}

impl AnimationState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and facing of one agent on the planet surface.
///
/// Owned and mutated only by
/// [`SurfaceLocomotion`](crate::SurfaceLocomotion); everything else reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentState {
    /// World position, kept on the surface after every move.
    pub position: DVec3,
    /// Rotation of forward around local up, in radians. Unbounded.
    pub heading: f64,
    /// Heading of the frame movement intent is read in: intent `(0, 1)`
    /// walks along it. Carried along the path with the agent.
    pub control_heading: f64,
    /// Last input intent (`x` = right, `y` = forward).
    pub velocity_intent: DVec2,
    pub is_running: bool,
    /// World-space displacement per second over the last tick.
    pub velocity: DVec3,
    pub animation: AnimationState,
}

impl AgentState {
    pub fn new(position: DVec3, heading: f64) -> Self {
        Self {
            position,
            heading,
            control_heading: 0.0,
            velocity_intent: DVec2::ZERO,
            is_running: false,
            velocity: DVec3::ZERO,
            animation: AnimationState::Idle,
        }
    }

    /// Spawn standing on the surface at the given latitude / longitude.
    pub fn spawn(manifold: &SphereManifold, lat: f64, lon: f64, heading: f64) -> Self {
        Self::new(manifold.lat_lon_to_position(lat, lon), heading)
    }

    /// Orientation that stands the avatar mesh on the surface.
    pub fn orientation(&self, manifold: &SphereManifold) -> DQuat {
        manifold.surface_orientation(self.position, self.heading)
    }

    pub fn forward(&self, manifold: &SphereManifold) -> DVec3 {
        manifold.local_axes(self.position, self.heading).forward
    }

    pub fn lat_lon(&self, manifold: &SphereManifold) -> LatLon {
        manifold.position_to_lat_lon(self.position)
    }

    /// Heading wrapped into `[0, 2π)`.
    pub fn normalized_heading(&self) -> f64 {
        self.heading.rem_euclid(TAU)
    }

    /// Turn in place to face `target`. Returns `false` (heading kept) when
    /// no facing is defined, i.e. the target is coincident or antipodal.
    pub fn face_towards(&mut self, manifold: &SphereManifold, target: DVec3) -> bool {
        match manifold.heading_towards(self.position, target) {
            Some(heading) => {
                self.heading = heading;
                true
            }
            None => false,
        }
    }
}
