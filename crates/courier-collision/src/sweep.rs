//! The one "sweep toward a target, stop short of the first hit" routine.
//!
//! Both the agent controller and the camera resolve their motion through
//! [`sweep_toward`]; they differ only in the start point they pass and in
//! the [`SweepParams`] they configure.

use glam::DVec3;
use tracing::trace;

use crate::{Ray, RayCaster, RayHit};

/// Tuning for a single sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepParams {
    /// Radius of the swept sphere (0 for a thin ray).
    pub radius: f64,
    /// Gap kept between the resolved point and the struck surface.
    pub skin: f64,
    /// Floor applied to the resolved distance when something is hit.
    pub min_distance: f64,
}

impl SweepParams {
    pub fn ray(skin: f64, min_distance: f64) -> Self {
        Self {
            radius: 0.0,
            skin,
            min_distance,
        }
    }

    pub fn sphere(radius: f64, skin: f64) -> Self {
        Self {
            radius,
            skin,
            min_distance: 0.0,
        }
    }
}

/// Outcome of [`sweep_toward`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    /// Unit direction from origin to target (zero for a degenerate sweep).
    pub direction: DVec3,
    /// Unobstructed origin-to-target length.
    pub full_distance: f64,
    /// Travel allowed along `direction`.
    pub resolved_distance: f64,
    /// The blocking contact, if any.
    pub hit: Option<RayHit>,
}

impl Sweep {
    pub fn is_blocked(&self) -> bool {
        self.hit.is_some()
    }

    /// Share of the requested travel that was allowed, in `[0, 1]` unless
    /// the distance floor pushed it further.
    pub fn fraction(&self) -> f64 {
        if self.full_distance <= 0.0 {
            1.0
        } else {
            self.resolved_distance / self.full_distance
        }
    }

    /// World point reached from `origin`.
    pub fn end_point(&self, origin: DVec3) -> DVec3 {
        origin + self.direction * self.resolved_distance
    }
}

/// Sweep from `origin` toward `target` against `caster`.
///
/// On a hit the travel is `max(hit - skin, min_distance)`; otherwise the
/// full distance. A missing caster disables collision for the call.
pub fn sweep_toward(
    caster: Option<&dyn RayCaster>,
    origin: DVec3,
    target: DVec3,
    params: SweepParams,
) -> Sweep {
    let full_distance = origin.distance(target);
    let Some(ray) = Ray::between(origin, target) else {
        return Sweep {
            direction: DVec3::ZERO,
            full_distance: 0.0,
            resolved_distance: 0.0,
            hit: None,
        };
    };

    let hit = caster.and_then(|c| c.cast_ray(&ray, full_distance, params.radius));
    let resolved_distance = match hit {
        Some(h) => {
            trace!(
                obstacle = h.obstacle,
                distance = h.distance,
                full_distance,
                "sweep blocked"
            );
            (h.distance - params.skin).max(params.min_distance)
        }
        None => full_distance,
    };

    Sweep {
        direction: ray.direction,
        full_distance,
        resolved_distance,
        hit,
    }
}
