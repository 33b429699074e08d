//! Collision proxies and ray queries shared by the player controller and the
//! camera: spheres, capsules, and oriented boxes, plus a single
//! sweep-and-clamp helper used by every caller that must stop short of
//! geometry.

mod ray;
mod set;
mod shape;
mod sweep;

pub use ray::{Ray, RayCaster, RayHit};
pub use set::ObstacleSet;
pub use shape::ObstacleShape;
pub use sweep::{Sweep, SweepParams, sweep_toward};
