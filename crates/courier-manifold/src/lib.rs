//! Sphere-surface coordinate math for the tiny planet: up vectors, tangent
//! frames, latitude/longitude conversion, great-circle movement, and
//! surface-locking orientations.

mod error;
mod lat_lon;
mod sphere;

pub use error::ManifoldError;
pub use lat_lon::LatLon;
pub use sphere::{LocalAxes, POLE_THRESHOLD, SphereManifold};
