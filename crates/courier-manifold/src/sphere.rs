//! The walkable sphere and its surface geometry.
//!
//! All operations are pure functions of the manifold's `radius` and
//! `center`. Degenerate inputs never panic: they fall back to a sensible
//! value (world up, the unchanged input position, a clamped dot product).

use glam::{DQuat, DVec3};

use crate::{LatLon, ManifoldError};

/// When `|up · Y|` exceeds this, the tangent frame switches its reference
/// vector from +Y to +Z so the cross product never degenerates.
pub const POLE_THRESHOLD: f64 = 0.9;

/// Squared length below which a rotation axis is considered degenerate.
const DEGENERATE_AXIS_SQ: f64 = 1e-12;

/// Orthonormal tangent frame at a point on the sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalAxes {
    /// Direction the agent faces, tangent to the surface.
    pub forward: DVec3,
    /// Tangent direction to the agent's right.
    pub right: DVec3,
    /// Radially outward surface normal.
    pub up: DVec3,
}

/// A sphere of fixed radius that functions as the whole walkable world.
///
/// Created once per world and shared read-only by every agent and camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereManifold {
    radius: f64,
    center: DVec3,
}

impl SphereManifold {
    /// Build a manifold, rejecting non-finite or non-positive radii and
    /// non-finite centers.
    pub fn new(radius: f64, center: DVec3) -> Result<Self, ManifoldError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ManifoldError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(ManifoldError::InvalidCenter(center.x, center.y, center.z));
        }
        Ok(Self { radius, center })
    }

    /// A manifold centered on the world origin.
    pub fn at_origin(radius: f64) -> Result<Self, ManifoldError> {
        Self::new(radius, DVec3::ZERO)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Radially outward unit vector at `point`.
    ///
    /// The center itself has no direction; it yields world +Y.
    pub fn up_vector(&self, point: DVec3) -> DVec3 {
        (point - self.center).try_normalize().unwrap_or(DVec3::Y)
    }

    /// Unit vector pointing from `point` toward the planet center.
    pub fn gravity_direction(&self, point: DVec3) -> DVec3 {
        -self.up_vector(point)
    }

    /// Tangent frame at `point`, rotated by `heading` radians around up.
    ///
    /// Positive headings turn `forward` toward `right`.
    pub fn local_axes(&self, point: DVec3, heading: f64) -> LocalAxes {
        let up = self.up_vector(point);
        let reference = if up.dot(DVec3::Y).abs() > POLE_THRESHOLD {
            DVec3::Z
        } else {
            DVec3::Y
        };

        let right = up.cross(reference).normalize();
        let forward = right.cross(up).normalize();

        if heading == 0.0 {
            return LocalAxes { forward, right, up };
        }

        let turn = DQuat::from_axis_angle(up, heading);
        LocalAxes {
            forward: (turn * forward).normalize(),
            right: (turn * right).normalize(),
            up,
        }
    }

    /// Snap `point` onto the surface along its radial direction.
    pub fn project_to_surface(&self, point: DVec3) -> DVec3 {
        self.center + self.up_vector(point) * self.radius
    }

    /// Snap `point` onto a shell `height` above the surface.
    pub fn project_to_surface_with_height(&self, point: DVec3, height: f64) -> DVec3 {
        self.center + self.up_vector(point) * (self.radius + height)
    }

    /// Surface point for geographic angles in degrees.
    ///
    /// Polar angle `φ = 90° - lat` and azimuth `θ = lon`:
    /// `x = r sinφ sinθ`, `y = r cosφ`, `z = r sinφ cosθ`.
    pub fn lat_lon_to_position(&self, lat: f64, lon: f64) -> DVec3 {
        let phi = (90.0 - lat).to_radians();
        let theta = lon.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        self.center + DVec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius
    }

    /// Geographic angles of `point`, the inverse of
    /// [`lat_lon_to_position`](Self::lat_lon_to_position).
    ///
    /// Longitude is meaningless at the poles and reported as whatever the
    /// residual horizontal components give (0 for an exact pole).
    pub fn position_to_lat_lon(&self, point: DVec3) -> LatLon {
        let up = self.up_vector(point);
        let horizontal = (up.x * up.x + up.z * up.z).sqrt();
        let lat = up.y.atan2(horizontal).to_degrees();
        let lon = up.x.atan2(up.z).to_degrees();
        LatLon::new(lat, lon)
    }

    /// Orientation that stands a mesh upright at `point` and turns it by
    /// `heading` around the local up axis.
    pub fn surface_orientation(&self, point: DVec3, heading: f64) -> DQuat {
        let up = self.up_vector(point);
        // from_rotation_arc picks an arbitrary orthogonal axis for the
        // anti-parallel case, so the south pole stays finite.
        let align = DQuat::from_rotation_arc(DVec3::Y, up);
        if heading == 0.0 {
            return align;
        }
        (DQuat::from_axis_angle(up, heading) * align).normalize()
    }

    /// Walk `distance` (arc length) from `current` along `direction`.
    ///
    /// Only the tangential part of `direction` matters. A direction parallel
    /// to up (or any non-finite input) leaves `current` unchanged.
    pub fn move_on_surface(&self, current: DVec3, direction: DVec3, distance: f64) -> DVec3 {
        if !current.is_finite() || !direction.is_finite() || !distance.is_finite() {
            return current;
        }

        let up = self.up_vector(current);
        let axis = up.cross(direction);
        if axis.length_squared() < DEGENERATE_AXIS_SQ {
            return current;
        }

        let angle = distance / self.radius;
        let rotation = DQuat::from_axis_angle(axis.normalize(), angle);
        let moved = self.center + rotation * (current - self.center);
        self.project_to_surface(moved)
    }

    /// Great-circle distance between the radial projections of `a` and `b`.
    pub fn arc_distance(&self, a: DVec3, b: DVec3) -> f64 {
        let dot = self.up_vector(a).dot(self.up_vector(b)).clamp(-1.0, 1.0);
        self.radius * dot.acos()
    }

    /// Heading at `from` whose forward axis points along the great circle
    /// toward `to`.
    ///
    /// Returns `None` when the two points coincide or are antipodal, where
    /// every direction is equally valid.
    pub fn heading_towards(&self, from: DVec3, to: DVec3) -> Option<f64> {
        self.heading_of(from, self.up_vector(to))
    }

    /// Heading at `point` whose forward axis points along `direction`.
    ///
    /// Only the tangential part of `direction` counts; `None` when nothing
    /// is left of it.
    pub fn heading_of(&self, point: DVec3, direction: DVec3) -> Option<f64> {
        let up = self.up_vector(point);
        let tangent = direction - up * up.dot(direction);
        if !tangent.is_finite() || tangent.length_squared() < DEGENERATE_AXIS_SQ {
            return None;
        }

        let base = self.local_axes(point, 0.0);
        Some(tangent.dot(base.right).atan2(tangent.dot(base.forward)))
    }

    /// Re-express `heading` at `from` as the heading at `to` that faces the
    /// same way once the facing is carried along the shortest arc.
    ///
    /// The heading-zero frame flips where its reference vector swaps, so a
    /// heading number is only meaningful at the point it was taken. Anything
    /// that walks must carry its headings with it.
    pub fn transport_heading(&self, from: DVec3, to: DVec3, heading: f64) -> f64 {
        let forward = self.local_axes(from, heading).forward;
        let carry = DQuat::from_rotation_arc(self.up_vector(from), self.up_vector(to));
        self.heading_of(to, carry * forward).unwrap_or(heading)
    }
}
