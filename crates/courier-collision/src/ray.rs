use glam::DVec3;

/// A half-line with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. Returns `None` for a zero or
    /// non-finite direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        origin.is_finite().then_some(Self { origin, direction })
    }

    /// Ray from `origin` through `target`.
    pub fn between(origin: DVec3, target: DVec3) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// The closest surface a ray struck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the contact point.
    pub distance: f64,
    /// Contact point in world space (on the inflated surface).
    pub point: DVec3,
    /// Outward unit normal of the struck surface.
    pub normal: DVec3,
    /// Index of the struck proxy in its owning set.
    pub obstacle: usize,
}

/// The collision collaborator: anything that can answer sphere-swept ray
/// queries against world geometry.
///
/// `radius` inflates every proxy, turning the ray into a swept sphere. Rays
/// that start inside a proxy ignore it so that overlapping agents can walk
/// back out.
pub trait RayCaster {
    fn cast_ray(&self, ray: &Ray, max_distance: f64, radius: f64) -> Option<RayHit>;
}
