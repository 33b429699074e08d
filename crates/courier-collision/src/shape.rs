//! Intersectable proxy shapes.
//!
//! Every query accepts an inflation radius so the same routines serve both
//! thin rays (camera) and swept spheres (agent bodies).

use glam::{DQuat, DVec3};

use crate::Ray;

const PARALLEL_EPS: f64 = 1e-12;

/// A collision proxy standing in for a piece of world geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObstacleShape {
    /// Round props: trees, bushes, mailboxes.
    Sphere { center: DVec3, radius: f64 },
    /// Segment swept by a sphere: lamp posts, NPC bodies.
    Capsule { a: DVec3, b: DVec3, radius: f64 },
    /// Box with arbitrary orientation: buildings standing on the sphere.
    Box {
        center: DVec3,
        half_extents: DVec3,
        rotation: DQuat,
    },
}

impl ObstacleShape {
    pub fn sphere(center: DVec3, radius: f64) -> Self {
        Self::Sphere { center, radius }
    }

    pub fn capsule(a: DVec3, b: DVec3, radius: f64) -> Self {
        Self::Capsule { a, b, radius }
    }

    /// A capsule standing on `base`, extending `height` along `up`.
    pub fn standing_capsule(base: DVec3, up: DVec3, height: f64, radius: f64) -> Self {
        let up = up.normalize_or_zero();
        let bottom = base + up * radius;
        let top = base + up * (height - radius).max(radius);
        Self::Capsule {
            a: bottom,
            b: top,
            radius,
        }
    }

    pub fn oriented_box(center: DVec3, half_extents: DVec3, rotation: DQuat) -> Self {
        Self::Box {
            center,
            half_extents: half_extents.abs(),
            rotation: rotation.normalize(),
        }
    }

    /// Entry distance and outward normal where `ray`, inflated by
    /// `inflate`, first touches this shape.
    ///
    /// Returns `None` on a miss, when the shape lies behind the origin, or
    /// when the origin is already inside the inflated shape.
    pub fn intersect(&self, ray: &Ray, inflate: f64) -> Option<(f64, DVec3)> {
        match *self {
            Self::Sphere { center, radius } => ray_sphere(ray, center, radius + inflate),
            Self::Capsule { a, b, radius } => ray_capsule(ray, a, b, radius + inflate),
            Self::Box {
                center,
                half_extents,
                rotation,
            } => ray_box(ray, center, half_extents + DVec3::splat(inflate), rotation),
        }
    }

    /// Whether `point` lies inside the shape inflated by `inflate`.
    pub fn contains(&self, point: DVec3, inflate: f64) -> bool {
        match *self {
            Self::Sphere { center, radius } => {
                point.distance_squared(center) < (radius + inflate).powi(2)
            }
            Self::Capsule { a, b, radius } => {
                point.distance_squared(closest_on_segment(point, a, b)) < (radius + inflate).powi(2)
            }
            Self::Box {
                center,
                half_extents,
                rotation,
            } => {
                let local = rotation.inverse() * (point - center);
                let h = half_extents + DVec3::splat(inflate);
                local.x.abs() < h.x && local.y.abs() < h.y && local.z.abs() < h.z
            }
        }
    }
}

fn closest_on_segment(p: DVec3, a: DVec3, b: DVec3) -> DVec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < PARALLEL_EPS {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

fn ray_sphere(ray: &Ray, center: DVec3, radius: f64) -> Option<(f64, DVec3)> {
    if radius <= 0.0 {
        return None;
    }
    let oc = ray.origin - center;
    let c = oc.length_squared() - radius * radius;
    if c < 0.0 {
        return None;
    }
    let b = oc.dot(ray.direction);
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t < 0.0 {
        return None;
    }
    let normal = (ray.at(t) - center) / radius;
    Some((t, normal))
}

fn ray_capsule(ray: &Ray, a: DVec3, b: DVec3, radius: f64) -> Option<(f64, DVec3)> {
    if radius <= 0.0 {
        return None;
    }
    let origin = ray.origin;
    if origin.distance_squared(closest_on_segment(origin, a, b)) < radius * radius {
        return None;
    }

    let ba = b - a;
    let baba = ba.length_squared();
    if baba < PARALLEL_EPS {
        return ray_sphere(ray, a, radius);
    }

    let d = ray.direction;
    let oa = origin - a;
    let bard = ba.dot(d);
    let baoa = ba.dot(oa);
    let rdoa = d.dot(oa);
    let oaoa = oa.length_squared();

    let mut best: Option<(f64, DVec3)> = None;

    // Cylindrical body.
    let k2 = baba - bard * bard;
    if k2 > PARALLEL_EPS {
        let k1 = baba * rdoa - baoa * bard;
        let k0 = baba * oaoa - baoa * baoa - radius * radius * baba;
        let h = k1 * k1 - k2 * k0;
        if h >= 0.0 {
            let t = (-k1 - h.sqrt()) / k2;
            let y = baoa + t * bard;
            if t >= 0.0 && y > 0.0 && y < baba {
                let normal = (oa + d * t - ba * (y / baba)) / radius;
                best = Some((t, normal));
            }
        }
    }

    // Hemispherical caps. Each end sphere sits inside the capsule, so the
    // nearest of all candidates is the true entry point.
    for end in [a, b] {
        if let Some(hit) = ray_sphere(ray, end, radius)
            && best.is_none_or(|(t, _)| hit.0 < t)
        {
            best = Some(hit);
        }
    }

    best
}

fn ray_box(ray: &Ray, center: DVec3, half: DVec3, rotation: DQuat) -> Option<(f64, DVec3)> {
    let inverse = rotation.inverse();
    let origin = inverse * (ray.origin - center);
    let dir = inverse * ray.direction;

    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut enter_normal = DVec3::ZERO;
    let mut inside = true;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let h = half[axis];
        if o.abs() >= h {
            inside = false;
        }

        if d.abs() < PARALLEL_EPS {
            if o.abs() > h {
                return None;
            }
            continue;
        }

        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        if near > t_enter {
            t_enter = near;
            let mut n = DVec3::ZERO;
            n[axis] = -d.signum();
            enter_normal = n;
        }
        t_exit = t_exit.min(far);
    }

    if inside || t_enter > t_exit || t_enter < 0.0 {
        return None;
    }
    Some((t_enter, rotation * enter_normal))
}
