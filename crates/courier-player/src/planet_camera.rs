//! Third-person follow camera for a spherical world.
//!
//! The rig sits behind and above the target in the target's own tangent
//! frame, pulls in when geometry blocks the view, and eases toward its goal
//! with frame-rate-independent smoothing. Its up vector follows the surface
//! normal under the camera itself, so the horizon stays level as the target
//! walks around the planet.

use courier_collision::{RayCaster, SweepParams, sweep_toward};
use courier_manifold::SphereManifold;
use glam::DVec3;
use tracing::debug;

use crate::settings::{CameraSettings, CameraSmoothing, SettingsError};
use crate::smoothing::blend_factor;

/// Geometry the camera follows on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Up and forward come from the sphere at the target.
    Spherical,
    /// World `+Y` is up; heading rotates forward in the XZ plane.
    Flat,
}

/// Camera pose handed to the renderer each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    pub position: DVec3,
    pub look_at: DVec3,
    pub up: DVec3,
}

/// Where the camera wants to be this frame, before smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Goal {
    position: DVec3,
    look_at: DVec3,
}

#[derive(Clone, Debug)]
pub struct PlanetCamera {
    settings: CameraSettings,
    manifold: Option<SphereManifold>,
    /// `None` until the first update, and again after [`reset`](Self::reset).
    current: Option<CameraTransform>,
}

impl PlanetCamera {
    /// Spherical mode when a manifold is supplied, flat mode otherwise.
    pub fn new(
        settings: CameraSettings,
        manifold: Option<SphereManifold>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            manifold,
            current: None,
        })
    }

    pub fn mode(&self) -> CameraMode {
        if self.manifold.is_some() {
            CameraMode::Spherical
        } else {
            CameraMode::Flat
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Last emitted transform, if the rig has been placed.
    pub fn current(&self) -> Option<CameraTransform> {
        self.current
    }

    /// Set the follow distance, clamped to the zoom range.
    pub fn set_distance(&mut self, distance: f64) {
        if distance.is_finite() {
            self.settings.distance =
                distance.clamp(self.settings.min_distance, self.settings.max_distance);
        }
    }

    pub fn set_height(&mut self, height: f64) {
        if height.is_finite() {
            self.settings.height = height;
        }
    }

    /// Zoom in (negative) or out (positive) by `delta` world units.
    pub fn zoom(&mut self, delta: f64) {
        self.set_distance(self.settings.distance + delta);
    }

    pub fn set_smoothing(&mut self, smoothing: CameraSmoothing) -> Result<(), SettingsError> {
        let candidate = CameraSettings {
            smoothing,
            ..self.settings.clone()
        };
        candidate.validate()?;
        self.settings = candidate;
        Ok(())
    }

    /// Forget the current pose; the next update snaps straight to its goal.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Unsmoothed, collision-free camera position and aim for a target.
    pub fn ideal_target(&self, target: DVec3, heading: f64) -> CameraTransform {
        let (base, forward, up) = self.target_frame(target, heading);
        CameraTransform {
            position: base - forward * self.settings.distance + up * self.settings.height,
            look_at: base + up * self.settings.look_at_height,
            up,
        }
    }

    /// Advance the rig one frame toward the target.
    ///
    /// A non-finite target holds the current pose. An invalid `dt` gives a
    /// zero blend, which also holds the pose. Without `obstacles` the camera
    /// never pulls in.
    ///
    /// `heading` is read in the tangent frame at `target` itself, which is
    /// how [`SurfaceLocomotion`](crate::SurfaceLocomotion) leaves it after
    /// every tick; that keeps the goal continuous across the pole swap.
    pub fn update(
        &mut self,
        target: DVec3,
        heading: f64,
        dt: f64,
        obstacles: Option<&dyn RayCaster>,
    ) -> Option<CameraTransform> {
        if !target.is_finite() || !heading.is_finite() {
            debug!(?target, heading, "camera target is not finite, holding pose");
            return self.current;
        }

        let goal = self.goal(target, heading, obstacles);
        let next = match self.current {
            None => CameraTransform {
                position: goal.position,
                look_at: goal.look_at,
                up: self.up_at(goal.position),
            },
            // Zero blend everywhere.
            Some(current) if !dt.is_finite() || dt <= 0.0 => current,
            Some(current) => self.smooth(current, goal, dt),
        };
        self.current = Some(next);
        Some(next)
    }

    fn smooth(&self, current: CameraTransform, goal: Goal, dt: f64) -> CameraTransform {
        let s = self.settings.smoothing;
        let position = current
            .position
            .lerp(goal.position, blend_factor(s.position, dt));
        let look_at = current
            .look_at
            .lerp(goal.look_at, blend_factor(s.look_at, dt));

        let blended = current.up.lerp(self.up_at(position), blend_factor(s.up, dt));
        let up = if blended.length_squared() > 0.5 {
            blended.normalize()
        } else {
            current.up
        };

        CameraTransform {
            position,
            look_at,
            up,
        }
    }

    /// Ideal placement with the collision pull-in applied.
    fn goal(&self, target: DVec3, heading: f64, obstacles: Option<&dyn RayCaster>) -> Goal {
        let ideal = self.ideal_target(target, heading);
        let (base, _, up) = self.target_frame(target, heading);
        let pivot = base + up * self.settings.pivot_height;

        let sweep = sweep_toward(
            obstacles,
            pivot,
            ideal.position,
            SweepParams::ray(self.settings.collision_skin, self.settings.min_distance),
        );
        let position = if sweep.is_blocked() {
            sweep.end_point(pivot)
        } else {
            ideal.position
        };

        Goal {
            position,
            look_at: ideal.look_at,
        }
    }

    /// Surface point under the target, its forward, and its up.
    fn target_frame(&self, target: DVec3, heading: f64) -> (DVec3, DVec3, DVec3) {
        match &self.manifold {
            Some(manifold) => {
                let axes = manifold.local_axes(target, heading);
                (manifold.project_to_surface(target), axes.forward, axes.up)
            }
            None => {
                let forward = DVec3::new(heading.sin(), 0.0, heading.cos());
                (target, forward, DVec3::Y)
            }
        }
    }

    /// Up direction for a camera standing at `position`.
    fn up_at(&self, position: DVec3) -> DVec3 {
        match &self.manifold {
            Some(manifold) => manifold.up_vector(position),
            None => DVec3::Y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_collision::{ObstacleSet, ObstacleShape};

    const DT: f64 = 1.0 / 60.0;

    fn planet() -> SphereManifold {
        SphereManifold::at_origin(50.0).unwrap()
    }

    fn spherical() -> PlanetCamera {
        PlanetCamera::new(CameraSettings::default(), Some(planet())).unwrap()
    }

    fn flat() -> PlanetCamera {
        PlanetCamera::new(CameraSettings::default(), None).unwrap()
    }

    #[test]
    fn test_mode_from_manifold() {
        assert_eq!(spherical().mode(), CameraMode::Spherical);
        assert_eq!(flat().mode(), CameraMode::Flat);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = CameraSettings {
            min_distance: 50.0,
            ..Default::default()
        };
        assert!(PlanetCamera::new(settings, None).is_err());
    }

    #[test]
    fn test_first_update_snaps_to_ideal() {
        let m = planet();
        let mut cam = spherical();
        let target = m.lat_lon_to_position(20.0, 40.0);
        let t = cam.update(target, 0.3, DT, None).unwrap();
        let ideal = cam.ideal_target(target, 0.3);
        assert!((t.position - ideal.position).length() < 1e-9);
        assert!((t.look_at - ideal.look_at).length() < 1e-9);
    }

    #[test]
    fn test_ideal_sits_behind_and_above() {
        let m = planet();
        let cam = spherical();
        let target = m.lat_lon_to_position(0.0, 0.0);
        let ideal = cam.ideal_target(target, 0.0);
        let axes = m.local_axes(target, 0.0);
        let offset = ideal.position - target;
        assert!((offset.dot(axes.forward) + 10.0).abs() < 1e-9);
        assert!((offset.dot(axes.up) - 5.0).abs() < 1e-9);
        assert!((ideal.look_at - (target + axes.up * 1.5)).length() < 1e-9);
    }

    #[test]
    fn test_converges_on_moving_target() {
        let m = planet();
        let mut cam = spherical();
        cam.update(m.lat_lon_to_position(0.0, 0.0), 0.0, DT, None);
        let target = m.lat_lon_to_position(5.0, 8.0);
        let mut last = None;
        for _ in 0..600 {
            last = cam.update(target, 1.0, DT, None);
        }
        let t = last.unwrap();
        let ideal = cam.ideal_target(target, 1.0);
        assert!((t.position - ideal.position).length() < 1e-3);
        assert!((t.look_at - ideal.look_at).length() < 1e-3);
    }

    #[test]
    fn test_smoothing_does_not_jump() {
        let m = planet();
        let mut cam = spherical();
        let start = cam.update(m.lat_lon_to_position(0.0, 0.0), 0.0, DT, None).unwrap();
        let next = cam
            .update(m.lat_lon_to_position(10.0, 0.0), 0.0, DT, None)
            .unwrap();
        let ideal = cam.ideal_target(m.lat_lon_to_position(10.0, 0.0), 0.0);
        let full = (ideal.position - start.position).length();
        let moved = (next.position - start.position).length();
        assert!((moved / full - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_up_follows_camera_position() {
        let m = planet();
        let mut cam = spherical();
        let target = m.lat_lon_to_position(30.0, 30.0);
        let t = cam.update(target, 0.0, DT, None).unwrap();
        assert!((t.up - m.up_vector(t.position)).length() < 1e-9);
        // Ten units behind on a radius-50 planet is a visibly different up.
        assert!((t.up - m.up_vector(target)).length() > 0.05);
    }

    #[test]
    fn test_up_stays_unit_while_smoothing() {
        let m = planet();
        let mut cam = spherical();
        cam.update(m.lat_lon_to_position(0.0, 0.0), 0.0, DT, None);
        for i in 0..120 {
            let t = cam
                .update(m.lat_lon_to_position(i as f64, 0.0), 0.0, DT, None)
                .unwrap();
            assert!((t.up.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_collision_pulls_camera_in_but_not_below_min() {
        let m = planet();
        let mut cam = spherical();
        let target = m.lat_lon_to_position(0.0, 0.0);
        let ideal = cam.ideal_target(target, 0.0);
        let up = m.up_vector(target);
        let pivot = target + up * cam.settings().pivot_height;
        // A boulder right behind the target, in the line of sight.
        let toward = (ideal.position - pivot).normalize();
        let obstacles: ObstacleSet =
            std::iter::once(ObstacleShape::sphere(pivot + toward * 2.5, 1.0)).collect();

        let t = cam.update(target, 0.0, DT, Some(&obstacles)).unwrap();
        let pulled = (t.position - pivot).length();
        assert!(pulled < (ideal.position - pivot).length());
        assert!(pulled >= cam.settings().min_distance - 1e-9);
        assert!((pulled - cam.settings().min_distance).abs() < 1e-9);
    }

    #[test]
    fn test_collision_stops_short_by_skin() {
        let m = planet();
        let mut cam = spherical();
        let target = m.lat_lon_to_position(0.0, 0.0);
        let ideal = cam.ideal_target(target, 0.0);
        let pivot = target + m.up_vector(target) * cam.settings().pivot_height;
        let toward = (ideal.position - pivot).normalize();
        let obstacles: ObstacleSet =
            std::iter::once(ObstacleShape::sphere(pivot + toward * 8.0, 1.0)).collect();

        let t = cam.update(target, 0.0, DT, Some(&obstacles)).unwrap();
        let pulled = (t.position - pivot).length();
        assert!((pulled - (7.0 - cam.settings().collision_skin)).abs() < 1e-9);
    }

    #[test]
    fn test_flat_mode_offsets() {
        let mut cam = flat();
        let t = cam.update(DVec3::ZERO, 0.0, DT, None).unwrap();
        assert!((t.position - DVec3::new(0.0, 5.0, -10.0)).length() < 1e-12);
        assert!((t.look_at - DVec3::new(0.0, 1.5, 0.0)).length() < 1e-12);
        assert_eq!(t.up, DVec3::Y);

        let mut cam = flat();
        let t = cam
            .update(DVec3::ZERO, std::f64::consts::FRAC_PI_2, DT, None)
            .unwrap();
        assert!((t.position - DVec3::new(-10.0, 5.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_invalid_dt_holds_state() {
        let m = planet();
        let mut cam = spherical();
        let first = cam.update(m.lat_lon_to_position(0.0, 0.0), 0.0, DT, None);
        for dt in [0.0, -1.0, f64::NAN] {
            let held = cam.update(m.lat_lon_to_position(20.0, 20.0), 0.0, dt, None);
            assert_eq!(held, first);
        }
    }

    #[test]
    fn test_non_finite_target_holds_pose() {
        let mut cam = flat();
        assert!(cam.update(DVec3::NAN, 0.0, DT, None).is_none());
        let placed = cam.update(DVec3::ZERO, 0.0, DT, None);
        assert_eq!(cam.update(DVec3::splat(f64::NAN), 0.0, DT, None), placed);
        assert_eq!(cam.update(DVec3::ZERO, f64::INFINITY, DT, None), placed);
    }

    #[test]
    fn test_reset_snaps_next_update() {
        let m = planet();
        let mut cam = spherical();
        cam.update(m.lat_lon_to_position(0.0, 0.0), 0.0, DT, None);
        cam.reset();
        assert!(cam.current().is_none());
        let target = m.lat_lon_to_position(-60.0, 120.0);
        let t = cam.update(target, 2.0, DT, None).unwrap();
        assert!((t.position - cam.ideal_target(target, 2.0).position).length() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut cam = flat();
        cam.zoom(-100.0);
        assert_eq!(cam.settings().distance, cam.settings().min_distance);
        cam.zoom(1000.0);
        assert_eq!(cam.settings().distance, cam.settings().max_distance);
        cam.set_distance(f64::NAN);
        assert_eq!(cam.settings().distance, cam.settings().max_distance);
    }

    #[test]
    fn test_set_height_changes_ideal() {
        let mut cam = flat();
        cam.set_height(8.0);
        let ideal = cam.ideal_target(DVec3::ZERO, 0.0);
        assert!((ideal.position.y - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_set_smoothing_validates() {
        let mut cam = flat();
        let bad = CameraSmoothing {
            position: 1.5,
            ..Default::default()
        };
        assert!(cam.set_smoothing(bad).is_err());
        assert_eq!(cam.settings().smoothing, CameraSmoothing::default());
        let snappy = CameraSmoothing {
            position: 1.0,
            look_at: 1.0,
            up: 1.0,
        };
        assert!(cam.set_smoothing(snappy).is_ok());
    }
}
