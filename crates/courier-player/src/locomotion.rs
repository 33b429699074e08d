//! Walking on the sphere: turns a 2D input intent into a heading and a
//! collision-resolved great-circle step.

use courier_collision::{RayCaster, SweepParams, sweep_toward};
use courier_input::MovementInput;
use courier_manifold::SphereManifold;
use glam::DVec3;
use tracing::debug;

use crate::agent::{AgentState, AnimationState};
use crate::settings::{LocomotionSettings, SettingsError};

/// Remaining travel shorter than this is not worth a slide sweep.
const MIN_SLIDE_DISTANCE: f64 = 1e-6;

/// What happened during one [`SurfaceLocomotion::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub animation: AnimationState,
    /// Arc length actually walked this tick.
    pub travelled: f64,
    /// An obstacle shortened or redirected the step.
    pub blocked: bool,
    /// The tick was rejected (bad timestep or corrupt state) and nothing
    /// changed.
    pub skipped: bool,
}

impl TickReport {
    fn skipped(animation: AnimationState) -> Self {
        Self {
            animation,
            travelled: 0.0,
            blocked: false,
            skipped: true,
        }
    }

    fn idle() -> Self {
        Self {
            animation: AnimationState::Idle,
            travelled: 0.0,
            blocked: false,
            skipped: false,
        }
    }
}

/// Result of resolving one step against the obstacles.
struct Step {
    position: DVec3,
    travelled: f64,
    blocked: bool,
}

/// Per-tick surface movement controller.
///
/// Stateless apart from its settings, so one instance can drive any number
/// of agents.
#[derive(Clone, Debug)]
pub struct SurfaceLocomotion {
    settings: LocomotionSettings,
}

impl SurfaceLocomotion {
    pub fn new(settings: LocomotionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    /// Advance `agent` by one tick.
    ///
    /// A non-positive or non-finite `dt`, or a NaN in the agent or the
    /// input, skips the tick and leaves the agent untouched. `dt` above
    /// `max_delta_time` is clamped. Idle input keeps the previous heading.
    ///
    /// After a move both `heading` and `control_heading` are re-expressed at
    /// the new position, so their raw values can jump by π where the
    /// heading-zero frame flips while the facing itself stays continuous.
    pub fn tick(
        &self,
        agent: &mut AgentState,
        input: &MovementInput,
        dt: f64,
        manifold: &SphereManifold,
        obstacles: Option<&dyn RayCaster>,
    ) -> TickReport {
        if !dt.is_finite() || dt <= 0.0 {
            debug!(dt, "skipping locomotion tick with invalid timestep");
            return TickReport::skipped(agent.animation);
        }
        if !agent.position.is_finite()
            || !agent.heading.is_finite()
            || !agent.control_heading.is_finite()
            || !input.intent.is_finite()
        {
            debug!(
                position = ?agent.position,
                heading = agent.heading,
                intent = ?input.intent,
                "skipping locomotion tick with non-finite state"
            );
            return TickReport::skipped(agent.animation);
        }

        let dt = dt.min(self.settings.max_delta_time);
        agent.velocity_intent = input.intent;
        agent.is_running = input.run;

        let magnitude = input.intent.length();
        if magnitude <= self.settings.idle_threshold {
            agent.velocity = DVec3::ZERO;
            agent.animation = AnimationState::Idle;
            return TickReport::idle();
        }

        // Intent is read in the agent's control frame. Both headings are
        // carried to the new position so a held key keeps its meaning where
        // the tangent frame's reference vector swaps.
        let start = agent.position;
        let heading = agent.control_heading + input.intent.x.atan2(input.intent.y);
        let direction = manifold.local_axes(start, heading).forward;

        let distance = self.settings.speed(input.run) * dt * magnitude.min(1.0);
        let step = self.resolve_step(start, direction, distance, manifold, obstacles);

        agent.velocity = (step.position - start) / dt;
        agent.position = step.position;
        if step.position == start {
            agent.heading = heading;
        } else {
            agent.heading = manifold.transport_heading(start, step.position, heading);
            agent.control_heading =
                manifold.transport_heading(start, step.position, agent.control_heading);
        }
        agent.animation = if input.run {
            AnimationState::Run
        } else {
            AnimationState::Walk
        };

        TickReport {
            animation: agent.animation,
            travelled: step.travelled,
            blocked: step.blocked,
            skipped: false,
        }
    }

    /// Move `distance` from `start` along `direction`, stopping short of the
    /// first obstacle and optionally sliding the remainder along it.
    fn resolve_step(
        &self,
        start: DVec3,
        direction: DVec3,
        distance: f64,
        manifold: &SphereManifold,
        obstacles: Option<&dyn RayCaster>,
    ) -> Step {
        let (position, travelled, hit_normal) =
            self.sweep_arc(start, direction, distance, manifold, obstacles);
        let Some(normal) = hit_normal else {
            return Step {
                position,
                travelled,
                blocked: false,
            };
        };

        let remaining = distance - travelled;
        if !self.settings.slide || remaining <= MIN_SLIDE_DISTANCE {
            return Step {
                position,
                travelled,
                blocked: true,
            };
        }

        // Keep only the part of the original direction that runs along the
        // obstacle, measured in the tangent plane where we stopped.
        let up = manifold.up_vector(position);
        let wall = (normal - up * normal.dot(up)).normalize_or_zero();
        let along = direction - wall * direction.dot(wall);
        let along = along - up * along.dot(up);
        let slide_distance = remaining * along.length();
        let Some(slide_direction) = along.try_normalize() else {
            return Step {
                position,
                travelled,
                blocked: true,
            };
        };
        if slide_distance <= MIN_SLIDE_DISTANCE {
            return Step {
                position,
                travelled,
                blocked: true,
            };
        }

        let (slid, slid_travelled, _) =
            self.sweep_arc(position, slide_direction, slide_distance, manifold, obstacles);
        Step {
            position: slid,
            travelled: travelled + slid_travelled,
            blocked: true,
        }
    }

    /// One swept great-circle move. Returns the reached position, the arc
    /// length covered, and the normal of the blocking surface if any.
    fn sweep_arc(
        &self,
        start: DVec3,
        direction: DVec3,
        distance: f64,
        manifold: &SphereManifold,
        obstacles: Option<&dyn RayCaster>,
    ) -> (DVec3, f64, Option<DVec3>) {
        let candidate = manifold.move_on_surface(start, direction, distance);
        let lift = self.settings.body_height;
        let from = manifold.project_to_surface_with_height(start, lift);
        let to = manifold.project_to_surface_with_height(candidate, lift);

        let params = SweepParams::sphere(self.settings.agent_radius, self.settings.collision_skin);
        let sweep = sweep_toward(obstacles, from, to, params);
        match sweep.hit {
            None => (candidate, distance, None),
            Some(hit) => {
                // Chord and arc are proportional over a single small step.
                let allowed = distance * sweep.fraction().clamp(0.0, 1.0);
                let reached = manifold.move_on_surface(start, direction, allowed);
                (reached, allowed, Some(hit.normal))
            }
        }
    }
}
