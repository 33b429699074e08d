//! Fixed-timestep loop fed with explicit frame times.
//!
//! Simulation runs at a fixed rate through an accumulator; rendering happens
//! once per frame with the leftover fraction as interpolation alpha. The
//! caller supplies each frame's duration, so a headless run is fully
//! deterministic.

use tracing::warn;

/// Longest frame accepted before clamping, to avoid a spiral of death.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct FixedStepLoop {
    fixed_dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FixedStepLoop {
    /// `tick_rate` must be non-zero; see [`GameError::TickRate`](crate::error::GameError).
    pub fn new(tick_rate: u32) -> Self {
        Self {
            fixed_dt: 1.0 / f64::from(tick_rate.max(1)),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Run one frame of `frame_time` seconds.
    ///
    /// `update_fn(fixed_dt, sim_time)` runs zero or more times, then
    /// `render_fn(alpha)` runs exactly once with alpha in `[0, 1)`.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let mut frame_time = if frame_time.is_finite() {
            frame_time.max(0.0)
        } else {
            0.0
        };
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= self.fixed_dt {
            update_fn(self.fixed_dt, self.total_sim_time);
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / self.fixed_dt
        } else {
            0.0
        }
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
