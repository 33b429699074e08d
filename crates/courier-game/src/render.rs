//! The renderer seam.
//!
//! Everything a renderer needs to draw one frame is collected into a
//! [`FrameSnapshot`] and handed to a [`FrameSink`]. The headless binary uses
//! [`TraceFrameSink`], which writes the snapshot to the log.

use courier_manifold::LatLon;
use courier_player::{AnimationState, CameraTransform};
use glam::{DQuat, DVec3};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub sim_time: f64,
    /// Interpolation fraction between the last two simulation steps.
    pub alpha: f64,
    pub camera: CameraTransform,
    pub avatar_position: DVec3,
    pub avatar_orientation: DQuat,
    pub animation: AnimationState,
    pub lat_lon: LatLon,
    /// NPCs currently turned toward the avatar.
    pub watching_npcs: usize,
}

pub trait FrameSink {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Logs one snapshot every `interval` simulated seconds.
pub struct TraceFrameSink {
    interval: f64,
    next_report: f64,
    reported: u64,
}

impl TraceFrameSink {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: if interval.is_finite() { interval.max(0.0) } else { 0.0 },
            next_report: 0.0,
            reported: 0,
        }
    }

    /// Snapshots written so far.
    pub fn reported(&self) -> u64 {
        self.reported
    }
}

impl FrameSink for TraceFrameSink {
    fn present(&mut self, frame: &FrameSnapshot) {
        if frame.sim_time < self.next_report {
            return;
        }
        self.next_report = frame.sim_time + self.interval;
        self.reported += 1;

        let cam = frame.camera;
        info!(
            t = format_args!("{:.2}", frame.sim_time),
            at = %frame.lat_lon,
            animation = %frame.animation,
            watching = frame.watching_npcs,
            camera = format_args!(
                "({:.2}, {:.2}, {:.2})",
                cam.position.x, cam.position.y, cam.position.z
            ),
            camera_gap = format_args!("{:.2}", cam.position.distance(frame.avatar_position)),
            "frame"
        );
    }
}
