use crate::geometry::{gravity_axis_rotation_delta, is_vertical};
use crate::types::{MotionSample, RotationSummary};

/// Accumulates rotation about the gravity axis across consecutive samples.
///
/// Not synchronized: `update` and `reset` must be called from one place
/// (see [`crate::TrackerClient`]).
#[derive(Debug, Default)]
pub struct RotationTracker {
    /// Signed rotation in radians. Unbounded.
    total: f64,
    /// Sample from the last `update` call.
    previous: Option<MotionSample>,
    /// Whether the last delta used the upright projection.
    vertical: bool,
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sample and return the rotation delta it contributed.
    ///
    /// The first sample only establishes a reference and contributes zero.
    /// Undefined geometry (NaN) also contributes zero.
    pub fn update(&mut self, current: MotionSample) -> f32 {
        let Some(previous) = self.previous.replace(current) else {
            tracing::debug!("Reference sample stored");
            return 0.0;
        };

        let vertical = is_vertical(current.gravity);
        if vertical != self.vertical {
            tracing::debug!(vertical, "Projection orientation changed");
            self.vertical = vertical;
        }

        let mut delta = gravity_axis_rotation_delta(&current, &previous);
        if delta.is_nan() {
            tracing::debug!(gravity = ?current.gravity, "Discarding undefined rotation delta");
            delta = 0.0;
        }

        self.total += f64::from(delta);
        tracing::trace!(delta, total = self.total, "Rotation updated");
        delta
    }

    /// Zero the accumulated rotation. The stored reference sample is kept, so
    /// the next update still measures against the last real reading.
    pub fn reset(&mut self) {
        self.total = 0.0;
        tracing::info!("Rotation total reset");
    }

    /// Accumulated signed rotation in radians.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn previous(&self) -> Option<&MotionSample> {
        self.previous.as_ref()
    }

    pub fn summary(&self) -> RotationSummary {
        RotationSummary::from_total(self.total)
    }
}
