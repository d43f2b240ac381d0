use crate::types::MotionSample;
use crate::MotionSource;
use glam::Mat3;
use pivot_config::SimulatorConfig;

/// Synthetic sensor: a device turning in place about gravity while its
/// screen tilts about the device X axis.
///
/// Positive yaw rates turn clockwise seen from above (accumulates "right").
#[derive(Debug, Clone)]
pub struct SpinSimulator {
    /// Yaw rate in rad/s.
    yaw_rate: f32,
    /// Initial tilt in radians.
    tilt: f32,
    /// Tilt rate in rad/s.
    tilt_rate: f32,
    /// Seconds between samples.
    sample_period: f32,
    tick: u64,
    max_samples: Option<u64>,
}

impl SpinSimulator {
    pub fn new(config: &SimulatorConfig, sample_period: f32) -> Self {
        Self {
            yaw_rate: config.yaw_rate_dps.to_radians(),
            tilt: config.tilt_deg.to_radians(),
            tilt_rate: config.tilt_rate_dps.to_radians(),
            sample_period,
            tick: 0,
            max_samples: None,
        }
    }

    /// Stop producing samples after `samples` ticks.
    pub fn with_max_samples(mut self, samples: u64) -> Self {
        self.max_samples = Some(samples);
        self
    }

    /// Sample at `tick` without advancing the simulation.
    pub fn sample_at(&self, tick: u64) -> MotionSample {
        let t = tick as f32 * self.sample_period;
        let yaw = self.yaw_rate * t;
        let tilt = self.tilt + self.tilt_rate * t;
        MotionSample::from_device_attitude(Mat3::from_rotation_z(-yaw) * Mat3::from_rotation_x(tilt))
    }
}

impl MotionSource for SpinSimulator {
    fn next_sample(&mut self) -> Option<MotionSample> {
        if self.is_exhausted() {
            return None;
        }
        let sample = self.sample_at(self.tick);
        self.tick += 1;
        Some(sample)
    }

    fn is_exhausted(&self) -> bool {
        self.max_samples.is_some_and(|max| self.tick >= max)
    }
}
