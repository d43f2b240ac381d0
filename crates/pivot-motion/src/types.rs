use glam::{Mat3, Vec3};
use pivot_config::LabelStyle;
use std::f64::consts::TAU;
use std::fmt;

/// One orientation reading from the motion sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Device attitude, mapping device coordinates into the reference frame.
    pub attitude: Mat3,
    /// Gravity in the device frame (units of g). Only the direction is used.
    pub gravity: Vec3,
}

impl MotionSample {
    pub fn new(attitude: Mat3, gravity: Vec3) -> Self {
        Self { attitude, gravity }
    }

    /// Build a sample from a sensor-reported attitude matrix.
    ///
    /// Motion frameworks report attitude row by row (`m11..m33`) as the
    /// reference-to-device rotation. Loading those rows as columns gives the
    /// device-to-reference attitude used here.
    pub fn from_sensor_rows(rows: [[f32; 3]; 3], gravity: [f32; 3]) -> Self {
        Self {
            attitude: Mat3::from_cols_array_2d(&rows),
            gravity: Vec3::from_array(gravity),
        }
    }

    /// Sample for a device at `attitude` with gravity pointing down the
    /// reference Z axis.
    pub fn from_device_attitude(attitude: Mat3) -> Self {
        Self {
            attitude,
            gravity: attitude.transpose() * Vec3::NEG_Z,
        }
    }
}

/// Sense of accumulated rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Presentation-ready view of the accumulated rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSummary {
    /// Accumulated signed rotation about gravity (radians).
    pub total: f64,
    /// Completed full revolutions, regardless of direction.
    pub rotations: u64,
    pub direction: Direction,
}

impl RotationSummary {
    pub fn from_total(total: f64) -> Self {
        let rotations = (total.abs() / TAU).floor();
        Self {
            total,
            // Saturating float-to-int cast; NaN maps to zero.
            rotations: rotations as u64,
            direction: if total < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            },
        }
    }

    /// Human-readable label, e.g. `"Balanced"` or `"2 rotations left"`.
    pub fn label(&self, style: LabelStyle) -> String {
        if self.rotations == 0 {
            return "Balanced".to_string();
        }

        let count = self.rotations.to_string();
        let count = match style {
            LabelStyle::Full => count.as_str(),
            LabelStyle::LeadingDigit => &count[..1],
        };
        let noun = if self.rotations > 1 {
            "rotations"
        } else {
            "rotation"
        };

        format!("{count} {noun} {}", self.direction)
    }
}

impl Default for RotationSummary {
    fn default() -> Self {
        Self::from_total(0.0)
    }
}
