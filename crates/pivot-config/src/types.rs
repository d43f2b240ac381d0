use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sampling cadence of the tracker.
    pub tracker: TrackerConfig,
    /// How the rotation count is presented.
    pub display: DisplayConfig,
    /// Synthetic motion used when no recording is replayed.
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Milliseconds between sensor samples.
    pub tick_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub label_style: LabelStyle,
}

/// Rendering of the revolution count in the rotation label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStyle {
    /// Every digit of the count ("12 rotations left").
    #[default]
    Full,
    /// Only the first digit of the count ("1 rotations left"), as older
    /// builds displayed it.
    LeadingDigit,
}

impl FromStr for LabelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(LabelStyle::Full),
            "leading-digit" => Ok(LabelStyle::LeadingDigit),
            other => Err(format!(
                "unknown label style {other:?} (expected \"full\" or \"leading-digit\")"
            )),
        }
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelStyle::Full => f.write_str("full"),
            LabelStyle::LeadingDigit => f.write_str("leading-digit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Turn rate about gravity in degrees per second. Positive is clockwise
    /// seen from above.
    pub yaw_rate_dps: f32,
    /// Initial screen tilt from flat, in degrees.
    pub tilt_deg: f32,
    /// Tilt change in degrees per second.
    pub tilt_rate_dps: f32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            yaw_rate_dps: 90.0,
            tilt_deg: 30.0,
            tilt_rate_dps: 0.0,
        }
    }
}
