//! Per-channel motor configuration from TOML.

use serde::Deserialize;

use super::units::{StepsPerSec, StepsPerSec2};

/// Default max speed for every channel, steps per second.
pub const DEFAULT_MAX_SPEED: StepsPerSec = StepsPerSec(700.0);

/// Default acceleration, steps per second squared. Large enough that the
/// drivers never ramp; the rig runs constant-speed motion profiles.
pub const NO_RAMP_ACCELERATION: StepsPerSec2 = StepsPerSec2(1_000_000.0);

/// Configuration for one motor channel.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChannelConfig {
    /// Maximum speed in steps per second.
    #[serde(rename = "max_speed_steps_per_sec", default = "default_max_speed")]
    pub max_speed: StepsPerSec,

    /// Acceleration in steps per second squared.
    #[serde(
        rename = "acceleration_steps_per_sec2",
        default = "default_acceleration"
    )]
    pub acceleration: StepsPerSec2,
}

fn default_max_speed() -> StepsPerSec {
    DEFAULT_MAX_SPEED
}

fn default_acceleration() -> StepsPerSec2 {
    NO_RAMP_ACCELERATION
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            acceleration: NO_RAMP_ACCELERATION,
        }
    }
}
