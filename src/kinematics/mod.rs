//! Kinematic mapping from joint angles to cable path lengths and steps.
//!
//! The geometry functions are pure: fixed rig calibration constants, no
//! side effects, bit-reproducible results for the same input. Angles above
//! 90° are mirrored around the centered pose before the trigonometry is
//! applied; which physical cable receives the shorter path still depends on
//! the uncorrected angle's side of 90°.

pub mod elbow_pitch;
pub mod elbow_yaw;
pub mod steps;
pub mod wrist;

use crate::config::units::{Degrees, Millimeters};

/// Path lengths of an antagonistic cable pair at one joint angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableLengthPair {
    /// Path length of the cable on the near side of the bend.
    pub shorter: Millimeters,
    /// Path length of the cable wrapping the far side.
    pub longer: Millimeters,
}

impl CableLengthPair {
    /// Map (shorter, longer) onto the joint's (positive, negative) wiring
    /// for the given uncorrected angle: below 90° the positive-side cable
    /// takes the shorter path, at or above it takes the longer one.
    pub fn oriented(self, theta: Degrees) -> (Millimeters, Millimeters) {
        if theta.value() < 90.0 {
            (self.shorter, self.longer)
        } else {
            (self.longer, self.shorter)
        }
    }
}

/// Fold an angle into [0°, 90°] radians, mirroring the linkage geometry
/// around the centered pose.
pub(crate) fn mirrored_radians(theta: Degrees) -> f32 {
    if theta.value() > 90.0 {
        Degrees(180.0 - theta.value()).to_radians()
    } else {
        theta.to_radians()
    }
}
