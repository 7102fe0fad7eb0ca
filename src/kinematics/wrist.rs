//! Wrist pitch and jaw conversions.
//!
//! These joints ride the distal 0.3 mm-pitch stage and have no measured
//! nonlinear path model; the calibrated approximation is a constant
//! effective radius per joint.

use crate::config::units::{Degrees, Millimeters};

use super::steps::wrist_stage_steps;

/// Effective wrist pitch radius, mm.
pub const WRIST_RADIUS_MM: f32 = 1.7;

/// Effective jaw radius, mm (same for both jaws).
pub const JAW_RADIUS_MM: f32 = 1.35;

/// Steps for a wrist pitch angle delta.
pub fn wrist_pitch_steps(delta: Degrees) -> i64 {
    wrist_stage_steps(Millimeters(delta.to_radians() * WRIST_RADIUS_MM))
}

/// Steps for a jaw angle delta.
pub fn jaw_steps(delta: Degrees) -> i64 {
    wrist_stage_steps(Millimeters(delta.to_radians() * JAW_RADIUS_MM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrist_pitch_steps() {
        // 10 deg * 1.7 mm over the 0.3 mm stage: 0.17453 * 1.7 * 666.67
        let steps = wrist_pitch_steps(Degrees(10.0));
        assert_eq!(steps, 197);
        assert_eq!(wrist_pitch_steps(Degrees(-10.0)), -197);
    }

    #[test]
    fn test_jaw_steps_zero_at_zero() {
        assert_eq!(jaw_steps(Degrees(0.0)), 0);
    }
}
