//! Step conversion layer.
//!
//! Translates cable length deltas (mm) or joint angle deltas (degrees) into
//! integer motor step counts. Each conversion below belongs to a different
//! physical stage with its own calibration; they stay separate functions and
//! must never be merged. All casts truncate toward zero - the calibration
//! constants were fitted against that exact behavior.

use crate::config::units::{Degrees, Millimeters, StepsPerSec};

/// Open-loop gain compensating cable slack and stretch on the elbow stages.
pub const OPEN_LOOP_GAIN: f32 = 1.4;

/// Steps for a cable length delta on the 0.5 mm lead-screw stage
/// (200 full steps per revolution).
pub fn lead_screw_steps(delta: Millimeters) -> i64 {
    (delta.value() / 0.5 * 200.0) as i64
}

/// Gain-corrected steps for a joint angle delta over the lead-screw stage.
///
/// The truncate-multiply-truncate order is deliberate: the raw step count is
/// truncated before the gain is applied, then truncated again.
pub fn gain_corrected_steps(delta: Degrees, link_radius_mm: f32, gain: f32) -> i64 {
    let delta_s = Millimeters(delta.to_radians() * link_radius_mm);
    (lead_screw_steps(delta_s) as f32 * gain) as i64
}

/// Gain-corrected steps for a cable length delta over the lead-screw stage.
/// Same truncate-multiply-truncate order as [`gain_corrected_steps`].
pub fn gain_corrected_length_steps(delta: Millimeters, gain: f32) -> i64 {
    (lead_screw_steps(delta) as f32 * gain) as i64
}

/// Steps for a joint angle delta over the high-resolution capstan stage:
/// 1.1 mm effective pulley radius, 23.40 mm of cable per revolution,
/// 1600 microsteps per revolution, 1.3 empirical correction.
pub fn capstan_steps(delta: Degrees) -> i64 {
    let delta_s = delta.to_radians() / 1.1;
    let revs = delta_s / 23.40;
    (revs * 1600.0 * 1.3) as i64
}

/// Steps for a cable length delta on the distal 0.3 mm-pitch stage.
pub fn wrist_stage_steps(delta: Millimeters) -> i64 {
    (delta.value() * (200.0 / 0.3)) as i64
}

/// Max speed for one motor of a synchronized group, scaled so that all
/// members finish together under constant-speed motion: each motor runs at
/// `base * |steps| / max_steps`.
pub fn scaled_speed(base: StepsPerSec, steps: i64, max_steps: i64) -> StepsPerSec {
    if max_steps == 0 {
        return base;
    }
    StepsPerSec(base.value() * steps.unsigned_abs() as f32 / max_steps.unsigned_abs() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_screw_truncates_toward_zero() {
        // 1.2345 mm -> 493.8 steps -> 493
        assert_eq!(lead_screw_steps(Millimeters(1.2345)), 493);
        assert_eq!(lead_screw_steps(Millimeters(-1.2345)), -493);
        assert_eq!(lead_screw_steps(Millimeters(0.0)), 0);
    }

    #[test]
    fn test_gain_corrected_truncates_twice() {
        // 10 deg on the elbow pitch link: 0.174533 rad * 3.24 = 0.565487 mm
        // -> 226.19 steps -> 226 -> * 1.4 = 316.4 -> 316
        let steps = gain_corrected_steps(Degrees(10.0), 3.24, OPEN_LOOP_GAIN);
        assert_eq!(steps, 316);

        let steps = gain_corrected_steps(Degrees(-10.0), 3.24, OPEN_LOOP_GAIN);
        assert_eq!(steps, -316);
    }

    #[test]
    fn test_capstan_steps() {
        // 90 deg: 1.5708 / 1.1 / 23.40 * 1600 * 1.3 = 126.9 -> 126
        assert_eq!(capstan_steps(Degrees(90.0)), 126);
        assert_eq!(capstan_steps(Degrees(-90.0)), -126);
        assert_eq!(capstan_steps(Degrees(0.0)), 0);
    }

    #[test]
    fn test_scaled_speed_ratio() {
        let base = StepsPerSec(100.0);
        let fast = scaled_speed(base, 100, 100);
        let slow = scaled_speed(base, 50, 100);
        assert!((fast.value() - 100.0).abs() < 1e-4);
        assert!((slow.value() - 50.0).abs() < 1e-4);
        // Sign of the step count never affects the speed magnitude.
        assert_eq!(scaled_speed(base, -50, 100), slow);
    }

    #[test]
    fn test_scaled_speed_empty_group() {
        let base = StepsPerSec(100.0);
        assert_eq!(scaled_speed(base, 0, 0), base);
    }
}
