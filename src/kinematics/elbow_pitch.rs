//! Elbow pitch cable geometry.
//!
//! Two-bar linkage with the cable anchors offset from the pivot. All lengths
//! in millimetres; the numeric constants are calibration values of the
//! physical rig and are not runtime-tunable.

use libm::{cosf, sinf, sqrtf};

use crate::config::units::{Degrees, Millimeters};

use super::{mirrored_radians, CableLengthPair};

/// Effective link radius for the gain-corrected step conversion, mm.
pub const LINK_RADIUS_MM: f32 = 3.24;

/// Open-loop gain for path-length elbow pitch moves.
pub const PATH_GAIN: f32 = 2.8;

/// Antagonistic cable path lengths at a pitch angle.
///
/// The shorter path runs from the upper anchor (radius 3.185 mm, phase
/// offset 0.6689 rad); the longer wraps the lower anchor (radius 1.89 mm,
/// phase offset 1.43 rad) plus a fixed routing offset.
pub fn cable_lengths(theta: Degrees) -> CableLengthPair {
    let t = mirrored_radians(theta);

    let x1 = -1.45 + 3.185 * cosf(t - 0.6689);
    let y1 = 3.3 + 3.185 * sinf(t - 0.6689);
    let shorter = sqrtf(x1 * x1 + y1 * y1);

    let x2 = 1.45 + 1.89 * cosf(t + 1.43);
    let y2 = 3.3 + 1.89 * sinf(t + 1.43);
    let longer = sqrtf(x2 * x2 + y2 * y2) + 2.2324;

    CableLengthPair {
        shorter: Millimeters(shorter),
        longer: Millimeters(longer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorter_is_shorter_below_center() {
        for deg in 1..90 {
            let pair = cable_lengths(Degrees(deg as f32));
            assert!(
                pair.shorter < pair.longer,
                "shorter >= longer at {} deg: {:?}",
                deg,
                pair
            );
        }
    }

    #[test]
    fn test_mirror_consistency() {
        for deg in 91..180 {
            let theta = Degrees(deg as f32);
            let mirrored = Degrees(180.0 - deg as f32);
            assert_eq!(cable_lengths(theta), cable_lengths(mirrored));
        }
    }

    #[test]
    fn test_deterministic() {
        let a = cable_lengths(Degrees(63.7));
        let b = cable_lengths(Degrees(63.7));
        assert_eq!(a, b);
    }
}
