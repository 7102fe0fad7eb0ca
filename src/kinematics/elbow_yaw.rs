//! Elbow yaw cable geometry.
//!
//! The shorter path has two regimes split at 32°: near the straight pose the
//! cable leaves the anchor directly (circular-arc formula); past the
//! breakpoint it wraps the guide pulley, so the length is an arc over the
//! pulley plus a straight tangent segment. The longer path stays linear in
//! the angle across the whole range. Constants are rig calibration values.

use libm::{asinf, atanf, cosf, sinf, sqrtf};

use crate::config::units::{Degrees, Millimeters};

use super::{mirrored_radians, CableLengthPair};

/// Effective link radius for the gain-corrected step conversion, mm.
pub const LINK_RADIUS_MM: f32 = 3.1;

/// Regime breakpoint for the shorter path, degrees (after mirroring).
const ARC_BREAKPOINT_DEG: f32 = 32.0;

/// Antagonistic cable path lengths at a yaw angle.
pub fn cable_lengths(theta: Degrees) -> CableLengthPair {
    let t = mirrored_radians(theta);

    let shorter = if t.to_degrees() < ARC_BREAKPOINT_DEG {
        let x1 = -1.4 + 1.28 * cosf(t - 0.2793);
        let y1 = 1.9 + 1.28 * sinf(t - 0.2793);
        sqrtf(x1 * x1 + y1 * y1)
    } else {
        let rc = 1.56 / 2.0;
        let rs = 0.5;
        let l_1 = sqrtf(1.4 * 1.4 + 1.9 * 1.9);
        let x_a = rc / 2.0 * cosf(t - 0.872) - 1.4;
        let y_a = rc / 2.0 * sinf(t - 0.872) + 1.9;
        let h = sqrtf(x_a * x_a + y_a * y_a);

        let len_line = sqrtf(h * h + rs * rs);

        let beta = atanf(1.9 / -1.4) - atanf(y_a / x_a);
        let lambda = asinf(sinf(beta) * l_1 / rc);
        let alpha = asinf(rs / len_line) - lambda;
        let arc_length = alpha * rs;
        arc_length + len_line + 0.1947
    };

    let longer = 1.1 * (core::f32::consts::FRAC_PI_2 - t) + 2.5099;

    CableLengthPair {
        shorter: Millimeters(shorter),
        longer: Millimeters(longer),
    }
}

/// Linearized yaw path-length delta, the alternative calibration used by the
/// fine-positioning profile. Coexists with [`cable_lengths`]; the two are
/// calibrated independently and must not be merged.
pub fn linear_path_delta(delta: Degrees) -> Millimeters {
    Millimeters(0.6738 * delta.to_radians())
}
