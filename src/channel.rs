//! Joint and motor channel identities for the eleven-cable drive train.
//!
//! The channel set and its wire order are fixed by the rig's harness; the
//! enum makes both exhaustive at compile time.

/// One rotational degree of freedom of the manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    /// Elbow pitch (EPU/EPD antagonistic pair).
    ElbowPitch,
    /// Elbow yaw (EYR/EYL antagonistic pair).
    ElbowYaw,
    /// Wrist pitch (WPU/WPD antagonistic pair).
    WristPitch,
    /// Left jaw (LJR/LJL antagonistic pair).
    LeftJaw,
    /// Right jaw (RJR/RJL antagonistic pair).
    RightJaw,
    /// Shaft roll, single motor.
    Roll,
}

impl Joint {
    /// Two-letter joint code used in command names and previews.
    pub const fn code(self) -> &'static str {
        match self {
            Joint::ElbowPitch => "EP",
            Joint::ElbowYaw => "EY",
            Joint::WristPitch => "WP",
            Joint::LeftJaw => "LJ",
            Joint::RightJaw => "RJ",
            Joint::Roll => "ROLL",
        }
    }

    /// Antagonistic cable pair driving this joint as (positive, negative)
    /// wiring: a positive joint delta shortens the first cable and lengthens
    /// the second. `None` for the single-motor roll axis.
    pub const fn pair(self) -> Option<(MotorChannel, MotorChannel)> {
        match self {
            Joint::ElbowPitch => Some((MotorChannel::Epu, MotorChannel::Epd)),
            Joint::ElbowYaw => Some((MotorChannel::Eyr, MotorChannel::Eyl)),
            Joint::WristPitch => Some((MotorChannel::Wpu, MotorChannel::Wpd)),
            Joint::LeftJaw => Some((MotorChannel::Ljr, MotorChannel::Ljl)),
            Joint::RightJaw => Some((MotorChannel::Rjr, MotorChannel::Rjl)),
            Joint::Roll => None,
        }
    }
}

/// Number of motor channels in the drive train.
pub const CHANNEL_COUNT: usize = 11;

/// Identifies one physical stepper by its stable cable name.
///
/// Discriminant order is the wire order of `MOVE_ALL_MOTORS` payloads and of
/// every per-channel array in the crate. It never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MotorChannel {
    /// Elbow pitch up.
    Epu,
    /// Elbow pitch down.
    Epd,
    /// Elbow yaw right.
    Eyr,
    /// Elbow yaw left.
    Eyl,
    /// Wrist pitch down.
    Wpd,
    /// Wrist pitch up.
    Wpu,
    /// Right jaw left cable.
    Rjl,
    /// Left jaw right cable.
    Ljr,
    /// Left jaw left cable.
    Ljl,
    /// Right jaw right cable.
    Rjr,
    /// Shaft roll.
    Roll,
}

impl MotorChannel {
    /// All channels in wire order.
    pub const ALL: [MotorChannel; CHANNEL_COUNT] = [
        MotorChannel::Epu,
        MotorChannel::Epd,
        MotorChannel::Eyr,
        MotorChannel::Eyl,
        MotorChannel::Wpd,
        MotorChannel::Wpu,
        MotorChannel::Rjl,
        MotorChannel::Ljr,
        MotorChannel::Ljl,
        MotorChannel::Rjr,
        MotorChannel::Roll,
    ];

    /// Position of this channel in wire order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable harness name.
    pub const fn as_str(self) -> &'static str {
        match self {
            MotorChannel::Epu => "EPU",
            MotorChannel::Epd => "EPD",
            MotorChannel::Eyr => "EYR",
            MotorChannel::Eyl => "EYL",
            MotorChannel::Wpd => "WPD",
            MotorChannel::Wpu => "WPU",
            MotorChannel::Rjl => "RJL",
            MotorChannel::Ljr => "LJR",
            MotorChannel::Ljl => "LJL",
            MotorChannel::Rjr => "RJR",
            MotorChannel::Roll => "ROLL",
        }
    }

    /// Look up a channel by harness name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "EPU" => Some(MotorChannel::Epu),
            "EPD" => Some(MotorChannel::Epd),
            "EYR" => Some(MotorChannel::Eyr),
            "EYL" => Some(MotorChannel::Eyl),
            "WPD" => Some(MotorChannel::Wpd),
            "WPU" => Some(MotorChannel::Wpu),
            "RJL" => Some(MotorChannel::Rjl),
            "LJR" => Some(MotorChannel::Ljr),
            "LJL" => Some(MotorChannel::Ljl),
            "RJR" => Some(MotorChannel::Rjr),
            "ROLL" => Some(MotorChannel::Roll),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_order_is_stable() {
        let names: [&str; CHANNEL_COUNT] = [
            "EPU", "EPD", "EYR", "EYL", "WPD", "WPU", "RJL", "LJR", "LJL", "RJR", "ROLL",
        ];
        for (i, ch) in MotorChannel::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
            assert_eq!(ch.as_str(), names[i]);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for ch in MotorChannel::ALL {
            assert_eq!(MotorChannel::from_name(ch.as_str()), Some(ch));
        }
        assert_eq!(MotorChannel::from_name("XYZ"), None);
        assert_eq!(MotorChannel::from_name("epu"), None);
    }

    #[test]
    fn test_every_paired_joint_has_distinct_channels() {
        let joints = [
            Joint::ElbowPitch,
            Joint::ElbowYaw,
            Joint::WristPitch,
            Joint::LeftJaw,
            Joint::RightJaw,
        ];
        for joint in joints {
            let (pos, neg) = joint.pair().unwrap();
            assert_ne!(pos, neg);
        }
        assert!(Joint::Roll.pair().is_none());
    }
}
