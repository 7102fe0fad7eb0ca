//! Motor bank: the fixed channel-indexed table of driver handles.

use crate::channel::{MotorChannel, CHANNEL_COUNT};
use crate::config::units::StepsPerSec;
use crate::config::SystemConfig;

use super::driver::StepperDriver;

/// Owns one driver per channel plus each channel's configured base speed.
///
/// The base speed is what the executor restores after proportional speed
/// scaling; it only changes through [`MotorBank::set_base_speed`].
pub struct MotorBank<D> {
    drivers: [D; CHANNEL_COUNT],
    base_speeds: [StepsPerSec; CHANNEL_COUNT],
}

impl<D: StepperDriver> MotorBank<D> {
    /// Build a bank with defaults, constructing one driver per channel.
    pub fn new(make: impl FnMut(MotorChannel) -> D) -> Self {
        Self::from_config(&SystemConfig::default(), make)
    }

    /// Build a bank from configuration, applying each channel's max speed
    /// and acceleration to its freshly constructed driver.
    pub fn from_config(config: &SystemConfig, mut make: impl FnMut(MotorChannel) -> D) -> Self {
        let mut drivers = core::array::from_fn(|i| make(MotorChannel::ALL[i]));
        let mut base_speeds = [StepsPerSec(0.0); CHANNEL_COUNT];

        for channel in MotorChannel::ALL {
            let settings = config.resolve(channel);
            let driver: &mut D = &mut drivers[channel.index()];
            driver.set_max_speed(settings.max_speed);
            driver.set_acceleration(settings.acceleration);
            driver.set_current_position(0);
            base_speeds[channel.index()] = settings.max_speed;
        }

        Self {
            drivers,
            base_speeds,
        }
    }

    /// Mutable access to one channel's driver.
    #[inline]
    pub fn driver(&mut self, channel: MotorChannel) -> &mut D {
        &mut self.drivers[channel.index()]
    }

    /// Shared access to one channel's driver.
    #[inline]
    pub fn get(&self, channel: MotorChannel) -> &D {
        &self.drivers[channel.index()]
    }

    /// The configured base max speed for a channel.
    #[inline]
    pub fn base_speed(&self, channel: MotorChannel) -> StepsPerSec {
        self.base_speeds[channel.index()]
    }

    /// Change a channel's configured base speed and apply it immediately.
    pub fn set_base_speed(&mut self, channel: MotorChannel, speed: StepsPerSec) {
        self.base_speeds[channel.index()] = speed;
        self.drivers[channel.index()].set_max_speed(speed);
    }

    /// Restore a channel's driver max speed to its configured base.
    pub fn restore_base_speed(&mut self, channel: MotorChannel) {
        let speed = self.base_speeds[channel.index()];
        self.drivers[channel.index()].set_max_speed(speed);
    }

    /// Zero every channel's position accumulator (SET_HOME).
    pub fn set_home(&mut self) {
        for driver in &mut self.drivers {
            driver.set_current_position(0);
        }
    }

    /// Snapshot of every channel's position in wire order.
    pub fn positions(&self) -> [i64; CHANNEL_COUNT] {
        core::array::from_fn(|i| self.drivers[i].current_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelConfig;
    use crate::config::units::StepsPerSec2;
    use crate::motion::driver::SimulatedStepper;

    #[test]
    fn test_bank_applies_config() {
        let mut config = SystemConfig::default();
        let _ = config.channels.insert(
            heapless::String::try_from("EYR").unwrap(),
            ChannelConfig {
                max_speed: StepsPerSec(17.1),
                acceleration: StepsPerSec2(1_000_000.0),
            },
        );

        let bank = MotorBank::from_config(&config, |_| SimulatedStepper::new());
        assert!((bank.get(MotorChannel::Eyr).max_speed().value() - 17.1).abs() < 0.001);
        assert!((bank.base_speed(MotorChannel::Eyr).value() - 17.1).abs() < 0.001);
        assert!((bank.get(MotorChannel::Roll).max_speed().value() - 700.0).abs() < 0.001);
    }

    #[test]
    fn test_set_home_zeroes_all_positions() {
        let mut bank = MotorBank::new(|_| SimulatedStepper::new());
        bank.driver(MotorChannel::Epu).set_current_position(42);
        bank.driver(MotorChannel::Roll).set_current_position(-7);

        bank.set_home();
        assert_eq!(bank.positions(), [0; CHANNEL_COUNT]);
    }

    #[test]
    fn test_restore_base_speed() {
        let mut bank = MotorBank::new(|_| SimulatedStepper::new());
        bank.driver(MotorChannel::Epu).set_max_speed(StepsPerSec(5.0));
        bank.restore_base_speed(MotorChannel::Epu);
        assert_eq!(
            bank.get(MotorChannel::Epu).max_speed(),
            bank.base_speed(MotorChannel::Epu)
        );
    }
}
