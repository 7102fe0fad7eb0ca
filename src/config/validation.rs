//! Configuration validation.

use crate::channel::MotorChannel;
use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Every channel override names a channel of the fixed drive train
/// - Max speeds and accelerations are positive
/// - Tension speeds are positive
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (name, channel) in config.channels.iter() {
        if MotorChannel::from_name(name.as_str()).is_none() {
            return Err(Error::Config(ConfigError::UnknownChannel(name.clone())));
        }

        if channel.max_speed.value() <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidMaxSpeed(
                channel.max_speed.value(),
            )));
        }

        if channel.acceleration.value() <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidAcceleration(
                channel.acceleration.value(),
            )));
        }
    }

    if config.tension.fine.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidTensionSpeed(
            config.tension.fine.value(),
        )));
    }

    if config.tension.coarse.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidTensionSpeed(
            config.tension.coarse.value(),
        )));
    }

    Ok(())
}
