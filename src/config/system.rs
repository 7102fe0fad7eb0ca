//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::channel::MotorChannel;

use super::channel::ChannelConfig;
use super::units::StepsPerSec;

/// Root configuration structure from TOML.
///
/// Channels absent from the table run with [`ChannelConfig::default`], so an
/// empty configuration is a working one.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Per-channel overrides keyed by harness name (EPU, EPD, ...).
    #[serde(default)]
    pub channels: FnvIndexMap<String<8>, ChannelConfig, 16>,

    /// Cable tensioning speeds.
    #[serde(default)]
    pub tension: TensionConfig,
}

/// Constant-speed settings for cable pre-load.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TensionConfig {
    /// Fine tensioning speed in steps per second.
    #[serde(rename = "fine_steps_per_sec", default = "default_fine")]
    pub fine: StepsPerSec,

    /// Coarse tensioning speed in steps per second. Detensioning runs this
    /// speed reversed.
    #[serde(rename = "coarse_steps_per_sec", default = "default_coarse")]
    pub coarse: StepsPerSec,
}

fn default_fine() -> StepsPerSec {
    StepsPerSec(50.0)
}

fn default_coarse() -> StepsPerSec {
    StepsPerSec(600.0)
}

impl Default for TensionConfig {
    fn default() -> Self {
        Self {
            fine: default_fine(),
            coarse: default_coarse(),
        }
    }
}

impl SystemConfig {
    /// Get the channel configuration override by harness name.
    pub fn channel(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Resolve the effective configuration for a channel, falling back to
    /// the defaults when no override is present.
    pub fn resolve(&self, channel: MotorChannel) -> ChannelConfig {
        self.channel(channel.as_str())
            .copied()
            .unwrap_or_default()
    }

    /// List all overridden channel names.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channels: FnvIndexMap::new(),
            tension: TensionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::channel::DEFAULT_MAX_SPEED;

    #[test]
    fn test_default_config_resolves_every_channel() {
        let config = SystemConfig::default();
        for ch in MotorChannel::ALL {
            let resolved = config.resolve(ch);
            assert_eq!(resolved.max_speed, DEFAULT_MAX_SPEED);
        }
        assert!((config.tension.fine.value() - 50.0).abs() < 0.001);
        assert!((config.tension.coarse.value() - 600.0).abs() < 0.001);
    }
}
