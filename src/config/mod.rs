//! Configuration module for tendon-motion.
//!
//! Provides types for loading and validating per-channel motor settings
//! from TOML files (with `std` feature) or from defaults compiled in.

mod channel;
#[cfg(feature = "std")]
mod loader;
mod system;
pub mod units;
mod validation;

pub use channel::{ChannelConfig, DEFAULT_MAX_SPEED, NO_RAMP_ACCELERATION};
pub use system::{SystemConfig, TensionConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Millimeters, StepsPerSec, StepsPerSec2};
