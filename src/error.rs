//! Error types for tendon-motion library.
//!
//! Provides unified error handling across configuration and command
//! dispatch. Every failure is terminal for that single command; nothing
//! here represents a crash condition. Operator cancellation and emergency
//! stops are not errors - they surface as motion outcomes.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all tendon-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Command parsing or dispatch error
    Command(CommandError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Channel name not part of the fixed drive train
    UnknownChannel(heapless::String<8>),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Invalid tension speed (must be > 0)
    InvalidTensionSpeed(f32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Command parsing and dispatch errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Command name not recognized
    UnknownCommand,
    /// Wrong number of comma-separated values in a multi-value payload
    TokenCountMismatch {
        /// Number of values the command requires
        expected: usize,
        /// Number of values actually supplied
        got: usize,
    },
    /// Motor name does not map to a channel
    InvalidMotorName(heapless::String<8>),
    /// Diagnostic command received outside test mode
    TestModeInactive,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Command(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::UnknownChannel(name) => write!(f, "Unknown channel '{}'", name),
            ConfigError::InvalidMaxSpeed(v) => {
                write!(f, "Invalid max speed: {}. Must be > 0", v)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidTensionSpeed(v) => {
                write!(f, "Invalid tension speed: {}. Must be > 0", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand => write!(f, "Unknown command"),
            CommandError::TokenCountMismatch { expected, got } => {
                write!(f, "Expected {} motor values, got {}", expected, got)
            }
            CommandError::InvalidMotorName(name) => write!(f, "Invalid motor name: {}", name),
            CommandError::TestModeInactive => write!(f, "Test mode not active"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}
