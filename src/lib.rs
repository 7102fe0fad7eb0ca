//! # tendon-motion
//!
//! Motion core for a cable-actuated multi-joint manipulator driven by
//! eleven stepper motors. Joint-angle commands become antagonistic cable
//! path-length deltas, those become per-motor step counts, and a
//! coordinated executor drives the whole group to completion.
//!
//! ## Features
//!
//! - **Kinematic mapping**: piecewise trigonometric cable path models for
//!   the elbow axes, calibrated step conversion per drive stage
//! - **Coordinated execution**: synchronous round-robin group run loop with
//!   proportional speed scaling and emergency-stop preemption
//! - **embedded-hal 1.0**: `OutputPin` STEP/DIR, `DelayNs` pulse timing
//! - **no_std compatible**: core library works without standard library
//! - **Deterministic testing**: a simulated driver steps motion groups
//!   without real time passing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tendon_motion::{dispatch_line, EStop, MotorBank, Session, SystemConfig};
//!
//! // Load per-channel speeds from TOML (or use the rig defaults)
//! let config: SystemConfig = tendon_motion::load_config("manipulator.toml")?;
//!
//! // One driver per channel; the closure receives the channel identity
//! let bank = MotorBank::from_config(&config, |ch| make_driver(ch));
//!
//! static ESTOP: EStop = EStop::new();
//! let mut session = Session::new(bank, config.tension, &ESTOP);
//!
//! // Commands arrive from the serial link, one payload per line
//! let reply = dispatch_line(&mut session, "MOVE_EP_REL:10.0", &mut console);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod io;
pub mod kinematics;
pub mod motion;
pub mod session;

// Re-exports for ergonomic API
pub use channel::{Joint, MotorChannel, CHANNEL_COUNT};
pub use command::{dispatch, dispatch_line, Command, Reply};
pub use config::{validate_config, ChannelConfig, SystemConfig, TensionConfig};
pub use error::{Error, Result};
pub use io::{Console, EStop, NullConsole};
pub use kinematics::CableLengthPair;
pub use motion::{
    MotionExecutor, MotionPlan, MotorBank, MoveMode, Outcome, PulseStepper, SimulatedStepper,
    StepperDriver, TensionMode,
};
pub use session::{JointAngleState, MoveStatus, Session};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, Millimeters, StepsPerSec, StepsPerSec2};
