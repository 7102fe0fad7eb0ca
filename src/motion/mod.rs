//! Motion execution: driver abstraction, motor bank, coordinated executor,
//! and cable tensioning.

mod bank;
mod driver;
mod executor;
mod tension;

pub use bank::MotorBank;
#[cfg(feature = "std")]
pub use driver::StdClock;
pub use driver::{Clock, Direction, PulseStepper, SimulatedStepper, StepperDriver};
pub use executor::{MotionExecutor, MotionPlan, MoveMode, Outcome};
pub use tension::{tension, TensionMode};
