//! Stepper driver abstraction.
//!
//! The motion executor multiplexes many motors by calling each driver's
//! `run()` once per loop iteration; a driver advances at most one step per
//! call and owns its own step timing. Two implementations ship with the
//! crate: [`PulseStepper`] for embedded-hal STEP/DIR hardware and
//! [`SimulatedStepper`] for deterministic harness-stepped tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{StepsPerSec, StepsPerSec2};

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise (positive step count). On the lead screws this shortens
    /// the cable.
    Clockwise,
    /// Counter-clockwise (negative step count); lengthens the cable.
    CounterClockwise,
}

impl Direction {
    /// Get direction from a signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Single-stepper capability set the executor drives.
///
/// Position is a signed accumulator mutated only by `run`/`run_speed` in
/// response to a previously issued move, except at homing which zeroes it.
pub trait StepperDriver {
    /// Queue a move relative to the current position.
    fn move_relative(&mut self, delta: i64);

    /// Queue a move to an absolute position.
    fn move_to(&mut self, target: i64);

    /// Advance one step toward the target if one is due.
    ///
    /// Returns `true` while the move is still pending.
    fn run(&mut self) -> bool;

    /// Advance one step at the constant speed set by `set_speed`,
    /// ignoring any queued target. Returns `true` if a step was taken.
    fn run_speed(&mut self) -> bool;

    /// Set the constant running speed (signed; negative runs backward).
    fn set_speed(&mut self, speed: StepsPerSec);

    /// Set the maximum speed for targeted moves.
    fn set_max_speed(&mut self, speed: StepsPerSec);

    /// Set the acceleration.
    fn set_acceleration(&mut self, acceleration: StepsPerSec2);

    /// Current maximum speed.
    fn max_speed(&self) -> StepsPerSec;

    /// Current acceleration.
    fn acceleration(&self) -> StepsPerSec2;

    /// Current absolute position in steps.
    fn current_position(&self) -> i64;

    /// Overwrite the position accumulator (homing).
    fn set_current_position(&mut self, position: i64);

    /// Steps remaining to the queued target (signed).
    fn distance_to_go(&self) -> i64;

    /// Whether a queued move is still pending.
    fn is_running(&self) -> bool {
        self.distance_to_go() != 0
    }
}

/// Monotonic microsecond time source for hardware step scheduling.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin.
    fn micros(&self) -> u64;
}

/// Wall-clock time source (std only).
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock with its origin at construction time.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// STEP pulse width in microseconds; ample for common driver ICs.
const PULSE_WIDTH_US: u32 = 2;

/// Hardware stepper driver pulsing embedded-hal STEP/DIR pins.
///
/// Motion is constant-speed: steps are emitted whenever the interval
/// implied by the max speed (or the signed constant speed for `run_speed`)
/// has elapsed on the supplied clock. The acceleration setting is stored
/// for save/restore round-trips but no ramp is generated; the rig runs its
/// drivers rampless.
///
/// A failed pin operation latches a fault and parks the queued target at
/// the current position, so a faulted motor reports itself done rather
/// than spinning the executor forever.
pub struct PulseStepper<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    step_pin: STEP,
    dir_pin: DIR,
    delay: DELAY,
    clock: CLK,

    position: i64,
    target: i64,

    max_speed: StepsPerSec,
    speed: StepsPerSec,
    acceleration: StepsPerSec2,

    last_step_us: u64,

    /// Cached to avoid redundant DIR pin writes.
    current_direction: Option<Direction>,
    invert_direction: bool,

    fault: bool,
}

impl<STEP, DIR, DELAY, CLK> PulseStepper<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// Create a driver on the given pins, initially at position 0.
    pub fn new(step_pin: STEP, dir_pin: DIR, delay: DELAY, clock: CLK) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            clock,
            position: 0,
            target: 0,
            max_speed: crate::config::DEFAULT_MAX_SPEED,
            speed: StepsPerSec(0.0),
            acceleration: crate::config::NO_RAMP_ACCELERATION,
            last_step_us: 0,
            current_direction: None,
            invert_direction: false,
            fault: false,
        }
    }

    /// Invert the DIR pin logic for wiring that runs backward.
    pub fn with_inverted_direction(mut self) -> Self {
        self.invert_direction = true;
        self
    }

    /// Whether a pin operation has failed since construction.
    pub fn fault(&self) -> bool {
        self.fault
    }

    fn interval_us(speed: f32) -> u64 {
        if speed <= 0.0 {
            return u64::MAX;
        }
        (1_000_000.0 / speed) as u64
    }

    fn set_direction(&mut self, direction: Direction) {
        if self.current_direction == Some(direction) {
            return;
        }

        let pin_high = match direction {
            Direction::Clockwise => !self.invert_direction,
            Direction::CounterClockwise => self.invert_direction,
        };

        let result = if pin_high {
            self.dir_pin.set_high()
        } else {
            self.dir_pin.set_low()
        };

        if result.is_err() {
            self.latch_fault();
            return;
        }

        self.current_direction = Some(direction);
    }

    fn pulse(&mut self) {
        if self.step_pin.set_high().is_err() {
            self.latch_fault();
            return;
        }

        self.delay.delay_us(PULSE_WIDTH_US);

        if self.step_pin.set_low().is_err() {
            self.latch_fault();
        }
    }

    fn latch_fault(&mut self) {
        self.fault = true;
        self.target = self.position;
        self.speed = StepsPerSec(0.0);
    }

    fn step_once(&mut self, direction: Direction) {
        self.set_direction(direction);
        if self.fault {
            return;
        }

        self.pulse();
        if self.fault {
            return;
        }

        self.position += direction.sign();
    }
}

impl<STEP, DIR, DELAY, CLK> StepperDriver for PulseStepper<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    fn move_relative(&mut self, delta: i64) {
        self.target = self.position + delta;
    }

    fn move_to(&mut self, target: i64) {
        self.target = target;
    }

    fn run(&mut self) -> bool {
        let distance = self.target - self.position;
        if distance == 0 || self.fault {
            return false;
        }

        let now = self.clock.micros();
        if now.wrapping_sub(self.last_step_us) >= Self::interval_us(self.max_speed.value()) {
            self.step_once(Direction::from_steps(distance));
            self.last_step_us = now;
        }

        self.target != self.position
    }

    fn run_speed(&mut self) -> bool {
        if self.speed.value() == 0.0 || self.fault {
            return false;
        }

        let now = self.clock.micros();
        if now.wrapping_sub(self.last_step_us) < Self::interval_us(self.speed.magnitude()) {
            return false;
        }

        let direction = if self.speed.value() > 0.0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        self.step_once(direction);
        self.last_step_us = now;
        !self.fault
    }

    fn set_speed(&mut self, speed: StepsPerSec) {
        self.speed = speed;
    }

    fn set_max_speed(&mut self, speed: StepsPerSec) {
        self.max_speed = speed;
    }

    fn set_acceleration(&mut self, acceleration: StepsPerSec2) {
        self.acceleration = acceleration;
    }

    fn max_speed(&self) -> StepsPerSec {
        self.max_speed
    }

    fn acceleration(&self) -> StepsPerSec2 {
        self.acceleration
    }

    fn current_position(&self) -> i64 {
        self.position
    }

    fn set_current_position(&mut self, position: i64) {
        self.position = position;
        self.target = position;
    }

    fn distance_to_go(&self) -> i64 {
        self.target - self.position
    }
}

/// Deterministic software driver: one step per `run()` call, no clock.
///
/// Lets a test harness step a whole motion group to completion without real
/// time passing, while exercising the exact executor loop the hardware
/// drivers run under.
#[derive(Debug, Clone)]
pub struct SimulatedStepper {
    position: i64,
    target: i64,
    max_speed: StepsPerSec,
    speed: StepsPerSec,
    acceleration: StepsPerSec2,
}

impl SimulatedStepper {
    /// Create a simulated motor at position 0.
    pub fn new() -> Self {
        Self {
            position: 0,
            target: 0,
            max_speed: crate::config::DEFAULT_MAX_SPEED,
            speed: StepsPerSec(0.0),
            acceleration: crate::config::NO_RAMP_ACCELERATION,
        }
    }
}

impl Default for SimulatedStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl StepperDriver for SimulatedStepper {
    fn move_relative(&mut self, delta: i64) {
        self.target = self.position + delta;
    }

    fn move_to(&mut self, target: i64) {
        self.target = target;
    }

    fn run(&mut self) -> bool {
        let distance = self.target - self.position;
        if distance == 0 {
            return false;
        }

        self.position += Direction::from_steps(distance).sign();
        self.target != self.position
    }

    fn run_speed(&mut self) -> bool {
        if self.speed.value() == 0.0 {
            return false;
        }

        self.position += if self.speed.value() > 0.0 { 1 } else { -1 };
        true
    }

    fn set_speed(&mut self, speed: StepsPerSec) {
        self.speed = speed;
    }

    fn set_max_speed(&mut self, speed: StepsPerSec) {
        self.max_speed = speed;
    }

    fn set_acceleration(&mut self, acceleration: StepsPerSec2) {
        self.acceleration = acceleration;
    }

    fn max_speed(&self) -> StepsPerSec {
        self.max_speed
    }

    fn acceleration(&self) -> StepsPerSec2 {
        self.acceleration
    }

    fn current_position(&self) -> i64 {
        self.position
    }

    fn set_current_position(&mut self, position: i64) {
        self.position = position;
        self.target = position;
    }

    fn distance_to_go(&self) -> i64 {
        self.target - self.position
    }
}
