//! Coordinated motion execution.
//!
//! Drives a group of motors to their targets with a synchronous round-robin
//! loop: every active channel's `run()` is called once per iteration, so no
//! motor races ahead of the group and the loop's iteration rate bounds the
//! attainable step frequency. The emergency-stop flag is polled once per
//! iteration and consumed by the run that observes it.

use crate::channel::{MotorChannel, CHANNEL_COUNT};
use crate::io::EStop;
use crate::kinematics::steps::scaled_speed;

use super::bank::MotorBank;
use super::driver::StepperDriver;

/// How the plan's step counts are interpreted by the drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Targets are deltas from each motor's current position.
    Relative,
    /// Targets are absolute positions.
    Absolute,
}

/// Per-channel step targets for one commanded move.
///
/// Built fresh for each command and discarded once the executor reports the
/// group done. Channels left at zero do not participate (a relative move of
/// zero and an untouched absolute channel are both no-ops).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionPlan {
    targets: [i64; CHANNEL_COUNT],
    touched: [bool; CHANNEL_COUNT],
    mode: MoveMode,
}

impl MotionPlan {
    /// Create an empty plan of relative deltas.
    pub fn relative() -> Self {
        Self::new(MoveMode::Relative)
    }

    /// Create an empty plan of absolute targets.
    pub fn absolute() -> Self {
        Self::new(MoveMode::Absolute)
    }

    fn new(mode: MoveMode) -> Self {
        Self {
            targets: [0; CHANNEL_COUNT],
            touched: [false; CHANNEL_COUNT],
            mode,
        }
    }

    /// The plan's move mode.
    pub fn mode(&self) -> MoveMode {
        self.mode
    }

    /// Set one channel's target, replacing any previous value.
    pub fn set(&mut self, channel: MotorChannel, steps: i64) {
        self.targets[channel.index()] = steps;
        self.touched[channel.index()] = true;
    }

    /// Add to one channel's target; joints sharing cables accumulate.
    pub fn accumulate(&mut self, channel: MotorChannel, steps: i64) {
        self.targets[channel.index()] += steps;
        self.touched[channel.index()] = true;
    }

    /// One channel's target.
    pub fn target(&self, channel: MotorChannel) -> i64 {
        self.targets[channel.index()]
    }

    /// Whether no channel would move.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Channels that participate in the move, with their targets.
    pub fn active(&self) -> impl Iterator<Item = (MotorChannel, i64)> + '_ {
        MotorChannel::ALL.into_iter().filter_map(move |ch| {
            let target = self.targets[ch.index()];
            if self.touched[ch.index()] && (self.mode == MoveMode::Absolute || target != 0) {
                Some((ch, target))
            } else {
                None
            }
        })
    }

    /// Largest step magnitude across active channels (relative plans).
    pub fn max_magnitude(&self) -> i64 {
        self.active()
            .map(|(_, t)| t.unsigned_abs() as i64)
            .max()
            .unwrap_or(0)
    }
}

/// Result of running a motion group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every channel reached its target.
    Completed,
    /// The emergency-stop flag fired; motors hold whatever step counts they
    /// reached.
    EmergencyStopped,
}

/// Executes motion plans against a motor bank.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionExecutor {
    synchronize_speeds: bool,
}

impl MotionExecutor {
    /// Executor that runs every motor at its configured base speed.
    pub fn new() -> Self {
        Self {
            synchronize_speeds: false,
        }
    }

    /// Executor that scales each active motor's max speed by its share of
    /// the largest step count, so the whole group starts and finishes
    /// together. Base speeds are restored when the run ends, aborted or not.
    pub fn synchronized() -> Self {
        Self {
            synchronize_speeds: true,
        }
    }

    /// Issue the plan's moves and poll the group to completion.
    pub fn execute<D: StepperDriver>(
        &self,
        bank: &mut MotorBank<D>,
        plan: &MotionPlan,
        estop: &EStop,
    ) -> Outcome {
        if plan.is_empty() {
            return Outcome::Completed;
        }

        if self.synchronize_speeds {
            self.apply_scaled_speeds(bank, plan);
        }

        for (channel, steps) in plan.active() {
            let driver = bank.driver(channel);
            match plan.mode() {
                MoveMode::Relative => driver.move_relative(steps),
                MoveMode::Absolute => driver.move_to(steps),
            }
        }

        let outcome = loop {
            if estop.take() {
                break Outcome::EmergencyStopped;
            }

            let mut moving = false;
            for (channel, _) in plan.active() {
                if bank.driver(channel).run() {
                    moving = true;
                }
            }

            if !moving {
                break Outcome::Completed;
            }
        };

        if self.synchronize_speeds {
            for (channel, _) in plan.active() {
                bank.restore_base_speed(channel);
            }
        }

        outcome
    }

    fn apply_scaled_speeds<D: StepperDriver>(&self, bank: &mut MotorBank<D>, plan: &MotionPlan) {
        let max_steps = match plan.mode() {
            MoveMode::Relative => plan.max_magnitude(),
            MoveMode::Absolute => plan
                .active()
                .map(|(ch, t)| (t - bank.get(ch).current_position()).unsigned_abs() as i64)
                .max()
                .unwrap_or(0),
        };

        for (channel, target) in plan.active() {
            let steps = match plan.mode() {
                MoveMode::Relative => target,
                MoveMode::Absolute => target - bank.get(channel).current_position(),
            };
            let speed = scaled_speed(bank.base_speed(channel), steps, max_steps);
            bank.driver(channel).set_max_speed(speed);
        }
    }
}
