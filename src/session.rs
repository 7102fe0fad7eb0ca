//! Session state and joint-level motion.
//!
//! The session is the single owner of everything a command can touch: the
//! motor bank, the tracked joint angles, verbosity, and the test-mode
//! selection. Commands run on one logical thread; the only asynchronous
//! input is the emergency-stop flag the session borrows.

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::channel::{Joint, MotorChannel, CHANNEL_COUNT};
use crate::config::units::Degrees;
use crate::config::TensionConfig;
use crate::io::{confirm, Console, EStop};
use crate::kinematics::steps::{
    capstan_steps, gain_corrected_length_steps, gain_corrected_steps, lead_screw_steps,
    OPEN_LOOP_GAIN,
};
use crate::kinematics::{elbow_pitch, elbow_yaw, wrist};
use crate::motion::{
    tension, MotionExecutor, MotionPlan, MotorBank, Outcome, StepperDriver, TensionMode,
};

/// Tracked joint angles in degrees.
///
/// Only the elbow and wrist pitch axes are tracked; 90° is the centered
/// pose every boot starts from. Values change only after the executor
/// reports on a motion group - never speculatively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAngleState {
    /// Elbow pitch angle.
    pub elbow_pitch: Degrees,
    /// Elbow yaw angle.
    pub elbow_yaw: Degrees,
    /// Wrist pitch angle.
    pub wrist_pitch: Degrees,
}

impl Default for JointAngleState {
    fn default() -> Self {
        Self {
            elbow_pitch: Degrees(90.0),
            elbow_yaw: Degrees(90.0),
            wrist_pitch: Degrees(90.0),
        }
    }
}

impl JointAngleState {
    /// The tracked angle for a joint, if that joint is tracked.
    pub fn get(&self, joint: Joint) -> Option<Degrees> {
        match joint {
            Joint::ElbowPitch => Some(self.elbow_pitch),
            Joint::ElbowYaw => Some(self.elbow_yaw),
            Joint::WristPitch => Some(self.wrist_pitch),
            _ => None,
        }
    }

    fn apply_delta(&mut self, joint: Joint, delta: Degrees) {
        match joint {
            Joint::ElbowPitch => self.elbow_pitch = self.elbow_pitch + delta,
            Joint::ElbowYaw => self.elbow_yaw = self.elbow_yaw + delta,
            Joint::WristPitch => self.wrist_pitch = self.wrist_pitch + delta,
            _ => {}
        }
    }
}

/// Result of a joint-level move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// All motors reached their targets and state was updated.
    Completed,
    /// The operator declined the preview; nothing moved, nothing changed.
    Cancelled,
    /// The emergency stop fired mid-motion; tracked angles were
    /// resynchronized from the step counts actually reached.
    EmergencyStopped,
}

impl From<Outcome> for MoveStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed => MoveStatus::Completed,
            Outcome::EmergencyStopped => MoveStatus::EmergencyStopped,
        }
    }
}

/// Bookkeeping for one joint inside a pending motion group, used to
/// resynchronize tracked angles if the group is aborted.
struct JointMove {
    joint: Joint,
    delta: Degrees,
    primary: MotorChannel,
    primary_steps: i64,
    start_position: i64,
}

/// The command-level context: motor bank, tracked angles, and mode flags.
pub struct Session<'a, D: StepperDriver> {
    bank: MotorBank<D>,
    angles: JointAngleState,
    estop: &'a EStop,
    tension_config: TensionConfig,
    verbose: bool,
    test_mode: bool,
    selected: MotorChannel,
}

impl<'a, D: StepperDriver> Session<'a, D> {
    /// Create a session over a bank, borrowing the emergency-stop flag that
    /// the interrupt layer raises.
    pub fn new(bank: MotorBank<D>, tension_config: TensionConfig, estop: &'a EStop) -> Self {
        Self {
            bank,
            angles: JointAngleState::default(),
            estop,
            tension_config,
            verbose: false,
            test_mode: false,
            selected: MotorChannel::Epd,
        }
    }

    /// The motor bank.
    pub fn bank(&self) -> &MotorBank<D> {
        &self.bank
    }

    /// Mutable access to the motor bank.
    pub fn bank_mut(&mut self) -> &mut MotorBank<D> {
        &mut self.bank
    }

    /// The tracked joint angles.
    pub fn angles(&self) -> &JointAngleState {
        &self.angles
    }

    /// Diagnostic verbosity.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Set diagnostic verbosity.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Flip diagnostic verbosity, returning the new state.
    pub fn toggle_verbose(&mut self) -> bool {
        self.verbose = !self.verbose;
        self.verbose
    }

    /// Whether single-motor diagnostic commands are accepted.
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Enter or leave test mode.
    pub fn set_test_mode(&mut self, active: bool) {
        self.test_mode = active;
    }

    /// The channel single-motor diagnostics act on.
    pub fn selected(&self) -> MotorChannel {
        self.selected
    }

    /// Select the channel for single-motor diagnostics.
    pub fn select(&mut self, channel: MotorChannel) {
        self.selected = channel;
    }

    /// Relative joint move(s) through the gain-corrected conversion path.
    ///
    /// All joints land in one motion plan and one executor run, so a
    /// combined pitch+yaw command moves as a single group. With verbosity
    /// on, a preview is printed and the move waits for operator
    /// confirmation.
    pub fn move_joints_rel(
        &mut self,
        moves: &[(Joint, Degrees)],
        console: &mut impl Console,
    ) -> MoveStatus {
        let mut plan = MotionPlan::relative();
        let mut pending: Vec<JointMove, 4> = Vec::new();

        for &(joint, delta) in moves {
            let steps = relative_steps(joint, delta);
            let Some((positive, negative)) = joint.pair() else {
                continue;
            };
            plan.accumulate(positive, steps);
            plan.accumulate(negative, -steps);
            let _ = pending.push(JointMove {
                joint,
                delta,
                primary: positive,
                primary_steps: steps,
                start_position: 0,
            });
        }

        if self.verbose {
            console.write_line("Movement values for verification:");
            for entry in pending.iter() {
                let mut line: String<96> = String::new();
                let _ = write!(
                    line,
                    "{} delta: {} deg, steps: {}",
                    entry.joint.code(),
                    entry.delta.value(),
                    entry.primary_steps
                );
                console.write_line(&line);
            }
            console.write_line("Proceed with movement? (y/n)");
            if !confirm(console) {
                return MoveStatus::Cancelled;
            }
        }

        for entry in pending.iter_mut() {
            entry.start_position = self.bank.get(entry.primary).current_position();
        }

        let outcome = MotionExecutor::new().execute(&mut self.bank, &plan, self.estop);
        self.settle(&pending, outcome);
        outcome.into()
    }

    /// Absolute elbow pitch move through the cable path-length model.
    ///
    /// Both pair cables get their own step count from the geometry and the
    /// executor scales speeds so they finish together.
    pub fn move_elbow_pitch_to(
        &mut self,
        target: Degrees,
        console: &mut impl Console,
    ) -> MoveStatus {
        let current = self.angles.elbow_pitch;

        let (up_initial, down_initial) = elbow_pitch::cable_lengths(current).oriented(current);
        let (up_final, down_final) = elbow_pitch::cable_lengths(target).oriented(target);

        let up_steps =
            gain_corrected_length_steps(up_initial - up_final, elbow_pitch::PATH_GAIN);
        let down_steps =
            gain_corrected_length_steps(down_initial - down_final, elbow_pitch::PATH_GAIN);

        self.move_pair_to(
            Joint::ElbowPitch,
            current,
            target,
            up_steps,
            down_steps,
            console,
        )
    }

    /// Absolute elbow yaw move through the cable path-length model.
    pub fn move_elbow_yaw_to(
        &mut self,
        target: Degrees,
        console: &mut impl Console,
    ) -> MoveStatus {
        let current = self.angles.elbow_yaw;

        let (right_initial, left_initial) = elbow_yaw::cable_lengths(current).oriented(current);
        let (right_final, left_final) = elbow_yaw::cable_lengths(target).oriented(target);

        let right_steps = lead_screw_steps(right_initial - right_final);
        let left_steps = lead_screw_steps(left_initial - left_final);

        self.move_pair_to(
            Joint::ElbowYaw,
            current,
            target,
            right_steps,
            left_steps,
            console,
        )
    }

    fn move_pair_to(
        &mut self,
        joint: Joint,
        current: Degrees,
        target: Degrees,
        positive_steps: i64,
        negative_steps: i64,
        console: &mut impl Console,
    ) -> MoveStatus {
        let (positive, negative) = match joint.pair() {
            Some(pair) => pair,
            None => return MoveStatus::Completed,
        };

        if self.verbose {
            console.write_line("Movement values for verification:");
            let mut line: String<96> = String::new();
            let _ = write!(line, "Initial theta: {}", current.value());
            console.write_line(&line);
            line.clear();
            let _ = write!(line, "Final theta: {}", target.value());
            console.write_line(&line);
            line.clear();
            let _ = write!(
                line,
                "{} steps: {} / {}",
                joint.code(),
                positive_steps,
                negative_steps
            );
            console.write_line(&line);
            console.write_line("Proceed with movement? (y/n)");
            if !confirm(console) {
                return MoveStatus::Cancelled;
            }
        }

        let mut plan = MotionPlan::relative();
        plan.set(positive, positive_steps);
        plan.set(negative, negative_steps);

        let (primary, primary_steps) = if positive_steps.unsigned_abs() >= negative_steps.unsigned_abs()
        {
            (positive, positive_steps)
        } else {
            (negative, negative_steps)
        };

        let pending = [JointMove {
            joint,
            delta: target - current,
            primary,
            primary_steps,
            start_position: self.bank.get(primary).current_position(),
        }];

        let outcome = MotionExecutor::synchronized().execute(&mut self.bank, &plan, self.estop);
        self.settle(&pending, outcome);
        outcome.into()
    }

    /// Fine elbow yaw move through the high-resolution capstan stage.
    ///
    /// The yaw capstan is driven by both elbow yaw motors in the same
    /// direction; the jaw cables route through the elbow, so they take a
    /// compensating delta from the linearized yaw path model to keep their
    /// tension constant while the elbow swings.
    pub fn move_elbow_yaw_fine_rel(
        &mut self,
        delta: Degrees,
        console: &mut impl Console,
    ) -> MoveStatus {
        let yaw_steps = capstan_steps(delta);
        let aux_steps = lead_screw_steps(elbow_yaw::linear_path_delta(delta));

        let mut plan = MotionPlan::relative();
        plan.set(MotorChannel::Eyr, yaw_steps);
        plan.set(MotorChannel::Eyl, yaw_steps);
        plan.set(MotorChannel::Rjl, -aux_steps);
        plan.set(MotorChannel::Ljl, -aux_steps);
        plan.set(MotorChannel::Rjr, aux_steps);
        plan.set(MotorChannel::Ljr, aux_steps);

        if self.verbose {
            console.write_line("Movement values for verification:");
            let mut line: String<96> = String::new();
            let _ = write!(
                line,
                "EY delta: {} deg, yaw steps: {}, aux steps: {}",
                delta.value(),
                yaw_steps,
                aux_steps
            );
            console.write_line(&line);
            console.write_line("Proceed with movement? (y/n)");
            if !confirm(console) {
                return MoveStatus::Cancelled;
            }
        }

        let pending = [JointMove {
            joint: Joint::ElbowYaw,
            delta,
            primary: MotorChannel::Eyr,
            primary_steps: yaw_steps,
            start_position: self.bank.get(MotorChannel::Eyr).current_position(),
        }];

        let outcome = MotionExecutor::new().execute(&mut self.bank, &plan, self.estop);
        self.settle(&pending, outcome);
        outcome.into()
    }

    /// Raw relative step deltas for all eleven channels in wire order.
    pub fn move_all(&mut self, deltas: [i64; CHANNEL_COUNT]) -> MoveStatus {
        let mut plan = MotionPlan::relative();
        for (channel, delta) in MotorChannel::ALL.into_iter().zip(deltas) {
            plan.set(channel, delta);
        }

        MotionExecutor::new()
            .execute(&mut self.bank, &plan, self.estop)
            .into()
    }

    /// Step the selected channel by a relative amount.
    pub fn step_selected(&mut self, steps: i64) -> MoveStatus {
        let mut plan = MotionPlan::relative();
        plan.set(self.selected, steps);

        MotionExecutor::new()
            .execute(&mut self.bank, &plan, self.estop)
            .into()
    }

    /// Run the selected channel in the given tension mode until the
    /// operator sends a byte.
    pub fn tension_selected(&mut self, mode: TensionMode, console: &mut impl Console) {
        let config = self.tension_config;
        tension(self.bank.driver(self.selected), mode, &config, console);
    }

    /// Zero every position accumulator and re-center the tracked angles.
    pub fn set_home(&mut self) {
        self.bank.set_home();
        self.angles = JointAngleState::default();
    }

    /// Commit or resynchronize tracked angles once a group has settled.
    ///
    /// On completion each joint takes its full delta. After an emergency
    /// stop the angle advances by the fraction of steps its dominant
    /// channel actually reached, so tracking follows the physical cables
    /// instead of going stale.
    fn settle(&mut self, pending: &[JointMove], outcome: Outcome) {
        for entry in pending {
            let applied = match outcome {
                Outcome::Completed => entry.delta,
                Outcome::EmergencyStopped => {
                    if entry.primary_steps == 0 {
                        continue;
                    }
                    let traveled =
                        self.bank.get(entry.primary).current_position() - entry.start_position;
                    let fraction =
                        (traveled as f32 / entry.primary_steps as f32).clamp(0.0, 1.0);
                    Degrees(entry.delta.value() * fraction)
                }
            };
            self.angles.apply_delta(entry.joint, applied);
        }
    }
}

/// Gain-corrected step count for a relative joint delta.
fn relative_steps(joint: Joint, delta: Degrees) -> i64 {
    match joint {
        Joint::ElbowPitch => {
            gain_corrected_steps(delta, elbow_pitch::LINK_RADIUS_MM, OPEN_LOOP_GAIN)
        }
        Joint::ElbowYaw => gain_corrected_steps(delta, elbow_yaw::LINK_RADIUS_MM, OPEN_LOOP_GAIN),
        Joint::WristPitch => wrist::wrist_pitch_steps(delta),
        Joint::LeftJaw | Joint::RightJaw => wrist::jaw_steps(delta),
        Joint::Roll => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::NullConsole;
    use crate::motion::SimulatedStepper;

    fn session(estop: &EStop) -> Session<'_, SimulatedStepper> {
        let bank = MotorBank::new(|_| SimulatedStepper::new());
        Session::new(bank, TensionConfig::default(), estop)
    }

    #[test]
    fn test_relative_elbow_pitch_move() {
        let estop = EStop::new();
        let mut s = session(&estop);

        let status = s.move_joints_rel(&[(Joint::ElbowPitch, Degrees(10.0))], &mut NullConsole);
        assert_eq!(status, MoveStatus::Completed);

        // 10 deg * 3.24 mm -> 226 steps -> *1.4 -> 316
        assert_eq!(s.bank().get(MotorChannel::Epu).current_position(), 316);
        assert_eq!(s.bank().get(MotorChannel::Epd).current_position(), -316);
        assert!((s.angles().elbow_pitch.value() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_combined_pitch_yaw_single_group() {
        let estop = EStop::new();
        let mut s = session(&estop);

        let status = s.move_joints_rel(
            &[
                (Joint::ElbowPitch, Degrees(5.0)),
                (Joint::ElbowYaw, Degrees(-5.0)),
            ],
            &mut NullConsole,
        );
        assert_eq!(status, MoveStatus::Completed);

        assert!(s.bank().get(MotorChannel::Epu).current_position() > 0);
        assert!(s.bank().get(MotorChannel::Eyr).current_position() < 0);
        assert!((s.angles().elbow_pitch.value() - 95.0).abs() < 1e-4);
        assert!((s.angles().elbow_yaw.value() - 85.0).abs() < 1e-4);
    }

    #[test]
    fn test_absolute_pitch_move_updates_angle() {
        let estop = EStop::new();
        let mut s = session(&estop);

        let status = s.move_elbow_pitch_to(Degrees(110.0), &mut NullConsole);
        assert_eq!(status, MoveStatus::Completed);
        assert!((s.angles().elbow_pitch.value() - 110.0).abs() < 1e-4);

        // The pair moved antagonistically: one cable wound, one paid out.
        let up = s.bank().get(MotorChannel::Epu).current_position();
        let down = s.bank().get(MotorChannel::Epd).current_position();
        assert!(up != 0 && down != 0);
        assert!(up.signum() != down.signum(), "up {} down {}", up, down);
    }

    #[test]
    fn test_estop_resyncs_angle_from_steps() {
        let estop = EStop::new();
        let mut s = session(&estop);

        estop.trigger();
        let status = s.move_joints_rel(&[(Joint::ElbowPitch, Degrees(10.0))], &mut NullConsole);
        assert_eq!(status, MoveStatus::EmergencyStopped);

        // The flag fired before any step ran, so the tracked angle holds.
        assert!((s.angles().elbow_pitch.value() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_home_recentres() {
        let estop = EStop::new();
        let mut s = session(&estop);

        let _ = s.move_joints_rel(&[(Joint::ElbowYaw, Degrees(15.0))], &mut NullConsole);
        s.set_home();

        assert_eq!(s.bank().positions(), [0; CHANNEL_COUNT]);
        assert!((s.angles().elbow_yaw.value() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_fine_yaw_move_drives_capstan_and_compensates_jaws() {
        let estop = EStop::new();
        let mut s = session(&estop);

        let status = s.move_elbow_yaw_fine_rel(Degrees(90.0), &mut NullConsole);
        assert_eq!(status, MoveStatus::Completed);

        // 90 deg through the capstan stage: 126 steps on both yaw motors.
        assert_eq!(s.bank().get(MotorChannel::Eyr).current_position(), 126);
        assert_eq!(s.bank().get(MotorChannel::Eyl).current_position(), 126);

        // Jaw cables compensate antagonistically.
        let rjr = s.bank().get(MotorChannel::Rjr).current_position();
        let rjl = s.bank().get(MotorChannel::Rjl).current_position();
        assert!(rjr > 0);
        assert_eq!(rjl, -rjr);
        assert!((s.angles().elbow_yaw.value() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrist_and_jaw_relative_moves() {
        let estop = EStop::new();
        let mut s = session(&estop);

        let status = s.move_joints_rel(&[(Joint::WristPitch, Degrees(10.0))], &mut NullConsole);
        assert_eq!(status, MoveStatus::Completed);
        assert_eq!(s.bank().get(MotorChannel::Wpu).current_position(), 197);
        assert_eq!(s.bank().get(MotorChannel::Wpd).current_position(), -197);
        assert!((s.angles().wrist_pitch.value() - 100.0).abs() < 1e-4);

        let status = s.move_joints_rel(&[(Joint::LeftJaw, Degrees(-4.0))], &mut NullConsole);
        assert_eq!(status, MoveStatus::Completed);
        assert!(s.bank().get(MotorChannel::Ljr).current_position() < 0);
        assert!(s.bank().get(MotorChannel::Ljl).current_position() > 0);
    }
}
