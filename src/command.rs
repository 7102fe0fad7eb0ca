//! Command vocabulary of the serial link.
//!
//! Framing and transport live outside the crate; this module receives one
//! ASCII command payload at a time and produces one reply line. Numeric
//! fields parse tolerantly - a malformed number becomes 0, matching the
//! link's tokenizer - but a wrong value count on the multi-motor form is a
//! hard error so a truncated frame can never half-move the arm.

use core::fmt::Write as _;

use heapless::String;

use crate::channel::{Joint, MotorChannel, CHANNEL_COUNT};
use crate::config::units::Degrees;
use crate::error::{CommandError, Error, Result};
use crate::io::Console;
use crate::motion::{StepperDriver, TensionMode};
use crate::session::{MoveStatus, Session};

/// One reply line sent back over the link.
pub type Reply = String<96>;

/// Parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Relative move of one joint, degrees.
    MoveJointRel(Joint, Degrees),
    /// Simultaneous relative elbow pitch + yaw move.
    MoveElbowComboRel {
        /// Pitch delta in degrees.
        pitch: Degrees,
        /// Yaw delta in degrees.
        yaw: Degrees,
    },
    /// Relative step deltas for all eleven channels in wire order.
    MoveAllMotors([i64; CHANNEL_COUNT]),
    /// Select the channel for single-motor diagnostics.
    SelectMotor(String<8>),
    /// Step the selected channel by a relative amount.
    StepMotorBy(i64),
    /// Fine-tension the selected channel.
    FineTension,
    /// Coarse-tension the selected channel.
    CoarseTension,
    /// Detension the selected channel.
    Detension,
    /// Zero all position accumulators and re-center tracked angles.
    SetHome,
    /// Enter single-motor test mode.
    EnterTest,
    /// Leave single-motor test mode.
    ExitTest,
    /// Set diagnostic verbosity.
    SetVerbose(bool),
    /// Flip diagnostic verbosity.
    ToggleVerbose,
}

impl Command {
    /// Parse one command payload.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, payload) = match line.split_once(':') {
            Some((name, payload)) => (name, payload),
            None => (line, ""),
        };

        match name {
            "MOVE_EP_REL" => Ok(Command::MoveJointRel(Joint::ElbowPitch, parse_deg(payload))),
            "MOVE_EY_REL" => Ok(Command::MoveJointRel(Joint::ElbowYaw, parse_deg(payload))),
            "MOVE_WP_REL" => Ok(Command::MoveJointRel(Joint::WristPitch, parse_deg(payload))),
            "MOVE_LJ_REL" => Ok(Command::MoveJointRel(Joint::LeftJaw, parse_deg(payload))),
            "MOVE_RJ_REL" => Ok(Command::MoveJointRel(Joint::RightJaw, parse_deg(payload))),
            "MOVE_EP_EY_REL" => {
                let mut fields = payload.split(',');
                let pitch = parse_deg(fields.next().unwrap_or(""));
                let yaw = parse_deg(fields.next().unwrap_or(""));
                Ok(Command::MoveElbowComboRel { pitch, yaw })
            }
            "MOVE_ALL_MOTORS" => {
                let count = payload.split(',').count();
                if count != CHANNEL_COUNT {
                    return Err(Error::Command(CommandError::TokenCountMismatch {
                        expected: CHANNEL_COUNT,
                        got: count,
                    }));
                }

                let mut deltas = [0i64; CHANNEL_COUNT];
                for (slot, field) in deltas.iter_mut().zip(payload.split(',')) {
                    *slot = field.trim().parse().unwrap_or(0);
                }
                Ok(Command::MoveAllMotors(deltas))
            }
            "SELECT_MOTOR" => {
                let name = payload.trim();
                let name = String::try_from(name).map_err(|_| {
                    Error::Command(CommandError::InvalidMotorName(truncated(name)))
                })?;
                Ok(Command::SelectMotor(name))
            }
            "STEP_MOTOR_BY" => Ok(Command::StepMotorBy(payload.trim().parse().unwrap_or(0))),
            "FINE_TENSION" => Ok(Command::FineTension),
            "COARSE_TENSION" => Ok(Command::CoarseTension),
            "DETENSION" => Ok(Command::Detension),
            "SET_HOME" => Ok(Command::SetHome),
            "ENTER_TEST" => Ok(Command::EnterTest),
            "EXIT_TEST" => Ok(Command::ExitTest),
            "SET_VERBOSE" => Ok(Command::SetVerbose(
                payload.trim().parse::<u8>().unwrap_or(0) != 0,
            )),
            "TOGGLE_VERBOSE" => Ok(Command::ToggleVerbose),
            _ => Err(Error::Command(CommandError::UnknownCommand)),
        }
    }
}

fn parse_deg(field: &str) -> Degrees {
    Degrees(field.trim().parse().unwrap_or(0.0))
}

fn truncated(name: &str) -> String<8> {
    let mut out: String<8> = String::new();
    for ch in name.chars().take(8) {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Parse and dispatch one command line, producing the reply line.
///
/// Every failure is terminal for this single command; the loop around this
/// function keeps running regardless of what came in.
pub fn dispatch_line<D: StepperDriver>(
    session: &mut Session<'_, D>,
    line: &str,
    console: &mut impl Console,
) -> Reply {
    match Command::parse(line) {
        Ok(command) => dispatch(session, command, console),
        Err(error) => error_reply(&error),
    }
}

/// Dispatch a parsed command against the session.
pub fn dispatch<D: StepperDriver>(
    session: &mut Session<'_, D>,
    command: Command,
    console: &mut impl Console,
) -> Reply {
    match command {
        Command::MoveJointRel(joint, delta) => {
            move_reply(session.move_joints_rel(&[(joint, delta)], console), "OK")
        }
        Command::MoveElbowComboRel { pitch, yaw } => move_reply(
            session.move_joints_rel(
                &[(Joint::ElbowPitch, pitch), (Joint::ElbowYaw, yaw)],
                console,
            ),
            "OK",
        ),
        Command::MoveAllMotors(deltas) => move_reply(
            session.move_all(deltas),
            "Motor movement commands applied.",
        ),
        Command::SelectMotor(name) => {
            if !session.test_mode() {
                return error_reply(&Error::Command(CommandError::TestModeInactive));
            }
            match MotorChannel::from_name(name.as_str()) {
                Some(channel) => {
                    session.select(channel);
                    let mut reply = Reply::new();
                    let _ = write!(reply, "SELECTED:{}", channel.as_str());
                    reply
                }
                None => error_reply(&Error::Command(CommandError::InvalidMotorName(name))),
            }
        }
        Command::StepMotorBy(steps) => {
            if !session.test_mode() {
                return error_reply(&Error::Command(CommandError::TestModeInactive));
            }
            move_reply(session.step_selected(steps), "OK")
        }
        Command::FineTension => tension_command(session, TensionMode::Fine, console),
        Command::CoarseTension => tension_command(session, TensionMode::Coarse, console),
        Command::Detension => tension_command(session, TensionMode::Detension, console),
        Command::SetHome => {
            if !session.test_mode() {
                return error_reply(&Error::Command(CommandError::TestModeInactive));
            }
            session.set_home();
            fixed_reply("OK")
        }
        Command::EnterTest => {
            session.set_test_mode(true);
            fixed_reply("OK")
        }
        Command::ExitTest => {
            session.set_test_mode(false);
            fixed_reply("OK")
        }
        Command::SetVerbose(state) => {
            session.set_verbose(state);
            verbose_reply(session.verbose())
        }
        Command::ToggleVerbose => {
            let state = session.toggle_verbose();
            verbose_reply(state)
        }
    }
}

fn tension_command<D: StepperDriver>(
    session: &mut Session<'_, D>,
    mode: TensionMode,
    console: &mut impl Console,
) -> Reply {
    if !session.test_mode() {
        return error_reply(&Error::Command(CommandError::TestModeInactive));
    }
    session.tension_selected(mode, console);
    fixed_reply("OK")
}

fn move_reply(status: MoveStatus, success: &str) -> Reply {
    match status {
        MoveStatus::Completed => fixed_reply(success),
        MoveStatus::Cancelled => fixed_reply("Movement cancelled."),
        MoveStatus::EmergencyStopped => fixed_reply("Movement stopped due to emergency stop"),
    }
}

fn fixed_reply(text: &str) -> Reply {
    String::try_from(text).unwrap_or_default()
}

fn verbose_reply(state: bool) -> Reply {
    let mut reply = Reply::new();
    let _ = write!(reply, "VERBOSE_STATE:{}", if state { 1 } else { 0 });
    reply
}

fn error_reply(error: &Error) -> Reply {
    let mut reply = Reply::new();
    let _ = write!(reply, "ERROR: {}", error);
    reply
}
