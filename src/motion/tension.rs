//! Cable tensioning and detensioning.
//!
//! Runs a single motor at a fixed constant speed until the operator sends
//! any byte. There is deliberately no timeout: pre-load is a hands-on
//! procedure and the operator owns the stop condition.

use crate::config::units::StepsPerSec;
use crate::config::{TensionConfig, NO_RAMP_ACCELERATION};
use crate::io::{drain, Console};

use super::driver::StepperDriver;

/// Tensioning speed profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensionMode {
    /// Slow take-up for final pre-load.
    Fine,
    /// Fast take-up for gross slack.
    Coarse,
    /// Coarse speed reversed, paying cable out.
    Detension,
}

impl TensionMode {
    /// The signed constant speed for this mode.
    pub fn speed(self, config: &TensionConfig) -> StepsPerSec {
        match self {
            TensionMode::Fine => config.fine,
            TensionMode::Coarse => config.coarse,
            TensionMode::Detension => config.coarse.reversed(),
        }
    }

    /// Operator-facing message printed while running.
    fn banner(self) -> &'static str {
        match self {
            TensionMode::Fine => "Fine tensioning... Press any key to stop",
            TensionMode::Coarse => "Coarse tensioning... Press any key to stop",
            TensionMode::Detension => "Detensioning... Press any key to stop",
        }
    }
}

/// Run one motor at the mode's constant speed until a console byte arrives.
///
/// Saves the motor's max speed and acceleration on entry and restores them
/// on exit; the constant speed is zeroed so the motor holds position.
pub fn tension<D: StepperDriver>(
    driver: &mut D,
    mode: TensionMode,
    config: &TensionConfig,
    console: &mut impl Console,
) {
    console.write_line(mode.banner());

    let saved_max_speed = driver.max_speed();
    let saved_acceleration = driver.acceleration();

    let speed = mode.speed(config);
    driver.set_max_speed(StepsPerSec(speed.magnitude()));
    driver.set_acceleration(NO_RAMP_ACCELERATION);
    driver.set_speed(speed);

    while console.poll_byte().is_none() {
        driver.run_speed();
    }
    drain(console);

    driver.set_max_speed(saved_max_speed);
    driver.set_acceleration(saved_acceleration);
    driver.set_speed(StepsPerSec(0.0));

    console.write_line("Tensioning stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::StepsPerSec2;
    use crate::motion::driver::SimulatedStepper;

    /// Console that delivers a single stop byte after a fixed number of
    /// polls.
    struct CountdownConsole {
        polls_until_byte: u32,
        delivered: bool,
    }

    impl Console for CountdownConsole {
        fn write_line(&mut self, _line: &str) {}

        fn poll_byte(&mut self) -> Option<u8> {
            if self.delivered {
                return None;
            }
            if self.polls_until_byte == 0 {
                self.delivered = true;
                Some(b'x')
            } else {
                self.polls_until_byte -= 1;
                None
            }
        }
    }

    #[test]
    fn test_fine_tension_runs_until_stop_byte() {
        let mut motor = SimulatedStepper::new();
        motor.set_max_speed(StepsPerSec(300.0));
        motor.set_acceleration(StepsPerSec2(123.0));

        let config = TensionConfig::default();
        let mut console = CountdownConsole {
            polls_until_byte: 20,
            delivered: false,
        };

        tension(&mut motor, TensionMode::Fine, &config, &mut console);

        assert_eq!(motor.current_position(), 20);
        assert!((motor.max_speed().value() - 300.0).abs() < 1e-4);
        assert!((motor.acceleration().value() - 123.0).abs() < 1e-4);
    }

    #[test]
    fn test_detension_runs_backward() {
        let mut motor = SimulatedStepper::new();
        let config = TensionConfig::default();
        let mut console = CountdownConsole {
            polls_until_byte: 8,
            delivered: false,
        };

        tension(&mut motor, TensionMode::Detension, &config, &mut console);
        assert_eq!(motor.current_position(), -8);
    }

    #[test]
    fn test_mode_speeds() {
        let config = TensionConfig::default();
        assert!((TensionMode::Fine.speed(&config).value() - 50.0).abs() < 1e-4);
        assert!((TensionMode::Coarse.speed(&config).value() - 600.0).abs() < 1e-4);
        assert!((TensionMode::Detension.speed(&config).value() + 600.0).abs() < 1e-4);
    }
}
