//! Operator I/O and the emergency-stop flag.
//!
//! The command link is byte-oriented and polled; nothing in the crate
//! sleeps. `Console` is the only seam to the outside link, so a test
//! harness can script it deterministically.

use core::sync::atomic::{AtomicBool, Ordering};

/// Byte-level operator link.
///
/// `poll_byte` must never block; the busy-wait loops in this crate provide
/// the blocking themselves.
pub trait Console {
    /// Write one line of human-readable output.
    fn write_line(&mut self, line: &str);

    /// Return the next available input byte, if any.
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Console that discards output and never produces input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConsole;

impl Console for NullConsole {
    fn write_line(&mut self, _line: &str) {}

    fn poll_byte(&mut self) -> Option<u8> {
        None
    }
}

/// Busy-wait for one input byte.
pub fn read_byte_blocking(console: &mut impl Console) -> u8 {
    loop {
        if let Some(byte) = console.poll_byte() {
            return byte;
        }
    }
}

/// Discard any buffered input bytes.
pub fn drain(console: &mut impl Console) {
    while console.poll_byte().is_some() {}
}

/// Busy-wait for an operator decision: `y`/`Y` confirms, anything else
/// declines. Trailing buffered bytes (line terminators) are discarded.
pub fn confirm(console: &mut impl Console) -> bool {
    let byte = read_byte_blocking(console);
    drain(console);
    matches!(byte, b'y' | b'Y')
}

/// Emergency-stop flag, settable from interrupt context.
///
/// The flag is the only state shared with the interrupt; `trigger` performs
/// no motor I/O. The motion run loop polls `take` once per iteration, which
/// consumes the flag, so a stop applies to exactly one motion group.
#[derive(Debug, Default)]
pub struct EStop {
    triggered: AtomicBool,
}

impl EStop {
    /// Create a new, untriggered flag.
    pub const fn new() -> Self {
        Self {
            triggered: AtomicBool::new(false),
        }
    }

    /// Raise the flag. Safe to call from an interrupt handler.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    /// Consume the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.triggered.swap(false, Ordering::SeqCst)
    }

    /// Check the flag without consuming it.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedConsole {
        input: &'static [u8],
        cursor: usize,
    }

    impl Console for ScriptedConsole {
        fn write_line(&mut self, _line: &str) {}

        fn poll_byte(&mut self) -> Option<u8> {
            let byte = self.input.get(self.cursor).copied();
            if byte.is_some() {
                self.cursor += 1;
            }
            byte
        }
    }

    #[test]
    fn test_confirm_accepts_y_and_drains() {
        let mut console = ScriptedConsole {
            input: b"y\r\n",
            cursor: 0,
        };
        assert!(confirm(&mut console));
        assert_eq!(console.poll_byte(), None);
    }

    #[test]
    fn test_confirm_declines_anything_else() {
        let mut console = ScriptedConsole {
            input: b"n",
            cursor: 0,
        };
        assert!(!confirm(&mut console));
    }

    #[test]
    fn test_estop_consumed_once() {
        let estop = EStop::new();
        assert!(!estop.take());

        estop.trigger();
        assert!(estop.is_triggered());
        assert!(estop.take());
        assert!(!estop.take());
    }
}
