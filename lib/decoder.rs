use crate::signals::SignalSet;

/// Progress of a capture through one display sweep.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    /// No capture in progress, waiting for the display memory to settle.
    Idle,
    /// Waiting for the strobe of `next_digit`, counted from 1 in sweep
    /// order. `next_digit == 1` waits for the most significant digit.
    Capturing { next_digit: u8 },
    /// All digits captured; the state must be reset before reuse.
    Complete,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// A strobe driven BCD capture state machine.
///
/// `decode` is pure and must tolerate being called with the same input more
/// than once, since interrupts may coalesce or glitch.
pub trait Decoder: Copy + Default + PartialEq {
    type Signals: SignalSet;

    /// Number of digits in one sweep.
    const DIGITS: u8;

    fn decode(self, input: Self::Signals) -> Self;

    fn phase(&self) -> Phase;

    /// Lines whose edges are relevant in the current phase.
    fn wake_sources(&self) -> Self::Signals;

    fn is_idle(&self) -> bool {
        self.phase() == Phase::Idle
    }

    fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    /// Digits confirmed so far.
    fn captured(&self) -> u8 {
        match self.phase() {
            Phase::Idle => 0,
            Phase::Capturing { next_digit } => next_digit - 1,
            Phase::Complete => Self::DIGITS,
        }
    }
}

/// Advances `phase` past the digit that was just captured.
pub(crate) fn advance(next_digit: u8, digits: u8) -> Phase {
    if next_digit >= digits {
        Phase::Complete
    } else {
        Phase::Capturing {
            next_digit: next_digit + 1,
        }
    }
}
