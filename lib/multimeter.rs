//! Four digit (3½) multimeter DOU (8000A style).
//!
//! Every digit is clocked by `S`. `S1` marks the first digit of a sweep and
//! `S4` the last, the two middle digits carry no strobe of their own. Due to
//! the wiring of the display the sweep visits the digits in the order 1, 3,
//! 2, 4. The first digit is not BCD: it holds the overload, polarity and
//! half digit flags.

use crate::decoder::{advance, Decoder, Phase};
use crate::formatter::{self, Formatter, LINE_ENDING};
use crate::instrument::Instrument;
use crate::sampler::{Trigger, Wire};
use crate::signals::{signal_set, SignalSet};

pub const NUMBER_OF_DIGITS: u8 = 4;
pub const MAX_READING_SIZE: usize = NUMBER_OF_DIGITS as usize
    + 1 // overload indicator
    + 1 // polarity indicator
    + LINE_ENDING.len()
    + 1; // terminator

pub type Line = formatter::Line<MAX_READING_SIZE>;

/// Display position (1 = leftmost) of each slot of the sweep.
const SWEEP_ORDER: [u8; NUMBER_OF_DIGITS as usize] = [1, 3, 2, 4];

signal_set! {
    pub struct Signals {
        /// BCD 1
        const Z = 0x0001;
        /// BCD 2
        const Y = 0x0002;
        /// BCD 4
        const X = 0x0004;
        /// BCD 8
        const W = 0x0008;
        /// Meter is updating
        const T = 0x0010;
        /// Digit clock
        const S = 0x0020;
        /// First digit strobe
        const S1 = 0x0040;
        /// Last digit strobe
        const S4 = 0x0080;
    }
}

// GPIOB
pub const WIRING: &[Wire<Signals>] = &[
    Wire::high(0, Signals::Y, Trigger::None),
    Wire::high(1, Signals::X, Trigger::None),
    Wire::high(2, Signals::W, Trigger::None),
    Wire::high(3, Signals::Z, Trigger::None),
    Wire::low(4, Signals::T, Trigger::Both),
    Wire::high(5, Signals::S1, Trigger::None),
    Wire::high(7, Signals::S, Trigger::Rising),
    Wire::high(14, Signals::S4, Trigger::None),
];

// Flags held by the first digit
const OVERLOAD: u16 = Signals::W.0;
const POSITIVE: u16 = Signals::Y.0;
const HALF_DIGIT: u16 = Signals::Z.0;

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct MultimeterDecoder {
    /// Captured digits in display order, first digit in the highest nibble.
    pub reading: u16,
    phase: Phase,
    /// Level of `S` in the previous sample; digits are taken on its rising
    /// edge only, as the middle slots have no strobe to tell them apart.
    clock: bool,
}

impl MultimeterDecoder {
    fn restart(clock: bool) -> Self {
        MultimeterDecoder {
            reading: 0,
            phase: Phase::Capturing { next_digit: 1 },
            clock,
        }
    }

    fn capture(self, slot: u8, input: Signals) -> Self {
        let shift = 4 * (NUMBER_OF_DIGITS - SWEEP_ORDER[slot as usize - 1]);
        MultimeterDecoder {
            reading: self.reading | (input.digit() as u16) << shift,
            phase: advance(slot, NUMBER_OF_DIGITS),
            clock: true,
        }
    }

    fn clocked(self, clock: bool) -> Self {
        MultimeterDecoder { clock, ..self }
    }
}

impl Decoder for MultimeterDecoder {
    type Signals = Signals;

    const DIGITS: u8 = NUMBER_OF_DIGITS;

    fn decode(self, input: Signals) -> Self {
        let clock = input.contains(Signals::S);
        let first = input.contains(Signals::S1);
        let last = input.contains(Signals::S4);
        match self.phase {
            Phase::Idle if input.contains(Signals::T) => self,
            Phase::Idle => MultimeterDecoder::restart(clock),
            Phase::Capturing { .. } if input.contains(Signals::T) => MultimeterDecoder::default(),
            // Same clock period as the previous sample
            Phase::Capturing { .. } if !clock || self.clock => self.clocked(clock),
            Phase::Capturing { next_digit: 1 } if first && !last => self.capture(1, input),
            // A new sweep started before this one was complete
            Phase::Capturing { .. } if first && !last => {
                MultimeterDecoder::restart(clock).capture(1, input)
            }
            // The sweep ended early, start over with the next one
            Phase::Capturing { next_digit: 2..=3 } if last => MultimeterDecoder::default(),
            Phase::Capturing {
                next_digit: slot @ 2..=3,
            } => self.capture(slot, input),
            Phase::Capturing { next_digit: 4 } if last && !first => self.capture(4, input),
            Phase::Capturing { .. } => self.clocked(clock),
            Phase::Complete => self,
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn wake_sources(&self) -> Signals {
        match self.phase {
            Phase::Capturing { .. } => Signals::T | Signals::S,
            Phase::Idle | Phase::Complete => Signals::T,
        }
    }
}

/// The first digit is binary: only a leading "1" can be shown there.
pub fn format(reading: u16) -> Line {
    let flags = reading >> 12;
    let mut line = Line::new();
    line.push(if flags & OVERLOAD != 0 { '>' } else { ' ' });
    line.push(if flags & POSITIVE != 0 { '+' } else { '-' });
    line.push(if flags & HALF_DIGIT != 0 { '1' } else { ' ' });
    for shift in [8, 4, 0] {
        line.push_digit((reading >> shift) as u32);
    }
    line.push_str(LINE_ENDING);
    line
}

pub struct Multimeter;

impl Formatter for Multimeter {
    type Decoder = MultimeterDecoder;
    type Line = Line;

    fn format(decoded: &MultimeterDecoder, _aux: Signals) -> Line {
        format(decoded.reading)
    }
}

impl Instrument for Multimeter {
    const NAME: &'static str = "multimeter";
    // About six readings per second
    const WATCHDOG_TIMEOUT_MS: u32 = 1_000;

    fn wiring() -> &'static [Wire<Signals>] {
        WIRING
    }
}
