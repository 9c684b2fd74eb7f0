//! Six digit counter DOU (1900A style).
//!
//! The counter strobes its digits from MSD (`AS6`) down to LSD (`AS1`) while
//! `nMUP` is low. The decimal strobe `DS` accompanies the digit that follows
//! the decimal point; the range lines tell the unit.

use crate::decoder::{advance, Decoder, Phase};
use crate::formatter::{self, Formatter, LINE_ENDING};
use crate::instrument::Instrument;
use crate::sampler::{Trigger, Wire};
use crate::signals::{signal_set, SignalSet};

pub const NUMBER_OF_DIGITS: u8 = 6;
pub const MAX_UNIT_LENGTH: usize = 4;
pub const MAX_READING_SIZE: usize = NUMBER_OF_DIGITS as usize
    + 1 // overflow indicator
    + 1 // decimal point
    + MAX_UNIT_LENGTH
    + LINE_ENDING.len()
    + 1; // terminator

pub type Line = formatter::Line<MAX_READING_SIZE>;

signal_set! {
    pub struct Signals {
        /// BCD 1
        const A = 0x0001;
        /// BCD 2
        const B = 0x0002;
        /// BCD 4
        const C = 0x0004;
        /// BCD 8
        const D = 0x0008;
        /// MSD strobe
        const AS6 = 0x0010;
        const AS5 = 0x0020;
        const AS4 = 0x0040;
        const AS3 = 0x0080;
        const AS2 = 0x0100;
        /// LSD strobe
        const AS1 = 0x0200;
        const RNG2 = 0x0400;
        const NML = 0x0800;
        const OVFL = 0x1000;
        /// Memory update in progress
        const MUP = 0x2000;
        /// Decimal strobe
        const DS = 0x8000;
    }
}

impl Signals {
    /// Strobe of the `n`th digit in sweep order, 1 being the MSD.
    pub fn strobe(n: u8) -> Signals {
        Signals::from_bits(Signals::AS6.bits() << (n - 1))
    }
}

// GPIOB
pub const WIRING: &[Wire<Signals>] = &[
    Wire::high(0, Signals::B, Trigger::None),
    Wire::high(1, Signals::AS1, Trigger::Rising),
    Wire::high(3, Signals::RNG2, Trigger::None),
    Wire::high(4, Signals::NML, Trigger::None),
    Wire::high(5, Signals::OVFL, Trigger::None),
    Wire::high(6, Signals::AS3, Trigger::Rising),
    Wire::high(7, Signals::AS2, Trigger::Rising),
    Wire::high(8, Signals::MUP, Trigger::Both),
    Wire::high(9, Signals::C, Trigger::None),
    Wire::high(10, Signals::D, Trigger::None),
    Wire::high(11, Signals::AS6, Trigger::Rising),
    Wire::high(12, Signals::AS5, Trigger::Rising),
    Wire::high(13, Signals::AS4, Trigger::Rising),
    Wire::high(14, Signals::A, Trigger::None),
    Wire::high(15, Signals::DS, Trigger::None),
];

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Unit {
    Millisecond,
    Microsecond,
    MegaHertz,
    KiloHertz,
    None,
}

impl Unit {
    /// Without a decimal point the counter shows a plain count.
    pub fn determine(nml: bool, rng_2: bool, has_decimal_point: bool) -> Unit {
        if !has_decimal_point {
            return Unit::None;
        }
        match (rng_2, nml) {
            (false, true) => Unit::Millisecond,
            (false, false) => Unit::Microsecond,
            (true, true) => Unit::MegaHertz,
            (true, false) => Unit::KiloHertz,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Unit::Millisecond => "ms",
            Unit::Microsecond => "us",
            Unit::MegaHertz => "MHz",
            Unit::KiloHertz => "kHz",
            Unit::None => "",
        }
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct CounterDecoder {
    /// Captured BCD digits, MSD in the highest used nibble.
    pub reading: u32,
    /// Digits following the decimal point, 0 without one.
    pub decimal_point_position: u8,
    phase: Phase,
}

impl CounterDecoder {
    fn restart() -> Self {
        CounterDecoder {
            phase: Phase::Capturing { next_digit: 1 },
            ..CounterDecoder::default()
        }
    }
}

impl Decoder for CounterDecoder {
    type Signals = Signals;

    const DIGITS: u8 = NUMBER_OF_DIGITS;

    fn decode(self, input: Signals) -> Self {
        match self.phase {
            // Starting only once the update is over makes every capture begin
            // with the MSD of a fresh sweep.
            Phase::Idle if input.contains(Signals::MUP) => self,
            Phase::Idle => CounterDecoder::restart(),
            Phase::Capturing { .. } if input.contains(Signals::MUP) => CounterDecoder::default(),
            Phase::Capturing { next_digit } if input.contains(Signals::strobe(next_digit)) => {
                let position = NUMBER_OF_DIGITS + 1 - next_digit;
                CounterDecoder {
                    reading: self.reading << 4 | input.digit() as u32,
                    decimal_point_position: if input.contains(Signals::DS) {
                        position
                    } else {
                        self.decimal_point_position
                    },
                    phase: advance(next_digit, NUMBER_OF_DIGITS),
                }
            }
            Phase::Capturing { .. } | Phase::Complete => self,
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn wake_sources(&self) -> Signals {
        match self.phase {
            Phase::Capturing { next_digit } => Signals::MUP | Signals::strobe(next_digit),
            Phase::Idle | Phase::Complete => Signals::MUP,
        }
    }
}

/// `decimal_point_position` digits are printed after the point, so the point
/// goes in front of the digit that came with the decimal strobe. With the
/// strobe on the LSD the line reads `" 12345.6"`.
pub fn format(reading: u32, decimal_point_position: u8, overflow: bool, unit: Unit) -> Line {
    let mut line = Line::new();
    line.push(if overflow { '>' } else { ' ' });
    for digit in (0..NUMBER_OF_DIGITS).rev() {
        if decimal_point_position != 0 && digit + 1 == decimal_point_position {
            line.push('.');
        }
        line.push_digit(reading >> (4 * digit as u32));
    }
    line.push_str(unit.text());
    line.push_str(LINE_ENDING);
    line
}

pub struct Counter;

impl Formatter for Counter {
    type Decoder = CounterDecoder;
    type Line = Line;

    fn format(decoded: &CounterDecoder, aux: Signals) -> Line {
        let dp = decoded.decimal_point_position;
        let unit = Unit::determine(
            aux.contains(Signals::NML),
            aux.contains(Signals::RNG2),
            dp != 0,
        );
        format(decoded.reading, dp, aux.contains(Signals::OVFL), unit)
    }
}

impl Instrument for Counter {
    const NAME: &'static str = "counter";
    // Longest gate time is 10 s
    const WATCHDOG_TIMEOUT_MS: u32 = 12_000;

    fn wiring() -> &'static [Wire<Signals>] {
        WIRING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(n: u8) -> Signals {
        Signals::from_bits(n as u16)
    }

    /// A full sweep for `digits`, with the decimal strobe on sweep index `ds`.
    fn sweep(digits: [u8; 6], ds: Option<usize>) -> Vec<Signals> {
        let strobes = digits.iter().enumerate().map(|(i, &d)| {
            let strobe = Signals::strobe(i as u8 + 1) | digit(d);
            if ds == Some(i) {
                strobe | Signals::DS
            } else {
                strobe
            }
        });
        core::iter::once(Signals::empty()).chain(strobes).collect()
    }

    fn decode_all(inputs: impl IntoIterator<Item = Signals>) -> CounterDecoder {
        inputs
            .into_iter()
            .fold(CounterDecoder::default(), |state, input| state.decode(input))
    }

    #[test]
    fn strobe_order() {
        assert_eq!(Signals::strobe(1), Signals::AS6);
        assert_eq!(Signals::strobe(2), Signals::AS5);
        assert_eq!(Signals::strobe(6), Signals::AS1);
    }

    #[test]
    fn waits_for_update_to_finish() {
        let state = CounterDecoder::default().decode(Signals::MUP | Signals::AS6 | digit(3));
        assert!(state.is_idle());
        assert_eq!(state, CounterDecoder::default());

        let state = state.decode(Signals::empty());
        assert_eq!(state.phase(), Phase::Capturing { next_digit: 1 });
        assert_eq!(state.reading, 0);
    }

    #[test]
    fn captures_a_full_sweep() {
        let state = decode_all(sweep([1, 2, 3, 4, 5, 6], None));
        assert!(state.is_complete());
        assert_eq!(state.reading, 0x123456);
        assert_eq!(state.decimal_point_position, 0);
    }

    #[test]
    fn decimal_strobe_records_position_from_lsd() {
        // digit '4' is fourth in sweep order, third from the LSD
        let state = decode_all(sweep([1, 2, 3, 4, 5, 6], Some(3)));
        assert_eq!(state.decimal_point_position, 3);

        let state = decode_all(sweep([1, 2, 3, 4, 5, 6], Some(5)));
        assert_eq!(state.decimal_point_position, 1);

        let state = decode_all(sweep([1, 2, 3, 4, 5, 6], Some(0)));
        assert_eq!(state.decimal_point_position, 6);
    }

    #[test]
    fn unrelated_strobes_are_ignored() {
        let mut state = CounterDecoder::default().decode(Signals::empty());
        state = state.decode(Signals::AS6 | digit(7));
        // repeated MSD strobe, wrong strobes and a bare data change
        for input in [Signals::AS6 | digit(7), Signals::AS4 | digit(1), digit(2)] {
            let next = state.decode(input);
            assert_eq!(next, state);
            state = next;
        }
        assert_eq!(state.phase(), Phase::Capturing { next_digit: 2 });
        assert_eq!(state.reading, 0x7);
        assert_eq!(state.wake_sources(), Signals::MUP | Signals::AS5);
    }

    #[test]
    fn update_during_capture_aborts() {
        let inputs = sweep([9, 8, 7, 6, 5, 4], Some(1));
        for cut in 2..inputs.len() {
            let state = decode_all(
                inputs[..cut]
                    .iter()
                    .copied()
                    .chain(core::iter::once(Signals::MUP | Signals::DS | digit(1))),
            );
            assert_eq!(state, CounterDecoder::default(), "cut after {}", cut);
        }
    }

    #[test]
    fn complete_state_is_frozen() {
        let state = decode_all(sweep([1, 2, 3, 4, 5, 6], None));
        assert_eq!(state.decode(Signals::MUP), state);
        assert_eq!(state.decode(Signals::AS6 | digit(9)), state);
    }

    #[test]
    fn formats_plain_count() {
        assert_eq!(format(0x123456, 0, false, Unit::None).as_str(), " 123456\r\n");
        assert_eq!(format(0x000042, 0, true, Unit::None).as_str(), ">000042\r\n");
    }

    #[test]
    fn formats_decimal_point_and_unit() {
        assert_eq!(
            format(0x123456, 3, false, Unit::Millisecond).as_str(),
            " 123.456ms\r\n"
        );
        assert_eq!(
            format(0x123456, 1, false, Unit::KiloHertz).as_str(),
            " 12345.6kHz\r\n"
        );
        assert_eq!(format(0x100000, 6, true, Unit::MegaHertz).as_str(), ">.100000MHz\r\n");
    }

    #[test]
    fn widest_line_fits() {
        let line = format(0x999999, 6, true, Unit::MegaHertz);
        assert!(line.len() < MAX_READING_SIZE);
    }

    #[test]
    fn blanked_digits_print_as_space() {
        assert_eq!(format(0xff1234, 0, false, Unit::None).as_str(), "   1234\r\n");
    }

    #[test]
    fn format_is_pure() {
        assert_eq!(
            format(0x654321, 2, true, Unit::Microsecond),
            format(0x654321, 2, true, Unit::Microsecond)
        );
    }

    #[test]
    fn unit_needs_decimal_point() {
        assert_eq!(Unit::determine(true, false, false), Unit::None);
        assert_eq!(Unit::determine(true, false, true), Unit::Millisecond);
        assert_eq!(Unit::determine(false, false, true), Unit::Microsecond);
        assert_eq!(Unit::determine(true, true, true), Unit::MegaHertz);
        assert_eq!(Unit::determine(false, true, true), Unit::KiloHertz);
    }

    #[test]
    fn decoded_sweep_formats_with_aux_lines() {
        let inputs = sweep([1, 2, 3, 4, 5, 6], Some(3));
        let last = *inputs.last().unwrap() | Signals::NML;
        let state = decode_all(inputs);
        assert_eq!(Counter::format(&state, last).as_str(), " 123.456ms\r\n");

        // decimal strobe together with the LSD
        let inputs = sweep([1, 2, 3, 4, 5, 6], Some(5));
        let last = *inputs.last().unwrap() | Signals::RNG2;
        let state = decode_all(inputs);
        assert_eq!(state.decimal_point_position, 1);
        assert_eq!(Counter::format(&state, last).as_str(), " 12345.6kHz\r\n");

        let state = decode_all(sweep([1, 2, 3, 4, 5, 6], None));
        let aux = Signals::AS1 | Signals::NML | Signals::RNG2;
        assert_eq!(Counter::format(&state, aux).as_str(), " 123456\r\n");
    }
}
