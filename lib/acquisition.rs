use embedded_hal::digital::v2::OutputPin;

use crate::decoder::Decoder;
use crate::error::Result;
use crate::instrument::{Instrument, SignalsOf};
use crate::log;
use crate::sampler::Bus;
use crate::serial::{BitClock, SerialTx};
use crate::watchdog::Watchdog;

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Stats {
    pub completed: u32,
    pub aborted: u32,
}

/// Sequences capture, formatting and transmission of readings.
///
/// Interrupt handlers only wake the core; every decoding step runs here.
/// A sweep that never completes is left to the watchdog: it is fed when a
/// cycle starts and whenever the decoder makes progress, nothing else.
pub struct Acquisition<I, B, W, C, P>
where
    I: Instrument,
{
    bus: B,
    watchdog: W,
    serial: SerialTx<C, P>,
    decoder: I::Decoder,
    stats: Stats,
}

impl<I, B, W, C, P> Acquisition<I, B, W, C, P>
where
    I: Instrument,
    B: Bus<Signals = SignalsOf<I>>,
    W: Watchdog,
    C: BitClock,
    P: OutputPin,
{
    pub fn new(bus: B, watchdog: W, serial: SerialTx<C, P>) -> Self {
        Acquisition {
            bus,
            watchdog,
            serial,
            decoder: I::Decoder::default(),
            stats: Stats::default(),
        }
    }

    /// Captures one reading and sends it.
    pub fn cycle(&mut self) -> Result<(), P::Error> {
        self.watchdog.feed();
        self.decoder = I::Decoder::default();
        let line = loop {
            self.bus.arm(self.decoder.wake_sources());
            self.bus.wait();
            if let Some(line) = self.wake() {
                break line;
            }
        };
        self.bus.disarm();
        let sent = self.serial.transmit(line.as_ref());
        if sent.is_err() {
            log::warning!("reading #{=u32} lost, TX pin failed", self.stats.completed);
        }
        sent
    }

    /// Handles one wake-up: samples the bus and steps the decoder.
    ///
    /// Returns the formatted reading once the sweep is complete.
    pub fn wake(&mut self) -> Option<I::Line> {
        let input = self.bus.sample();
        let previous = self.decoder;
        let decoder = previous.decode(input);
        self.decoder = decoder;

        // Decoders may track line levels, only a new phase is progress
        if decoder.phase() == previous.phase() {
            return None;
        }
        if decoder.is_idle() {
            self.stats.aborted += 1;
            log::debug!("sweep aborted after {=u8} digits", previous.captured());
            return None;
        }
        self.watchdog.feed();
        if !decoder.is_complete() {
            return None;
        }

        self.stats.completed += 1;
        self.decoder = I::Decoder::default();
        let line = I::format(&decoder, input);
        log::info!("reading #{=u32} complete", self.stats.completed);
        Some(line)
    }

    pub fn decoder(&self) -> &I::Decoder {
        &self.decoder
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{Counter, Signals};
    use crate::decoder::Phase;
    use crate::multimeter::{self, Multimeter};
    use crate::serial::tests::{received, serial, MockClock, MockPin, TxTrace};
    use crate::signals::SignalSet;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockBus<S> {
        script: VecDeque<S>,
        current: S,
        armed: Vec<S>,
        disarmed: usize,
    }

    impl<S: SignalSet> Bus for MockBus<S> {
        type Signals = S;

        fn arm(&mut self, sources: S) {
            self.armed.push(sources);
        }

        fn disarm(&mut self) {
            self.disarmed += 1;
        }

        fn wait(&mut self) {
            self.current = self
                .script
                .pop_front()
                .expect("no wake-up left, the watchdog would reset now");
        }

        fn sample(&mut self) -> S {
            self.current
        }
    }

    #[derive(Default)]
    struct MockWatchdog {
        feeds: usize,
    }

    impl Watchdog for MockWatchdog {
        fn feed(&mut self) {
            self.feeds += 1;
        }
    }

    type CounterAcquisition =
        Acquisition<Counter, MockBus<Signals>, MockWatchdog, MockClock, MockPin>;

    fn counter(script: Vec<Signals>) -> (CounterAcquisition, Rc<RefCell<TxTrace>>) {
        let (tx, wire) = serial();
        let bus = MockBus {
            script: script.into(),
            ..MockBus::default()
        };
        (Acquisition::new(bus, MockWatchdog::default(), tx), wire)
    }

    fn digit(n: u8) -> Signals {
        Signals::from_bits(n as u16)
    }

    fn counter_sweep(ds: Option<u8>) -> Vec<Signals> {
        let mut inputs = vec![Signals::MUP, Signals::empty()];
        for n in 1..=6 {
            let mut input = Signals::strobe(n) | digit(n);
            if ds == Some(n) {
                input |= Signals::DS;
            }
            inputs.push(input);
        }
        inputs
    }

    #[test]
    fn cycle_transmits_one_reading() {
        let (mut acquisition, wire) = counter(counter_sweep(None));
        acquisition.cycle().unwrap();

        assert_eq!(received(&wire.borrow().samples), " 123456\r\n");
        assert_eq!(acquisition.stats().completed, 1);
        assert_eq!(acquisition.bus.disarmed, 1);
        assert!(acquisition.bus.script.is_empty());
        assert!(acquisition.decoder().is_idle());
    }

    #[test]
    fn cycle_reports_unit() {
        let mut script = counter_sweep(Some(4));
        let last = script.len() - 1;
        script[last] |= Signals::NML;
        let (mut acquisition, wire) = counter(script);
        acquisition.cycle().unwrap();

        assert_eq!(received(&wire.borrow().samples), " 123.456ms\r\n");
    }

    #[test]
    fn armed_sources_narrow_with_progress() {
        let (mut acquisition, _) = counter(counter_sweep(None));
        acquisition.cycle().unwrap();

        let armed = &acquisition.bus.armed;
        assert_eq!(armed[0], Signals::MUP);
        assert_eq!(armed[1], Signals::MUP);
        assert_eq!(armed[2], Signals::MUP | Signals::AS6);
        assert_eq!(armed[7], Signals::MUP | Signals::AS1);
        assert_eq!(armed.len(), 8);
    }

    #[test]
    fn aborted_sweep_is_not_sent() {
        let mut script = vec![
            Signals::empty(),
            Signals::AS6 | digit(9),
            Signals::AS5 | digit(9),
            Signals::MUP,
        ];
        script.extend(counter_sweep(None));
        let (mut acquisition, wire) = counter(script);
        acquisition.cycle().unwrap();

        assert_eq!(received(&wire.borrow().samples), " 123456\r\n");
        assert_eq!(acquisition.stats(), Stats { completed: 1, aborted: 1 });
    }

    #[test]
    fn stalled_sweep_leaves_watchdog_unfed() {
        let (mut acquisition, wire) = counter(vec![]);
        let script = [
            Signals::empty(),
            Signals::AS6 | digit(1),
            Signals::AS5 | digit(2),
            // display blanked: only unrelated activity from now on
            Signals::DS,
            Signals::AS6 | digit(1),
            Signals::RNG2,
        ];

        let mut feeds = Vec::new();
        for input in script.iter().copied() {
            acquisition.bus.current = input;
            assert!(acquisition.wake().is_none());
            feeds.push(acquisition.watchdog.feeds);
        }

        assert_eq!(feeds, vec![1, 2, 3, 3, 3, 3]);
        assert_eq!(acquisition.decoder().phase(), Phase::Capturing { next_digit: 3 });
        assert!(wire.borrow().samples.is_empty());
        assert_eq!(acquisition.stats().completed, 0);

        // after the reset a fresh instance starts from scratch
        let (mut acquisition, wire) = counter(counter_sweep(None));
        acquisition.cycle().unwrap();
        assert_eq!(received(&wire.borrow().samples), " 123456\r\n");
    }

    #[test]
    #[should_panic(expected = "watchdog")]
    fn stalled_cycle_never_returns() {
        let (mut acquisition, _) = counter(vec![
            Signals::empty(),
            Signals::AS6 | digit(1),
            Signals::AS5 | digit(2),
        ]);
        acquisition.cycle().ok();
    }

    #[test]
    fn multimeter_cycle() {
        let (tx, wire) = serial();
        let bus = MockBus {
            script: vec![
                multimeter::Signals::T,
                multimeter::Signals::empty(),
                multimeter::Signals::S | multimeter::Signals::S1 | multimeter::Signals::from_bits(6),
                // a second wake within the same clock period
                multimeter::Signals::S | multimeter::Signals::S1 | multimeter::Signals::from_bits(6),
                multimeter::Signals::empty(),
                multimeter::Signals::S | multimeter::Signals::Z,
                multimeter::Signals::S | multimeter::Signals::Z,
                multimeter::Signals::empty(),
                multimeter::Signals::S,
                multimeter::Signals::empty(),
                multimeter::Signals::S | multimeter::Signals::S4,
            ]
            .into(),
            ..MockBus::default()
        };
        let mut acquisition: Acquisition<Multimeter, _, _, _, _> =
            Acquisition::new(bus, MockWatchdog::default(), tx);
        acquisition.cycle().unwrap();

        assert_eq!(received(&wire.borrow().samples), " + 010\r\n");
        // cycle start, sweep start and one per digit
        assert_eq!(acquisition.watchdog.feeds, 6);
    }
}
