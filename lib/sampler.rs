use crate::signals::SignalSet;

/// Which edge of a bus line may wake the core.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Trigger {
    None,
    Rising,
    Falling,
    Both,
}

/// One physical DOU bus line and the logical signal it carries.
#[derive(Copy, Clone, Debug)]
pub struct Wire<S> {
    pub pin: u8,
    pub signal: S,
    pub active_low: bool,
    pub trigger: Trigger,
}

impl<S> Wire<S> {
    pub const fn high(pin: u8, signal: S, trigger: Trigger) -> Self {
        Wire {
            pin,
            signal,
            active_low: false,
            trigger,
        }
    }

    pub const fn low(pin: u8, signal: S, trigger: Trigger) -> Self {
        Wire {
            pin,
            signal,
            active_low: true,
            trigger,
        }
    }
}

/// Access to the DOU bus, owned by the acquisition loop.
pub trait Bus {
    type Signals: SignalSet;

    /// Enables wake-up on the edges of the given lines only.
    fn arm(&mut self, sources: Self::Signals);
    fn disarm(&mut self);
    /// Sleeps until at least one armed edge occurred since the last wait.
    fn wait(&mut self);
    /// Reads all bus lines right now.
    fn sample(&mut self) -> Self::Signals;
}

/// Packs a raw port word into the logical layout described by `wiring`.
pub fn pack<S: SignalSet>(raw: u16, wiring: &[Wire<S>]) -> S {
    let bits = wiring
        .iter()
        .filter(|wire| (raw >> wire.pin & 1 != 0) != wire.active_low)
        .fold(0, |bits, wire| bits | wire.signal.bits());
    S::from_bits(bits)
}

/// Port pins carrying any of `signals` which can actually raise an interrupt.
pub fn pins<S: SignalSet>(signals: S, wiring: &[Wire<S>]) -> u16 {
    wiring
        .iter()
        .filter(|wire| wire.trigger != Trigger::None && signals.intersects(wire.signal))
        .fold(0, |mask, wire| mask | 1 << wire.pin)
}

/// Port pins whose edge in `trigger` direction must be detected.
///
/// Returns `(rising, falling)` masks in port pin order. The direction is
/// physical, so an active-low line's assertion is a falling edge.
pub fn edges<S: SignalSet>(wiring: &[Wire<S>]) -> (u16, u16) {
    wiring
        .iter()
        .fold((0, 0), |(rising, falling), wire| match wire.trigger {
            Trigger::None => (rising, falling),
            Trigger::Rising => (rising | 1 << wire.pin, falling),
            Trigger::Falling => (rising, falling | 1 << wire.pin),
            Trigger::Both => (rising | 1 << wire.pin, falling | 1 << wire.pin),
        })
}
