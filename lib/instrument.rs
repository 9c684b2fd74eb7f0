use crate::decoder::Decoder;
use crate::formatter::Formatter;
use crate::sampler::Wire;

pub type SignalsOf<I> = <<I as Formatter>::Decoder as Decoder>::Signals;

/// An instrument family served by one firmware build.
pub trait Instrument: Formatter {
    const NAME: &'static str;
    /// Longest legitimate time between two completed readings.
    const WATCHDOG_TIMEOUT_MS: u32;

    fn wiring() -> &'static [Wire<SignalsOf<Self>>];
}
