#![cfg_attr(not(test), no_std)]

#[cfg(target_os = "none")]
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(target_os = "none")]
use defmt_rtt as _; // global logger
#[cfg(target_os = "none")]
use panic_probe as _;

mod log;

pub mod acquisition;
pub mod counter;
pub mod decoder;
pub mod error;
pub mod formatter;
#[cfg(target_os = "none")]
pub mod hw;
pub mod instrument;
pub mod multimeter;
pub mod sampler;
pub mod serial;
pub mod signals;
pub mod wake;
pub mod watchdog;

#[cfg(all(feature = "counter", feature = "multimeter"))]
compile_error!("features `counter` and `multimeter` are mutually exclusive");
#[cfg(not(any(feature = "counter", feature = "multimeter")))]
compile_error!("enable one of the `counter` or `multimeter` features");

/// The instrument family this build serves.
#[cfg(feature = "counter")]
pub type Dou = counter::Counter;
#[cfg(all(feature = "multimeter", not(feature = "counter")))]
pub type Dou = multimeter::Multimeter;

#[cfg(target_os = "none")]
static COUNT: AtomicUsize = AtomicUsize::new(0);
#[cfg(target_os = "none")]
defmt::timestamp!("{=usize}", {
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});
