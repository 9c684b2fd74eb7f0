use core::sync::atomic::{AtomicBool, Ordering};

/// Set by an interrupt handler, consumed by the main loop.
///
/// Handlers only acknowledge their peripheral and call [`WakeFlag::wake`]; all
/// decoding happens after the main loop has taken the flag.
pub struct WakeFlag(AtomicBool);

impl WakeFlag {
    pub const fn new() -> Self {
        WakeFlag(AtomicBool::new(false))
    }

    pub fn wake(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns whether the flag was set and clears it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

// DOU bus line edges (EXTI)
pub static STROBE: WakeFlag = WakeFlag::new();
// Serial bit clock ticks
pub static TICK: WakeFlag = WakeFlag::new();
