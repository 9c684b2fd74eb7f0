use stm32g0xx_hal::stm32g0::stm32g070::IWDG;

use crate::log;
use crate::watchdog::{Timing, Watchdog};

const KEY_UNLOCK: u16 = 0x5555;
const KEY_RELOAD: u16 = 0xaaaa;
const KEY_START: u16 = 0xcccc;

/// The independent watchdog, running from LSI once started.
pub struct IndependentWatchdog {
    iwdg: IWDG,
}

impl IndependentWatchdog {
    /// Starts the watchdog, there is no way to stop it short of a reset.
    pub fn new(iwdg: IWDG, timeout_ms: u32) -> Self {
        let timing = Timing::for_timeout(timeout_ms);
        let mut watchdog = IndependentWatchdog { iwdg };
        watchdog.configure(timing);
        log::info!(
            "watchdog armed, {=u32} ms window",
            timing.timeout_ms()
        );
        watchdog
    }

    fn configure(&mut self, timing: Timing) {
        // Starting also enables LSI
        self.key(KEY_START);
        self.key(KEY_UNLOCK);
        self.iwdg
            .pr
            .write(|w| unsafe { w.pr().bits(timing.prescaler) });
        self.iwdg
            .rlr
            .write(|w| unsafe { w.rl().bits(timing.reload) });
        // Registers are updated in the LSI domain
        while self.iwdg.sr.read().bits() != 0 {}
        self.key(KEY_RELOAD);
    }

    fn key(&mut self, key: u16) {
        self.iwdg.kr.write(|w| unsafe { w.key().bits(key) });
    }
}

impl Watchdog for IndependentWatchdog {
    fn feed(&mut self) {
        self.key(KEY_RELOAD);
    }
}
