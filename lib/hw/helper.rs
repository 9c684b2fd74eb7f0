use cortex_m::{asm, interrupt};
use stm32g0xx_hal::gpio::gpioa::PA2;
use stm32g0xx_hal::gpio::{Output, PushPull};
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::stm32g0::stm32g070::RCC;

use crate::acquisition::Acquisition;
use crate::hw::bus::DouBus;
use crate::hw::timers::BitTimer;
use crate::hw::watchdog::IndependentWatchdog;
use crate::instrument::SignalsOf;
use crate::wake::WakeFlag;
use crate::Dou;

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

/// Sleeps until `flag` is raised by an interrupt handler, consuming it.
pub fn sleep_until(flag: &WakeFlag) {
    loop {
        // An interrupt between the check and WFI stays pending, so WFI
        // returns immediately instead of missing it.
        let woken = interrupt::free(|_| {
            let woken = flag.take();
            if !woken {
                asm::wfi();
            }
            woken
        });
        if woken {
            return;
        }
    }
}

// PB0..PB15 - DOU bus, wiring per instrument family
pub type HwBus = DouBus<SignalsOf<Dou>>;
// PA2 - Serial TX, idles high
pub type TxPin = PA2<Output<PushPull>>;

pub type HwAcquisition = Acquisition<Dou, HwBus, IndependentWatchdog, BitTimer, TxPin>;
