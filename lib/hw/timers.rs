use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::TIM14;
use stm32g0xx_hal::time::U32Ext;
use stm32g0xx_hal::timer::{Timer, TimerExt};

use crate::hw::sleep_until;
use crate::serial::BitClock;
use crate::wake::TICK;

/// Serial bit clock, one update interrupt per bit period.
pub struct BitTimer {
    timer: Timer<TIM14>,
}

impl BitTimer {
    pub fn new(pac_tim: TIM14, rcc: &mut Rcc) -> Self {
        BitTimer {
            timer: pac_tim.timer(rcc),
        }
    }

    /// Acknowledges the update interrupt, called from the handler.
    pub fn unpend() {
        // Only the handler touches SR while the timer is owned by idle
        let tim = unsafe { &(*TIM14::ptr()) };
        tim.sr.modify(|_, w| w.uif().clear_bit());
    }
}

impl BitClock for BitTimer {
    fn start(&mut self, baud_rate: u32) {
        self.timer.pause();
        self.timer.clear_irq();
        TICK.take();
        self.timer.listen();
        self.timer.start(baud_rate.hz());
    }

    fn wait_tick(&mut self) {
        sleep_until(&TICK);
    }

    fn stop(&mut self) {
        self.timer.unlisten();
        self.timer.pause();
        self.timer.clear_irq();
    }
}
