use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{EXTI, GPIOB, RCC};

use crate::hw::sleep_until;
use crate::sampler::{self, Bus, Wire};
use crate::signals::SignalSet;
use crate::wake::STROBE;

// EXTICR port selection, one byte per line
const PORT_B: u32 = 0x0101_0101;

/// The DOU bus on GPIOB, waking the core through EXTI lines 0..15.
pub struct DouBus<S: 'static> {
    gpio: GPIOB,
    exti: EXTI,
    wiring: &'static [Wire<S>],
}

impl<S> DouBus<S>
where
    S: SignalSet,
{
    pub fn new(gpio: GPIOB, exti: EXTI, wiring: &'static [Wire<S>], rcc: &mut Rcc) -> Self {
        DouBus::<S>::enable_clock_and_reset(rcc);
        let mut bus = DouBus { gpio, exti, wiring };
        bus.configure();
        bus
    }

    /// Acknowledges all pending bus edges, called from the handlers.
    pub fn unpend() {
        let exti = unsafe { &(*EXTI::ptr()) };
        exti.rpr1.write(|w| unsafe { w.bits(0xffff) });
        exti.fpr1.write(|w| unsafe { w.bits(0xffff) });
    }

    fn configure(&mut self) {
        // All pins are floating inputs
        self.gpio.moder.write(|w| unsafe { w.bits(0) });
        self.gpio.pupdr.write(|w| unsafe { w.bits(0) });

        let (rising, falling) = sampler::edges(self.wiring);
        self.exti.imr1.modify(|r, w| unsafe { w.bits(r.bits() & !0xffff) });
        self.exti.exticr1.write(|w| unsafe { w.bits(PORT_B) });
        self.exti.exticr2.write(|w| unsafe { w.bits(PORT_B) });
        self.exti.exticr3.write(|w| unsafe { w.bits(PORT_B) });
        self.exti.exticr4.write(|w| unsafe { w.bits(PORT_B) });
        self.exti.rtsr1.write(|w| unsafe { w.bits(rising as u32) });
        self.exti.ftsr1.write(|w| unsafe { w.bits(falling as u32) });
        DouBus::<S>::unpend();
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.iopenr.modify(|_, w| w.iopben().set_bit());
        rcc.ioprstr.modify(|_, w| w.iopbrst().set_bit());
        rcc.ioprstr.modify(|_, w| w.iopbrst().clear_bit());
    }
}

impl<S> Bus for DouBus<S>
where
    S: SignalSet,
{
    type Signals = S;

    fn arm(&mut self, sources: S) {
        let lines = sampler::pins(sources, self.wiring) as u32;
        self.exti
            .imr1
            .modify(|r, w| unsafe { w.bits(r.bits() & !0xffff | lines) });
    }

    fn disarm(&mut self) {
        self.exti
            .imr1
            .modify(|r, w| unsafe { w.bits(r.bits() & !0xffff) });
        STROBE.take();
    }

    fn wait(&mut self) {
        sleep_until(&STROBE);
    }

    fn sample(&mut self) -> S {
        sampler::pack(self.gpio.idr.read().bits() as u16, self.wiring)
    }
}
