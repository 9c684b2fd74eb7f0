#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", no_std)]

// The firmware only exists for the MCU; host builds run the library tests.
#[cfg(not(target_os = "none"))]
fn main() {}

#[cfg(target_os = "none")]
#[rtic::app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        acquisition: lib::hw::HwAcquisition,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        use lib::hw::{init_clock, BitTimer, HwBus, IndependentWatchdog};
        use lib::instrument::Instrument;
        use lib::serial::SerialTx;
        use lib::Dou;
        use stm32g0xx_hal::gpio::GpioExt;
        use stm32g0xx_hal::prelude::OutputPin;

        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        // Watchdog first, a hang during setup must reset too
        let watchdog = IndependentWatchdog::new(device.IWDG, Dou::WATCHDOG_TIMEOUT_MS);

        // Clock
        let mut rcc = init_clock(device.RCC);

        // Serial
        let gpioa = device.GPIOA.split(&mut rcc);
        let mut tx = gpioa.pa2.into_push_pull_output();
        tx.set_high().ok();
        let serial = SerialTx::new(BitTimer::new(device.TIM14, &mut rcc), tx);

        // DOU bus
        let bus = HwBus::new(device.GPIOB, device.EXTI, Dou::wiring(), &mut rcc);

        defmt::info!("{=str} tap ready", Dou::NAME);

        init::LateResources {
            acquisition: lib::hw::HwAcquisition::new(bus, watchdog, serial),
        }
    }

    #[idle(resources = [acquisition])]
    fn idle(cx: idle::Context) -> ! {
        let acquisition: &mut lib::hw::HwAcquisition = cx.resources.acquisition;

        loop {
            if acquisition.cycle().is_err() {
                let stats = acquisition.stats();
                defmt::warn!(
                    "{=u32} readings sent, {=u32} sweeps aborted",
                    stats.completed,
                    stats.aborted
                );
            }
        }
    }

    #[task(binds = EXTI0_1)]
    fn exti0_1(_: exti0_1::Context) {
        lib::hw::HwBus::unpend();
        lib::wake::STROBE.wake();
    }

    #[task(binds = EXTI2_3)]
    fn exti2_3(_: exti2_3::Context) {
        lib::hw::HwBus::unpend();
        lib::wake::STROBE.wake();
    }

    #[task(binds = EXTI4_15)]
    fn exti4_15(_: exti4_15::Context) {
        lib::hw::HwBus::unpend();
        lib::wake::STROBE.wake();
    }

    #[task(binds = TIM14)]
    fn tim14(_: tim14::Context) {
        lib::hw::BitTimer::unpend();
        lib::wake::TICK.wake();
    }
};
