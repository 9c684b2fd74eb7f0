/// Resets the device unless fed in time.
pub trait Watchdog {
    fn feed(&mut self);
}

// LSI clock of the independent watchdog, in ticks per millisecond
const LSI_KHZ: u32 = 32;
const MAX_RELOAD: u32 = 0x0fff;
const MAX_PRESCALER: u8 = 6;

/// Prescaler and reload register values for a watchdog window.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Timing {
    /// Divides the LSI clock by `4 << prescaler`.
    pub prescaler: u8,
    pub reload: u16,
}

impl Timing {
    /// Finest resolution that still fits `timeout_ms`, saturating at the
    /// longest window the hardware supports.
    pub fn for_timeout(timeout_ms: u32) -> Self {
        let ticks = timeout_ms.saturating_mul(LSI_KHZ).max(4);
        let mut prescaler = 0;
        while prescaler < MAX_PRESCALER && ticks / (4 << prescaler) > MAX_RELOAD + 1 {
            prescaler += 1;
        }
        let reload = (ticks / (4 << prescaler)).min(MAX_RELOAD + 1) - 1;
        Timing {
            prescaler,
            reload: reload as u16,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        (self.reload as u32 + 1) * (4 << self.prescaler) / LSI_KHZ
    }
}
