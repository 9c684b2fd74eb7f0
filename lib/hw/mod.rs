mod bus;
mod helper;
mod timers;
mod watchdog;

pub use bus::DouBus;
pub use helper::*;
pub use timers::BitTimer;
pub use watchdog::IndependentWatchdog;
