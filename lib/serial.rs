use embedded_hal::digital::v2::OutputPin;

use crate::error::{Error, Result};

// The whole line must go out within the ~100 ms between two display updates.
pub const SERIAL_BAUD_RATE: u32 = 19_200;
pub const SERIAL_DATA_BITS: u32 = 7;

const STOP_BIT: u16 = 1 << (SERIAL_DATA_BITS + 1);
// start + data + stop
const FRAME_BITS: u32 = SERIAL_DATA_BITS + 2;

/// Periodic tick at the bit rate.
pub trait BitClock {
    fn start(&mut self, baud_rate: u32);
    /// Sleeps until the next bit period starts.
    fn wait_tick(&mut self);
    fn stop(&mut self);
}

/// Bit pattern of one character, sent LSB first: start bit, data bits and
/// stop bit.
pub fn frame(c: u8) -> u16 {
    let data = c as u16 & ((1 << SERIAL_DATA_BITS) - 1);
    //         make space for the start bit --vv
    STOP_BIT | data << 1
}

/// Bit banged asynchronous serial output.
pub struct SerialTx<C, P> {
    clock: C,
    tx: P,
}

impl<C, P> SerialTx<C, P>
where
    C: BitClock,
    P: OutputPin,
{
    pub fn new(clock: C, tx: P) -> Self {
        SerialTx { clock, tx }
    }

    /// Blocks until all of `text` has been shifted out.
    pub fn transmit(&mut self, text: &[u8]) -> Result<(), P::Error> {
        // leftovers of an earlier transmission must not matter
        self.tx.set_high().map_err(Error::Pin)?;
        self.clock.start(SERIAL_BAUD_RATE);

        let sent = self.shift_out(text);
        // the last stop bit needs its full bit period
        self.clock.wait_tick();
        self.clock.stop();
        sent
    }

    fn shift_out(&mut self, text: &[u8]) -> Result<(), P::Error> {
        for &c in text {
            let mut bits = frame(c);
            for _ in 0..FRAME_BITS {
                self.clock.wait_tick();
                if bits & 1 != 0 {
                    self.tx.set_high().map_err(Error::Pin)?;
                } else {
                    self.tx.set_low().map_err(Error::Pin)?;
                }
                bits >>= 1;
            }
        }
        Ok(())
    }
}
