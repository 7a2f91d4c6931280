//! Hardware transport abstraction
//!
//! The display core never touches pins or a bus directly. Everything it needs
//! from the hardware goes through [`Transport`]: three control lines, a delay
//! source, byte and pixel sends, and two synchronisation points.
//!
//! Every method has a no-op default body. A backend that has no reset line,
//! or whose sends are blocking and therefore need no barrier, simply leaves
//! those methods out; the core keeps working.
//!
//! # Ordering contract
//!
//! - `send_byte` / `send_pixel` may be buffered by the backend. Bytes are only
//!   guaranteed to have reached the controller after [`Transport::commit`].
//! - `send_pixels` may be serviced asynchronously (e.g. by DMA). The core calls
//!   [`Transport::barrier`] before it changes the DC or CS line after a bulk
//!   send, so a transfer is never cut off mid-flight.

use crate::gpio::{ChipSelect, DcMode, ResetLevel};

/// Capability set the display core drives.
pub trait Transport {
    /// Drive the controller's reset line.
    fn reset_pin(&mut self, _level: ResetLevel) {}

    /// Select whether following bytes are a command or data.
    fn dc_pin(&mut self, _mode: DcMode) {}

    /// Drive the chip-select line.
    fn cs_pin(&mut self, _state: ChipSelect) {}

    /// Busy-wait or sleep for at least `us` microseconds.
    fn delay_us(&mut self, _us: u32) {}

    /// Queue one byte for the bus.
    fn send_byte(&mut self, _byte: u8) {}

    /// Queue one RGB565 pixel, most-significant byte first on the wire.
    fn send_pixel(&mut self, _color: u16) {}

    /// Queue a run of RGB565 pixels.
    ///
    /// Backends with a DMA engine override this and may return before the
    /// transfer completes; [`Transport::barrier`] then blocks until it has.
    fn send_pixels(&mut self, pixels: &[u16]) {
        for &color in pixels {
            self.send_pixel(color);
        }
    }

    /// Flush everything queued so far to the controller.
    fn commit(&mut self) {}

    /// Block until any in-flight asynchronous transfer has finished.
    fn barrier(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn reset_pin(&mut self, level: ResetLevel) {
        (**self).reset_pin(level);
    }

    fn dc_pin(&mut self, mode: DcMode) {
        (**self).dc_pin(mode);
    }

    fn cs_pin(&mut self, state: ChipSelect) {
        (**self).cs_pin(state);
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }

    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte);
    }

    fn send_pixel(&mut self, color: u16) {
        (**self).send_pixel(color);
    }

    fn send_pixels(&mut self, pixels: &[u16]) {
        (**self).send_pixels(pixels);
    }

    fn commit(&mut self) {
        (**self).commit();
    }

    fn barrier(&mut self) {
        (**self).barrier();
    }
}

/// A transport with no capabilities at all.
///
/// Useful for dry runs: every drawing call validates its arguments and then
/// goes nowhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {}
