//! `embedded-hal` SPI transport
//!
//! [`SpiInterface`] implements [`Transport`] over a blocking
//! [`SpiDevice`], a D/CX [`OutputPin`], a RESX [`OutputPin`] and a
//! [`DelayNs`]. Chip select belongs to the `SpiDevice`, so
//! [`Transport::cs_pin`] stays a no-op here.
//!
//! # Wiring
//!
//! | Signal | Direction      | Notes                         |
//! |--------|----------------|-------------------------------|
//! | SCK    | Host → Display | up to 10 MHz write cycle      |
//! | MOSI   | Host → Display |                               |
//! | CS     | Host → Display | managed by `SpiDevice`        |
//! | D/CX   | Host → Display | low = command, high = data    |
//! | RESX   | Host → Display | active low; [`NoPin`] if tied |
//!
//! # Batching
//!
//! Bytes and pixels are collected in a `heapless::Vec<u8, N>` and written as
//! one SPI transaction on `commit`, when the batch fills, before the D/CX
//! line changes and before a delay. The `Transport` contract has no error
//! channel, so the first bus or pin failure is latched and can be collected
//! with [`SpiInterface::take_fault`].

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::SpiDevice;
use heapless::Vec;

use platform::{DcMode, PinState, ResetLevel, Transport};

/// Default batch size in bytes.
pub const DEFAULT_BATCH: usize = 64;

/// Failure latched by [`SpiInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceFault {
    /// An SPI transaction failed.
    Spi,
    /// Driving D/CX or RESX failed.
    Gpio,
}

impl core::fmt::Display for InterfaceFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi => write!(f, "SPI communication error"),
            Self::Gpio => write!(f, "GPIO error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InterfaceFault {}

/// Placeholder for a RESX line that is tied high on the board.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// ILI9341 4-wire SPI transport.
pub struct SpiInterface<SPI, DC, RST, DELAY, const N: usize = DEFAULT_BATCH> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: DELAY,
    batch: Vec<u8, N>,
    fault: Option<InterfaceFault>,
}

impl<SPI, DC, RST, DELAY, const N: usize> SpiInterface<SPI, DC, RST, DELAY, N>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Build the transport. Nothing is driven until the first call.
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            spi,
            dc,
            rst,
            delay,
            batch: Vec::new(),
            fault: None,
        }
    }

    /// First failure since the last call, if any. Clears the latch.
    pub fn take_fault(&mut self) -> Option<InterfaceFault> {
        self.fault.take()
    }

    /// Give back the bus, pins and delay. Unflushed bytes are dropped.
    pub fn release(self) -> (SPI, DC, RST, DELAY) {
        (self.spi, self.dc, self.rst, self.delay)
    }

    fn latch(&mut self, fault: InterfaceFault) {
        warn!("ili9341: interface fault {}", fault as u8);
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }

    fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let result = self.spi.write(&self.batch);
        self.batch.clear();
        if result.is_err() {
            self.latch(InterfaceFault::Spi);
        }
    }

    fn push(&mut self, byte: u8) {
        if self.batch.push(byte).is_ok() {
            return;
        }
        self.flush();
        if self.batch.push(byte).is_err() && self.spi.write(&[byte]).is_err() {
            // N == 0: no batching at all.
            self.latch(InterfaceFault::Spi);
        }
    }

    fn drive<P: OutputPin>(pin: &mut P, state: PinState) -> Result<(), P::Error> {
        match state {
            PinState::High => pin.set_high(),
            PinState::Low => pin.set_low(),
        }
    }
}

impl<SPI, DC, RST, DELAY, const N: usize> Transport for SpiInterface<SPI, DC, RST, DELAY, N>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn reset_pin(&mut self, level: ResetLevel) {
        self.flush();
        if Self::drive(&mut self.rst, level.active_low()).is_err() {
            self.latch(InterfaceFault::Gpio);
        }
    }

    fn dc_pin(&mut self, mode: DcMode) {
        self.flush();
        if Self::drive(&mut self.dc, mode.pin_state()).is_err() {
            self.latch(InterfaceFault::Gpio);
        }
    }

    fn delay_us(&mut self, us: u32) {
        self.flush();
        self.delay.delay_us(us);
    }

    fn send_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    fn send_pixel(&mut self, color: u16) {
        let [hi, lo] = color.to_be_bytes();
        self.push(hi);
        self.push(lo);
    }

    fn commit(&mut self) {
        self.flush();
    }
}
