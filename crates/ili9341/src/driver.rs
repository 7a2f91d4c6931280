//! ILI9341 driver core
//!
//! Owns the transport, the text cursor and the bulk-transfer flag, and
//! implements the three layers every drawing primitive is built on:
//!
//! - **Command protocol**: opcodes in command mode, arguments MSB-first in
//!   data mode, `commit` after every batch.
//! - **Addressing window**: `CASET` / `PASET` with a validated inclusive
//!   rectangle. Nothing is memoised; every primitive re-addresses.
//! - **Pixel stream**: `RAMWR` followed by either one colour repeated or a
//!   caller-owned pattern replayed until the window is full.
//!
//! # Bus ordering
//!
//! After [`Transport::send_pixels`] the transfer may still be running (DMA).
//! The driver remembers that and calls [`Transport::barrier`] before it next
//! touches the DC or CS line, or before it starts another bulk send.

// Geometry is u16 on the wire and u32 when counting pixels. 240 × 320 = 76 800
// fits in u32, and every u16 addition below is preceded by a bounds check
// against LAST_COLUMN / LAST_ROW.
#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use platform::{ChipSelect, DcMode, ResetLevel, Transport};

use crate::command::{Command, INIT_SEQUENCE};
use crate::text::TextCursor;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Surface width in pixels (portrait, `MADCTL = 0x48`).
pub const WIDTH: u16 = 240;

/// Surface height in pixels.
pub const HEIGHT: u16 = 320;

/// Largest valid column index.
pub const LAST_COLUMN: u16 = WIDTH - 1;

/// Largest valid row index.
pub const LAST_ROW: u16 = HEIGHT - 1;

/// Pixels on the whole surface.
pub const PIXEL_COUNT: u32 = WIDTH as u32 * HEIGHT as u32;

/// RESX low pulse. Datasheet minimum is 10 µs.
const RESET_PULSE_US: u32 = 10;

/// Settle time after RESX goes high before the first command.
const RESET_SETTLE_US: u32 = 120_000;

/// Wait after `SLPIN` before the supply can be touched.
const SLEEP_IN_SETTLE_US: u32 = 5_000;

/// Wait after `SLPOUT` before the next command.
const SLEEP_OUT_SETTLE_US: u32 = 120_000;

// ---------------------------------------------------------------------------
// Driver struct
// ---------------------------------------------------------------------------

/// ILI9341 display driver.
///
/// Generic over any [`Transport`]; pass `&mut transport` to keep ownership on
/// the caller's side.
pub struct Ili9341<T> {
    pub(crate) transport: T,
    pub(crate) cursor: TextCursor,
    /// A `send_pixels` run may still be on the bus.
    bulk_in_flight: bool,
}

impl<T> Ili9341<T> {
    /// Wrap a transport. The controller is not touched until [`Self::init`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cursor: TextCursor::default(),
            bulk_in_flight: false,
        }
    }

    /// Give the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    ///
    /// Bytes sent through this bypass the driver's barrier bookkeeping.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport> Ili9341<T> {
    // -----------------------------------------------------------------------
    // Bus helpers
    // -----------------------------------------------------------------------

    /// Wait for an in-flight bulk transfer, if there may be one.
    fn settle_bus(&mut self) {
        if self.bulk_in_flight {
            self.transport.barrier();
            self.bulk_in_flight = false;
        }
    }

    /// DC = data, CS = selected.
    fn select_data(&mut self) {
        self.settle_bus();
        self.transport.dc_pin(DcMode::Data);
        self.transport.cs_pin(ChipSelect::Selected);
    }

    // -----------------------------------------------------------------------
    // Command protocol
    // -----------------------------------------------------------------------

    /// Send one opcode in command mode and commit it.
    pub fn transmit_command(&mut self, cmd: Command) {
        self.settle_bus();
        self.transport.dc_pin(DcMode::Command);
        self.transport.send_byte(cmd.opcode());
        self.transport.commit();
    }

    /// Send one data byte. Not committed.
    pub fn transmit_data_8(&mut self, value: u8) {
        self.select_data();
        self.transport.send_byte(value);
    }

    /// Send a 16-bit data word, most significant byte first. Not committed.
    pub fn transmit_data_16(&mut self, value: u16) {
        self.select_data();
        for byte in value.to_be_bytes() {
            self.transport.send_byte(byte);
        }
    }

    /// Send a 32-bit data word, most significant byte first. Not committed.
    pub fn transmit_data_32(&mut self, value: u32) {
        self.select_data();
        for byte in value.to_be_bytes() {
            self.transport.send_byte(byte);
        }
    }

    /// Pulse the reset line: asserted 10 µs, released, 120 ms settle.
    pub fn hardware_reset(&mut self) {
        self.settle_bus();
        self.transport.reset_pin(ResetLevel::Asserted);
        self.transport.delay_us(RESET_PULSE_US);
        self.transport.reset_pin(ResetLevel::Released);
        self.transport.delay_us(RESET_SETTLE_US);
    }

    /// Reset the controller, replay [`INIT_SEQUENCE`] and address the whole
    /// surface.
    pub fn init(&mut self) {
        info!("ili9341: init, {} commands", INIT_SEQUENCE.len());
        self.hardware_reset();

        for entry in &INIT_SEQUENCE {
            trace!(
                "ili9341: cmd {}, {} args",
                entry.command.opcode(),
                entry.arg_count()
            );
            self.transmit_command(entry.command);
            self.select_data();
            for &arg in entry.args {
                self.transport.send_byte(arg);
            }
            self.transport.commit();
            self.transport.delay_us(u32::from(entry.delay_ms) * 1_000);
        }

        self.latch_window(0, 0, LAST_COLUMN, LAST_ROW);
        debug!("ili9341: init done");
    }

    // -----------------------------------------------------------------------
    // Addressing window
    // -----------------------------------------------------------------------

    /// Program `CASET` / `PASET`. Callers have already validated the rectangle.
    pub(crate) fn latch_window(&mut self, xs: u16, ys: u16, xe: u16, ye: u16) {
        self.transmit_command(Command::ColumnAddressSet);
        self.transmit_data_32((u32::from(xs) << 16) | u32::from(xe));
        self.transport.commit();

        self.transmit_command(Command::PageAddressSet);
        self.transmit_data_32((u32::from(ys) << 16) | u32::from(ye));
        self.transport.commit();
    }

    /// Address the inclusive rectangle `(xs, ys)..=(xe, ye)`.
    ///
    /// Following pixel writes fill it row by row until it is exhausted or
    /// re-addressed.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if the rectangle is inverted or leaves
    /// the surface. Nothing is sent in that case.
    pub fn set_window(&mut self, xs: u16, ys: u16, xe: u16, ye: u16) -> Result<(), DisplayError> {
        if xs > xe || ys > ye || xe > LAST_COLUMN || ye > LAST_ROW {
            debug!("ili9341: window ({}, {})..({}, {}) rejected", xs, ys, xe, ye);
            return Err(DisplayError::OutOfRange);
        }
        self.latch_window(xs, ys, xe, ye);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pixel stream
    // -----------------------------------------------------------------------

    /// Stream `color` `count` times into the current window.
    pub fn send_color(&mut self, color: u16, count: u32) {
        self.transmit_command(Command::MemoryWrite);
        self.select_data();
        for _ in 0..count {
            self.transport.send_pixel(color);
        }
        self.transport.commit();
    }

    /// Fill the `w × h` rectangle at `(x, y)` by replaying `pattern` until
    /// `w * h` pixels have been written.
    ///
    /// The pattern is handed to [`Transport::send_pixels`] as-is, so a small
    /// repeating tile (a dither, a pre-rendered glyph cell) can cover a large
    /// area without a full-size buffer.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] for an empty pattern, a zero-sized
    /// rectangle, or one that leaves the surface.
    pub fn write_pattern(
        &mut self,
        pattern: &[u16],
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) -> Result<(), DisplayError> {
        if pattern.is_empty() || w == 0 || h == 0 {
            return Err(DisplayError::OutOfRange);
        }
        let xe = x.checked_add(w - 1).ok_or(DisplayError::OutOfRange)?;
        let ye = y.checked_add(h - 1).ok_or(DisplayError::OutOfRange)?;
        self.set_window(x, y, xe, ye)?;

        self.transmit_command(Command::MemoryWrite);
        self.select_data();

        let run = u32::try_from(pattern.len()).unwrap_or(u32::MAX);
        let mut remaining = u32::from(w) * u32::from(h);
        while remaining > 0 {
            let n = remaining.min(run);
            // n <= pattern.len() by construction.
            let Some(chunk) = pattern.get(..n as usize) else {
                break;
            };
            self.settle_bus();
            self.transport.send_pixels(chunk);
            self.bulk_in_flight = true;
            remaining -= n;
        }
        self.transport.commit();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Screen-level operations
    // -----------------------------------------------------------------------

    /// Fill the whole surface with `color`: one window set, 76 800 pixels.
    pub fn clear_screen(&mut self, color: u16) {
        self.latch_window(0, 0, LAST_COLUMN, LAST_ROW);
        self.send_color(color, PIXEL_COUNT);
    }

    /// Invert every pixel on the panel (`DINVON`). GRAM is untouched.
    pub fn invert_screen(&mut self) {
        self.transmit_command(Command::InversionOn);
    }

    /// Undo [`Self::invert_screen`] (`DINVOFF`).
    pub fn normal_screen(&mut self) {
        self.transmit_command(Command::InversionOff);
    }

    /// Show GRAM on the panel (`DISPON`).
    pub fn update_screen(&mut self) {
        self.transmit_command(Command::DisplayOn);
    }

    /// Blank the panel (`DISPOFF`). GRAM keeps its content.
    pub fn display_off(&mut self) {
        self.transmit_command(Command::DisplayOff);
    }

    /// Enter sleep mode (`SLPIN`) and wait for the controller to settle.
    pub fn sleep(&mut self) {
        debug!("ili9341: sleep in");
        self.transmit_command(Command::SleepIn);
        self.transport.delay_us(SLEEP_IN_SETTLE_US);
    }

    /// Leave sleep mode (`SLPOUT`) and wait for the controller to settle.
    pub fn wake(&mut self) {
        debug!("ili9341: sleep out");
        self.transmit_command(Command::SleepOut);
        self.transport.delay_us(SLEEP_OUT_SETTLE_US);
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors returned by the ILI9341 driver.
///
/// Always detected before any bus traffic for the call, so a failed call has
/// no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Coordinate or rectangle outside the surface, character outside
    /// printable ASCII, or a buffer too small for the declared geometry.
    OutOfRange,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "Argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    use platform::mocks::{Event, MockPanel, MockWindow};

    fn driver() -> Ili9341<MockPanel> {
        Ili9341::new(MockPanel::new(WIDTH, HEIGHT))
    }

    #[test]
    fn hardware_reset_timing() {
        let mut lcd = driver();
        lcd.hardware_reset();
        assert_eq!(
            lcd.transport().events(),
            &[
                Event::Reset(ResetLevel::Asserted),
                Event::Delay(10),
                Event::Reset(ResetLevel::Released),
                Event::Delay(120_000),
            ]
        );
    }

    #[test]
    fn init_replays_table_then_addresses_full_surface() {
        let mut lcd = driver();
        lcd.init();
        let panel = lcd.transport();

        let mut expected: Vec<u8> = INIT_SEQUENCE.iter().map(|c| c.command.opcode()).collect();
        expected.extend([0x2A, 0x2B]);
        assert_eq!(panel.commands(), expected);

        let delays: Vec<u32> = panel
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Delay(us) => Some(*us),
                _ => None,
            })
            .collect();
        // reset pulse + settle, then one delay per table entry
        assert_eq!(delays.len(), 2 + INIT_SEQUENCE.len());
        assert_eq!(delays[2], 50_000);
        assert_eq!(delays[delays.len() - 2], 150_000);
        assert_eq!(delays[delays.len() - 1], 200_000);

        assert_eq!(
            panel.window(),
            Some(MockWindow {
                x_start: 0,
                y_start: 0,
                x_end: 239,
                y_end: 319
            })
        );
    }

    #[test]
    fn init_sends_every_argument_byte() {
        let mut lcd = driver();
        lcd.init();
        let data = lcd.transport().data_bytes();
        let args: Vec<u8> = INIT_SEQUENCE.iter().flat_map(|c| c.args.iter().copied()).collect();
        assert_eq!(&data[..args.len()], args.as_slice());
        // full-surface window after the table
        assert_eq!(&data[args.len()..], &[0, 0, 0, 239, 0, 0, 0x01, 0x3F]);
    }

    #[test]
    fn command_is_committed() {
        let mut lcd = driver();
        lcd.transmit_command(Command::DisplayOn);
        assert_eq!(
            lcd.transport().events(),
            &[Event::Dc(DcMode::Command), Event::Byte(0x29), Event::Commit]
        );
    }

    #[test]
    fn data_words_are_msb_first_and_uncommitted() {
        let mut lcd = driver();
        lcd.transmit_data_16(0xABCD);
        lcd.transmit_data_32(0x0102_0304);
        let panel = lcd.transport();
        assert_eq!(panel.data_bytes(), vec![0xAB, 0xCD, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(panel.count(|e| *e == Event::Commit), 0);
        assert_eq!(panel.count(|e| *e == Event::Cs(ChipSelect::Selected)), 2);
    }

    #[test]
    fn set_window_encodes_start_and_end() {
        let mut lcd = driver();
        lcd.set_window(10, 300, 20, 310).unwrap();
        let panel = lcd.transport();
        assert_eq!(panel.commands(), vec![0x2A, 0x2B]);
        assert_eq!(
            panel.data_bytes(),
            vec![0x00, 10, 0x00, 20, 0x01, 0x2C, 0x01, 0x36]
        );
        assert_eq!(panel.window_sets(), 1);
    }

    #[test]
    fn set_window_rejects_without_side_effects() {
        let mut lcd = driver();
        assert_eq!(lcd.set_window(5, 0, 4, 0), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.set_window(0, 5, 0, 4), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.set_window(0, 0, 240, 0), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.set_window(0, 0, 0, 320), Err(DisplayError::OutOfRange));
        assert!(lcd.transport().events().is_empty());
    }

    #[test]
    fn set_window_accepts_last_index() {
        let mut lcd = driver();
        assert!(lcd.set_window(239, 319, 239, 319).is_ok());
    }

    #[test]
    fn send_color_streams_count_pixels() {
        let mut lcd = driver();
        lcd.set_window(0, 0, 3, 2).unwrap();
        lcd.send_color(0x07E0, 12);
        let panel = lcd.transport();
        assert_eq!(panel.pixel_writes(), 12);
        assert_eq!(panel.overruns(), 0);
        assert_eq!(panel.window_sets(), 1);
        assert_eq!(panel.pixel(3, 2), Some(0x07E0));
    }

    #[test]
    fn write_pattern_replays_cyclically() {
        let mut lcd = driver();
        lcd.write_pattern(&[1, 2, 3], 10, 10, 4, 2).unwrap();
        let panel = lcd.transport();
        let row0: Vec<_> = (10..14).map(|x| panel.pixel(x, 10).unwrap()).collect();
        let row1: Vec<_> = (10..14).map(|x| panel.pixel(x, 11).unwrap()).collect();
        assert_eq!(row0, vec![1, 2, 3, 1]);
        assert_eq!(row1, vec![2, 3, 1, 2]);
        assert_eq!(panel.count(|e| matches!(e, Event::Bulk(3))), 2);
        assert_eq!(panel.count(|e| matches!(e, Event::Bulk(2))), 1);
        assert_eq!(panel.overruns(), 0);
    }

    #[test]
    fn barrier_precedes_control_line_change_after_bulk() {
        let mut lcd = driver();
        lcd.write_pattern(&[0xFFFF; 4], 0, 0, 2, 2).unwrap();
        lcd.invert_screen();
        let events = lcd.transport().events();
        let bulk = events.iter().position(|e| *e == Event::Bulk(4)).unwrap();
        let tail = &events[bulk + 1..];
        assert_eq!(
            tail,
            &[
                Event::Commit,
                Event::Barrier,
                Event::Dc(DcMode::Command),
                Event::Byte(0x21),
                Event::Commit,
            ]
        );
    }

    #[test]
    fn consecutive_bulk_runs_are_fenced() {
        let mut lcd = driver();
        lcd.write_pattern(&[0; 2], 0, 0, 3, 1).unwrap();
        let events = lcd.transport().events();
        let first = events.iter().position(|e| *e == Event::Bulk(2)).unwrap();
        assert_eq!(events[first + 1], Event::Barrier);
        assert_eq!(events[first + 2], Event::Bulk(1));
    }

    #[test]
    fn write_pattern_rejects_bad_geometry() {
        let mut lcd = driver();
        assert_eq!(lcd.write_pattern(&[], 0, 0, 1, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.write_pattern(&[1], 0, 0, 0, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.write_pattern(&[1], 0, 0, 1, 0), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.write_pattern(&[1], 239, 0, 2, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.write_pattern(&[1], 0, u16::MAX, 1, 2), Err(DisplayError::OutOfRange));
        assert!(lcd.transport().events().is_empty());
    }

    #[test]
    fn clear_screen_is_one_window_and_every_pixel() {
        let mut lcd = driver();
        lcd.clear_screen(0xFFFF);
        let panel = lcd.transport();
        assert_eq!(panel.window_sets(), 1);
        assert_eq!(panel.pixel_writes(), PIXEL_COUNT as usize);
        assert_eq!(panel.count(|e| *e == Event::Pixel(0xFFFF)), PIXEL_COUNT as usize);
        assert_eq!(panel.overruns(), 0);
    }

    #[test]
    fn screen_mode_opcodes() {
        let mut lcd = driver();
        lcd.invert_screen();
        lcd.normal_screen();
        lcd.update_screen();
        lcd.display_off();
        assert_eq!(lcd.transport().commands(), vec![0x21, 0x20, 0x29, 0x28]);
    }

    #[test]
    fn sleep_and_wake_wait_for_controller() {
        let mut lcd = driver();
        lcd.sleep();
        lcd.wake();
        let panel = lcd.transport();
        assert_eq!(panel.commands(), vec![0x10, 0x11]);
        assert_eq!(panel.count(|e| *e == Event::Delay(5_000)), 1);
        assert_eq!(panel.count(|e| *e == Event::Delay(120_000)), 1);
    }

    #[test]
    fn borrowed_transport_is_returned_intact() {
        let mut panel = MockPanel::new(WIDTH, HEIGHT);
        {
            let mut lcd = Ili9341::new(&mut panel);
            lcd.update_screen();
        }
        assert_eq!(panel.commands(), vec![0x29]);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            std::format!("{}", DisplayError::OutOfRange),
            "Argument out of range"
        );
    }
}
