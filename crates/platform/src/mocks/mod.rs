//! Mock implementations for testing
//!
//! [`MockPanel`] is a [`Transport`] that records every call it receives and
//! decodes the MIPI-DCS subset a raster controller driver uses to stream
//! pixels (column address set, page address set, memory write) into a sparse
//! pixel map. Tests can then assert on the exact call sequence, on which
//! pixels were lit, or both.

#![cfg(any(test, feature = "std"))]

use std::collections::{BTreeMap, BTreeSet};
use std::vec::Vec;

use crate::gpio::{ChipSelect, DcMode, ResetLevel};
use crate::transport::Transport;

/// Column address set.
const CASET: u8 = 0x2A;
/// Page (row) address set.
const PASET: u8 = 0x2B;
/// Memory write.
const RAMWR: u8 = 0x2C;

/// One recorded transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `reset_pin`
    Reset(ResetLevel),
    /// `dc_pin`
    Dc(DcMode),
    /// `cs_pin`
    Cs(ChipSelect),
    /// `delay_us`
    Delay(u32),
    /// `send_byte`
    Byte(u8),
    /// `send_pixel`
    Pixel(u16),
    /// `send_pixels`, with the number of pixels in the run
    Bulk(usize),
    /// `commit`
    Commit,
    /// `barrier`
    Barrier,
}

/// Addressing window latched by the mock, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockWindow {
    /// First column
    pub x_start: u16,
    /// First row
    pub y_start: u16,
    /// Last column
    pub x_end: u16,
    /// Last row
    pub y_end: u16,
}

/// Recording, decoding mock of a raster display controller.
#[derive(Debug)]
pub struct MockPanel {
    width: u16,
    height: u16,
    events: Vec<Event>,
    dc: DcMode,
    command: Option<u8>,
    args: Vec<u8>,
    columns: (u16, u16),
    window: Option<MockWindow>,
    write_pos: Option<(u16, u16)>,
    high_byte: Option<u8>,
    pixels: BTreeMap<(u16, u16), u16>,
    pixel_writes: usize,
    overruns: usize,
    stray_pixels: usize,
    window_sets: usize,
}

impl MockPanel {
    /// Create a mock panel with the given surface size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            events: Vec::new(),
            dc: DcMode::Command,
            command: None,
            args: Vec::new(),
            columns: (0, 0),
            window: None,
            write_pos: None,
            high_byte: None,
            pixels: BTreeMap::new(),
            pixel_writes: 0,
            overruns: 0,
            stray_pixels: 0,
            window_sets: 0,
        }
    }

    /// Surface width the mock was created with.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Surface height the mock was created with.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Every call received so far, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// Opcodes sent while the DC line was in command mode, in order.
    pub fn commands(&self) -> Vec<u8> {
        let mut dc = DcMode::Command;
        let mut out = Vec::new();
        for event in &self.events {
            match *event {
                Event::Dc(mode) => dc = mode,
                Event::Byte(b) if dc == DcMode::Command => out.push(b),
                _ => {}
            }
        }
        out
    }

    /// Bytes sent while the DC line was in data mode, in order.
    pub fn data_bytes(&self) -> Vec<u8> {
        let mut dc = DcMode::Command;
        let mut out = Vec::new();
        for event in &self.events {
            match *event {
                Event::Dc(mode) => dc = mode,
                Event::Byte(b) if dc == DcMode::Data => out.push(b),
                _ => {}
            }
        }
        out
    }

    /// Color last written to `(x, y)`, if any.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        self.pixels.get(&(x, y)).copied()
    }

    /// All written pixels.
    pub fn pixel_map(&self) -> &BTreeMap<(u16, u16), u16> {
        &self.pixels
    }

    /// Coordinates of every written pixel.
    pub fn lit(&self) -> BTreeSet<(u16, u16)> {
        self.pixels.keys().copied().collect()
    }

    /// Pixels that landed inside an addressing window.
    pub fn pixel_writes(&self) -> usize {
        self.pixel_writes
    }

    /// Pixels streamed after the window was already full.
    pub fn overruns(&self) -> usize {
        self.overruns
    }

    /// Pixels sent outside a memory-write transaction.
    pub fn stray_pixels(&self) -> usize {
        self.stray_pixels
    }

    /// Number of completed page-address sets (one per window set).
    pub fn window_sets(&self) -> usize {
        self.window_sets
    }

    /// Window currently latched.
    pub fn window(&self) -> Option<MockWindow> {
        self.window
    }

    /// Forget recorded events and counters but keep the pixel map.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.pixel_writes = 0;
        self.overruns = 0;
        self.stray_pixels = 0;
        self.window_sets = 0;
    }

    /// Forget everything, including the pixel map.
    pub fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
    }

    fn be16(hi: u8, lo: u8) -> u16 {
        u16::from_be_bytes([hi, lo])
    }

    fn take_range(&self) -> Option<(u16, u16)> {
        match self.args.as_slice() {
            [a, b, c, d] => Some((Self::be16(*a, *b), Self::be16(*c, *d))),
            _ => None,
        }
    }

    fn on_command(&mut self, opcode: u8) {
        self.command = Some(opcode);
        self.args.clear();
        self.high_byte = None;
        if opcode == RAMWR {
            self.write_pos = self.window.map(|w| (w.x_start, w.y_start));
        }
    }

    fn on_data(&mut self, byte: u8) {
        match self.command {
            Some(CASET) => {
                self.args.push(byte);
                if let Some(range) = self.take_range() {
                    self.columns = range;
                }
            }
            Some(PASET) => {
                self.args.push(byte);
                if let Some((y_start, y_end)) = self.take_range() {
                    self.window = Some(MockWindow {
                        x_start: self.columns.0,
                        y_start,
                        x_end: self.columns.1,
                        y_end,
                    });
                    self.window_sets = self.window_sets.saturating_add(1);
                }
            }
            Some(RAMWR) => match self.high_byte.take() {
                Some(hi) => self.write_pixel(Self::be16(hi, byte)),
                None => self.high_byte = Some(byte),
            },
            _ => {}
        }
    }

    fn write_pixel(&mut self, color: u16) {
        if self.command != Some(RAMWR) || self.dc != DcMode::Data {
            self.stray_pixels = self.stray_pixels.saturating_add(1);
            return;
        }
        let (Some(window), Some((x, y))) = (self.window, self.write_pos) else {
            self.stray_pixels = self.stray_pixels.saturating_add(1);
            return;
        };
        if y > window.y_end {
            self.overruns = self.overruns.saturating_add(1);
            return;
        }
        self.pixels.insert((x, y), color);
        self.pixel_writes = self.pixel_writes.saturating_add(1);
        self.write_pos = if x >= window.x_end {
            Some((window.x_start, y.saturating_add(1)))
        } else {
            Some((x.saturating_add(1), y))
        };
    }
}

impl Transport for MockPanel {
    fn reset_pin(&mut self, level: ResetLevel) {
        self.events.push(Event::Reset(level));
    }

    fn dc_pin(&mut self, mode: DcMode) {
        self.events.push(Event::Dc(mode));
        self.dc = mode;
    }

    fn cs_pin(&mut self, state: ChipSelect) {
        self.events.push(Event::Cs(state));
    }

    fn delay_us(&mut self, us: u32) {
        self.events.push(Event::Delay(us));
    }

    fn send_byte(&mut self, byte: u8) {
        self.events.push(Event::Byte(byte));
        match self.dc {
            DcMode::Command => self.on_command(byte),
            DcMode::Data => self.on_data(byte),
        }
    }

    fn send_pixel(&mut self, color: u16) {
        self.events.push(Event::Pixel(color));
        self.write_pixel(color);
    }

    fn send_pixels(&mut self, pixels: &[u16]) {
        self.events.push(Event::Bulk(pixels.len()));
        for &color in pixels {
            self.write_pixel(color);
        }
    }

    fn commit(&mut self) {
        self.events.push(Event::Commit);
    }

    fn barrier(&mut self) {
        self.events.push(Event::Barrier);
    }
}
