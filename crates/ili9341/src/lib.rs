//! Transport-agnostic ILI9341 TFT driver
//!
//! Turns drawing requests (pixels, lines, rectangles, glyphs, bitmaps) into
//! the command / address / data stream an ILI9341 240×320 RGB565 controller
//! expects. No frame buffer is kept: the controller's own GRAM is the surface,
//! and every primitive addresses its own window before streaming pixels.
//!
//! # Layers
//!
//! ```text
//! raster / text / graphics   (pixels, lines, rects, glyphs, DrawTarget)
//!         ↓
//! driver                     (window engine, pixel stream, command protocol)
//!         ↓
//! platform::Transport        (SpiInterface, MockPanel, your backend)
//! ```
//!
//! [`bitmap`] is a pure memory transform that feeds
//! [`Ili9341::write_pattern`]; it never touches the transport.
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`DisplayError`], enables platform mocks
//! - `defmt`: log through `defmt` and derive `defmt::Format`
//! - `tracing`: log through `tracing` (host builds)
//!
//! # Example
//!
//! ```
//! use ili9341::{color, Ili9341, TextScale};
//! use platform::NullTransport;
//!
//! let mut lcd = Ili9341::new(NullTransport);
//! lcd.init();
//! lcd.clear_screen(color::BLACK);
//! lcd.draw_line(0, 0, 239, 319, color::WHITE).ok();
//! lcd.draw_string("Hello", color::GREEN, TextScale::Single);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

pub mod bitmap;
pub mod color;
pub mod command;
pub mod driver;
pub mod font;
pub mod graphics;
pub mod interface;
pub mod raster;
pub mod text;

pub use bitmap::{
    render_bitmap, render_bitmap_col_major, render_scaled_bitmap, render_scaled_bitmap_col_major,
    BitLayout, Bitmap,
};
pub use command::{Command, InitCommand, INIT_SEQUENCE};
pub use driver::{DisplayError, Ili9341, HEIGHT, LAST_COLUMN, LAST_ROW, PIXEL_COUNT, WIDTH};
pub use interface::{InterfaceFault, NoPin, SpiInterface};
pub use raster::Bresenham;
pub use text::{TextCursor, TextScale};
