//! Hardware Abstraction Layer (HAL) for raster display controllers
//!
//! This crate provides the transport contract a display driver core is
//! written against, so the core can be developed and tested without any
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (pixels, lines, text, bitmaps)
//!         ↓
//! Display driver core (ili9341 crate)
//!         ↓
//! Platform HAL (this crate - Transport trait)
//!         ↓
//! Bus backend (embedded-hal SPI, 8080 parallel GPIO, DMA, mock)
//! ```
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable `defmt::Format` derives
//!
//! # Example
//!
//! ```
//! use platform::{DcMode, Transport};
//!
//! fn send_opcode<T: Transport>(bus: &mut T, opcode: u8) {
//!     bus.dc_pin(DcMode::Command);
//!     bus.send_byte(opcode);
//!     bus.commit();
//! }
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
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![allow(clippy::must_use_candidate)] // accessors; callers decide
#![allow(clippy::module_name_repetitions)]

pub mod gpio;
pub mod mocks;
pub mod transport;

// Re-export main types
pub use gpio::{ChipSelect, DcMode, PinState, ResetLevel};
pub use transport::{NullTransport, Transport};
