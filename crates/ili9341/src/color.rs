//! RGB565 helpers
//!
//! The driver passes colours around as raw `u16`: 5 bits red, 6 bits green,
//! 5 bits blue, red in the top bits. On the wire the high byte goes first.

// Shifts and masks stay within 16 bits by construction.
#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::IntoStorage;

/// Pack 5-bit red, 6-bit green and 5-bit blue. Extra high bits are dropped.
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0x1F) << 11) | ((g as u16 & 0x3F) << 5) | (b as u16 & 0x1F)
}

/// Red component, 0..=31.
pub const fn red(color: u16) -> u8 {
    ((color >> 11) & 0x1F) as u8
}

/// Green component, 0..=63.
pub const fn green(color: u16) -> u8 {
    ((color >> 5) & 0x3F) as u8
}

/// Blue component, 0..=31.
pub const fn blue(color: u16) -> u8 {
    (color & 0x1F) as u8
}

/// Wire order: high byte first.
pub const fn to_be_bytes(color: u16) -> [u8; 2] {
    color.to_be_bytes()
}

/// Raw value of an `embedded-graphics` colour.
pub fn from_embedded(color: Rgb565) -> u16 {
    color.into_storage()
}

/// `embedded-graphics` colour from a raw value.
pub fn to_embedded(color: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(color))
}

/// 0x0000
pub const BLACK: u16 = 0x0000;
/// 0xFFFF
pub const WHITE: u16 = 0xFFFF;
/// Full red.
pub const RED: u16 = rgb565(31, 0, 0);
/// Full green.
pub const GREEN: u16 = rgb565(0, 63, 0);
/// Full blue.
pub const BLUE: u16 = rgb565(0, 0, 31);
/// Red + green.
pub const YELLOW: u16 = rgb565(31, 63, 0);
/// Green + blue.
pub const CYAN: u16 = rgb565(0, 63, 31);
/// Red + blue.
pub const MAGENTA: u16 = rgb565(31, 0, 31);
/// Half intensity on every channel.
pub const GRAY: u16 = rgb565(15, 31, 15);
