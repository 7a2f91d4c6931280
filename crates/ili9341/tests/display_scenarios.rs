//! End-to-end driver scenarios against the recording panel mock.
//!
//! Each test drives the public API only and checks what reached the wire:
//! command order, window programming and the resulting pixel map.

#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ili9341::{
    color, font, render_bitmap_col_major, Command, DisplayError, Ili9341, TextCursor, TextScale,
    HEIGHT, INIT_SEQUENCE, PIXEL_COUNT, WIDTH,
};
use platform::mocks::{Event, MockPanel};
use platform::ResetLevel;

fn driver() -> Ili9341<MockPanel> {
    Ili9341::new(MockPanel::new(WIDTH, HEIGHT))
}

#[test]
fn init_replays_sequence_then_addresses_full_surface() {
    let mut lcd = driver();
    lcd.init();
    let panel = lcd.transport();

    let mut expected: Vec<u8> = INIT_SEQUENCE.iter().map(|c| c.command.opcode()).collect();
    expected.extend([Command::ColumnAddressSet.opcode(), Command::PageAddressSet.opcode()]);
    assert_eq!(panel.commands(), expected);

    // Reset pulse comes first.
    assert_eq!(
        &panel.events()[..2],
        &[Event::Reset(ResetLevel::Asserted), Event::Delay(10)]
    );
    // One delay per table entry on top of the two reset delays.
    assert_eq!(
        panel.count(|e| matches!(e, Event::Delay(_))),
        2 + INIT_SEQUENCE.len()
    );
    assert!(panel.events().contains(&Event::Delay(150_000)));

    let window = panel.window().unwrap();
    assert_eq!((window.x_start, window.y_start), (0, 0));
    assert_eq!((window.x_end, window.y_end), (239, 319));
}

#[test]
fn clear_screen_is_one_window_of_every_pixel() {
    let mut lcd = driver();
    lcd.clear_screen(0xFFFF);
    let panel = lcd.transport();
    assert_eq!(panel.window_sets(), 1);
    assert_eq!(panel.pixel_writes(), PIXEL_COUNT as usize);
    assert_eq!(panel.overruns(), 0);
    assert!(panel.pixel_map().values().all(|&c| c == 0xFFFF));
    assert_eq!(panel.pixel(239, 319), Some(0xFFFF));
}

#[test]
fn last_pixel_is_accepted_and_next_is_silent() {
    let mut lcd = driver();
    lcd.draw_pixel(239, 319, color::RED).unwrap();
    assert_eq!(lcd.transport().pixel(239, 319), Some(0xF800));

    lcd.transport_mut().clear_events();
    assert_eq!(lcd.draw_pixel(240, 0, color::RED), Err(DisplayError::OutOfRange));
    assert_eq!(lcd.draw_pixel(0, 320, color::RED), Err(DisplayError::OutOfRange));
    assert_eq!(lcd.draw_line(0, 0, 240, 10, color::RED), Err(DisplayError::OutOfRange));
    assert_eq!(lcd.set_window(10, 0, 9, 5), Err(DisplayError::OutOfRange));
    assert!(lcd.transport().events().is_empty());
}

#[test]
fn text_then_window_status() {
    let mut lcd = driver();
    lcd.set_cursor(0, 0).unwrap();
    lcd.draw_string("Hi", color::WHITE, TextScale::Single);
    assert_eq!(lcd.cursor(), TextCursor::new(12, 0));

    // Both glyphs land where the font says.
    let mut expected = BTreeSet::new();
    for (i, code) in (0u16..).zip([b'H', b'i']) {
        let columns = font::glyph(code).unwrap();
        for col in 0..5u16 {
            for row in 0..8u16 {
                if font::is_set(columns, col, row) {
                    expected.insert((i * 6 + col, row));
                }
            }
        }
    }
    assert_eq!(lcd.transport().lit(), expected);
}

#[test]
fn rendered_glyph_matches_direct_text() {
    // Pre-render 'A' as a column-major bitmap and blit it.
    let columns = font::glyph(b'A').unwrap();
    let mut cell = [0u16; 5 * 8];
    render_bitmap_col_major(&mut cell, columns, 5, 8, color::WHITE, color::BLACK).unwrap();
    let mut blitted = driver();
    blitted.write_pattern(&cell, 40, 40, 5, 8).unwrap();

    let mut drawn = driver();
    drawn.set_cursor(40, 40).unwrap();
    drawn.draw_char(b'A', color::WHITE, TextScale::Single).unwrap();

    let fg: BTreeSet<_> = blitted
        .transport()
        .pixel_map()
        .iter()
        .filter(|(_, &c)| c == color::WHITE)
        .map(|(&p, _)| p)
        .collect();
    assert_eq!(fg, drawn.transport().lit());
}

#[test]
fn pattern_tile_repeats_across_window() {
    let mut lcd = driver();
    lcd.write_pattern(&[1, 2, 3], 0, 0, 4, 2).unwrap();
    let panel = lcd.transport();
    assert_eq!(panel.pixel_writes(), 8);
    assert_eq!(panel.overruns(), 0);
    let row0: Vec<_> = (0..4).map(|x| panel.pixel(x, 0).unwrap()).collect();
    let row1: Vec<_> = (0..4).map(|x| panel.pixel(x, 1).unwrap()).collect();
    assert_eq!(row0, [1, 2, 3, 1]);
    assert_eq!(row1, [2, 3, 1, 2]);
    // A barrier separates consecutive bulk sends.
    assert_eq!(panel.count(|e| matches!(e, Event::Bulk(_))), 3);
    assert!(panel.count(|e| *e == Event::Barrier) >= 2);
}

#[test]
fn panel_state_commands() {
    let mut lcd = driver();
    lcd.invert_screen();
    lcd.normal_screen();
    lcd.display_off();
    lcd.update_screen();
    lcd.sleep();
    lcd.wake();
    assert_eq!(
        lcd.transport().commands(),
        [0x21, 0x20, 0x28, 0x29, 0x10, 0x11]
    );
    assert!(lcd.transport().lit().is_empty());
}

#[test]
fn embedded_graphics_text_draws_in_bounds() {
    let mut lcd = driver();
    let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
    Text::new("status: ok", Point::new(230, 8), style)
        .draw(&mut lcd)
        .unwrap();
    let panel = lcd.transport();
    assert!(!panel.lit().is_empty());
    assert!(panel.lit().iter().all(|&(x, y)| x <= 239 && y <= 319));
    assert_eq!(panel.overruns(), 0);
}
