//! Text rendering with the built-in 5×8 font
//!
//! The driver keeps one text cursor, in pixels, that every character draw
//! advances. Strings wrap to column 2 of the next text line when the next
//! glyph would cross the right edge; a glyph that would cross both the right
//! and the bottom edge is dropped and the rest of the string still runs.
//!
//! [`Ili9341::draw_string`] sets pixels one at a time and never touches the
//! background. [`Ili9341::draw_string_fast`] pre-renders each character cell,
//! background included, and sends it with one window.

// Cursor maths is u16 with saturating adds; glyph pixel positions are
// computed in u32 and clipped to the surface before narrowing.
#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use platform::Transport;

use crate::bitmap::render_scaled_bitmap_col_major;
use crate::driver::{DisplayError, Ili9341, HEIGHT, LAST_COLUMN, LAST_ROW, WIDTH};
use crate::font::{self, GLYPH_COLUMNS, GLYPH_ROWS};

/// Column the cursor snaps to when a string wraps.
const WRAP_COLUMN: u16 = 2;

/// Largest glyph image (10 × 16, [`TextScale::Double`]).
const GLYPH_BUF: usize = 160;

/// Largest character cell (12 × 16, [`TextScale::Double`]).
const CELL_BUF: usize = 192;

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

/// Glyph magnification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextScale {
    /// 5×8, advance 6.
    #[default]
    Single,
    /// 5×16 (rows doubled), advance 7.
    Tall,
    /// 10×16 (rows and columns doubled), advance 12.
    Double,
}

impl TextScale {
    /// Cursor advance after one character.
    pub const fn advance(self) -> u16 {
        match self {
            Self::Single => 6,
            Self::Tall => 7,
            Self::Double => 12,
        }
    }

    /// Width of the glyph image.
    pub const fn glyph_width(self) -> u16 {
        GLYPH_COLUMNS * self.x_factor()
    }

    /// Height of the glyph image, and of one text line.
    pub const fn glyph_height(self) -> u16 {
        GLYPH_ROWS * self.y_factor()
    }

    /// Width added to the cursor column to decide whether the next glyph
    /// still fits on the current line.
    pub const fn wrap_probe(self) -> u16 {
        match self {
            Self::Single | Self::Tall => 5,
            Self::Double => 6,
        }
    }

    const fn x_factor(self) -> u16 {
        match self {
            Self::Single | Self::Tall => 1,
            Self::Double => 2,
        }
    }

    const fn y_factor(self) -> u16 {
        match self {
            Self::Single => 1,
            Self::Tall | Self::Double => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Text cursor, in pixels. Top-left corner of the next glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextCursor {
    /// Column.
    pub col: u16,
    /// Row.
    pub row: u16,
}

impl TextCursor {
    /// Cursor at `(col, row)`.
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Apply the line-wrap rule for a glyph of `scale` at this position.
    ///
    /// Returns `false` if the glyph fits neither horizontally nor vertically
    /// and must be skipped.
    fn wrap_for(&mut self, scale: TextScale) -> bool {
        let new_x = self.col.saturating_add(scale.wrap_probe());
        let line = scale.glyph_height();
        let new_y = self.row.saturating_add(line);
        let max_y = LAST_ROW - line;

        if new_x > LAST_COLUMN {
            if new_y > max_y {
                return false;
            }
            self.row = new_y;
            self.col = WRAP_COLUMN;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Driver operations
// ---------------------------------------------------------------------------

impl<T> Ili9341<T> {
    /// Current text cursor.
    pub fn cursor(&self) -> TextCursor {
        self.cursor
    }
}

impl<T: Transport> Ili9341<T> {
    /// Move the text cursor.
    ///
    /// A column past the right edge with a valid row snaps to column 2 of
    /// that row.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if both `x` and `y` are off the surface.
    pub fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        if x > LAST_COLUMN && y > LAST_ROW {
            debug!("ili9341: cursor ({}, {}) rejected", x, y);
            return Err(DisplayError::OutOfRange);
        }
        self.cursor = if x > LAST_COLUMN {
            TextCursor::new(WRAP_COLUMN, y)
        } else {
            TextCursor::new(x, y)
        };
        Ok(())
    }

    /// Draw one character at the cursor and advance it by
    /// [`TextScale::advance`].
    ///
    /// Only foreground pixels are written. Pixels that fall off the surface
    /// are clipped.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if `code` is outside `0x20..=0x7E`.
    pub fn draw_char(&mut self, code: u8, color: u16, scale: TextScale) -> Result<(), DisplayError> {
        let columns = font::glyph(code).ok_or(DisplayError::OutOfRange)?;
        let origin = self.cursor;
        let (xf, yf) = (scale.x_factor(), scale.y_factor());

        for col in 0..GLYPH_COLUMNS {
            for row in 0..GLYPH_ROWS {
                if !font::is_set(columns, col, row) {
                    continue;
                }
                for i in 0..xf {
                    for j in 0..yf {
                        let x = u32::from(origin.col) + u32::from(col * xf + i);
                        let y = u32::from(origin.row) + u32::from(row * yf + j);
                        self.plot_clipped(x, y, color);
                    }
                }
            }
        }

        self.cursor.col = origin.col.saturating_add(scale.advance());
        Ok(())
    }

    /// Draw `text` from the cursor, pixel by pixel, wrapping at the right
    /// edge.
    ///
    /// Bytes outside printable ASCII are skipped before the wrap check, so
    /// they never move the cursor.
    pub fn draw_string(&mut self, text: &str, color: u16, scale: TextScale) {
        for code in text.bytes() {
            if font::glyph(code).is_none() {
                debug!("ili9341: unprintable byte {}", code);
                continue;
            }
            if !self.cursor.wrap_for(scale) {
                debug!("ili9341: glyph {} dropped at ({}, {})", code, self.cursor.col, self.cursor.row);
                continue;
            }
            let drawn = self.draw_char(code, color, scale);
            debug_assert!(drawn.is_ok(), "printable byte rejected");
        }
    }

    /// Draw `text` from the cursor, one window per character cell.
    ///
    /// Each cell (glyph plus spacing column, background filled) is rendered
    /// into a stack buffer and sent with [`Self::write_pattern`], which
    /// avoids the DC toggling of per-pixel drawing. Wrapping follows
    /// [`Self::draw_string`]; cells are clipped at the surface edge.
    pub fn draw_string_fast(&mut self, text: &str, fg: u16, bg: u16, scale: TextScale) {
        let mut glyph_px = [0u16; GLYPH_BUF];
        let mut cell = [0u16; CELL_BUF];

        for code in text.bytes() {
            let Some(columns) = font::glyph(code) else {
                debug!("ili9341: unprintable byte {}", code);
                continue;
            };
            if !self.cursor.wrap_for(scale) {
                debug!("ili9341: glyph {} dropped at ({}, {})", code, self.cursor.col, self.cursor.row);
                continue;
            }

            let (gw, gh) = (scale.glyph_width(), scale.glyph_height());
            if render_scaled_bitmap_col_major(&mut glyph_px, gw, gh, columns, GLYPH_COLUMNS, GLYPH_ROWS, fg, bg)
                .is_err()
            {
                continue;
            }

            let origin = self.cursor;
            let w = scale.advance().min(WIDTH.saturating_sub(origin.col));
            let h = gh.min(HEIGHT.saturating_sub(origin.row));
            if w > 0 && h > 0 {
                let (w_px, gw_px) = (usize::from(w), usize::from(gw));
                for row in 0..usize::from(h) {
                    for col in 0..w_px {
                        let px = if col < gw_px {
                            glyph_px.get(row * gw_px + col).copied().unwrap_or(bg)
                        } else {
                            bg
                        };
                        if let Some(slot) = cell.get_mut(row * w_px + col) {
                            *slot = px;
                        }
                    }
                }
                let len = w_px * usize::from(h);
                if let Some(pattern) = cell.get(..len) {
                    let written = self.write_pattern(pattern, origin.col, origin.row, w, h);
                    debug_assert!(written.is_ok(), "clipped cell left the surface");
                }
            }

            self.cursor.col = origin.col.saturating_add(scale.advance());
        }
    }

    fn plot_clipped(&mut self, x: u32, y: u32, color: u16) {
        if x <= u32::from(LAST_COLUMN) && y <= u32::from(LAST_ROW) {
            let drawn = self.draw_pixel(x as u16, y as u16, color);
            debug_assert!(drawn.is_ok(), "clipped pixel left the surface");
        }
    }
}
