//! Pixel, line and rectangle rasterization
//!
//! Every primitive validates all of its coordinates first and only then
//! addresses a window and streams pixels, so a rejected call sends nothing.
//! Axis-aligned lines and rectangles use one window for the whole span; a
//! general line has to address each pixel on its own.

// Bresenham runs in i32 so that 2·Δ never overflows for u16 endpoints. Points
// it yields stay between the two endpoints, so narrowing back to u16 is lossless.
#![allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use platform::Transport;

use crate::driver::{DisplayError, Ili9341, LAST_COLUMN, LAST_ROW};

// ---------------------------------------------------------------------------
// Bresenham
// ---------------------------------------------------------------------------

/// Integer line from one point to another, both ends included.
///
/// Yields `max(|Δx|, |Δy|) + 1` points forming an 8-connected path.
#[derive(Debug, Clone)]
pub struct Bresenham {
    x: i32,
    y: i32,
    x_end: i32,
    y_end: i32,
    step_x: i32,
    step_y: i32,
    dx: i32,
    dy: i32,
    /// Decision variable.
    d: i32,
    /// Major axis is y.
    steep: bool,
    done: bool,
}

impl Bresenham {
    /// Line from `start` to `end`, each `(x, y)`.
    pub fn new(start: (u16, u16), end: (u16, u16)) -> Self {
        let (x, y) = (i32::from(start.0), i32::from(start.1));
        let (x_end, y_end) = (i32::from(end.0), i32::from(end.1));

        let dx = (x_end - x).abs();
        let dy = (y_end - y).abs();
        let step_x = if x_end < x { -1 } else { 1 };
        let step_y = if y_end < y { -1 } else { 1 };

        let steep = dy >= dx;
        let d = if steep { dy - 2 * dx } else { 2 * dy - dx };

        Self {
            x,
            y,
            x_end,
            y_end,
            step_x,
            step_y,
            dx,
            dy,
            d,
            steep,
            done: false,
        }
    }

    fn remaining(&self) -> usize {
        if self.done {
            0
        } else if self.steep {
            (self.y_end - self.y).unsigned_abs() as usize + 1
        } else {
            (self.x_end - self.x).unsigned_abs() as usize + 1
        }
    }
}

impl Iterator for Bresenham {
    type Item = (u16, u16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = (self.x as u16, self.y as u16);

        if self.steep {
            if self.y == self.y_end {
                self.done = true;
            } else {
                self.y += self.step_y;
                if self.d <= 0 {
                    self.x += self.step_x;
                    self.d += 2 * self.dy;
                }
                self.d -= 2 * self.dx;
            }
        } else if self.x == self.x_end {
            self.done = true;
        } else {
            self.x += self.step_x;
            if self.d >= 0 {
                self.y += self.step_y;
                self.d -= 2 * self.dx;
            }
            self.d += 2 * self.dy;
        }

        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bresenham {}

impl core::iter::FusedIterator for Bresenham {}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

const fn on_surface(x: u16, y: u16) -> bool {
    x <= LAST_COLUMN && y <= LAST_ROW
}

impl<T: Transport> Ili9341<T> {
    /// Set one pixel.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if `(x, y)` is off the surface.
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), DisplayError> {
        if !on_surface(x, y) {
            debug!("ili9341: pixel ({}, {}) rejected", x, y);
            return Err(DisplayError::OutOfRange);
        }
        self.latch_window(x, y, x, y);
        self.send_color(color, 1);
        Ok(())
    }

    /// Draw a line of any slope, one pixel transaction per point.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if either endpoint is off the surface.
    pub fn draw_line(
        &mut self,
        x1: u16,
        y1: u16,
        x2: u16,
        y2: u16,
        color: u16,
    ) -> Result<(), DisplayError> {
        if !on_surface(x1, y1) || !on_surface(x2, y2) {
            debug!("ili9341: line ({}, {})..({}, {}) rejected", x1, y1, x2, y2);
            return Err(DisplayError::OutOfRange);
        }
        for (x, y) in Bresenham::new((x1, y1), (x2, y2)) {
            self.draw_pixel(x, y, color)?;
        }
        self.transport.commit();
        Ok(())
    }

    /// Draw a horizontal line from `xs` to `xe` (either order) on row `y`,
    /// using one window for the whole span.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if any coordinate is off the surface.
    pub fn draw_hline(&mut self, xs: u16, xe: u16, y: u16, color: u16) -> Result<(), DisplayError> {
        if xs > LAST_COLUMN || xe > LAST_COLUMN || y > LAST_ROW {
            debug!("ili9341: hline {}..{} @ {} rejected", xs, xe, y);
            return Err(DisplayError::OutOfRange);
        }
        let (xs, xe) = if xs > xe { (xe, xs) } else { (xs, xe) };
        self.latch_window(xs, y, xe, y);
        self.send_color(color, u32::from(xe - xs) + 1);
        Ok(())
    }

    /// Draw a vertical line from `ys` to `ye` (either order) in column `x`,
    /// using one window for the whole span.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] if any coordinate is off the surface.
    pub fn draw_vline(&mut self, x: u16, ys: u16, ye: u16, color: u16) -> Result<(), DisplayError> {
        if ys > LAST_ROW || ye > LAST_ROW || x > LAST_COLUMN {
            debug!("ili9341: vline {} @ {}..{} rejected", x, ys, ye);
            return Err(DisplayError::OutOfRange);
        }
        let (ys, ye) = if ys > ye { (ye, ys) } else { (ys, ye) };
        self.latch_window(x, ys, x, ye);
        self.send_color(color, u32::from(ye - ys) + 1);
        Ok(())
    }

    /// Fill the `w × h` rectangle whose top-left corner is `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] for a zero-sized rectangle or one that
    /// leaves the surface.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: u16) -> Result<(), DisplayError> {
        if w == 0 || h == 0 {
            return Err(DisplayError::OutOfRange);
        }
        let xe = x.checked_add(w - 1).ok_or(DisplayError::OutOfRange)?;
        let ye = y.checked_add(h - 1).ok_or(DisplayError::OutOfRange)?;
        self.set_window(x, y, xe, ye)?;
        self.send_color(color, u32::from(w) * u32::from(h));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use platform::mocks::MockPanel;

    use crate::driver::{HEIGHT, WIDTH};

    fn driver() -> Ili9341<MockPanel> {
        Ili9341::new(MockPanel::new(WIDTH, HEIGHT))
    }

    #[test]
    fn shallow_line_points() {
        let pts: Vec<_> = Bresenham::new((0, 0), (5, 2)).collect();
        assert_eq!(pts, vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2), (5, 2)]);
    }

    #[test]
    fn steep_line_points() {
        let pts: Vec<_> = Bresenham::new((0, 0), (2, 5)).collect();
        assert_eq!(pts, vec![(0, 0), (0, 1), (1, 2), (1, 3), (2, 4), (2, 5)]);
    }

    #[test]
    fn reversed_line_runs_backwards() {
        let pts: Vec<_> = Bresenham::new((3, 3), (0, 0)).collect();
        assert_eq!(pts, vec![(3, 3), (2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn degenerate_line_is_one_point() {
        let mut line = Bresenham::new((7, 9), (7, 9));
        assert_eq!(line.len(), 1);
        assert_eq!(line.next(), Some((7, 9)));
        assert_eq!(line.next(), None);
        assert_eq!(line.next(), None);
    }

    #[test]
    fn size_hint_tracks_progress() {
        let mut line = Bresenham::new((0, 0), (10, 3));
        assert_eq!(line.len(), 11);
        line.next();
        line.next();
        assert_eq!(line.len(), 9);
    }

    #[test]
    fn draw_pixel_boundary() {
        let mut lcd = driver();
        assert!(lcd.draw_pixel(239, 319, 0x1234).is_ok());
        assert_eq!(lcd.transport().pixel(239, 319), Some(0x1234));
        lcd.transport_mut().reset();

        assert_eq!(lcd.draw_pixel(240, 0, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.draw_pixel(0, 320, 1), Err(DisplayError::OutOfRange));
        assert!(lcd.transport().events().is_empty());
    }

    #[test]
    fn draw_line_validates_before_drawing() {
        let mut lcd = driver();
        assert_eq!(
            lcd.draw_line(0, 0, 240, 10, 0xFFFF),
            Err(DisplayError::OutOfRange)
        );
        assert!(lcd.transport().events().is_empty());
    }

    #[test]
    fn draw_line_lights_bresenham_points() {
        let mut lcd = driver();
        lcd.draw_line(10, 10, 20, 14, 0xF800).unwrap();
        let panel = lcd.transport();
        let expected: std::collections::BTreeSet<_> =
            Bresenham::new((10, 10), (20, 14)).collect();
        assert_eq!(panel.lit(), expected);
        assert_eq!(panel.window_sets(), 11);
    }

    #[test]
    fn hline_swaps_and_uses_one_window() {
        let mut lcd = driver();
        lcd.draw_hline(50, 10, 7, 0x001F).unwrap();
        let panel = lcd.transport();
        assert_eq!(panel.window_sets(), 1);
        assert_eq!(panel.pixel_writes(), 41);
        assert_eq!(panel.overruns(), 0);
        assert_eq!(panel.pixel(10, 7), Some(0x001F));
        assert_eq!(panel.pixel(50, 7), Some(0x001F));
    }

    #[test]
    fn vline_full_height() {
        let mut lcd = driver();
        lcd.draw_vline(0, 319, 0, 0xFFFF).unwrap();
        let panel = lcd.transport();
        assert_eq!(panel.window_sets(), 1);
        assert_eq!(panel.pixel_writes(), 320);
        assert_eq!(panel.overruns(), 0);
    }

    #[test]
    fn fast_lines_reject_off_surface() {
        let mut lcd = driver();
        assert_eq!(lcd.draw_hline(0, 240, 0, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.draw_hline(0, 10, 320, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.draw_vline(240, 0, 10, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.draw_vline(0, 0, 320, 1), Err(DisplayError::OutOfRange));
        assert!(lcd.transport().events().is_empty());
    }

    #[test]
    fn fill_rect_covers_exactly_the_rectangle() {
        let mut lcd = driver();
        lcd.fill_rect(100, 200, 3, 4, 0x07E0).unwrap();
        let panel = lcd.transport();
        assert_eq!(panel.lit().len(), 12);
        assert!(panel.lit().iter().all(|&(x, y)| (100..103).contains(&x) && (200..204).contains(&y)));
        assert_eq!(panel.overruns(), 0);
    }

    #[test]
    fn fill_rect_rejects() {
        let mut lcd = driver();
        assert_eq!(lcd.fill_rect(0, 0, 0, 5, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.fill_rect(230, 0, 11, 1, 1), Err(DisplayError::OutOfRange));
        assert_eq!(lcd.fill_rect(0, 310, 1, 11, 1), Err(DisplayError::OutOfRange));
        assert!(lcd.transport().events().is_empty());
    }
}
