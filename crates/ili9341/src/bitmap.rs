//! 1 bit-per-pixel bitmap expansion
//!
//! Pure memory transforms: a packed monochrome bitmap goes in, a row-major
//! RGB565 buffer comes out, ready for [`crate::Ili9341::write_pattern`].
//! Nothing here touches the transport.
//!
//! # Packing
//!
//! Bit `n` of the linear bit sequence is bit `n % 8` (LSB first) of byte
//! `n / 8`. The sequence advances along a row first ([`BitLayout::RowMajor`])
//! or down a column first ([`BitLayout::ColumnMajor`]). A 5×8 font glyph,
//! five column bytes with the top row in bit 0, is therefore a valid
//! column-major bitmap.

// Offsets are computed in usize from u16 geometry: w * h <= 65 535² fits in
// usize on every target with >= 32-bit pointers, and the scaled source index
// dx * src_w / dst_w is < src_w because dx < dst_w.
#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use crate::driver::DisplayError;

/// Order of the linear bit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitLayout {
    /// Bit offset `row * width + col`.
    RowMajor,
    /// Bit offset `col * height + row`.
    ColumnMajor,
}

/// Borrowed view of a packed 1bpp bitmap.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    bits: &'a [u8],
    width: u16,
    height: u16,
    layout: BitLayout,
}

impl<'a> Bitmap<'a> {
    /// Wrap `bits` as a `width × height` bitmap.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] for zero-sized geometry or if `bits`
    /// holds fewer than `width * height` bits.
    pub fn new(bits: &'a [u8], width: u16, height: u16, layout: BitLayout) -> Result<Self, DisplayError> {
        let needed = usize::from(width) * usize::from(height);
        if needed == 0 || bits.len() < needed.div_ceil(8) {
            return Err(DisplayError::OutOfRange);
        }
        Ok(Self {
            bits,
            width,
            height,
            layout,
        })
    }

    /// Row-major bitmap.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn row_major(bits: &'a [u8], width: u16, height: u16) -> Result<Self, DisplayError> {
        Self::new(bits, width, height, BitLayout::RowMajor)
    }

    /// Column-major bitmap.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn column_major(bits: &'a [u8], width: u16, height: u16) -> Result<Self, DisplayError> {
        Self::new(bits, width, height, BitLayout::ColumnMajor)
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bit order.
    pub fn layout(&self) -> BitLayout {
        self.layout
    }

    /// Whether the pixel at `(col, row)` is set. Off-bitmap reads are unset.
    pub fn get(&self, col: u16, row: u16) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        let offset = match self.layout {
            BitLayout::RowMajor => usize::from(row) * usize::from(self.width) + usize::from(col),
            BitLayout::ColumnMajor => usize::from(col) * usize::from(self.height) + usize::from(row),
        };
        self.bit(offset)
    }

    fn bit(&self, n: usize) -> bool {
        self.bits
            .get(n / 8)
            .is_some_and(|&byte| (byte >> (n % 8)) & 1 != 0)
    }

    /// `(col, row)` of linear bit `n`.
    fn position(&self, n: usize) -> (usize, usize) {
        match self.layout {
            BitLayout::RowMajor => (n % usize::from(self.width), n / usize::from(self.width)),
            BitLayout::ColumnMajor => (n / usize::from(self.height), n % usize::from(self.height)),
        }
    }

    /// Expand into `dst`, a row-major `dst_w × dst_h` RGB565 buffer, scaling
    /// with nearest-neighbour sampling when the sizes differ.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfRange`] for zero-sized output or a `dst` shorter
    /// than `dst_w * dst_h`. `dst` is untouched in that case.
    pub fn render_into(
        &self,
        dst: &mut [u16],
        dst_w: u16,
        dst_h: u16,
        fg: u16,
        bg: u16,
    ) -> Result<(), DisplayError> {
        let cells = usize::from(dst_w) * usize::from(dst_h);
        if cells == 0 || dst.len() < cells {
            return Err(DisplayError::OutOfRange);
        }

        if dst_w == self.width && dst_h == self.height {
            // Identity: walk the source bits in storage order.
            let stride = usize::from(self.width);
            for n in 0..cells {
                let (col, row) = self.position(n);
                if let Some(px) = dst.get_mut(row * stride + col) {
                    *px = if self.bit(n) { fg } else { bg };
                }
            }
            return Ok(());
        }

        let (src_w, src_h) = (u32::from(self.width), u32::from(self.height));
        let (out_w, out_h) = (u32::from(dst_w), u32::from(dst_h));
        for (dy, row) in dst.chunks_exact_mut(usize::from(dst_w)).take(usize::from(dst_h)).enumerate() {
            let sy = (dy as u32 * src_h / out_h) as u16;
            for (dx, px) in row.iter_mut().enumerate() {
                let sx = (dx as u32 * src_w / out_w) as u16;
                *px = if self.get(sx, sy) { fg } else { bg };
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Free-function entry points
// ---------------------------------------------------------------------------

/// Expand a row-major `w × h` bitmap into `dst` without scaling.
///
/// # Errors
///
/// [`DisplayError::OutOfRange`] if either buffer is too small for `w × h` or
/// the geometry is zero-sized.
pub fn render_bitmap(dst: &mut [u16], bits: &[u8], w: u16, h: u16, fg: u16, bg: u16) -> Result<(), DisplayError> {
    Bitmap::row_major(bits, w, h)?.render_into(dst, w, h, fg, bg)
}

/// Column-major counterpart of [`render_bitmap`].
///
/// # Errors
///
/// See [`render_bitmap`].
pub fn render_bitmap_col_major(
    dst: &mut [u16],
    bits: &[u8],
    w: u16,
    h: u16,
    fg: u16,
    bg: u16,
) -> Result<(), DisplayError> {
    Bitmap::column_major(bits, w, h)?.render_into(dst, w, h, fg, bg)
}

/// Expand a row-major `src_w × src_h` bitmap into a `dst_w × dst_h` buffer,
/// nearest-neighbour scaled.
///
/// # Errors
///
/// [`DisplayError::OutOfRange`] if a buffer is too small for its declared
/// geometry or any dimension is zero.
#[allow(clippy::too_many_arguments)]
pub fn render_scaled_bitmap(
    dst: &mut [u16],
    dst_w: u16,
    dst_h: u16,
    src: &[u8],
    src_w: u16,
    src_h: u16,
    fg: u16,
    bg: u16,
) -> Result<(), DisplayError> {
    Bitmap::row_major(src, src_w, src_h)?.render_into(dst, dst_w, dst_h, fg, bg)
}

/// Column-major counterpart of [`render_scaled_bitmap`].
///
/// # Errors
///
/// See [`render_scaled_bitmap`].
#[allow(clippy::too_many_arguments)]
pub fn render_scaled_bitmap_col_major(
    dst: &mut [u16],
    dst_w: u16,
    dst_h: u16,
    src: &[u8],
    src_w: u16,
    src_h: u16,
    fg: u16,
    bg: u16,
) -> Result<(), DisplayError> {
    Bitmap::column_major(src, src_w, src_h)?.render_into(dst, dst_w, dst_h, fg, bg)
}
