//! `embedded-graphics` integration
//!
//! Lets `embedded-graphics` primitives, text and images draw straight onto the
//! controller. Off-surface pixels are skipped, as the `DrawTarget` contract
//! requires; solid fills are clipped and sent as one window.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use platform::Transport;

use crate::driver::{DisplayError, Ili9341, HEIGHT, LAST_COLUMN, LAST_ROW, WIDTH};

impl<T> OriginDimensions for Ili9341<T> {
    fn size(&self) -> Size {
        Size::new(u32::from(WIDTH), u32::from(HEIGHT))
    }
}

impl<T: Transport> DrawTarget for Ili9341<T> {
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if x > LAST_COLUMN || y > LAST_ROW {
                continue;
            }
            self.draw_pixel(x, y, color.into_storage())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        let x = u16::try_from(area.top_left.x).map_err(|_| DisplayError::OutOfRange)?;
        let y = u16::try_from(area.top_left.y).map_err(|_| DisplayError::OutOfRange)?;
        let w = u16::try_from(area.size.width).map_err(|_| DisplayError::OutOfRange)?;
        let h = u16::try_from(area.size.height).map_err(|_| DisplayError::OutOfRange)?;
        self.fill_rect(x, y, w, h, color.into_storage())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_screen(color.into_storage());
        Ok(())
    }
}
