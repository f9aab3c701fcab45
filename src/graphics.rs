//! Graphics support via embedded-graphics
//!
//! [`Framebuffer`] implements [`DrawTarget`] for [`Rgb565`], so every
//! embedded-graphics primitive, font and image can be rendered into it.
//! Drawing only touches memory; flush the dirty region to the panel
//! afterwards.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics::{
//!     pixelcolor::Rgb565,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use badge_bsp::{Dimensions, Framebuffer, Region};
//!
//! let dims = match Dimensions::new(240, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let Some(mut fb) = Framebuffer::new(dims) else {
//!     return;
//! };
//! fb.take_dirty();
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::BLUE))
//!     .draw(&mut fb);
//!
//! assert_eq!(fb.dirty(), Some(Region::new(10, 10, 59, 39)));
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb565,
    prelude::Pixel,
};

use crate::color::Color;
use crate::framebuffer::Framebuffer;

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        let dims = self.dimensions();
        Size::new(u32::from(dims.width), u32::from(dims.height))
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            // set_pixel drops coordinates past the panel edge
            self.set_pixel(x, y, Color::from(color));
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(Color::from(color));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;
    use crate::display::Region;
    use embedded_graphics::{
        pixelcolor::RgbColor,
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
    };

    fn framebuffer() -> Framebuffer {
        let mut fb = Framebuffer::new(Dimensions::new(32, 16).unwrap()).unwrap();
        fb.take_dirty();
        fb
    }

    #[test]
    fn test_size_matches_dimensions() {
        assert_eq!(framebuffer().size(), Size::new(32, 16));
    }

    #[test]
    fn test_draw_rectangle_marks_dirty() {
        let mut fb = framebuffer();
        Rectangle::new(Point::new(2, 3), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.pixel(2, 3), Some(Color::RED));
        assert_eq!(fb.pixel(5, 4), Some(Color::RED));
        assert_eq!(fb.pixel(6, 4), Some(Color::BLACK));
        assert_eq!(fb.dirty(), Some(Region::new(2, 3, 5, 4)));
    }

    #[test]
    fn test_draw_clips_to_panel() {
        let mut fb = framebuffer();
        Line::new(Point::new(-5, 0), Point::new(40, 0))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::GREEN, 1))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.pixel(0, 0), Some(Color::GREEN));
        assert_eq!(fb.pixel(31, 0), Some(Color::GREEN));
        assert_eq!(fb.dirty(), Some(Region::new(0, 0, 31, 0)));
    }

    #[test]
    fn test_clear_fills_panel() {
        let mut fb = framebuffer();
        fb.clear(Rgb565::WHITE).unwrap();
        assert_eq!(fb.pixel(31, 15), Some(Color::WHITE));
        assert_eq!(fb.dirty(), Some(Region::new(0, 0, 31, 15)));
    }
}
