//! Application-owned pixel buffer
//!
//! A full-panel RGB565 buffer laid out exactly as [`Display::write_partial`]
//! expects it: row-major, two bytes per pixel, big-endian. Pixel writes grow
//! a dirty rectangle so only the changed part of the panel is flushed.
//!
//! [`Display::write_partial`]: crate::Display::write_partial

use alloc::vec::Vec;

use crate::color::Color;
use crate::config::Dimensions;
use crate::display::Region;

/// Full-panel pixel buffer with dirty-region tracking
pub struct Framebuffer {
    dimensions: Dimensions,
    pixels: Vec<u8>,
    dirty: Option<Region>,
}

impl Framebuffer {
    /// Allocate a black buffer for `dimensions`
    ///
    /// Returns `None` if the allocation fails. The whole buffer starts dirty.
    pub fn new(dimensions: Dimensions) -> Option<Self> {
        let size = dimensions.buffer_size();
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(size).ok()?;
        pixels.resize(size, 0);
        Some(Self {
            dimensions,
            pixels,
            dirty: Some(Region::full(dimensions)),
        })
    }

    /// Buffer dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Raw bytes, ready for [`Display::write`](crate::Display::write)
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Paint every pixel
    pub fn fill(&mut self, color: Color) {
        let bytes = color.to_be_bytes();
        for pixel in self.pixels.chunks_exact_mut(2) {
            pixel.copy_from_slice(&bytes);
        }
        self.dirty = Some(Region::full(self.dimensions));
    }

    /// Paint one pixel; coordinates off the panel are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        self.pixels[index..index + 2].copy_from_slice(&color.to_be_bytes());
        self.mark_dirty(Region::point(x, y));
    }

    /// Read one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        let index = self.index(x, y)?;
        Some(Color::from_be_bytes([
            self.pixels[index],
            self.pixels[index + 1],
        ]))
    }

    /// Grow the dirty rectangle to cover `region`
    pub fn mark_dirty(&mut self, region: Region) {
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&region),
            None => region,
        });
    }

    /// Current dirty rectangle
    pub fn dirty(&self) -> Option<Region> {
        self.dirty
    }

    /// Return and reset the dirty rectangle
    pub fn take_dirty(&mut self) -> Option<Region> {
        self.dirty.take()
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        Some((usize::from(y) * usize::from(self.dimensions.width) + usize::from(x)) * 2)
    }
}
