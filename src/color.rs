//! 16-bit panel colors
//!
//! The panel runs in 65K color mode: one pixel is a 5-6-5 bit red, green
//! and blue word sent most significant byte first.
//!
//! | Bits  | 15..11 | 10..5 | 4..0 |
//! |-------|--------|-------|------|
//! | Field | Red    | Green | Blue |
//!
//! ## Example
//!
//! ```
//! use badge_bsp::Color;
//!
//! assert_eq!(Color::from_rgb888(0xFF, 0x00, 0x00), Color::RED);
//! assert_eq!(Color::from_rgb888_hex(0x325aa8).raw(), 0x32D5);
//! assert_eq!(Color::WHITE.to_be_bytes(), [0xFF, 0xFF]);
//! ```

/// One RGB565 pixel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(u16);

impl Color {
    /// Black
    pub const BLACK: Self = Self(0x0000);
    /// White
    pub const WHITE: Self = Self(0xFFFF);
    /// Full red
    pub const RED: Self = Self(0xF800);
    /// Full green
    pub const GREEN: Self = Self(0x07E0);
    /// Full blue
    pub const BLUE: Self = Self(0x001F);

    /// Wrap a raw RGB565 word
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Truncate 8-bit channels to 5-6-5
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Convert a `0xRRGGBB` literal
    pub const fn from_rgb888_hex(rgb: u32) -> Self {
        Self::from_rgb888((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Raw RGB565 word
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Bytes in panel order
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Read back from panel order
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb565> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::Rgb565) -> Self {
        use embedded_graphics_core::pixelcolor::raw::{RawData, RawU16};
        Self(RawU16::from(color).into_inner())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::Rgb565 {
    fn from(color: Color) -> Self {
        use embedded_graphics_core::pixelcolor::raw::RawU16;
        RawU16::new(color.0).into()
    }
}
