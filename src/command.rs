//! ST7789V command definitions
//!
//! This module defines the command bytes used to control the ST7789V LCD
//! controller. Commands are sent with the D/C line low, their parameters
//! with the D/C line high.
//!
//! ## Command Structure
//!
//! All commands follow the pattern:
//! 1. Set D/C low (command mode)
//! 2. Assert CS, send the command byte, deassert CS
//! 3. Set D/C high (data mode)
//! 4. Assert CS, send the parameter bytes (if any), deassert CS
//!
//! ## Example
//!
//! ```rust,no_run
//! use badge_bsp::{command, DisplayInterface, NoResetPin, SpiInterface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # let mut interface = SpiInterface::new(MockSpi, MockPin, NoResetPin);
//! let _ = interface.attach();
//!
//! // 16 bits per pixel
//! let _ = interface.send_command(command::COLMOD);
//! let _ = interface.send_data(&[command::COLMOD_16BPP]);
//! ```

// System control commands

/// Software reset command (0x01)
///
/// Resets registers to their defaults. The panel needs 5ms before the next
/// command and 120ms before sleep-out.
pub const SWRESET: u8 = 0x01;

/// Sleep in command (0x10)
///
/// Enters minimum power consumption mode. The panel stops scanning and
/// the DC/DC converter is off.
pub const SLPIN: u8 = 0x10;

/// Sleep out command (0x11)
///
/// Leaves sleep mode. The panel needs a short settle time before
/// accepting pixel data.
pub const SLPOUT: u8 = 0x11;

/// Partial mode on command (0x12)
pub const PTLON: u8 = 0x12;

/// Normal display mode on command (0x13)
///
/// Leaves partial mode; the whole panel is scanned again.
pub const NORON: u8 = 0x13;

/// Display inversion off command (0x20)
pub const INVOFF: u8 = 0x20;

/// Display inversion on command (0x21)
///
/// IPS panels wired to the ST7789V need inversion enabled to show
/// true colors.
pub const INVON: u8 = 0x21;

/// Display off command (0x28)
pub const DISPOFF: u8 = 0x28;

/// Display on command (0x29)
pub const DISPON: u8 = 0x29;

// Addressing and memory commands

/// Column address set command (0x2A)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const CASET: u8 = 0x2A;

/// Row address set command (0x2B)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const RASET: u8 = 0x2B;

/// Memory write command (0x2C)
///
/// Arms the panel to accept pixel data for the current addressing window,
/// row-major, starting at the top-left corner of the window.
pub const RAMWR: u8 = 0x2C;

/// Memory data access control command (0x36)
///
/// Requires 1 byte of MADCTL flags, see [`crate::rotation`].
pub const MADCTL: u8 = 0x36;

/// Idle mode off command (0x38)
pub const IDMOFF: u8 = 0x38;

/// Interface pixel format command (0x3A)
///
/// Requires 1 byte, see [`COLMOD_16BPP`].
pub const COLMOD: u8 = 0x3A;

/// 65K colors, 16 bits per pixel (RGB565) for [`COLMOD`]
pub const COLMOD_16BPP: u8 = 0x55;

// MADCTL flags

/// Row address order (mirror Y)
pub const MADCTL_MY: u8 = 0x80;

/// Column address order (mirror X)
pub const MADCTL_MX: u8 = 0x40;

/// Row/column exchange (swap X and Y)
pub const MADCTL_MV: u8 = 0x20;

/// Vertical refresh order
pub const MADCTL_ML: u8 = 0x10;

/// BGR subpixel order
pub const MADCTL_BGR: u8 = 0x08;
