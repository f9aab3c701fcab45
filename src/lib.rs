//! Badge Board Support
//!
//! Display driver and input stack for a handheld badge with a 240x240
//! ST7789V LCD and capacitive touch pads.
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc` for the transfer scratch buffer)
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Partial updates split into transfers no larger than the SPI DMA limit
//! - Optional bus guard for panels shared between tasks
//! - Interrupt-driven touch capture with pluggable debounce strategy
//! - Bounded, non-blocking input event queue
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use badge_bsp::{Builder, Dimensions, Display, HardwareReset, ResetDrive, SpiInterface};
//!
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let mut delay = MockDelay;
//! let interface = SpiInterface::new(spi, dc, HardwareReset::new(rst, ResetDrive::PushPull));
//! let dims = match Dimensions::new(240, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).chip_select(5).data_command(33).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.initialize(&mut delay);
//! ```

#![no_std]

extern crate alloc;

/// Board pin map, bus parameters and bring-up
pub mod board;
/// Debounced push-button input
pub mod button;
/// RGB565 color type
pub mod color;
/// ST7789V command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Full-panel pixel buffer
pub mod framebuffer;
/// Bus guard for command sequences
pub mod guard;
/// Hardware interface abstraction
pub mod interface;
/// Status LED patterns
pub mod led;
/// Input event queue
pub mod queue;
/// Rotation to MADCTL mapping
pub mod rotation;
/// Debounce sampler for flag-based touch capture
pub mod sampler;
/// Capacitive touch capture
pub mod touch;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use board::{Board, BoardError, BoardQueue};
pub use button::DebouncedButton;
pub use color::Color;
pub use config::{Builder, Config, Dimensions, MAX_DIMENSION, Offset, Rotation};
pub use display::{Display, Region};
pub use error::{BuilderError, Error, PinRole};
pub use framebuffer::Framebuffer;
pub use guard::BusGuard;
pub use interface::{
    DataCommand, DisplayInterface, HardwareReset, InterfaceError, NoResetPin, ResetDrive,
    ResetLine, SpiInterface,
};
pub use led::{LedColor, LedPattern, LedStrip};
pub use queue::{EventSink, InputEvent, InputId, InputQueue, InputReceiver, InputSender};
pub use sampler::DebounceSampler;
pub use touch::{
    ActivationFlags, ActivationSink, DirectEnqueue, TouchChannel, TouchPad, TouchSensor,
    TouchStatus,
};
