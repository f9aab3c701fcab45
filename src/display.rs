//! Core display operations
//!
//! [`Display`] drives an ST7789V panel through any [`DisplayInterface`].
//! Pixel data is never buffered by the driver: the application owns a full
//! panel buffer (RGB565, big-endian, row-major) and hands regions of it to
//! [`Display::write_partial`], which streams them through a scratch buffer
//! no larger than one SPI transfer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use badge_bsp::{Builder, Dimensions, Display, NoResetPin, SpiInterface};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let interface = SpiInterface::new(MockSpi, MockPin, NoResetPin);
//! let dims = match Dimensions::new(240, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new()
//!     .dimensions(dims)
//!     .chip_select(5)
//!     .data_command(33)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! if display.initialize(&mut delay).is_ok() {
//!     let buffer = [0u8; 240 * 240 * 2];
//!     // Top-left 16x16 tile
//!     let _ = display.write_partial(&buffer, 0, 0, 15, 15);
//! }
//! ```

use alloc::vec::Vec;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::delay::DelayNs;

use crate::command::{
    CASET, COLMOD, COLMOD_16BPP, DISPON, INVON, MADCTL, NORON, RAMWR, RASET, SLPIN, SLPOUT,
};
use crate::config::{Config, Dimensions};
use crate::error::{Error, PinRole};
use crate::guard::BusGuard;
use crate::interface::DisplayInterface;
use crate::rotation;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Settle time after waking the panel and between the final init commands
const COMMAND_SETTLE_US: u32 = 100;

/// Rectangle on the panel, corners inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left column
    pub x0: u16,
    /// Top row
    pub y0: u16,
    /// Right column (inclusive)
    pub x1: u16,
    /// Bottom row (inclusive)
    pub y1: u16,
}

impl Region {
    /// Create a new region from two inclusive corners
    pub fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The whole panel
    pub fn full(dimensions: Dimensions) -> Self {
        Self::new(0, 0, dimensions.width - 1, dimensions.height - 1)
    }

    /// A single pixel
    pub fn point(x: u16, y: u16) -> Self {
        Self::new(x, y, x, y)
    }

    /// Width in pixels (0 for an inverted region)
    pub fn width(&self) -> u16 {
        if self.x1 < self.x0 {
            return 0;
        }
        self.x1 - self.x0 + 1
    }

    /// Height in pixels (0 for an inverted region)
    pub fn height(&self) -> u16 {
        if self.y1 < self.y0 {
            return 0;
        }
        self.y1 - self.y0 + 1
    }

    /// Smallest region covering both
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Core display driver for the ST7789V
///
/// Holds the transport, the static panel configuration, the optional bus
/// guard and the transfer scratch buffer. The scratch buffer is allocated
/// once by [`initialize`](Self::initialize) and sized to exactly one
/// transfer.
pub struct Display<I, G = NoopRawMutex>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Serializes command sequences
    guard: G,
    /// Row staging for partial transfers
    scratch: Vec<u8>,
    /// Set once the full bring-up sequence has gone out
    initialized: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display without a bus guard
    ///
    /// Use this when only one task ever talks to the panel.
    pub fn new(interface: I, config: Config) -> Self {
        Self::with_guard(interface, config, NoopRawMutex::new())
    }
}

impl<I, G> Display<I, G>
where
    I: DisplayInterface,
    G: BusGuard,
{
    /// Create a new Display whose command sequences run under `guard`
    pub fn with_guard(interface: I, config: Config, guard: G) -> Self {
        Self {
            interface,
            config,
            guard,
            scratch: Vec::new(),
            initialized: false,
        }
    }

    /// Bring the panel up
    ///
    /// Checks the wiring, allocates the scratch buffer, attaches the
    /// transport, resets and wakes the panel, selects 16-bit color, the
    /// configured orientation and inversion, then switches the display on in
    /// normal mode. Any failure aborts the sequence and is returned as is,
    /// leaving the display not ready until a later call succeeds.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.initialized = false;
        if self.config.data_command.is_none() {
            return Err(Error::MissingPin(PinRole::DataCommand));
        }
        if self.config.chip_select.is_none() {
            return Err(Error::MissingPin(PinRole::ChipSelect));
        }
        self.allocate_scratch()?;

        log::debug!(
            "attaching display transport at {} Hz, {} byte transfers",
            self.config.clock_hz,
            self.config.max_transfer_size
        );
        self.interface.attach().map_err(Error::Interface)?;

        self.reset(delay)?;
        let Self {
            interface, guard, ..
        } = self;
        guard.lock(|| command(interface, SLPOUT, &[]))?;
        delay.delay_us(COMMAND_SETTLE_US);

        let madctl = rotation::madctl(self.config.rotation);
        guard.lock(|| -> DisplayResult<I> {
            command(interface, COLMOD, &[COLMOD_16BPP])?;
            command(interface, MADCTL, &[madctl])?;
            command(interface, INVON, &[])
        })?;

        delay.delay_us(COMMAND_SETTLE_US);
        interface.send_command(DISPON).map_err(Error::Interface)?;
        delay.delay_us(COMMAND_SETTLE_US);
        interface.send_command(NORON).map_err(Error::Interface)?;
        self.initialized = true;

        log::debug!(
            "display {}x{} ready",
            self.config.dimensions.width,
            self.config.dimensions.height
        );
        Ok(())
    }

    /// Pulse the panel reset, or wait out the power-on reset without a pin
    ///
    /// Runs under the bus guard; the guard is released on failure too.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let Self {
            interface, guard, ..
        } = self;
        guard.lock(|| interface.reset(delay).map_err(Error::Interface))
    }

    /// Enter (`true`) or leave (`false`) sleep mode
    pub fn set_sleep(&mut self, sleep: bool) -> DisplayResult<I> {
        self.ensure_ready()?;
        let code = if sleep { SLPIN } else { SLPOUT };
        let Self {
            interface, guard, ..
        } = self;
        guard.lock(|| command(interface, code, &[]))
    }

    /// Send a single command byte
    pub fn send_command(&mut self, code: u8) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.interface.send_command(code).map_err(Error::Interface)
    }

    /// Send parameter bytes
    pub fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.interface.send_data(data).map_err(Error::Interface)
    }

    /// Send a 32-bit parameter word, most significant byte first
    pub fn send_u32(&mut self, value: u32) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.interface.send_u32(value).map_err(Error::Interface)
    }

    /// Stream a command table
    ///
    /// The table is a run of `command, length, data[length]` entries closed
    /// by a zero command byte. The whole table is checked before the first
    /// byte goes out; streaming stops at the first transport failure.
    pub fn run_init_sequence(&mut self, table: &[u8]) -> DisplayResult<I> {
        validate_init_sequence(table).map_err(|offset| Error::MalformedInitSequence { offset })?;
        self.ensure_ready()?;

        let Self {
            interface, guard, ..
        } = self;
        guard.lock(|| -> DisplayResult<I> {
            let mut offset = 0;
            while table[offset] != 0 {
                let len = table[offset + 1] as usize;
                let params = &table[offset + 2..offset + 2 + len];
                command(interface, table[offset], params)?;
                offset += 2 + len;
            }
            Ok(())
        })
    }

    /// Open an addressing window and arm a memory write
    ///
    /// Coordinates are in controller memory, so the panel offset is not
    /// applied here.
    pub fn set_addr_window(&mut self, x: u16, y: u16, w: u16, h: u16) -> DisplayResult<I> {
        self.ensure_ready()?;
        let Self {
            interface, guard, ..
        } = self;
        guard.lock(|| addr_window(interface, x, y, w, h))
    }

    /// Flush a full panel buffer
    pub fn write(&mut self, buffer: &[u8]) -> DisplayResult<I> {
        let full = Region::full(self.config.dimensions);
        self.write_partial(buffer, full.x0, full.y0, full.x1, full.y1)
    }

    /// Flush one region of a full panel buffer
    pub fn write_region(&mut self, buffer: &[u8], region: Region) -> DisplayResult<I> {
        self.write_partial(buffer, region.x0, region.y0, region.x1, region.y1)
    }

    /// Flush the rectangle `(x0, y0)..=(x1, y1)` of a full panel buffer
    ///
    /// `buffer` covers the whole panel, row-major, two bytes per pixel.
    /// Corners past the panel edge are clamped to it. The rectangle is sent
    /// as vertical slices no wider than half a transfer; each slice gets its
    /// own addressing window and one data transfer per row.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] for an inverted rectangle or one starting
    /// outside the panel, [`Error::BufferTooSmall`] for a short buffer, both
    /// before any transfer. A transport failure stops the write where it is.
    pub fn write_partial(
        &mut self,
        buffer: &[u8],
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> DisplayResult<I> {
        let invalid = Error::InvalidRegion { x0, y0, x1, y1 };
        if x0 > x1 || y0 > y1 {
            return Err(invalid);
        }

        let Dimensions { width, height } = self.config.dimensions;
        let x1 = x1.min(width - 1);
        let y1 = y1.min(height - 1);
        if x0 > x1 || y0 > y1 {
            return Err(invalid);
        }

        let required = self.config.dimensions.buffer_size();
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }
        self.ensure_ready()?;

        let Self {
            interface,
            config,
            guard,
            scratch,
            ..
        } = self;
        let stride = usize::from(width) * 2;
        let slice_limit = config.max_transfer_pixels();
        let offset = config.offset;

        guard.lock(|| -> DisplayResult<I> {
            let h = y1 - y0 + 1;
            let mut x = x0;
            let mut remaining = usize::from(x1 - x0) + 1;
            while remaining > 0 {
                let tw = remaining.min(slice_limit);
                let row_bytes = tw * 2;
                addr_window(
                    interface,
                    x.saturating_add(offset.x),
                    y0.saturating_add(offset.y),
                    tw as u16,
                    h,
                )?;
                for row in y0..=y1 {
                    let start = usize::from(row) * stride + usize::from(x) * 2;
                    let run = &mut scratch[..row_bytes];
                    run.copy_from_slice(&buffer[start..start + row_bytes]);
                    interface.send_data(run).map_err(Error::Interface)?;
                }
                x += tw as u16;
                remaining -= tw;
            }
            Ok(())
        })
    }

    /// Whether the last [`initialize`](Self::initialize) succeeded and the
    /// transport is still attached
    pub fn is_ready(&self) -> bool {
        self.initialized && self.interface.is_attached()
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Get display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Mutably borrow the interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give the interface back, dropping the scratch buffer
    pub fn release(self) -> I {
        self.interface
    }

    fn ensure_ready(&self) -> DisplayResult<I> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn allocate_scratch(&mut self) -> DisplayResult<I> {
        let size = self.config.max_transfer_size;
        if self.scratch.len() == size {
            return Ok(());
        }
        self.scratch.clear();
        self.scratch
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { requested: size })?;
        self.scratch.resize(size, 0);
        Ok(())
    }
}

fn command<I: DisplayInterface>(interface: &mut I, code: u8, params: &[u8]) -> DisplayResult<I> {
    interface.send_command(code).map_err(Error::Interface)?;
    interface.send_data(params).map_err(Error::Interface)
}

#[allow(clippy::many_single_char_names)]
fn addr_window<I: DisplayInterface>(
    interface: &mut I,
    x: u16,
    y: u16,
    w: u16,
    h: u16,
) -> DisplayResult<I> {
    let invalid = Error::InvalidRegion {
        x0: x,
        y0: y,
        x1: x.wrapping_add(w).wrapping_sub(1),
        y1: y.wrapping_add(h).wrapping_sub(1),
    };
    if w == 0 || h == 0 {
        return Err(invalid);
    }
    let (Some(x_end), Some(y_end)) = (x.checked_add(w - 1), y.checked_add(h - 1)) else {
        return Err(invalid);
    };

    interface.send_command(CASET).map_err(Error::Interface)?;
    interface
        .send_u32((u32::from(x) << 16) | u32::from(x_end))
        .map_err(Error::Interface)?;
    interface.send_command(RASET).map_err(Error::Interface)?;
    interface
        .send_u32((u32::from(y) << 16) | u32::from(y_end))
        .map_err(Error::Interface)?;
    interface.send_command(RAMWR).map_err(Error::Interface)
}

/// Returns the offset of the first malformed entry
fn validate_init_sequence(table: &[u8]) -> Result<(), usize> {
    let mut offset = 0;
    loop {
        match table.get(offset) {
            None => return Err(offset),
            Some(0) => return Ok(()),
            Some(_) => {}
        }
        let len = *table.get(offset + 1).ok_or(offset)? as usize;
        if offset + 2 + len > table.len() {
            return Err(offset);
        }
        offset += 2 + len;
    }
}
