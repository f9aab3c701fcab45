//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`SpiInterface`]
//! struct for talking to the ST7789V controller over a write-only SPI link.
//!
//! ## Hardware Requirements
//!
//! The ST7789V needs:
//! - SPI bus in half-duplex 3-wire mode (SDA + SCL), chip-select owned by the
//!   [`SpiDevice`]
//! - 1 or 2 GPIO pins:
//!   - **DC**: Data/Command select (output, low = command, high = data)
//!   - **RST**: Reset (output, active low, optional)
//!
//! The DC level is driven before the SPI transaction starts, so it is stable
//! when chip-select asserts and the first clock edge arrives.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use badge_bsp::{DisplayInterface, HardwareReset, ResetDrive, SpiInterface};
//! # use core::convert::Infallible;
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
//! let reset = HardwareReset::new(MockPin, ResetDrive::PushPull);
//! let mut interface = SpiInterface::new(MockSpi, MockPin, reset);
//! let _ = interface.attach();
//!
//! // Column address set, start 0, end 239
//! let _ = interface.send_command(0x2A);
//! let _ = interface.send_u32(239);
//! ```

use core::convert::Infallible;
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, Error as _, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Level of the data/command selector line for one transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataCommand {
    /// Selector low, bytes are a command
    Command,
    /// Selector high, bytes are parameters or pixel data
    Data,
}

/// Trait for the transport between the driver and the ST7789V controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`SpiInterface`] struct. Only
/// [`attach`](Self::attach), [`is_attached`](Self::is_attached),
/// [`send`](Self::send) and [`reset`](Self::reset) are required; the
/// command, data and 32-bit helpers are built on top of `send`.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Prepare the transport for use
    ///
    /// Configures the selector and reset lines. After a successful attach
    /// [`is_attached`](Self::is_attached) returns true until a transfer fails.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin cannot be driven.
    fn attach(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Whether the transport is ready to carry transfers
    fn is_attached(&self) -> bool;

    /// Transmit `bytes` with the selector line at `level`
    ///
    /// An empty slice is a successful no-op and touches no hardware.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is not attached, or if the pin or
    /// SPI operation fails.
    fn send(&mut self, bytes: &[u8], level: DataCommand) -> InterfaceResult<(), Self::Error>;

    /// Pulse the controller's reset line
    ///
    /// Without a reset line the implementation waits for the controller's
    /// power-on reset to settle instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset pin cannot be driven.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Send a single command byte
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.send(&[command], DataCommand::Command)
    }

    /// Send parameter or pixel bytes
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.send(data, DataCommand::Data)
    }

    /// Send a 32-bit value as four data bytes, most significant first
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    fn send_u32(&mut self, value: u32) -> InterfaceResult<(), Self::Error> {
        self.send(&value.to_be_bytes(), DataCommand::Data)
    }
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// Data/command pin error
    Pin(PinErr),
    /// Reset line error
    Reset(digital::ErrorKind),
    /// Transfer attempted before [`DisplayInterface::attach`] succeeded,
    /// or after a failed transfer detached the transport
    NotAttached,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Reset(kind) => write!(f, "Reset pin error: {kind:?}"),
            Self::NotAttached => write!(f, "Transport not attached"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// A controller reset line
///
/// Implemented by [`NoResetPin`] for boards that leave reset unconnected and
/// by [`HardwareReset`] for a GPIO-driven line.
pub trait ResetLine {
    /// Error type of the underlying pin
    type Error: digital::Error;

    /// Put the line into its idle (released) state
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    fn configure(&mut self) -> Result<(), Self::Error>;

    /// Assert and release the line with the controller's timing
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be driven.
    fn pulse<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;
}

/// Time the controller needs to come out of reset when no reset line is wired
pub const POWER_ON_SETTLE_MS: u32 = 100;

/// Assert and release hold time of a hardware reset pulse
pub const RESET_PULSE_MS: u32 = 50;

/// Placeholder for boards without a controller reset line
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResetPin;

impl ResetLine for NoResetPin {
    type Error = Infallible;

    fn configure(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn pulse<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        log::info!("no reset pin, waiting {}ms instead", POWER_ON_SETTLE_MS);
        delay.delay_ms(POWER_ON_SETTLE_MS);
        Ok(())
    }
}

/// Electrical drive mode of a reset line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetDrive {
    /// Line is driven both low and high
    #[default]
    PushPull,
    /// Line is pulled low and floated to release; the pin must be configured
    /// open-drain by the HAL so that `set_high` releases it
    OpenDrain,
}

/// GPIO-driven reset line, active low
#[derive(Debug)]
pub struct HardwareReset<P> {
    pin: P,
    drive: ResetDrive,
}

impl<P: OutputPin> HardwareReset<P> {
    /// Wrap a reset pin
    pub fn new(pin: P, drive: ResetDrive) -> Self {
        Self { pin, drive }
    }

    /// Drive mode of this line
    pub fn drive(&self) -> ResetDrive {
        self.drive
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ResetLine for HardwareReset<P> {
    type Error = P::Error;

    fn configure(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }

    fn pulse<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        log::debug!("reset pulse ({:?})", self.drive);
        self.pin.set_low()?;
        delay.delay_ms(RESET_PULSE_MS);
        // Push-pull drives high; open-drain floats and the pull-up releases
        self.pin.set_high()?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }
}

/// SPI transport implementation for the ST7789V
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`], owning chip-select
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset line implementing [`ResetLine`]
#[derive(Debug)]
pub struct SpiInterface<SPI, DC, RST> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset line
    rst: RST,
    /// Set by a successful attach, cleared by any failed transfer
    attached: bool,
}

impl<SPI, DC, RST> SpiInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: ResetLine,
{
    /// Create a new, not yet attached, interface
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            dc,
            rst,
            attached: false,
        }
    }

    /// Give the SPI device and pins back
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

impl<SPI, DC, RST> DisplayInterface for SpiInterface<SPI, DC, RST>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin,
    DC::Error: Debug,
    RST: ResetLine,
{
    type Error = InterfaceError<SPI::Error, DC::Error>;

    fn attach(&mut self) -> InterfaceResult<(), Self::Error> {
        self.rst
            .configure()
            .map_err(|e| InterfaceError::Reset(e.kind()))?;
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.attached = true;
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn send(&mut self, bytes: &[u8], level: DataCommand) -> InterfaceResult<(), Self::Error> {
        if bytes.is_empty() {
            return Ok(());
        }
        if !self.attached {
            return Err(InterfaceError::NotAttached);
        }

        let selected = match level {
            DataCommand::Command => self.dc.set_low(),
            DataCommand::Data => self.dc.set_high(),
        };
        if let Err(e) = selected {
            self.attached = false;
            return Err(InterfaceError::Pin(e));
        }
        if let Err(e) = self.spi.write(bytes) {
            self.attached = false;
            return Err(InterfaceError::Spi(e));
        }
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        self.rst
            .pulse(delay)
            .map_err(|e| InterfaceError::Reset(e.kind()))
    }
}
