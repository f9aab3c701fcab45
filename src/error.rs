//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use badge_bsp::{Builder, Dimensions, BuilderError};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(480, 240); // Too wide
//! assert!(result.is_err());
//! ```

use crate::config::MAX_DIMENSION;
use crate::interface::DisplayInterface;

/// A board wiring line the driver needs before it can start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinRole {
    /// SPI chip-select
    ChipSelect,
    /// Data/command selector
    DataCommand,
}

impl core::fmt::Display for PinRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ChipSelect => write!(f, "chip-select"),
            Self::DataCommand => write!(f, "data/command"),
        }
    }
}

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// Formatting only needs the interface's error to be `Debug`, not the
/// interface itself.
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Operation attempted before a successful
    /// [`initialize`](crate::Display::initialize)
    NotReady,
    /// A required wiring line is not assigned in the [`Config`](crate::Config)
    MissingPin(PinRole),
    /// The transfer scratch buffer could not be allocated
    OutOfMemory {
        /// Requested size in bytes
        requested: usize,
    },
    /// Rectangle is inverted, empty or outside the panel
    InvalidRegion {
        /// Left column
        x0: u16,
        /// Top row
        y0: u16,
        /// Right column (inclusive)
        x1: u16,
        /// Bottom row (inclusive)
        y1: u16,
    },
    /// Buffer is too small for the requested rectangle
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Initialization table is truncated or missing its terminator
    MalformedInitSequence {
        /// Byte offset of the offending entry
        offset: usize,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::NotReady => write!(f, "Display not initialized"),
            Self::MissingPin(role) => write!(f, "No {role} pin configured"),
            Self::OutOfMemory { requested } => {
                write!(f, "Out of memory allocating {requested} bytes")
            }
            Self::InvalidRegion { x0, y0, x1, y1 } => {
                write!(f, "Invalid region: ({x0}, {y0})..=({x1}, {y1})")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::MalformedInitSequence { offset } => {
                write!(f, "Malformed init sequence at byte {offset}")
            }
        }
    }
}

impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::NotReady => f.write_str("NotReady"),
            Self::MissingPin(role) => f.debug_tuple("MissingPin").field(role).finish(),
            Self::OutOfMemory { requested } => f
                .debug_struct("OutOfMemory")
                .field("requested", requested)
                .finish(),
            Self::InvalidRegion { x0, y0, x1, y1 } => f
                .debug_struct("InvalidRegion")
                .field("x0", x0)
                .field("y0", y0)
                .field("x1", x1)
                .field("y1", y1)
                .finish(),
            Self::BufferTooSmall { required, provided } => f
                .debug_struct("BufferTooSmall")
                .field("required", required)
                .field("provided", provided)
                .finish(),
            Self::MalformedInitSequence { offset } => f
                .debug_struct("MalformedInitSequence")
                .field("offset", offset)
                .finish(),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },
    /// Transfer size cannot carry a single pixel
    InvalidTransferSize {
        /// Requested size in bytes
        bytes: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (1..={MAX_DIMENSION} per edge)"
            ),
            Self::InvalidTransferSize { bytes } => {
                write!(f, "Transfer size {bytes} is smaller than one pixel")
            }
        }
    }
}

impl core::error::Error for BuilderError {}
