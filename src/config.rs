//! Display configuration types and builder

pub use crate::error::BuilderError;

/// Largest panel edge addressable by the ST7789V frame memory (240x320)
pub const MAX_DIMENSION: u16 = 320;

/// Default ceiling for one SPI transaction in bytes
///
/// Matches the DMA transfer limit the badge's SPI bus is set up with.
pub const DEFAULT_MAX_TRANSFER_SIZE: usize = 4094;

/// Default SPI clock for the LCD in Hz
pub const DEFAULT_CLOCK_HZ: u32 = 40_000_000;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (columns)
    pub width: u16,
    /// Height in pixels (rows)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either edge is zero or
    /// larger than [`MAX_DIMENSION`].
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_DIMENSION || height == 0 || height > MAX_DIMENSION {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels on the panel
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Required pixel buffer size in bytes (2 bytes per pixel)
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() * 2
    }
}

/// Origin of the visible area inside the controller's frame memory
///
/// Panels smaller than 240x320 are mounted on a sub-window of the
/// controller RAM; every addressing window is shifted by this offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    /// Column offset in pixels
    pub x: u16,
    /// Row offset in pixels
    pub y: u16,
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Display configuration
///
/// Static description of one attached panel and the transport it hangs off.
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions (in the rotated frame)
    pub dimensions: Dimensions,
    /// Addressable-origin offset
    pub offset: Offset,
    /// Display rotation
    pub rotation: Rotation,
    /// Largest single transfer the transport accepts, in bytes
    pub max_transfer_size: usize,
    /// SPI clock in Hz
    pub clock_hz: u32,
    /// GPIO number of the chip-select line
    pub chip_select: Option<u8>,
    /// GPIO number of the data/command selector line
    pub data_command: Option<u8>,
}

impl Config {
    /// Widest column slice that fits in one transfer, in pixels
    pub fn max_transfer_pixels(&self) -> usize {
        self.max_transfer_size / 2
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use badge_bsp::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(240, 240) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .chip_select(5)
///     .data_command(33)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    dimensions: Option<Dimensions>,
    offset: Offset,
    rotation: Rotation,
    max_transfer_size: usize,
    clock_hz: u32,
    chip_select: Option<u8>,
    data_command: Option<u8>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            offset: Offset::default(),
            rotation: Rotation::Rotate0,
            max_transfer_size: DEFAULT_MAX_TRANSFER_SIZE,
            clock_hz: DEFAULT_CLOCK_HZ,
            chip_select: None,
            data_command: None,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the addressable-origin offset
    pub fn offset(mut self, x: u16, y: u16) -> Self {
        self.offset = Offset { x, y };
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the transport's maximum single-transfer size in bytes
    pub fn max_transfer_size(mut self, bytes: usize) -> Self {
        self.max_transfer_size = bytes;
        self
    }

    /// Set the SPI clock in Hz
    pub fn clock_hz(mut self, hz: u32) -> Self {
        self.clock_hz = hz;
        self
    }

    /// Record the chip-select GPIO
    pub fn chip_select(mut self, gpio: u8) -> Self {
        self.chip_select = Some(gpio);
        self
    }

    /// Record the data/command selector GPIO
    pub fn data_command(mut self, gpio: u8) -> Self {
        self.data_command = Some(gpio);
        self
    }

    /// Build the configuration
    ///
    /// Pin assignments are not checked here; a missing selector or
    /// chip-select is reported by [`Display::initialize`](crate::Display::initialize).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set, and
    /// `BuilderError::InvalidTransferSize` if a transfer cannot hold one pixel.
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        if self.max_transfer_size < 2 {
            return Err(BuilderError::InvalidTransferSize {
                bytes: self.max_transfer_size,
            });
        }
        Ok(Config {
            dimensions,
            offset: self.offset,
            rotation: self.rotation,
            max_transfer_size: self.max_transfer_size,
            clock_hz: self.clock_hz,
            chip_select: self.chip_select,
            data_command: self.data_command,
        })
    }
}
