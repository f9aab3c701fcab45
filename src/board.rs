//! Board bring-up for the badge
//!
//! Pin map, bus parameters and the glue that turns an already configured
//! SPI device into a running display, framebuffer and input queue. Bus
//! setup itself belongs to the HAL: the board hands [`Board::init`] an
//! [`SpiDevice`](embedded_hal::spi::SpiDevice)-backed [`DisplayInterface`]
//! built with the parameters below.
//!
//! ## Example
//!
//! ```rust,no_run
//! use badge_bsp::board::{Board, BoardQueue};
//! use badge_bsp::{NoResetPin, SpiInterface};
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
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
//! static INPUT: BoardQueue = BoardQueue::new();
//!
//! let interface = SpiInterface::new(MockSpi, MockPin, NoResetPin);
//! let backlight = MockPin;
//! let mut board = match Board::init(interface, NoopRawMutex::new(), backlight, &INPUT, &mut delay) {
//!     Ok(board) => board,
//!     Err(_) => return,
//! };
//!
//! let input = board.input();
//! loop {
//!     if let Some(event) = input.receive_frame(&mut delay) {
//!         let _ = event;
//!     }
//!     let _ = board.flush_dirty();
//! }
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::button::DebouncedButton;
use crate::config::{Builder, BuilderError, Config, Dimensions};
use crate::display::Display;
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::guard::BusGuard;
use crate::interface::DisplayInterface;
use crate::queue::{INPUT_QUEUE_DEPTH, InputId, InputQueue, InputReceiver, InputSender};
use crate::touch::{DirectEnqueue, TouchChannel, TouchPad, TouchSensor};

/// GPIO assignments
pub mod pins {
    /// Boot button, active low
    pub const BTN_BOOT: u8 = 0;
    /// Console UART transmit
    pub const UART_TX: u8 = 1;
    /// Status LED chain data
    pub const LED_DATA: u8 = 2;
    /// Console UART receive
    pub const UART_RX: u8 = 3;
    /// Badge-to-badge link
    pub const BADGELINK: u8 = 4;
    /// LCD chip-select
    pub const SPI_CS_LCD: u8 = 5;
    /// LCD backlight enable
    pub const LCD_BACKLIGHT: u8 = 12;
    /// SPI clock
    pub const SPI_CLK: u8 = 18;
    /// SPI MISO
    pub const SPI_MISO: u8 = 19;
    /// I2C data
    pub const I2C_SDA: u8 = 21;
    /// I2C clock
    pub const I2C_SCL: u8 = 22;
    /// SPI MOSI
    pub const SPI_MOSI: u8 = 23;
    /// Buzzer
    pub const BUZZER: u8 = 32;
    /// LCD data/command selector
    pub const SPI_DC_LCD: u8 = 33;
}

/// Largest DMA transfer on the SPI bus, in bytes
pub const SPI_MAX_TRANSFER_SIZE: usize = 4094;
/// LCD SPI clock
pub const LCD_CLOCK_HZ: u32 = 40_000_000;
/// Panel width
pub const LCD_WIDTH: u16 = 240;
/// Panel height
pub const LCD_HEIGHT: u16 = 240;

/// Logical input of touch pad 0
pub const INPUT_TOUCH0: InputId = InputId(0);
/// Logical input of touch pad 1
pub const INPUT_TOUCH1: InputId = InputId(1);
/// Logical input of touch pad 2
pub const INPUT_TOUCH2: InputId = InputId(2);
/// Logical input of the boot button
pub const INPUT_BOOT: InputId = InputId(3);

/// Touch pads in the order they are scanned
pub const TOUCH_CHANNELS: [TouchChannel; 3] = [
    TouchChannel::new(7, INPUT_TOUCH0),
    TouchChannel::new(6, INPUT_TOUCH1),
    TouchChannel::new(4, INPUT_TOUCH2),
];

/// The board's input queue, shareable with interrupt handlers
pub type BoardQueue = InputQueue<CriticalSectionRawMutex, INPUT_QUEUE_DEPTH>;

/// Display configuration for the badge's panel
pub fn display_config() -> Result<Config, BuilderError> {
    Builder::new()
        .dimensions(Dimensions::new(LCD_WIDTH, LCD_HEIGHT)?)
        .chip_select(pins::SPI_CS_LCD)
        .data_command(pins::SPI_DC_LCD)
        .max_transfer_size(SPI_MAX_TRANSFER_SIZE)
        .clock_hz(LCD_CLOCK_HZ)
        .build()
}

/// Boot button wired as an input source
pub fn boot_button<P: InputPin>(pin: P) -> DebouncedButton<P> {
    DebouncedButton::new(pin, INPUT_BOOT)
}

/// Errors during board bring-up and operation
pub enum BoardError<I: DisplayInterface, E> {
    /// Static display configuration rejected
    Config(BuilderError),
    /// Display driver failure
    Display(Error<I>),
    /// Backlight pin failure
    Backlight(E),
    /// Framebuffer allocation failed
    OutOfMemory,
}

impl<I: DisplayInterface, E: core::fmt::Debug> core::fmt::Display for BoardError<I, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Display configuration: {e}"),
            Self::Display(e) => write!(f, "Display: {e}"),
            Self::Backlight(e) => write!(f, "Backlight pin error: {e:?}"),
            Self::OutOfMemory => write!(f, "Out of memory allocating framebuffer"),
        }
    }
}

impl<I: DisplayInterface, E: core::fmt::Debug> core::fmt::Debug for BoardError<I, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(e) => f.debug_tuple("Config").field(e).finish(),
            Self::Display(e) => f.debug_tuple("Display").field(e).finish(),
            Self::Backlight(e) => f.debug_tuple("Backlight").field(e).finish(),
            Self::OutOfMemory => f.write_str("OutOfMemory"),
        }
    }
}

impl<I: DisplayInterface, E: core::fmt::Debug> core::error::Error for BoardError<I, E> {}

impl<I: DisplayInterface, E> From<Error<I>> for BoardError<I, E> {
    fn from(e: Error<I>) -> Self {
        Self::Display(e)
    }
}

/// A brought-up badge: panel, framebuffer, backlight and input queue
pub struct Board<'q, DI, BL, G = CriticalSectionRawMutex>
where
    DI: DisplayInterface,
{
    display: Display<DI, G>,
    framebuffer: Framebuffer,
    backlight: BL,
    queue: &'q BoardQueue,
}

impl<'q, DI, BL, G> Board<'q, DI, BL, G>
where
    DI: DisplayInterface,
    BL: OutputPin,
    G: BusGuard,
{
    /// Bring the display up and publish the input queue
    ///
    /// The backlight is switched on only after the panel initialized, so a
    /// failed bring-up leaves the screen dark.
    pub fn init<D: DelayNs>(
        interface: DI,
        guard: G,
        mut backlight: BL,
        queue: &'q BoardQueue,
        delay: &mut D,
    ) -> Result<Self, BoardError<DI, BL::Error>> {
        let config = display_config().map_err(BoardError::Config)?;
        let dimensions = config.dimensions;

        let mut display = Display::with_guard(interface, config, guard);
        if let Err(e) = display.initialize(delay) {
            log::error!("display init failed: {}", e);
            return Err(BoardError::Display(e));
        }
        log::info!("display {}x{} up", dimensions.width, dimensions.height);

        let Some(framebuffer) = Framebuffer::new(dimensions) else {
            log::error!("no memory for {} byte framebuffer", dimensions.buffer_size());
            return Err(BoardError::OutOfMemory);
        };

        backlight.set_high().map_err(BoardError::Backlight)?;
        queue.clear();
        log::info!("board init done");

        Ok(Self {
            display,
            framebuffer,
            backlight,
            queue,
        })
    }

    /// Calibrate the touch pads and arm their interrupt
    ///
    /// The returned pad's interrupt handler should report through
    /// [`touch_sink`](Self::touch_sink).
    #[allow(clippy::unused_self)]
    pub fn setup_touch<S: TouchSensor>(&self, sensor: &mut S) -> Result<TouchPad<3>, S::Error> {
        let pad = TouchPad::setup(sensor, TOUCH_CHANNELS)?;
        log::info!("touch pads calibrated");
        Ok(pad)
    }

    /// Activation sink posting touch presses into the input queue
    pub fn touch_sink(
        &self,
    ) -> DirectEnqueue<InputSender<'q, CriticalSectionRawMutex, INPUT_QUEUE_DEPTH>> {
        DirectEnqueue::new(self.queue.sender())
    }

    /// Application side of the input queue
    pub fn input(&self) -> InputReceiver<'q, CriticalSectionRawMutex, INPUT_QUEUE_DEPTH> {
        self.queue.receiver()
    }

    /// Producer handle for additional input sources
    pub fn input_sender(&self) -> InputSender<'q, CriticalSectionRawMutex, INPUT_QUEUE_DEPTH> {
        self.queue.sender()
    }

    /// Push the whole framebuffer to the panel
    pub fn flush(&mut self) -> Result<(), BoardError<DI, BL::Error>> {
        self.display.write(self.framebuffer.as_bytes())?;
        self.framebuffer.take_dirty();
        Ok(())
    }

    /// Push only what changed since the last flush
    ///
    /// On failure the region stays dirty for the next attempt.
    pub fn flush_dirty(&mut self) -> Result<(), BoardError<DI, BL::Error>> {
        let Some(region) = self.framebuffer.take_dirty() else {
            return Ok(());
        };
        if let Err(e) = self.display.write_region(self.framebuffer.as_bytes(), region) {
            self.framebuffer.mark_dirty(region);
            return Err(e.into());
        }
        Ok(())
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<(), BoardError<DI, BL::Error>> {
        let result = if on {
            self.backlight.set_high()
        } else {
            self.backlight.set_low()
        };
        result.map_err(BoardError::Backlight)
    }

    /// The framebuffer to draw into
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// The display driver
    pub fn display_mut(&mut self) -> &mut Display<DI, G> {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::command::{CASET, DISPON};
    use crate::display::Region;
    use crate::interface::DataCommand;
    use crate::queue::{EventSink, InputEvent};
    use crate::touch::TouchStatus;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::digital::ErrorType;

    #[derive(Debug, Default)]
    struct MockInterface {
        attached: bool,
        commands: Vec<u8>,
        data_bytes: usize,
        fail: bool,
    }

    impl DisplayInterface for MockInterface {
        type Error = ();

        fn attach(&mut self) -> Result<(), ()> {
            self.attached = true;
            Ok(())
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        fn send(&mut self, bytes: &[u8], level: DataCommand) -> Result<(), ()> {
            if bytes.is_empty() {
                return Ok(());
            }
            if self.fail {
                self.attached = false;
                return Err(());
            }
            match level {
                DataCommand::Command => self.commands.push(bytes[0]),
                DataCommand::Data => self.data_bytes += bytes.len(),
            }
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), ()> {
            Ok(())
        }
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    struct Backlight<'a>(&'a Cell<bool>);

    impl ErrorType for Backlight<'_> {
        type Error = Infallible;
    }

    impl OutputPin for Backlight<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(true);
            Ok(())
        }
    }

    struct MockSensor;

    impl TouchSensor for MockSensor {
        type Error = ();

        fn configure_channel(&mut self, _hw: u8) -> Result<(), ()> {
            Ok(())
        }

        fn start_filter(&mut self, _period_ms: u32) -> Result<(), ()> {
            Ok(())
        }

        fn read_filtered(&mut self, _hw: u8) -> Result<u16, ()> {
            Ok(900)
        }

        fn set_threshold(&mut self, _hw: u8, _threshold: u16) -> Result<(), ()> {
            Ok(())
        }

        fn enable_interrupt(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    struct MockStatus(u32);

    impl TouchStatus for MockStatus {
        fn read_status(&mut self) -> u32 {
            self.0
        }

        fn clear_status(&mut self) {
            self.0 = 0;
        }
    }

    #[test]
    fn test_display_config_matches_board() {
        let config = display_config().unwrap();
        assert_eq!(config.dimensions, Dimensions::new(240, 240).unwrap());
        assert_eq!(config.chip_select, Some(pins::SPI_CS_LCD));
        assert_eq!(config.data_command, Some(pins::SPI_DC_LCD));
        assert_eq!(config.max_transfer_size, SPI_MAX_TRANSFER_SIZE);
        assert_eq!(config.clock_hz, LCD_CLOCK_HZ);
    }

    #[test]
    fn test_init_turns_backlight_on_after_display() {
        let queue = BoardQueue::new();
        let light = Cell::new(false);
        let board = Board::init(
            MockInterface::default(),
            NoopRawMutex::new(),
            Backlight(&light),
            &queue,
            &mut MockDelay,
        )
        .unwrap();
        assert!(light.get());
        assert!(board.display.is_ready());
        assert!(board.display.release().commands.contains(&DISPON));
    }

    #[test]
    fn test_failed_display_leaves_backlight_off() {
        let queue = BoardQueue::new();
        let light = Cell::new(false);
        let interface = MockInterface {
            fail: true,
            ..MockInterface::default()
        };
        let result = Board::init(
            interface,
            NoopRawMutex::new(),
            Backlight(&light),
            &queue,
            &mut MockDelay,
        );
        assert!(matches!(result, Err(BoardError::Display(Error::Interface(())))));
        assert!(!light.get());
    }

    #[test]
    fn test_flush_dirty_sends_only_changed_region() {
        let queue = BoardQueue::new();
        let light = Cell::new(false);
        let mut board = Board::init(
            MockInterface::default(),
            NoopRawMutex::new(),
            Backlight(&light),
            &queue,
            &mut MockDelay,
        )
        .unwrap();

        board.flush().unwrap();
        assert_eq!(board.framebuffer_mut().dirty(), None);

        board.framebuffer_mut().set_pixel(10, 20, Color::RED);
        board.framebuffer_mut().set_pixel(12, 21, Color::RED);
        let before = board.display.interface().data_bytes;
        board.flush_dirty().unwrap();
        // two rows of three pixels plus two window words
        assert_eq!(board.display.interface().data_bytes - before, 2 * 6 + 8);
        assert_eq!(board.framebuffer_mut().dirty(), None);

        // nothing dirty, nothing sent
        let commands = board.display.interface().commands.len();
        board.flush_dirty().unwrap();
        assert_eq!(board.display.interface().commands.len(), commands);
        assert!(board.display.interface().commands.contains(&CASET));
    }

    #[test]
    fn test_failed_flush_keeps_region_dirty() {
        let queue = BoardQueue::new();
        let light = Cell::new(false);
        let mut board = Board::init(
            MockInterface::default(),
            NoopRawMutex::new(),
            Backlight(&light),
            &queue,
            &mut MockDelay,
        )
        .unwrap();
        board.framebuffer_mut().take_dirty();
        board.framebuffer_mut().set_pixel(1, 1, Color::BLUE);
        board.display.interface_mut().fail = true;
        assert!(board.flush_dirty().is_err());
        assert_eq!(board.framebuffer_mut().dirty(), Some(Region::point(1, 1)));
    }

    #[test]
    fn test_touch_events_reach_application() {
        let queue = BoardQueue::new();
        let light = Cell::new(false);
        let board = Board::init(
            MockInterface::default(),
            NoopRawMutex::new(),
            Backlight(&light),
            &queue,
            &mut MockDelay,
        )
        .unwrap();

        let pad = board.setup_touch(&mut MockSensor).unwrap();
        assert_eq!(pad.thresholds(), &[600, 600, 600]);

        let sink = board.touch_sink();
        pad.on_interrupt(&mut MockStatus(1 << 4), &sink);
        board.input_sender().post(InputEvent::released(INPUT_BOOT));

        let input = board.input();
        assert_eq!(
            input.receive_frame(&mut MockDelay),
            Some(InputEvent::pressed(INPUT_TOUCH2))
        );
        assert_eq!(
            input.try_receive(),
            Some(InputEvent::released(INPUT_BOOT))
        );
        assert!(input.is_empty());
    }

    #[test]
    fn test_set_backlight() {
        let queue = BoardQueue::new();
        let light = Cell::new(false);
        let mut board = Board::init(
            MockInterface::default(),
            NoopRawMutex::new(),
            Backlight(&light),
            &queue,
            &mut MockDelay,
        )
        .unwrap();
        board.set_backlight(false).unwrap();
        assert!(!light.get());
    }
}
