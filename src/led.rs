//! Addressable status LEDs
//!
//! The badge chains five WS2812-style LEDs on one data line. Each LED takes
//! a green, red, blue byte triad, in that order.

/// LEDs on the chain
pub const LED_COUNT: usize = 5;

/// Bytes for a whole chain
pub const LED_FRAME_BYTES: usize = LED_COUNT * 3;

/// Delay between frames of [`HALT_BLINK`]
pub const HALT_BLINK_PERIOD_MS: u32 = 200;

/// One LED's color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedColor {
    /// Green intensity
    pub green: u8,
    /// Red intensity
    pub red: u8,
    /// Blue intensity
    pub blue: u8,
}

impl LedColor {
    /// LED off
    pub const OFF: Self = Self::rgb(0, 0, 0);

    /// Build from red, green, blue
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { green, red, blue }
    }

    /// Wire order triad
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.green, self.red, self.blue]
    }
}

/// Colors for the whole chain
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedPattern(pub [LedColor; LED_COUNT]);

impl LedPattern {
    /// All LEDs off
    pub const OFF: Self = Self::solid(LedColor::OFF);
    /// Dim green, test passed
    pub const GREEN: Self = Self::solid(LedColor::rgb(0, 50, 0));
    /// Dim red
    pub const RED: Self = Self::solid(LedColor::rgb(50, 0, 0));
    /// Full red, fault
    pub const RED_BRIGHT: Self = Self::solid(LedColor::rgb(0xFF, 0, 0));
    /// Dim blue, busy
    pub const BLUE: Self = Self::solid(LedColor::rgb(0, 0, 50));

    /// Same color on every LED
    pub const fn solid(color: LedColor) -> Self {
        Self([color; LED_COUNT])
    }

    /// Wire bytes for the chain, first LED first
    pub fn to_bytes(&self) -> [u8; LED_FRAME_BYTES] {
        let mut bytes = [0u8; LED_FRAME_BYTES];
        for (chunk, led) in bytes.chunks_exact_mut(3).zip(self.0.iter()) {
            chunk.copy_from_slice(&led.to_bytes());
        }
        bytes
    }

    /// Push the pattern out
    pub fn show<S: LedStrip>(&self, strip: &mut S) -> Result<(), S::Error> {
        strip.write(&self.to_bytes())
    }
}

/// Sequence shown in a loop when the board halts on a fault
pub const HALT_BLINK: [LedPattern; 3] = [
    LedPattern::RED_BRIGHT,
    LedPattern::RED,
    LedPattern::OFF,
];

/// Output for raw LED chain bytes
pub trait LedStrip {
    /// Error type of the output driver
    type Error: core::fmt::Debug;

    /// Send one frame of wire bytes
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}
