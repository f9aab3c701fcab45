//! Capacitive touch capture
//!
//! [`TouchPad`] calibrates a fixed set of sense channels at startup and turns
//! the touch controller's interrupt status into channel activations. What
//! happens to an activation is decided by an [`ActivationSink`]:
//!
//! - [`DirectEnqueue`] posts a pressed event straight from the interrupt
//!   handler. Every activation is reported, with no debounce.
//! - [`ActivationFlags`] only records the activation; a
//!   [`DebounceSampler`](crate::sampler::DebounceSampler) task turns flags
//!   into events with a hold-off window.
//!
//! Both only ever report presses: the status register says which channels
//! are below threshold now, never which ones were let go.
//!
//! Calibration assumes nobody touches the pads during [`TouchPad::setup`]
//! and is never redone.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::queue::{EventSink, InputEvent, InputId};

/// Hardware IIR filter period started during setup
pub const FILTER_PERIOD_MS: u32 = 10;

/// Physical sense channel and the logical input it reports as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchChannel {
    /// Touch controller channel number
    pub hw: u8,
    /// Logical input reported for this channel
    pub input: InputId,
}

impl TouchChannel {
    /// Map controller channel `hw` to `input`
    pub const fn new(hw: u8, input: InputId) -> Self {
        Self { hw, input }
    }
}

/// Activation threshold for an untouched baseline reading
///
/// A touch raises the pad capacitance and lowers the reading, so the
/// threshold sits below the baseline at two thirds of it.
pub fn threshold_from_baseline(baseline: u16) -> u16 {
    (u32::from(baseline) * 2 / 3) as u16
}

/// Configuration side of the touch controller
pub trait TouchSensor {
    /// Error type of the controller driver
    type Error: core::fmt::Debug;

    /// Enable sensing on one channel
    fn configure_channel(&mut self, hw: u8) -> Result<(), Self::Error>;

    /// Start the hardware filter with the given period
    fn start_filter(&mut self, period_ms: u32) -> Result<(), Self::Error>;

    /// Filtered reading of one channel
    fn read_filtered(&mut self, hw: u8) -> Result<u16, Self::Error>;

    /// Program a channel's interrupt threshold
    fn set_threshold(&mut self, hw: u8, threshold: u16) -> Result<(), Self::Error>;

    /// Arm the touch interrupt
    fn enable_interrupt(&mut self) -> Result<(), Self::Error>;
}

/// Interrupt side of the touch controller
///
/// Both operations are plain register accesses and cannot fail.
pub trait TouchStatus {
    /// Bitmask of channels below threshold, bit `n` for channel `n`
    fn read_status(&mut self) -> u32;

    /// Clear the latched status
    fn clear_status(&mut self);
}

/// Receives channel activations from the interrupt handler
///
/// Called in interrupt context: implementations must not block, allocate or
/// log.
pub trait ActivationSink {
    /// Channel at position `slot` in the channel table, reporting `input`,
    /// was activated
    fn activate(&self, slot: usize, input: InputId);
}

impl<S: ActivationSink + ?Sized> ActivationSink for &S {
    fn activate(&self, slot: usize, input: InputId) {
        (**self).activate(slot, input);
    }
}

/// Posts a pressed event for every activation
pub struct DirectEnqueue<Q> {
    sink: Q,
}

impl<Q: EventSink> DirectEnqueue<Q> {
    /// Post activations into `sink`
    pub const fn new(sink: Q) -> Self {
        Self { sink }
    }
}

impl<Q: EventSink> ActivationSink for DirectEnqueue<Q> {
    fn activate(&self, _slot: usize, input: InputId) {
        // Full queue: the event is dropped, the interrupt must not wait
        let _ = self.sink.post(InputEvent::pressed(input));
    }
}

/// Per-channel activation flags shared between interrupt and sampler
pub struct ActivationFlags<const N: usize> {
    flags: [AtomicBool; N],
}

impl<const N: usize> ActivationFlags<N> {
    /// All channels cleared
    pub const fn new() -> Self {
        Self {
            flags: [const { AtomicBool::new(false) }; N],
        }
    }

    /// Whether channel `slot` is flagged
    pub fn is_set(&self, slot: usize) -> bool {
        self.flags
            .get(slot)
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Flag channel `slot`
    pub fn set(&self, slot: usize) {
        if let Some(flag) = self.flags.get(slot) {
            flag.store(true, Ordering::Release);
        }
    }

    /// Clear channel `slot`
    pub fn clear(&self, slot: usize) {
        if let Some(flag) = self.flags.get(slot) {
            flag.store(false, Ordering::Release);
        }
    }
}

impl<const N: usize> Default for ActivationFlags<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ActivationSink for ActivationFlags<N> {
    fn activate(&self, slot: usize, _input: InputId) {
        self.set(slot);
    }
}

/// A calibrated set of touch channels
pub struct TouchPad<const N: usize> {
    channels: [TouchChannel; N],
    thresholds: [u16; N],
}

impl<const N: usize> TouchPad<N> {
    /// Configure and calibrate every channel, then arm the interrupt
    ///
    /// Each channel is enabled, the filter is started, and each channel's
    /// threshold is set from one filtered baseline reading.
    pub fn setup<S: TouchSensor>(
        sensor: &mut S,
        channels: [TouchChannel; N],
    ) -> Result<Self, S::Error> {
        for channel in &channels {
            sensor.configure_channel(channel.hw)?;
        }
        sensor.start_filter(FILTER_PERIOD_MS)?;

        let mut thresholds = [0u16; N];
        for (channel, threshold) in channels.iter().zip(thresholds.iter_mut()) {
            let baseline = sensor.read_filtered(channel.hw)?;
            *threshold = threshold_from_baseline(baseline);
            sensor.set_threshold(channel.hw, *threshold)?;
            log::info!(
                "touch pad {} -> input {}: baseline {}, threshold {}",
                channel.hw,
                channel.input.0,
                baseline,
                *threshold
            );
        }

        sensor.enable_interrupt()?;
        Ok(Self {
            channels,
            thresholds,
        })
    }

    /// Interrupt handler body
    ///
    /// Reads and clears the status, then reports each configured channel
    /// whose bit is set. Returns the number of activations reported.
    pub fn on_interrupt<T, A>(&self, status: &mut T, sink: &A) -> usize
    where
        T: TouchStatus,
        A: ActivationSink + ?Sized,
    {
        let bits = status.read_status();
        status.clear_status();

        let mut reported = 0;
        for (slot, channel) in self.channels.iter().enumerate() {
            let active = bits
                .checked_shr(u32::from(channel.hw))
                .is_some_and(|b| b & 1 != 0);
            if active {
                sink.activate(slot, channel.input);
                reported += 1;
            }
        }
        reported
    }

    /// The channel table
    pub fn channels(&self) -> &[TouchChannel; N] {
        &self.channels
    }

    /// Thresholds programmed at setup, in channel table order
    pub fn thresholds(&self) -> &[u16; N] {
        &self.thresholds
    }
}
