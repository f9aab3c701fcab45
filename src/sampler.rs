//! Debounce sampler for flag-based touch capture
//!
//! Scans [`ActivationFlags`] every [`SAMPLE_PERIOD_MS`], posts one pressed
//! event per newly flagged channel, then ignores that channel for
//! [`DEBOUNCE_MS`] so a held finger does not flood the queue. Each channel
//! has its own hold-off; a touch on one pad never delays another.

use embedded_hal::delay::DelayNs;

use crate::queue::{EventSink, InputEvent};
use crate::touch::{ActivationFlags, TouchChannel};

/// Sampler tick
pub const SAMPLE_PERIOD_MS: u32 = 10;

/// Hold-off after a reported activation
pub const DEBOUNCE_MS: u64 = 300;

/// Turns activation flags into debounced pressed events
pub struct DebounceSampler<'a, const N: usize> {
    channels: &'a [TouchChannel; N],
    flags: &'a ActivationFlags<N>,
    hold_until: [Option<u64>; N],
}

impl<'a, const N: usize> DebounceSampler<'a, N> {
    /// Sample `flags`, reporting channels through `channels`
    pub fn new(channels: &'a [TouchChannel; N], flags: &'a ActivationFlags<N>) -> Self {
        Self {
            channels,
            flags,
            hold_until: [None; N],
        }
    }

    /// One sampler tick at `now_ms`
    ///
    /// A flagged channel outside its hold-off posts a pressed event and
    /// starts a new hold-off. The flag is cleared once the hold-off has run
    /// out, so activations during it are absorbed. Returns the number of
    /// events posted, dropped ones included.
    pub fn poll<S: EventSink + ?Sized>(&mut self, now_ms: u64, sink: &S) -> usize {
        let mut posted = 0;
        for (slot, channel) in self.channels.iter().enumerate() {
            if let Some(until) = self.hold_until[slot] {
                if now_ms < until {
                    continue;
                }
                self.hold_until[slot] = None;
                self.flags.clear(slot);
            }

            if self.flags.is_set(slot) {
                if !sink.post(InputEvent::pressed(channel.input)) {
                    log::warn!("input queue full, dropped touch {}", channel.input.0);
                }
                self.hold_until[slot] = Some(now_ms + DEBOUNCE_MS);
                posted += 1;
            }
        }
        posted
    }

    /// Whether channel `slot` is in its hold-off window
    pub fn is_holding(&self, slot: usize) -> bool {
        self.hold_until.get(slot).is_some_and(Option::is_some)
    }

    /// Sampler task body, never returns
    pub fn run<D: DelayNs, S: EventSink + ?Sized>(&mut self, delay: &mut D, sink: &S) -> ! {
        let mut now_ms = 0u64;
        loop {
            self.poll(now_ms, sink);
            delay.delay_ms(SAMPLE_PERIOD_MS);
            now_ms += u64::from(SAMPLE_PERIOD_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{InputId, InputQueue};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    const CHANNELS: [TouchChannel; 3] = [
        TouchChannel::new(7, InputId(0)),
        TouchChannel::new(6, InputId(1)),
        TouchChannel::new(4, InputId(2)),
    ];

    #[test]
    fn test_flag_posts_one_event_then_holds_off() {
        let flags: ActivationFlags<3> = ActivationFlags::new();
        let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
        let mut sampler = DebounceSampler::new(&CHANNELS, &flags);

        flags.set(1);
        assert_eq!(sampler.poll(0, &queue), 1);
        assert_eq!(queue.try_receive(), Some(InputEvent::pressed(InputId(1))));
        assert!(sampler.is_holding(1));

        // sustained touch keeps re-flagging during the hold-off
        for now in (10..DEBOUNCE_MS).step_by(10) {
            flags.set(1);
            assert_eq!(sampler.poll(now, &queue), 0);
        }
        assert!(queue.is_empty());

        // hold-off over: the absorbed flag is cleared, nothing is reported
        assert_eq!(sampler.poll(DEBOUNCE_MS, &queue), 0);
        assert!(!flags.is_set(1));
        assert!(!sampler.is_holding(1));

        flags.set(1);
        assert_eq!(sampler.poll(DEBOUNCE_MS + 10, &queue), 1);
    }

    #[test]
    fn test_channels_hold_off_independently() {
        let flags: ActivationFlags<3> = ActivationFlags::new();
        let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
        let mut sampler = DebounceSampler::new(&CHANNELS, &flags);

        flags.set(0);
        sampler.poll(0, &queue);
        flags.set(2);
        assert_eq!(sampler.poll(10, &queue), 1);
        assert_eq!(queue.try_receive(), Some(InputEvent::pressed(InputId(0))));
        assert_eq!(queue.try_receive(), Some(InputEvent::pressed(InputId(2))));
    }

    #[test]
    fn test_idle_channels_post_nothing() {
        let flags: ActivationFlags<3> = ActivationFlags::new();
        let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
        let mut sampler = DebounceSampler::new(&CHANNELS, &flags);
        assert_eq!(sampler.poll(0, &queue), 0);
        assert!(queue.is_empty());
    }
}
