//! Input event queue
//!
//! A fixed-capacity FIFO between raw input sources (touch interrupt, sampler
//! task, push-button poller) and the application's main loop. Producers never
//! block: when the queue is full the newest event is dropped. The consumer
//! polls with a timeout matched to its render cadence.
//!
//! ## Example
//!
//! ```
//! use badge_bsp::queue::{InputEvent, InputId, InputQueue};
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//!
//! let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
//! assert!(queue.try_send(InputEvent::pressed(InputId(0))));
//! assert_eq!(queue.try_receive(), Some(InputEvent::pressed(InputId(0))));
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::delay::DelayNs;

/// Slots in the board's input queue
pub const INPUT_QUEUE_DEPTH: usize = 8;

/// Consumer wait per frame, one 60 Hz frame
pub const RECEIVE_TIMEOUT_MS: u32 = 16;

/// Logical input identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(pub u8);

/// One input state change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Which input changed
    pub input: InputId,
    /// `true` for pressed, `false` for released
    pub state: bool,
}

impl InputEvent {
    /// Input became active
    pub const fn pressed(input: InputId) -> Self {
        Self { input, state: true }
    }

    /// Input became inactive
    pub const fn released(input: InputId) -> Self {
        Self {
            input,
            state: false,
        }
    }
}

/// Anything input sources can post events into
pub trait EventSink {
    /// Post without blocking; `false` if the event was dropped
    fn post(&self, event: InputEvent) -> bool;
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn post(&self, event: InputEvent) -> bool {
        (**self).post(event)
    }
}

/// Bounded input event queue
///
/// Usually placed in a `static` with a
/// [`CriticalSectionRawMutex`](embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex)
/// so interrupt handlers can post into it.
pub struct InputQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, InputEvent, N>,
}

impl<M: RawMutex, const N: usize> InputQueue<M, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without blocking
    ///
    /// Returns `false` and drops `event` when the queue is full.
    pub fn try_send(&self, event: InputEvent) -> bool {
        self.channel.try_send(event).is_ok()
    }

    /// Dequeue the oldest event, if any
    pub fn try_receive(&self) -> Option<InputEvent> {
        self.channel.try_receive().ok()
    }

    /// Wait up to `timeout_ms` for an event
    ///
    /// Polls once per millisecond; `None` on timeout.
    pub fn receive_timeout<D: DelayNs>(&self, delay: &mut D, timeout_ms: u32) -> Option<InputEvent> {
        let mut waited = 0u32;
        loop {
            if let Some(event) = self.try_receive() {
                return Some(event);
            }
            if waited >= timeout_ms {
                return None;
            }
            delay.delay_ms(1);
            waited += 1;
        }
    }

    /// Events currently queued
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Whether no event is queued
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Queue capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop every queued event
    pub fn clear(&self) {
        self.channel.clear();
    }

    /// Producer handle
    pub fn sender(&self) -> InputSender<'_, M, N> {
        InputSender { queue: self }
    }

    /// Consumer handle
    pub fn receiver(&self) -> InputReceiver<'_, M, N> {
        InputReceiver { queue: self }
    }
}

impl<M: RawMutex, const N: usize> Default for InputQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> EventSink for InputQueue<M, N> {
    fn post(&self, event: InputEvent) -> bool {
        self.try_send(event)
    }
}

/// Producer side of an [`InputQueue`]
pub struct InputSender<'q, M: RawMutex, const N: usize> {
    queue: &'q InputQueue<M, N>,
}

impl<M: RawMutex, const N: usize> Clone for InputSender<'_, M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, const N: usize> Copy for InputSender<'_, M, N> {}

impl<M: RawMutex, const N: usize> InputSender<'_, M, N> {
    /// See [`InputQueue::try_send`]
    pub fn try_send(&self, event: InputEvent) -> bool {
        self.queue.try_send(event)
    }
}

impl<M: RawMutex, const N: usize> EventSink for InputSender<'_, M, N> {
    fn post(&self, event: InputEvent) -> bool {
        self.try_send(event)
    }
}

/// Consumer side of an [`InputQueue`], read-only for the application
pub struct InputReceiver<'q, M: RawMutex, const N: usize> {
    queue: &'q InputQueue<M, N>,
}

impl<M: RawMutex, const N: usize> InputReceiver<'_, M, N> {
    /// See [`InputQueue::try_receive`]
    pub fn try_receive(&self) -> Option<InputEvent> {
        self.queue.try_receive()
    }

    /// See [`InputQueue::receive_timeout`]
    pub fn receive_timeout<D: DelayNs>(&self, delay: &mut D, timeout_ms: u32) -> Option<InputEvent> {
        self.queue.receive_timeout(delay, timeout_ms)
    }

    /// Wait one frame ([`RECEIVE_TIMEOUT_MS`]) for an event
    pub fn receive_frame<D: DelayNs>(&self, delay: &mut D) -> Option<InputEvent> {
        self.queue.receive_timeout(delay, RECEIVE_TIMEOUT_MS)
    }

    /// Events currently queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no event is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    struct CountingDelay {
        ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.ms += ms;
        }
    }

    #[test]
    fn test_ninth_event_is_dropped() {
        let queue: InputQueue<CriticalSectionRawMutex, INPUT_QUEUE_DEPTH> = InputQueue::new();
        for i in 0..8 {
            assert!(queue.try_send(InputEvent::pressed(InputId(i))));
        }
        assert!(!queue.try_send(InputEvent::pressed(InputId(8))));
        assert_eq!(queue.len(), 8);

        for i in 0..8 {
            assert_eq!(queue.try_receive(), Some(InputEvent::pressed(InputId(i))));
        }
        assert_eq!(queue.try_receive(), None);
    }

    #[test]
    fn test_receive_timeout_returns_none_after_timeout() {
        let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
        let mut delay = CountingDelay { ms: 0 };
        assert_eq!(
            queue.receiver().receive_timeout(&mut delay, RECEIVE_TIMEOUT_MS),
            None
        );
        assert_eq!(delay.ms, RECEIVE_TIMEOUT_MS);
    }

    #[test]
    fn test_receive_timeout_returns_queued_event_immediately() {
        let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
        queue.sender().post(InputEvent::released(InputId(3)));
        let mut delay = CountingDelay { ms: 0 };
        assert_eq!(
            queue.receiver().receive_frame(&mut delay),
            Some(InputEvent::released(InputId(3)))
        );
        assert_eq!(delay.ms, 0);
    }

    #[test]
    fn test_zero_timeout_polls_once() {
        let queue: InputQueue<NoopRawMutex, 8> = InputQueue::new();
        let mut delay = CountingDelay { ms: 0 };
        assert_eq!(queue.receive_timeout(&mut delay, 0), None);
        assert_eq!(delay.ms, 0);
    }

    #[test]
    fn test_events_for_same_input_are_not_coalesced() {
        let queue: InputQueue<NoopRawMutex, 4> = InputQueue::new();
        let sender = queue.sender();
        assert!(sender.post(InputEvent::pressed(InputId(1))));
        assert!(sender.post(InputEvent::pressed(InputId(1))));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), 4);
        queue.clear();
        assert!(queue.is_empty());
    }
}
