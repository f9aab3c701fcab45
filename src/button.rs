//! Debounced push-button input
//!
//! Samples a GPIO from a periodic task and reports both edges once the level
//! has been stable for [`BUTTON_DEBOUNCE_MS`]. Buttons are active-low with a
//! pull-up unless built with [`DebouncedButton::active_high`].

use embedded_hal::digital::InputPin;

use crate::queue::{EventSink, InputEvent, InputId};

/// Level must hold this long before an edge is reported
pub const BUTTON_DEBOUNCE_MS: u64 = 20;

/// A push-button reporting pressed and released events
pub struct DebouncedButton<P> {
    pin: P,
    input: InputId,
    active_low: bool,
    pressed: bool,
    /// Level seen differing from `pressed`, and since when
    pending: Option<(bool, u64)>,
}

impl<P: InputPin> DebouncedButton<P> {
    /// Active-low button reporting as `input`
    pub fn new(pin: P, input: InputId) -> Self {
        Self {
            pin,
            input,
            active_low: true,
            pressed: false,
            pending: None,
        }
    }

    /// Active-high button reporting as `input`
    pub fn active_high(pin: P, input: InputId) -> Self {
        Self {
            active_low: false,
            ..Self::new(pin, input)
        }
    }

    /// Debounced state
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Sample the pin at `now_ms`
    ///
    /// Returns the event reported by this sample, if any. The event is also
    /// posted to `sink`; a full queue drops it.
    pub fn poll<S: EventSink + ?Sized>(
        &mut self,
        now_ms: u64,
        sink: &S,
    ) -> Result<Option<InputEvent>, P::Error> {
        let high = self.pin.is_high()?;
        let level = high != self.active_low;

        if level == self.pressed {
            self.pending = None;
            return Ok(None);
        }

        match self.pending {
            Some((pending, since)) if pending == level => {
                if now_ms.saturating_sub(since) < BUTTON_DEBOUNCE_MS {
                    return Ok(None);
                }
            }
            _ => {
                self.pending = Some((level, now_ms));
                return Ok(None);
            }
        }

        self.pressed = level;
        self.pending = None;
        let event = InputEvent {
            input: self.input,
            state: level,
        };
        if !sink.post(event) {
            log::warn!("input queue full, dropped button {}", self.input.0);
        }
        Ok(Some(event))
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}
