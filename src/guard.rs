//! Mutual exclusion around controller command sequences
//!
//! The display driver wraps every multi-step command sequence in a
//! [`BusGuard`] so that another task sharing the SPI bus cannot interleave
//! its own transfers. The guard is scoped to a closure, which makes it
//! impossible to leave it held on an early return.
//!
//! Single-task firmware uses [`NoopRawMutex`] (the default); firmware that
//! drives the panel from several tasks or interrupt handlers uses
//! [`CriticalSectionRawMutex`].

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex, RawMutex};

/// Scoped exclusive access to the display transport
pub trait BusGuard {
    /// Run `f` with the guard held
    ///
    /// The guard is released when `f` returns, whatever it returns.
    fn lock<R>(&self, f: impl FnOnce() -> R) -> R;
}

impl BusGuard for NoopRawMutex {
    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        RawMutex::lock(self, f)
    }
}

impl BusGuard for CriticalSectionRawMutex {
    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        RawMutex::lock(self, f)
    }
}

impl<G: BusGuard + ?Sized> BusGuard for &G {
    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).lock(f)
    }
}
