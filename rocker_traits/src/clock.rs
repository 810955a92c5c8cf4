//! Time sources for tick stamping and replay pacing.
//!
//! Everything the rocker does with time flows through [`Clock`]: the timer
//! worker stamps each emitted tick relative to the drag epoch, and pump loops
//! sleep between passes. Injecting the clock at build time keeps both on one
//! source, so swapping in [`ManualClock`] makes timestamp assertions exact
//! instead of wall-time dependent.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Time source behind tick stamping and replay pacing.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Block, or simulate blocking, for `d`.
    fn sleep(&self, d: Duration);

    /// Whole milliseconds elapsed since `epoch`; 0 when `epoch` has not been
    /// reached yet.
    fn ms_since(&self, epoch: Instant) -> u64 {
        self.now().saturating_duration_since(epoch).as_millis() as u64
    }
}

/// Real-time clock backed by `Instant`; the default when none is injected.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        // Zero-length pump cadences skip the scheduler round trip.
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

/// Clock that only moves when told to.
///
/// `now()` reports a fixed origin plus an offset held in microseconds, and
/// `sleep` advances the offset instead of blocking, so hold loops finish
/// instantly under test. Clones share the offset: a test keeps one handle to
/// drive time while the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_us: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_us: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward by `d`.
    pub fn advance(&self, d: Duration) {
        let us = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        self.offset_us.fetch_add(us, Ordering::SeqCst);
    }

    /// Move time forward by whole milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute offset from the origin, forward or back.
    pub fn set_ms(&self, ms: u64) {
        self.offset_us
            .store(ms.saturating_mul(1_000), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_micros(self.offset_us.load(Ordering::SeqCst))
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}
