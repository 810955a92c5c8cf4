/// One emission of the rocker's repeating timer.
///
/// `tier` is the signed speed tier the timer was armed with (never 0 in a
/// delivered tick). Direction is carried by the sign alone; there is no
/// separate polarity field to drift out of sync with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Signed speed tier at emission time.
    pub tier: i32,
    /// Milliseconds since the owning control's epoch, per its `Clock`.
    pub at_ms: u64,
}

impl Tick {
    /// True when the indicator is pulled toward the increasing-value edge.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.tier > 0
    }

    /// Unsigned tier magnitude.
    #[inline]
    pub fn magnitude(&self) -> u32 {
        self.tier.unsigned_abs()
    }
}

/// Observer for rocker emissions.
///
/// Invoked on the thread that owns the control, never on the timer's own
/// thread. At most one listener is registered at a time; dispatch is
/// fire-and-forget with no queueing guarantees.
pub trait SlideListener {
    fn on_slide_update(&mut self, tick: Tick);
}

impl<F: FnMut(Tick)> SlideListener for F {
    fn on_slide_update(&mut self, tick: Tick) {
        self(tick)
    }
}
