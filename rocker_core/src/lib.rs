#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core slide rocker engine (toolkit-agnostic).
//!
//! A slide rocker turns a one-finger drag into a stream of signed ticks: the
//! farther the drag sits from its start point, the faster the ticks arrive.
//! All windowing-toolkit interaction stays behind the
//! `rocker_traits::SlideListener` and `rocker_traits::Clock` traits.
//!
//! ## Architecture
//!
//! - **Classification**: Offset-to-tier mapping over equal-width bins (`classifier` module)
//! - **Geometry**: Validated drag extents (`extent` module)
//! - **Emission**: One background timer worker per armed tier (`emitter` module)
//! - **Session**: Drag state machine and listener dispatch (`Rocker`)
//!
//! Tick cadence is `base_rate_ms / |tier|` milliseconds, floored at 1 ms.

// Module declarations
pub mod classifier;
pub mod emitter;
pub mod error;
pub mod extent;
pub mod mocks;
pub mod util;

pub use classifier::{classify, Polarity};
pub use extent::DragExtent;
pub use rocker_traits::{Clock, ManualClock, MonotonicClock, SlideListener, Tick};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::emitter::TickEmitter;
use crate::error::{BuildError, Report, Result, RockerError};

/// Rate configuration shared by every drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalConfig {
    /// Number of tiers on each side of center.
    pub interval_count: u32,
    /// Tick period at tier 1 in milliseconds; higher tiers divide it.
    pub base_rate_ms: u64,
    /// Which side of center counts as positive.
    pub polarity: Polarity,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            interval_count: 1,
            base_rate_ms: util::MILLIS_PER_SEC,
            polarity: Polarity::LowSide,
        }
    }
}

/// Touch-driven rate control: one drag session at a time, one timer at most.
///
/// Drive it with [`Rocker::start_drag`], [`Rocker::move_by`], and
/// [`Rocker::end_drag`], and call [`Rocker::pump`] from the owning context to
/// deliver queued ticks to the listener. The struct is single-threaded by
/// construction; only the internal timer worker runs elsewhere.
pub struct Rocker {
    extent: DragExtent,
    config: IntervalConfig,
    emitter: TickEmitter,
    listener: Option<Box<dyn SlideListener>>,
    position: f32,
    tier: i32,
    dragging: bool,
}

impl fmt::Debug for Rocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rocker")
            .field("extent", &self.extent)
            .field("config", &self.config)
            .field("position", &self.position)
            .field("tier", &self.tier)
            .field("dragging", &self.dragging)
            .field("listener", &self.listener.is_some())
            .field("timer_armed", &self.timer_armed())
            .finish()
    }
}

impl Rocker {
    pub fn builder() -> RockerBuilder<Missing> {
        RockerBuilder::default()
    }

    /// Current indicator position, clamped to the extent.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Signed tier of the current position; 0 at center.
    pub fn tier(&self) -> i32 {
        self.tier
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn timer_armed(&self) -> bool {
        self.emitter.armed_tier().is_some()
    }

    pub fn extent(&self) -> DragExtent {
        self.extent
    }

    pub fn interval_config(&self) -> IntervalConfig {
        self.config
    }

    /// Install or replace the tick listener. The last listener set wins.
    pub fn set_listener(&mut self, listener: impl SlideListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Open a drag session with the indicator at center.
    ///
    /// Fails with [`RockerError::State`] if a session is already active.
    /// Tick timestamps count from this call.
    pub fn start_drag(&mut self) -> Result<()> {
        if self.dragging {
            return Err(Report::new(RockerError::State("drag already active".into())));
        }
        self.dragging = true;
        self.position = self.extent.center();
        self.tier = 0;
        self.emitter.reset_epoch();
        tracing::debug!("drag start");
        Ok(())
    }

    /// Shift the indicator by `delta` and reconcile the timer with the new
    /// tier. Returns the tier the position now classifies to.
    ///
    /// Fails with [`RockerError::State`] when no drag is active or `delta`
    /// is not finite. Positions past the extent clamp to its edge.
    pub fn move_by(&mut self, delta: f32) -> Result<i32> {
        if !self.dragging {
            return Err(Report::new(RockerError::State(
                "move without active drag".into(),
            )));
        }
        if !delta.is_finite() {
            return Err(Report::new(RockerError::State(format!(
                "non-finite drag delta: {delta}"
            ))));
        }
        self.position = self.extent.clamp(self.position + delta);
        self.reconcile()
    }

    /// Close the drag session: stop the timer, discard queued ticks, and
    /// return the indicator to center. Calling without an active session is
    /// a no-op.
    pub fn end_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.reset_session();
        tracing::debug!("drag end");
    }

    /// Deliver queued ticks to the listener on the calling context.
    ///
    /// Returns the number of ticks dispatched. Without a listener installed,
    /// queued ticks are discarded. A timer worker that died on its own is
    /// treated as fatal: the session resets and [`RockerError::Timer`] is
    /// returned after any surviving ticks were delivered.
    pub fn pump(&mut self) -> Result<usize> {
        let died = self.emitter.worker_died();
        let mut dispatched = 0;
        for tick in self.emitter.drain() {
            if let Some(listener) = self.listener.as_mut() {
                listener.on_slide_update(tick);
                dispatched += 1;
            }
        }
        if died {
            self.reset_session();
            tracing::error!("timer worker exited unexpectedly; session reset");
            return Err(Report::new(RockerError::Timer(
                "timer worker exited unexpectedly".into(),
            )));
        }
        Ok(dispatched)
    }

    /// Swap the drag geometry.
    ///
    /// Mid-drag the current position re-clamps into the new extent and the
    /// timer reconciles against the re-classified tier; otherwise the
    /// indicator moves to the new center.
    pub fn set_extent(&mut self, extent: DragExtent) -> Result<()> {
        self.extent = extent;
        if self.dragging {
            self.position = self.extent.clamp(self.position);
            self.reconcile()?;
        } else {
            self.position = self.extent.center();
        }
        Ok(())
    }

    /// Change the tier count. Takes effect at the next position change.
    pub fn set_interval_count(&mut self, interval_count: u32) -> Result<()> {
        if interval_count == 0 {
            return Err(Report::new(RockerError::Config(
                "interval_count must be >= 1".into(),
            )));
        }
        self.config.interval_count = interval_count;
        Ok(())
    }

    /// Change the tier-1 period. Takes effect at the next position change.
    pub fn set_base_rate_ms(&mut self, base_rate_ms: u64) -> Result<()> {
        if base_rate_ms == 0 {
            return Err(Report::new(RockerError::Config(
                "base_rate_ms must be >= 1".into(),
            )));
        }
        self.config.base_rate_ms = base_rate_ms;
        Ok(())
    }

    /// Change which side counts as positive. Takes effect at the next
    /// position change.
    pub fn set_polarity(&mut self, polarity: Polarity) {
        self.config.polarity = polarity;
    }

    /// Replace the whole rate configuration. Takes effect at the next
    /// position change.
    pub fn set_interval_config(&mut self, config: IntervalConfig) -> Result<()> {
        if config.interval_count == 0 {
            return Err(Report::new(RockerError::Config(
                "interval_count must be >= 1".into(),
            )));
        }
        if config.base_rate_ms == 0 {
            return Err(Report::new(RockerError::Config(
                "base_rate_ms must be >= 1".into(),
            )));
        }
        self.config = config;
        Ok(())
    }

    /// Re-classify the current position and bring the timer in line with it.
    fn reconcile(&mut self) -> Result<i32> {
        let tier = classifier::classify(self.position, &self.extent, &self.config);
        self.tier = tier;
        if tier == 0 {
            if self.emitter.disarm() {
                tracing::debug!("timer disarmed at center");
            }
            return Ok(0);
        }
        let period = Duration::from_millis(util::period_for(
            self.config.base_rate_ms,
            tier.unsigned_abs(),
        ));
        match self.emitter.armed_tier() {
            None => {
                self.arm_or_fail(tier, period, true)?;
                tracing::debug!(tier, period_ms = period.as_millis() as u64, "timer armed");
            }
            Some(armed) if armed != tier || self.emitter.armed_period() != Some(period) => {
                self.arm_or_fail(tier, period, false)?;
                tracing::debug!(tier, period_ms = period.as_millis() as u64, "timer rearmed");
            }
            Some(_) => {}
        }
        Ok(tier)
    }

    fn arm_or_fail(&mut self, tier: i32, period: Duration, lead_tick: bool) -> Result<()> {
        if let Err(e) = self.emitter.arm(tier, period, lead_tick) {
            self.reset_session();
            tracing::error!(error = %e, "timer arm failed; session reset");
            return Err(e);
        }
        Ok(())
    }

    fn reset_session(&mut self) {
        self.emitter.disarm();
        self.dragging = false;
        self.tier = 0;
        self.position = self.extent.center();
    }
}

// Type-state markers for the builder
pub struct Missing;
pub struct Set;

/// Builder for `Rocker`. Configuration is validated on `build()`.
pub struct RockerBuilder<E> {
    extent: Option<DragExtent>,
    config: Option<IntervalConfig>,
    listener: Option<Box<dyn SlideListener>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    // Type-state marker
    _e: PhantomData<E>,
}

impl Default for RockerBuilder<Missing> {
    fn default() -> Self {
        Self {
            extent: None,
            config: None,
            listener: None,
            clock: None,
            _e: PhantomData,
        }
    }
}

impl<E> RockerBuilder<E> {
    /// Fallible build available in any type-state; returns a detailed
    /// `BuildError` for missing or invalid pieces.
    pub fn try_build(self) -> Result<Rocker> {
        let RockerBuilder {
            extent,
            config,
            listener,
            clock,
            _e: _,
        } = self;

        let extent = extent.ok_or_else(|| Report::new(BuildError::MissingExtent))?;
        let config = config.unwrap_or_default();

        if config.interval_count == 0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "interval_count must be >= 1",
            )));
        }
        if config.base_rate_ms == 0 {
            return Err(Report::new(BuildError::InvalidConfig(
                "base_rate_ms must be >= 1",
            )));
        }

        let clock: Arc<dyn Clock + Send + Sync> = match clock {
            Some(b) => Arc::from(b),
            None => Arc::new(MonotonicClock::new()),
        };

        let position = extent.center();
        Ok(Rocker {
            extent,
            config,
            emitter: TickEmitter::new(clock),
            listener,
            position,
            tier: 0,
            dragging: false,
        })
    }

    pub fn with_interval_config(mut self, config: IntervalConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_listener(mut self, listener: impl SlideListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Override the clock, mainly for tests.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }
}

// Setter that advances type-state when providing the mandatory extent
impl RockerBuilder<Missing> {
    pub fn with_extent(self, extent: DragExtent) -> RockerBuilder<Set> {
        let RockerBuilder {
            extent: _,
            config,
            listener,
            clock,
            _e: _,
        } = self;
        RockerBuilder {
            extent: Some(extent),
            config,
            listener,
            clock,
            _e: PhantomData,
        }
    }
}

impl RockerBuilder<Set> {
    /// Validate and build the Rocker. Only available once the extent is set.
    pub fn build(self) -> Result<Rocker> {
        self.try_build()
    }
}
