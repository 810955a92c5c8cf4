//! Background tick emission.
//!
//! [`TickEmitter`] owns at most one timer worker thread at a time. The worker
//! parks on a cancel channel with a timeout equal to the tick period, so it
//! either wakes to emit a tick or returns promptly when the emitter drops its
//! cancel handle. Ticks cross back over a bounded channel tagged with an arm
//! generation; [`TickEmitter::drain`] filters out ticks queued by superseded
//! timers.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use rocker_traits::{Clock, Tick};

use crate::error::{Report, Result, RockerError};

/// Queued-but-unpumped ticks per session. Timers outpacing the pump drop
/// ticks rather than grow the queue.
const TICK_BUFFER: usize = 8;

struct RawTick {
    generation: u64,
    tick: Tick,
}

struct TimerHandle {
    tier: i32,
    period: Duration,
    cancel_tx: Sender<()>,
    join: JoinHandle<()>,
}

pub struct TickEmitter {
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    tick_tx: Sender<RawTick>,
    tick_rx: Receiver<RawTick>,
    generation: u64,
    handle: Option<TimerHandle>,
}

impl TickEmitter {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let epoch = clock.now();
        let (tick_tx, tick_rx) = bounded(TICK_BUFFER);
        Self {
            clock,
            epoch,
            tick_tx,
            tick_rx,
            generation: 0,
            handle: None,
        }
    }

    /// Restart the timestamp origin; tick `at_ms` values count from here.
    pub fn reset_epoch(&mut self) {
        self.epoch = self.clock.now();
    }

    pub fn armed_tier(&self) -> Option<i32> {
        self.handle.as_ref().map(|h| h.tier)
    }

    pub fn armed_period(&self) -> Option<Duration> {
        self.handle.as_ref().map(|h| h.period)
    }

    /// True when an armed worker has exited on its own, which only happens
    /// on a worker panic.
    pub fn worker_died(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.join.is_finished())
    }

    /// Replace any running timer with one ticking every `period` for `tier`.
    ///
    /// With `lead_tick` the worker queues one tick immediately on start
    /// before settling into the periodic cadence.
    pub fn arm(&mut self, tier: i32, period: Duration, lead_tick: bool) -> Result<()> {
        debug_assert!(tier != 0, "tier 0 never arms a timer");
        self.disarm();
        self.generation = self.generation.wrapping_add(1);

        let (cancel_tx, cancel_rx) = bounded::<()>(0);
        let clock = Arc::clone(&self.clock);
        let epoch = self.epoch;
        let generation = self.generation;
        let tick_tx = self.tick_tx.clone();
        let join = thread::Builder::new()
            .name("rocker-timer".into())
            .spawn(move || {
                tracing::trace!(
                    tier,
                    period_ms = period.as_millis() as u64,
                    "timer worker up"
                );
                if lead_tick && !queue_tick(&tick_tx, &*clock, epoch, generation, tier) {
                    return;
                }
                loop {
                    match cancel_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            if !queue_tick(&tick_tx, &*clock, epoch, generation, tier) {
                                return;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
            })
            .map_err(|e| {
                Report::new(RockerError::Timer(format!(
                    "failed to spawn timer thread: {e}"
                )))
            })?;

        self.handle = Some(TimerHandle {
            tier,
            period,
            cancel_tx,
            join,
        });
        Ok(())
    }

    /// Stop the running timer, if any. Joins the worker and discards ticks
    /// it queued before stopping. Returns whether a timer was running.
    pub fn disarm(&mut self) -> bool {
        let Some(TimerHandle {
            tier,
            cancel_tx,
            join,
            ..
        }) = self.handle.take()
        else {
            return false;
        };
        drop(cancel_tx);
        if join.join().is_err() {
            tracing::warn!(tier, "timer worker panicked");
        }
        let stale = self.tick_rx.try_iter().count();
        if stale > 0 {
            tracing::trace!(stale, "discarded queued ticks on disarm");
        }
        true
    }

    /// Pull every queued tick from the current timer generation.
    pub fn drain(&self) -> impl Iterator<Item = Tick> + '_ {
        let generation = self.generation;
        self.tick_rx
            .try_iter()
            .filter_map(move |raw| (raw.generation == generation).then_some(raw.tick))
    }
}

impl Drop for TickEmitter {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Returns false once the consumer side is gone and the worker should exit.
fn queue_tick(
    tx: &Sender<RawTick>,
    clock: &(dyn Clock + Send + Sync),
    epoch: Instant,
    generation: u64,
    tier: i32,
) -> bool {
    let tick = Tick {
        tier,
        at_ms: clock.ms_since(epoch),
    };
    match tx.try_send(RawTick { generation, tick }) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(tier, "tick buffer full, dropping tick");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
