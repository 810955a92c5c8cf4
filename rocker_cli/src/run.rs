//! Script replay: config mapping, rocker assembly, and tick accounting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rocker_config::{Config, ExtentCfg, PolarityCfg};
use rocker_core::error::Result as CoreResult;
use rocker_core::{DragExtent, IntervalConfig, Polarity, Rocker};
use rocker_traits::Tick;

use crate::script::Step;

/// What a replay produced, for the text and JSON summaries.
#[derive(Debug)]
pub struct RunSummary {
    pub ticks: usize,
    /// Running count driven by tick signs: +1 per positive tick, -1 per
    /// negative one. What a host widget would typically do with the stream.
    pub counter: i64,
    /// Tier at the moment the last session ended.
    pub final_tier: i32,
    pub interrupted: bool,
    pub tick_log: Vec<Tick>,
}

/// Map the `[extent]` config table to validated drag geometry.
pub fn resolve_extent(cfg: &ExtentCfg) -> CoreResult<DragExtent> {
    match *cfg {
        ExtentCfg::Length {
            length,
            indicator_radius,
        } => DragExtent::from_length(length, indicator_radius),
        ExtentCfg::Explicit {
            center,
            span,
            edge_margin,
        } => DragExtent::new(center, span, edge_margin),
    }
}

/// Merge config values with CLI overrides.
pub fn interval_config(
    cfg: &Config,
    interval_count: Option<u32>,
    base_rate_ms: Option<u64>,
) -> IntervalConfig {
    IntervalConfig {
        interval_count: interval_count.unwrap_or(cfg.rocker.interval_count),
        base_rate_ms: base_rate_ms.unwrap_or(cfg.rocker.base_rate_ms),
        polarity: match cfg.rocker.polarity {
            PolarityCfg::Low => Polarity::LowSide,
            PolarityCfg::High => Polarity::HighSide,
        },
    }
}

/// Drive a rocker through the script steps, pumping ticks as they arrive.
pub fn replay(
    extent: DragExtent,
    config: IntervalConfig,
    steps: &[Step],
    shutdown: &Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let counter = Arc::new(Mutex::new(0i64));
    let tick_log = Arc::new(Mutex::new(Vec::new()));
    let counter_in = Arc::clone(&counter);
    let log_in = Arc::clone(&tick_log);

    let mut rocker = Rocker::builder()
        .with_extent(extent)
        .with_interval_config(config)
        .with_listener(move |tick: Tick| {
            if let Ok(mut n) = counter_in.lock() {
                *n += if tick.is_positive() { 1 } else { -1 };
            }
            if let Ok(mut log) = log_in.lock() {
                log.push(tick);
            }
            tracing::debug!(tier = tick.tier, at_ms = tick.at_ms, "tick");
        })
        .build()?;

    let mut interrupted = false;
    let mut final_tier = 0;
    for step in steps {
        if shutdown.load(Ordering::Relaxed) {
            interrupted = true;
            break;
        }
        match *step {
            Step::Start => rocker.start_drag()?,
            Step::Move(delta) => {
                let tier = rocker.move_by(delta)?;
                rocker.pump()?;
                tracing::info!(position = rocker.position(), tier, "moved");
            }
            Step::Wait(ms) => {
                if wait_pumping(&mut rocker, ms, shutdown)? {
                    interrupted = true;
                    break;
                }
            }
            Step::End => {
                final_tier = rocker.tier();
                rocker.end_drag();
                rocker.pump()?;
            }
        }
    }
    // A script cut short by an interrupt or missing `end` still closes its
    // session so the timer stops.
    if rocker.is_dragging() {
        final_tier = rocker.tier();
        rocker.end_drag();
    }
    rocker.pump()?;

    let ticks = tick_log.lock().map(|l| l.clone()).unwrap_or_default();
    let counter = counter.lock().map(|n| *n).unwrap_or(0);
    Ok(RunSummary {
        ticks: ticks.len(),
        counter,
        final_tier,
        interrupted,
        tick_log: ticks,
    })
}

/// Sleep in short slices, pumping ticks as they arrive. Returns true when a
/// shutdown request cut the wait short.
fn wait_pumping(rocker: &mut Rocker, ms: u64, shutdown: &Arc<AtomicBool>) -> CoreResult<bool> {
    let deadline = Instant::now() + Duration::from_millis(ms);
    loop {
        rocker.pump()?;
        if shutdown.load(Ordering::Relaxed) {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        let slice = (deadline - now).min(Duration::from_millis(10));
        std::thread::sleep(slice);
    }
}

pub fn print_summary(summary: &RunSummary, show_ticks: bool) {
    if show_ticks {
        for t in &summary.tick_log {
            println!("tick {:+} at {} ms", t.tier, t.at_ms);
        }
    }
    println!("ticks: {}", summary.ticks);
    println!("counter: {}", summary.counter);
    println!("final tier: {}", summary.final_tier);
    if summary.interrupted {
        println!("interrupted: yes");
    }
}

pub fn format_summary_json(summary: &RunSummary) -> String {
    serde_json::json!({
        "ticks": summary.ticks,
        "counter": summary.counter,
        "final_tier": summary.final_tier,
        "interrupted": summary.interrupted,
    })
    .to_string()
}
