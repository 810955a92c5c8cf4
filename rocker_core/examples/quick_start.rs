//! Quick Start Example
//!
//! Demonstrates a scripted drag session against the rocker engine: a closure
//! listener keeps a running counter while the indicator is held off center.

use rocker_core::{DragExtent, IntervalConfig, MonotonicClock, Polarity, Rocker};
use rocker_traits::Clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Runs a short drag session over a 240-unit slider split into four tiers.
///
/// # Usage
///
/// Run via `cargo run --example quick_start`. The session holds three
/// positions in turn and prints every tick the engine emits, then the final
/// counter value.
///
/// # Errors
///
/// Returns an error if the rocker is misconfigured or the timer fails,
/// surfaced as an `eyre::Report`.
fn main() -> Result<(), eyre::Report> {
    // Local monotonic clock shared with the builder
    let clock = MonotonicClock::new();

    // 240-unit slider with a 20-unit indicator leaves a 100-unit margin per side
    let extent = DragExtent::from_length(240.0, 20.0)?;

    let counter = Arc::new(Mutex::new(0i64));
    let counter_in = Arc::clone(&counter);

    let mut rocker = Rocker::builder()
        .with_extent(extent)
        .with_interval_config(IntervalConfig {
            interval_count: 4,
            base_rate_ms: 400,
            polarity: Polarity::HighSide,
        })
        .with_listener(move |tick: rocker_core::Tick| {
            if let Ok(mut n) = counter_in.lock() {
                *n += if tick.is_positive() { 1 } else { -1 };
            }
            println!("tick {:+} at {} ms", tick.tier, tick.at_ms);
        })
        .with_clock(clock)
        .build()?;

    rocker.start_drag()?;

    // 50 ms pump cadence while each position is held
    let pump_tick = Duration::from_millis(50);
    for (delta, hold_ms) in [(30.0, 900), (45.0, 900), (-140.0, 900)] {
        let tier = rocker.move_by(delta)?;
        println!("held at {:.0} (tier {tier:+})", rocker.position());

        let held_from = clock.now();
        while clock.ms_since(held_from) < hold_ms {
            rocker.pump()?;
            clock.sleep(pump_tick);
        }
    }

    rocker.end_drag();
    rocker.pump()?;

    let total = counter.lock().map(|n| *n).unwrap_or(0);
    println!("counter = {total}");

    Ok(())
}
