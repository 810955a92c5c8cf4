use std::thread;
use std::time::{Duration, Instant};

use rocker_core::error::RockerError;
use rocker_core::mocks::CollectingListener;
use rocker_core::{Clock, DragExtent, IntervalConfig, ManualClock, Polarity, Rocker};

/// Long enough that periodic ticks never fire inside a test run; only the
/// lead tick emitted on arming is observable.
const SLOW_BASE_MS: u64 = 3_600_000;

fn extent_100() -> DragExtent {
    DragExtent::new(0.0, 100.0, 100.0).unwrap()
}

fn rocker_with_listener(base_rate_ms: u64) -> (Rocker, CollectingListener) {
    let listener = CollectingListener::new();
    let rocker = Rocker::builder()
        .with_extent(extent_100())
        .with_interval_config(IntervalConfig {
            interval_count: 4,
            base_rate_ms,
            polarity: Polarity::HighSide,
        })
        .with_listener(listener.clone())
        .build()
        .unwrap();
    (rocker, listener)
}

fn pump_until(rocker: &mut Rocker, listener: &CollectingListener, want: usize) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while listener.len() < want {
        rocker.pump().unwrap();
        assert!(
            Instant::now() < deadline,
            "expected {want} ticks, saw {}",
            listener.len()
        );
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn move_before_start_is_a_state_error() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    let err = rocker
        .move_by(10.0)
        .expect_err("idle rocker must reject moves");
    match err.downcast_ref::<RockerError>() {
        Some(RockerError::State(msg)) => assert!(msg.contains("without active drag")),
        other => panic!("expected State error, got: {other:?}"),
    }
    assert!(!rocker.is_dragging());
}

#[test]
fn double_start_is_rejected() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    let err = rocker.start_drag().expect_err("second start must fail");
    match err.downcast_ref::<RockerError>() {
        Some(RockerError::State(msg)) => assert!(msg.contains("already active")),
        other => panic!("expected State error, got: {other:?}"),
    }
    rocker.end_drag();
    rocker.start_drag().unwrap();
}

#[test]
fn end_drag_is_idempotent() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.end_drag();
    rocker.start_drag().unwrap();
    rocker.move_by(50.0).unwrap();
    rocker.end_drag();
    rocker.end_drag();
    assert!(!rocker.is_dragging());
    assert!(!rocker.timer_armed());
    assert_eq!(rocker.tier(), 0);
}

#[test]
fn moves_accumulate_and_clamp_at_the_extent() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(30.0).unwrap(), 2);
    assert_eq!(rocker.position(), 30.0);
    assert_eq!(rocker.move_by(470.0).unwrap(), 4);
    assert_eq!(rocker.position(), 100.0);
    assert_eq!(rocker.move_by(-250.0).unwrap(), -4);
    assert_eq!(rocker.position(), -100.0);
}

#[test]
fn non_finite_deltas_are_rejected() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert!(rocker.move_by(f32::NAN).is_err());
    assert!(rocker.move_by(f32::INFINITY).is_err());
    // The session stays usable after a rejected input.
    assert_eq!(rocker.move_by(30.0).unwrap(), 2);
}

#[test]
fn lead_tick_arrives_immediately_on_arming() {
    let (mut rocker, listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(100.0).unwrap(), 4);
    pump_until(&mut rocker, &listener, 1);
    let ticks = listener.ticks();
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].tier, 4);
    assert!(ticks[0].is_positive());
    // Timestamps count from drag start; the lead tick fires right away.
    assert!(ticks[0].at_ms < 2_000);
    // The next periodic tick is the better part of an hour out.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(rocker.pump().unwrap(), 0);
}

#[test]
fn timestamps_count_from_drag_start() {
    let clock = ManualClock::new();
    let listener = CollectingListener::new();
    let mut rocker = Rocker::builder()
        .with_extent(extent_100())
        .with_interval_config(IntervalConfig {
            interval_count: 4,
            base_rate_ms: SLOW_BASE_MS,
            polarity: Polarity::HighSide,
        })
        .with_listener(listener.clone())
        .with_clock(clock.clone())
        .build()
        .unwrap();

    // Time that passes before the drag never shows up in at_ms.
    clock.advance_ms(5_000);
    rocker.start_drag().unwrap();
    clock.advance_ms(250);
    rocker.move_by(100.0).unwrap();
    pump_until(&mut rocker, &listener, 1);
    assert_eq!(listener.ticks()[0].at_ms, 250);
    rocker.end_drag();
}

#[test]
fn returning_to_center_disarms_but_keeps_dragging() {
    let (mut rocker, listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(75.0).unwrap(), 3);
    assert!(rocker.timer_armed());
    assert_eq!(rocker.move_by(-75.0).unwrap(), 0);
    assert!(!rocker.timer_armed());
    assert!(rocker.is_dragging());
    // Anything the superseded timer queued never surfaces.
    assert_eq!(rocker.pump().unwrap(), 0);
    assert!(listener.is_empty());

    // Leaving center again arms a fresh timer whose lead tick comes through.
    assert_eq!(rocker.move_by(25.0).unwrap(), 1);
    pump_until(&mut rocker, &listener, 1);
    assert!(listener.ticks().iter().all(|t| t.tier == 1));
}

#[test]
fn ticks_after_a_tier_change_use_only_the_new_tier() {
    let (mut rocker, listener) = rocker_with_listener(40);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(100.0).unwrap(), 4);
    thread::sleep(Duration::from_millis(80));
    assert_eq!(rocker.move_by(-90.0).unwrap(), 1);
    pump_until(&mut rocker, &listener, 1);
    let ticks = listener.ticks();
    assert!(
        ticks.iter().all(|t| t.tier == 1),
        "stale ticks leaked: {ticks:?}"
    );
    rocker.end_drag();
}

#[test]
fn rapid_tier_alternation_never_leaks_superseded_ticks() {
    let (mut rocker, listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(10.0).unwrap(), 1);
    assert_eq!(rocker.move_by(65.0).unwrap(), 3);
    assert_eq!(rocker.move_by(-65.0).unwrap(), 1);
    // Only the very first arm queues a lead tick, and each rearm joins the
    // old worker and discards what it had queued, so nothing survives the
    // 1 -> 3 -> 1 walk.
    assert_eq!(rocker.pump().unwrap(), 0);
    assert!(listener.is_empty());
    rocker.end_drag();
}

#[test]
fn no_ticks_dispatch_after_end_drag() {
    let (mut rocker, listener) = rocker_with_listener(30);
    rocker.start_drag().unwrap();
    rocker.move_by(100.0).unwrap();
    thread::sleep(Duration::from_millis(70));
    rocker.end_drag();
    thread::sleep(Duration::from_millis(70));
    assert_eq!(rocker.pump().unwrap(), 0);
    assert!(listener.is_empty());
}

#[test]
fn listener_replacement_last_wins() {
    let first = CollectingListener::new();
    let second = CollectingListener::new();
    let mut rocker = Rocker::builder()
        .with_extent(extent_100())
        .with_interval_config(IntervalConfig {
            interval_count: 4,
            base_rate_ms: 40,
            polarity: Polarity::HighSide,
        })
        .with_listener(first.clone())
        .build()
        .unwrap();

    rocker.start_drag().unwrap();
    rocker.move_by(100.0).unwrap();
    pump_until(&mut rocker, &first, 1);

    rocker.set_listener(second.clone());
    let frozen = first.len();
    pump_until(&mut rocker, &second, 1);
    assert_eq!(first.len(), frozen);
    assert!(!second.is_empty());
    rocker.end_drag();
}

#[test]
fn pump_without_listener_discards_ticks() {
    let mut rocker = Rocker::builder()
        .with_extent(extent_100())
        .with_interval_config(IntervalConfig {
            interval_count: 4,
            base_rate_ms: 40,
            polarity: Polarity::HighSide,
        })
        .build()
        .unwrap();
    rocker.start_drag().unwrap();
    rocker.move_by(100.0).unwrap();
    thread::sleep(Duration::from_millis(60));
    assert_eq!(rocker.pump().unwrap(), 0);

    // A listener installed later sees only fresh ticks.
    let listener = CollectingListener::new();
    rocker.set_listener(listener.clone());
    pump_until(&mut rocker, &listener, 1);
    assert!(listener.ticks().iter().all(|t| t.tier == 4));

    // Clearing the slot returns to silent draining.
    rocker.clear_listener();
    thread::sleep(Duration::from_millis(60));
    assert_eq!(rocker.pump().unwrap(), 0);
    rocker.end_drag();
}

#[test]
fn setters_reject_zero_values() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    let err = rocker.set_interval_count(0).expect_err("zero count");
    match err.downcast_ref::<RockerError>() {
        Some(RockerError::Config(msg)) => assert!(msg.contains("interval_count")),
        other => panic!("expected Config error, got: {other:?}"),
    }
    let err = rocker.set_base_rate_ms(0).expect_err("zero base rate");
    match err.downcast_ref::<RockerError>() {
        Some(RockerError::Config(msg)) => assert!(msg.contains("base_rate_ms")),
        other => panic!("expected Config error, got: {other:?}"),
    }
    let bad = IntervalConfig {
        interval_count: 0,
        base_rate_ms: 10,
        polarity: Polarity::LowSide,
    };
    assert!(rocker.set_interval_config(bad).is_err());
    // Rejected values leave the config untouched.
    assert_eq!(rocker.interval_config().interval_count, 4);
    assert_eq!(rocker.interval_config().base_rate_ms, SLOW_BASE_MS);

    rocker.set_interval_count(8).unwrap();
    rocker.set_base_rate_ms(500).unwrap();
    rocker.set_polarity(Polarity::LowSide);
    let cfg = rocker.interval_config();
    assert_eq!(cfg.interval_count, 8);
    assert_eq!(cfg.base_rate_ms, 500);
    assert_eq!(cfg.polarity, Polarity::LowSide);
}

#[test]
fn config_changes_apply_at_the_next_move() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(30.0).unwrap(), 2);
    rocker.set_interval_count(8).unwrap();
    assert_eq!(rocker.tier(), 2); // unchanged until the next move
    assert_eq!(rocker.move_by(0.0).unwrap(), 3); // 30 of 100 across 8 bins
    rocker.end_drag();
}

#[test]
fn swapping_extent_mid_drag_reclassifies() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    rocker.start_drag().unwrap();
    assert_eq!(rocker.move_by(30.0).unwrap(), 2);
    // Narrower reachable range: the same position now sits in the top tier.
    let narrow = DragExtent::new(0.0, 30.0, 30.0).unwrap();
    rocker.set_extent(narrow).unwrap();
    assert_eq!(rocker.tier(), 4);
    assert_eq!(rocker.position(), 30.0);
    assert!(rocker.is_dragging());

    // While idle the indicator recenters instead.
    rocker.end_drag();
    let wide = DragExtent::new(50.0, 80.0, 80.0).unwrap();
    rocker.set_extent(wide).unwrap();
    assert_eq!(rocker.position(), 50.0);
}

#[test]
fn timer_state_tracks_tier_through_a_walk() {
    let (mut rocker, _listener) = rocker_with_listener(SLOW_BASE_MS);
    let check = |r: &Rocker| {
        assert_eq!(r.timer_armed(), r.is_dragging() && r.tier() != 0);
    };
    check(&rocker);
    rocker.start_drag().unwrap();
    check(&rocker);
    for delta in [10.0, 40.0, -25.0, -25.0, 75.0, -175.0, 100.0] {
        rocker.move_by(delta).unwrap();
        check(&rocker);
    }
    rocker.end_drag();
    check(&rocker);
}

/// Clock whose `now()` panics off the owning thread, so the timer worker
/// dies on its first read while builder and session calls stay fine.
#[derive(Debug)]
struct WorkerPanicClock {
    origin: Instant,
    owner: thread::ThreadId,
}

impl WorkerPanicClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            owner: thread::current().id(),
        }
    }
}

impl Clock for WorkerPanicClock {
    fn now(&self) -> Instant {
        assert_eq!(
            thread::current().id(),
            self.owner,
            "clock read off the owner thread"
        );
        self.origin
    }

    fn sleep(&self, _d: Duration) {}
}

#[test]
fn timer_fault_resets_the_session() {
    let listener = CollectingListener::new();
    let mut rocker = Rocker::builder()
        .with_extent(extent_100())
        .with_interval_config(IntervalConfig {
            interval_count: 4,
            base_rate_ms: 20,
            polarity: Polarity::HighSide,
        })
        .with_listener(listener.clone())
        .with_clock(WorkerPanicClock::new())
        .build()
        .unwrap();

    rocker.start_drag().unwrap();
    rocker.move_by(100.0).unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    let err = loop {
        match rocker.pump() {
            Err(e) => break e,
            Ok(_) => {
                assert!(Instant::now() < deadline, "worker fault never surfaced");
                thread::sleep(Duration::from_millis(5));
            }
        }
    };
    match err.downcast_ref::<RockerError>() {
        Some(RockerError::Timer(_)) => {}
        other => panic!("expected Timer error, got: {other:?}"),
    }
    assert!(!rocker.is_dragging());
    assert!(!rocker.timer_armed());
    assert!(listener.is_empty());
}
