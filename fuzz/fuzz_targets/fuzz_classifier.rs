#![no_main]
use libfuzzer_sys::fuzz_target;

use rocker_core::{DragExtent, IntervalConfig, Polarity, classify};

fuzz_target!(|input: (f32, f32, f32, f32, u32, bool)| {
    let (center, span, edge_margin, position, count, high_side) = input;
    // Only geometry that passes validation reaches the classifier in production.
    let Ok(extent) = DragExtent::new(center, span, edge_margin) else {
        return;
    };
    // Stay inside the range config validation accepts, and keep the
    // per-exec cost bounded.
    let count = count % 1_024;
    let cfg = IntervalConfig {
        interval_count: count,
        base_rate_ms: 1,
        polarity: if high_side {
            Polarity::HighSide
        } else {
            Polarity::LowSide
        },
    };

    let position = extent.clamp(position);
    let tier = classify(position, &extent, &cfg);

    // Tier magnitude never exceeds the configured count, and the sign tracks
    // the offset: zero exactly at center, nonzero anywhere else.
    assert!(tier.unsigned_abs() <= count.max(1));
    let offset = position - extent.center();
    if offset == 0.0 {
        assert_eq!(tier, 0);
    } else if offset.is_finite() && count >= 1 {
        assert_ne!(tier, 0);
    }
});
