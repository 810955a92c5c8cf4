//! Offset-to-tier classification.
//!
//! The reachable range on each side of center is divided into
//! `interval_count` equal-width bins. An offset maps to the signed index of
//! the bin its magnitude falls in: bin boundaries belong to the inner bin, so
//! an offset sitting exactly on the first boundary still classifies as tier 1.

use crate::extent::DragExtent;
use crate::IntervalConfig;

/// Which side of center counts as positive.
///
/// Screen coordinates grow downward, so a vertical rocker treats a drag
/// toward numerically smaller positions as "up". That makes [`Polarity::LowSide`]
/// the default; use [`Polarity::HighSide`] when larger positions should read
/// as positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Polarity {
    #[default]
    LowSide,
    HighSide,
}

/// Map a position to its signed tier.
///
/// Returns 0 exactly at center (or for a non-finite position); otherwise a
/// value in `[-interval_count, interval_count]` whose sign follows the
/// configured polarity. Offsets beyond the edge margin saturate at the
/// outermost tier.
pub fn classify(position: f32, extent: &DragExtent, cfg: &IntervalConfig) -> i32 {
    let offset = position - extent.center();
    if offset == 0.0 || !offset.is_finite() {
        return 0;
    }
    let raw_side: i32 = if offset > 0.0 { 1 } else { -1 };
    let side = match cfg.polarity {
        Polarity::LowSide => -raw_side,
        Polarity::HighSide => raw_side,
    };
    let magnitude = offset.abs();
    let range = extent.edge_margin();
    let count = cfg.interval_count.min(i32::MAX as u32) as i32;
    for i in 1..=count {
        // Boundary magnitudes land in the inner bin. The full-range form
        // avoids accumulating width rounding across bins.
        if magnitude <= range * (i as f32) / (count as f32) {
            let tier = side * i;
            tracing::trace!(offset, magnitude, tier, "classified offset");
            return tier;
        }
    }
    // Beyond the edge margin (possible before clamping): saturate.
    side * count
}
