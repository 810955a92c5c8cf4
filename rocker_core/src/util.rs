//! Common period helpers for rocker_core.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the emission period in milliseconds for a tier magnitude.
/// - Clamps `magnitude` to at least 1 to avoid division by zero.
/// - Integer division; the result is floored to at least 1 millisecond, so a
///   magnitude larger than `base_rate_ms` pins the period at 1 ms instead of
///   rounding to 0.
#[inline]
pub fn period_for(base_rate_ms: u64, magnitude: u32) -> u64 {
    (base_rate_ms / u64::from(magnitude.max(1))).max(1)
}

#[cfg(test)]
mod tests {
    use super::period_for;

    #[test]
    fn divides_base_rate_by_magnitude() {
        assert_eq!(period_for(1000, 1), 1000);
        assert_eq!(period_for(1000, 2), 500);
        assert_eq!(period_for(1000, 4), 250);
    }

    #[test]
    fn integer_division_truncates() {
        assert_eq!(period_for(1000, 3), 333);
        assert_eq!(period_for(3, 2), 1);
    }

    #[test]
    fn floors_at_one_millisecond() {
        // Magnitude above the base rate would otherwise round the period to 0.
        assert_eq!(period_for(2, 5), 1);
        assert_eq!(period_for(1, u32::MAX), 1);
    }

    #[test]
    fn zero_magnitude_is_treated_as_one() {
        assert_eq!(period_for(1000, 0), 1000);
    }
}
