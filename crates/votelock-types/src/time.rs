//! Time and block-height primitives.
//!
//! Lockup ends are always aligned to a week boundary, so power drops
//! happen at predictable instants across all accounts.

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Chain block height.
pub type BlockNumber = u64;

/// Seconds in a day.
pub const DAY: u64 = 86_400;

/// Seconds in a week. All lockup ends are quantized to this.
pub const WEEK: u64 = 7 * DAY;

/// Round a timestamp down to the start of its UTC week.
pub const fn floor_week(ts: Timestamp) -> Timestamp {
    ts - (ts % WEEK)
}

/// Check whether a timestamp sits exactly on a week boundary.
pub const fn is_week_aligned(ts: Timestamp) -> bool {
    ts % WEEK == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_week() {
        assert_eq!(floor_week(0), 0);
        assert_eq!(floor_week(WEEK), WEEK);
        assert_eq!(floor_week(WEEK + 1), WEEK);
        assert_eq!(floor_week(3 * WEEK - 1), 2 * WEEK);
    }

    #[test]
    fn test_is_week_aligned() {
        assert!(is_week_aligned(0));
        assert!(is_week_aligned(52 * WEEK));
        assert!(!is_week_aligned(WEEK + DAY));
    }

    #[test]
    fn test_floor_week_is_aligned() {
        for ts in [1u64, DAY, WEEK - 1, WEEK + DAY, 123_456_789] {
            assert!(is_week_aligned(floor_week(ts)));
            assert!(floor_week(ts) <= ts);
            assert!(ts - floor_week(ts) < WEEK);
        }
    }
}
