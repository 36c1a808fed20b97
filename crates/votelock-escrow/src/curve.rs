//! Decay curve: instantaneous voting power from a lockup.
//!
//! Power decays linearly from `slope * (end - t)` down to zero at the
//! lockup end. All math is integer; the slope is `amount / max_lock_time`
//! with floor division, matching the reference escrow contract.

use votelock_types::Timestamp;

/// One lockup per account: a token amount held until a week-aligned end.
///
/// A zeroed lockup (`amount == 0`) represents "no lock". Expired lockups
/// keep their stored amount until an explicit withdrawal; only their
/// power reads as zero (lazy expiry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lockup {
    /// Locked token amount, in the staking token's base units.
    pub amount: u128,
    /// Unlock timestamp, aligned to a week boundary.
    pub end: Timestamp,
}

impl Lockup {
    /// Create a new lockup.
    pub fn new(amount: u128, end: Timestamp) -> Self {
        Self { amount, end }
    }

    /// Check if there is nothing locked.
    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Check if the lockup end has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.end <= now
    }
}

/// Power lost per second for this lockup.
pub fn slope(lockup: &Lockup, max_lock_time: u64) -> u128 {
    lockup.amount / max_lock_time as u128
}

/// Instantaneous voting power of a lockup at time `t`.
///
/// `power = (amount / max_lock_time) * max(end - t, 0)`
///
/// Exactly zero at or after `end`, and always zero for an empty lockup.
pub fn power_at(lockup: &Lockup, t: Timestamp, max_lock_time: u64) -> u128 {
    if lockup.amount == 0 || t >= lockup.end {
        return 0;
    }
    slope(lockup, max_lock_time) * (lockup.end - t) as u128
}
