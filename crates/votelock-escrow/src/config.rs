//! Escrow ledger configuration.

use votelock_types::DAY;

/// Tunable parameters of the escrow ledger.
#[derive(Debug, Clone)]
pub struct EscrowConfig {
    /// Maximum lockup duration in seconds. Power is `amount` scaled by
    /// the remaining fraction of this window.
    pub max_lock_time: u64,
    /// Minimum lockup duration in seconds.
    pub min_lock_duration: u64,
    /// Maximum delegators a single delegate may accumulate.
    pub max_delegators: usize,
    /// Raw power at or below this counts as dust for delegator pruning.
    pub dust_threshold: u128,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            max_lock_time: 4 * 365 * DAY, // 4 years
            min_lock_duration: DAY,
            max_delegators: 64,
            dust_threshold: 0,
        }
    }
}

impl EscrowConfig {
    /// Latest permitted lockup end for a lock created at `now`,
    /// before week alignment.
    pub fn max_end(&self, now: u64) -> u64 {
        now + self.max_lock_time
    }
}
