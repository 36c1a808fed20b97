//! Clock and block-height collaborator.
//!
//! Timestamps and heights are supplied by the host environment; the
//! ledger only requires that both never move backwards.

use votelock_types::{BlockNumber, Timestamp};

/// Source of the current time and chain height.
pub trait ChainClock {
    /// Current timestamp in seconds.
    fn now(&self) -> Timestamp;

    /// Current block height.
    fn current_height(&self) -> BlockNumber;
}

/// Manually advanced clock for tests and simulation.
///
/// Modeled on a dev-chain fixture: `sleep` advances time without mining,
/// `mine` seals a block.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Timestamp,
    height: BlockNumber,
}

impl ManualClock {
    /// Create a clock at the given time and height.
    pub fn new(now: Timestamp, height: BlockNumber) -> Self {
        Self { now, height }
    }

    /// Advance time by `secs` without sealing a block.
    pub fn sleep(&mut self, secs: u64) {
        self.now += secs;
    }

    /// Seal one block.
    pub fn mine(&mut self) {
        self.height += 1;
    }

    /// Seal `n` blocks, `interval` seconds apart.
    pub fn mine_blocks(&mut self, n: u64, interval: u64) {
        self.height += n;
        self.now += n * interval;
    }
}

impl ChainClock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn current_height(&self) -> BlockNumber {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::new(1000, 5);
        assert_eq!(clock.now(), 1000);
        assert_eq!(clock.current_height(), 5);

        clock.sleep(60);
        assert_eq!(clock.now(), 1060);
        assert_eq!(clock.current_height(), 5);

        clock.mine();
        assert_eq!(clock.current_height(), 6);

        clock.mine_blocks(10, 15);
        assert_eq!(clock.current_height(), 16);
        assert_eq!(clock.now(), 1060 + 150);
    }
}
