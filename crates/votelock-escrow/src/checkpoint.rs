//! Append-only checkpoint history for point-in-time power queries.
//!
//! Each subject (an account, or the global total) owns an ordered series
//! of `(block, power)` samples. Past entries are never rewritten; a second
//! write in the same block collapses onto the last entry. Historical
//! lookups binary-search for the greatest checkpoint at or before the
//! queried block.

use std::collections::HashMap;

use crate::error::EscrowError;
use votelock_types::{Address, BlockNumber};

/// Immutable `(block, power)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Block at which the sample was taken.
    pub block: BlockNumber,
    /// Voting power recorded at that block.
    pub power: u128,
}

/// Ordered checkpoint sequence for one subject.
///
/// Invariant: blocks strictly increase across entries.
#[derive(Debug, Clone, Default)]
pub struct CheckpointSeries {
    entries: Vec<Checkpoint>,
}

impl CheckpointSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of checkpoints recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no checkpoints have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Block of the most recent checkpoint, if any.
    pub fn last_block(&self) -> Option<BlockNumber> {
        self.entries.last().map(|c| c.block)
    }

    /// Record `power` at `block`.
    ///
    /// A write at the current last block overwrites that entry (several
    /// updates within one block collapse to the final value). Writes at
    /// earlier blocks fail with `InvalidOrdering`; a monotonic block
    /// clock makes that unreachable for correct callers.
    pub fn append(&mut self, block: BlockNumber, power: u128) -> Result<(), EscrowError> {
        match self.entries.last_mut() {
            Some(last) if last.block == block => {
                last.power = power;
                Ok(())
            }
            Some(last) if last.block > block => Err(EscrowError::InvalidOrdering {
                last: last.block,
                block,
            }),
            _ => {
                self.entries.push(Checkpoint { block, power });
                Ok(())
            }
        }
    }

    /// Power recorded by the greatest checkpoint at or before `block`.
    ///
    /// Returns 0 when the series is empty or `block` predates the first
    /// entry. Querying beyond `current_height` fails with `FutureBlock`
    /// rather than zero-filling, to catch caller error.
    pub fn value_at(
        &self,
        block: BlockNumber,
        current_height: BlockNumber,
    ) -> Result<u128, EscrowError> {
        if block > current_height {
            return Err(EscrowError::FutureBlock {
                block,
                height: current_height,
            });
        }
        let idx = self.entries.partition_point(|c| c.block <= block);
        Ok(if idx == 0 { 0 } else { self.entries[idx - 1].power })
    }

    /// Power of the most recent checkpoint, or 0 when empty. O(1).
    pub fn current(&self) -> u128 {
        self.entries.last().map(|c| c.power).unwrap_or(0)
    }

    /// Verify that a write at `block` would respect ordering.
    ///
    /// Lets callers fail an operation before making any state change.
    pub fn check_ordered(&self, block: BlockNumber) -> Result<(), EscrowError> {
        match self.last_block() {
            Some(last) if last > block => Err(EscrowError::InvalidOrdering { last, block }),
            _ => Ok(()),
        }
    }
}

/// Checkpoint series for every account plus the global total supply.
#[derive(Debug, Clone, Default)]
pub struct CheckpointStore {
    accounts: HashMap<Address, CheckpointSeries>,
    total: CheckpointSeries,
}

impl CheckpointStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an account's power at `block`.
    pub fn append_account(
        &mut self,
        account: Address,
        block: BlockNumber,
        power: u128,
    ) -> Result<(), EscrowError> {
        self.accounts.entry(account).or_default().append(block, power)
    }

    /// Record the global total power at `block`.
    pub fn append_total(&mut self, block: BlockNumber, power: u128) -> Result<(), EscrowError> {
        self.total.append(block, power)
    }

    /// Account power as of `block`.
    pub fn account_value_at(
        &self,
        account: &Address,
        block: BlockNumber,
        current_height: BlockNumber,
    ) -> Result<u128, EscrowError> {
        match self.accounts.get(account) {
            Some(series) => series.value_at(block, current_height),
            // The future-block guard applies even to never-seen accounts.
            None => CheckpointSeries::new().value_at(block, current_height),
        }
    }

    /// Global total power as of `block`.
    pub fn total_value_at(
        &self,
        block: BlockNumber,
        current_height: BlockNumber,
    ) -> Result<u128, EscrowError> {
        self.total.value_at(block, current_height)
    }

    /// Latest recorded power for an account.
    pub fn account_current(&self, account: &Address) -> u128 {
        self.accounts.get(account).map(|s| s.current()).unwrap_or(0)
    }

    /// Latest recorded global total power.
    pub fn total_current(&self) -> u128 {
        self.total.current()
    }

    /// Verify that an account write at `block` would respect ordering.
    pub fn check_account_ordered(
        &self,
        account: &Address,
        block: BlockNumber,
    ) -> Result<(), EscrowError> {
        match self.accounts.get(account) {
            Some(series) => series.check_ordered(block),
            None => Ok(()),
        }
    }

    /// Verify that a total-supply write at `block` would respect ordering.
    pub fn check_total_ordered(&self, block: BlockNumber) -> Result<(), EscrowError> {
        self.total.check_ordered(block)
    }
}
