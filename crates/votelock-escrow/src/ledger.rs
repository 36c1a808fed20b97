//! The escrow ledger: lockup lifecycle, delegation, and balance queries.
//!
//! A single sequential state machine. Every mutating operation validates,
//! settles the token leg, then updates the lockup/delegation state and
//! appends checkpoints as one unit; on any error nothing is written.
//! Callers needing parallel access wrap the whole ledger in one mutex,
//! since checkpoint ordering is correctness-critical.

use std::collections::HashMap;

use tracing::{debug, info};
use votelock_types::{is_week_aligned, Address, BlockNumber, Timestamp};

use crate::checkpoint::CheckpointStore;
use crate::clock::ChainClock;
use crate::config::EscrowConfig;
use crate::curve::{power_at, Lockup};
use crate::delegation::DelegationGraph;
use crate::error::EscrowError;
use crate::token::StakingToken;

/// Vote-escrow ledger over a staking token and a chain clock.
pub struct EscrowLedger<T, C> {
    config: EscrowConfig,
    token: T,
    clock: C,
    /// One lockup per account; zeroed on withdrawal, never removed.
    lockups: HashMap<Address, Lockup>,
    graph: DelegationGraph,
    store: CheckpointStore,
}

impl<T: StakingToken, C: ChainClock> EscrowLedger<T, C> {
    /// Create an empty ledger.
    pub fn new(config: EscrowConfig, token: T, clock: C) -> Self {
        let graph = DelegationGraph::new(config.max_delegators);
        Self {
            config,
            token,
            clock,
            lockups: HashMap::new(),
            graph,
            store: CheckpointStore::new(),
        }
    }

    /// Escrow display name, derived from the staking token.
    pub fn name(&self) -> String {
        format!("Vote Escrowed {}", self.token.name())
    }

    /// Escrow display symbol, derived from the staking token.
    pub fn symbol(&self) -> String {
        format!("ve{}", self.token.symbol())
    }

    /// Escrow decimals, matching the staking token.
    pub fn decimals(&self) -> u8 {
        self.token.decimals()
    }

    /// The ledger configuration.
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// The staking token collaborator.
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Mutable access to the token (minting in tests and simulation).
    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    /// The clock collaborator.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable access to the clock (advancing time in tests and simulation).
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The account's stored lockup (zeroed when none exists).
    pub fn get_lockup(&self, account: &Address) -> Lockup {
        self.lockups.get(account).copied().unwrap_or_default()
    }

    /// Power from the account's own lockup at `t`, ignoring delegation.
    pub fn raw_power(&self, account: &Address, t: Timestamp) -> u128 {
        power_at(&self.get_lockup(account), t, self.config.max_lock_time)
    }

    /// Effective power held by `holder` at `t`: its own raw power unless
    /// delegated away, plus the raw power of every delegator.
    fn live_balance(&self, holder: Address, t: Timestamp) -> u128 {
        let mut power = 0u128;
        if !self.graph.is_delegating(&holder) {
            power += self.raw_power(&holder, t);
        }
        for delegator in self.graph.delegators_of(&holder) {
            power += self.raw_power(&delegator, t);
        }
        power
    }

    /// Sum of all raw powers at `t`. Delegation never changes this.
    fn live_total(&self, t: Timestamp) -> u128 {
        self.lockups
            .values()
            .map(|lockup| power_at(lockup, t, self.config.max_lock_time))
            .sum()
    }

    /// Create or strengthen the account's lockup.
    ///
    /// `amount` is the resulting total (not a delta); the difference to
    /// the existing lockup is debited from the account. `end` must be
    /// week-aligned, in the future, within the maximum lockup window,
    /// and neither `amount` nor `end` may shrink an existing lockup.
    pub fn lockup(
        &mut self,
        account: Address,
        amount: u128,
        end: Timestamp,
    ) -> Result<(), EscrowError> {
        let now = self.clock.now();
        let height = self.clock.current_height();
        let existing = self.get_lockup(&account);

        if amount == 0 {
            return Err(EscrowError::LockBelowMinimum);
        }
        if !is_week_aligned(end) {
            return Err(EscrowError::InvalidLockParameters(
                "end must be aligned to a week boundary".to_string(),
            ));
        }
        if end <= now {
            return Err(EscrowError::InvalidLockParameters(
                "end must be in the future".to_string(),
            ));
        }
        if end - now < self.config.min_lock_duration {
            return Err(EscrowError::LockBelowMinimum);
        }
        if end > self.config.max_end(now) {
            return Err(EscrowError::LockTooLong);
        }
        if !existing.is_empty() {
            if amount < existing.amount {
                return Err(EscrowError::InvalidLockParameters(
                    "amount must be greater than or equal to the current amount".to_string(),
                ));
            }
            if end < existing.end {
                return Err(EscrowError::InvalidLockParameters(
                    "end must be greater than or equal to the current end".to_string(),
                ));
            }
        }

        let holder = self.graph.effective_holder(account);
        self.store.check_account_ordered(&holder, height)?;
        self.store.check_total_ordered(height)?;

        // Token leg settles before any internal state moves; a failed
        // debit leaves the ledger untouched.
        let delta = amount - existing.amount;
        if delta > 0 {
            self.token
                .debit(account, delta)
                .map_err(|e| EscrowError::TokenTransfer(e.to_string()))?;
        }

        self.lockups.insert(account, Lockup::new(amount, end));

        let holder_power = self.live_balance(holder, now);
        let total = self.live_total(now);
        self.store.append_account(holder, height, holder_power)?;
        self.store.append_total(height, total)?;

        info!(
            "Lockup for {}: amount {} until {} (holder {})",
            account, amount, end, holder
        );
        Ok(())
    }

    /// Withdraw an expired lockup, crediting the stored amount back.
    ///
    /// Returns the credited amount. Fails with `LockNotExpired` before
    /// `end`; withdrawing an empty lockup is a no-op returning 0.
    pub fn withdraw(&mut self, account: Address) -> Result<u128, EscrowError> {
        let now = self.clock.now();
        let height = self.clock.current_height();
        let lockup = self.get_lockup(&account);

        if !lockup.is_expired(now) {
            return Err(EscrowError::LockNotExpired);
        }
        if lockup.is_empty() {
            return Ok(0);
        }

        let holder = self.graph.effective_holder(account);
        self.store.check_account_ordered(&holder, height)?;
        self.store.check_total_ordered(height)?;

        self.token.credit(account, lockup.amount);
        self.lockups.insert(account, Lockup::default());

        // Power is already zero via decay; this write records the
        // amount reset for historical accuracy.
        let holder_power = self.live_balance(holder, now);
        let total = self.live_total(now);
        self.store.append_account(holder, height, holder_power)?;
        self.store.append_total(height, total)?;

        info!("Withdrawal for {}: {} returned", account, lockup.amount);
        Ok(lockup.amount)
    }

    /// Redirect the account's raw power to `delegate`.
    ///
    /// `None` (or the account itself) un-delegates. Re-delegating to the
    /// current target is a no-op. The global total is untouched:
    /// delegation redistributes power, never creates or destroys it.
    pub fn delegate(
        &mut self,
        account: Address,
        delegate: Option<Address>,
    ) -> Result<(), EscrowError> {
        let now = self.clock.now();
        let height = self.clock.current_height();

        // Self-delegation is the absent-edge state.
        let target = delegate.filter(|d| *d != account);
        let current = self.graph.delegate_of(&account);
        if current == target {
            debug!("Delegation for {} unchanged", account);
            return Ok(());
        }

        let old_holder = current.unwrap_or(account);
        let new_holder = target.unwrap_or(account);
        self.store.check_account_ordered(&old_holder, height)?;
        self.store.check_account_ordered(&new_holder, height)?;

        // Enforces the fan-in bound; nothing has been written yet when
        // it fails.
        self.graph.set_delegate(account, target)?;

        let old_power = self.live_balance(old_holder, now);
        let new_power = self.live_balance(new_holder, now);
        self.store.append_account(old_holder, height, old_power)?;
        self.store.append_account(new_holder, height, new_power)?;

        info!(
            "Delegation for {}: {} -> {}",
            account, old_holder, new_holder
        );
        Ok(())
    }

    /// Prune delegators of `delegate` whose raw power has decayed to
    /// dust, freeing fan-in slots.
    ///
    /// Maintenance only: callable by anyone, idempotent, and at the
    /// default zero dust threshold it moves no power at all. Returns the
    /// number of delegators removed.
    pub fn clean_up_weak_delegators(&mut self, delegate: Address) -> Result<usize, EscrowError> {
        let now = self.clock.now();
        let height = self.clock.current_height();

        let weak: Vec<Address> = self
            .graph
            .delegators_of(&delegate)
            .into_iter()
            .filter(|d| self.raw_power(d, now) <= self.config.dust_threshold)
            .collect();
        if weak.is_empty() {
            return Ok(0);
        }

        self.store.check_account_ordered(&delegate, height)?;
        for delegator in &weak {
            self.store.check_account_ordered(delegator, height)?;
        }

        for delegator in &weak {
            self.graph.clear_delegation(delegator);
        }

        let delegate_power = self.live_balance(delegate, now);
        self.store.append_account(delegate, height, delegate_power)?;
        for delegator in &weak {
            let power = self.live_balance(*delegator, now);
            self.store.append_account(*delegator, height, power)?;
        }

        info!(
            "Pruned {} weak delegator(s) from {}",
            weak.len(),
            delegate
        );
        Ok(weak.len())
    }

    /// Current effective voting power of `account`.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.live_balance(*account, self.clock.now())
    }

    /// Effective voting power of `account` as of `block`.
    pub fn balance_of_at(
        &self,
        account: &Address,
        block: BlockNumber,
    ) -> Result<u128, EscrowError> {
        self.store
            .account_value_at(account, block, self.clock.current_height())
    }

    /// Current total voting power across all lockups.
    pub fn total_supply(&self) -> u128 {
        self.live_total(self.clock.now())
    }

    /// Total voting power as of `block`.
    pub fn total_supply_at(&self, block: BlockNumber) -> Result<u128, EscrowError> {
        self.store
            .total_value_at(block, self.clock.current_height())
    }

    /// The account's delegate, or `None` when self-delegating.
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.graph.delegate_of(account)
    }

    /// Accounts currently delegating to `delegate`.
    pub fn delegators(&self, delegate: &Address) -> Vec<Address> {
        self.graph.delegators_of(delegate)
    }
}
