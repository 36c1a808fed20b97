//! Staking token collaborator.
//!
//! The escrow ledger never implements token semantics itself; it debits
//! and credits through this trait. A failed debit aborts the ledger
//! operation before any state change.

use thiserror::Error;

use std::collections::HashMap;
use votelock_types::Address;

/// Token transfer errors reported by the collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
}

/// The fungible token whose balances back the escrow.
pub trait StakingToken {
    /// Token name, used to derive the escrow's display name.
    fn name(&self) -> String;

    /// Token symbol, used to derive the escrow's display symbol.
    fn symbol(&self) -> String;

    /// Token decimals.
    fn decimals(&self) -> u8;

    /// Pull `amount` from `account` into the escrow.
    fn debit(&mut self, account: Address, amount: u128) -> Result<(), TokenError>;

    /// Return `amount` from the escrow to `account`.
    fn credit(&mut self, account: Address, amount: u128);
}

/// In-memory token for tests and simulation.
#[derive(Debug, Clone)]
pub struct InMemoryToken {
    name: String,
    symbol: String,
    decimals: u8,
    balances: HashMap<Address, u128>,
    /// Total held by the escrow (debited minus credited).
    escrowed: u128,
}

impl InMemoryToken {
    /// Create a token with the given metadata and no balances.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            balances: HashMap::new(),
            escrowed: 0,
        }
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&mut self, account: Address, amount: u128) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    /// Free balance of `account` (excludes escrowed tokens).
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Total currently held by the escrow.
    pub fn escrowed(&self) -> u128 {
        self.escrowed
    }
}

impl StakingToken for InMemoryToken {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn symbol(&self) -> String {
        self.symbol.clone()
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn debit(&mut self, account: Address, amount: u128) -> Result<(), TokenError> {
        let balance = self.balances.entry(account).or_insert(0);
        if *balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: *balance,
                need: amount,
            });
        }
        *balance -= amount;
        self.escrowed += amount;
        Ok(())
    }

    fn credit(&mut self, account: Address, amount: u128) {
        *self.balances.entry(account).or_insert(0) += amount;
        self.escrowed = self.escrowed.saturating_sub(amount);
    }
}
