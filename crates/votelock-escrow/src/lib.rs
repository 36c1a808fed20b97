//! Votelock Escrow - Vote-escrow ledger.
//!
//! This crate provides:
//! - Linearly decaying voting power from token lockups
//! - Append-only checkpoint history for as-of-block queries
//! - Single-hop delegation with bounded fan-in
//! - Collaborator traits for the staking token and the chain clock

pub mod curve;
pub mod checkpoint;
pub mod delegation;
pub mod ledger;
pub mod token;
pub mod clock;
pub mod config;
pub mod error;

pub use checkpoint::{Checkpoint, CheckpointSeries, CheckpointStore};
pub use clock::{ChainClock, ManualClock};
pub use config::EscrowConfig;
pub use curve::{power_at, Lockup};
pub use delegation::DelegationGraph;
pub use error::EscrowError;
pub use ledger::EscrowLedger;
pub use token::{InMemoryToken, StakingToken, TokenError};
