//! Votelock Types - Core type definitions for the votelock ledger.
//!
//! This crate provides the fundamental types used throughout votelock:
//! - Addresses (20-byte, hex encoded)
//! - Timestamps and block heights, with week-boundary helpers
//! - Error types

pub mod address;
pub mod time;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use time::{floor_week, is_week_aligned, BlockNumber, Timestamp, DAY, WEEK};
pub use error::TypesError;
