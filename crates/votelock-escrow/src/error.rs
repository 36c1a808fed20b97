use thiserror::Error;
use votelock_types::{Address, BlockNumber};

/// Errors that can occur in escrow ledger operations.
///
/// No operation partially applies: when any of these is returned the
/// ledger, the delegation graph, and the checkpoint store are unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("Invalid lockup parameters: {0}")]
    InvalidLockParameters(String),

    #[error("Lockup amount or duration is below the minimum")]
    LockBelowMinimum,

    #[error("End must be before the maximum lockup time")]
    LockTooLong,

    #[error("Lockup must be expired")]
    LockNotExpired,

    #[error("Delegate {delegate} already has {count} delegators; clean up weak delegators first")]
    TooManyDelegators { delegate: Address, count: usize },

    #[error("Checkpoint block {block} precedes last recorded block {last}")]
    InvalidOrdering { last: BlockNumber, block: BlockNumber },

    #[error("Block number is in the future: {block} > {height}")]
    FutureBlock { block: BlockNumber, height: BlockNumber },

    #[error("Token transfer failed: {0}")]
    TokenTransfer(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EscrowError::FutureBlock { block: 12, height: 10 };
        assert!(err.to_string().contains("in the future"));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_too_many_delegators_names_the_delegate() {
        let delegate = Address::from_bytes([9u8; 20]);
        let err = EscrowError::TooManyDelegators { delegate, count: 64 };
        assert!(err.to_string().contains(&delegate.to_string()));
        assert!(err.to_string().contains("64"));
    }
}
