//! Delegation graph: one outgoing edge per account, bounded fan-in.
//!
//! Power flows at most one hop: a delegate's own incoming power is never
//! redirected further, so cycles are impossible by construction. The
//! number of delegators per delegate is capped so that iterating a
//! delegator set stays bounded; weak (fully decayed) delegators can be
//! pruned to free slots.

use std::collections::{BTreeSet, HashMap};

use crate::error::EscrowError;
use votelock_types::Address;

/// Delegation state for all accounts.
///
/// An absent entry means self-delegation: the account's own power counts
/// toward itself.
#[derive(Debug, Clone)]
pub struct DelegationGraph {
    /// delegator -> delegate (only proper delegations; never self-edges)
    delegations: HashMap<Address, Address>,
    /// delegate -> set of delegators (reverse lookup, bounded)
    delegators: HashMap<Address, BTreeSet<Address>>,
    /// Maximum delegators per delegate
    max_delegators: usize,
}

impl DelegationGraph {
    /// Create a graph with the given fan-in bound.
    pub fn new(max_delegators: usize) -> Self {
        Self {
            delegations: HashMap::new(),
            delegators: HashMap::new(),
            max_delegators,
        }
    }

    /// The account's delegate, or `None` when self-delegating.
    pub fn delegate_of(&self, account: &Address) -> Option<Address> {
        self.delegations.get(account).copied()
    }

    /// The account whose checkpoint series receives this account's power.
    pub fn effective_holder(&self, account: Address) -> Address {
        self.delegate_of(&account).unwrap_or(account)
    }

    /// Check if the account has delegated its power away.
    pub fn is_delegating(&self, account: &Address) -> bool {
        self.delegations.contains_key(account)
    }

    /// Number of accounts currently delegating to `delegate`.
    pub fn delegator_count(&self, delegate: &Address) -> usize {
        self.delegators.get(delegate).map(|s| s.len()).unwrap_or(0)
    }

    /// Accounts currently delegating to `delegate`, in address order.
    pub fn delegators_of(&self, delegate: &Address) -> Vec<Address> {
        self.delegators
            .get(delegate)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Point `account`'s edge at `new_delegate` (`None` un-delegates).
    ///
    /// Callers must normalize a self-target to `None` first. Returns the
    /// previous delegate. Fails with `TooManyDelegators` when the target
    /// is at capacity; nothing changes in that case.
    pub fn set_delegate(
        &mut self,
        account: Address,
        new_delegate: Option<Address>,
    ) -> Result<Option<Address>, EscrowError> {
        debug_assert_ne!(new_delegate, Some(account));

        if let Some(delegate) = new_delegate {
            let count = self.delegator_count(&delegate);
            if count >= self.max_delegators {
                return Err(EscrowError::TooManyDelegators { delegate, count });
            }
        }

        let old = match new_delegate {
            Some(delegate) => {
                let old = self.delegations.insert(account, delegate);
                self.delegators.entry(delegate).or_default().insert(account);
                old
            }
            None => self.delegations.remove(&account),
        };

        if let Some(previous) = old {
            if Some(previous) != new_delegate {
                if let Some(set) = self.delegators.get_mut(&previous) {
                    set.remove(&account);
                }
            }
        }

        Ok(old)
    }

    /// Drop `account`'s outgoing edge, returning the old delegate.
    pub fn clear_delegation(&mut self, account: &Address) -> Option<Address> {
        let old = self.delegations.remove(account)?;
        if let Some(set) = self.delegators.get_mut(&old) {
            set.remove(account);
        }
        Some(old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_default_is_self_delegation() {
        let graph = DelegationGraph::new(8);
        let alice = addr(1);

        assert_eq!(graph.delegate_of(&alice), None);
        assert_eq!(graph.effective_holder(alice), alice);
        assert!(!graph.is_delegating(&alice));
    }

    #[test]
    fn test_delegate_and_undelegate() {
        let mut graph = DelegationGraph::new(8);
        let alice = addr(1);
        let bob = addr(2);

        assert_eq!(graph.set_delegate(alice, Some(bob)).unwrap(), None);
        assert_eq!(graph.delegate_of(&alice), Some(bob));
        assert_eq!(graph.effective_holder(alice), bob);
        assert_eq!(graph.delegators_of(&bob), vec![alice]);

        assert_eq!(graph.set_delegate(alice, None).unwrap(), Some(bob));
        assert_eq!(graph.delegate_of(&alice), None);
        assert_eq!(graph.delegator_count(&bob), 0);
    }

    #[test]
    fn test_redelegation_moves_reverse_entry() {
        let mut graph = DelegationGraph::new(8);
        let alice = addr(1);
        let bob = addr(2);
        let carol = addr(3);

        graph.set_delegate(alice, Some(bob)).unwrap();
        graph.set_delegate(alice, Some(carol)).unwrap();

        assert_eq!(graph.delegate_of(&alice), Some(carol));
        assert_eq!(graph.delegator_count(&bob), 0);
        assert_eq!(graph.delegators_of(&carol), vec![alice]);
    }

    #[test]
    fn test_fan_in_bound() {
        let mut graph = DelegationGraph::new(2);
        let delegate = addr(9);

        graph.set_delegate(addr(1), Some(delegate)).unwrap();
        graph.set_delegate(addr(2), Some(delegate)).unwrap();

        let err = graph.set_delegate(addr(3), Some(delegate)).unwrap_err();
        assert_eq!(
            err,
            EscrowError::TooManyDelegators { delegate, count: 2 }
        );
        // Nothing changed for the rejected delegator.
        assert!(!graph.is_delegating(&addr(3)));
        assert_eq!(graph.delegator_count(&delegate), 2);
    }

    #[test]
    fn test_clear_delegation_frees_slot() {
        let mut graph = DelegationGraph::new(1);
        let delegate = addr(9);

        graph.set_delegate(addr(1), Some(delegate)).unwrap();
        assert!(graph.set_delegate(addr(2), Some(delegate)).is_err());

        assert_eq!(graph.clear_delegation(&addr(1)), Some(delegate));
        assert!(graph.set_delegate(addr(2), Some(delegate)).is_ok());
    }

    #[test]
    fn test_delegators_listed_in_address_order() {
        let mut graph = DelegationGraph::new(8);
        let delegate = addr(9);

        graph.set_delegate(addr(3), Some(delegate)).unwrap();
        graph.set_delegate(addr(1), Some(delegate)).unwrap();
        graph.set_delegate(addr(2), Some(delegate)).unwrap();

        assert_eq!(
            graph.delegators_of(&delegate),
            vec![addr(1), addr(2), addr(3)]
        );
    }

    #[test]
    fn test_single_hop_only() {
        // Bob delegating to Carol does not redirect Alice's power past Bob.
        let mut graph = DelegationGraph::new(8);
        let alice = addr(1);
        let bob = addr(2);
        let carol = addr(3);

        graph.set_delegate(alice, Some(bob)).unwrap();
        graph.set_delegate(bob, Some(carol)).unwrap();

        assert_eq!(graph.effective_holder(alice), bob);
        assert_eq!(graph.effective_holder(bob), carol);
        assert_eq!(graph.delegators_of(&bob), vec![alice]);
        assert_eq!(graph.delegators_of(&carol), vec![bob]);
    }
}
