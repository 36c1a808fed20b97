//! Scenario files: a declarative list of ledger operations replayed
//! against an in-memory escrow, for demos and exploration.

use serde::Deserialize;
use std::path::Path;

use votelock_escrow::{EscrowConfig, EscrowLedger, InMemoryToken, ManualClock};
use votelock_types::{Address, WEEK};

/// A full simulation scenario.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Token metadata.
    #[serde(default)]
    pub token: TokenSection,
    /// Initial account balances, in whole tokens.
    pub accounts: Vec<AccountSection>,
    /// Operations to replay in order.
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSection {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            name: "Governance Token".to_string(),
            symbol: "GOV".to_string(),
            decimals: 18,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountSection {
    pub address: Address,
    /// Balance in whole tokens (scaled by the token decimals).
    pub balance: u64,
}

/// One replayed operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Step {
    /// Create or strengthen a lockup: `amount` whole tokens for `weeks`
    /// from the current week boundary.
    Lockup {
        account: Address,
        amount: u64,
        weeks: u64,
    },
    /// Withdraw an expired lockup.
    Withdraw { account: Address },
    /// Delegate to another account, or to nobody to un-delegate.
    Delegate {
        account: Address,
        #[serde(default)]
        to: Option<Address>,
    },
    /// Prune weak delegators of a delegate.
    Cleanup { delegate: Address },
    /// Advance time, sealing one block per hour.
    Sleep { hours: u64 },
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read scenario '{}': {}", path.display(), e))?;
        let scenario: Scenario = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario '{}': {}", path.display(), e))?;
        Ok(scenario)
    }

    /// Build the ledger with the scenario's token and balances.
    pub fn build_ledger(&self) -> EscrowLedger<InMemoryToken, ManualClock> {
        let unit = 10u128.pow(self.token.decimals as u32);
        let mut token = InMemoryToken::new(
            self.token.name.clone(),
            self.token.symbol.clone(),
            self.token.decimals,
        );
        for account in &self.accounts {
            token.mint(account.address, account.balance as u128 * unit);
        }
        // Start on a week boundary so weekly lockups line up.
        let clock = ManualClock::new(100 * WEEK, 1);
        EscrowLedger::new(EscrowConfig::default(), token, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
[token]
name = "Origin Governance"
symbol = "OGN"
decimals = 18

[[accounts]]
address = "0x0000000000000000000000000000000000000001"
balance = 1000

[[steps]]
op = "lockup"
account = "0x0000000000000000000000000000000000000001"
amount = 1000
weeks = 4

[[steps]]
op = "sleep"
hours = 24

[[steps]]
op = "delegate"
account = "0x0000000000000000000000000000000000000001"
to = "0x0000000000000000000000000000000000000002"

[[steps]]
op = "withdraw"
account = "0x0000000000000000000000000000000000000001"
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario: Scenario = toml::from_str(EXAMPLE).unwrap();
        assert_eq!(scenario.token.symbol, "OGN");
        assert_eq!(scenario.accounts.len(), 1);
        assert_eq!(scenario.steps.len(), 4);

        match &scenario.steps[0] {
            Step::Lockup { amount, weeks, .. } => {
                assert_eq!(*amount, 1000);
                assert_eq!(*weeks, 4);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_delegate_without_target_means_undelegate() {
        let toml_src = r#"
accounts = []

[[steps]]
op = "delegate"
account = "0x0000000000000000000000000000000000000001"
"#;
        let scenario: Scenario = toml::from_str(toml_src).unwrap();
        match &scenario.steps[0] {
            Step::Delegate { to, .. } => assert!(to.is_none()),
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_build_ledger_applies_balances() {
        let scenario: Scenario = toml::from_str(EXAMPLE).unwrap();
        let ledger = scenario.build_ledger();
        let account = scenario.accounts[0].address;
        assert_eq!(ledger.token().balance_of(&account), 1000 * 10u128.pow(18));
        assert_eq!(ledger.name(), "Vote Escrowed Origin Governance");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml_src = r#"
accounts = []
steps = []
bogus = 1
"#;
        assert!(toml::from_str::<Scenario>(toml_src).is_err());
    }
}
