//! Common types shared across modules.

use ethers::prelude::*;

/// Balance, threshold and owners of a multisig; replaced wholesale on every refetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSigSummary {
    pub balance: U256,
    pub required_confirmations: U256,
    pub owners: Vec<Address>,
}

impl MultiSigSummary {
    /// Summary reported for an address that holds no contract code
    pub fn without_code(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }
}

/// One proposed transaction as stored by the contract, plus who confirmed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: U256,
    pub destination: Address,
    pub value: U256,
    pub executed: bool,
    pub data: Bytes,
    pub confirmed_by: Vec<Address>,
}

/// Which transactions `getTransactionIds` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    pub pending: bool,
    pub executed: bool,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            pending: true,
            executed: true,
        }
    }
}

impl TransactionFilter {
    pub fn label(&self) -> &'static str {
        match (self.pending, self.executed) {
            (true, true) => "All",
            (true, false) => "Pending",
            (false, true) => "Executed",
            (false, false) => "None",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_everything() {
        let filter = TransactionFilter::default();
        assert!(filter.pending && filter.executed);
        assert_eq!(filter.label(), "All");
    }

    #[test]
    fn test_summary_without_code_keeps_balance() {
        let summary = MultiSigSummary::without_code(U256::from(7u64));
        assert_eq!(summary.balance, U256::from(7u64));
        assert!(summary.required_confirmations.is_zero());
        assert!(summary.owners.is_empty());
    }
}
