use serde::Serialize;

use std::fmt;

/// Represents a transfer of funds between two identities
///
/// An empty source denotes a deposit: the target is credited without
/// debiting anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Identity the amount is taken from (empty for deposits)
    source: String,

    /// Identity the amount is given to
    target: String,

    /// Amount being transferred
    amount: i32,
}

impl Transaction {
    /// Creates a new transaction
    ///
    /// # Arguments
    ///
    /// * `source` - The identity paying the amount, or "" for a deposit
    /// * `target` - The identity receiving the amount
    /// * `amount` - The amount to transfer
    ///
    /// # Returns
    ///
    /// A new Transaction instance
    pub fn new(source: impl Into<String>, target: impl Into<String>, amount: i32) -> Self {
        Transaction {
            source: source.into(),
            target: target.into(),
            amount,
        }
    }

    /// Creates a deposit into `target` with no originating balance
    pub fn deposit(target: impl Into<String>, amount: i32) -> Self {
        Self::new(String::new(), target, amount)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    /// Checks if the transaction is a deposit
    pub fn is_deposit(&self) -> bool {
        self.source.is_empty()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.is_deposit() { "Deposit" } else { &self.source };
        write!(
            f,
            "[Source: {}, Target: {}, Amount: {}]",
            source, self.target, self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction() {
        let transaction = Transaction::new("alice", "bob", 25);

        assert_eq!(transaction.source(), "alice");
        assert_eq!(transaction.target(), "bob");
        assert_eq!(transaction.amount(), 25);
        assert!(!transaction.is_deposit());
        assert_eq!(transaction.to_string(), "[Source: alice, Target: bob, Amount: 25]");
    }

    #[test]
    fn test_deposit_transaction() {
        let transaction = Transaction::deposit("alice", 100);

        assert_eq!(transaction.source(), "");
        assert!(transaction.is_deposit());
        assert_eq!(transaction.to_string(), "[Source: Deposit, Target: alice, Amount: 100]");
    }
}
