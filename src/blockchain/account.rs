use log::trace;
use thiserror::Error;

use std::collections::HashMap;

use super::block::Block;
use super::transaction::Transaction;

/// Errors that can occur while replaying transactions into balances
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Block {index}: negative amount {amount}")]
    NegativeAmount { index: u32, amount: i32 },

    #[error("Block {index}: transaction has no target")]
    EmptyTarget { index: u32 },

    #[error("Block {index}: unknown source {user}")]
    UnknownSource { index: u32, user: String },

    #[error("Block {index}: insufficient funds for {user}: required {required}, available {available}")]
    InsufficientFunds {
        index: u32,
        user: String,
        required: i64,
        available: i64,
    },
}

/// Per-identity balances reconstructed from a sequence of transactions
///
/// An identity is present once it has been credited, even if its balance
/// later drops to zero. This is what separates an unknown source from a
/// source with no funds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    accounts: HashMap<String, i64>,
}

impl Balances {
    /// Creates an empty set of balances
    pub fn new() -> Self {
        Balances {
            accounts: HashMap::new(),
        }
    }

    /// Replays the transactions of the given blocks in order
    ///
    /// # Arguments
    ///
    /// * `blocks` - The blocks to replay, genesis excluded
    ///
    /// # Returns
    ///
    /// The resulting balances, or the first violation encountered
    pub fn replay<'a, I>(blocks: I) -> Result<Self, AccountError>
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut balances = Balances::new();

        for block in blocks {
            balances.apply(block.index(), block.transaction())?;
        }

        Ok(balances)
    }

    /// Applies one transaction, leaving the balances untouched on failure
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the block holding the transaction
    /// * `transaction` - The transaction to apply
    pub fn apply(&mut self, index: u32, transaction: &Transaction) -> Result<(), AccountError> {
        let amount = i64::from(transaction.amount());

        if amount < 0 {
            return Err(AccountError::NegativeAmount {
                index,
                amount: transaction.amount(),
            });
        }

        if transaction.target().is_empty() {
            return Err(AccountError::EmptyTarget { index });
        }

        if !transaction.is_deposit() {
            let source = transaction.source();
            let available = match self.accounts.get(source) {
                Some(balance) => *balance,
                None => {
                    return Err(AccountError::UnknownSource {
                        index,
                        user: source.to_string(),
                    })
                }
            };

            if available < amount {
                return Err(AccountError::InsufficientFunds {
                    index,
                    user: source.to_string(),
                    required: amount,
                    available,
                });
            }

            self.accounts.insert(source.to_string(), available - amount);
        }

        *self.accounts.entry(transaction.target().to_string()).or_insert(0) += amount;
        trace!("Applied block {}: {}", index, transaction);

        Ok(())
    }

    /// Gets a user's balance, 0 if the user has never been seen
    pub fn balance(&self, user: &str) -> i64 {
        self.accounts.get(user).copied().unwrap_or(0)
    }

    /// Whether the user has ever held funds
    #[cfg(test)]
    pub(crate) fn contains(&self, user: &str) -> bool {
        self.accounts.contains_key(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_then_transfer() {
        let mut balances = Balances::new();

        balances.apply(1, &Transaction::deposit("alice", 100)).unwrap();
        balances.apply(2, &Transaction::new("alice", "bob", 40)).unwrap();

        assert_eq!(balances.balance("alice"), 60);
        assert_eq!(balances.balance("bob"), 40);
        assert_eq!(balances.balance("carol"), 0);
    }

    #[test]
    fn test_unknown_source() {
        let mut balances = Balances::new();

        let result = balances.apply(1, &Transaction::new("alice", "bob", 0));
        assert_eq!(
            result,
            Err(AccountError::UnknownSource {
                index: 1,
                user: "alice".to_string(),
            })
        );
        assert!(!balances.contains("bob"));
    }

    #[test]
    fn test_known_source_with_zero_balance() {
        let mut balances = Balances::new();

        balances.apply(1, &Transaction::deposit("alice", 5)).unwrap();
        balances.apply(2, &Transaction::new("alice", "bob", 5)).unwrap();
        assert!(balances.contains("alice"));
        assert_eq!(balances.balance("alice"), 0);

        // A zero transfer from a drained but known account is still legal
        balances.apply(3, &Transaction::new("alice", "bob", 0)).unwrap();

        let result = balances.apply(4, &Transaction::new("alice", "bob", 1));
        assert_eq!(
            result,
            Err(AccountError::InsufficientFunds {
                index: 4,
                user: "alice".to_string(),
                required: 1,
                available: 0,
            })
        );
        assert_eq!(balances.balance("bob"), 5);
    }

    #[test]
    fn test_negative_amount_and_empty_target() {
        let mut balances = Balances::new();

        assert_eq!(
            balances.apply(1, &Transaction::deposit("alice", -1)),
            Err(AccountError::NegativeAmount { index: 1, amount: -1 })
        );
        assert_eq!(
            balances.apply(2, &Transaction::deposit("", 10)),
            Err(AccountError::EmptyTarget { index: 2 })
        );
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut balances = Balances::new();

        balances.apply(1, &Transaction::deposit("alice", 10)).unwrap();
        balances.apply(2, &Transaction::new("alice", "alice", 10)).unwrap();

        assert_eq!(balances.balance("alice"), 10);
    }
}
