// Blockchain module
//
// This module contains the core ledger implementation including:
// - Hash wrapper
// - Block structure and mining
// - Blockchain structure and audits
// - Transaction structure
// - Balance replay
// - Hash validators

pub mod account;
pub mod block;
pub mod chain;
pub mod hash;
pub mod transaction;
pub mod validator;

// Re-export main components for easier access
pub use account::{AccountError, Balances};
pub use block::Block;
pub use chain::{Blockchain, BlockchainError};
pub use hash::Hash;
pub use transaction::Transaction;
pub use validator::{HashValidator, LeadingZeroBytes};
