//! In-memory, tamper-evident transaction ledger.
//!
//! Blocks are chained by SHA-256 hashes and admitted through a proof-of-work
//! search against a caller-supplied [`blockchain::HashValidator`]. Balances
//! are never stored; they are rebuilt by replaying the chain.

pub mod blockchain;
pub mod cli;
pub mod config;
