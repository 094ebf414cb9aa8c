use log::debug;
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use std::fmt;

use super::hash::Hash;
use super::transaction::Transaction;
use super::validator::HashValidator;

/// Represents a block in the blockchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Index of the block in the chain
    index: u32,

    /// The transaction recorded by this block
    transaction: Transaction,

    /// Hash of the previous block
    previous_hash: Hash,

    /// Proof of work
    nonce: i64,

    /// Hash of the current block (calculated)
    hash: Hash,
}

impl Block {
    /// Mines a new block, searching random nonces until the validator
    /// accepts the resulting hash
    ///
    /// There is no iteration bound: a validator that can never be satisfied
    /// makes this loop forever.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the block in the chain
    /// * `transaction` - The transaction to record
    /// * `previous_hash` - The hash of the previous block
    /// * `validator` - Decides which hashes are acceptable
    /// * `rng` - Source of candidate nonces
    ///
    /// # Returns
    ///
    /// A new Block whose hash satisfies the validator
    pub fn mine<V, R>(
        index: u32,
        transaction: Transaction,
        previous_hash: Hash,
        validator: &V,
        rng: &mut R,
    ) -> Self
    where
        V: HashValidator + ?Sized,
        R: Rng + ?Sized,
    {
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;
            let nonce: i64 = rng.gen();
            let hash = Self::calculate_hash(index, &transaction, nonce, &previous_hash);

            if validator.is_valid(&hash) {
                debug!("Mined block {} after {} attempts", index, attempts);
                return Block {
                    index,
                    transaction,
                    previous_hash,
                    nonce,
                    hash,
                };
            }
        }
    }

    /// Creates a block from a caller-supplied nonce
    ///
    /// The hash is computed but not checked against any validator.
    pub fn from_nonce(index: u32, transaction: Transaction, previous_hash: Hash, nonce: i64) -> Self {
        let hash = Self::calculate_hash(index, &transaction, nonce, &previous_hash);

        Block {
            index,
            transaction,
            previous_hash,
            nonce,
            hash,
        }
    }

    /// Calculates the SHA-256 hash binding a block's contents
    ///
    /// Fields are fed in this exact order: big-endian 4-byte index, source
    /// bytes, target bytes, big-endian 4-byte amount, previous hash bytes,
    /// big-endian 8-byte nonce.
    pub fn calculate_hash(index: u32, transaction: &Transaction, nonce: i64, previous_hash: &Hash) -> Hash {
        let mut hasher = Sha256::new();

        hasher.update(index.to_be_bytes());
        hasher.update(transaction.source().as_bytes());
        hasher.update(transaction.target().as_bytes());
        hasher.update(transaction.amount().to_be_bytes());
        hasher.update(previous_hash.as_bytes());
        hasher.update(nonce.to_be_bytes());

        Hash::from(hasher.finalize().to_vec())
    }

    /// Recomputes the hash from the block's contents
    pub fn recompute_hash(&self) -> Hash {
        Self::calculate_hash(self.index, &self.transaction, self.nonce, &self.previous_hash)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn nonce(&self) -> i64 {
        self.nonce
    }

    pub fn previous_hash(&self) -> &Hash {
        &self.previous_hash
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Builds a block with an arbitrary stored hash, bypassing derivation
    #[cfg(test)]
    pub(crate) fn forged(
        index: u32,
        transaction: Transaction,
        previous_hash: Hash,
        nonce: i64,
        hash: Hash,
    ) -> Self {
        Block {
            index,
            transaction,
            previous_hash,
            nonce,
            hash,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block {} (Transaction: {}, Nonce: {} prevHash: {}, hash: {})",
            self.index, self.transaction, self.nonce, self.previous_hash, self.hash
        )
    }
}
