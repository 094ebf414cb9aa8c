use log::{debug, info, warn};
use rand::Rng;
use thiserror::Error;

use std::collections::BTreeSet;
use std::fmt;

use super::account::{AccountError, Balances};
use super::block::Block;
use super::hash::Hash;
use super::transaction::Transaction;
use super::validator::HashValidator;

/// Most blocks a chain can hold while every next index fits the 4-byte field
const MAX_BLOCKS: usize = u32::MAX as usize;

/// Errors that can occur during blockchain operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainError {
    #[error("Previous hash mismatch: expected {expected}, got {actual}")]
    PreviousHashMismatch { expected: Hash, actual: Hash },

    #[error("Block {index}: hash {hash} is not accepted by the validator")]
    InvalidHash { index: u32, hash: Hash },

    #[error("Block {index}: hash {stored} does not match its contents (expected {computed})")]
    HashMismatch {
        index: u32,
        stored: Hash,
        computed: Hash,
    },

    #[error("Block {index}: previous hash does not match the prior block (block hash {hash})")]
    BrokenLink { index: u32, hash: Hash },

    #[error("Chain is full: no block index left after {0} blocks")]
    ChainFull(usize),

    #[error("Invalid ledger: {0}")]
    AccountError(#[from] AccountError),
}

/// Represents the blockchain
///
/// The chain always holds at least its genesis block, which can never be
/// removed.
pub struct Blockchain {
    /// The chain of blocks, genesis first
    blocks: Vec<Block>,

    /// Decides which hashes are acceptable for mining and appending
    validator: Box<dyn HashValidator>,
}

impl Blockchain {
    /// Creates a new blockchain with a freshly mined genesis block
    ///
    /// # Arguments
    ///
    /// * `validator` - Used for every block mined or appended from now on
    ///
    /// # Returns
    ///
    /// A new Blockchain instance
    pub fn new<V>(validator: V) -> Self
    where
        V: HashValidator + 'static,
    {
        Self::with_rng(validator, &mut rand::thread_rng())
    }

    /// Creates a new blockchain, mining the genesis block with `rng`
    pub fn with_rng<V, R>(validator: V, rng: &mut R) -> Self
    where
        V: HashValidator + 'static,
        R: Rng + ?Sized,
    {
        let genesis = Block::mine(0, Transaction::default(), Hash::default(), &validator, rng);
        info!("Created genesis block {}", genesis.hash());

        Blockchain {
            blocks: vec![genesis],
            validator: Box::new(validator),
        }
    }

    /// Mines a block for the end of the chain without appending it
    ///
    /// # Arguments
    ///
    /// * `transaction` - The transaction that goes in the block
    ///
    /// # Returns
    ///
    /// A block with the next index and the current tail hash as its
    /// previous hash
    pub fn mine(&self, transaction: Transaction) -> Block {
        self.mine_with_rng(transaction, &mut rand::thread_rng())
    }

    /// Mines a block for the end of the chain, drawing nonces from `rng`
    pub fn mine_with_rng<R>(&self, transaction: Transaction, rng: &mut R) -> Block
    where
        R: Rng + ?Sized,
    {
        Block::mine(
            self.next_index(),
            transaction,
            self.tail_hash().clone(),
            self.validator.as_ref(),
            rng,
        )
    }

    /// Gets the number of blocks in the chain, genesis included
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// Gets the index the next appended block takes
    pub fn next_index(&self) -> u32 {
        // append keeps the length at or below MAX_BLOCKS
        u32::try_from(self.blocks.len()).unwrap_or(u32::MAX)
    }

    /// Adds a block to the end of the chain
    ///
    /// The block is accepted only if it links to the current tail, its hash
    /// satisfies the validator, and its hash matches a recomputation from
    /// its contents. The chain is unchanged on failure.
    pub fn append(&mut self, block: Block) -> Result<(), BlockchainError> {
        if let Err(err) = self.verify_append(&block) {
            warn!("Rejected block {}: {}", block.index(), err);
            return Err(err);
        }

        info!("Appended block {} with hash {}", block.index(), block.hash());
        self.blocks.push(block);

        Ok(())
    }

    fn verify_append(&self, block: &Block) -> Result<(), BlockchainError> {
        if is_full(self.blocks.len()) {
            return Err(BlockchainError::ChainFull(self.blocks.len()));
        }

        let tail = self.tail_hash();
        if block.previous_hash() != tail {
            return Err(BlockchainError::PreviousHashMismatch {
                expected: tail.clone(),
                actual: block.previous_hash().clone(),
            });
        }

        self.verify_block(block)
    }

    /// Checks that a block's hash is acceptable and honestly derived
    fn verify_block(&self, block: &Block) -> Result<(), BlockchainError> {
        if !self.validator.is_valid(block.hash()) {
            return Err(BlockchainError::InvalidHash {
                index: block.index(),
                hash: block.hash().clone(),
            });
        }

        let computed = block.recompute_hash();
        if &computed != block.hash() {
            return Err(BlockchainError::HashMismatch {
                index: block.index(),
                stored: block.hash().clone(),
                computed,
            });
        }

        Ok(())
    }

    /// Attempts to remove the last block
    ///
    /// # Returns
    ///
    /// false if only the genesis block remains, true otherwise
    pub fn remove_last(&mut self) -> bool {
        if self.blocks.len() == 1 {
            warn!("Refusing to remove the genesis block");
            return false;
        }

        if let Some(removed) = self.blocks.pop() {
            info!("Removed block {} with hash {}", removed.index(), removed.hash());
        }

        true
    }

    /// Gets the last block in the chain
    pub fn last_block(&self) -> &Block {
        // The genesis block is never removed
        &self.blocks[self.blocks.len() - 1]
    }

    /// Gets the hash of the last block in the chain
    pub fn tail_hash(&self) -> &Hash {
        self.last_block().hash()
    }

    /// Audits the whole chain
    ///
    /// Every block must link to its predecessor, carry a hash derived from
    /// its contents, and satisfy the validator. Then every transaction is
    /// replayed to check the balances stay legal. Stops at the first failure.
    pub fn check(&self) -> Result<(), BlockchainError> {
        for (position, block) in self.blocks.iter().enumerate() {
            if position > 0 && block.previous_hash() != self.blocks[position - 1].hash() {
                return Err(BlockchainError::BrokenLink {
                    index: block.index(),
                    hash: block.hash().clone(),
                });
            }

            self.verify_block(block)?;
        }

        self.balances()?;
        debug!("Checked {} blocks", self.blocks.len());

        Ok(())
    }

    /// Checks if the chain passes [`Blockchain::check`]
    pub fn is_correct(&self) -> bool {
        self.check().is_ok()
    }

    /// Rebuilds every balance by replaying all transactions after genesis
    fn balances(&self) -> Result<Balances, AccountError> {
        Balances::replay(self.blocks.iter().skip(1))
    }

    /// Finds one user's balance
    ///
    /// # Returns
    ///
    /// The balance, 0 for a user that never appeared, or the ledger error
    /// that stopped the replay
    pub fn balance(&self, user: &str) -> Result<i64, BlockchainError> {
        Ok(self.balances()?.balance(user))
    }

    /// Gets every identity that appears as a source or target
    pub fn users(&self) -> BTreeSet<String> {
        self.transactions()
            .flat_map(|transaction| [transaction.source(), transaction.target()])
            .filter(|user| !user.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Iterates over the blocks from genesis to tail
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Iterates over the transactions from genesis to tail
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.blocks.iter().map(Block::transaction)
    }
}

/// Whether a chain of `len` blocks can take no further block
fn is_full(len: usize) -> bool {
    len >= MAX_BLOCKS
}

impl<'a> IntoIterator for &'a Blockchain {
    type Item = &'a Transaction;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Block>, fn(&'a Block) -> &'a Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks
            .iter()
            .map(Block::transaction as fn(&'a Block) -> &'a Transaction)
    }
}

impl fmt::Debug for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blockchain")
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}
