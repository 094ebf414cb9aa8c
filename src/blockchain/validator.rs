use super::hash::Hash;

/// Decides whether a hash is difficult enough to be accepted into a chain
pub trait HashValidator {
    /// Returns true if the hash is acceptable
    fn is_valid(&self, hash: &Hash) -> bool;
}

impl<F> HashValidator for F
where
    F: Fn(&Hash) -> bool,
{
    fn is_valid(&self, hash: &Hash) -> bool {
        self(hash)
    }
}

/// Accepts hashes that start with a fixed number of zero bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingZeroBytes(pub usize);

impl HashValidator for LeadingZeroBytes {
    fn is_valid(&self, hash: &Hash) -> bool {
        hash.len() >= self.0 && (0..self.0).all(|i| hash.byte_at(i) == Some(0))
    }
}
