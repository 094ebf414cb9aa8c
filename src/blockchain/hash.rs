use serde::{Serialize, Serializer};

use std::fmt;

/// A content fingerprint owned as raw bytes
///
/// Equality, hashing and ordering are defined over the byte content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(Vec<u8>);

impl Hash {
    /// Creates a new hash from a copy of the given bytes
    ///
    /// # Arguments
    ///
    /// * `bytes` - The bytes to copy into the hash
    ///
    /// # Returns
    ///
    /// A new Hash instance
    pub fn new(bytes: &[u8]) -> Self {
        Hash(bytes.to_vec())
    }

    /// Number of bytes in the hash
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the hash holds zero bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the byte at position `i`, or `None` when `i` is out of range
    pub fn byte_at(&self, i: usize) -> Option<u8> {
        self.0.get(i).copied()
    }

    /// Gets a copy of the bytes in the hash
    pub fn bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Borrows the bytes in the hash
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Hash {
    fn from(bytes: Vec<u8>) -> Self {
        Hash(bytes)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(&self.0))
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hash_copies_bytes() {
        let mut source = vec![1, 2, 3];
        let hash = Hash::new(&source);
        source[0] = 9;

        assert_eq!(hash.len(), 3);
        assert_eq!(hash.byte_at(0), Some(1));
        assert_eq!(hash.byte_at(3), None);

        let mut copy = hash.bytes();
        copy[1] = 9;
        assert_eq!(hash.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_equality_is_by_content() {
        assert_eq!(Hash::new(&[0, 7]), Hash::from(vec![0, 7]));
        assert_ne!(Hash::new(&[0, 7]), Hash::new(&[7, 0]));
        assert_eq!(Hash::default(), Hash::new(&[]));
    }

    #[test]
    fn test_display_uppercase_hex() {
        assert_eq!(Hash::new(&[0x00, 0xab, 0x0f, 0xff]).to_string(), "00AB0FFF");
        assert_eq!(Hash::default().to_string(), "");
        assert!(Hash::default().is_empty());
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let json = serde_json::to_string(&Hash::new(&[0xde, 0xad])).unwrap();
        assert_eq!(json, "\"DEAD\"");
    }
}
