use std::fmt::Display;

use super::{Digest, Hasher, ShortBytes, LEAF_TAG};
use crate::TrieError;

/// A Leaf terminates a path. Its `key` holds the nibbles that remain to be
/// matched once the parents consumed theirs, and its `value` is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leaf {
    key: ShortBytes,
    value: ShortBytes,
}

impl Leaf {
    pub fn new(key: ShortBytes, value: ShortBytes) -> Self {
        Self { key, value }
    }

    /// Builds a leaf from raw nibble and value buffers, checking both lengths.
    pub fn try_new(key: &[u8], value: &[u8]) -> Result<Self, TrieError> {
        Ok(Self::new(key.try_into()?, value.try_into()?))
    }

    /// Remaining nibbles of the key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: ShortBytes) {
        self.value = value;
    }

    pub(crate) fn into_parts(self) -> (ShortBytes, ShortBytes) {
        (self.key, self.value)
    }

    /// `tag || key_len || key || value_len || value`
    pub fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(3 + self.key.len() + self.value.len());
        encoded.push(LEAF_TAG);
        encoded.push(self.key.len_byte());
        encoded.extend_from_slice(&self.key);
        encoded.push(self.value.len_byte());
        encoded.extend_from_slice(&self.value);
        encoded
    }

    /// Hashes the encoding. Not cached.
    pub fn hash<H: Hasher>(&self) -> Digest {
        H::hash(&self.encode())
    }
}

impl Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Leaf {{ key: {}, value: {} }}",
            hex::encode(self.key.as_slice()),
            hex::encode(self.value.as_slice())
        )
    }
}
