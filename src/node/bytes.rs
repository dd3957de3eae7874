use std::ops::Deref;

use crate::TrieError;

/// Byte string short enough for the 1-byte length prefix of the node encoding.
///
/// Every key and value held by a node is a [`ShortBytes`], so encoding a node
/// can never silently truncate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
pub struct ShortBytes(Vec<u8>);

impl ShortBytes {
    pub const MAX_LEN: usize = u8::MAX as usize;

    /// Length of the content as it is written in the encoding prefix.
    pub fn len_byte(&self) -> u8 {
        // Bounded by MAX_LEN on construction.
        self.0.len() as u8
    }

    /// Wraps a sub-slice of an already bounded buffer.
    pub(crate) fn from_bounded(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= Self::MAX_LEN);
        Self(bytes.to_vec())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for ShortBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for ShortBytes {
    type Error = TrieError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() > Self::MAX_LEN {
            return Err(TrieError::LengthOverflow { len: bytes.len() });
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<&[u8]> for ShortBytes {
    type Error = TrieError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from(bytes.to_vec())
    }
}

impl From<ShortBytes> for Vec<u8> {
    fn from(bytes: ShortBytes) -> Self {
        bytes.0
    }
}
