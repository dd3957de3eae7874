//! Error types for the Merkle Patricia Trie implementation

use thiserror::Error;

use crate::Digest;

/// Error type for trie operations
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TrieError {
    /// The key is not reachable along the trie's structural path
    #[error("Key not found in trie")]
    KeyNotFound,
    /// A key or value does not fit the 1-byte length prefix of the node encoding
    #[error("Length {len} exceeds the 255 byte limit of the node encoding")]
    LengthOverflow { len: usize },
}

/// Reasons a proof gets rejected. Verification stops at the first one.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProofError {
    #[error("Proof is empty")]
    EmptyProof,
    #[error(
        "Root mismatch: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.got)
    )]
    RootMismatch { expected: Digest, got: Digest },
    #[error("Leaf key does not match the remaining key")]
    LeafKeyMismatch,
    #[error("Extension prefix does not match the remaining key")]
    PrefixMismatch,
    /// The entry following index `index` does not hash to the digest it references
    #[error("Child hash mismatch after proof entry {index}")]
    ChildHashMismatch { index: usize },
    #[error("Proof ends before the referenced child")]
    TruncatedProof,
    #[error("Branch holds no value for the exhausted key")]
    NoTerminalValue,
    #[error("Proof exhausted without reaching a value")]
    IncompleteProof,
    /// Unknown tag, or a buffer that is too short or too long for its node
    #[error("Invalid node encoding")]
    InvalidEncoding,
}
