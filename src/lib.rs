//! Merkle Patricia Trie implementation
//!
//! This crate provides a hexary Merkle Patricia Trie (MPT): a key/value map
//! over byte strings whose 32-byte root digest commits to the full content.
//!
//! The trie supports:
//! - Insertion of arbitrary byte keys, with an order independent root digest
//! - Inclusion proofs made of the encoded nodes on a key's path
//! - Stateless proof verification against nothing but a root digest
//! - Proof compression for transport
//! - Pluggable hash functions through the `Hasher` trait

mod error;
mod nibbles;
mod node;
mod proof;
mod trie;

pub use error::{ProofError, TrieError};
pub use nibbles::{common_prefix, to_nibbles};
pub use node::{
    Branch, Digest, Extension, Hasher, Leaf, Node, RawNode, ShortBytes, BRANCH_TAG, BRANCH_WIDTH,
    EMPTY_DIGEST, EXTENSION_TAG, LEAF_TAG,
};
pub use proof::{verify_proof, CompressedProof, Proof};
pub use trie::MPT;

#[cfg(test)]
mod tests;
