use std::fmt::Display;

use super::{Digest, Hasher, Node, ShortBytes, EXTENSION_TAG};

/// An Extension compresses a run of nibbles shared by every key below it.
/// It owns exactly one child, which the trie engine always makes a [`super::Branch`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extension {
    key: ShortBytes,
    child: Box<Node>,
}

impl Extension {
    /// Creates a new [`Extension`]. `key` should be nonempty; the trie engine
    /// never builds one with an empty shared prefix.
    pub fn new(key: ShortBytes, child: Node) -> Self {
        Self {
            key,
            child: Box::new(child),
        }
    }

    /// Shared nibbles.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn child(&self) -> &Node {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node {
        &mut self.child
    }

    pub(crate) fn into_parts(self) -> (ShortBytes, Node) {
        (self.key, *self.child)
    }

    /// `tag || key_len || key || child_digest`
    pub fn encode<H: Hasher>(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(2 + self.key.len() + 32);
        encoded.push(EXTENSION_TAG);
        encoded.push(self.key.len_byte());
        encoded.extend_from_slice(&self.key);
        encoded.extend_from_slice(&self.child.hash::<H>());
        encoded
    }

    pub fn hash<H: Hasher>(&self) -> Digest {
        H::hash(&self.encode::<H>())
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Extension {{ key: {} }}", hex::encode(self.key.as_slice()))
    }
}
