mod branch;
mod bytes;
mod extension;
mod leaf;
mod raw;

use sha2::{Digest as _, Sha256};
use std::fmt::Display;

pub use branch::{Branch, BRANCH_WIDTH};
pub use bytes::ShortBytes;
pub use extension::Extension;
pub use leaf::Leaf;
pub use raw::RawNode;

/// Fixed-size output of the trie's hash function.
pub type Digest = [u8; 32];

/// Digest of [`Node::Empty`] and of absent branch slots. Never the hash of
/// any encoding.
pub const EMPTY_DIGEST: Digest = [0; 32];

pub const LEAF_TAG: u8 = 1;
pub const EXTENSION_TAG: u8 = 2;
pub const BRANCH_TAG: u8 = 3;

/// Simple hash trait required to hash the nodes in the trie.
///
/// Every party exchanging proofs must agree on the implementation.
pub trait Hasher {
    fn hash(data: &[u8]) -> Digest;
}

impl Hasher for Sha256 {
    fn hash(data: &[u8]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

#[cfg(feature = "keccak")]
impl Hasher for sha3::Keccak256 {
    fn hash(data: &[u8]) -> Digest {
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

/// All possible nodes in the trie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Placeholder for an absent subtree
    #[default]
    Empty,
    /// End of a path, holding the remaining key nibbles and a value
    Leaf(Leaf),
    /// Shared nibble prefix in front of a single child
    Extension(Extension),
    /// 16-way fan out with an optional terminal value
    Branch(Branch),
}

impl Node {
    /// Canonical encoding of the node. [`Node::Empty`] has none and yields an
    /// empty buffer; it never appears in a proof.
    pub fn encode<H: Hasher>(&self) -> Vec<u8> {
        match self {
            Self::Empty => Vec::new(),
            Self::Leaf(leaf) => leaf.encode(),
            Self::Extension(extension) => extension.encode::<H>(),
            Self::Branch(branch) => branch.encode::<H>(),
        }
    }

    /// Returns the digest of the node, recomputing the whole subtree.
    pub fn hash<H: Hasher>(&self) -> Digest {
        match self {
            Self::Empty => EMPTY_DIGEST,
            Self::Leaf(leaf) => leaf.hash::<H>(),
            Self::Extension(extension) => extension.hash::<H>(),
            Self::Branch(branch) => branch.hash::<H>(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Leaf(leaf) => write!(f, "{}", leaf),
            Self::Extension(extension) => write!(f, "{}", extension),
            Self::Branch(branch) => write!(f, "{}", branch),
        }
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;
    use sha2::Sha256;

    use super::{Branch, Hasher, Leaf, Node, EMPTY_DIGEST};

    #[test]
    fn test_empty_node() {
        assert_eq!(Node::Empty.hash::<Sha256>(), EMPTY_DIGEST);
        assert!(Node::Empty.encode::<Sha256>().is_empty());
        assert!(Node::default().is_empty());
    }

    #[test]
    fn test_sha256_hasher() {
        assert_eq!(
            <Sha256 as Hasher>::hash(b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[cfg(feature = "keccak")]
    #[test]
    fn test_keccak_hasher() {
        assert_eq!(
            <sha3::Keccak256 as Hasher>::hash(b""),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn test_node_hash_matches_variant() {
        let leaf = Leaf::try_new(&[1, 2, 3], b"abc").unwrap();
        assert_eq!(
            Node::Leaf(leaf.clone()).hash::<Sha256>(),
            leaf.hash::<Sha256>()
        );
        assert_eq!(
            Node::Branch(Branch::new()).hash::<Sha256>(),
            Branch::new().hash::<Sha256>()
        );
    }

    #[test]
    fn test_node_display() {
        assert_eq!(format!("{}", Node::Empty), "Empty");
        let leaf = Node::Leaf(Leaf::try_new(&[10], b"v").unwrap());
        assert_eq!(format!("{}", leaf), "Leaf { key: 0a, value: 76 }");
    }
}
