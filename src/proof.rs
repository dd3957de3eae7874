//! Inclusion proofs and their stateless verification.
//!
//! A proof is the list of encoded nodes on the path of a key, root first.
//! Verifying it only needs the claimed root digest: the first entry must hash
//! to it and every following entry must hash to the digest its predecessor
//! references on the key's path.
//!
//! A proof can be compressed by dropping the empty child digests of its
//! branch entries, and encoded to bytes for transport.

use std::fmt::Display;

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;
use log::{debug, trace};

use crate::{
    nibbles::{common_prefix, to_nibbles},
    node::{Digest, Hasher, RawNode, BRANCH_TAG, BRANCH_WIDTH, EMPTY_DIGEST},
    ProofError,
};

/// A merkle proof for a given key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    nodes: Vec<Vec<u8>>,
}

impl Proof {
    /// Creates a new proof from a list of encoded nodes, root first.
    pub fn new(nodes: Vec<Vec<u8>>) -> Self {
        Self { nodes }
    }

    /// Returns the encoded nodes in the proof.
    pub fn nodes(&self) -> &[Vec<u8>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Vec<u8>> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Verifies the proof of `key` against `root_hash`. See [`verify_proof`].
    pub fn verify<H: Hasher>(
        &self,
        root_hash: &Digest,
        key: &[u8],
    ) -> Result<Vec<u8>, ProofError> {
        verify_proof::<H>(root_hash, key, self)
    }

    /// Compresses the proof into a compressed proof.
    ///
    /// Fails if a branch entry is not a well formed branch encoding.
    pub fn compress(&self) -> Result<CompressedProof, ProofError> {
        let mut bits = BitVec::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.iter() {
            if node.first() != Some(&BRANCH_TAG) {
                nodes.push(node.clone());
                continue;
            }
            let RawNode::Branch { children, terminal } = RawNode::parse(node)? else {
                return Err(ProofError::InvalidEncoding);
            };
            let mut compressed = vec![BRANCH_TAG];
            for child in children.iter() {
                if *child == EMPTY_DIGEST {
                    bits.push(true);
                } else {
                    bits.push(false);
                    compressed.extend_from_slice(child);
                }
            }
            compressed.push(terminal.len() as u8);
            compressed.extend_from_slice(terminal);
            nodes.push(compressed);
        }
        Ok(CompressedProof::new(nodes, bits))
    }
}

impl Display for Proof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nodes: Vec<String> = self.nodes.iter().map(hex::encode).collect();
        write!(f, "Proof [{}]", nodes.join(", "))
    }
}

/// Verify a merkle proof for a given key.
///
/// # Arguments
///
/// * `root_hash` - The claimed root digest, the only trusted input
/// * `key` - The raw key the proof is about
/// * `proof` - The proof to verify
///
/// # Returns
///
/// Returns the value proven for `key`, otherwise the reason the proof was
/// rejected.
pub fn verify_proof<H: Hasher>(
    root_hash: &Digest,
    key: &[u8],
    proof: &Proof,
) -> Result<Vec<u8>, ProofError> {
    let result = walk_proof::<H>(root_hash, key, proof.nodes());
    if let Err(err) = &result {
        debug!("proof rejected: {}", err);
    }
    result
}

fn walk_proof<H: Hasher>(
    root_hash: &Digest,
    key: &[u8],
    nodes: &[Vec<u8>],
) -> Result<Vec<u8>, ProofError> {
    let first = nodes.first().ok_or(ProofError::EmptyProof)?;
    let got = H::hash(first);
    if got != *root_hash {
        return Err(ProofError::RootMismatch {
            expected: *root_hash,
            got,
        });
    }

    let nibbles = to_nibbles(key);
    let mut remaining = nibbles.as_slice();
    for (index, node) in nodes.iter().enumerate() {
        let raw = RawNode::parse(node)?;
        trace!("proof: entry {}: {:?}", index, raw);
        let expected_child = match raw {
            RawNode::Leaf { key: leaf_key, value } => {
                if leaf_key != remaining {
                    return Err(ProofError::LeafKeyMismatch);
                }
                return Ok(value.to_vec());
            }
            RawNode::Extension { key: prefix, child } => {
                let shared = common_prefix(prefix, remaining);
                if shared != prefix.len() {
                    return Err(ProofError::PrefixMismatch);
                }
                remaining = &remaining[shared..];
                child
            }
            RawNode::Branch { children, terminal } => match remaining.split_first() {
                None if terminal.is_empty() => return Err(ProofError::NoTerminalValue),
                None => return Ok(terminal.to_vec()),
                Some((&nibble, rest)) => {
                    remaining = rest;
                    children[nibble as usize]
                }
            },
        };
        let next = nodes.get(index + 1).ok_or(ProofError::TruncatedProof)?;
        if H::hash(next) != expected_child {
            return Err(ProofError::ChildHashMismatch { index });
        }
    }
    // Every entry either ends the walk or has a checked successor.
    Err(ProofError::IncompleteProof)
}

/// A compressed merkle proof for a given key.
/// Branch entries don't store the digests of their empty slots; one bit per
/// slot records which ones were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedProof {
    nodes: Vec<Vec<u8>>,
    bits: BitVec<u8, Lsb0>,
}

impl CompressedProof {
    /// Creates a new compressed proof from a list of compacted entries and a bitvector.
    pub fn new(nodes: Vec<Vec<u8>>, bits: BitVec<u8, Lsb0>) -> Self {
        Self { nodes, bits }
    }

    pub fn nodes(&self) -> &[Vec<u8>] {
        &self.nodes
    }

    /// Decompresses the proof into a proof, restoring every entry byte for byte.
    pub fn decompress(&self) -> Result<Proof, ProofError> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut slots = self.bits.iter().by_vals();
        for node in self.nodes.iter() {
            if node.first() != Some(&BRANCH_TAG) {
                nodes.push(node.clone());
                continue;
            }
            let mut rest = &node[1..];
            let mut restored = Vec::with_capacity(1 + BRANCH_WIDTH * 32 + rest.len());
            restored.push(BRANCH_TAG);
            for _ in 0..BRANCH_WIDTH {
                if slots.next().ok_or(ProofError::InvalidEncoding)? {
                    restored.extend_from_slice(&EMPTY_DIGEST);
                } else {
                    if rest.len() < 32 {
                        return Err(ProofError::InvalidEncoding);
                    }
                    let (digest, tail) = rest.split_at(32);
                    restored.extend_from_slice(digest);
                    rest = tail;
                }
            }
            restored.extend_from_slice(rest);
            nodes.push(restored);
        }
        // Raw bit storage is padded to whole bytes; anything past that is junk.
        if slots.len() >= 8 {
            return Err(ProofError::InvalidEncoding);
        }
        Ok(Proof::new(nodes))
    }

    /// Encodes the proof into a byte vector.
    ///
    /// `u16 entry count || (u16 length || entry)* || bits`
    ///
    /// Fails with [`ProofError::InvalidEncoding`] when the entry count or an
    /// entry length does not fit in a `u16`.
    pub fn encode(&self) -> Result<Vec<u8>, ProofError> {
        fn write_u16(encoded: &mut Vec<u8>, len: usize) -> Result<(), ProofError> {
            let len = u16::try_from(len).map_err(|_| ProofError::InvalidEncoding)?;
            encoded.extend_from_slice(&len.to_be_bytes());
            Ok(())
        }

        let mut encoded = Vec::new();
        write_u16(&mut encoded, self.nodes.len())?;
        for node in self.nodes.iter() {
            write_u16(&mut encoded, node.len())?;
            encoded.extend_from_slice(node);
        }
        encoded.extend_from_slice(self.bits.as_raw_slice());
        Ok(encoded)
    }

    /// Decodes a proof from a byte vector.
    pub fn decode(data: &[u8]) -> Result<Self, ProofError> {
        fn read_u16(data: &[u8], at: usize) -> Result<usize, ProofError> {
            let bytes = data.get(at..at + 2).ok_or(ProofError::InvalidEncoding)?;
            Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as usize)
        }

        let nb_nodes = read_u16(data, 0)?;
        let mut nodes = Vec::with_capacity(nb_nodes);
        let mut data_index = 2;
        for _ in 0..nb_nodes {
            let len = read_u16(data, data_index)?;
            data_index += 2;
            let node = data
                .get(data_index..data_index + len)
                .ok_or(ProofError::InvalidEncoding)?;
            nodes.push(node.to_vec());
            data_index += len;
        }
        let bits = BitVec::<u8, Lsb0>::from_slice(&data[data_index..]);
        Ok(Self::new(nodes, bits))
    }
}
