//! Example of implementing a custom hasher for the Merkle Patricia Trie
//!
//! This example demonstrates:
//! - Creating a custom hasher implementation
//! - Using it with the trie
//! - Proofs only verify with the hasher that produced them

use mptrie::{Hasher, MPT};
use sha2::{Digest, Sha256};

// Custom hasher that uses SHA256 but adds a prefix to the input
struct PrefixedSha256;

impl Hasher for PrefixedSha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        // Add a custom prefix to the input
        hasher.update(b"custom_prefix:");
        hasher.update(data);
        hasher.finalize().into()
    }
}

fn main() {
    let mut tree = MPT::<PrefixedSha256>::new();
    tree.update(b"account", b"100").unwrap();
    let root_hash = tree.root_hash();
    println!("Root hash with custom hasher: {}", hex::encode(root_hash));

    let mut standard_tree = MPT::<Sha256>::new();
    standard_tree.update(b"account", b"100").unwrap();
    println!(
        "Root hash with standard SHA256: {}",
        hex::encode(standard_tree.root_hash())
    );

    let proof = tree.prove(b"account").unwrap();
    println!(
        "Verified with the custom hasher: {}",
        proof.verify::<PrefixedSha256>(&root_hash, b"account").is_ok()
    );
    println!(
        "Verified with standard SHA256: {}",
        proof.verify::<Sha256>(&root_hash, b"account").is_ok()
    );
}
