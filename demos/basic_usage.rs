//! Basic example of using the Merkle Patricia Trie
//!
//! This example demonstrates:
//! - Creating a new trie
//! - Inserting key/value pairs
//! - Getting the root hash
//! - Generating and verifying proofs

use mptrie::{verify_proof, MPT};
use sha2::Sha256;

fn main() {
    env_logger::init();

    // Create a new trie hashing its nodes with SHA256
    let mut trie = MPT::<Sha256>::new();

    trie.update(b"0x1a", b"1000").unwrap();
    trie.update(b"0x1b", b"2000").unwrap();
    trie.update(b"0x2a", b"3000").unwrap();

    let root_hash = trie.root_hash();
    println!("Root hash: {}", hex::encode(root_hash));

    // The proof only holds the nodes on the path of the key
    let proof = trie.prove(b"0x1b").unwrap();
    println!("Proof length: {}", proof.len());

    // A verifier only needs the root hash it trusts
    match verify_proof::<Sha256>(&root_hash, b"0x1b", &proof) {
        Ok(value) => println!("Verified value: {}", String::from_utf8_lossy(&value)),
        Err(err) => println!("Proof rejected: {}", err),
    }

    // Compressed proofs are what you would send over the wire
    let encoded = proof.compress().unwrap().encode().unwrap();
    let raw_size: usize = proof.nodes().iter().map(Vec::len).sum();
    println!("Proof size: {} bytes, encoded: {} bytes", raw_size, encoded.len());

    println!("Proof for missing key: {:?}", trie.prove(b"0x9z").err());
}
