//! Example of synchronising state between two parties
//!
//! This example demonstrates:
//! - Applying batches of states
//! - Snapshotting the trie and rolling back to it
//! - Checking a peer's claimed values against a trusted root hash

use std::collections::BTreeMap;

use mptrie::{Node, MPT};
use serde::Deserialize;
use sha2::Sha256;

/// Deep tries nest past serde_json's default limit of 128 levels.
fn load_snapshot(data: &[u8]) -> serde_json::Result<Node> {
    let mut deserializer = serde_json::Deserializer::from_slice(data);
    deserializer.disable_recursion_limit();
    Node::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
}

fn main() {
    env_logger::init();

    let mut trie = MPT::<Sha256>::new();
    let states = BTreeMap::from([("0x1a", "1000"), ("0x1b", "2000"), ("0x2a", "3000")]);
    println!("synchronizing initial states...");
    trie.sync_states(&states).unwrap();
    let initial_root = trie.root_hash();
    println!("root hash after sync: {}", hex::encode(initial_root));

    let snapshot_path = std::env::temp_dir().join("mptrie_snapshot.json");
    let snapshot = serde_json::to_vec_pretty(trie.root()).unwrap();
    std::fs::write(&snapshot_path, snapshot).unwrap();
    println!("created snapshot: {}", snapshot_path.display());

    println!("\nsynchronizing additional states...");
    trie.sync_states([("0x1a", "1500"), ("0x3c", "4000")]).unwrap();
    let root_hash = trie.root_hash();
    println!("root hash after update: {}", hex::encode(root_hash));

    for key in ["0x1a", "0x3c", "0x2a"] {
        // the peer answers with a proof, we only trust the root hash
        let proof = match trie.prove(key.as_bytes()) {
            Ok(proof) => proof,
            Err(err) => {
                println!("failed to generate proof for {}: {}", key, err);
                continue;
            }
        };
        match proof.verify::<Sha256>(&root_hash, key.as_bytes()) {
            Ok(value) => println!(
                "verified value for key {}: {}",
                key,
                String::from_utf8_lossy(&value)
            ),
            Err(err) => println!("proof verification failed for key {}: {}", key, err),
        }
    }

    println!("\nrolling back to snapshot...");
    let data = std::fs::read(&snapshot_path).unwrap();
    let root = load_snapshot(&data).unwrap();
    trie.set_root(root);
    println!("root hash after rollback: {}", hex::encode(trie.root_hash()));
    if trie.root_hash() == initial_root {
        println!("rollback successful: root hash matches initial state");
    }
}
