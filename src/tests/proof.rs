//! Tests for proof generation and verification

use sha2::Sha256;

use crate::{verify_proof, Hasher, Proof, ProofError, MPT};

fn sample_trie() -> MPT {
    let mut trie = MPT::new();
    trie.sync_states([
        ("0x1a", "1500"),
        ("0x1b", "2000"),
        ("0x2a", "3000"),
        ("0x3c", "4000"),
    ])
    .unwrap();
    trie
}

#[test]
fn test_proof_path_shape() {
    let trie = sample_trie();
    let proof = trie.prove(b"0x1a").unwrap();
    // extension, branch, extension, branch, leaf
    let tags: Vec<u8> = proof.nodes().iter().map(|node| node[0]).collect();
    assert_eq!(tags, vec![2, 3, 2, 3, 1]);
    assert_eq!(Sha256::hash(&proof.nodes()[0]), trie.root_hash());
}

#[test]
fn test_every_key_verifies() {
    let trie = sample_trie();
    let root_hash = trie.root_hash();
    let states = [
        ("0x1a", "1500"),
        ("0x1b", "2000"),
        ("0x2a", "3000"),
        ("0x3c", "4000"),
    ];
    for (key, value) in states {
        let proof = trie.prove(key.as_bytes()).unwrap();
        assert_eq!(
            verify_proof::<Sha256>(&root_hash, key.as_bytes(), &proof),
            Ok(value.as_bytes().to_vec())
        );
    }
}

#[test]
fn test_terminal_value_proof() {
    let mut trie = MPT::<Sha256>::new();
    trie.sync_states([("a", "short"), ("ab", "long")]).unwrap();
    let proof = trie.prove(b"a").unwrap();
    // extension, then the branch holding the terminal
    assert_eq!(proof.len(), 2);
    assert_eq!(
        proof.verify::<Sha256>(&trie.root_hash(), b"a"),
        Ok(b"short".to_vec())
    );
}

#[test]
fn test_tampered_entries_are_rejected() {
    let trie = sample_trie();
    let root_hash = trie.root_hash();
    for key in ["0x1a", "0x2a", "0x3c"] {
        let proof = trie.prove(key.as_bytes()).unwrap();
        for index in 0..proof.len() {
            for byte in 0..proof.nodes()[index].len() {
                let mut nodes = proof.nodes().to_vec();
                nodes[index][byte] ^= 0x01;
                let tampered = Proof::new(nodes);
                assert!(
                    tampered.verify::<Sha256>(&root_hash, key.as_bytes()).is_err(),
                    "key {} entry {} byte {}",
                    key,
                    index,
                    byte
                );
            }
        }
    }
}

#[test]
fn test_tampered_root_is_rejected() {
    let trie = sample_trie();
    let proof = trie.prove(b"0x1b").unwrap();
    for byte in 0..32 {
        let mut root_hash = trie.root_hash();
        root_hash[byte] ^= 0x80;
        assert!(matches!(
            proof.verify::<Sha256>(&root_hash, b"0x1b"),
            Err(ProofError::RootMismatch { .. })
        ));
    }
}

#[test]
fn test_reordered_and_substituted_entries() {
    let trie = sample_trie();
    let root_hash = trie.root_hash();
    let proof = trie.prove(b"0x1a").unwrap();

    let mut nodes = proof.nodes().to_vec();
    nodes.swap(2, 3);
    assert_eq!(
        Proof::new(nodes).verify::<Sha256>(&root_hash, b"0x1a"),
        Err(ProofError::ChildHashMismatch { index: 1 })
    );

    // leaf of 0x1b in place of the leaf of 0x1a
    let other = trie.prove(b"0x1b").unwrap();
    let mut nodes = proof.nodes().to_vec();
    nodes[4] = other.nodes()[4].clone();
    assert_eq!(
        Proof::new(nodes).verify::<Sha256>(&root_hash, b"0x1a"),
        Err(ProofError::ChildHashMismatch { index: 3 })
    );
}

#[test]
fn test_empty_proof() {
    assert_eq!(
        verify_proof::<Sha256>(&[0; 32], b"key", &Proof::new(Vec::new())),
        Err(ProofError::EmptyProof)
    );
}

#[test]
fn test_root_mismatch_reports_digests() {
    let trie = sample_trie();
    let proof = trie.prove(b"0x1a").unwrap();
    assert_eq!(
        proof.verify::<Sha256>(&[7; 32], b"0x1a"),
        Err(ProofError::RootMismatch {
            expected: [7; 32],
            got: trie.root_hash(),
        })
    );
}

#[test]
fn test_leaf_key_mismatch() {
    let mut trie = MPT::<Sha256>::new();
    trie.update(b"0x1a", b"1000").unwrap();
    let proof = trie.prove(b"0x1a").unwrap();
    assert_eq!(
        proof.verify::<Sha256>(&trie.root_hash(), b"0x1b"),
        Err(ProofError::LeafKeyMismatch)
    );
}

#[test]
fn test_prefix_mismatch() {
    let trie = sample_trie();
    let proof = trie.prove(b"0x1a").unwrap();
    assert_eq!(
        proof.verify::<Sha256>(&trie.root_hash(), b"1x1a"),
        Err(ProofError::PrefixMismatch)
    );
}

#[test]
fn test_proof_for_another_key() {
    let trie = sample_trie();
    let proof = trie.prove(b"0x1a").unwrap();
    // the second branch selects slot 2 for 0x1b, which is not the next entry
    assert_eq!(
        proof.verify::<Sha256>(&trie.root_hash(), b"0x1b"),
        Err(ProofError::ChildHashMismatch { index: 3 })
    );
}

#[test]
fn test_truncated_proof() {
    let trie = sample_trie();
    let mut nodes = trie.prove(b"0x2a").unwrap().into_nodes();
    nodes.pop();
    assert_eq!(
        Proof::new(nodes).verify::<Sha256>(&trie.root_hash(), b"0x2a"),
        Err(ProofError::TruncatedProof)
    );
}

#[test]
fn test_no_terminal_value() {
    let mut trie = MPT::<Sha256>::new();
    trie.update(&[0x12, 0x34], b"a").unwrap();
    trie.update(&[0x12, 0x56], b"b").unwrap();
    let proof = trie.prove(&[0x12, 0x34]).unwrap();
    assert_eq!(
        proof.verify::<Sha256>(&trie.root_hash(), &[0x12]),
        Err(ProofError::NoTerminalValue)
    );
}

#[test]
fn test_invalid_encoding() {
    let garbage = vec![9, 9];
    let root_hash = Sha256::hash(&garbage);
    assert_eq!(
        verify_proof::<Sha256>(&root_hash, b"key", &Proof::new(vec![garbage])),
        Err(ProofError::InvalidEncoding)
    );

    let truncated = vec![1, 4, 0];
    let root_hash = Sha256::hash(&truncated);
    assert_eq!(
        verify_proof::<Sha256>(&root_hash, b"key", &Proof::new(vec![truncated])),
        Err(ProofError::InvalidEncoding)
    );
}

#[test]
fn test_entries_after_leaf_are_ignored() {
    let trie = sample_trie();
    let mut nodes = trie.prove(b"0x3c").unwrap().into_nodes();
    nodes.push(vec![0xff; 4]);
    assert_eq!(
        Proof::new(nodes).verify::<Sha256>(&trie.root_hash(), b"0x3c"),
        Ok(b"4000".to_vec())
    );
}

#[test]
fn test_stale_proof_against_new_root() {
    let mut trie = sample_trie();
    let stale = trie.prove(b"0x1a").unwrap();
    trie.update(b"0x1a", b"9999").unwrap();
    assert!(matches!(
        stale.verify::<Sha256>(&trie.root_hash(), b"0x1a"),
        Err(ProofError::RootMismatch { .. })
    ));
}
