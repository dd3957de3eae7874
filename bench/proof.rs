use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mptrie::{verify_proof, MPT};
use sha2::Sha256;

pub fn generate_random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    for byte in key.iter_mut() {
        *byte = rand::random();
    }
    key
}

pub fn generate_random_value() -> Vec<u8> {
    let mut value = Vec::with_capacity(32);
    for _ in 0..32 {
        value.push(rand::random());
    }
    value
}

fn setup_trie(num_leaves: usize) -> (MPT<Sha256>, Vec<[u8; 32]>) {
    let mut trie = MPT::<Sha256>::new();
    let mut keys = Vec::with_capacity(num_leaves);

    for _ in 0..num_leaves {
        let key = generate_random_key();
        trie.update(&key, &generate_random_value()).unwrap();
        keys.push(key);
    }

    (trie, keys)
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("MPT Proof Generation");

    let (trie, keys) = setup_trie(100);

    group.bench_function("Prove", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(trie.prove(key)).unwrap();
            }
        })
    });

    group.bench_function("Prove and compress", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(trie.prove(key).unwrap().compress()).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("MPT Proof Verification");

    let (trie, keys) = setup_trie(100);
    let root_hash = trie.root_hash();
    let proofs: Vec<_> = keys.iter().map(|key| trie.prove(key).unwrap()).collect();
    let encoded: Vec<_> = proofs
        .iter()
        .map(|proof| proof.compress().unwrap().encode().unwrap())
        .collect();

    group.bench_function("Verify", |b| {
        b.iter(|| {
            for (key, proof) in keys.iter().zip(proofs.iter()) {
                black_box(verify_proof::<Sha256>(&root_hash, key, proof)).unwrap();
            }
        })
    });

    group.bench_function("Decode and verify", |b| {
        b.iter(|| {
            for (key, bytes) in keys.iter().zip(encoded.iter()) {
                let proof = mptrie::CompressedProof::decode(bytes)
                    .and_then(|compressed| compressed.decompress())
                    .unwrap();
                black_box(proof.verify::<Sha256>(&root_hash, key)).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
