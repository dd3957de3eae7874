use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mptrie::MPT;
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

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("MPT Insertion");

    group.bench_function("Random keys", |b| {
        b.iter(|| {
            let mut trie = MPT::<Sha256>::new();
            for _ in 0..100 {
                trie.update(&generate_random_key(), &generate_random_value())
                    .unwrap();
            }
        })
    });

    // Keys sharing long prefixes exercise the extension splits.
    group.bench_function("Shared prefixes", |b| {
        b.iter(|| {
            let mut trie = MPT::<Sha256>::new();
            for i in 0..100u32 {
                let mut key = [0xab; 32];
                key[28..].copy_from_slice(&i.to_be_bytes());
                trie.update(&key, &generate_random_value()).unwrap();
            }
        })
    });

    group.bench_function("Root hash", |b| {
        b.iter_batched(
            || {
                let mut trie = MPT::<Sha256>::new();
                for _ in 0..100 {
                    trie.update(&generate_random_key(), &generate_random_value())
                        .unwrap();
                }
                trie
            },
            |trie| trie.root_hash(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_insertion);
criterion_main!(benches);
