//! Micro benchmarks for the in-memory tree.
#![forbid(unsafe_code)]
#![allow(missing_docs)]

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use digitree::{DigiTree, Direction, KeyBound, KeyRange};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const INSERT_COUNT: u64 = 32_768;
const LOOKUP_SAMPLES: usize = 4_096;
const RANGE_WIDTH: u64 = 512;

fn micro_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("micro/tree");
    group.sample_size(30);

    group.throughput(Throughput::Elements(INSERT_COUNT));
    group.bench_function("sequential_insert", |b| {
        b.iter_batched(
            DigiTree::<u64, u64>::new,
            |mut tree| {
                insert_sequence(&mut tree, INSERT_COUNT);
                black_box(tree.height().expect("height"));
            },
            BatchSize::SmallInput,
        );
    });

    let mut random_keys: Vec<u64> = (0..INSERT_COUNT).collect();
    random_keys.shuffle(&mut ChaCha8Rng::seed_from_u64(0xBEEF_F00D));
    group.throughput(Throughput::Elements(INSERT_COUNT));
    group.bench_function("random_insert", |b| {
        b.iter_batched(
            DigiTree::<u64, u64>::new,
            |mut tree| {
                for key in &random_keys {
                    tree.insert(*key).expect("insert");
                }
                black_box(tree.height().expect("height"));
            },
            BatchSize::SmallInput,
        );
    });

    group.throughput(Throughput::Elements(INSERT_COUNT));
    group.bench_function("delete_random", |b| {
        b.iter_batched(
            || {
                let mut tree = DigiTree::<u64, u64>::new();
                insert_sequence(&mut tree, INSERT_COUNT);
                tree
            },
            |mut tree| {
                for key in &random_keys {
                    let path = tree.find(key).expect("find");
                    tree.delete_at(&path).expect("delete");
                }
                black_box(tree.height().expect("height"));
            },
            BatchSize::SmallInput,
        );
    });

    let mut loaded = LoadedTree::new(INSERT_COUNT);
    group.throughput(Throughput::Elements(LOOKUP_SAMPLES as u64));
    group.bench_function(BenchmarkId::new("point_lookup", LOOKUP_SAMPLES), |b| {
        b.iter(|| loaded.point_lookup(LOOKUP_SAMPLES));
    });

    group.throughput(Throughput::Elements(RANGE_WIDTH));
    group.bench_function(BenchmarkId::new("range_scan", RANGE_WIDTH), |b| {
        b.iter(|| loaded.range_scan(RANGE_WIDTH));
    });

    group.bench_function("count_all", |b| {
        b.iter(|| {
            black_box(
                loaded
                    .tree
                    .get_count(None, Direction::Ascending)
                    .expect("count"),
            )
        });
    });

    group.finish();
}

fn insert_sequence(tree: &mut DigiTree<u64, u64>, count: u64) {
    for key in 0..count {
        tree.insert(key).expect("insert");
    }
}

struct LoadedTree {
    tree: DigiTree<u64, u64>,
    max_key: u64,
    rng: ChaCha8Rng,
}

impl LoadedTree {
    fn new(count: u64) -> Self {
        let mut tree = DigiTree::new();
        insert_sequence(&mut tree, count);
        Self {
            tree,
            max_key: count,
            rng: ChaCha8Rng::seed_from_u64(0xFEED_FACE),
        }
    }

    fn point_lookup(&mut self, samples: usize) {
        for _ in 0..samples {
            let key = self.rng.gen_range(0..self.max_key);
            black_box(self.tree.get(&key).expect("get"));
        }
    }

    fn range_scan(&mut self, width: u64) {
        for _ in 0..16 {
            let start = self.rng.gen_range(0..(self.max_key - width));
            let range = KeyRange::new(
                Some(KeyBound::inclusive(start)),
                Some(KeyBound::inclusive(start + width)),
                Direction::Ascending,
            );
            let cursor = self.tree.range(&range).expect("range");
            for entry in cursor.entries(&self.tree) {
                black_box(entry.expect("entry"));
            }
        }
    }
}

criterion_group!(benches, micro_tree);
criterion_main!(benches);
