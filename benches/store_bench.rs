//! Benchmarks for the comment store
//!
//! Run with: cargo bench

use blog_comments::storage::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tempfile::tempdir;

fn seeded_store(storage: Storage, count: usize) -> CommentStore {
    let store = CommentStore::new(storage);
    for i in 0..count {
        store
            .append("bench-post", "Bench", "bench@example.com", &format!("comment {}", i))
            .unwrap();
    }
    store
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for size in [10, 100, 1000] {
        let comments: Vec<Comment> = (0..size)
            .map(|i| Comment::with_timestamp("Bench", "bench@example.com", "hello", i as i64))
            .collect();
        let blob = encode_comments(&comments).unwrap();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("encode_{}", size), |b| {
            b.iter(|| encode_comments(black_box(&comments)).unwrap())
        });

        group.bench_function(format!("decode_{}", size), |b| {
            b.iter(|| decode_comments(black_box(&blob)).unwrap())
        });
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    for size in [10, 100] {
        let store = seeded_store(Storage::available(MemoryStore::new()), size);
        group.bench_function(format!("memory_load_{}", size), |b| {
            b.iter(|| store.load(black_box("bench-post")))
        });
    }

    group.bench_function("memory_append", |b| {
        let store = seeded_store(Storage::available(MemoryStore::new()), 0);
        b.iter(|| {
            store
                .append("bench-post", "Bench", "bench@example.com", black_box("hi"))
                .unwrap()
        });
    });

    group.bench_function("file_append_new_post", |b| {
        let dir = tempdir().unwrap();
        let files = FileStore::open(dir.path()).unwrap();
        let store = CommentStore::new(Storage::available(files));
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            let post_id = format!("bench-{}", n);
            store
                .append(&post_id, "Bench", "bench@example.com", black_box("hi"))
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_codec, bench_store);
criterion_main!(benches);
