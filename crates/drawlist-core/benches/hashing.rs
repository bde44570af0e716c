//! Benchmarks for name hashing and the bounded per-frame vector.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use drawlist_core::alloc::{BoundedVec, HashMap};
use drawlist_core::hash::{hash_bytes, hash_names, hash_str};
use drawlist_core::math::Mat4;

fn bench_hash_str(c: &mut Criterion) {
    let names: Vec<String> = (0..1000).map(|i| format!("tag_{}", i)).collect();

    c.bench_function("hash_str_1000", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for name in &names {
                acc ^= hash_str(black_box(name));
            }
            acc
        });
    });
}

fn bench_hash_matrix(c: &mut Criterion) {
    let view_proj = Mat4::perspective_rh_gl(1.0, 1.5, 0.1, 100.0);
    let floats = view_proj.to_cols_array();

    c.bench_function("hash_view_projection", |b| {
        b.iter(|| hash_bytes(bytemuck::bytes_of(black_box(&floats))));
    });
}

fn bench_tag_list_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_list_lookup");

    for size in [8, 64, 512] {
        group.throughput(Throughput::Elements(size as u64));

        let lists: Vec<Vec<u64>> = (0..size)
            .map(|i| vec![hash_str(&format!("tag_{}", i)), hash_str("shared")])
            .collect();
        let map: HashMap<u64, Vec<u64>> = lists
            .iter()
            .map(|tags| (hash_names(tags), tags.clone()))
            .collect();
        let keys: Vec<u64> = lists.iter().map(|tags| hash_names(tags)).collect();

        group.bench_with_input(BenchmarkId::new("ahash", size), &keys, |b, keys| {
            b.iter(|| {
                let mut found = 0;
                for key in keys {
                    if map.contains_key(black_box(key)) {
                        found += 1;
                    }
                }
                found
            });
        });
    }

    group.finish();
}

fn bench_bounded_refill(c: &mut Criterion) {
    let mut vec = BoundedVec::with_capacity(4096);

    c.bench_function("bounded_vec_refill_4096", |b| {
        b.iter(|| {
            vec.clear();
            for i in 0..4096u32 {
                let _ = vec.try_push(black_box(i));
            }
            vec.len()
        });
    });
}

criterion_group!(
    benches,
    bench_hash_str,
    bench_hash_matrix,
    bench_tag_list_lookup,
    bench_bounded_refill
);
criterion_main!(benches);
