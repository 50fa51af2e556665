use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use shardset::{ops, ShardSet};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_add(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
    c.bench_function("shard_set_add_10k", |b| {
        b.iter_batched(
            ShardSet::new,
            |set| {
                set.add(&keys);
                black_box(set)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_contains_hit(c: &mut Criterion) {
    let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
    let set = ShardSet::from_iter(&keys);
    let mut i = 0;
    c.bench_function("shard_set_contains_hit", |b| {
        b.iter(|| {
            i = (i + 1) % keys.len();
            black_box(set.contains(&keys[i]))
        })
    });
}

fn bench_parallel_insert(c: &mut Criterion) {
    let threads = std::thread::available_parallelism().map_or(4, usize::from);
    c.bench_function("shard_set_parallel_insert", |b| {
        b.iter_batched(
            ShardSet::new,
            |set| {
                crossbeam_utils::thread::scope(|scope| {
                    for t in 0..threads {
                        let set = set.clone();
                        scope.spawn(move |_| {
                            for x in lcg(t as u64 + 1).take(2_000) {
                                set.insert(key(x));
                            }
                        });
                    }
                })
                .unwrap();
                black_box(set)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_intersection(c: &mut Criterion) {
    let a = ShardSet::from_iter(lcg(3).take(10_000).map(key));
    let b = ShardSet::from_iter(lcg(3).skip(5_000).take(10_000).map(key));
    c.bench_function("shard_set_intersection_10k", |bench| {
        bench.iter(|| black_box(ops::intersection(&[&a, &b])))
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_contains_hit,
    bench_parallel_insert,
    bench_intersection
);
criterion_main!(benches);
