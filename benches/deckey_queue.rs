use criterion::{black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId, Criterion};
use heap_bench::queue::{AddressableHeap, Item, Key};
use heap_bench::{DaryExplicitHeap, DaryImplicitHeap, FibonacciHeap, Handle, PairingHeap, QuakeHeap, RankPairingHeap, ViolationHeap};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

struct TestData {
    push: Vec<(Item, Key)>,
    first_deckey: Vec<(Item, Key)>,
    second_deckey: Vec<(Item, Key)>,
}

impl TestData {
    fn new(seed: u64, n_push: usize, n_deckey1: usize, n_deckey2: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut push = Vec::new();
        for node in 0..n_push {
            push.push((node as Item, rng.random()));
        }

        let mut first_deckey = Vec::new();
        for _ in 0..n_deckey1 {
            let node = rng.random_range(0..n_push);
            first_deckey.push((node as Item, rng.random()));
        }

        let mut second_deckey = Vec::new();
        for _ in 0..n_deckey2 {
            let node = rng.random_range(0..n_push);
            second_deckey.push((node as Item, rng.random()));
        }

        Self {
            push,
            first_deckey,
            second_deckey,
        }
    }

    fn n_first_pop(&self) -> usize {
        self.push.len() / 2
    }
}

fn try_decrease_or_insert<H: AddressableHeap>(pq: &mut H, handle_of: &mut [Option<Handle>], item: Item, key: Key) {
    match handle_of[item as usize] {
        Some(handle) if key < pq.key_of(handle) => pq.decrease_key(handle, key),
        Some(_) => {}
        None => handle_of[item as usize] = Some(pq.insert(item, key).unwrap()),
    }
}

fn run_on_deckey_heap<H: AddressableHeap>(mut pq: H, n_push: usize, data: &TestData) -> (u64, u64) {
    let mut handle_of: Vec<Option<Handle>> = vec![None; n_push];
    let mut sum_items = 0u64;
    let mut sum_keys = 0u64;

    for &(item, key) in &data.push {
        handle_of[item as usize] = Some(pq.insert(item, key).unwrap());
    }

    for &(item, key) in &data.first_deckey {
        try_decrease_or_insert(&mut pq, &mut handle_of, item, key);
    }

    for _ in 0..data.n_first_pop() {
        if let Some(handle) = pq.find_min() {
            sum_items += pq.item_of(handle) as u64;
            sum_keys += pq.delete_min().unwrap() as u64;
        }
    }

    for &(item, key) in &data.second_deckey {
        try_decrease_or_insert(&mut pq, &mut handle_of, item, key);
    }

    while let Some(key) = pq.delete_min() {
        sum_keys += key as u64;
    }

    (sum_items, sum_keys)
}

fn run_on_implicit_dary<const D: usize>(group: &mut BenchmarkGroup<WallTime>, n: usize, data: &TestData) {
    group.bench_with_input(BenchmarkId::new(format!("DaryImplicitHeap<{D}>"), n), &n, |b, &n| {
        b.iter(|| run_on_deckey_heap(black_box(DaryImplicitHeap::<D>::with_capacity(n)), n, black_box(data)))
    });
}

fn run_on_explicit_dary<const D: usize>(group: &mut BenchmarkGroup<WallTime>, n: usize, data: &TestData) {
    group.bench_with_input(BenchmarkId::new(format!("DaryExplicitHeap<{D}>"), n), &n, |b, &n| {
        b.iter(|| run_on_deckey_heap(black_box(DaryExplicitHeap::<D>::with_capacity(n)), n, black_box(data)))
    });
}

fn bench_deckey_queue(c: &mut Criterion) {
    let treatments = vec![1_000, 10_000, 100_000];

    let mut group = c.benchmark_group("deckey_queue");

    for n in &treatments {
        let data = TestData::new(8498723, *n, n / 2, n / 2);

        run_on_implicit_dary::<2>(&mut group, *n, &data);
        run_on_implicit_dary::<4>(&mut group, *n, &data);
        run_on_implicit_dary::<8>(&mut group, *n, &data);

        run_on_explicit_dary::<2>(&mut group, *n, &data);
        run_on_explicit_dary::<4>(&mut group, *n, &data);

        group.bench_with_input(BenchmarkId::new("PairingHeap", n), n, |b, &n_ref| {
            b.iter(|| run_on_deckey_heap(black_box(PairingHeap::with_capacity(n_ref)), n_ref, black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("FibonacciHeap", n), n, |b, &n_ref| {
            b.iter(|| run_on_deckey_heap(black_box(FibonacciHeap::with_capacity(n_ref)), n_ref, black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("RankPairingHeap", n), n, |b, &n_ref| {
            b.iter(|| run_on_deckey_heap(black_box(RankPairingHeap::with_capacity(n_ref)), n_ref, black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("ViolationHeap", n), n, |b, &n_ref| {
            b.iter(|| run_on_deckey_heap(black_box(ViolationHeap::with_capacity(n_ref)), n_ref, black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("QuakeHeap", n), n, |b, &n_ref| {
            b.iter(|| run_on_deckey_heap(black_box(QuakeHeap::with_capacity(n_ref * 2)), n_ref, black_box(&data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_deckey_queue);
criterion_main!(benches);
