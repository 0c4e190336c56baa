use criterion::{black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId, Criterion};
use heap_bench::queue::{AddressableHeap, Item, Key};
use heap_bench::{DaryExplicitHeap, DaryImplicitHeap, FibonacciHeap, PairingHeap, QuakeHeap, RankPairingHeap, ViolationHeap};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

struct TestData {
    first_push: Vec<(Item, Key)>,
    second_push: Vec<(Item, Key)>,
}

impl TestData {
    fn new(seed: u64, n_first: usize, n_second: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut first_push = Vec::new();
        for node in 0..n_first {
            first_push.push((node as Item, rng.random()));
        }

        let mut second_push = Vec::new();
        for node in n_first..(n_first + n_second) {
            second_push.push((node as Item, rng.random()));
        }

        Self { first_push, second_push }
    }

    fn n_first_pop(&self) -> usize {
        self.first_push.len() / 5 * 4
    }
}

fn run_on_addressable_heap<H: AddressableHeap>(mut pq: H, data: &TestData) -> (u64, u64) {
    let mut sum_items = 0u64;
    let mut sum_keys = 0u64;

    for &(item, key) in &data.first_push {
        pq.insert(item, key).unwrap();
    }

    for _ in 0..data.n_first_pop() {
        if let Some(handle) = pq.find_min() {
            sum_items += pq.item_of(handle) as u64;
            sum_keys += pq.delete_min().unwrap() as u64;
        }
    }

    for &(item, key) in &data.second_push {
        pq.insert(item, key).unwrap();
    }

    while let Some(key) = pq.delete_min() {
        sum_keys += key as u64;
    }

    (sum_items, sum_keys)
}

fn run_on_std_binary_heap(data: &TestData) -> (u64, u64) {
    let mut heap = std::collections::BinaryHeap::new();
    let mut sum_items = 0u64;
    let mut sum_keys = 0u64;

    for &(item, key) in &data.first_push {
        heap.push(std::cmp::Reverse((key, item)));
    }
    for _ in 0..data.n_first_pop() {
        if let Some(std::cmp::Reverse((key, item))) = heap.pop() {
            sum_items += item as u64;
            sum_keys += key as u64;
        }
    }
    for &(item, key) in &data.second_push {
        heap.push(std::cmp::Reverse((key, item)));
    }
    while let Some(std::cmp::Reverse((key, _))) = heap.pop() {
        sum_keys += key as u64;
    }

    (sum_items, sum_keys)
}

fn run_on_implicit_dary<const D: usize>(group: &mut BenchmarkGroup<WallTime>, n: usize, data: &TestData) {
    group.bench_with_input(BenchmarkId::new(format!("DaryImplicitHeap<{D}>"), n), &n, |b, &n| {
        b.iter(|| run_on_addressable_heap(black_box(DaryImplicitHeap::<D>::with_capacity(n)), black_box(data)))
    });
}

fn run_on_explicit_dary<const D: usize>(group: &mut BenchmarkGroup<WallTime>, n: usize, data: &TestData) {
    group.bench_with_input(BenchmarkId::new(format!("DaryExplicitHeap<{D}>"), n), &n, |b, &n| {
        b.iter(|| run_on_addressable_heap(black_box(DaryExplicitHeap::<D>::with_capacity(n)), black_box(data)))
    });
}

fn bench_basic_queue(c: &mut Criterion) {
    let treatments = vec![100_000];

    let mut group = c.benchmark_group("basic_queue");

    for n in &treatments {
        let data = TestData::new(8498723, *n, *n);
        let total = n * 2;

        group.bench_with_input(BenchmarkId::new("std::collections::BinaryHeap", n), n, |b, _| {
            b.iter(|| run_on_std_binary_heap(black_box(&data)))
        });

        run_on_implicit_dary::<2>(&mut group, total, &data);
        run_on_implicit_dary::<4>(&mut group, total, &data);
        run_on_implicit_dary::<8>(&mut group, total, &data);

        run_on_explicit_dary::<2>(&mut group, total, &data);
        run_on_explicit_dary::<4>(&mut group, total, &data);

        group.bench_with_input(BenchmarkId::new("PairingHeap", n), n, |b, _| {
            b.iter(|| run_on_addressable_heap(black_box(PairingHeap::with_capacity(total)), black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("FibonacciHeap", n), n, |b, _| {
            b.iter(|| run_on_addressable_heap(black_box(FibonacciHeap::with_capacity(total)), black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("RankPairingHeap", n), n, |b, _| {
            b.iter(|| run_on_addressable_heap(black_box(RankPairingHeap::with_capacity(total)), black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("ViolationHeap", n), n, |b, _| {
            b.iter(|| run_on_addressable_heap(black_box(ViolationHeap::with_capacity(total)), black_box(&data)))
        });

        group.bench_with_input(BenchmarkId::new("QuakeHeap", n), n, |b, _| {
            b.iter(|| run_on_addressable_heap(black_box(QuakeHeap::with_capacity(total)), black_box(&data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_basic_queue);
criterion_main!(benches);
