use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lanewise::{f16, Ext1, Vector};

mod native;

const DIMENSIONS: usize = 32;

type Lanes = Vector<f32, Ext1<DIMENSIONS>>;
type HalfLanes = Vector<f16, Ext1<DIMENSIONS>>;

fn random_lanes() -> Lanes {
    Lanes::try_from_slice(&native::generate_random_vector(DIMENSIONS)).unwrap()
}

pub fn add_benchmark(c: &mut Criterion) {
    let (a, b) = (random_lanes(), random_lanes());
    let (half_a, half_b): (HalfLanes, HalfLanes) = (a.cast(), b.cast());

    let mut group = c.benchmark_group("Lane-wise Add");

    for i in 0..=5 {
        group.bench_with_input(BenchmarkId::new("lanewise f32", i), &i, |bencher, _| {
            bencher.iter(|| criterion::black_box(a) + criterion::black_box(b))
        });
        group.bench_with_input(BenchmarkId::new("lanewise f16", i), &i, |bencher, _| {
            bencher.iter(|| criterion::black_box(half_a) + criterion::black_box(half_b))
        });
        group.bench_with_input(BenchmarkId::new("Rust Native", i), &i, |bencher, _| {
            bencher.iter(|| native::add_cpu(a.as_slice(), b.as_slice()))
        });
    }
}

pub fn fma_benchmark(c: &mut Criterion) {
    let (a, b, addend) = (random_lanes(), random_lanes(), random_lanes());

    let mut group = c.benchmark_group("Lane-wise FMA");

    for i in 0..=5 {
        group.bench_with_input(BenchmarkId::new("lanewise", i), &i, |bencher, _| {
            bencher.iter(|| criterion::black_box(a).mul_add(b, addend))
        });
        group.bench_with_input(BenchmarkId::new("Rust Native", i), &i, |bencher, _| {
            bencher.iter(|| native::fma_cpu(a.as_slice(), b.as_slice(), addend.as_slice()))
        });
    }
}

criterion_group!(benches, add_benchmark, fma_benchmark);
criterion_main!(benches);
