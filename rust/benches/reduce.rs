use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lanewise::{dot, f16, sum, Ext1, Vector};

mod native;

const DIMENSIONS: usize = 32;

type Lanes = Vector<f32, Ext1<DIMENSIONS>>;
type HalfLanes = Vector<f16, Ext1<DIMENSIONS>>;

fn random_lanes() -> Lanes {
    Lanes::try_from_slice(&native::generate_random_vector(DIMENSIONS)).unwrap()
}

pub fn sum_benchmark(c: &mut Criterion) {
    let a = random_lanes();
    let half_a: HalfLanes = a.cast();

    let mut group = c.benchmark_group("Lane Sum");

    for i in 0..=5 {
        group.bench_with_input(BenchmarkId::new("lanewise f32", i), &i, |bencher, _| {
            bencher.iter(|| sum(criterion::black_box(a)))
        });
        group.bench_with_input(BenchmarkId::new("lanewise f16", i), &i, |bencher, _| {
            bencher.iter(|| sum(criterion::black_box(half_a)))
        });
        group.bench_with_input(BenchmarkId::new("Rust Native", i), &i, |bencher, _| {
            bencher.iter(|| native::sum_cpu(a.as_slice()))
        });
    }
}

pub fn dot_benchmark(c: &mut Criterion) {
    let (a, b) = (random_lanes(), random_lanes());

    let mut group = c.benchmark_group("Lane Dot Product");

    for i in 0..=5 {
        group.bench_with_input(BenchmarkId::new("lanewise", i), &i, |bencher, _| {
            bencher.iter(|| dot(criterion::black_box(a), criterion::black_box(b)))
        });
        group.bench_with_input(BenchmarkId::new("Rust Native", i), &i, |bencher, _| {
            bencher.iter(|| native::dot_cpu(a.as_slice(), b.as_slice()))
        });
    }
}

criterion_group!(benches, sum_benchmark, dot_benchmark);
criterion_main!(benches);
