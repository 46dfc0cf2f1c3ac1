use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use numeval_core::{Avx, BlockRef, DynShape, MatMut, MatRef};
use numeval_ewise::{
    colwise, ewise, macc, rowwise, to_scalar, Add, Linear, PerCol, Scalar, Simd, Sum,
};

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");
    for &n in &[64, 256, 1024, 4096, 16384] {
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.001).collect();
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0;
                ewise(Sum).accum(
                    macc::<Linear, Scalar>(),
                    DynShape::new(n, 1),
                    MatRef::new(&x, n, 1).unwrap(),
                    to_scalar(&mut acc),
                );
                acc
            });
        });
        group.bench_with_input(BenchmarkId::new("avx", n), &n, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0;
                ewise(Sum).accum(
                    macc::<Linear, Simd<Avx>>(),
                    DynShape::new(n, 1),
                    MatRef::new(&x, n, 1).unwrap(),
                    to_scalar(&mut acc),
                );
                acc
            });
        });
    }
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for &n in &[32, 64, 128, 256] {
        let a: Vec<f32> = (0..n * n).map(|i| (i as f32 * 0.001).sin()).collect();
        let b: Vec<f32> = (0..n * n).map(|i| (i as f32 * 0.002).cos()).collect();
        let mut out = vec![0.0f32; n * n];
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                ewise(Add).map(
                    macc::<Linear, Simd<Avx>>(),
                    DynShape::new(n, n),
                    (MatRef::new(&a, n, n).unwrap(), MatRef::new(&b, n, n).unwrap()),
                    MatMut::new(&mut out, n, n).unwrap(),
                );
            });
        });
    }
    group.finish();
}

fn bench_partial_reductions(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_reductions");
    for &n in &[32, 64, 128, 256] {
        // n x n block inside an (n + 3) x n buffer
        let x: Vec<f64> = (0..(n + 3) * n).map(|i| (i as f64 * 0.002).cos()).collect();
        let mut rows_out = vec![0.0; n];
        let mut cols_out = vec![0.0; n];
        group.bench_with_input(BenchmarkId::new("rowwise", n), &n, |bench, &n| {
            bench.iter(|| {
                rows_out.fill(0.0);
                ewise(Sum).accum(
                    macc::<PerCol, Simd<Avx>>(),
                    DynShape::new(n, n),
                    BlockRef::new(&x, n, n, n + 3).unwrap(),
                    rowwise(MatMut::new(&mut rows_out, n, 1).unwrap()),
                );
            });
        });
        group.bench_with_input(BenchmarkId::new("colwise", n), &n, |bench, &n| {
            bench.iter(|| {
                cols_out.fill(0.0);
                ewise(Sum).accum(
                    macc::<PerCol, Simd<Avx>>(),
                    DynShape::new(n, n),
                    BlockRef::new(&x, n, n, n + 3).unwrap(),
                    colwise(MatMut::new(&mut cols_out, 1, n).unwrap()),
                );
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sum, bench_add, bench_partial_reductions);
criterion_main!(benches);
