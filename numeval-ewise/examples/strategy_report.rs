use std::time::Instant;

use numeval_core::{caps, Avx, DynShape, Lanes, MatMut, MatRef, Sse};
use numeval_ewise::{
    colwise, ewise, macc, to_scalar, AccessKind, Axpy, Linear, PerCol, Scalar, Simd, Strategy, Sum,
    Vectorize,
};

/// Time `iters` linear sums under request `U`; returns (strategy, seconds per call, result).
fn time_sum<U: Vectorize<f64>>(
    x: &[f64],
    rows: usize,
    cols: usize,
    iters: usize,
) -> (Strategy, f64, f64) {
    let view = MatRef::new(x, rows, cols).expect("valid shape");
    let shape = DynShape::new(rows, cols);
    let mut total = 0.0;
    let mut strategy = ewise(Sum).accum(macc::<Linear, U>(), shape, view, to_scalar(&mut total));

    let t0 = Instant::now();
    for _ in 0..iters {
        total = 0.0;
        strategy = ewise(Sum).accum(macc::<Linear, U>(), shape, view, to_scalar(&mut total));
    }
    (strategy, t0.elapsed().as_secs_f64() / iters as f64, total)
}

/// Time `iters` per-column axpy maps followed by a column-wise sum under request `U`.
fn time_axpy_colsum<U: Vectorize<f64>>(
    x: &[f64],
    rows: usize,
    cols: usize,
    iters: usize,
) -> (Strategy, f64) {
    let shape = DynShape::new(rows, cols);
    let mut y = vec![0.0; rows * cols];
    let mut sums = vec![0.0; cols];
    let mut strategy = Strategy {
        access: AccessKind::PerCol,
        kind: "scalar",
        width: 1,
    };

    let t0 = Instant::now();
    for _ in 0..iters {
        let xv = MatRef::new(x, rows, cols).expect("valid shape");
        strategy = ewise(Axpy { alpha: 0.5 }).map(
            macc::<PerCol, U>(),
            shape,
            (xv, xv),
            MatMut::new(&mut y, rows, cols).expect("valid shape"),
        );
        sums.fill(0.0);
        ewise(Sum).accum(
            macc::<PerCol, U>(),
            shape,
            MatRef::new(&y, rows, cols).expect("valid shape"),
            colwise(MatMut::new(&mut sums, 1, cols).expect("valid shape")),
        );
    }
    (strategy, t0.elapsed().as_secs_f64() / iters as f64)
}

fn report(name: &str, rows: usize, cols: usize, iters: usize) {
    let x: Vec<f64> = (0..rows * cols)
        .map(|i| ((i * 7 + 3) % 1000) as f64 * 0.001)
        .collect();

    let (s0, t0, r0) = time_sum::<Scalar>(&x, rows, cols, iters);
    let (s1, t1, r1) = time_sum::<Simd<Sse>>(&x, rows, cols, iters);
    let (s2, t2, r2) = time_sum::<Simd<Avx>>(&x, rows, cols, iters);
    let (s3, t3, r3) = time_sum::<Simd<Lanes<8>>>(&x, rows, cols, iters);
    let worst = [r1, r2, r3]
        .iter()
        .map(|r| (r - r0).abs())
        .fold(0.0f64, f64::max);
    let err = worst / r0.abs().max(1.0);

    print!("  {name:10} | sum ");
    for (s, t) in [(s0, t0), (s1, t1), (s2, t2), (s3, t3)] {
        print!(" {:>18} {:8.3} us |", s.to_string(), t * 1e6);
    }
    println!(" err: {err:.2e}");

    let (a0, u0) = time_axpy_colsum::<Scalar>(&x, rows, cols, iters);
    let (a1, u1) = time_axpy_colsum::<Simd<Avx>>(&x, rows, cols, iters);
    print!("  {:10} | axpy+colsum", "");
    for (s, t) in [(a0, u0), (a1, u1)] {
        print!(" {:>18} {:8.3} us |", s.to_string(), t * 1e6);
    }
    println!(" speedup: {:5.2}x", u0 / u1);
}

fn main() {
    println!("=== Element-wise strategies: {} ===", caps::describe());
    println!("  {}", "-".repeat(130));

    report("64x64", 64, 64, 2000);
    report("127x33", 127, 33, 2000);
    report("256x256", 256, 256, 200);
    report("1024x512", 1024, 512, 10);
}
