//! Shared helpers for the integration tests.

#![allow(dead_code)]

use numeval_core::{Avx, DynShape, Element, Lanes, MatMut, MatRef, SimdElement, Sse};
use numeval_ewise::{
    colwise, ewise, macc, rowwise, to_scalar, AccumKernel, Linear, MapKernel, PerCol, Strategy,
    Vectorize,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Float element types the equivalence tests run over, with a pack mapping
/// for every kind `for_each_request!` names.
pub trait Real:
    Element
    + SimdElement<Sse>
    + SimdElement<Avx>
    + SimdElement<Lanes<2>>
    + SimdElement<Lanes<4>>
    + SimdElement<Lanes<8>>
    + SimdElement<Lanes<16>>
{
    /// Relative tolerance for sums whose combine order was regrouped.
    const TOL: f64;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Real for f32 {
    const TOL: f64 = 5e-4;

    fn from_f64(v: f64) -> Self {
        v as f32
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const TOL: f64 = 1e-12;

    fn from_f64(v: f64) -> Self {
        v
    }
    fn to_f64(self) -> f64 {
        self
    }
}

/// Column-major `rows x cols` values uniform in `[-1, 1)`.
pub fn random_values<T: Real>(seed: u64, rows: usize, cols: usize) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows * cols)
        .map(|_| T::from_f64(rng.gen_range(-1.0..1.0)))
        .collect()
}

pub fn random_matrix(seed: u64, rows: usize, cols: usize) -> Vec<f64> {
    random_values(seed, rows, cols)
}

/// Calls `$f::<_, U>(args)` once per vectorization request `U`, tagged with a
/// label. The element type is inferred from the arguments.
macro_rules! for_each_request {
    ($f:ident ( $($arg:expr),* $(,)? )) => {
        [
            ("scalar", $f::<_, numeval_ewise::Scalar>($($arg),*)),
            ("sse", $f::<_, numeval_ewise::Simd<numeval_core::Sse>>($($arg),*)),
            ("avx", $f::<_, numeval_ewise::Simd<numeval_core::Avx>>($($arg),*)),
            ("lanes2", $f::<_, numeval_ewise::Simd<numeval_core::Lanes<2>>>($($arg),*)),
            ("lanes4", $f::<_, numeval_ewise::Simd<numeval_core::Lanes<4>>>($($arg),*)),
            ("lanes8", $f::<_, numeval_ewise::Simd<numeval_core::Lanes<8>>>($($arg),*)),
            ("lanes16", $f::<_, numeval_ewise::Simd<numeval_core::Lanes<16>>>($($arg),*)),
        ]
    };
}

// ============================================================================
// Map
// ============================================================================

pub fn map2_linear<T: Element, U: Vectorize<T>>(
    kernel: impl MapKernel<T, 2>,
    rows: usize,
    cols: usize,
    a: &[T],
    b: &[T],
) -> (Vec<T>, Strategy) {
    let mut out = vec![T::default(); rows * cols];
    let s = ewise(kernel).map(
        macc::<Linear, U>(),
        DynShape::new(rows, cols),
        (
            MatRef::new(a, rows, cols).unwrap(),
            MatRef::new(b, rows, cols).unwrap(),
        ),
        MatMut::new(&mut out, rows, cols).unwrap(),
    );
    (out, s)
}

pub fn map2_percol<T: Element, U: Vectorize<T>>(
    kernel: impl MapKernel<T, 2>,
    rows: usize,
    cols: usize,
    a: &[T],
    b: &[T],
) -> (Vec<T>, Strategy) {
    let mut out = vec![T::default(); rows * cols];
    let s = ewise(kernel).map(
        macc::<PerCol, U>(),
        DynShape::new(rows, cols),
        (
            MatRef::new(a, rows, cols).unwrap(),
            MatRef::new(b, rows, cols).unwrap(),
        ),
        MatMut::new(&mut out, rows, cols).unwrap(),
    );
    (out, s)
}

// ============================================================================
// Accumulate
// ============================================================================

pub fn accum_linear<T: Element, U: Vectorize<T>>(
    kernel: impl AccumKernel<T>,
    rows: usize,
    cols: usize,
    x: &[T],
    seed: T,
) -> (T, Strategy) {
    let mut acc = seed;
    let s = ewise(kernel).accum(
        macc::<Linear, U>(),
        DynShape::new(rows, cols),
        MatRef::new(x, rows, cols).unwrap(),
        to_scalar(&mut acc),
    );
    (acc, s)
}

pub fn accum_percol<T: Element, U: Vectorize<T>>(
    kernel: impl AccumKernel<T>,
    rows: usize,
    cols: usize,
    x: &[T],
    seed: T,
) -> (T, Strategy) {
    let mut acc = seed;
    let s = ewise(kernel).accum(
        macc::<PerCol, U>(),
        DynShape::new(rows, cols),
        MatRef::new(x, rows, cols).unwrap(),
        to_scalar(&mut acc),
    );
    (acc, s)
}

pub fn accum_rowwise<T: Element, U: Vectorize<T>>(
    kernel: impl AccumKernel<T>,
    rows: usize,
    cols: usize,
    x: &[T],
    seed: T,
) -> (Vec<T>, Strategy) {
    let mut out = vec![seed; rows];
    let s = ewise(kernel).accum(
        macc::<PerCol, U>(),
        DynShape::new(rows, cols),
        MatRef::new(x, rows, cols).unwrap(),
        rowwise(MatMut::new(&mut out, rows, 1).unwrap()),
    );
    (out, s)
}

pub fn accum_colwise<T: Element, U: Vectorize<T>>(
    kernel: impl AccumKernel<T>,
    rows: usize,
    cols: usize,
    x: &[T],
    seed: T,
) -> (Vec<T>, Strategy) {
    let mut out = vec![seed; cols];
    let s = ewise(kernel).accum(
        macc::<PerCol, U>(),
        DynShape::new(rows, cols),
        MatRef::new(x, rows, cols).unwrap(),
        colwise(MatMut::new(&mut out, 1, cols).unwrap()),
    );
    (out, s)
}

// ============================================================================
// References
// ============================================================================

/// Left fold in column-major order.
pub fn fold_all<T: Copy>(x: &[T], seed: T, f: impl Fn(T, T) -> T) -> T {
    x.iter().fold(seed, |acc, &v| f(acc, v))
}

/// Per-row left folds over columns.
pub fn fold_rows<T: Copy>(
    x: &[T],
    rows: usize,
    cols: usize,
    seed: T,
    f: impl Fn(T, T) -> T,
) -> Vec<T> {
    (0..rows)
        .map(|i| (0..cols).fold(seed, |acc, j| f(acc, x[j * rows + i])))
        .collect()
}

/// Per-column left folds over rows.
pub fn fold_cols<T: Copy>(
    x: &[T],
    rows: usize,
    cols: usize,
    seed: T,
    f: impl Fn(T, T) -> T,
) -> Vec<T> {
    (0..cols)
        .map(|j| x[j * rows..(j + 1) * rows].iter().fold(seed, |acc, &v| f(acc, v)))
        .collect()
}

pub fn assert_close(got: f64, want: f64, tol: f64, what: &str) {
    assert!(
        (got - want).abs() <= tol * want.abs().max(1.0),
        "{what}: got {got}, want {want}"
    );
}

/// Whether `got` agrees with `want` to the element type's regrouping tolerance.
pub fn close<T: Real>(got: T, want: T) -> bool {
    let (got, want) = (got.to_f64(), want.to_f64());
    (got - want).abs() <= T::TOL * want.abs().max(1.0)
}
