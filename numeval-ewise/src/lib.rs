// Evaluator loops index packed runs directly; iterators hurt readability there.
#![allow(clippy::needless_range_loop)]

//! # Numeval Ewise
//!
//! Compile-time specialized element-wise evaluation over column-major
//! matrices.
//!
//! A call names a kernel, an access mode and a vectorization request:
//!
//! - **Kernels** ([`kernel`]): [`MapKernel`] produces one output per position
//!   from up to four inputs. [`AccumKernel`] folds elements into a running
//!   value.
//! - **Access** ([`dispatch`]): [`Linear`] walks all `rows * cols` elements as
//!   one run and needs whole-contiguous views. [`PerCol`] walks column by
//!   column and accepts any view.
//! - **Vectorization**: [`Scalar`] or [`Simd<K>`] for a kind `K` from
//!   `numeval_core` (`Sse`, `Avx`, `Lanes<W>`). A request the kernel, element
//!   type, build or layout cannot honor runs scalar instead.
//!
//! Reductions go to a [`sink`]: one scalar, one value per row, or one value
//! per column.
//!
//! ## Example
//!
//! ```
//! use numeval_core::{Avx, DynShape, MatMut, MatRef};
//! use numeval_ewise::{colwise, ewise, macc, to_scalar, Add, Linear, Max, PerCol, Simd, Sum};
//!
//! let a: Vec<f64> = (0..12).map(|k| k as f64).collect();
//! let b = vec![1.0; 12];
//! let mut c = vec![0.0; 12];
//! let shape = DynShape::new(4, 3);
//!
//! let av = MatRef::new(&a, 4, 3).unwrap();
//! let bv = MatRef::new(&b, 4, 3).unwrap();
//! let cv = MatMut::new(&mut c, 4, 3).unwrap();
//! ewise(Add).map(macc::<Linear, Simd<Avx>>(), shape, (av, bv), cv);
//!
//! let mut total = 0.0;
//! let cv = MatRef::new(&c, 4, 3).unwrap();
//! ewise(Sum).accum(macc::<Linear, Simd<Avx>>(), shape, cv, to_scalar(&mut total));
//! assert_eq!(total, 78.0);
//!
//! let mut col_max = [f64::MIN; 3];
//! ewise(Max).accum(
//!     macc::<PerCol, Simd<Avx>>(),
//!     shape,
//!     MatRef::new(&c, 4, 3).unwrap(),
//!     colwise(MatMut::new(&mut col_max, 1, 3).unwrap()),
//! );
//! assert_eq!(col_max, [4.0, 8.0, 12.0]);
//! ```

pub mod dispatch;
pub mod eval;
pub mod ewise;
pub mod kernel;
pub mod operands;
pub mod sink;

pub use dispatch::{
    macc, AccessKind, AccessMode, Linear, Macc, PerCol, Scalar, Simd, Strategy, Vectorize,
};
pub use eval::{AccumEval, MapEval};
pub use ewise::{ewise, Ewise};
pub use kernel::{
    AccumFn, AccumKernel, Add, Axpy, Clamp, Div, MapFn, MapKernel, Max, MaxOf, Min, MinOf, Mul,
    Sub, Sum, SumSq,
};
pub use operands::{LinearOperands, Operands};
pub use sink::{colwise, rowwise, to_scalar, Colwise, Rowwise, Sink, ToScalar};
