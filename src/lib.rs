//! # numkern
//!
//! Dense linear algebra over real and complex scalars, no-std compatible
//! (requires `alloc`). Heap-allocated vectors and matrices with the usual
//! arithmetic operators, mixed-precision type promotion, and the classical
//! direct algorithms: determinants, LU/LUP, QR, Cholesky, SVD, and linear
//! solvers.
//!
//! ## Quick start
//!
//! ```
//! use numkern::{Matrix, Vector};
//!
//! // Solve a linear system Ax = b
//! let a = Matrix::new([
//!     [2.0_f64, 1.0, -1.0],
//!     [-3.0, -1.0, 2.0],
//!     [-2.0, 1.0, 2.0],
//! ]);
//! let b = Vector::from_slice(&[8.0_f64, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[0] - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`complex`]: `Complex<T>` over `f32` / `f64` with full operator
//!   support, including mixed widths and real operands on either side.
//!
//! - [`vector`]: `Vector<T>`: elementwise arithmetic, scalar broadcasting,
//!   Hermitian dot product, cross product, norms, slicing, sorting and
//!   extremal elements.
//!
//! - [`matrix`]: `Matrix<T>` stored as a sequence of equal-length row
//!   vectors. Products, elementwise arithmetic, slicing, transposition,
//!   diagonals, structural predicates, determinants and norms.
//!
//! - [`linalg`]: `Lu`, `Lup`, `Qr`, `Cholesky` and `Svd` decompositions, the
//!   Gauss / Gauss-Jordan / tridiagonal solvers with a dispatching
//!   [`solve`], and the [`LinalgError`] type every fallible operation returns.
//!   Free in-place kernels operate on `&mut impl MatrixMut<T>`.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: every element type (`f32`, `f64`, `Complex<f32>`, `Complex<f64>`)
//!   - [`FloatScalar`]: the real floats, which are also the `Scalar::Real` types
//!   - [`Promote`]: the compile-time promotion table used by every mixed operator
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Type promotion
//!
//! Mixing element types promotes to the wider width, and to complex if either
//! side is complex:
//!
//! ```
//! use numkern::{Complex, Vector};
//!
//! let v = Vector::from_slice(&[1.0_f32, 2.0]);
//! let w: Vector<f64> = &v * 0.5_f64;
//! assert_eq!(w.as_slice(), &[0.5, 1.0]);
//!
//! let z: Vector<Complex<f32>> = &v + Complex::new(0.0_f32, 1.0);
//! assert_eq!(z[1], Complex::new(2.0, 1.0));
//! ```
//!
//! Operators panic on a shape mismatch; the named operations (`dot`, `det`,
//! `solve`, decompositions, ...) return `Result<_, LinalgError>` instead.
//!
//! ## Cargo features
//!
//! | Feature       | Default  | Description |
//! |---------------|----------|-------------|
//! | `std`         | yes      | Hardware FPU via system libm, `std::error::Error` for `LinalgError` |
//! | `libm`        | no       | Pure-Rust software float fallback for no-std targets |
//! | `log`         | no       | Diagnostics (solver dispatch, SVD sweeps, fallbacks) through the `log` facade |
//! | `num-complex` | no       | Conversions between `Complex<T>` and `num_complex::Complex<T>` |
//! | `all`         | no       | All features: `std` + `log` + `num-complex` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod complex;
pub mod linalg;
pub mod matrix;
pub mod traits;
pub mod vector;

pub use complex::Complex;
pub use linalg::{
    gauss_jordan_inverse, gauss_jordan_solve, gauss_solve, solve, tridiagonal_solve,
    tridiagonal_solve_bands, Cholesky, LinalgError, Lu, Lup, Qr, Svd, SVD_MAX_SWEEPS,
};
pub use matrix::{Matrix, COFACTOR_LIMIT};
pub use traits::{Dot, FloatScalar, MatrixMut, MatrixRef, Promote, Promoted, Scalar};
pub use vector::Vector;
