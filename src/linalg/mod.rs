//! Decompositions and linear solvers.
//!
//! Every routine reports failure through [`LinalgError`]; none of them
//! mutates its input. A pivot is treated as zero when its modulus is at most
//! machine epsilon times the largest entry modulus of the input.

pub(crate) mod cholesky;
pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod solve;
pub(crate) mod svd;

pub use cholesky::{back_substitute_lt, cholesky_in_place, forward_substitute, Cholesky};
pub use lu::{lu_in_place, lu_solve, Lu, Lup};
pub use qr::{qr_in_place, Qr};
pub use solve::{
    gauss_jordan_inverse, gauss_jordan_solve, gauss_solve, solve, tridiagonal_solve,
    tridiagonal_solve_bands,
};
pub use svd::{Svd, SVD_MAX_SWEEPS};

use num_traits::{Float, Zero};

use crate::traits::{MatrixRef, Scalar};

/// Emit a diagnostic through the `log` facade when the `log` feature is on.
///
/// Arguments must be positional so they stay referenced when logging is
/// compiled out.
macro_rules! linalg_log {
    ($level:ident, $($arg:expr),+ $(,)?) => {{
        #[cfg(feature = "log")]
        {
            log::$level!(target: "numkern", $($arg),+);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = ($(&$arg),+);
        }
    }};
}
pub(crate) use linalg_log;

/// Errors from vector, matrix and linear algebra operations.
///
/// Returned by every fallible named operation (`det`, `inversed`, `lup`,
/// `solve`, `slice`, ...). Operators and indexing panic instead.
///
/// ```
/// use numkern::{LinalgError, Matrix};
///
/// let singular = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
/// assert_eq!(singular.lup().unwrap_err(), LinalgError::Singular);
///
/// let not_pd = Matrix::new([[1.0_f64, 5.0], [5.0, 1.0]]);
/// assert_eq!(not_pd.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand shapes are incompatible. Shapes are `(rows, cols)`; vectors
    /// report `(len, 1)`.
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// An index or range bound lies outside the container.
    IndexOutOfRange { index: usize, len: usize },
    /// Matrix is singular or nearly singular.
    Singular,
    /// Matrix is not positive definite (required for Cholesky).
    NotPositiveDefinite,
    /// A structured solver was given a matrix without the required structure.
    NotTridiagonal,
    /// A slice request with a zero step or an empty range.
    DegenerateSlice,
    /// Inversion or normalization of a value with zero modulus.
    DivideByZero,
    /// Iterative algorithm did not converge within the iteration budget.
    ConvergenceFailure,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::DimensionMismatch { expected, got } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            LinalgError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            LinalgError::Singular => write!(f, "matrix is singular"),
            LinalgError::NotPositiveDefinite => write!(f, "matrix is not positive definite"),
            LinalgError::NotTridiagonal => write!(f, "matrix is not tridiagonal"),
            LinalgError::DegenerateSlice => write!(f, "slice has zero step or empty range"),
            LinalgError::DivideByZero => write!(f, "division by a zero-modulus value"),
            LinalgError::ConvergenceFailure => write!(f, "iterative algorithm did not converge"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// Pivot threshold for `a`: machine epsilon times its largest entry modulus.
///
/// Scaling every entry by the same factor scales the threshold with it, so
/// `c·A` and `A` are judged singular together.
pub(crate) fn pivot_tolerance<T: Scalar>(a: &impl MatrixRef<T>) -> T::Real {
    let mut scale = <T::Real as Zero>::zero();
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            scale = scale.max(a.get(i, j).modulus());
        }
    }
    T::lepsilon() * scale
}

/// Whether a pivot is zero relative to `tol`. A zero pivot is always negligible.
#[inline]
pub(crate) fn negligible<T: Scalar>(x: T, tol: T::Real) -> bool {
    x.modulus() <= tol
}

/// Reject non-square shapes.
#[inline]
pub(crate) fn require_square(rows: usize, cols: usize) -> Result<usize, LinalgError> {
    if rows != cols {
        let n = rows.max(cols);
        return Err(LinalgError::DimensionMismatch {
            expected: (n, n),
            got: (rows, cols),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matrix;

    #[test]
    fn display_messages() {
        let e = LinalgError::DimensionMismatch {
            expected: (3, 3),
            got: (3, 2),
        };
        assert_eq!(format!("{}", e), "dimension mismatch: expected 3x3, got 3x2");
        assert_eq!(format!("{}", LinalgError::Singular), "matrix is singular");
    }

    #[test]
    fn square_check() {
        assert_eq!(require_square(4, 4), Ok(4));
        assert!(matches!(
            require_square(2, 3),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn negligible_is_relative() {
        let unit = pivot_tolerance(&Matrix::<f64>::identity(2));
        assert_eq!(unit, f64::EPSILON);
        assert!(negligible(1e-17_f64, unit));
        assert!(!negligible(1e-10_f64, unit));

        let tiny = pivot_tolerance(&(Matrix::<f64>::identity(2) * 1e-20));
        assert!(!negligible(1e-20_f64, tiny));
        assert!(negligible(0.0_f64, 0.0));
        assert!(negligible(1e-8_f32, pivot_tolerance(&Matrix::<f32>::identity(1))));
    }
}
