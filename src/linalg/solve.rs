//! Direct solvers for `A·x = b`.
//!
//! The free functions accept any pair of element types with a promotion
//! rule and return the promoted type, so a single-precision matrix can be
//! solved against a complex right-hand side without manual conversion.

use alloc::vec;

use num_traits::Float;

use crate::linalg::{linalg_log, negligible, pivot_tolerance, require_square, LinalgError};
use crate::traits::{Promote, Promoted, Scalar};
use crate::{Matrix, Vector};

/// Validate that `a` is square and `b` matches its order.
fn check_system<A, B>(a: &Matrix<A>, b: &Vector<B>) -> Result<usize, LinalgError> {
    let n = require_square(a.nrows(), a.ncols())?;
    if b.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, 1),
            got: (b.len(), 1),
        });
    }
    Ok(n)
}

/// Convert both sides of the system to the promoted element type.
fn promote_system<A, B>(
    a: &Matrix<A>,
    b: &Vector<B>,
) -> (Matrix<Promoted<A, B>>, Vector<Promoted<A, B>>)
where
    A: Scalar + Promote<B>,
    B: Scalar,
{
    (
        a.map(|x| x.promote()),
        b.map(<A as Promote<B>>::promote_rhs),
    )
}

/// Row of the largest-modulus entry in column `col`, rows `col..n`.
/// `Singular` when that entry is at most `tol`.
fn pivot_row<T: Scalar>(m: &Matrix<T>, col: usize, tol: T::Real) -> Result<usize, LinalgError> {
    let mut max_row = col;
    let mut max_val = m.rows[col][col].modulus();
    for row in (col + 1)..m.nrows() {
        let val = m.rows[row][col].modulus();
        if val > max_val {
            max_val = val;
            max_row = row;
        }
    }
    if max_val <= tol {
        return Err(LinalgError::Singular);
    }
    Ok(max_row)
}

/// Gaussian elimination with partial pivoting, then back substitution.
///
/// ```
/// use numkern::{gauss_solve, Matrix, Vector};
///
/// let a = Matrix::new([[2.0_f64, 1.0], [1.0, 3.0]]);
/// let b = Vector::from_slice(&[3.0_f64, 5.0]);
/// let x = gauss_solve(&a, &b).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn gauss_solve<A, B>(a: &Matrix<A>, b: &Vector<B>) -> Result<Vector<Promoted<A, B>>, LinalgError>
where
    A: Scalar + Promote<B>,
    B: Scalar,
{
    let n = check_system(a, b)?;
    let (mut m, mut x) = promote_system(a, b);
    let zero = <Promoted<A, B> as num_traits::Zero>::zero();
    let tol = pivot_tolerance(&m);

    for col in 0..n {
        let p = pivot_row(&m, col, tol)?;
        if p != col {
            m.rows.swap(col, p);
            x.data.swap(col, p);
        }
        let pivot = m.rows[col][col];
        for row in (col + 1)..n {
            let factor = m.rows[row][col] / pivot;
            if factor == zero {
                continue;
            }
            for j in (col + 1)..n {
                let u = m.rows[col][j];
                m.rows[row][j] -= factor * u;
            }
            m.rows[row][col] = zero;
            let xc = x[col];
            x[row] -= factor * xc;
        }
    }

    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum -= m.rows[i][j] * x[j];
        }
        x[i] = sum / m.rows[i][i];
    }
    Ok(x)
}

/// Reduce `[A | rhs]` to `[I | A⁻¹·rhs]` in place.
///
/// `rhs` rows travel with the rows of `a`; each row of `rhs` may hold any
/// number of columns.
fn gauss_jordan_reduce<T: Scalar>(a: &mut Matrix<T>, rhs: &mut Matrix<T>) -> Result<(), LinalgError> {
    let n = a.nrows();
    let tol = pivot_tolerance(&*a);
    for col in 0..n {
        let p = pivot_row(a, col, tol)?;
        if p != col {
            a.rows.swap(col, p);
            rhs.rows.swap(col, p);
        }

        let inv_pivot = T::one() / a.rows[col][col];
        for x in a.rows[col].iter_mut() {
            *x *= inv_pivot;
        }
        for x in rhs.rows[col].iter_mut() {
            *x *= inv_pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a.rows[row][col];
            if factor == T::zero() {
                continue;
            }
            for j in 0..n {
                let u = a.rows[col][j];
                a.rows[row][j] -= factor * u;
            }
            for j in 0..rhs.ncols() {
                let u = rhs.rows[col][j];
                rhs.rows[row][j] -= factor * u;
            }
        }
    }
    Ok(())
}

/// Gauss-Jordan elimination: reduce `[A | b]` to `[I | x]`.
///
/// ```
/// use numkern::{gauss_jordan_solve, Matrix, Vector};
///
/// let a = Matrix::new([[2.0_f32, 1.0], [1.0, 3.0]]);
/// let b = Vector::from_slice(&[3.0_f64, 5.0]);
/// let x = gauss_jordan_solve(&a, &b).unwrap();
/// assert!((x[1] - 1.4).abs() < 1e-6);
/// ```
pub fn gauss_jordan_solve<A, B>(
    a: &Matrix<A>,
    b: &Vector<B>,
) -> Result<Vector<Promoted<A, B>>, LinalgError>
where
    A: Scalar + Promote<B>,
    B: Scalar,
{
    check_system(a, b)?;
    let (mut m, x) = promote_system(a, b);
    let mut rhs = Matrix {
        rows: x.iter().map(|&v| Vector::from_vec(vec![v])).collect(),
        ncols: 1,
    };
    gauss_jordan_reduce(&mut m, &mut rhs)?;
    Ok(rhs.rows.iter().map(|r| r[0]).collect())
}

/// Inverse by Gauss-Jordan reduction of `[A | I]`.
///
/// ```
/// use numkern::{gauss_jordan_inverse, Matrix};
///
/// let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
/// let inv = gauss_jordan_inverse(&a).unwrap();
/// assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
/// assert!((inv[(1, 0)] + 0.2).abs() < 1e-12);
/// ```
pub fn gauss_jordan_inverse<T: Scalar>(a: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
    let n = require_square(a.nrows(), a.ncols())?;
    let mut m = a.clone();
    let mut inv = Matrix::identity(n);
    gauss_jordan_reduce(&mut m, &mut inv)?;
    Ok(inv)
}

/// Thomas algorithm on explicit bands, O(n).
///
/// `lower` and `upper` hold the sub- and super-diagonal (length `n - 1`),
/// `diag` the main diagonal (length `n`). There is no pivoting, so a
/// negligible pivot is [`LinalgError::Singular`] even when the matrix is
/// invertible.
///
/// ```
/// use numkern::{tridiagonal_solve_bands, Vector};
///
/// let lower = Vector::from_slice(&[1.0_f64, 1.0]);
/// let diag = Vector::from_slice(&[4.0, 4.0, 4.0]);
/// let upper = Vector::from_slice(&[1.0, 1.0]);
/// let b = Vector::from_slice(&[5.0, 6.0, 5.0]);
/// let x = tridiagonal_solve_bands(&lower, &diag, &upper, &b).unwrap();
/// for xi in x.iter() {
///     assert!((xi - 1.0).abs() < 1e-12);
/// }
/// ```
pub fn tridiagonal_solve_bands<T: Scalar>(
    lower: &Vector<T>,
    diag: &Vector<T>,
    upper: &Vector<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let n = diag.len();
    let off = n.saturating_sub(1);
    for band in [lower, upper] {
        if band.len() != off {
            return Err(LinalgError::DimensionMismatch {
                expected: (off, 1),
                got: (band.len(), 1),
            });
        }
    }
    if b.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, 1),
            got: (b.len(), 1),
        });
    }
    if n == 0 {
        return Ok(Vector::from_vec(vec![]));
    }

    let scale = lower.normi().max(diag.normi()).max(upper.normi());
    let tol = T::lepsilon() * scale;
    let mut c = vec![T::zero(); off];
    let mut d = vec![T::zero(); n];

    let mut denom = diag[0];
    if negligible(denom, tol) {
        return Err(LinalgError::Singular);
    }
    if off > 0 {
        c[0] = upper[0] / denom;
    }
    d[0] = b[0] / denom;

    for i in 1..n {
        denom = diag[i] - lower[i - 1] * c[i - 1];
        if negligible(denom, tol) {
            return Err(LinalgError::Singular);
        }
        if i < off {
            c[i] = upper[i] / denom;
        }
        d[i] = (b[i] - lower[i - 1] * d[i - 1]) / denom;
    }

    for i in (0..off).rev() {
        let next = d[i + 1];
        d[i] -= c[i] * next;
    }
    Ok(Vector::from_vec(d))
}

/// Thomas algorithm on a full tridiagonal matrix.
///
/// Fails with [`LinalgError::NotTridiagonal`] if any element outside the
/// three central diagonals is non-zero.
pub fn tridiagonal_solve<A, B>(
    a: &Matrix<A>,
    b: &Vector<B>,
) -> Result<Vector<Promoted<A, B>>, LinalgError>
where
    A: Scalar + Promote<B>,
    B: Scalar,
{
    check_system(a, b)?;
    if !a.is_tridiagonal() {
        return Err(LinalgError::NotTridiagonal);
    }
    thomas(a, b)
}

/// Band extraction plus Thomas, for an already-validated system.
fn thomas<A, B>(a: &Matrix<A>, b: &Vector<B>) -> Result<Vector<Promoted<A, B>>, LinalgError>
where
    A: Scalar + Promote<B>,
    B: Scalar,
{
    let (m, rhs) = promote_system(a, b);
    if m.nrows() == 0 {
        return Ok(rhs);
    }
    let lower = m.diagonal(-1).unwrap_or_default();
    let upper = m.diagonal(1).unwrap_or_default();
    let diag = m.diagonal(0)?;
    tridiagonal_solve_bands(&lower, &diag, &upper, &rhs)
}

/// Solve `A·x = b`, choosing the method from the structure of `A`.
///
/// Tridiagonal matrices go through the O(n) Thomas algorithm; if that meets
/// a zero pivot the system is handed to pivoted Gaussian elimination, which
/// makes the final call on singularity. Everything else uses
/// [`gauss_solve`].
///
/// ```
/// use numkern::{solve, Matrix, Vector};
///
/// // Tridiagonal, but the first pivot is zero.
/// let a = Matrix::new([[0.0_f64, 1.0], [1.0, 0.0]]);
/// let x = solve(&a, &Vector::from_slice(&[2.0, 3.0])).unwrap();
/// assert_eq!(x.as_slice(), &[3.0, 2.0]);
/// ```
pub fn solve<A, B>(a: &Matrix<A>, b: &Vector<B>) -> Result<Vector<Promoted<A, B>>, LinalgError>
where
    A: Scalar + Promote<B>,
    B: Scalar,
{
    let n = check_system(a, b)?;
    if a.is_tridiagonal() {
        linalg_log!(debug, "solve: {}x{} tridiagonal, using Thomas", n, n);
        match thomas(a, b) {
            Err(LinalgError::Singular) => {
                linalg_log!(warn, "solve: zero pivot in Thomas, retrying with Gaussian elimination");
            }
            other => return other,
        }
    } else {
        linalg_log!(debug, "solve: {}x{} general, using Gaussian elimination", n, n);
    }
    gauss_solve(a, b)
}

impl<T: Scalar> Matrix<T> {
    /// Method form of [`solve`].
    ///
    /// ```
    /// use numkern::{Complex, Matrix, Vector};
    ///
    /// let a = Matrix::new([[2.0_f32, 0.0], [0.0, 4.0]]);
    /// let b = Vector::from_slice(&[Complex::new(2.0_f64, 2.0), Complex::new(0.0, 8.0)]);
    /// let x: Vector<Complex<f64>> = a.solve(&b).unwrap();
    /// assert_eq!(x[1], Complex::new(0.0, 2.0));
    /// ```
    pub fn solve<U>(&self, b: &Vector<U>) -> Result<Vector<Promoted<T, U>>, LinalgError>
    where
        T: Promote<U>,
        U: Scalar,
    {
        solve(self, b)
    }
}
