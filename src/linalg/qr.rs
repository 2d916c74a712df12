use alloc::vec;
use alloc::vec::Vec;

use num_traits::{Float, NumCast, Zero};

use crate::linalg::{linalg_log, require_square, LinalgError};
use crate::traits::{MatrixMut, Scalar};
use crate::{Matrix, Vector};

/// QR decomposition in place using Householder reflections.
///
/// On return, `a` contains the packed QR factorization:
/// - Upper triangle (including diagonal): R
/// - Lower triangle (excluding diagonal): Householder vectors (scaled)
///
/// `tau` is filled with the Householder scalar factors (length N).
///
/// Requires M >= N. Returns `LinalgError::Singular` when a column is
/// numerically dependent on the ones before it: its remaining norm is at
/// most `eps · max(M, N)` times the largest column norm of the input.
///
/// For complex matrices, uses `H = I - tau * v * v^H` (conjugate transpose).
pub fn qr_in_place<T: Scalar>(
    a: &mut impl MatrixMut<T>,
    tau: &mut [T],
) -> Result<(), LinalgError> {
    let m = a.nrows();
    let n = a.ncols();
    if m < n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, n),
            got: (m, n),
        });
    }
    if tau.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, 1),
            got: (tau.len(), 1),
        });
    }

    let zero = <T::Real as Zero>::zero();
    let scale = (0..n)
        .map(|j| {
            (0..m)
                .fold(zero, |acc, i| acc + a.get(i, j).modulus_squared())
                .sqrt()
        })
        .fold(zero, Float::max);
    let dims: T::Real = NumCast::from(m.max(n)).unwrap_or_else(num_traits::One::one);
    let tol = T::lepsilon() * dims * scale;

    for col in 0..n {
        // Squared norm of the sub-column a[col:m, col]
        let mut norm_sq = zero;
        for i in col..m {
            norm_sq = norm_sq + a.get(i, col).modulus_squared();
        }

        let norm = norm_sq.sqrt();
        if norm <= tol {
            linalg_log!(warn, "qr: column {} is rank deficient", col);
            return Err(LinalgError::Singular);
        }

        let a_col_col = *a.get(col, col);

        // sigma: for real, sign(a[col,col]) * ||x||
        //        for complex, a[col,col] / |a[col,col]| * ||x||
        // so that v0 = a + sigma does not cancel.
        let alpha = a_col_col.modulus();
        let sigma = if alpha == zero {
            T::from_real(norm)
        } else {
            (a_col_col / T::from_real(alpha)).scale_real(norm)
        };

        // v[col] = a[col,col] + sigma; rest of v is a[col+1:m, col] (stored in-place)
        let v0 = a_col_col + sigma;

        // tau = v0 / sigma, real for both real and complex input
        let tau_val = v0 / sigma;
        tau[col] = tau_val;

        // Scale the sub-diagonal entries by 1/v0 for storage
        for i in (col + 1)..m {
            let val = *a.get(i, col) / v0;
            *a.get_mut(i, col) = val;
        }

        // Apply H to trailing columns: A[col:m, col+1:n] -= tau * v * (v^H * A)
        // where v = [1, a[col+1,col], ..., a[m-1,col]]
        for j in (col + 1)..n {
            let mut dot = *a.get(col, j);
            for i in (col + 1)..m {
                dot += a.get(i, col).conj() * *a.get(i, j);
            }
            dot *= tau_val;

            *a.get_mut(col, j) -= dot;
            for i in (col + 1)..m {
                let vi = *a.get(i, col);
                *a.get_mut(i, j) -= dot * vi;
            }
        }

        // R diagonal entry
        *a.get_mut(col, col) = -sigma;
    }

    Ok(())
}

/// QR decomposition of an M×N matrix (M >= N).
///
/// Stores the packed Householder vectors, R, and tau scalars.
/// Use `q()`, `r()`, `solve()`, or `det()` to work with the decomposition.
///
/// # Example
///
/// ```
/// use numkern::{Matrix, Vector};
///
/// // Least-squares fit: y = c0 + c1*x to points (0,1), (1,2), (2,4)
/// let a = Matrix::new([
///     [1.0_f64, 0.0],
///     [1.0, 1.0],
///     [1.0, 2.0],
/// ]);
/// let b = Vector::from_slice(&[1.0, 2.0, 4.0]);
/// let x = a.qr().unwrap().solve(&b).unwrap();
/// assert!((x[0] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[1] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Qr<T> {
    qr: Matrix<T>,
    tau: Vec<T>,
}

impl<T: Scalar> Qr<T> {
    /// Decompose a matrix. Returns an error if a column is rank-deficient.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let mut qr = a.clone();
        let mut tau = vec![T::zero(); a.ncols()];
        qr_in_place(&mut qr, &mut tau)?;
        Ok(Self { qr, tau })
    }

    fn n(&self) -> usize {
        self.tau.len()
    }

    /// Extract the upper-triangular R factor (N × N).
    ///
    /// ```
    /// use numkern::Matrix;
    /// let a = Matrix::new([[12.0_f64, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]]);
    /// let r = a.qr().unwrap().r();
    /// assert!(r.is_triangle_u());
    /// ```
    pub fn r(&self) -> Matrix<T> {
        let n = self.n();
        Matrix::from_fn(n, n, |i, j| if j >= i { self.qr.rows[i][j] } else { T::zero() })
    }

    /// Compute the thin Q factor (M × N, orthonormal columns).
    ///
    /// Applies Householder reflections in reverse to the first N columns
    /// of the identity matrix.
    ///
    /// For complex matrices, Q is unitary (`Q^H * Q = I`).
    ///
    /// ```
    /// use numkern::Matrix;
    /// let a = Matrix::new([[12.0_f64, -51.0, 4.0], [6.0, 167.0, -68.0], [-4.0, 24.0, -41.0]]);
    /// let q = a.qr().unwrap().q();
    /// let qtq = &q.transposed() * &q;
    /// assert!((qtq[(0, 0)] - 1.0).abs() < 1e-10);
    /// assert!((qtq[(0, 1)]).abs() < 1e-10);
    /// ```
    pub fn q(&self) -> Matrix<T> {
        let m = self.qr.nrows();
        let n = self.n();
        let mut q = Matrix::from_fn(m, n, |i, j| if i == j { T::one() } else { T::zero() });

        for col in (0..n).rev() {
            let tau_val = self.tau[col];
            for j in col..n {
                let mut dot = q.rows[col][j];
                for i in (col + 1)..m {
                    dot += self.qr.rows[i][col].conj() * q.rows[i][j];
                }
                dot *= tau_val;

                q.rows[col][j] -= dot;
                for i in (col + 1)..m {
                    let vi = self.qr.rows[i][col];
                    q.rows[i][j] -= dot * vi;
                }
            }
        }

        q
    }

    /// Solve the least-squares problem min ||Ax - b|| for x.
    ///
    /// Computes x = R^{-1} Q^H b via Householder application + back substitution.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let m = self.qr.nrows();
        let n = self.n();
        if b.len() != m {
            return Err(LinalgError::DimensionMismatch {
                expected: (m, 1),
                got: (b.len(), 1),
            });
        }

        // Apply Q^H to b by applying each Householder reflection in order.
        let mut qtb = b.as_slice().to_vec();
        for col in 0..n {
            let tau_val = self.tau[col];
            let mut dot = qtb[col];
            for i in (col + 1)..m {
                dot += self.qr.rows[i][col].conj() * qtb[i];
            }
            dot *= tau_val;

            qtb[col] -= dot;
            for i in (col + 1)..m {
                qtb[i] -= dot * self.qr.rows[i][col];
            }
        }

        // Back substitution with R (upper triangle of qr, first N rows)
        let mut x = vec![T::zero(); n];
        for i in (0..n).rev() {
            let mut sum = qtb[i];
            for j in (i + 1)..n {
                sum -= self.qr.rows[i][j] * x[j];
            }
            x[i] = sum / self.qr.rows[i][i];
        }

        Ok(Vector::from_vec(x))
    }

    /// Determinant of the original matrix, up to the sign of the
    /// reflections: `det(A) = (-1)^N · det(R)`. Square input only.
    pub fn det(&self) -> Result<T, LinalgError> {
        let n = require_square(self.qr.nrows(), self.n())?;
        let d = (0..n).fold(T::one(), |d, i| d * self.qr.rows[i][i]);
        Ok(if n % 2 == 0 { d } else { -d })
    }
}

impl<T: Scalar> Matrix<T> {
    /// QR decomposition using Householder reflections.
    ///
    /// Returns an error if the matrix is rank-deficient or has fewer rows
    /// than columns.
    pub fn qr(&self) -> Result<Qr<T>, LinalgError> {
        Qr::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    const TOL: f64 = 1e-10;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn qr_square_3x3() {
        let a = Matrix::new([
            [12.0_f64, -51.0, 4.0],
            [6.0, 167.0, -68.0],
            [-4.0, 24.0, -41.0],
        ]);
        let qr = a.qr().unwrap();
        let q = qr.q();
        let r = qr.r();

        let qr_prod = &q * &r;
        for i in 0..3 {
            for j in 0..3 {
                assert_near(qr_prod[(i, j)], a[(i, j)], TOL, &format!("QR[({},{})]", i, j));
            }
        }

        let qtq = &q.transposed() * &q;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(qtq[(i, j)], expected, TOL, &format!("QtQ[({},{})]", i, j));
            }
        }

        // |R| diagonal of the classic example is (14, 175, 35)
        for (i, want) in [14.0, 175.0, 35.0].into_iter().enumerate() {
            assert_near(r[(i, i)].abs(), want, 1e-9, "R diagonal");
        }
        assert_near(qr.det().unwrap(), a.det().unwrap(), 1e-6, "det");
    }

    #[test]
    fn qr_rectangular_4x3() {
        let a = Matrix::new([
            [1.0_f64, -1.0, 4.0],
            [1.0, 4.0, -2.0],
            [1.0, 4.0, 2.0],
            [1.0, -1.0, 0.0],
        ]);
        let qr = a.qr().unwrap();
        let q = qr.q();
        let r = qr.r();
        assert_eq!(q.size(), (4, 3));
        assert_eq!(r.size(), (3, 3));

        let qr_prod = &q * &r;
        for i in 0..4 {
            for j in 0..3 {
                assert_near(qr_prod[(i, j)], a[(i, j)], TOL, "Q*R");
            }
        }
        assert!(qr.det().is_err());
    }

    #[test]
    fn qr_rank_deficient() {
        let a = Matrix::new([[2.0_f64, 4.0], [0.0, 0.0], [0.0, 0.0]]);
        assert_eq!(a.qr().unwrap_err(), LinalgError::Singular);
        assert_eq!(Matrix::<f64>::zeros(3, 2).qr().unwrap_err(), LinalgError::Singular);

        // Relative tolerance: a tiny but independent matrix still factors.
        let small = Matrix::new([[1e-20_f64, 0.0], [0.0, 1e-20]]);
        assert!(small.qr().is_ok());
    }

    #[test]
    fn qr_wide_rejected() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(a.qr(), Err(LinalgError::DimensionMismatch { .. })));
    }

    #[test]
    fn qr_least_squares_residual_orthogonal() {
        let a = Matrix::new([[1.0_f64, 1.0], [1.0, 2.0], [1.0, 3.0], [1.0, 4.0]]);
        let b = Vector::from_slice(&[6.0, 5.0, 7.0, 10.0]);
        let x = a.qr().unwrap().solve(&b).unwrap();
        assert_near(x[0], 3.5, TOL, "intercept");
        assert_near(x[1], 1.4, TOL, "slope");
        let r = &(&a * &x) - &b;
        let at_r = &a.transposed() * &r;
        assert!(at_r.norm2() < 1e-10);
        assert!(a.qr().unwrap().solve(&Vector::zeros(3)).is_err());
    }

    #[test]
    fn qr_complex_unitary() {
        let a = Matrix::new([
            [Complex::new(1.0_f64, 1.0), Complex::new(2.0, -1.0)],
            [Complex::new(0.0, 2.0), Complex::new(1.0, 0.0)],
            [Complex::new(3.0, 0.0), Complex::new(-1.0, 1.0)],
        ]);
        let qr = a.qr().unwrap();
        let q = qr.q();
        let qhq = &q.adjoint() * &q;
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((qhq[(i, j)] - Complex::<f64>::new(expected, 0.0)).abs() < TOL);
            }
        }
        let back = &q * &qr.r();
        for i in 0..3 {
            for j in 0..2 {
                assert!((back[(i, j)] - a[(i, j)]).abs() < TOL);
            }
        }
    }
}
