use alloc::vec;

use num_traits::{Float, Zero};

use crate::linalg::{require_square, LinalgError};
use crate::traits::{MatrixMut, MatrixRef, Scalar};
use crate::{Matrix, Vector};

/// Cholesky decomposition in place: A = L * L^H.
///
/// For real matrices, L^H = L^T (standard Cholesky).
/// For complex matrices, this is the Hermitian Cholesky decomposition.
///
/// Only the lower triangle of `a` is read. On return it (including the
/// diagonal) contains L; the upper triangle is left unchanged.
///
/// Returns an error if the matrix is not (Hermitian) positive definite.
pub fn cholesky_in_place<T: Scalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = require_square(a.nrows(), a.ncols())?;

    for j in 0..n {
        for k in 0..j {
            let ljk_conj = a.get(j, k).conj();
            for i in j..n {
                let lik = *a.get(i, k);
                *a.get_mut(i, j) -= lik * ljk_conj;
            }
        }

        let diag = a.get(j, j).re();
        // NaN fails too
        if !(diag > <T::Real as Zero>::zero()) {
            return Err(LinalgError::NotPositiveDefinite);
        }
        let ljj = T::from_real(diag.sqrt());
        *a.get_mut(j, j) = ljj;

        let inv_ljj = T::one() / ljj;
        for i in (j + 1)..n {
            *a.get_mut(i, j) *= inv_ljj;
        }
    }

    Ok(())
}

/// Solve L*x = b by forward substitution, where L is lower triangular.
pub fn forward_substitute<T: Scalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= *l.get(i, j) * x[j];
        }
        x[i] = sum / *l.get(i, i);
    }
}

/// Solve L^H * x = b by back substitution, where L is lower triangular.
pub fn back_substitute_lt<T: Scalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = l.nrows();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= l.get(j, i).conj() * x[j];
        }
        x[i] = sum / l.get(i, i).conj();
    }
}

/// Cholesky decomposition of a (Hermitian) positive-definite matrix.
///
/// # Example
///
/// ```
/// use numkern::{Matrix, Vector};
///
/// let a = Matrix::new([[4.0_f64, 2.0], [2.0, 3.0]]);
/// let chol = a.cholesky().unwrap();
///
/// let b = Vector::from_slice(&[8.0, 7.0]);
/// let x = chol.solve(&b).unwrap(); // solve Ax = b
///
/// let inv = chol.inverse(); // A^{-1}
/// let det = chol.det();     // det(A)
/// assert!((det - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Cholesky<T> {
    /// Lower triangular Cholesky factor L (A = L·L^H), zero above the diagonal.
    l: Matrix<T>,
}

impl<T: Scalar> Cholesky<T> {
    /// Decompose a (Hermitian) positive-definite matrix.
    ///
    /// Returns an error if the matrix is not positive definite.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let mut l = a.clone();
        cholesky_in_place(&mut l)?;
        for (i, row) in l.rows.iter_mut().enumerate() {
            for x in row.iter_mut().skip(i + 1) {
                *x = T::zero();
            }
        }
        Ok(Self { l })
    }

    /// The lower triangular factor L.
    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    /// Solve A*x = b for x, where A = L·L^H.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.l.nrows();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                got: (b.len(), 1),
            });
        }
        let mut y = vec![T::zero(); n];
        let mut x = vec![T::zero(); n];
        forward_substitute(&self.l, b.as_slice(), &mut y);
        back_substitute_lt(&self.l, &y, &mut x);
        Ok(Vector::from_vec(x))
    }

    /// Compute the determinant: det(A) = (Π L[i,i])².
    pub fn det(&self) -> T {
        let prod = (0..self.l.nrows()).fold(T::one(), |p, i| p * self.l.rows[i][i]);
        prod * prod
    }

    /// Compute the log-determinant: ln(det(A)) = 2 · Σ ln(L[i,i]).
    ///
    /// More numerically stable than `det()` for large matrices.
    pub fn ln_det(&self) -> T::Real {
        let sum = (0..self.l.nrows())
            .fold(<T::Real as Zero>::zero(), |s, i| s + self.l.rows[i][i].re().ln());
        sum + sum
    }

    /// Compute the matrix inverse using the Cholesky factorization.
    pub fn inverse(&self) -> Matrix<T> {
        let n = self.l.nrows();
        let mut inv = Matrix::zeros(n, n);
        let mut e = vec![T::zero(); n];
        let mut y = vec![T::zero(); n];
        let mut x = vec![T::zero(); n];

        for col in 0..n {
            if col > 0 {
                e[col - 1] = T::zero();
            }
            e[col] = T::one();

            forward_substitute(&self.l, &e, &mut y);
            back_substitute_lt(&self.l, &y, &mut x);

            for (row, &v) in x.iter().enumerate() {
                inv.rows[row][col] = v;
            }
        }

        inv
    }
}

impl<T: Scalar> Matrix<T> {
    /// Cholesky decomposition (`A = L * L^H`).
    ///
    /// For real matrices, this is the standard `A = L * L^T`.
    /// Returns an error if the matrix is not (Hermitian) positive definite.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let spd = Matrix::new([[4.0_f64, 2.0], [2.0, 3.0]]);
    /// let chol = spd.cholesky().unwrap();
    /// let l = chol.l();
    /// let reconstructed = l * &l.transposed();
    /// assert!((reconstructed[(0, 0)] - 4.0).abs() < 1e-12);
    /// ```
    pub fn cholesky(&self) -> Result<Cholesky<T>, LinalgError> {
        Cholesky::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    fn spd_2x2() -> Matrix<f64> {
        Matrix::new([[4.0, 2.0], [2.0, 3.0]])
    }

    fn spd_3x3() -> Matrix<f64> {
        Matrix::new([[4.0, 2.0, 1.0], [2.0, 10.0, 3.5], [1.0, 3.5, 4.5]])
    }

    fn assert_reconstructs(a: &Matrix<f64>) {
        let l = a.cholesky().unwrap().l().clone();
        let reconstructed = &l * &l.transposed();
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                assert!(
                    (reconstructed[(i, j)] - a[(i, j)]).abs() < 1e-12,
                    "mismatch at ({},{})",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn cholesky_2x2() {
        assert_reconstructs(&spd_2x2());
        let l = spd_2x2().cholesky().unwrap().l().clone();
        assert!(l.is_triangle_l());
        assert_eq!(l[(0, 0)], 2.0);
        assert_eq!(l[(1, 0)], 1.0);
    }

    #[test]
    fn cholesky_3x3() {
        assert_reconstructs(&spd_3x3());
    }

    #[test]
    fn reads_lower_triangle_only() {
        let mut a = spd_3x3();
        a[(0, 2)] = 99.0;
        let l = a.cholesky().unwrap().l().clone();
        assert_eq!(&l, spd_3x3().cholesky().unwrap().l());
    }

    #[test]
    fn cholesky_solve_3x3() {
        let a = spd_3x3();
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let x = a.cholesky().unwrap().solve(&b).unwrap();

        for i in 0..3 {
            let mut sum = 0.0;
            for j in 0..3 {
                sum += a[(i, j)] * x[j];
            }
            assert!((sum - b[i]).abs() < 1e-10, "residual[{}] = {}", i, sum - b[i]);
        }
        assert!(a.cholesky().unwrap().solve(&Vector::zeros(2)).is_err());
    }

    #[test]
    fn cholesky_det() {
        let a = spd_2x2();
        let chol = a.cholesky().unwrap();
        assert!((chol.det() - a.det().unwrap()).abs() < 1e-12);
        assert!((chol.ln_det() - chol.det().ln()).abs() < 1e-12);
    }

    #[test]
    fn cholesky_inverse() {
        let a = spd_3x3();
        let a_inv = a.cholesky().unwrap().inverse();

        let id = &a * &a_inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn cholesky_not_positive_definite() {
        let a = Matrix::new([[1.0_f64, 5.0], [5.0, 1.0]]);
        assert_eq!(a.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
        let neg = Matrix::new([[-1.0_f64]]);
        assert_eq!(neg.cholesky().unwrap_err(), LinalgError::NotPositiveDefinite);
        let rect = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(rect.cholesky(), Err(LinalgError::DimensionMismatch { .. })));
    }

    #[test]
    fn cholesky_identity() {
        let id = Matrix::<f64>::identity(3);
        assert_eq!(id.cholesky().unwrap().l(), &id);
    }

    #[test]
    fn cholesky_hermitian() {
        let a = Matrix::new([
            [Complex::new(4.0_f64, 0.0), Complex::new(1.0, -2.0)],
            [Complex::new(1.0, 2.0), Complex::new(6.0, 0.0)],
        ]);
        let chol = a.cholesky().unwrap();
        let l = chol.l();
        let back = l * &l.adjoint();
        for i in 0..2 {
            for j in 0..2 {
                assert!((back[(i, j)] - a[(i, j)]).abs() < 1e-12);
            }
        }
        // det = 4*6 - |1+2i|^2 = 19
        assert!((chol.det() - Complex::new(19.0_f64, 0.0)).abs() < 1e-12);
    }
}
