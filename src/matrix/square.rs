use crate::linalg::{pivot_tolerance, require_square, LinalgError, Lup};
use crate::traits::Scalar;

use super::Matrix;

/// Below this order, [`Matrix::det`] uses cofactor expansion.
pub const COFACTOR_LIMIT: usize = 4;

// ── Structural predicates ───────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    fn all_zero_where(&self, outside: impl Fn(usize, usize) -> bool) -> bool {
        self.rows.iter().enumerate().all(|(i, r)| {
            r.iter()
                .enumerate()
                .all(|(j, x)| !outside(i, j) || *x == T::zero())
        })
    }

    /// Square with zeros off the main diagonal.
    pub fn is_diagonal(&self) -> bool {
        self.is_square() && self.all_zero_where(|i, j| i != j)
    }

    /// Square with zeros above the main diagonal.
    pub fn is_triangle_l(&self) -> bool {
        self.is_square() && self.all_zero_where(|i, j| j > i)
    }

    /// Square with zeros below the main diagonal.
    pub fn is_triangle_u(&self) -> bool {
        self.is_square() && self.all_zero_where(|i, j| i > j)
    }

    /// Lower or upper triangular.
    pub fn is_triangle(&self) -> bool {
        self.is_triangle_l() || self.is_triangle_u()
    }

    /// Square with zeros outside the main diagonal and its two neighbours.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let t = Matrix::new([[2.0_f64, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 2.0]]);
    /// assert!(t.is_tridiagonal());
    /// let f = Matrix::new([[2.0_f64, 1.0, 1.0], [1.0, 2.0, 1.0], [0.0, 1.0, 2.0]]);
    /// assert!(!f.is_tridiagonal());
    /// ```
    pub fn is_tridiagonal(&self) -> bool {
        self.is_square() && self.all_zero_where(|i, j| i.abs_diff(j) > 1)
    }

    /// Square and equal to its own adjoint (symmetric for real elements).
    pub fn is_hermitian(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        for i in 0..n {
            for j in i..n {
                if self.rows[i][j] != self.rows[j][i].conj() {
                    return false;
                }
            }
        }
        true
    }

    /// Sum of the main diagonal.
    pub fn trace(&self) -> T {
        let n = self.nrows().min(self.ncols);
        (0..n).fold(T::zero(), |acc, i| acc + self.rows[i][i])
    }
}

// ── Determinant and inverse ─────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Determinant.
    ///
    /// The empty matrix has determinant one. Orders below [`COFACTOR_LIMIT`]
    /// use [`cofactor_det`](Self::cofactor_det), larger ones
    /// [`gauss_det`](Self::gauss_det) with the triangularity shortcut.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[2.0_f64, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]]);
    /// assert_eq!(m.det().unwrap(), 24.0);
    /// assert!(Matrix::<f64>::zeros(2, 3).det().is_err());
    /// ```
    pub fn det(&self) -> Result<T, LinalgError> {
        let n = require_square(self.nrows(), self.ncols)?;
        if n < COFACTOR_LIMIT {
            self.cofactor_det()
        } else {
            self.gauss_det(true)
        }
    }

    /// Determinant by recursive cofactor expansion along the first row.
    ///
    /// Exponential in the order; meant for small matrices.
    pub fn cofactor_det(&self) -> Result<T, LinalgError> {
        require_square(self.nrows(), self.ncols)?;
        cofactor(self)
    }

    /// Determinant by Gaussian elimination with partial pivoting.
    ///
    /// With `triangle_check`, a triangular matrix short-circuits to the
    /// product of its diagonal. A column whose largest candidate pivot is at
    /// most machine epsilon times the largest entry modulus makes the result
    /// exactly zero.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[3.0_f64, 8.0], [4.0, 6.0]]);
    /// assert!((m.gauss_det(false).unwrap() - (-14.0)).abs() < 1e-12);
    /// ```
    pub fn gauss_det(&self, triangle_check: bool) -> Result<T, LinalgError> {
        let n = require_square(self.nrows(), self.ncols)?;
        if triangle_check && self.is_triangle() {
            return Ok((0..n).fold(T::one(), |acc, i| acc * self.rows[i][i]));
        }

        let tol = pivot_tolerance(self);
        let mut a = self.clone();
        let mut det = T::one();
        for col in 0..n {
            let mut max_row = col;
            let mut max_val = a.rows[col][col].modulus();
            for row in (col + 1)..n {
                let val = a.rows[row][col].modulus();
                if val > max_val {
                    max_val = val;
                    max_row = row;
                }
            }

            if max_val <= tol {
                return Ok(T::zero());
            }

            if max_row != col {
                a.rows.swap(col, max_row);
                det = -det;
            }

            let pivot = a.rows[col][col];
            det *= pivot;
            for row in (col + 1)..n {
                let factor = a.rows[row][col] / pivot;
                if factor == T::zero() {
                    continue;
                }
                for j in (col + 1)..n {
                    let v = a.rows[col][j];
                    a.rows[row][j] -= factor * v;
                }
                a.rows[row][col] = T::zero();
            }
        }
        Ok(det)
    }

    /// Inverse through an LUP factorization.
    ///
    /// Fails with [`LinalgError::Singular`] when a pivot is negligible.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
    /// let inv = a.inversed().unwrap();
    /// let id = &a * &inv;
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!(id[(0, 1)].abs() < 1e-12);
    /// ```
    pub fn inversed(&self) -> Result<Self, LinalgError> {
        Ok(Lup::new(self)?.inverse())
    }

    /// Replace `self` with its inverse; on failure `self` is unchanged.
    pub fn inverse(&mut self) -> Result<(), LinalgError> {
        *self = self.inversed()?;
        Ok(())
    }
}

fn cofactor<T: Scalar>(m: &Matrix<T>) -> Result<T, LinalgError> {
    let r = &m.rows;
    Ok(match m.nrows() {
        0 => T::one(),
        1 => r[0][0],
        2 => r[0][0] * r[1][1] - r[0][1] * r[1][0],
        n => {
            let mut det = T::zero();
            for j in 0..n {
                let term = r[0][j] * cofactor(&m.minor_at(0, j)?)?;
                if j % 2 == 0 {
                    det += term;
                } else {
                    det -= term;
                }
            }
            det
        }
    })
}
