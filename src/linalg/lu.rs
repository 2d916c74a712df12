use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::{negligible, pivot_tolerance, require_square, LinalgError};
use crate::traits::{MatrixMut, MatrixRef, Scalar};
use crate::{Matrix, Vector};

/// Perform LU decomposition with partial pivoting, in place.
///
/// On return, `a` contains both L and U packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// `perm` is filled with the row permutation: row `i` of the factored
/// matrix is row `perm[i]` of the input.
/// Returns `true` if the number of row swaps was even.
///
/// Shapes are checked before anything is written. On `Singular`, `a` holds
/// the partially eliminated matrix.
pub fn lu_in_place<T: Scalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
) -> Result<bool, LinalgError> {
    let n = require_square(a.nrows(), a.ncols())?;
    if perm.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: (n, 1),
            got: (perm.len(), 1),
        });
    }

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }
    let tol = pivot_tolerance(&*a);

    let mut even = true;

    for col in 0..n {
        // Partial pivoting: find row with largest modulus in this column
        let mut max_row = col;
        let mut max_val = a.get(col, col).modulus();
        for row in (col + 1)..n {
            let val = a.get(row, col).modulus();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val <= tol {
            return Err(LinalgError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            a.swap_rows(col, max_row);
            even = !even;
        }

        let inv_pivot = T::one() / *a.get(col, col);

        // Row-oriented elimination: store the multiplier, then update the
        // trailing part of the row.
        for row in (col + 1)..n {
            let factor = *a.get(row, col) * inv_pivot;
            *a.get_mut(row, col) = factor;
            if factor == T::zero() {
                continue;
            }
            for j in (col + 1)..n {
                let u = *a.get(col, j);
                *a.get_mut(row, j) -= factor * u;
            }
        }
    }

    Ok(even)
}

/// Solve Ax = b given the packed LU decomposition and permutation.
///
/// `lu` is the packed L/U matrix from `lu_in_place`.
/// `perm` is the row permutation from `lu_in_place`.
/// `b` (input) and `x` (output) are separate slices of length n.
pub fn lu_solve<T: Scalar>(lu: &impl MatrixRef<T>, perm: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // Apply permutation and forward substitution (solve Ly = Pb)
    for i in 0..n {
        let mut sum = b[perm[i]];
        for j in 0..i {
            sum -= *lu.get(i, j) * x[j];
        }
        x[i] = sum;
    }

    // Back substitution (solve Ux = y)
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum -= *lu.get(i, j) * x[j];
        }
        x[i] = sum / *lu.get(i, i);
    }
}

/// Unit lower factor from a packed L/U matrix.
fn unpack_l<T: Scalar>(lu: &Matrix<T>) -> Matrix<T> {
    let n = lu.nrows();
    Matrix::from_fn(n, n, |i, j| match i.cmp(&j) {
        core::cmp::Ordering::Greater => lu.rows[i][j],
        core::cmp::Ordering::Equal => T::one(),
        core::cmp::Ordering::Less => T::zero(),
    })
}

/// Upper factor from a packed L/U matrix.
fn unpack_u<T: Scalar>(lu: &Matrix<T>) -> Matrix<T> {
    let n = lu.nrows();
    Matrix::from_fn(n, n, |i, j| if j >= i { lu.rows[i][j] } else { T::zero() })
}

fn diagonal_product<T: Scalar>(lu: &Matrix<T>) -> T {
    (0..lu.nrows()).fold(T::one(), |d, i| d * lu.rows[i][i])
}

/// LU decomposition without pivoting.
///
/// Stores `L + U - I` in one packed matrix. Any zero pivot fails, even
/// when the matrix is invertible; use [`Lup`] for a stable factorization.
///
/// ```
/// use numkern::Matrix;
///
/// let a = Matrix::new([[4.0_f64, 3.0], [6.0, 3.0]]);
/// let lu = a.lu().unwrap();
/// assert!((lu.packed()[(1, 0)] - 1.5).abs() < 1e-12);
/// assert!((lu.packed()[(1, 1)] + 1.5).abs() < 1e-12);
///
/// let needs_pivot = Matrix::new([[0.0_f64, 1.0], [1.0, 0.0]]);
/// assert!(needs_pivot.lu().is_err());
/// assert!(needs_pivot.lup().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Lu<T> {
    lu: Matrix<T>,
}

impl<T: Scalar> Lu<T> {
    /// Decompose a square matrix.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = require_square(a.nrows(), a.ncols())?;
        let tol = pivot_tolerance(a);
        let mut lu = a.clone();
        for col in 0..n {
            let pivot = lu.rows[col][col];
            if negligible(pivot, tol) {
                return Err(LinalgError::Singular);
            }
            for row in (col + 1)..n {
                let factor = lu.rows[row][col] / pivot;
                lu.rows[row][col] = factor;
                for j in (col + 1)..n {
                    let u = lu.rows[col][j];
                    lu.rows[row][j] -= factor * u;
                }
            }
        }
        Ok(Self { lu })
    }

    /// The packed `L + U - I` matrix.
    pub fn packed(&self) -> &Matrix<T> {
        &self.lu
    }

    /// Unit lower-triangular factor.
    pub fn l(&self) -> Matrix<T> {
        unpack_l(&self.lu)
    }

    /// Upper-triangular factor.
    pub fn u(&self) -> Matrix<T> {
        unpack_u(&self.lu)
    }

    pub fn det(&self) -> T {
        diagonal_product(&self.lu)
    }
}

/// LU decomposition with partial pivoting, `P·A = L·U`.
///
/// Stores the packed L/U factors and the row permutation.
/// Use `solve()`, `inverse()`, or `det()` to work with the decomposition.
///
/// # Example
///
/// ```
/// use numkern::{Matrix, Vector};
///
/// let a = Matrix::new([[2.0_f64, 1.0], [5.0, 3.0]]);
/// let lup = a.lup().unwrap();
///
/// let b = Vector::from_slice(&[4.0, 11.0]);
/// let x = lup.solve(&b).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
///
/// let det = lup.det();
/// assert!((det - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Lup<T> {
    lu: Matrix<T>,
    perm: Vec<usize>,
    even: bool,
}

impl<T: Scalar> Lup<T> {
    /// Decompose a matrix. Returns an error if the matrix is singular.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = require_square(a.nrows(), a.ncols())?;
        let mut lu = a.clone();
        let mut perm = vec![0usize; n];
        let even = lu_in_place(&mut lu, &mut perm)?;
        Ok(Self { lu, perm, even })
    }

    /// The packed `L + U - I` matrix.
    pub fn packed(&self) -> &Matrix<T> {
        &self.lu
    }

    pub fn l(&self) -> Matrix<T> {
        unpack_l(&self.lu)
    }

    pub fn u(&self) -> Matrix<T> {
        unpack_u(&self.lu)
    }

    /// Permutation matrix `P` with `P·A = L·U`.
    pub fn p(&self) -> Matrix<T> {
        let n = self.perm.len();
        Matrix::from_fn(n, n, |i, j| {
            if self.perm[i] == j {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Row permutation: row `i` of `P·A` is row `perm()[i]` of `A`.
    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// Solve Ax = b for x.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.perm.len();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: (n, 1),
                got: (b.len(), 1),
            });
        }
        let mut x = vec![T::zero(); n];
        lu_solve(&self.lu, &self.perm, b.as_slice(), &mut x);
        Ok(Vector::from_vec(x))
    }

    /// Compute the matrix inverse.
    pub fn inverse(&self) -> Matrix<T> {
        let n = self.perm.len();
        let mut inv = Matrix::zeros(n, n);
        let mut e = vec![T::zero(); n];
        let mut col_buf = vec![T::zero(); n];

        for col in 0..n {
            if col > 0 {
                e[col - 1] = T::zero();
            }
            e[col] = T::one();
            lu_solve(&self.lu, &self.perm, &e, &mut col_buf);
            for (row, &x) in col_buf.iter().enumerate() {
                inv.rows[row][col] = x;
            }
        }

        inv
    }

    /// Compute the determinant.
    pub fn det(&self) -> T {
        let d = diagonal_product(&self.lu);
        if self.even {
            d
        } else {
            -d
        }
    }
}

/// Convenience methods on square matrices.
impl<T: Scalar> Matrix<T> {
    /// LU decomposition without pivoting.
    pub fn lu(&self) -> Result<Lu<T>, LinalgError> {
        Lu::new(self)
    }

    /// LU decomposition with partial pivoting.
    pub fn lup(&self) -> Result<Lup<T>, LinalgError> {
        Lup::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    fn assert_close(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
        assert_eq!(a.size(), b.size());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{} vs {}", x, y);
        }
    }

    #[test]
    fn lup_solve_2x2() {
        let a = Matrix::new([[2.0_f64, 1.0], [5.0, 3.0]]);
        let x = a.lup().unwrap().solve(&Vector::from_slice(&[4.0, 11.0])).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn lup_solve_3x3() {
        let a = Matrix::new([[1.0_f64, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        let b = Vector::from_slice(&[14.0, 14.0, 17.0]);
        let x = a.lup().unwrap().solve(&b).unwrap();
        for (xi, want) in x.iter().zip([1.0, 2.0, 3.0]) {
            assert!((xi - want).abs() < 1e-10);
        }
    }

    #[test]
    fn lup_inverse_3x3() {
        let a = Matrix::new([[1.0_f64, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        let inv = a.lup().unwrap().inverse();
        assert_close(&(&a * &inv), &Matrix::identity(3), 1e-12);
        let want = Matrix::new([[-24.0, 18.0, 5.0], [20.0, -15.0, -4.0], [-5.0, 4.0, 1.0]]);
        assert_close(&inv, &want, 1e-10);
    }

    #[test]
    fn lup_det_sign_follows_swaps() {
        let a = Matrix::new([[0.0_f64, 1.0], [1.0, 0.0]]);
        let lup = a.lup().unwrap();
        assert_eq!(lup.perm(), &[1, 0]);
        assert!((lup.det() + 1.0).abs() < 1e-15);
    }

    #[test]
    fn lup_reconstructs_pa() {
        let a = Matrix::new([
            [1.0_f64, 2.0, 0.5, -1.0],
            [4.0, -3.0, 2.0, 0.0],
            [0.0, 1.0, 7.0, 2.0],
            [-2.0, 0.5, 1.0, 3.0],
        ]);
        let lup = a.lup().unwrap();
        let l = lup.l();
        let u = lup.u();
        assert!(l.is_triangle_l());
        assert!(u.is_triangle_u());
        assert!(l.diagonal(0).unwrap().iter().all(|&d| d == 1.0));
        assert_close(&(&lup.p() * &a), &(&l * &u), 1e-12);
    }

    #[test]
    fn lu_without_pivot_reconstructs() {
        let a = Matrix::new([[4.0_f64, 3.0, 2.0], [2.0, 5.0, 1.0], [1.0, 1.0, 3.0]]);
        let lu = a.lu().unwrap();
        assert_close(&(&lu.l() * &lu.u()), &a, 1e-12);
        assert!((lu.det() - a.cofactor_det().unwrap()).abs() < 1e-10);
        assert_close(&(&(&lu.l() + &lu.u()) - &Matrix::<f64>::identity(3)), lu.packed(), 1e-12);
    }

    #[test]
    fn lup_singular() {
        let a = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
        assert_eq!(a.lup().unwrap_err(), LinalgError::Singular);
        assert_eq!(a.lu().unwrap_err(), LinalgError::Singular);
    }

    #[test]
    fn scaled_identity_is_regular() {
        let a = Matrix::<f64>::identity(3) * 1e-20_f64;
        let lup = a.lup().unwrap();
        assert!((lup.det() / 1e-60 - 1.0).abs() < 1e-12);
        assert!((lup.inverse()[(2, 2)] * 1e-20 - 1.0).abs() < 1e-12);
        assert!(a.lu().is_ok());
        assert!(a.qr().is_ok());
    }

    #[test]
    fn non_square_rejected() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(a.lup(), Err(LinalgError::DimensionMismatch { .. })));
        assert!(matches!(a.lu(), Err(LinalgError::DimensionMismatch { .. })));
    }

    #[test]
    fn lu_in_place_generic() {
        let mut a = Matrix::new([[2.0_f64, 1.0], [4.0, 3.0]]);
        let mut perm = [0usize; 2];
        let even = lu_in_place(&mut a, &mut perm).unwrap();
        assert!(!even);
        assert_eq!(perm, [1, 0]);
        assert_eq!(a[(0, 0)], 4.0);
        assert!((a[(1, 0)] - 0.5).abs() < 1e-15);

        let mut short = [0usize; 1];
        let mut b = Matrix::<f64>::identity(2);
        assert!(lu_in_place(&mut b, &mut short).is_err());
        assert_eq!(b, Matrix::identity(2));
    }

    #[test]
    fn solve_verify_residual() {
        let a = Matrix::from_fn(6, 6, |i, j| {
            if i == j {
                10.0
            } else {
                1.0 / (1.0 + i as f64 + 2.0 * j as f64)
            }
        });
        let b = Vector::from_fn(6, |i| i as f64 - 2.5);
        let x = a.lup().unwrap().solve(&b).unwrap();
        let r = &(&a * &x) - &b;
        assert!(r.norm2() < 1e-12);
        assert!(a.lup().unwrap().solve(&Vector::zeros(5)).is_err());
    }

    #[test]
    fn complex_lup() {
        let a = Matrix::new([
            [Complex::new(1.0_f64, 1.0), Complex::new(2.0, 0.0)],
            [Complex::new(0.0, 1.0), Complex::new(1.0, -1.0)],
        ]);
        let lup = a.lup().unwrap();
        let det = lup.det();
        let want = a.cofactor_det().unwrap();
        assert!((det - want).abs() < 1e-12);
        let id = &a * &lup.inverse();
        assert!((id[(0, 0)] - Complex::new(1.0_f64, 0.0)).abs() < 1e-12);
        assert!(id[(1, 0)].abs() < 1e-12);
    }

    #[test]
    fn empty_matrix() {
        let lup = Matrix::<f64>::zeros(0, 0).lup().unwrap();
        assert_eq!(lup.det(), 1.0);
        assert_eq!(lup.inverse().size(), (0, 0));
    }
}
