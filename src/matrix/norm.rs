use num_traits::{Float, Zero};

use crate::linalg::{LinalgError, Svd};
use crate::traits::{FloatScalar, Scalar};
use crate::vector::Vector;

use super::Matrix;

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Maximum absolute column sum.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, -2.0], [-3.0, 4.0]]);
    /// assert_eq!(m.norm1(), 6.0);
    /// assert_eq!(m.normi(), 7.0);
    /// ```
    pub fn norm1(&self) -> T::Real {
        (0..self.ncols)
            .map(|j| {
                self.rows
                    .iter()
                    .fold(<T::Real as Zero>::zero(), |acc, r| acc + r[j].modulus())
            })
            .fold(<T::Real as Zero>::zero(), Float::max)
    }

    /// Maximum absolute row sum.
    pub fn normi(&self) -> T::Real {
        self.rows
            .iter()
            .map(|r| r.norm1())
            .fold(<T::Real as Zero>::zero(), Float::max)
    }

    /// Frobenius norm.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
    /// assert!((m.normf() - 5.0).abs() < 1e-12);
    /// ```
    pub fn normf(&self) -> T::Real {
        self.iter().copied().collect::<Vector<T>>().norm2()
    }

    /// Spectral norm (largest singular value).
    ///
    /// Zero for an empty matrix.
    pub fn norm2(&self) -> Result<T::Real, LinalgError> {
        let svd = Svd::new(self)?;
        Ok(svd
            .singular_values()
            .first()
            .copied()
            .unwrap_or_else(<T::Real as Zero>::zero))
    }

    /// Entrywise `L_{p,q}` norm: the `q`-norm of the column `p`-norms.
    ///
    /// `normpq(2, 2)` is the Frobenius norm.
    ///
    /// # Panics
    ///
    /// Panics unless `p` and `q` are strictly positive.
    pub fn normpq(&self, p: T::Real, q: T::Real) -> T::Real {
        let zero = <T::Real as Zero>::zero();
        assert!(p > zero && q > zero, "Lpq norm requires p > 0 and q > 0");
        let col_norms = (0..self.ncols).map(|j| {
            self.rows
                .iter()
                .fold(zero, |acc, r| acc + r[j].modulus().powf(p))
                .powf(p.recip())
        });
        if q.is_infinite() {
            return col_norms.fold(zero, Float::max);
        }
        col_norms
            .fold(zero, |acc, c| acc + c.powf(q))
            .powf(q.recip())
    }
}

// ── Extremal entries (real elements only) ───────────────────────────

impl<T: FloatScalar> Matrix<T> {
    fn arg_best(&self, better: impl Fn(T, T) -> bool) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), T)> = None;
        for (i, r) in self.rows.iter().enumerate() {
            for (j, &x) in r.iter().enumerate() {
                match best {
                    Some((_, b)) if !better(x, b) => {}
                    _ => best = Some(((i, j), x)),
                }
            }
        }
        best.map(|(ij, _)| ij)
    }

    /// `(row, col)` of the largest element, first in row-major order on ties.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, 9.0], [9.0, -3.0]]);
    /// assert_eq!(m.argmax(), Some((0, 1)));
    /// assert_eq!(m.argmin(), Some((1, 1)));
    /// ```
    pub fn argmax(&self) -> Option<(usize, usize)> {
        self.arg_best(|x, b| x > b)
    }

    /// `(row, col)` of the smallest element.
    pub fn argmin(&self) -> Option<(usize, usize)> {
        self.arg_best(|x, b| x < b)
    }

    /// `(argmin, argmax)`.
    pub fn argminmax(&self) -> Option<((usize, usize), (usize, usize))> {
        Some((self.argmin()?, self.argmax()?))
    }

    pub fn max(&self) -> Option<T> {
        self.argmax().map(|(i, j)| self.rows[i][j])
    }

    pub fn min(&self) -> Option<T> {
        self.argmin().map(|(i, j)| self.rows[i][j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    #[test]
    fn frobenius_is_scale_safe() {
        let m = Matrix::new([[3e-200_f64, 0.0], [0.0, 4e-200]]);
        assert!((m.normf() / 5e-200 - 1.0).abs() < 1e-12);
        let big = Matrix::new([[3e200_f64, 4e200]]);
        assert!((big.normf() / 5e200 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn induced_norms() {
        let m = Matrix::new([[1.0_f64, -7.0], [-2.0, -3.0]]);
        assert_eq!(m.norm1(), 10.0);
        assert_eq!(m.normi(), 8.0);
    }

    #[test]
    fn frobenius_matches_lpq_22() {
        let m = Matrix::new([[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert!((m.normf() - m.normpq(2.0, 2.0)).abs() < 1e-12);
        assert!((m.normf() - 91.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn lpq_sum_of_column_maxima() {
        let m = Matrix::new([[1.0_f64, -2.0], [3.0, 1.0]]);
        assert!((m.normpq(1.0, 1.0) - 7.0).abs() < 1e-12);
        assert_eq!(m.normpq(1.0, f64::INFINITY), 4.0);
    }

    #[test]
    fn spectral_norm() {
        let m = Matrix::new([[3.0_f64, 0.0], [0.0, -5.0]]);
        assert!((m.norm2().unwrap() - 5.0).abs() < 1e-12);
        assert!(m.norm2().unwrap() <= m.normf());
        assert_eq!(Matrix::<f64>::zeros(0, 0).norm2().unwrap(), 0.0);
    }

    #[test]
    fn complex_frobenius() {
        let m = Matrix::new([[Complex::new(3.0_f64, 4.0)]]);
        assert_eq!(m.normf(), 5.0);
        assert_eq!(m.norm1(), 5.0);
    }

    #[test]
    fn extrema() {
        let m = Matrix::new([[2.0_f64, -1.0], [-1.0, 2.0]]);
        assert_eq!(m.argmax(), Some((0, 0)));
        assert_eq!(m.argmin(), Some((0, 1)));
        assert_eq!(m.max(), Some(2.0));
        assert_eq!(m.min(), Some(-1.0));
        assert_eq!(Matrix::<f64>::zeros(0, 0).argminmax(), None);
    }
}
