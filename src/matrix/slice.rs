use alloc::vec::Vec;

use crate::linalg::{require_square, LinalgError};
use crate::traits::Scalar;
use crate::vector::{check_range, Vector};

use super::Matrix;

impl<T: Copy> Matrix<T> {
    /// Strided sub-matrix over rows `[rbeg, rend)` and columns `[cbeg, cend)`.
    ///
    /// Each axis follows [`Vector::slice`] rules: a zero step or an empty
    /// range is [`LinalgError::DegenerateSlice`], an end past the dimension
    /// is [`LinalgError::IndexOutOfRange`].
    ///
    /// ```
    /// use numkern::Matrix;
    ///
    /// let m = Matrix::from_fn(4, 4, |i, j| (4 * i + j) as f64);
    /// let s = m.slice(0, 4, 1, 4, 2, 2).unwrap();
    /// assert_eq!(s, Matrix::new([[1.0, 3.0], [9.0, 11.0]]));
    /// ```
    pub fn slice(
        &self,
        rbeg: usize,
        rend: usize,
        cbeg: usize,
        cend: usize,
        rstep: usize,
        cstep: usize,
    ) -> Result<Self, LinalgError> {
        check_range(rbeg, rend, rstep, self.nrows())?;
        check_range(cbeg, cend, cstep, self.ncols)?;
        let rows: Vec<Vector<T>> = self.rows[rbeg..rend]
            .iter()
            .step_by(rstep)
            .map(|r| r.as_slice()[cbeg..cend].iter().step_by(cstep).copied().collect())
            .collect();
        let ncols = (cend - cbeg).div_ceil(cstep);
        Ok(Self { rows, ncols })
    }

    /// Transposed copy.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    /// let t = m.transposed();
    /// assert_eq!(t.size(), (3, 2));
    /// assert_eq!(t[(2, 0)], 3.0);
    /// ```
    pub fn transposed(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows(), |i, j| self.rows[j][i])
    }

    /// Transpose in place; a non-square matrix changes shape.
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Copy with row `i` and column `j` removed.
    pub fn minor_at(&self, i: usize, j: usize) -> Result<Self, LinalgError> {
        if i >= self.nrows() {
            return Err(LinalgError::IndexOutOfRange {
                index: i,
                len: self.nrows(),
            });
        }
        if j >= self.ncols {
            return Err(LinalgError::IndexOutOfRange {
                index: j,
                len: self.ncols,
            });
        }
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|&(r, _)| r != i)
            .map(|(_, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(c, _)| c != j)
                    .map(|(_, &x)| x)
                    .collect()
            })
            .collect();
        Ok(Self {
            rows,
            ncols: self.ncols - 1,
        })
    }

    /// Principal minor: square matrix with row and column `i` removed.
    pub fn minor(&self, i: usize) -> Result<Self, LinalgError> {
        require_square(self.nrows(), self.ncols)?;
        self.minor_at(i, i)
    }
}

impl<T: Scalar> Matrix<T> {
    /// Hermitian (conjugate) transpose. Equal to [`transposed`](Self::transposed)
    /// for real elements.
    ///
    /// ```
    /// use numkern::{Complex, Matrix};
    /// let m = Matrix::new([[Complex::new(1.0_f64, 2.0), Complex::new(3.0, -1.0)]]);
    /// let h = m.adjoint();
    /// assert_eq!(h.size(), (2, 1));
    /// assert_eq!(h[(1, 0)], Complex::new(3.0, 1.0));
    /// ```
    pub fn adjoint(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows(), |i, j| self.rows[j][i].conj())
    }
}
