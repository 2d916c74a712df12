mod norm;
mod ops;
mod slice;
mod square;

pub use square::COFACTOR_LIMIT;

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::linalg::LinalgError;
use crate::traits::{MatrixMut, MatrixRef, Scalar};
use crate::vector::Vector;

/// Dense heap-allocated matrix stored as a sequence of equal-length rows.
///
/// Every row is a [`Vector`]; the matrix owns them, and every row, column or
/// diagonal handed out by value is an independent copy. Dimensions change only
/// through the explicit structural edits (`append_row`, `insert_col`, ...),
/// which reject vectors of the wrong length before touching anything.
///
/// # Examples
///
/// ```
/// use numkern::Matrix;
///
/// let a = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.size(), (2, 2));
///
/// let id = Matrix::<f64>::identity(3);
/// assert_eq!(id[(1, 1)], 1.0);
/// assert_eq!(id[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix<T> {
    pub(crate) rows: Vec<Vector<T>>,
    pub(crate) ncols: usize,
}

// ── Size and borrowed access ────────────────────────────────────────

impl<T> Matrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols)
    }

    /// Whether the matrix holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols == 0
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols
    }

    /// Checked element access.
    pub fn get(&self, i: usize, j: usize) -> Result<&T, LinalgError> {
        self.row_ref(i)?.get(j)
    }

    /// Checked mutable element access.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut T, LinalgError> {
        let len = self.nrows();
        self.rows
            .get_mut(i)
            .ok_or(LinalgError::IndexOutOfRange { index: i, len })?
            .get_mut(j)
    }

    /// Borrow row `i`.
    pub fn row_ref(&self, i: usize) -> Result<&Vector<T>, LinalgError> {
        self.rows.get(i).ok_or(LinalgError::IndexOutOfRange {
            index: i,
            len: self.nrows(),
        })
    }

    /// Mutably borrow the elements of row `i`.
    ///
    /// The borrow is a slice, so the row keeps its length.
    pub fn row_mut(&mut self, i: usize) -> Result<&mut [T], LinalgError> {
        let len = self.nrows();
        self.rows
            .get_mut(i)
            .map(|r| r.as_mut_slice())
            .ok_or(LinalgError::IndexOutOfRange { index: i, len })
    }

    /// Iterate over the rows in order.
    #[inline]
    pub fn iter_rows(&self) -> core::slice::Iter<'_, Vector<T>> {
        self.rows.iter()
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.rows.iter().flat_map(|r| r.iter())
    }

    /// Exchange rows `a` and `b`.
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<(), LinalgError> {
        let len = self.nrows();
        for i in [a, b] {
            if i >= len {
                return Err(LinalgError::IndexOutOfRange { index: i, len });
            }
        }
        self.rows.swap(a, b);
        Ok(())
    }
}

// ── Construction ────────────────────────────────────────────────────

impl<T: Copy> Matrix<T> {
    /// Build from a nested array literal, row by row.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    /// assert_eq!(m.nrows(), 2);
    /// assert_eq!(m.ncols(), 3);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn new<const M: usize, const N: usize>(rows: [[T; N]; M]) -> Self {
        Self {
            rows: rows.iter().map(|r| Vector::from_slice(r)).collect(),
            ncols: N,
        }
    }

    /// Build from row vectors; fails if the rows differ in length.
    pub fn from_rows(rows: Vec<Vector<T>>) -> Result<Self, LinalgError> {
        let ncols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(LinalgError::DimensionMismatch {
                expected: (1, ncols),
                got: (1, bad.len()),
            });
        }
        Ok(Self { rows, ncols })
    }

    /// Build from nested `Vec`s; fails if ragged.
    ///
    /// ```
    /// use numkern::Matrix;
    /// assert!(Matrix::from_vec_rows(vec![vec![1.0_f64, 2.0], vec![3.0]]).is_err());
    /// ```
    pub fn from_vec_rows(rows: Vec<Vec<T>>) -> Result<Self, LinalgError> {
        Self::from_rows(rows.into_iter().map(Vector::from_vec).collect())
    }

    /// `nrows × ncols` matrix with every element set to `value`.
    pub fn filled(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            rows: (0..nrows).map(|_| Vector::filled(ncols, value)).collect(),
            ncols,
        }
    }

    /// Build element-by-element from `f(row, col)`.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        Self {
            rows: (0..nrows)
                .map(|i| Vector::from_fn(ncols, |j| f(i, j)))
                .collect(),
            ncols,
        }
    }

    /// Apply `f` to every element.
    pub fn map<O: Copy>(&self, mut f: impl FnMut(T) -> O) -> Matrix<O> {
        Matrix {
            rows: self.rows.iter().map(|r| r.map(&mut f)).collect(),
            ncols: self.ncols,
        }
    }

    /// Combine two same-shape matrices elementwise.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn zip_map<U: Copy, O: Copy>(
        &self,
        rhs: &Matrix<U>,
        mut f: impl FnMut(T, U) -> O,
    ) -> Matrix<O> {
        assert_eq!(
            self.size(),
            rhs.size(),
            "dimension mismatch: {}x{} matrix with {}x{} matrix",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols()
        );
        Matrix {
            rows: self
                .rows
                .iter()
                .zip(rhs.rows.iter())
                .map(|(a, b)| a.zip_map(b, &mut f))
                .collect(),
            ncols: self.ncols,
        }
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        for r in self.rows.iter_mut() {
            r.fill(value);
        }
    }

    /// Copy of row `i`.
    pub fn row(&self, i: usize) -> Result<Vector<T>, LinalgError> {
        self.row_ref(i).cloned()
    }

    /// Copy of column `j`.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
    /// assert_eq!(m.col(1).unwrap().as_slice(), &[2.0, 4.0]);
    /// assert!(m.col(2).is_err());
    /// ```
    pub fn col(&self, j: usize) -> Result<Vector<T>, LinalgError> {
        if j >= self.ncols {
            return Err(LinalgError::IndexOutOfRange {
                index: j,
                len: self.ncols,
            });
        }
        Ok(self.rows.iter().map(|r| r[j]).collect())
    }

    /// Add a row at the bottom.
    ///
    /// The first row added to a matrix without rows defines its width.
    pub fn append_row(&mut self, v: &Vector<T>) -> Result<(), LinalgError> {
        self.insert_row(self.nrows(), v)
    }

    /// Add a column on the right.
    pub fn append_col(&mut self, v: &Vector<T>) -> Result<(), LinalgError> {
        self.insert_col(self.ncols, v)
    }

    /// Insert `v` so that it becomes row `i`.
    ///
    /// ```
    /// use numkern::{Matrix, Vector};
    /// let mut m = Matrix::new([[1.0_f64, 2.0], [5.0, 6.0]]);
    /// m.insert_row(1, &Vector::from_slice(&[3.0, 4.0])).unwrap();
    /// assert_eq!(m.size(), (3, 2));
    /// assert_eq!(m[(1, 1)], 4.0);
    /// assert!(m.insert_row(0, &Vector::from_slice(&[1.0])).is_err());
    /// ```
    pub fn insert_row(&mut self, i: usize, v: &Vector<T>) -> Result<(), LinalgError> {
        if i > self.nrows() {
            return Err(LinalgError::IndexOutOfRange {
                index: i,
                len: self.nrows(),
            });
        }
        if self.nrows() == 0 {
            self.ncols = v.len();
        } else if v.len() != self.ncols {
            return Err(LinalgError::DimensionMismatch {
                expected: (1, self.ncols),
                got: (1, v.len()),
            });
        }
        self.rows.insert(i, v.clone());
        Ok(())
    }

    /// Insert `v` so that it becomes column `j`.
    ///
    /// A matrix without rows grows one single-element row per entry of `v`.
    pub fn insert_col(&mut self, j: usize, v: &Vector<T>) -> Result<(), LinalgError> {
        if self.nrows() == 0 {
            if j != 0 {
                return Err(LinalgError::IndexOutOfRange { index: j, len: 0 });
            }
            self.rows = v.iter().map(|&x| Vector::from_vec(alloc::vec![x])).collect();
            self.ncols = 1;
            return Ok(());
        }
        if j > self.ncols {
            return Err(LinalgError::IndexOutOfRange {
                index: j,
                len: self.ncols,
            });
        }
        if v.len() != self.nrows() {
            return Err(LinalgError::DimensionMismatch {
                expected: (self.nrows(), 1),
                got: (v.len(), 1),
            });
        }
        for (r, &x) in self.rows.iter_mut().zip(v.iter()) {
            r.data.insert(j, x);
        }
        self.ncols += 1;
        Ok(())
    }

    /// Start row, start column and length of diagonal `k`.
    ///
    /// `k = 0` is the main diagonal, `k > 0` lies above it, `k < 0` below.
    fn diagonal_span(&self, k: isize) -> Result<(usize, usize, usize), LinalgError> {
        let off = k.unsigned_abs();
        let (r0, c0) = if k >= 0 { (0, off) } else { (off, 0) };
        if k > 0 && c0 >= self.ncols {
            return Err(LinalgError::IndexOutOfRange {
                index: c0,
                len: self.ncols,
            });
        }
        if k < 0 && r0 >= self.nrows() {
            return Err(LinalgError::IndexOutOfRange {
                index: r0,
                len: self.nrows(),
            });
        }
        let len = (self.nrows() - r0).min(self.ncols - c0);
        Ok((r0, c0, len))
    }

    /// Copy of diagonal `k`.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::new([[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    /// assert_eq!(m.diagonal(0).unwrap().as_slice(), &[1.0, 5.0]);
    /// assert_eq!(m.diagonal(1).unwrap().as_slice(), &[2.0, 6.0]);
    /// assert_eq!(m.diagonal(-1).unwrap().as_slice(), &[4.0]);
    /// assert!(m.diagonal(3).is_err());
    /// ```
    pub fn diagonal(&self, k: isize) -> Result<Vector<T>, LinalgError> {
        let (r0, c0, len) = self.diagonal_span(k)?;
        Ok((0..len).map(|t| self.rows[r0 + t][c0 + t]).collect())
    }

    /// Set every element of diagonal `k` to `value`.
    pub fn fill_diagonal(&mut self, value: T, k: isize) -> Result<(), LinalgError> {
        let (r0, c0, len) = self.diagonal_span(k)?;
        for t in 0..len {
            self.rows[r0 + t][c0 + t] = value;
        }
        Ok(())
    }

    /// Copy `v` onto diagonal `k`; `v` must match the diagonal's length.
    pub fn fill_diagonal_with(&mut self, v: &Vector<T>, k: isize) -> Result<(), LinalgError> {
        let (r0, c0, len) = self.diagonal_span(k)?;
        if v.len() != len {
            return Err(LinalgError::DimensionMismatch {
                expected: (len, 1),
                got: (v.len(), 1),
            });
        }
        for (t, &x) in v.iter().enumerate() {
            self.rows[r0 + t][c0 + t] = x;
        }
        Ok(())
    }
}

impl<T: Scalar> Matrix<T> {
    /// All-zero `nrows × ncols` matrix.
    ///
    /// ```
    /// use numkern::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3);
    /// assert_eq!(m.size(), (2, 3));
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, T::zero())
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// Square matrix with `d` on the main diagonal.
    pub fn from_diagonal(d: &Vector<T>) -> Self {
        let n = d.len();
        Self::from_fn(n, n, |i, j| if i == j { d[i] } else { T::zero() })
    }

    /// Elementwise complex conjugate (no transpose).
    pub fn conjugated(&self) -> Self {
        self.map(Scalar::conj)
    }

    /// Conjugate every element in place.
    pub fn conjugate(&mut self) {
        for r in self.rows.iter_mut() {
            for x in r.iter_mut() {
                *x = x.conj();
            }
        }
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.rows[i][j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.rows[i][j]
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for Matrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.rows[row][col]
    }
}

impl<T> MatrixMut<T> for Matrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.rows[row][col]
    }

    fn swap_rows(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        self.rows.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    #[test]
    fn new_and_index() {
        let m = Matrix::new([[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(m.size(), (2, 3));
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let m = Matrix::<f64>::zeros(2, 2);
        let _ = m[(0, 2)];
    }

    #[test]
    fn checked_get() {
        let m = Matrix::<f64>::zeros(2, 3);
        assert!(m.get(1, 2).is_ok());
        assert_eq!(
            m.get(2, 0),
            Err(LinalgError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            m.get(0, 3),
            Err(LinalgError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![
            Vector::from_slice(&[1.0_f64, 2.0]),
            Vector::from_slice(&[3.0_f64]),
        ];
        assert!(matches!(
            Matrix::from_rows(rows),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn row_and_col_are_copies() {
        let mut m = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
        let mut r = m.row(0).unwrap();
        r[0] = 100.0;
        assert_eq!(m[(0, 0)], 1.0);
        m[(1, 1)] = -4.0;
        assert_eq!(m.col(1).unwrap().as_slice(), &[2.0, -4.0]);
    }

    #[test]
    fn row_mut_writes_through() {
        let mut m = Matrix::<f64>::zeros(2, 2);
        m.row_mut(1).unwrap()[0] = 7.0;
        assert_eq!(m[(1, 0)], 7.0);
        assert!(m.row_mut(2).is_err());
    }

    #[test]
    fn fill_diagonal_offsets() {
        let mut m = Matrix::<f64>::zeros(3, 3);
        m.fill_diagonal(1.0, 0).unwrap();
        m.fill_diagonal(2.0, 1).unwrap();
        m.fill_diagonal(-1.0, -2).unwrap();
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(1, 2)], 2.0);
        assert_eq!(m[(2, 0)], -1.0);
        assert!(m.fill_diagonal(0.0, 3).is_err());
        assert!(m.fill_diagonal(0.0, -3).is_err());
    }

    #[test]
    fn fill_diagonal_with_checks_length() {
        let mut m = Matrix::<f64>::zeros(2, 3);
        let v = Vector::from_slice(&[5.0, 6.0]);
        m.fill_diagonal_with(&v, 1).unwrap();
        assert_eq!(m[(0, 1)], 5.0);
        assert_eq!(m[(1, 2)], 6.0);
        let before = m.clone();
        assert!(m.fill_diagonal_with(&Vector::from_slice(&[1.0]), 0).is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn append_to_empty_defines_width() {
        let mut m = Matrix::<f64>::default();
        m.append_row(&Vector::from_slice(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(m.size(), (1, 3));
        assert!(m.append_row(&Vector::from_slice(&[1.0])).is_err());
        assert_eq!(m.size(), (1, 3));

        let mut c = Matrix::<f64>::default();
        c.append_col(&Vector::from_slice(&[1.0, 2.0])).unwrap();
        assert_eq!(c.size(), (2, 1));
        c.append_col(&Vector::from_slice(&[3.0, 4.0])).unwrap();
        assert_eq!(c.row(1).unwrap().as_slice(), &[2.0, 4.0]);
    }

    #[test]
    fn insert_col_middle() {
        let mut m = Matrix::new([[1.0_f64, 3.0], [4.0, 6.0]]);
        m.insert_col(1, &Vector::from_slice(&[2.0, 5.0])).unwrap();
        assert_eq!(m, Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
        assert!(m.insert_col(5, &Vector::from_slice(&[0.0, 0.0])).is_err());
        assert!(m.insert_col(0, &Vector::from_slice(&[0.0])).is_err());
    }

    #[test]
    fn identity_and_from_diagonal() {
        let d = Matrix::from_diagonal(&Vector::from_slice(&[2.0_f64, 3.0]));
        assert_eq!(d, Matrix::new([[2.0, 0.0], [0.0, 3.0]]));
        assert_eq!(Matrix::<f64>::identity(2).diagonal(0).unwrap().sum(), 2.0);
    }

    #[test]
    fn conjugate_elementwise() {
        let mut m = Matrix::new([[Complex::new(1.0_f64, 1.0), Complex::new(0.0, -2.0)]]);
        let c = m.conjugated();
        m.conjugate();
        assert_eq!(m, c);
        assert_eq!(m[(0, 1)], Complex::new(0.0, 2.0));
    }

    #[test]
    fn swap_rows_checked() {
        let mut m = Matrix::new([[1.0_f64], [2.0]]);
        m.swap_rows(0, 1).unwrap();
        assert_eq!(m[(0, 0)], 2.0);
        assert!(m.swap_rows(0, 2).is_err());
    }
}
