mod norm;
mod ops;

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use num_traits::NumCast;

use crate::linalg::LinalgError;
use crate::traits::{FloatScalar, Promote, Promoted, Scalar};

/// Heap-allocated vector with a length fixed at construction.
///
/// Elements are any [`Scalar`]: `f32`, `f64`, `Complex<f32>`, `Complex<f64>`.
/// Arithmetic between vectors of different element types produces a vector
/// of the [`Promoted`] type.
///
/// # Examples
///
/// ```
/// use numkern::Vector;
///
/// let v = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.sum(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T> {
    pub(crate) data: Vec<T>,
}

impl<T> Vector<T> {
    /// Take ownership of a `Vec`.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::from_vec(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v[2], 3.0);
    /// ```
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Checked element access.
    #[inline]
    pub fn get(&self, i: usize) -> Result<&T, LinalgError> {
        let len = self.len();
        self.data
            .get(i)
            .ok_or(LinalgError::IndexOutOfRange { index: i, len })
    }

    /// Checked mutable element access.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Result<&mut T, LinalgError> {
        let len = self.len();
        self.data
            .get_mut(i)
            .ok_or(LinalgError::IndexOutOfRange { index: i, len })
    }

    /// Consume the vector and return its storage.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> Vector<T> {
    /// Copy from a slice.
    #[inline]
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Vector of length `n` with every element set to `value`.
    #[inline]
    pub fn filled(n: usize, value: T) -> Self {
        Self {
            data: alloc::vec![value; n],
        }
    }

    /// Overwrite every element with `value`.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Build element-by-element from an index function.
    pub fn from_fn(n: usize, f: impl FnMut(usize) -> T) -> Self {
        Self {
            data: (0..n).map(f).collect(),
        }
    }

    /// Apply `f` to every element, producing a new vector.
    #[inline]
    pub fn map<O>(&self, f: impl FnMut(T) -> O) -> Vector<O> {
        Vector {
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Strided copy of the half-open range `[begin, end)`.
    ///
    /// Fails with [`LinalgError::DegenerateSlice`] for `step == 0` or
    /// `begin >= end`, and with [`LinalgError::IndexOutOfRange`] for
    /// `end > len`.
    ///
    /// ```
    /// use numkern::Vector;
    ///
    /// let v = Vector::from_slice(&[0.0_f64, 1.0, 2.0, 3.0, 4.0]);
    /// let s = v.slice(1, 5, 2).unwrap();
    /// assert_eq!(s.as_slice(), &[1.0, 3.0]);
    /// assert!(v.slice(3, 3, 1).is_err());
    /// ```
    pub fn slice(&self, begin: usize, end: usize, step: usize) -> Result<Self, LinalgError> {
        check_range(begin, end, step, self.len())?;
        Ok(Self {
            data: self.data[begin..end].iter().step_by(step).copied().collect(),
        })
    }

    /// Reverse the element order in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.data.reverse();
    }
}

/// Validate a strided half-open range against a container length.
/// `k` as a float; exact up to the mantissa width, rounded beyond it.
fn index_to_real<T: FloatScalar>(k: usize) -> T {
    NumCast::from(k).unwrap_or_else(T::infinity)
}

pub(crate) fn check_range(
    begin: usize,
    end: usize,
    step: usize,
    len: usize,
) -> Result<(), LinalgError> {
    if step == 0 || begin >= end {
        return Err(LinalgError::DegenerateSlice);
    }
    if end > len {
        return Err(LinalgError::IndexOutOfRange { index: end, len });
    }
    Ok(())
}

impl<T: Scalar> Vector<T> {
    /// Zero vector of length `n`.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::<f64>::zeros(4);
    /// assert_eq!(v.len(), 4);
    /// assert_eq!(v[3], 0.0);
    /// ```
    #[inline]
    pub fn zeros(n: usize) -> Self {
        Self::filled(n, T::zero())
    }

    /// Standard basis vector `e_i` of length `n`.
    pub fn basis(n: usize, i: usize) -> Result<Self, LinalgError> {
        let mut v = Self::zeros(n);
        *v.get_mut(i)? = T::one();
        Ok(v)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Elementwise complex conjugate.
    pub fn conj(&self) -> Self {
        self.map(Scalar::conj)
    }

    /// Convert every element to a wider type.
    ///
    /// ```
    /// use numkern::{Complex, Vector};
    /// let v = Vector::from_slice(&[1.0_f32, 2.0]);
    /// let z: Vector<Complex<f64>> = v.promote();
    /// assert_eq!(z[1], Complex::new(2.0, 0.0));
    /// ```
    pub fn promote<U>(&self) -> Vector<U>
    where
        T: Promote<U, Output = U>,
        U: Scalar,
    {
        self.map(|x| <T as Promote<U>>::promote(x))
    }

    /// Cross product of two length-3 vectors.
    ///
    /// ```
    /// use numkern::Vector;
    /// let x = Vector::from_slice(&[1.0_f64, 0.0, 0.0]);
    /// let y = Vector::from_slice(&[0.0_f64, 1.0, 0.0]);
    /// assert_eq!(x.cross(&y).unwrap().as_slice(), &[0.0, 0.0, 1.0]);
    /// ```
    pub fn cross<U>(&self, rhs: &Vector<U>) -> Result<Vector<Promoted<T, U>>, LinalgError>
    where
        T: Promote<U>,
        U: Scalar,
    {
        for len in [self.len(), rhs.len()] {
            if len != 3 {
                return Err(LinalgError::DimensionMismatch {
                    expected: (3, 1),
                    got: (len, 1),
                });
            }
        }
        let a = self.map(|x| <T as Promote<U>>::promote(x));
        let b = rhs.map(|y| <T as Promote<U>>::promote_rhs(y));
        Ok(Vector::from_vec(alloc::vec![
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]))
    }
}

// ── Ordering (real elements only) ───────────────────────────────────

/// Index of the first element that wins every comparison under `better`.
fn arg_best<T: FloatScalar>(data: &[T], better: impl Fn(T, T) -> bool) -> Option<usize> {
    let mut it = data.iter().enumerate();
    let (mut best_i, mut best) = it.next().map(|(i, &x)| (i, x))?;
    for (i, &x) in it {
        if better(x, best) {
            best_i = i;
            best = x;
        }
    }
    Some(best_i)
}

impl<T: FloatScalar> Vector<T> {
    /// `n` evenly spaced points from `a` to `b`, both included.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::linspace(0.0_f64, 1.0, 5);
    /// assert_eq!(v.as_slice(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    /// ```
    pub fn linspace(a: T, b: T, n: usize) -> Self {
        match n {
            0 => Self::zeros(0),
            1 => Self::filled(1, a),
            _ => {
                let h = (b - a) / index_to_real::<T>(n - 1);
                let mut data: Vec<T> = (0..n - 1).map(|k| a + h * index_to_real::<T>(k)).collect();
                data.push(b);
                Self { data }
            }
        }
    }

    /// Points `begin, begin + step, ...` strictly below `end`.
    ///
    /// Fails with [`LinalgError::DegenerateSlice`] unless every argument is
    /// finite, `step > 0`, `begin < end`, and the point count fits in `usize`.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::arange(0.0_f64, 1.0, 0.25).unwrap();
    /// assert_eq!(v.as_slice(), &[0.0, 0.25, 0.5, 0.75]);
    /// assert!(Vector::arange(0.0_f64, f64::INFINITY, 1.0).is_err());
    /// ```
    pub fn arange(begin: T, end: T, step: T) -> Result<Self, LinalgError> {
        if !(begin.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(LinalgError::DegenerateSlice);
        }
        if !(step > T::zero()) || !(begin < end) {
            return Err(LinalgError::DegenerateSlice);
        }
        let count: usize = NumCast::from(((end - begin) / step).ceil())
            .ok_or(LinalgError::DegenerateSlice)?;
        let data = (0..count)
            .map(|k| begin + step * index_to_real::<T>(k))
            .take_while(|&x| x < end)
            .collect();
        Ok(Self { data })
    }

    /// Sort in place, ascending or descending.
    ///
    /// NaN compares equal to everything, so its position is unspecified.
    pub fn sort(&mut self, ascending: bool) {
        self.data.sort_by(|a, b| {
            let ord = a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }

    /// Sorted copy.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::from_slice(&[3.0_f64, 1.0, 2.0]);
    /// assert_eq!(v.sorted(true).as_slice(), &[1.0, 2.0, 3.0]);
    /// assert_eq!(v.sorted(false).as_slice(), &[3.0, 2.0, 1.0]);
    /// ```
    pub fn sorted(&self, ascending: bool) -> Self {
        let mut out = self.clone();
        out.sort(ascending);
        out
    }

    /// Index of the largest element; the first one wins ties.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::from_slice(&[1.0_f64, 5.0, 5.0, -2.0]);
    /// assert_eq!(v.argmax(), Some(1));
    /// assert_eq!(v.argmin(), Some(3));
    /// assert_eq!(Vector::<f64>::zeros(0).argmax(), None);
    /// ```
    pub fn argmax(&self) -> Option<usize> {
        arg_best(&self.data, |x, best| x > best)
    }

    /// Index of the smallest element; the first one wins ties.
    pub fn argmin(&self) -> Option<usize> {
        arg_best(&self.data, |x, best| x < best)
    }

    /// `(argmin, argmax)`.
    pub fn argminmax(&self) -> Option<(usize, usize)> {
        Some((self.argmin()?, self.argmax()?))
    }

    pub fn max(&self) -> Option<T> {
        self.argmax().map(|i| self.data[i])
    }

    pub fn min(&self) -> Option<T> {
        self.argmin().map(|i| self.data[i])
    }

    /// `(min, max)`.
    pub fn minmax(&self) -> Option<(T, T)> {
        Some((self.min()?, self.max()?))
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Copy, const N: usize> From<[T; N]> for Vector<T> {
    fn from(a: [T; N]) -> Self {
        Self { data: a.to_vec() }
    }
}

impl<T> From<Vector<T>> for Vec<T> {
    fn from(v: Vector<T>) -> Self {
        v.data
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
