//! Matrix operators and products.
//!
//! `+` and `-` between matrices are elementwise; `*` between matrices, or
//! between a matrix and a vector, is the matrix product. Scalars broadcast
//! over every element in either operand position. All of them panic on a
//! shape mismatch; the [`Dot`] forms report it as an error instead.

use alloc::vec::Vec;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::complex::Complex;
use crate::linalg::LinalgError;
use crate::traits::{lift, Dot, Promote, Promoted, Scalar};
use crate::vector::Vector;

use super::Matrix;

// ── Product kernels ─────────────────────────────────────────────────

fn check_inner(lhs: (usize, usize), rhs: (usize, usize)) -> Result<(), LinalgError> {
    if lhs.1 != rhs.0 {
        return Err(LinalgError::DimensionMismatch {
            expected: (lhs.1, rhs.1),
            got: rhs,
        });
    }
    Ok(())
}

fn matmul<T, U>(a: &Matrix<T>, b: &Matrix<U>) -> Matrix<Promoted<T, U>>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    let (m, k) = a.size();
    let n = b.ncols();
    let mut out = Matrix::zeros(m, n);
    for i in 0..m {
        let out_row = &mut out.rows[i];
        for p in 0..k {
            let aip = a.rows[i][p];
            let brow = &b.rows[p];
            for j in 0..n {
                let (x, y) = lift(aip, brow[j]);
                out_row[j] += x * y;
            }
        }
    }
    out
}

fn matvec<T, U>(a: &Matrix<T>, v: &Vector<U>) -> Vector<Promoted<T, U>>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    a.rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(v.iter())
                .fold(<Promoted<T, U> as num_traits::Zero>::zero(), |acc, (&x, &y)| {
                    let (x, y) = lift(x, y);
                    acc + x * y
                })
        })
        .collect()
}

fn vecmat<T, U>(v: &Vector<T>, b: &Matrix<U>) -> Vector<Promoted<T, U>>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    let mut out: Vec<Promoted<T, U>> = alloc::vec![num_traits::Zero::zero(); b.ncols()];
    for (&vi, row) in v.iter().zip(b.rows.iter()) {
        for (o, &bij) in out.iter_mut().zip(row.iter()) {
            let (x, y) = lift(vi, bij);
            *o += x * y;
        }
    }
    Vector::from_vec(out)
}

impl<T, U> Dot<Matrix<U>> for Matrix<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Matrix<Promoted<T, U>>;

    /// Matrix product.
    ///
    /// ```
    /// use numkern::{Dot, Matrix};
    /// let a = Matrix::new([[1.0_f64, 2.0], [3.0, 4.0]]);
    /// let b = Matrix::new([[5.0_f32, 6.0], [7.0, 8.0]]);
    /// let c = a.dot(&b).unwrap();
    /// assert_eq!(c, Matrix::new([[19.0, 22.0], [43.0, 50.0]]));
    /// assert!(a.dot(&Matrix::<f64>::zeros(3, 1)).is_err());
    /// ```
    fn dot(&self, rhs: &Matrix<U>) -> Result<Self::Output, LinalgError> {
        check_inner(self.size(), rhs.size())?;
        Ok(matmul(self, rhs))
    }
}

impl<T, U> Dot<Vector<U>> for Matrix<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Vector<Promoted<T, U>>;

    fn dot(&self, rhs: &Vector<U>) -> Result<Self::Output, LinalgError> {
        check_inner(self.size(), (rhs.len(), 1))?;
        Ok(matvec(self, rhs))
    }
}

impl<T, U> Dot<Matrix<U>> for Vector<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Vector<Promoted<T, U>>;

    /// Row-vector times matrix, `vᵀ·B`.
    fn dot(&self, rhs: &Matrix<U>) -> Result<Self::Output, LinalgError> {
        check_inner((1, self.len()), rhs.size())?;
        Ok(vecmat(self, rhs))
    }
}

impl<T: Scalar> Matrix<T> {
    /// Product of a chain of matrices, evaluated left to right.
    ///
    /// An empty chain has no defined shape and is rejected. For factors of
    /// different element types use [`multidot!`](crate::multidot), which
    /// promotes at each step.
    pub fn multidot(chain: &[&Matrix<T>]) -> Result<Matrix<T>, LinalgError>
    where
        T: Promote<T, Output = T>,
    {
        let (first, rest) = chain.split_first().ok_or(LinalgError::DimensionMismatch {
            expected: (1, 1),
            got: (0, 0),
        })?;
        rest.iter().try_fold((*first).clone(), |acc, m| acc.dot(*m))
    }
}

/// Chained product of matrices (and a trailing vector) whose element types
/// may differ, evaluated left to right through [`Dot`](crate::Dot) so each
/// step promotes. Arguments are borrowed, not moved. Evaluates to
/// `Result<_, LinalgError>`.
///
/// ```
/// use numkern::{multidot, Complex, Matrix};
///
/// let a = Matrix::new([[1.0_f32, 1.0], [0.0, 1.0]]);
/// let b = Matrix::new([[2.0_f64, 0.0], [0.0, 2.0]]);
/// let c = Matrix::new([[Complex::new(0.0_f32, 1.0)], [Complex::new(1.0, 0.0)]]);
/// let p: Matrix<Complex<f64>> = multidot!(a, b, c).unwrap();
/// assert_eq!(p[(0, 0)], Complex::new(2.0, 2.0));
/// assert!(multidot!(a, c, b).is_err());
/// ```
#[macro_export]
macro_rules! multidot {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let acc: ::core::result::Result<_, $crate::LinalgError> =
            ::core::result::Result::Ok(::core::clone::Clone::clone(&$first));
        $(
            let acc = acc.and_then(|m| $crate::Dot::dot(&m, &$rest));
        )+
        acc
    }};
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Self;

    fn neg(self) -> Self {
        (&self).neg()
    }
}

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.map(|x| -x)
    }
}

// ── Binary operator plumbing ────────────────────────────────────────

/// Derive the owned-operand forms of a binary operator from the
/// reference-reference form.
macro_rules! forward_owned {
    ($Trait:ident, $method:ident, [$($gen:tt)*], $Lhs:ty, $Rhs:ty, $Out:ty, where $($bounds:tt)*) => {
        impl<$($gen)*> $Trait<$Rhs> for $Lhs
        where
            $($bounds)*
        {
            type Output = $Out;

            fn $method(self, rhs: $Rhs) -> $Out {
                (&self).$method(&rhs)
            }
        }

        impl<'r, $($gen)*> $Trait<&'r $Rhs> for $Lhs
        where
            $($bounds)*
        {
            type Output = $Out;

            fn $method(self, rhs: &'r $Rhs) -> $Out {
                (&self).$method(rhs)
            }
        }

        impl<'l, $($gen)*> $Trait<$Rhs> for &'l $Lhs
        where
            $($bounds)*
        {
            type Output = $Out;

            fn $method(self, rhs: $Rhs) -> $Out {
                self.$method(&rhs)
            }
        }
    };
}

// ── Matrix ± Matrix (elementwise) ───────────────────────────────────

macro_rules! impl_mat_mat_elementwise {
    ($($Trait:ident, $method:ident, $op:tt, $ATrait:ident, $amethod:ident, $aop:tt;)*) => {
        $(
            impl<'l, 'r, T, U> $Trait<&'r Matrix<U>> for &'l Matrix<T>
            where
                T: Scalar + Promote<U>,
                U: Scalar,
            {
                type Output = Matrix<Promoted<T, U>>;

                fn $method(self, rhs: &'r Matrix<U>) -> Self::Output {
                    self.zip_map(rhs, |a, b| {
                        let (a, b) = lift(a, b);
                        a $op b
                    })
                }
            }

            forward_owned!($Trait, $method, [T, U], Matrix<T>, Matrix<U>, Matrix<Promoted<T, U>>,
                where T: Scalar + Promote<U>, U: Scalar);

            impl<'r, T, U> $ATrait<&'r Matrix<U>> for Matrix<T>
            where
                T: Scalar + Promote<U, Output = T>,
                U: Scalar,
            {
                fn $amethod(&mut self, rhs: &'r Matrix<U>) {
                    assert_eq!(
                        self.size(),
                        rhs.size(),
                        "dimension mismatch: {}x{} matrix with {}x{} matrix",
                        self.nrows(),
                        self.ncols(),
                        rhs.nrows(),
                        rhs.ncols()
                    );
                    for (a, b) in self.rows.iter_mut().zip(rhs.rows.iter()) {
                        *a $aop b;
                    }
                }
            }

            impl<T, U> $ATrait<Matrix<U>> for Matrix<T>
            where
                T: Scalar + Promote<U, Output = T>,
                U: Scalar,
            {
                fn $amethod(&mut self, rhs: Matrix<U>) {
                    self.$amethod(&rhs);
                }
            }
        )*
    };
}

impl_mat_mat_elementwise! {
    Add, add, +, AddAssign, add_assign, +=;
    Sub, sub, -, SubAssign, sub_assign, -=;
}

// ── Matrix products as operators ────────────────────────────────────

impl<'l, 'r, T, U> Mul<&'r Matrix<U>> for &'l Matrix<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Matrix<Promoted<T, U>>;

    fn mul(self, rhs: &'r Matrix<U>) -> Self::Output {
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows(),
            self.ncols(),
            rhs.nrows(),
            rhs.ncols()
        );
        matmul(self, rhs)
    }
}

forward_owned!(Mul, mul, [T, U], Matrix<T>, Matrix<U>, Matrix<Promoted<T, U>>,
    where T: Scalar + Promote<U>, U: Scalar);

impl<'l, 'r, T, U> Mul<&'r Vector<U>> for &'l Matrix<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Vector<Promoted<T, U>>;

    fn mul(self, rhs: &'r Vector<U>) -> Self::Output {
        assert_eq!(
            self.ncols(),
            rhs.len(),
            "dimension mismatch: {}x{} * vector of length {}",
            self.nrows(),
            self.ncols(),
            rhs.len()
        );
        matvec(self, rhs)
    }
}

forward_owned!(Mul, mul, [T, U], Matrix<T>, Vector<U>, Vector<Promoted<T, U>>,
    where T: Scalar + Promote<U>, U: Scalar);

impl<'l, 'r, T, U> Mul<&'r Matrix<U>> for &'l Vector<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Vector<Promoted<T, U>>;

    fn mul(self, rhs: &'r Matrix<U>) -> Self::Output {
        assert_eq!(
            self.len(),
            rhs.nrows(),
            "dimension mismatch: vector of length {} * {}x{}",
            self.len(),
            rhs.nrows(),
            rhs.ncols()
        );
        vecmat(self, rhs)
    }
}

forward_owned!(Mul, mul, [T, U], Vector<T>, Matrix<U>, Vector<Promoted<T, U>>,
    where T: Scalar + Promote<U>, U: Scalar);

// ── Matrix ⊗ scalar and scalar ⊗ matrix (broadcast) ─────────────────

macro_rules! impl_mat_scalar {
    (@ops $s:ty; $($Trait:ident, $method:ident, $op:tt, $ATrait:ident, $amethod:ident, $aop:tt;)*) => {
        $(
            impl<'l, T> $Trait<$s> for &'l Matrix<T>
            where
                T: Scalar + Promote<$s>,
            {
                type Output = Matrix<Promoted<T, $s>>;

                fn $method(self, rhs: $s) -> Self::Output {
                    self.map(|x| {
                        let (a, b) = lift(x, rhs);
                        a $op b
                    })
                }
            }

            impl<T> $Trait<$s> for Matrix<T>
            where
                T: Scalar + Promote<$s>,
            {
                type Output = Matrix<Promoted<T, $s>>;

                fn $method(self, rhs: $s) -> Self::Output {
                    (&self).$method(rhs)
                }
            }

            impl<'r, T> $Trait<&'r Matrix<T>> for $s
            where
                T: Scalar,
                $s: Promote<T>,
            {
                type Output = Matrix<Promoted<$s, T>>;

                fn $method(self, rhs: &'r Matrix<T>) -> Self::Output {
                    rhs.map(|x| {
                        let (a, b) = lift(self, x);
                        a $op b
                    })
                }
            }

            impl<T> $Trait<Matrix<T>> for $s
            where
                T: Scalar,
                $s: Promote<T>,
            {
                type Output = Matrix<Promoted<$s, T>>;

                fn $method(self, rhs: Matrix<T>) -> Self::Output {
                    self.$method(&rhs)
                }
            }

            impl<T> $ATrait<$s> for Matrix<T>
            where
                T: Scalar + Promote<$s, Output = T>,
            {
                fn $amethod(&mut self, rhs: $s) {
                    for row in self.rows.iter_mut() {
                        *row $aop rhs;
                    }
                }
            }
        )*
    };
    ($($s:ty),*) => {
        $(
            impl_mat_scalar!(@ops $s;
                Add, add, +, AddAssign, add_assign, +=;
                Sub, sub, -, SubAssign, sub_assign, -=;
                Mul, mul, *, MulAssign, mul_assign, *=;
                Div, div, /, DivAssign, div_assign, /=;
            );
        )*
    };
}

impl_mat_scalar!(f32, f64, Complex<f32>, Complex<f64>);
