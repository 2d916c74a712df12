//! Vector operators.
//!
//! Every binary operator is written once against [`Vector::zip_map`] /
//! [`Vector::map`] and instantiated for all owned/borrowed operand
//! combinations. Vector ⊗ vector is elementwise; vector ⊗ scalar broadcasts.
//! Mixed element types produce a [`Promoted`] result.
//!
//! ```
//! use numkern::{Complex, Vector};
//!
//! let a = Vector::from_slice(&[1.0_f32, 2.0]);
//! let b = Vector::from_slice(&[0.5_f64, 0.5]);
//! let c = &a + &b; // Vector<f64>
//! assert_eq!(c.as_slice(), &[1.5, 2.5]);
//!
//! let z = &a * Complex::new(0.0_f64, 1.0); // Vector<Complex<f64>>
//! assert_eq!(z[1], Complex::new(0.0, 2.0));
//! ```

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::complex::Complex;
use crate::linalg::LinalgError;
use crate::traits::{lift, Dot, Promote, Promoted, Scalar};

use super::Vector;

impl<T: Copy> Vector<T> {
    /// Combine two equal-length vectors elementwise.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn zip_map<U: Copy, O>(&self, rhs: &Vector<U>, mut f: impl FnMut(T, U) -> O) -> Vector<O> {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dimension mismatch: vector of length {} with vector of length {}",
            self.len(),
            rhs.len()
        );
        Vector {
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for Vector<T> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for x in self.data.iter_mut() {
            *x = -*x;
        }
        self
    }
}

impl<T: Scalar> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        self.map(|x| -x)
    }
}

// ── Vector ⊗ Vector (elementwise) ───────────────────────────────────

macro_rules! impl_vec_vec_binop {
    ($($Trait:ident, $method:ident, $op:tt;)*) => {
        $(
            impl<'a, 'b, T, U> $Trait<&'b Vector<U>> for &'a Vector<T>
            where
                T: Scalar + Promote<U>,
                U: Scalar,
            {
                type Output = Vector<Promoted<T, U>>;

                fn $method(self, rhs: &'b Vector<U>) -> Self::Output {
                    self.zip_map(rhs, |a, b| {
                        let (a, b) = lift(a, b);
                        a $op b
                    })
                }
            }

            impl<T, U> $Trait<Vector<U>> for Vector<T>
            where
                T: Scalar + Promote<U>,
                U: Scalar,
            {
                type Output = Vector<Promoted<T, U>>;

                fn $method(self, rhs: Vector<U>) -> Self::Output {
                    (&self).$method(&rhs)
                }
            }

            impl<'b, T, U> $Trait<&'b Vector<U>> for Vector<T>
            where
                T: Scalar + Promote<U>,
                U: Scalar,
            {
                type Output = Vector<Promoted<T, U>>;

                fn $method(self, rhs: &'b Vector<U>) -> Self::Output {
                    (&self).$method(rhs)
                }
            }

            impl<'a, T, U> $Trait<Vector<U>> for &'a Vector<T>
            where
                T: Scalar + Promote<U>,
                U: Scalar,
            {
                type Output = Vector<Promoted<T, U>>;

                fn $method(self, rhs: Vector<U>) -> Self::Output {
                    self.$method(&rhs)
                }
            }
        )*
    };
}

impl_vec_vec_binop! {
    Add, add, +;
    Sub, sub, -;
    Mul, mul, *;
    Div, div, /;
}

macro_rules! impl_vec_vec_assign {
    ($($Trait:ident, $method:ident, $op:tt;)*) => {
        $(
            impl<'b, T, U> $Trait<&'b Vector<U>> for Vector<T>
            where
                T: Scalar + Promote<U, Output = T>,
                U: Scalar,
            {
                fn $method(&mut self, rhs: &'b Vector<U>) {
                    assert_eq!(
                        self.len(),
                        rhs.len(),
                        "dimension mismatch: vector of length {} with vector of length {}",
                        self.len(),
                        rhs.len()
                    );
                    for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
                        *a $op <T as Promote<U>>::promote_rhs(b);
                    }
                }
            }

            impl<T, U> $Trait<Vector<U>> for Vector<T>
            where
                T: Scalar + Promote<U, Output = T>,
                U: Scalar,
            {
                fn $method(&mut self, rhs: Vector<U>) {
                    self.$method(&rhs);
                }
            }
        )*
    };
}

impl_vec_vec_assign! {
    AddAssign, add_assign, +=;
    SubAssign, sub_assign, -=;
    MulAssign, mul_assign, *=;
    DivAssign, div_assign, /=;
}

// ── Vector ⊗ scalar and scalar ⊗ vector (broadcast) ─────────────────

macro_rules! impl_vec_scalar {
    (@ops $s:ty; $($Trait:ident, $method:ident, $op:tt, $ATrait:ident, $amethod:ident, $aop:tt;)*) => {
        $(
            impl<'a, T> $Trait<$s> for &'a Vector<T>
            where
                T: Scalar + Promote<$s>,
            {
                type Output = Vector<Promoted<T, $s>>;

                fn $method(self, rhs: $s) -> Self::Output {
                    self.map(|x| {
                        let (a, b) = lift(x, rhs);
                        a $op b
                    })
                }
            }

            impl<T> $Trait<$s> for Vector<T>
            where
                T: Scalar + Promote<$s>,
            {
                type Output = Vector<Promoted<T, $s>>;

                fn $method(self, rhs: $s) -> Self::Output {
                    (&self).$method(rhs)
                }
            }

            impl<'a, T> $Trait<&'a Vector<T>> for $s
            where
                T: Scalar,
                $s: Promote<T>,
            {
                type Output = Vector<Promoted<$s, T>>;

                fn $method(self, rhs: &'a Vector<T>) -> Self::Output {
                    rhs.map(|x| {
                        let (a, b) = lift(self, x);
                        a $op b
                    })
                }
            }

            impl<T> $Trait<Vector<T>> for $s
            where
                T: Scalar,
                $s: Promote<T>,
            {
                type Output = Vector<Promoted<$s, T>>;

                fn $method(self, rhs: Vector<T>) -> Self::Output {
                    self.$method(&rhs)
                }
            }

            impl<T> $ATrait<$s> for Vector<T>
            where
                T: Scalar + Promote<$s, Output = T>,
            {
                fn $amethod(&mut self, rhs: $s) {
                    let b = <T as Promote<$s>>::promote_rhs(rhs);
                    for a in self.data.iter_mut() {
                        *a $aop b;
                    }
                }
            }
        )*
    };
    ($($s:ty),*) => {
        $(
            impl_vec_scalar!(@ops $s;
                Add, add, +, AddAssign, add_assign, +=;
                Sub, sub, -, SubAssign, sub_assign, -=;
                Mul, mul, *, MulAssign, mul_assign, *=;
                Div, div, /, DivAssign, div_assign, /=;
            );
        )*
    };
}

impl_vec_scalar!(f32, f64, Complex<f32>, Complex<f64>);

// ── Inner product ───────────────────────────────────────────────────

impl<T, U> Dot<Vector<U>> for Vector<T>
where
    T: Scalar + Promote<U>,
    U: Scalar,
{
    type Output = Promoted<T, U>;

    /// Hermitian inner product `Σ selfᵢ · conj(rhsᵢ)`.
    ///
    /// ```
    /// use numkern::{Complex, Dot, Vector};
    ///
    /// let a = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
    /// let b = Vector::from_slice(&[4.0_f32, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b).unwrap(), 32.0);
    ///
    /// let z = Vector::from_slice(&[Complex::new(0.0_f64, 1.0)]);
    /// assert_eq!(z.dot(&z).unwrap(), Complex::new(1.0, 0.0));
    /// ```
    fn dot(&self, rhs: &Vector<U>) -> Result<Self::Output, LinalgError> {
        if self.len() != rhs.len() {
            return Err(LinalgError::DimensionMismatch {
                expected: (self.len(), 1),
                got: (rhs.len(), 1),
            });
        }
        let mut sum = <Promoted<T, U> as num_traits::Zero>::zero();
        for (&a, &b) in self.data.iter().zip(rhs.data.iter()) {
            let (a, b) = lift(a, b);
            sum += a * b.conj();
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_same_type() {
        let a = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0_f64, 5.0, 6.0]);
        assert_eq!((&a + &b).as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!((&b - &a).as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!((a.clone() * b.clone()).as_slice(), &[4.0, 10.0, 18.0]);
        assert_eq!((b / a).as_slice(), &[4.0, 2.5, 2.0]);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn length_mismatch_panics() {
        let a = Vector::from_slice(&[1.0_f64, 2.0]);
        let b = Vector::from_slice(&[1.0_f64]);
        let _ = &a + &b;
    }

    #[test]
    fn narrow_vector_wide_scalar_promotes() {
        let a = Vector::from_slice(&[1.0_f32, 2.0]);
        let c: Vector<f64> = &a * 2.0_f64;
        assert_eq!(c.as_slice(), &[2.0, 4.0]);
        let d: Vector<f64> = 1.0_f64 - &a;
        assert_eq!(d.as_slice(), &[0.0, -1.0]);
    }

    #[test]
    fn real_vector_complex_scalar_promotes() {
        let a = Vector::from_slice(&[1.0_f64, -1.0]);
        let z: Vector<Complex<f64>> = a + Complex::new(0.0_f32, 1.0);
        assert_eq!(z[0], Complex::new(1.0, 1.0));
        assert_eq!(z[1], Complex::new(-1.0, 1.0));
    }

    #[test]
    fn compound_assign_narrower_rhs() {
        let mut a = Vector::from_slice(&[Complex::new(1.0_f64, 0.0)]);
        a += &Vector::from_slice(&[2.0_f32]);
        a *= 2.0_f64;
        assert_eq!(a[0], Complex::new(6.0, 0.0));
    }

    #[test]
    fn negation() {
        let a = Vector::from_slice(&[1.0_f64, -2.0]);
        assert_eq!((-&a).as_slice(), &[-1.0, 2.0]);
        assert_eq!((-a).as_slice(), &[-1.0, 2.0]);
    }

    #[test]
    fn dot_is_hermitian() {
        let a = Vector::from_slice(&[Complex::new(1.0_f64, 2.0), Complex::new(-1.0, 0.5)]);
        let b = Vector::from_slice(&[Complex::new(0.0_f64, 1.0), Complex::new(3.0, -2.0)]);
        let ab = a.dot(&b).unwrap();
        let ba = b.dot(&a).unwrap();
        assert_eq!(ab, ba.conjugated());
    }

    #[test]
    fn dot_length_mismatch() {
        let a = Vector::from_slice(&[1.0_f64, 2.0]);
        let b = Vector::from_slice(&[1.0_f64]);
        assert_eq!(
            a.dot(&b),
            Err(LinalgError::DimensionMismatch {
                expected: (2, 1),
                got: (1, 1)
            })
        );
    }
}
