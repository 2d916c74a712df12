use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{AsPrimitive, Float, One, Zero};

use crate::linalg::LinalgError;
use crate::traits::{Promote, Promoted};

/// Complex number with real part `re` and imaginary part `im`.
///
/// Arithmetic between `Complex<T>` values of the same width, and between a
/// `Complex<T>` and its real type `T`, is implemented for any float `T`.
/// Mixed-width operations (`Complex<f32> + Complex<f64>`, `f64 * Complex<f32>`,
/// ...) return the [`Promoted`] type.
///
/// ```
/// use numkern::Complex;
///
/// let z = Complex::new(1.0_f64, 2.0);
/// let w = Complex::new(3.0_f32, -1.0);
/// let s = z + w; // Complex<f64>
/// assert_eq!(s, Complex::new(4.0, 1.0));
/// assert_eq!(z * Complex::<f64>::i(), Complex::new(-2.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    #[inline]
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }

    /// The imaginary unit.
    #[inline]
    pub fn i() -> Self {
        Self::new(T::zero(), T::one())
    }

    /// Build from modulus and argument.
    #[inline]
    pub fn from_polar(r: T, theta: T) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(r * c, r * s)
    }

    #[inline]
    pub fn real(&self) -> T {
        self.re
    }

    #[inline]
    pub fn imag(&self) -> T {
        self.im
    }

    /// Modulus `√(re² + im²)`, computed without intermediate overflow.
    #[inline]
    pub fn abs(self) -> T {
        self.re.hypot(self.im)
    }

    /// `re² + im²`.
    #[inline]
    pub fn norm_sqr(self) -> T {
        self.re * self.re + self.im * self.im
    }

    /// Argument in `(-π, π]`.
    #[inline]
    pub fn arg(self) -> T {
        self.im.atan2(self.re)
    }

    /// Negate the imaginary part in place.
    #[inline]
    pub fn conjugate(&mut self) -> &mut Self {
        self.im = -self.im;
        self
    }

    #[inline]
    pub fn conjugated(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Replace `self` with `1/self`.
    ///
    /// Fails with [`LinalgError::DivideByZero`] when the modulus is zero;
    /// `self` is left untouched in that case.
    pub fn inverse(&mut self) -> Result<&mut Self, LinalgError> {
        *self = self.inversed()?;
        Ok(self)
    }

    /// `1/self`, or [`LinalgError::DivideByZero`] for a zero modulus.
    ///
    /// ```
    /// use numkern::Complex;
    ///
    /// let z = Complex::new(0.0_f64, 2.0).inversed().unwrap();
    /// assert_eq!(z, Complex::new(0.0, -0.5));
    /// assert!(Complex::new(0.0_f64, 0.0).inversed().is_err());
    /// ```
    pub fn inversed(self) -> Result<Self, LinalgError> {
        let d = self.norm_sqr();
        if d == T::zero() {
            return Err(LinalgError::DivideByZero);
        }
        Ok(Self::new(self.re / d, -self.im / d))
    }

    /// Convert both components to another float type.
    #[inline]
    pub fn cast<U>(self) -> Complex<U>
    where
        T: AsPrimitive<U>,
        U: Float + 'static,
    {
        Complex::new(self.re.as_(), self.im.as_())
    }

    /// Whether either component is NaN.
    #[inline]
    pub fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl<T: Float> From<T> for Complex<T> {
    #[inline]
    fn from(re: T) -> Self {
        Self::new(re, T::zero())
    }
}

impl From<Complex<f32>> for Complex<f64> {
    #[inline]
    fn from(z: Complex<f32>) -> Self {
        Self::new(z.re as f64, z.im as f64)
    }
}

impl<T: Float> PartialEq<T> for Complex<T> {
    #[inline]
    fn eq(&self, other: &T) -> bool {
        self.re == *other && self.im == T::zero()
    }
}

impl<T: Float> Zero for Complex<T> {
    #[inline]
    fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl<T: Float> One for Complex<T> {
    #[inline]
    fn one() -> Self {
        Self::new(T::one(), T::zero())
    }
}

#[cfg(feature = "num-complex")]
impl<T> From<num_complex::Complex<T>> for Complex<T> {
    #[inline]
    fn from(z: num_complex::Complex<T>) -> Self {
        Self { re: z.re, im: z.im }
    }
}

#[cfg(feature = "num-complex")]
impl<T> From<Complex<T>> for num_complex::Complex<T> {
    #[inline]
    fn from(z: Complex<T>) -> Self {
        num_complex::Complex::new(z.re, z.im)
    }
}

// ── Same-width arithmetic ───────────────────────────────────────────

impl<T: Float> Neg for Complex<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl<T: Float> Add for Complex<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl<T: Float> Sub for Complex<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl<T: Float> Mul for Complex<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl<T: Float> Div for Complex<T> {
    type Output = Self;
    /// IEEE semantics: dividing by zero yields infinities / NaN.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let d = rhs.norm_sqr();
        Self::new(
            (self.re * rhs.re + self.im * rhs.im) / d,
            (self.im * rhs.re - self.re * rhs.im) / d,
        )
    }
}

impl<T: Float> Add<T> for Complex<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: T) -> Self {
        Self::new(self.re + rhs, self.im)
    }
}

impl<T: Float> Sub<T> for Complex<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: T) -> Self {
        Self::new(self.re - rhs, self.im)
    }
}

impl<T: Float> Mul<T> for Complex<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.re * rhs, self.im * rhs)
    }
}

impl<T: Float> Div<T> for Complex<T> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: T) -> Self {
        Self::new(self.re / rhs, self.im / rhs)
    }
}

macro_rules! impl_assign_same {
    ($($Trait:ident, $method:ident, $op:tt;)*) => {
        $(
            impl<T: Float> $Trait for Complex<T> {
                #[inline]
                fn $method(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }

            impl<T: Float> $Trait<T> for Complex<T> {
                #[inline]
                fn $method(&mut self, rhs: T) {
                    *self = *self $op rhs;
                }
            }
        )*
    };
}

impl_assign_same! {
    AddAssign, add_assign, +;
    SubAssign, sub_assign, -;
    MulAssign, mul_assign, *;
    DivAssign, div_assign, /;
}

// ── Mixed-width and real-on-the-left arithmetic ─────────────────────

macro_rules! impl_mixed_binop {
    ($lhs:ty, $rhs:ty; $($Trait:ident, $method:ident, $op:tt;)*) => {
        $(
            impl $Trait<$rhs> for $lhs {
                type Output = Promoted<$lhs, $rhs>;
                #[inline]
                fn $method(self, rhs: $rhs) -> Self::Output {
                    <$lhs as Promote<$rhs>>::promote(self)
                        $op <$lhs as Promote<$rhs>>::promote_rhs(rhs)
                }
            }
        )*
    };
}

macro_rules! impl_mixed {
    ($($lhs:ty, $rhs:ty;)*) => {
        $(
            impl_mixed_binop!($lhs, $rhs;
                Add, add, +;
                Sub, sub, -;
                Mul, mul, *;
                Div, div, /;
            );
        )*
    };
}

impl_mixed! {
    Complex<f32>, Complex<f64>;
    Complex<f64>, Complex<f32>;
    Complex<f32>, f64;
    Complex<f64>, f32;
    f32, Complex<f32>;
    f32, Complex<f64>;
    f64, Complex<f32>;
    f64, Complex<f64>;
}

macro_rules! impl_widening_assign {
    ($($rhs:ty;)*) => {
        $(
            impl AddAssign<$rhs> for Complex<f64> {
                #[inline]
                fn add_assign(&mut self, rhs: $rhs) {
                    *self = *self + rhs;
                }
            }
            impl SubAssign<$rhs> for Complex<f64> {
                #[inline]
                fn sub_assign(&mut self, rhs: $rhs) {
                    *self = *self - rhs;
                }
            }
            impl MulAssign<$rhs> for Complex<f64> {
                #[inline]
                fn mul_assign(&mut self, rhs: $rhs) {
                    *self = *self * rhs;
                }
            }
            impl DivAssign<$rhs> for Complex<f64> {
                #[inline]
                fn div_assign(&mut self, rhs: $rhs) {
                    *self = *self / rhs;
                }
            }
        )*
    };
}

impl_widening_assign! {
    Complex<f32>;
    f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn near(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn add_real_scalar() {
        assert_eq!(c(1.0, 0.0) + 2.0_f64, c(3.0, 0.0));
        assert_eq!(2.0_f64 + c(1.0, 0.0), c(3.0, 0.0));
    }

    #[test]
    fn mul_and_div_inverse() {
        let z = c(1.5, -2.0);
        let w = c(0.25, 3.0);
        assert!(near((z * w) / w, z));
        assert!(near(z * z.inversed().unwrap(), c(1.0, 0.0)));
    }

    #[test]
    fn i_squared() {
        let i = Complex::<f64>::i();
        assert_eq!(i * i, c(-1.0, 0.0));
    }

    #[test]
    fn conjugate_in_place() {
        let mut z = c(1.0, 2.0);
        z.conjugate();
        assert_eq!(z, c(1.0, -2.0));
        assert_eq!(z.conjugated(), c(1.0, 2.0));
    }

    #[test]
    fn inverse_of_zero_fails_and_leaves_value() {
        let mut z = c(0.0, 0.0);
        assert_eq!(z.inverse().unwrap_err(), LinalgError::DivideByZero);
        assert_eq!(z, c(0.0, 0.0));
    }

    #[test]
    fn division_by_zero_operator_follows_ieee() {
        let q = c(1.0, 1.0) / c(0.0, 0.0);
        assert!(q.is_nan() || !q.is_finite());
    }

    #[test]
    fn mixed_width_promotes() {
        let a = Complex::new(1.0_f32, 2.0);
        let b = c(0.5, 0.5);
        let s: Complex<f64> = a + b;
        assert_eq!(s, c(1.5, 2.5));
        let p: Complex<f64> = 2.0_f64 * a;
        assert_eq!(p, c(2.0, 4.0));
        let q: Complex<f64> = a * 2.0_f64;
        assert_eq!(q, p);
    }

    #[test]
    fn widening_assign() {
        let mut z = c(1.0, 1.0);
        z += Complex::new(1.0_f32, -1.0);
        z *= 2.0_f32;
        assert_eq!(z, c(4.0, 0.0));
    }

    #[test]
    fn polar_roundtrip() {
        let z = Complex::from_polar(2.0_f64, core::f64::consts::FRAC_PI_2);
        assert!(near(z, c(0.0, 2.0)));
        assert!((z.arg() - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn cast_narrows() {
        let z: Complex<f32> = c(1.25, -0.5).cast();
        assert_eq!(z, Complex::new(1.25_f32, -0.5));
    }

    #[test]
    fn equals_real() {
        assert!(c(2.0, 0.0) == 2.0_f64);
        assert!(c(2.0, 1.0) != 2.0_f64);
    }
}
