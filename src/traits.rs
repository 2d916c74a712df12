use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{Float, One, Zero};

use crate::complex::Complex;
use crate::linalg::LinalgError;

/// Trait for types that can be stored in a [`Vector`](crate::Vector) or
/// [`Matrix`](crate::Matrix).
///
/// Implemented for the real floats `f32`, `f64` and for `Complex<f32>`,
/// `Complex<f64>`. Every arithmetic operator is closed over `Self`; mixing
/// element types goes through [`Promote`].
pub trait Scalar:
    Copy
    + PartialEq
    + Debug
    + Default
    + Zero
    + One
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + 'static
{
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// Whether the element carries an imaginary part.
    const IS_COMPLEX: bool;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// `|z|²`, without the square root.
    fn modulus_squared(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part (zero for reals).
    fn im(self) -> Self::Real;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;

    /// Multiply by a real factor.
    #[inline]
    fn scale_real(self, r: Self::Real) -> Self {
        self * Self::from_real(r)
    }

    /// Divide by a real factor.
    #[inline]
    fn unscale_real(self, r: Self::Real) -> Self {
        self / Self::from_real(r)
    }
}

/// Real floating-point elements.
///
/// Only these are ordered, so sorting and min/max live behind this bound.
pub trait FloatScalar: Scalar<Real = Self> + Float {}

impl<T: Scalar<Real = T> + Float> FloatScalar for T {}

macro_rules! impl_scalar_real {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                type Real = $t;
                const IS_COMPLEX: bool = false;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn modulus_squared(self) -> $t { self * self }
                #[inline] fn conj(self) -> $t { self }
                #[inline] fn re(self) -> $t { self }
                #[inline] fn im(self) -> $t { 0.0 }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
            }
        )*
    };
}

impl_scalar_real!(f32, f64);

impl<T: FloatScalar> Scalar for Complex<T> {
    type Real = T;
    const IS_COMPLEX: bool = true;

    #[inline]
    fn modulus(self) -> T {
        self.abs()
    }

    #[inline]
    fn modulus_squared(self) -> T {
        self.norm_sqr()
    }

    #[inline]
    fn conj(self) -> Self {
        self.conjugated()
    }

    #[inline]
    fn re(self) -> T {
        self.re
    }

    #[inline]
    fn im(self) -> T {
        self.im
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, <T as Zero>::zero())
    }

    #[inline]
    fn scale_real(self, r: T) -> Self {
        Complex::new(self.re * r, self.im * r)
    }

    #[inline]
    fn unscale_real(self, r: T) -> Self {
        Complex::new(self.re / r, self.im / r)
    }
}

// ── Promotion ───────────────────────────────────────────────────────

/// Result element type of a binary operation between `Self` and `Rhs`.
///
/// Complex dominates real, and the wider float dominates the narrower one;
/// both rules apply independently, so `f64 ⊗ Complex<f32>` is `Complex<f64>`.
/// The table is symmetric: `Promoted<A, B> == Promoted<B, A>`.
///
/// ```
/// use numkern::{Complex, Promote};
///
/// let z: Complex<f64> = <f64 as Promote<Complex<f32>>>::promote_rhs(Complex::new(1.0, 2.0));
/// assert_eq!(z, Complex::new(1.0_f64, 2.0));
/// let x: f64 = <f32 as Promote<f64>>::promote(1.5);
/// assert_eq!(x, 1.5);
/// ```
pub trait Promote<Rhs> {
    type Output: Scalar;

    /// Convert the left operand into the promoted type.
    fn promote(self) -> Self::Output;

    /// Convert the right operand into the promoted type.
    fn promote_rhs(rhs: Rhs) -> Self::Output;
}

/// Shorthand for `<A as Promote<B>>::Output`.
pub type Promoted<A, B> = <A as Promote<B>>::Output;

/// Lossless conversion into a type at least as wide.
trait Widen<T> {
    fn widen(self) -> T;
}

macro_rules! impl_widen {
    ($($from:ty => $to:ty: |$v:ident| $body:expr;)*) => {
        $(
            impl Widen<$to> for $from {
                #[inline]
                fn widen(self) -> $to {
                    let $v = self;
                    $body
                }
            }
        )*
    };
}

impl_widen! {
    f32 => f32: |v| v;
    f32 => f64: |v| v as f64;
    f32 => Complex<f32>: |v| Complex::new(v, 0.0);
    f32 => Complex<f64>: |v| Complex::new(v as f64, 0.0);
    f64 => f64: |v| v;
    f64 => Complex<f64>: |v| Complex::new(v, 0.0);
    Complex<f32> => Complex<f32>: |v| v;
    Complex<f32> => Complex<f64>: |v| Complex::new(v.re as f64, v.im as f64);
    Complex<f64> => Complex<f64>: |v| v;
}

macro_rules! impl_promote {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {
        $(
            impl Promote<$rhs> for $lhs {
                type Output = $out;

                #[inline]
                fn promote(self) -> $out {
                    Widen::<$out>::widen(self)
                }

                #[inline]
                fn promote_rhs(rhs: $rhs) -> $out {
                    Widen::<$out>::widen(rhs)
                }
            }
        )*
    };
}

impl_promote! {
    f32, f32 => f32;
    f32, f64 => f64;
    f32, Complex<f32> => Complex<f32>;
    f32, Complex<f64> => Complex<f64>;
    f64, f32 => f64;
    f64, f64 => f64;
    f64, Complex<f32> => Complex<f64>;
    f64, Complex<f64> => Complex<f64>;
    Complex<f32>, f32 => Complex<f32>;
    Complex<f32>, f64 => Complex<f64>;
    Complex<f32>, Complex<f32> => Complex<f32>;
    Complex<f32>, Complex<f64> => Complex<f64>;
    Complex<f64>, f32 => Complex<f64>;
    Complex<f64>, f64 => Complex<f64>;
    Complex<f64>, Complex<f32> => Complex<f64>;
    Complex<f64>, Complex<f64> => Complex<f64>;
}

/// Promote both operands of a binary operation.
#[inline]
pub(crate) fn lift<T: Promote<U>, U>(a: T, b: U) -> (Promoted<T, U>, Promoted<T, U>) {
    (<T as Promote<U>>::promote(a), <T as Promote<U>>::promote_rhs(b))
}

// ── Products and generic access ─────────────────────────────────────

/// Inner / matrix product with promotion.
///
/// Implemented for vector·vector (Hermitian inner product, `Σ xᵢ·conj(yᵢ)`),
/// matrix·matrix, matrix·vector and vector·matrix. Fails with
/// [`LinalgError::DimensionMismatch`] when the inner dimensions differ.
pub trait Dot<Rhs: ?Sized> {
    type Output;

    fn dot(&self, rhs: &Rhs) -> Result<Self::Output, LinalgError>;
}

/// Read-only access to a matrix-like type.
///
/// The in-place decomposition kernels are written against this trait.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Swap two rows in place.
    fn swap_rows(&mut self, a: usize, b: usize)
    where
        T: Copy,
    {
        if a == b {
            return;
        }
        for j in 0..self.ncols() {
            let tmp = *self.get(a, j);
            *self.get_mut(a, j) = *self.get(b, j);
            *self.get_mut(b, j) = tmp;
        }
    }
}
