use num_traits::{Float, Zero};

use crate::linalg::LinalgError;
use crate::traits::Scalar;

use super::Vector;

// ── Vector norms ────────────────────────────────────────────────────

impl<T: Scalar> Vector<T> {
    /// L1 norm (sum of moduli).
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::from_slice(&[1.0_f64, -2.0, 3.0]);
    /// assert!((v.norm1() - 6.0).abs() < 1e-12);
    /// ```
    pub fn norm1(&self) -> T::Real {
        self.data
            .iter()
            .fold(<T::Real as Zero>::zero(), |acc, x| acc + x.modulus())
    }

    /// L2 (Euclidean) norm.
    ///
    /// Accumulated relative to the largest modulus, so it is zero only for
    /// an all-zero vector and finite whenever every entry is.
    ///
    /// ```
    /// use numkern::Vector;
    /// let v = Vector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm2() - 5.0).abs() < 1e-12);
    ///
    /// let huge = Vector::from_slice(&[3e200_f64, 4e200]);
    /// assert!((huge.norm2() / 5e200 - 1.0).abs() < 1e-12);
    /// ```
    pub fn norm2(&self) -> T::Real {
        let scale = self.normi();
        if scale == <T::Real as Zero>::zero() {
            // zero, or NaN when an entry is NaN
            return self.norm1();
        }
        if !scale.is_finite() {
            return scale;
        }
        let ssq = self.data.iter().fold(<T::Real as Zero>::zero(), |acc, x| {
            let r = x.modulus() / scale;
            acc + r * r
        });
        scale * ssq.sqrt()
    }

    /// Max-modulus norm; zero for an empty vector.
    pub fn normi(&self) -> T::Real {
        self.data
            .iter()
            .fold(<T::Real as Zero>::zero(), |acc, x| acc.max(x.modulus()))
    }

    /// Scaled Euclidean norm; another name for [`norm2`](Self::norm2).
    #[inline]
    pub fn norme(&self) -> T::Real {
        self.norm2()
    }

    /// General p-norm `(Σ|xᵢ|^p)^(1/p)`; `p = ∞` gives [`normi`](Self::normi).
    ///
    /// # Panics
    ///
    /// Panics if `p` is not strictly positive.
    pub fn normp(&self, p: T::Real) -> T::Real {
        assert!(
            p > <T::Real as Zero>::zero(),
            "p-norm requires p > 0"
        );
        if p.is_infinite() {
            return self.normi();
        }
        self.data
            .iter()
            .fold(<T::Real as Zero>::zero(), |acc, x| acc + x.modulus().powf(p))
            .powf(p.recip())
    }

    /// Euclidean length, same as [`norm2`](Self::norm2).
    #[inline]
    pub fn abs(&self) -> T::Real {
        self.norm2()
    }

    /// Scale in place to unit Euclidean length.
    ///
    /// Fails with [`LinalgError::DivideByZero`] for a zero vector, leaving it
    /// untouched.
    ///
    /// ```
    /// use numkern::Vector;
    /// let mut v = Vector::from_slice(&[3.0_f64, 4.0]);
    /// v.normalize().unwrap();
    /// assert!((v[0] - 0.6).abs() < 1e-12);
    /// assert!((v.norm2() - 1.0).abs() < 1e-12);
    /// ```
    pub fn normalize(&mut self) -> Result<&mut Self, LinalgError> {
        let n = self.norm2();
        if n == <T::Real as Zero>::zero() {
            return Err(LinalgError::DivideByZero);
        }
        // n may be subnormal, so its reciprocal can overflow
        for x in self.data.iter_mut() {
            *x = x.unscale_real(n);
        }
        Ok(self)
    }

    /// Unit-length copy.
    pub fn normalized(&self) -> Result<Self, LinalgError> {
        let mut out = self.clone();
        out.normalize()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    #[test]
    fn norm_family() {
        let v = Vector::from_slice(&[3.0_f64, -4.0]);
        assert_eq!(v.norm1(), 7.0);
        assert_eq!(v.norm2(), 5.0);
        assert_eq!(v.normi(), 4.0);
        assert!((v.norme() - 5.0).abs() < 1e-12);
        assert!((v.normp(2.0) - 5.0).abs() < 1e-12);
        assert_eq!(v.normp(f64::INFINITY), 4.0);
    }

    #[test]
    fn complex_norms_use_modulus() {
        let v = Vector::from_slice(&[Complex::new(3.0_f64, 4.0), Complex::new(0.0, 0.0)]);
        assert_eq!(v.norm1(), 5.0);
        assert_eq!(v.normi(), 5.0);
        assert!((v.norm2() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn norm_ordering() {
        let v = Vector::from_slice(&[1.0_f64, -2.0, 0.5, 3.0]);
        assert!(v.normi() <= v.norm2());
        assert!(v.norm2() <= v.norm1());
    }

    #[test]
    fn empty_norms_are_zero() {
        let v = Vector::<f64>::zeros(0);
        assert_eq!(v.norm1(), 0.0);
        assert_eq!(v.norm2(), 0.0);
        assert_eq!(v.normi(), 0.0);
        assert_eq!(v.norme(), 0.0);
    }

    #[test]
    fn norm2_survives_extreme_magnitudes() {
        let tiny = Vector::from_slice(&[1e-200_f64, 1e-200]);
        assert!((tiny.norm2() / (2.0_f64.sqrt() * 1e-200) - 1.0).abs() < 1e-12);
        let huge = Vector::from_slice(&[1e200_f64, -1e200]);
        assert!((huge.norm2() / (2.0_f64.sqrt() * 1e200) - 1.0).abs() < 1e-12);
        let sub = Vector::from_slice(&[Complex::new(0.0_f64, 3e-320), Complex::new(4e-320, 0.0)]);
        assert!(sub.norm2() > 0.0);
    }

    #[test]
    fn normalize_extreme_magnitudes() {
        let half = 0.5_f64.sqrt();
        for s in [1e-200_f64, 1e200] {
            let mut v = Vector::from_slice(&[s, s]);
            v.normalize().unwrap();
            assert!((v[0] - half).abs() < 1e-12);
            assert!((v.norm2() - 1.0).abs() < 1e-12);

            let z = Vector::from_slice(&[Complex::new(s, 0.0), Complex::new(0.0, s)]);
            let u = z.normalized().unwrap();
            assert!((u[1].im - half).abs() < 1e-12);
        }
        let sub = Vector::from_slice(&[5e-324_f64]).normalized().unwrap();
        assert_eq!(sub[0], 1.0);
    }

    #[test]
    fn nan_propagates_through_norm2() {
        assert!(Vector::from_slice(&[f64::NAN, 1.0]).norm2().is_nan());
        assert!(Vector::from_slice(&[f64::NAN]).norm2().is_nan());
    }

    #[test]
    fn normalize_zero_fails() {
        let mut v = Vector::<f64>::zeros(3);
        assert_eq!(v.normalize().unwrap_err(), LinalgError::DivideByZero);
        assert_eq!(v, Vector::<f64>::zeros(3));
    }

    #[test]
    fn normalized_complex() {
        let v = Vector::from_slice(&[Complex::new(0.0_f64, 2.0)]);
        let u = v.normalized().unwrap();
        assert_eq!(u[0], Complex::new(0.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "p > 0")]
    fn normp_rejects_nonpositive_p() {
        Vector::from_slice(&[1.0_f64]).normp(0.0);
    }
}
