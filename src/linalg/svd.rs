use alloc::vec::Vec;

use num_traits::{Float, NumCast, One, Zero};

use crate::linalg::{linalg_log, LinalgError};
use crate::traits::Scalar;
use crate::Matrix;

/// Sweep budget for the Jacobi iteration before [`LinalgError::ConvergenceFailure`].
pub const SVD_MAX_SWEEPS: usize = 60;

// ── One-sided Jacobi ────────────────────────────────────────────────

/// Column-major working copy: `cols[j]` is column `j`.
fn columns<T: Scalar>(a: &Matrix<T>) -> Vec<Vec<T>> {
    (0..a.ncols())
        .map(|j| a.rows.iter().map(|r| r[j]).collect())
        .collect()
}

fn col_norm_sq<T: Scalar>(c: &[T]) -> T::Real {
    c.iter()
        .fold(<T::Real as Zero>::zero(), |acc, x| acc + x.modulus_squared())
}

/// `xᴴy`.
fn col_dot<T: Scalar>(x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&a, &b)| acc + a.conj() * b)
}

/// Apply the plane rotation to columns `p < q`:
/// `q ← q·phase`, then `p ← c·p − s·q` and `q ← s·p + c·q`.
fn rotate<T: Scalar>(cols: &mut [Vec<T>], p: usize, q: usize, c: T::Real, s: T::Real, phase: T) {
    let (head, tail) = cols.split_at_mut(q);
    let cp = &mut head[p];
    let cq = &mut tail[0];
    for (x, y) in cp.iter_mut().zip(cq.iter_mut()) {
        let ap = *x;
        let aq = *y * phase;
        *x = ap.scale_real(c) - aq.scale_real(s);
        *y = ap.scale_real(s) + aq.scale_real(c);
    }
}

/// Orthogonalize column pairs of `w` until no pair needs a rotation.
///
/// `v` receives the same column operations so `w = A·V` stays true.
/// Returns the number of sweeps performed.
fn jacobi_sweeps<T: Scalar>(w: &mut [Vec<T>], v: &mut [Vec<T>], tol: T::Real) -> Result<usize, LinalgError> {
    let n = w.len();
    let zero = <T::Real as Zero>::zero();
    let one = <T::Real as One>::one();
    let two = one + one;

    for sweep in 0..SVD_MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let alpha = col_norm_sq(&w[p]);
                let beta = col_norm_sq(&w[q]);
                let gamma = col_dot(&w[p], &w[q]);
                let g = gamma.modulus();
                if g == zero || g <= tol * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                // Rotate the phase out of gamma, then zero the real 2×2
                // off-diagonal [[alpha, g], [g, beta]].
                let phase = (gamma / T::from_real(g)).conj();
                let zeta = (beta - alpha) / (two * g);
                let sign = if zeta < zero { -one } else { one };
                let t = sign / (zeta.abs() + (one + zeta * zeta).sqrt());
                let c = (one + t * t).sqrt().recip();
                let s = c * t;

                rotate(w, p, q, c, s, phase);
                rotate(v, p, q, c, s, phase);
            }
        }
        if !rotated {
            return Ok(sweep + 1);
        }
    }
    Err(LinalgError::ConvergenceFailure)
}

/// Unit vector orthogonal to every column in `basis`, picked from the
/// standard basis vector with the largest residual.
fn complete_basis<T: Scalar>(basis: &[Vec<T>], m: usize) -> Vec<T> {
    let mut best: Option<(T::Real, Vec<T>)> = None;
    for k in 0..m {
        let mut r: Vec<T> = (0..m).map(|i| if i == k { T::one() } else { T::zero() }).collect();
        // Two passes of classical Gram-Schmidt
        for _ in 0..2 {
            for b in basis {
                let proj = col_dot(b, &r);
                for (ri, &bi) in r.iter_mut().zip(b.iter()) {
                    *ri -= proj * bi;
                }
            }
        }
        let norm = col_norm_sq(&r).sqrt();
        if best.as_ref().map_or(true, |(bn, _)| norm > *bn) {
            best = Some((norm, r));
        }
    }
    match best {
        Some((norm, r)) if norm > <T::Real as Zero>::zero() => {
            let inv = norm.recip();
            r.into_iter().map(|x| x.scale_real(inv)).collect()
        }
        _ => alloc::vec![T::zero(); m],
    }
}

fn from_columns<T: Scalar>(cols: &[Vec<T>], nrows: usize) -> Matrix<T> {
    Matrix::from_fn(nrows, cols.len(), |i, j| cols[j][i])
}

// ── Svd ─────────────────────────────────────────────────────────────

/// Thin singular value decomposition `A = U·Σ·Vᴴ`.
///
/// For an M×N input with `K = min(M, N)`: `U` is M×K and `V` is N×K, both
/// with orthonormal columns, and `Σ` is K×K diagonal with non-negative
/// entries sorted descending.
///
/// Computed by one-sided (Hestenes) Jacobi: plane rotations are applied to
/// column pairs of `A` until all columns are mutually orthogonal, at which
/// point the column norms are the singular values. A pair counts as
/// orthogonal when `|a_pᴴa_q| ≤ M·eps·‖a_p‖‖a_q‖`. Wide matrices are
/// handled through their adjoint.
///
/// ```
/// use numkern::Matrix;
///
/// let a = Matrix::new([[3.0_f64, 0.0], [4.0, 5.0]]);
/// let svd = a.svd().unwrap();
/// let s = svd.singular_values();
/// assert!((s[0] - 45.0_f64.sqrt()).abs() < 1e-12);
/// assert!((s[1] - 5.0_f64.sqrt()).abs() < 1e-12);
///
/// let back = &(&svd.u() * &svd.sigma()) * &svd.v().adjoint();
/// assert!((back[(1, 0)] - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Svd<T: Scalar> {
    u: Matrix<T>,
    singular_values: Vec<T::Real>,
    v: Matrix<T>,
}

impl<T: Scalar> Svd<T> {
    /// Compute the SVD of a matrix.
    ///
    /// Returns `Err(ConvergenceFailure)` if the rotations have not settled
    /// after [`SVD_MAX_SWEEPS`] sweeps.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        if a.nrows() < a.ncols() {
            let Svd {
                u,
                singular_values,
                v,
            } = Self::tall(&a.adjoint())?;
            return Ok(Self {
                u: v,
                singular_values,
                v: u,
            });
        }
        Self::tall(a)
    }

    /// M ≥ N case.
    fn tall(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let m = a.nrows();
        let n = a.ncols();
        let zero = <T::Real as Zero>::zero();

        let mut w = columns(a);
        let mut v: Vec<Vec<T>> = (0..n)
            .map(|j| (0..n).map(|i| if i == j { T::one() } else { T::zero() }).collect())
            .collect();

        let dims: T::Real = NumCast::from(m.max(1)).unwrap_or_else(One::one);
        let tol = T::lepsilon() * dims;
        let sweeps = jacobi_sweeps(&mut w, &mut v, tol)?;
        linalg_log!(debug, "svd: {}x{} converged after {} sweeps", m, n, sweeps);

        let norms: Vec<T::Real> = w.iter().map(|c| col_norm_sq(c).sqrt()).collect();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| {
            norms[j]
                .partial_cmp(&norms[i])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let smax = order.first().map_or(zero, |&j| norms[j]);
        let cutoff = tol * smax;

        let mut u_cols: Vec<Vec<T>> = Vec::with_capacity(n);
        let mut v_cols: Vec<Vec<T>> = Vec::with_capacity(n);
        let mut singular_values = Vec::with_capacity(n);
        // Columns with a usable norm first so the completion sees all of them
        let mut deficient = Vec::new();
        for (slot, &j) in order.iter().enumerate() {
            let sigma = norms[j];
            singular_values.push(sigma);
            v_cols.push(v[j].clone());
            if sigma > zero && sigma > cutoff {
                let inv = sigma.recip();
                u_cols.push(w[j].iter().map(|x| x.scale_real(inv)).collect());
            } else {
                u_cols.push(Vec::new());
                deficient.push(slot);
            }
        }
        for slot in deficient {
            let known: Vec<Vec<T>> = u_cols.iter().filter(|c| !c.is_empty()).cloned().collect();
            u_cols[slot] = complete_basis(&known, m);
        }

        Ok(Self {
            u: from_columns(&u_cols, m),
            singular_values,
            v: from_columns(&v_cols, n),
        })
    }

    /// The singular values, sorted descending.
    #[inline]
    pub fn singular_values(&self) -> &[T::Real] {
        &self.singular_values
    }

    /// Left singular vectors, M×K.
    pub fn u(&self) -> Matrix<T> {
        self.u.clone()
    }

    /// `Σ` as a K×K diagonal matrix.
    pub fn sigma(&self) -> Matrix<T> {
        let k = self.singular_values.len();
        Matrix::from_fn(k, k, |i, j| {
            if i == j {
                T::from_real(self.singular_values[i])
            } else {
                T::zero()
            }
        })
    }

    /// Right singular vectors, N×K.
    pub fn v(&self) -> Matrix<T> {
        self.v.clone()
    }

    /// Numerical rank: number of singular values above `tol`.
    pub fn rank(&self, tol: T::Real) -> usize {
        self.singular_values.iter().filter(|&&s| s > tol).count()
    }

    /// Condition number: σ_max / σ_min.
    ///
    /// Returns infinity if the smallest singular value is zero.
    pub fn condition_number(&self) -> T::Real {
        match (self.singular_values.first(), self.singular_values.last()) {
            (Some(&s_max), Some(&s_min)) => {
                if s_min == <T::Real as Zero>::zero() {
                    T::Real::infinity()
                } else {
                    s_max / s_min
                }
            }
            _ => <T::Real as One>::one(),
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Singular value decomposition.
    ///
    /// ```
    /// use numkern::Matrix;
    ///
    /// let a = Matrix::new([
    ///     [1.0_f64, 0.0],
    ///     [0.0, 2.0],
    ///     [0.0, 0.0],
    /// ]);
    /// let svd = a.svd().unwrap();
    /// assert!((svd.singular_values()[0] - 2.0).abs() < 1e-10);
    /// assert!((svd.singular_values()[1] - 1.0).abs() < 1e-10);
    /// assert_eq!(svd.u().size(), (3, 2));
    /// ```
    pub fn svd(&self) -> Result<Svd<T>, LinalgError> {
        Svd::new(self)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
