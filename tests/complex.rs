use numkern::{Complex, Dot, LinalgError, Matrix, Vector};

type C = Complex<f64>;

fn c(re: f64, im: f64) -> C {
    Complex::new(re, im)
}

const TOL: f64 = 1e-10;

fn assert_complex_near(a: C, b: C, tol: f64, msg: &str) {
    assert!(
        (a.re - b.re).abs() < tol && (a.im - b.im).abs() < tol,
        "{}: {:?} vs {:?}",
        msg,
        a,
        b
    );
}

fn assert_solves(a: &Matrix<C>, x: &Vector<C>, b: &Vector<C>) {
    for i in 0..a.nrows() {
        let mut sum = C::default();
        for j in 0..a.ncols() {
            sum += a[(i, j)] * x[j];
        }
        assert_complex_near(sum, b[i], TOL, &format!("row {}", i));
    }
}

// ── Scalar arithmetic and promotion ──────────────────────────────────

#[test]
fn complex_plus_real_promotes() {
    assert_eq!(c(1.0, 0.0) + 2.0_f64, c(3.0, 0.0));
    let narrow = Complex::new(1.0_f32, 2.0);
    let wide: C = narrow + 0.5_f64;
    assert_eq!(wide, c(1.5, 2.0));
}

#[test]
fn complex_division_and_inverse() {
    let z = c(3.0, 4.0);
    assert_complex_near(z / z, c(1.0, 0.0), TOL, "z/z");
    assert_complex_near(z.inversed().unwrap(), c(0.12, -0.16), TOL, "1/z");
    assert_eq!(c(0.0, 0.0).inversed().unwrap_err(), LinalgError::DivideByZero);
}

// ── LU tests ─────────────────────────────────────────────────────────

#[test]
fn complex_lu_solve() {
    let a = Matrix::new([[c(2.0, 1.0), c(1.0, -1.0)], [c(1.0, 0.0), c(3.0, 2.0)]]);
    let b = Vector::from_slice(&[c(5.0, 3.0), c(7.0, 4.0)]);
    let x = a.lup().unwrap().solve(&b).unwrap();
    assert_solves(&a, &x, &b);
}

#[test]
fn complex_det() {
    // (1+i)(1-i) - (2)(i) = 2 - 2i
    let a = Matrix::new([[c(1.0, 1.0), c(2.0, 0.0)], [c(0.0, 1.0), c(1.0, -1.0)]]);
    assert_complex_near(a.det().unwrap(), c(2.0, -2.0), TOL, "det");
    assert_complex_near(a.gauss_det(false).unwrap(), c(2.0, -2.0), TOL, "gauss det");
    assert_complex_near(a.lup().unwrap().det(), c(2.0, -2.0), TOL, "lup det");
}

#[test]
fn complex_inverse() {
    let a = Matrix::new([[c(2.0, 1.0), c(1.0, -1.0)], [c(0.0, 1.0), c(3.0, 0.0)]]);
    let id = &a * &a.inversed().unwrap();
    for i in 0..2 {
        for j in 0..2 {
            let expected = if i == j { c(1.0, 0.0) } else { c(0.0, 0.0) };
            assert_complex_near(id[(i, j)], expected, TOL, &format!("id[{},{}]", i, j));
        }
    }
}

// ── Cholesky tests ───────────────────────────────────────────────────

#[test]
fn complex_cholesky_hermitian() {
    // Hermitian positive-definite: A = [[4, 2+i], [2-i, 5]]
    let a = Matrix::new([[c(4.0, 0.0), c(2.0, 1.0)], [c(2.0, -1.0), c(5.0, 0.0)]]);
    assert!(a.is_hermitian());
    let chol = a.cholesky().unwrap();
    let l = chol.l();

    let reconstructed = l * &l.adjoint();
    for i in 0..2 {
        for j in 0..2 {
            assert_complex_near(
                reconstructed[(i, j)],
                a[(i, j)],
                TOL,
                &format!("L*L^H[{},{}]", i, j),
            );
        }
    }

    let b = Vector::from_slice(&[c(8.0, 3.0), c(7.0, -1.0)]);
    assert_solves(&a, &chol.solve(&b).unwrap(), &b);
}

// ── QR tests ─────────────────────────────────────────────────────────

#[test]
fn complex_qr_factorization() {
    let a = Matrix::new([[c(1.0, 1.0), c(2.0, 0.0)], [c(0.0, 1.0), c(1.0, -1.0)]]);
    let qr = a.qr().unwrap();
    let q = qr.q();

    let qr_prod = &q * &qr.r();
    for i in 0..2 {
        for j in 0..2 {
            assert_complex_near(qr_prod[(i, j)], a[(i, j)], TOL, &format!("QR[{},{}]", i, j));
        }
    }

    let qhq = &q.adjoint() * &q;
    for i in 0..2 {
        for j in 0..2 {
            let expected = if i == j { c(1.0, 0.0) } else { c(0.0, 0.0) };
            assert_complex_near(qhq[(i, j)], expected, TOL, &format!("Q^HQ[{},{}]", i, j));
        }
    }

    let b = Vector::from_slice(&[c(5.0, 3.0), c(7.0, 4.0)]);
    assert_solves(&a, &qr.solve(&b).unwrap(), &b);
}

// ── Norms and dot products ───────────────────────────────────────────

#[test]
fn complex_vector_norms() {
    let v = Vector::from_slice(&[c(3.0, 4.0), c(1.0, 0.0)]);
    assert!((v.norm1() - 6.0).abs() < TOL);
    assert!((v.norm2() - 26.0_f64.sqrt()).abs() < TOL);
    assert!((v.normi() - 5.0).abs() < TOL);
}

#[test]
fn complex_frobenius_norm() {
    let m = Matrix::new([[c(3.0, 4.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]);
    assert!((m.normf() - 26.0_f64.sqrt()).abs() < TOL);
}

#[test]
fn complex_vector_normalize() {
    let u = Vector::from_slice(&[c(3.0, 4.0), c(0.0, 0.0)]).normalized().unwrap();
    assert!((u.norm2() - 1.0).abs() < TOL);
    assert_complex_near(u[0], c(0.6, 0.8), TOL, "u[0]");
    assert_complex_near(u[1], c(0.0, 0.0), TOL, "u[1]");
    assert!(Vector::<C>::zeros(2).normalized().is_err());
}

#[test]
fn hermitian_dot() {
    let a = Vector::from_slice(&[c(1.0, 2.0), c(0.0, -1.0)]);
    let b = Vector::from_slice(&[c(3.0, 0.0), c(2.0, 2.0)]);
    let ab = a.dot(&b).unwrap();
    let ba = b.dot(&a).unwrap();
    assert_eq!(ab, ba.conjugated());
    // v·v is real and equals the squared norm
    let aa = a.dot(&a).unwrap();
    assert_complex_near(aa, c(a.norm2() * a.norm2(), 0.0), TOL, "a.a");
}

#[test]
fn complex_3x3_solve() {
    let a = Matrix::new([
        [c(1.0, 0.0), c(0.0, 1.0), c(2.0, 0.0)],
        [c(0.0, -1.0), c(3.0, 0.0), c(1.0, 1.0)],
        [c(2.0, 0.0), c(1.0, -1.0), c(4.0, 0.0)],
    ]);
    let b = Vector::from_slice(&[c(3.0, 1.0), c(4.0, -1.0), c(7.0, 0.0)]);
    assert_solves(&a, &a.solve(&b).unwrap(), &b);
    assert_solves(&a, &numkern::gauss_jordan_solve(&a, &b).unwrap(), &b);
}

#[test]
fn real_matrix_complex_rhs() {
    let a = Matrix::new([[2.0_f64, 1.0], [1.0, 3.0]]);
    let b = Vector::from_slice(&[c(3.0, 1.0), c(5.0, 0.0)]);
    let x: Vector<C> = a.solve(&b).unwrap();
    let back = &a * &x;
    for i in 0..2 {
        assert_complex_near(back[i], b[i], TOL, "A x");
    }
}
