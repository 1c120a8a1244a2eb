use qrfact::builtins::{qr, qr_sparse, qrdelete, qrinsert, qrshift, qrupdate, SparseQrBackend, Value};
use qrfact::linalg::{LinalgError, Qr};
use qrfact::{Complex, DynMatrix};

fn real(rows: usize, cols: usize, data: &[f64]) -> Value {
    Value::Real(DynMatrix::from_rows(rows, cols, data))
}

fn as_real(v: &Value) -> DynMatrix<f64> {
    match v {
        Value::Real(m) => m.clone(),
        other => panic!("expected a real matrix, got {:?}", other),
    }
}

fn fixture_a() -> DynMatrix<f64> {
    DynMatrix::from_rows(
        5,
        3,
        &[
            0.091364, 0.613038, 0.999083, //
            0.594638, 0.425302, 0.603537, //
            0.383594, 0.291238, 0.085574, //
            0.265712, 0.268003, 0.238409, //
            0.669966, 0.743851, 0.445057,
        ],
    )
}

fn close(a: &DynMatrix<f64>, b: &DynMatrix<f64>, tol: f64) -> bool {
    a.nrows() == b.nrows() && a.ncols() == b.ncols() && (a - b).max_abs() < tol
}

// ── qr ──────────────────────────────────────────────────────────────

#[test]
fn two_by_two_reference_values() {
    let out = qr(&[real(2, 2, &[1.0, 2.0, 3.0, 4.0])], 2).unwrap();
    let q = as_real(&out[0]);
    let r = as_real(&out[1]);
    let q_ref = DynMatrix::from_rows(2, 2, &[-0.31623, -0.94868, -0.94868, 0.31623]);
    let r_ref = DynMatrix::from_rows(2, 2, &[-3.16228, -4.42719, 0.0, -0.63246]);
    assert!(close(&q, &q_ref, 1e-5));
    assert!(close(&r, &r_ref, 1e-5));
}

#[test]
fn wide_and_tall_with_permutations() {
    let wide = DynMatrix::from_rows(2, 3, &[0.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    for a in [wide.clone(), wide.transpose()] {
        let arg = Value::Real(a.clone());
        let tol = f64::EPSILON.sqrt();

        let out = qr(&[arg.clone()], 2).unwrap();
        assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a, tol));
        let out = qr(&[arg.clone(), Value::scalar(0.0)], 2).unwrap();
        assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a, tol));

        let out = qr(&[arg.clone()], 3).unwrap();
        let p = as_real(&out[2]);
        assert_eq!((p.nrows(), p.ncols()), (a.ncols(), a.ncols()));
        assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &(&a * &p), tol));

        let out = qr(&[arg, Value::scalar(0.0)], 3).unwrap();
        let pe = as_real(&out[2]);
        assert_eq!((pe.nrows(), pe.ncols()), (1, a.ncols()));
        let cols: Vec<usize> = pe.iter().map(|&x| x as usize - 1).collect();
        assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a.select_cols(&cols), tol));
    }
}

#[test]
fn single_precision_in_single_out() {
    let a = Value::Single(DynMatrix::from_rows(2, 3, &[0.0_f32, 2.0, 1.0, 2.0, 1.0, 2.0]));
    let out = qr(&[a], 3).unwrap();
    assert!(out[0].is_single() && out[1].is_single());
    assert!(matches!(out[2], Value::Real(_)));
}

#[test]
fn qr_usage_errors() {
    assert_eq!(qr(&[], 1).unwrap_err().kind, LinalgError::Usage);
    let a = real(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let e = qr(&[a, Value::scalar(0.0), Value::scalar(2.0)], 2).unwrap_err();
    assert_eq!(e.kind, LinalgError::Usage);
}

#[test]
fn least_squares_through_qh_b() {
    let a = fixture_a();
    let b = DynMatrix::col_vector(&[1.0, 2.0, 0.5, -1.0, 0.25]);
    let out = qr(&[Value::Real(a.clone()), Value::Real(b.clone()), Value::scalar(0.0)], 2).unwrap();
    let c = as_real(&out[0]);
    let r = as_real(&out[1]);
    assert_eq!((c.nrows(), r.nrows()), (3, 3));
    let x = Qr::new(&a).solve(&b).unwrap();
    assert!(close(&(&r * &x), &c, 1e-12));
}

// ── Updates through the call layer ──────────────────────────────────

#[test]
fn qrupdate_fixture() {
    let a = fixture_a();
    let u = DynMatrix::col_vector(&[0.85082, 0.76426, 0.42883, 0.53010, 0.80683]);
    let v = DynMatrix::col_vector(&[0.98810, 0.24295, 0.43167]);
    let qr_out = qr(&[Value::Real(a.clone())], 2).unwrap();
    let out = qrupdate(&[qr_out[0].clone(), qr_out[1].clone(), Value::Real(u.clone()), Value::Real(v.clone())]).unwrap();
    let expected = &a + &(&u * &v.transpose());
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &expected, 1e-13));
    assert!(as_real(&out[1]).is_upper_triangular());
}

#[test]
fn qrinsert_one_based_positions() {
    let a = fixture_a();
    let x = DynMatrix::col_vector(&[1.0, -1.0, 0.5, 0.0, 2.0]);
    let qr_out = qr(&[Value::Real(a.clone())], 2).unwrap();

    let out = qrinsert(&[qr_out[0].clone(), qr_out[1].clone(), Value::scalar(3.0), Value::Real(x.clone())]).unwrap();
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a.insert_cols(2, &x), 1e-13));

    // two columns at final positions 1 and 5
    let xx = DynMatrix::from_fn(5, 2, |i, j| (i * 2 + j) as f64 * 0.1);
    let j = real(1, 2, &[5.0, 1.0]);
    let out = qrinsert(&[qr_out[0].clone(), qr_out[1].clone(), j, Value::Real(xx.clone())]).unwrap();
    let expected = a.insert_cols(3, &xx.col(0)).insert_cols(0, &xx.col(1));
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &expected, 1e-13));

    let row = real(1, 3, &[0.85082, 0.76426, 0.42883]);
    let out = qrinsert(&[
        qr_out[0].clone(),
        qr_out[1].clone(),
        Value::scalar(6.0),
        row.clone(),
        Value::Str("row".to_string()),
    ])
    .unwrap();
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a.insert_rows(5, &as_real(&row)), 1e-13));

    let e = qrinsert(&[qr_out[0].clone(), qr_out[1].clone(), Value::scalar(7.0), row, Value::Str("row".to_string())])
        .unwrap_err();
    assert_eq!(e.to_string(), "qrinsert: index out of range");
}

#[test]
fn qrdelete_and_qrshift() {
    let a = fixture_a();
    let qr_out = qr(&[Value::Real(a.clone())], 2).unwrap();

    let out = qrdelete(&[qr_out[0].clone(), qr_out[1].clone(), real(1, 2, &[1.0, 3.0])]).unwrap();
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a.col(1), 1e-13));

    let out = qrdelete(&[qr_out[0].clone(), qr_out[1].clone(), Value::scalar(5.0), Value::Str("row".to_string())]).unwrap();
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a.remove_row(4), 1e-13));

    let out = qrshift(&[qr_out[0].clone(), qr_out[1].clone(), Value::scalar(1.0), Value::scalar(3.0)]).unwrap();
    assert!(close(&(&as_real(&out[0]) * &as_real(&out[1])), &a.select_cols(&[1, 2, 0]), 1e-13));
}

#[test]
fn complex_operands_promote() {
    let a = fixture_a();
    let qr_out = qr(&[Value::Real(a)], 2).unwrap();
    let u = Value::Complex(DynMatrix::col_vector(&[Complex::new(0.0, 1.0); 5]));
    let v = Value::Real(DynMatrix::col_vector(&[1.0, 0.0, 0.0]));
    let out = qrupdate(&[qr_out[0].clone(), qr_out[1].clone(), u, v]).unwrap();
    assert!(out[0].is_complex() && out[1].is_complex());
}

// ── Sparse entry ────────────────────────────────────────────────────

struct Densified;

impl SparseQrBackend<f64> for Densified {
    type Matrix = DynMatrix<f64>;
    type Factor = Qr<f64>;

    fn shape(&self, a: &DynMatrix<f64>) -> (usize, usize) {
        (a.nrows(), a.ncols())
    }

    fn factor(&self, a: &DynMatrix<f64>) -> Result<Qr<f64>, LinalgError> {
        Ok(Qr::new(a))
    }

    fn r(&self, f: &Qr<f64>, economy: bool) -> DynMatrix<f64> {
        if economy {
            f.r_economy()
        } else {
            f.r()
        }
    }

    fn q(&self, f: &Qr<f64>) -> DynMatrix<f64> {
        f.q()
    }

    fn c(&self, f: &Qr<f64>, b: &DynMatrix<f64>) -> Result<DynMatrix<f64>, LinalgError> {
        f.apply_qh(b)
    }
}

#[test]
fn sparse_solve_matches_dense() {
    // diagonally dominant 6x6
    let a = DynMatrix::from_fn(6, 6, |i, j| {
        if i == j {
            4.0
        } else if (i + 2 * j) % 5 == 0 {
            0.5
        } else {
            0.0
        }
    });
    let b = DynMatrix::from_fn(6, 2, |i, j| (i + j) as f64 - 2.0);
    let out = qr_sparse(&Densified, &a, &[Value::Real(b.clone())], 2).unwrap();
    let c = as_real(&out[0]);
    let r = as_real(&out[1]);

    // R \ C == A \ B
    let x = Qr::new(&a).solve(&b).unwrap();
    assert!(close(&(&r * &x), &c, 1e-12));
    // R'R == A'A
    assert!(close(&(&r.transpose() * &r), &(&a.transpose() * &a), 1e-10));
}
