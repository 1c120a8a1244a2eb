use alloc::vec;

use log::{debug, warn};

use super::{matrix, CallError, CallResult, Element};
use crate::builtins::Value;
use crate::linalg::LinalgError;
use crate::DynMatrix;

/// External sparse QR factorizer.
///
/// The crate has no sparse storage of its own; a host plugs in a
/// factorizer for its sparse type and [`qr_sparse`] handles the argument
/// grammar on top of it.
pub trait SparseQrBackend<T: Element> {
    type Matrix;
    type Factor;

    /// `(rows, cols)` of a sparse operand.
    fn shape(&self, a: &Self::Matrix) -> (usize, usize);

    fn factor(&self, a: &Self::Matrix) -> Result<Self::Factor, LinalgError>;

    /// Triangular factor; `min(M, N)` rows when `economy` is set.
    fn r(&self, f: &Self::Factor, economy: bool) -> DynMatrix<T>;

    /// Orthogonal factor, formed explicitly.
    fn q(&self, f: &Self::Factor) -> DynMatrix<T>;

    /// `Qᴴ·B`.
    fn c(&self, f: &Self::Factor, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError>;
}

/// `qr(S)`, `qr(S, 0)`, `qr(S, B)`, `qr(S, B, 0)` for a sparse `S`.
///
/// `rest` holds the arguments after `S`. A trailing zero scalar selects the
/// economy factor; any other argument is `B`. Returns `[R]`, `[Q, R]` or,
/// with `B`, `[Qᴴ·B, R]`. No permutation output exists for sparse input.
pub fn qr_sparse<T, B>(backend: &B, a: &B::Matrix, rest: &[Value], nargout: usize) -> CallResult
where
    T: Element,
    B: SparseQrBackend<T>,
{
    const F: &str = "qr";
    if rest.len() > 2 || nargout > 2 {
        return Err(CallError::usage(F));
    }

    let mut economy = false;
    let mut have_b = !rest.is_empty();
    if let Some(last) = rest.last() {
        if last.is_scalar() && last.is_zero_scalar() {
            economy = true;
            have_b = rest.len() > 1;
        }
    }
    if rest.len() == 2 && !economy {
        return Err(CallError::usage(F));
    }

    let (m, n) = backend.shape(a);
    let b = if have_b {
        let b = matrix::<T>(F, &rest[0])?;
        if b.nrows() != m {
            return Err(CallError::engine(F, LinalgError::DimensionMismatch));
        }
        Some(b)
    } else {
        None
    };

    debug!("qr: sparse {}x{}, economy={}, rhs={}", m, n, economy, have_b);
    let f = backend.factor(a).map_err(|k| CallError::engine(F, k))?;

    if let Some(b) = b {
        if m < n {
            warn!("qr: non minimum norm solution for under-determined problem");
        }
        let c = backend.c(&f, &b).map_err(|k| CallError::engine(F, k))?;
        return Ok(vec![T::into_value(c), T::into_value(backend.r(&f, economy))]);
    }

    let r = T::into_value(backend.r(&f, economy));
    if nargout > 1 {
        Ok(vec![T::into_value(backend.q(&f)), r])
    } else {
        Ok(vec![r])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Qr;
    use alloc::string::ToString;
    use core::cell::Cell;

    /// Stands in for a sparse factorizer by densifying.
    struct DenseBackend;

    impl SparseQrBackend<f64> for DenseBackend {
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

    /// Densifying backend that records how often it factors.
    #[derive(Default)]
    struct CountingBackend {
        factored: Cell<usize>,
    }

    impl SparseQrBackend<f64> for CountingBackend {
        type Matrix = DynMatrix<f64>;
        type Factor = Qr<f64>;

        fn shape(&self, a: &DynMatrix<f64>) -> (usize, usize) {
            DenseBackend.shape(a)
        }

        fn factor(&self, a: &DynMatrix<f64>) -> Result<Qr<f64>, LinalgError> {
            self.factored.set(self.factored.get() + 1);
            DenseBackend.factor(a)
        }

        fn r(&self, f: &Qr<f64>, economy: bool) -> DynMatrix<f64> {
            DenseBackend.r(f, economy)
        }

        fn q(&self, f: &Qr<f64>) -> DynMatrix<f64> {
            DenseBackend.q(f)
        }

        fn c(&self, f: &Qr<f64>, b: &DynMatrix<f64>) -> Result<DynMatrix<f64>, LinalgError> {
            DenseBackend.c(f, b)
        }
    }

    fn tall() -> DynMatrix<f64> {
        DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 7.0])
    }

    fn shape(v: &Value) -> (usize, usize) {
        (v.rows(), v.cols())
    }

    #[test]
    fn r_only_and_economy() {
        let out = qr_sparse(&DenseBackend, &tall(), &[], 1).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(shape(&out[0]), (3, 2));

        let out = qr_sparse(&DenseBackend, &tall(), &[Value::scalar(0.0)], 1).unwrap();
        assert_eq!(shape(&out[0]), (2, 2));
    }

    #[test]
    fn q_and_r() {
        let out = qr_sparse(&DenseBackend, &tall(), &[], 2).unwrap();
        assert_eq!(shape(&out[0]), (3, 3));
        assert_eq!(shape(&out[1]), (3, 2));
    }

    #[test]
    fn rhs_forms() {
        let b = Value::Real(DynMatrix::col_vector(&[1.0, 0.0, 2.0]));
        let out = qr_sparse(&DenseBackend, &tall(), &[b.clone()], 2).unwrap();
        assert_eq!(shape(&out[0]), (3, 1));
        assert_eq!(shape(&out[1]), (3, 2));

        let out = qr_sparse(&DenseBackend, &tall(), &[b, Value::Bool(false)], 2).unwrap();
        assert_eq!(shape(&out[1]), (2, 2));
    }

    #[test]
    fn nonzero_scalar_is_a_right_hand_side() {
        let a = DynMatrix::from_rows(1, 2, &[3.0, 4.0]);
        let out = qr_sparse(&DenseBackend, &a, &[Value::scalar(5.0)], 2).unwrap();
        match &out[0] {
            Value::Real(c) => assert!((c[(0, 0)].abs() - 5.0).abs() < 1e-14),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn grammar_errors() {
        let b = Value::Real(DynMatrix::col_vector(&[1.0, 0.0, 2.0]));
        let e = qr_sparse(&DenseBackend, &tall(), &[b.clone(), b.clone()], 2).unwrap_err();
        assert_eq!(e.kind, LinalgError::Usage);
        assert!(qr_sparse(&DenseBackend, &tall(), &[], 3).is_err());

        let short = Value::Real(DynMatrix::col_vector(&[1.0, 0.0]));
        let e = qr_sparse(&DenseBackend, &tall(), &[short], 2).unwrap_err();
        assert_eq!(e.to_string(), "qr: dimension mismatch");

        let z = Value::Complex(DynMatrix::col_vector(&[num_complex::Complex::new(0.0, 1.0); 3]));
        let e = qr_sparse(&DenseBackend, &tall(), &[z], 2).unwrap_err();
        assert_eq!(e.kind, LinalgError::TypeMismatch);
    }

    #[test]
    fn rejected_rhs_is_never_factored() {
        let be = CountingBackend::default();

        let z = Value::Complex(DynMatrix::col_vector(&[num_complex::Complex::new(0.0, 1.0); 3]));
        let e = qr_sparse(&be, &tall(), &[z], 2).unwrap_err();
        assert_eq!(e.kind, LinalgError::TypeMismatch);
        assert_eq!(be.factored.get(), 0);

        let short = Value::Real(DynMatrix::col_vector(&[1.0, 0.0]));
        let e = qr_sparse(&be, &tall(), &[short, Value::scalar(0.0)], 2).unwrap_err();
        assert_eq!(e.kind, LinalgError::DimensionMismatch);
        assert_eq!(be.factored.get(), 0);

        let b = Value::Real(DynMatrix::col_vector(&[1.0, 0.0, 2.0]));
        qr_sparse(&be, &tall(), &[b], 2).unwrap();
        assert_eq!(be.factored.get(), 1);
    }
}
