//! Call-level entry points: `qr`, `qrupdate`, `qrinsert`, `qrdelete`,
//! `qrshift`.
//!
//! Arguments arrive as dynamically typed [`Value`]s with 1-based indices.
//! Every argument check (count, numeric type, Q/R shape, index form) runs
//! before any numeric work, and the operands are promoted to a common
//! domain: complex if any operand is complex, single if any is single.
//!
//! ```
//! use qrfact::builtins::{qr, qrdelete, Value};
//! use qrfact::DynMatrix;
//!
//! let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 7.0]);
//! let qr_out = qr(&[Value::Real(a)], 2).unwrap();
//! let args = [qr_out[0].clone(), qr_out[1].clone(), Value::scalar(1.0)];
//! let out = qrdelete(&args).unwrap();
//! assert_eq!(out[1].cols(), 1);
//! ```

mod sparse;
mod value;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use log::debug;
use num_complex::Complex;
use num_traits::Float;

use crate::linalg::{LinalgError, PivotedQr, Qr, QrFactorization, QrMode};
use crate::DynMatrix;

pub use sparse::{qr_sparse, SparseQrBackend};
pub use value::{Element, Value};

use value::Domain;

/// Failure of a call-level function, displayed as `"<func>: <detail>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    pub func: &'static str,
    pub kind: LinalgError,
    pub detail: String,
}

impl CallError {
    pub(crate) fn new(func: &'static str, kind: LinalgError, detail: impl Into<String>) -> Self {
        Self {
            func,
            kind,
            detail: detail.into(),
        }
    }

    /// Wrap an engine error, using its own message as the detail.
    pub(crate) fn engine(func: &'static str, kind: LinalgError) -> Self {
        Self::new(func, kind, kind.to_string())
    }

    pub(crate) fn usage(func: &'static str) -> Self {
        Self::new(func, LinalgError::Usage, format!("Invalid call to {}", func))
    }
}

impl core::fmt::Display for CallError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.func, self.detail)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CallError {}

/// Output list of a call.
pub type CallResult = Result<Vec<Value>, CallError>;

macro_rules! dispatch {
    ($domain:expr, $f:ident ( $($arg:expr),* )) => {
        match $domain {
            Domain::Real => $f::<f64>($($arg),*),
            Domain::Single => $f::<f32>($($arg),*),
            Domain::Complex => $f::<Complex<f64>>($($arg),*),
            Domain::SingleComplex => $f::<Complex<f32>>($($arg),*),
        }
    };
}

/// Common promoted domain of numeric operands.
fn common_domain(func: &'static str, operands: &[&Value]) -> Result<Domain, CallError> {
    let mut domain: Option<Domain> = None;
    for v in operands {
        let d = v
            .domain()
            .ok_or_else(|| CallError::new(func, LinalgError::TypeMismatch, "wrong type argument, expected a numeric matrix"))?;
        domain = Some(match domain {
            Some(prev) => prev.promote(d),
            None => d,
        });
    }
    Ok(domain.unwrap_or(Domain::Real))
}

pub(crate) fn matrix<T: Element>(func: &'static str, v: &Value) -> Result<DynMatrix<T>, CallError> {
    T::matrix_from(v)
        .ok_or_else(|| CallError::new(func, LinalgError::TypeMismatch, "wrong type argument, expected a numeric matrix"))
}

/// Q is M×K and R is K×N with K = M, or (if allowed) K = N < M.
fn check_qr_dims(q: &Value, r: &Value, allow_economy: bool) -> bool {
    let m = q.rows();
    let k = r.rows();
    let n = r.cols();
    k == q.cols() && (m == k || (allow_economy && k == n && k < m))
}

/// Convert 1-based index arguments to 0-based positions.
fn indices(func: &'static str, v: &Value, vector_allowed: bool, invalid: &'static str) -> Result<Vec<usize>, CallError> {
    let entries = v
        .real_entries()
        .ok_or_else(|| CallError::new(func, LinalgError::InvalidIndex, invalid))?;
    if !vector_allowed && entries.len() != 1 {
        return Err(CallError::new(func, LinalgError::InvalidIndex, invalid));
    }
    entries
        .into_iter()
        .map(|x| {
            if !x.is_finite() || Float::fract(x) != 0.0 {
                Err(CallError::new(func, LinalgError::InvalidIndex, invalid))
            } else if x < 1.0 {
                Err(CallError::new(func, LinalgError::InvalidIndex, "index out of range"))
            } else {
                Ok(x as usize - 1)
            }
        })
        .collect()
}

/// Optional trailing orientation argument; `true` for `"col"`.
fn orientation(func: &'static str, arg: Option<&Value>) -> Result<bool, CallError> {
    match arg {
        None => Ok(true),
        Some(Value::Str(s)) if s == "col" => Ok(true),
        Some(Value::Str(s)) if s == "row" => Ok(false),
        Some(Value::Str(_)) => Err(CallError::new(func, LinalgError::Usage, "ORIENT must be \"col\" or \"row\"")),
        Some(_) => Err(CallError::usage(func)),
    }
}

fn factorization<T: Element>(func: &'static str, q: &Value, r: &Value) -> Result<QrFactorization<T>, CallError> {
    QrFactorization::from_parts(matrix(func, q)?, matrix(func, r)?).map_err(|k| CallError::engine(func, k))
}

fn outputs<T: Element>(f: QrFactorization<T>) -> Vec<Value> {
    let (q, r) = f.into_parts();
    vec![T::into_value(q), T::into_value(r)]
}

// ── qr ──────────────────────────────────────────────────────────────

/// `qr(A)`, `qr(A, 0)`, `qr(A, B)`, `qr(A, B, 0)` for dense `A`.
///
/// | `nargout` | Result |
/// |-----------|--------|
/// | 0 or 1    | `[R]` |
/// | 2         | `[Q, R]` |
/// | 3         | `[Q, R, P]`, `A·P = Q·R`; with the economy flag `P` is a 1-based row vector and `A(:, P) = Q·R` |
///
/// With a right-hand side `B` the result is `[Qᴴ·B, R]`.
pub fn qr(args: &[Value], nargout: usize) -> CallResult {
    const F: &str = "qr";
    if args.is_empty() || args.len() > 3 || nargout > 3 {
        return Err(CallError::usage(F));
    }
    let economy = args.len() > 1 && args[args.len() - 1].is_zero_scalar();
    let b = match (args.len(), economy) {
        (1, _) | (2, true) => None,
        (2, false) | (3, true) => Some(&args[1]),
        _ => return Err(CallError::usage(F)),
    };
    if b.is_some() && nargout > 2 {
        return Err(CallError::usage(F));
    }

    let mut operands = vec![&args[0]];
    operands.extend(b);
    let domain = common_domain(F, &operands)?;
    debug!(
        "qr: {}x{} {:?}, nargout={}, economy={}, rhs={}",
        args[0].rows(),
        args[0].cols(),
        domain,
        nargout,
        economy,
        b.is_some()
    );
    dispatch!(domain, qr_dense(&args[0], b, economy, nargout))
}

fn qr_dense<T: Element>(a: &Value, b: Option<&Value>, economy: bool, nargout: usize) -> CallResult {
    const F: &str = "qr";
    let a = matrix::<T>(F, a)?;
    let mode = if economy { QrMode::Economy } else { QrMode::Full };

    if let Some(b) = b {
        let b = matrix::<T>(F, b)?;
        if b.nrows() != a.nrows() {
            return Err(CallError::engine(F, LinalgError::DimensionMismatch));
        }
        let packed = Qr::new(&a);
        let c = packed.apply_qh(&b).map_err(|k| CallError::engine(F, k))?;
        let k = a.nrows().min(a.ncols());
        let out = if economy {
            vec![T::into_value(c.top_rows(k)), T::into_value(packed.r_economy())]
        } else {
            vec![T::into_value(c), T::into_value(packed.r())]
        };
        return Ok(out);
    }

    match nargout {
        0 | 1 => {
            let packed = Qr::new(&a);
            let r = if economy { packed.r_economy() } else { packed.r() };
            Ok(vec![T::into_value(r)])
        }
        2 => Ok(outputs(QrFactorization::new(&a, mode))),
        _ => {
            let f = PivotedQr::new(&a, mode);
            let p = if economy {
                let one_based: Vec<f64> = f.permutation().to_one_based().into_iter().map(|p| p as f64).collect();
                Value::Real(DynMatrix::row_vector(&one_based))
            } else {
                Value::Real(f.permutation().to_matrix(0.0))
            };
            Ok(vec![T::into_value(f.q()), T::into_value(f.r()), p])
        }
    }
}

// ── qrupdate ────────────────────────────────────────────────────────

/// `qrupdate(Q, R, u, v)`: factorization of `Q·R + u·vᴴ`.
pub fn qrupdate(args: &[Value]) -> CallResult {
    const F: &str = "qrupdate";
    if args.len() != 4 {
        return Err(CallError::usage(F));
    }
    let domain = common_domain(F, &[&args[0], &args[1], &args[2], &args[3]])?;
    if !check_qr_dims(&args[0], &args[1], true) {
        return Err(CallError::new(F, LinalgError::DimensionMismatch, "Q and R dimensions don't match"));
    }
    debug!("qrupdate: {:?}", domain);
    dispatch!(domain, run_update(args))
}

fn run_update<T: Element>(args: &[Value]) -> CallResult {
    const F: &str = "qrupdate";
    let f = factorization::<T>(F, &args[0], &args[1])?;
    let u = matrix::<T>(F, &args[2])?;
    let v = matrix::<T>(F, &args[3])?;
    let f = f.update(&u, &v).map_err(|k| CallError::engine(F, k))?;
    Ok(outputs(f))
}

// ── qrinsert ────────────────────────────────────────────────────────

/// `qrinsert(Q, R, j, x, orient)`: insert column(s) (`"col"`, the default)
/// or a row (`"row"`, full factorization only) of `x` at 1-based `j`.
pub fn qrinsert(args: &[Value]) -> CallResult {
    const F: &str = "qrinsert";
    if args.len() < 4 || args.len() > 5 {
        return Err(CallError::usage(F));
    }
    let domain = common_domain(F, &[&args[0], &args[1], &args[3]])?;
    let col = orientation(F, args.get(4))?;
    if !check_qr_dims(&args[0], &args[1], col) || (!col && args[3].rows() != 1) {
        return Err(CallError::new(F, LinalgError::DimensionMismatch, "dimension mismatch"));
    }
    let j = indices(F, &args[2], col, "invalid index J")?;
    debug!("qrinsert: {} {:?} at {:?}", if col { "col" } else { "row" }, domain, j);
    dispatch!(domain, run_insert(args, &j, col))
}

fn run_insert<T: Element>(args: &[Value], j: &[usize], col: bool) -> CallResult {
    const F: &str = "qrinsert";
    let f = factorization::<T>(F, &args[0], &args[1])?;
    let x = matrix::<T>(F, &args[3])?;
    let f = if col {
        f.insert_cols(&x, j)
    } else {
        f.insert_row(x.as_slice(), j[0])
    };
    Ok(outputs(f.map_err(|k| CallError::engine(F, k))?))
}

// ── qrdelete ────────────────────────────────────────────────────────

/// `qrdelete(Q, R, j, orient)`: delete column(s) (`"col"`, the default) or a
/// row (`"row"`, full factorization only) at 1-based `j`.
pub fn qrdelete(args: &[Value]) -> CallResult {
    const F: &str = "qrdelete";
    if args.len() < 3 || args.len() > 4 {
        return Err(CallError::usage(F));
    }
    let domain = common_domain(F, &[&args[0], &args[1]])?;
    let col = orientation(F, args.get(3))?;
    if !check_qr_dims(&args[0], &args[1], col) {
        return Err(CallError::new(F, LinalgError::DimensionMismatch, "dimension mismatch"));
    }
    let j = indices(F, &args[2], col, "invalid index J")?;
    debug!("qrdelete: {} {:?} at {:?}", if col { "col" } else { "row" }, domain, j);
    dispatch!(domain, run_delete(args, &j, col))
}

fn run_delete<T: Element>(args: &[Value], j: &[usize], col: bool) -> CallResult {
    const F: &str = "qrdelete";
    let f = factorization::<T>(F, &args[0], &args[1])?;
    let f = if col { f.delete_cols(j) } else { f.delete_row(j[0]) };
    Ok(outputs(f.map_err(|k| CallError::engine(F, k))?))
}

// ── qrshift ─────────────────────────────────────────────────────────

/// `qrshift(Q, R, i, j)`: factorization of `A(:, p)` where column `i`
/// moves to position `j` (1-based).
pub fn qrshift(args: &[Value]) -> CallResult {
    const F: &str = "qrshift";
    if args.len() != 4 {
        return Err(CallError::usage(F));
    }
    let domain = common_domain(F, &[&args[0], &args[1]])?;
    if !check_qr_dims(&args[0], &args[1], true) {
        return Err(CallError::new(F, LinalgError::DimensionMismatch, "dimensions mismatch"));
    }
    let i = indices(F, &args[2], false, "invalid index I or J")?;
    let j = indices(F, &args[3], false, "invalid index I or J")?;
    debug!("qrshift: {:?} {} -> {}", domain, i[0], j[0]);
    dispatch!(domain, run_shift(args, i[0], j[0]))
}

fn run_shift<T: Element>(args: &[Value], i: usize, j: usize) -> CallResult {
    const F: &str = "qrshift";
    let f = factorization::<T>(F, &args[0], &args[1])?;
    let f = f.shift_cols(i, j).map_err(|k| CallError::engine(F, k))?;
    Ok(outputs(f))
}
