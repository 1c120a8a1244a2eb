//! Dense QR engine: Householder factorization, column-pivoted factorization,
//! and Givens-based incremental updates of an explicit `(Q, R)` pair.
//!
//! - [`Qr`]: packed Householder output (raw mode), with `q()`/`r()` formed on demand.
//! - [`QrFactorization`]: explicit `Q`, `R` in full or economy shape; owns the
//!   update operations ([`update`](QrFactorization::update),
//!   [`insert_cols`](QrFactorization::insert_cols),
//!   [`delete_cols`](QrFactorization::delete_cols),
//!   [`insert_row`](QrFactorization::insert_row),
//!   [`delete_row`](QrFactorization::delete_row),
//!   [`shift_cols`](QrFactorization::shift_cols)).
//! - [`PivotedQr`]: `A·P = Q·R` with non-increasing `|diag(R)|`.
//! - [`Permutation`]: canonical 0-based index vector.

mod givens;
mod householder;
mod permutation;
mod qr;
mod qrp;
mod update;

pub use permutation::Permutation;
pub use qr::{Qr, QrFactorization, QrMode};
pub use qrp::{PivotSettings, PivotedQr};
pub use update::OrthoSettings;

/// Errors from the factorization engine.
///
/// Every operation validates its operands before touching any numeric data,
/// so an error never leaves a half-updated factorization behind.
///
/// ```
/// use qrfact::DynMatrix;
/// use qrfact::linalg::{LinalgError, QrFactorization, QrMode};
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let f = QrFactorization::new(&a, QrMode::Full);
/// assert_eq!(f.delete_row(5).unwrap_err(), LinalgError::InvalidIndex);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand is not a numeric matrix.
    TypeMismatch,
    /// Q/R shapes are inconsistent, or the edit operand does not fit them.
    DimensionMismatch,
    /// Index is out of range or not a real integer.
    InvalidIndex,
    /// The same index appears more than once in an index list.
    DuplicateIndex,
    /// Wrong number of arguments or outputs, or an unrecognized option.
    Usage,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::TypeMismatch => write!(f, "wrong type argument, expected a numeric matrix"),
            LinalgError::DimensionMismatch => write!(f, "dimension mismatch"),
            LinalgError::InvalidIndex => write!(f, "index out of range"),
            LinalgError::DuplicateIndex => write!(f, "duplicate index in j"),
            LinalgError::Usage => write!(f, "invalid call"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}
