use alloc::vec::Vec;

use log::debug;

use crate::linalg::householder::{apply_reflector, make_reflector};
use crate::linalg::LinalgError;
use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

/// Shape of the factors produced by a factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrMode {
    /// Packed reflectors only; `R` and `Q` are formed on request.
    Raw,
    /// `Q` is M×min(M, N), `R` is min(M, N)×N.
    Economy,
    /// `Q` is M×M, `R` is M×N.
    Full,
}

/// Householder QR in place.
///
/// On return the upper trapezoid of `a` holds R and the part below the
/// diagonal holds the reflector tails; `tau` (length min(M, N)) holds the
/// reflector scalars. Any shape is accepted and rank deficiency is not an
/// error: a column that is already reduced gets `tau = 0`.
///
/// For complex matrices the reflectors are `H = I - tau·v·vᴴ` and
/// `A = H₀·H₁·…·R`, so the diagonal of R is real.
pub(crate) fn qr_in_place<T: LinalgScalar>(a: &mut impl MatrixMut<T>, tau: &mut [T]) {
    let m = a.nrows();
    let n = a.ncols();
    let k = m.min(n);
    assert_eq!(tau.len(), k, "tau length must equal min(M, N)");

    for col in 0..k {
        tau[col] = make_reflector(a.col_as_mut_slice(col, col));
        if col + 1 < n {
            let v: Vec<T> = a.col_as_slice(col, col + 1).to_vec();
            apply_reflector(&v, tau[col].conj(), col, a, (col + 1)..n);
        }
    }
}

/// Form the first `qcols` columns of `Q = H₀·H₁·…` from packed reflectors.
pub(crate) fn form_q<T: LinalgScalar>(qr: &DynMatrix<T>, tau: &[T], qcols: usize) -> DynMatrix<T> {
    let m = qr.nrows();
    let mut q = DynMatrix::zeros(m, qcols, T::zero());
    for i in 0..m.min(qcols) {
        q[(i, i)] = T::one();
    }
    for col in (0..tau.len()).rev() {
        let v = qr.col_as_slice(col, col + 1);
        apply_reflector(v, tau[col], col, &mut q, col..qcols);
    }
    q
}

/// Packed Householder QR of an M×N matrix (raw mode).
///
/// # Example
///
/// ```
/// use qrfact::DynMatrix;
/// use qrfact::linalg::Qr;
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let qr = Qr::new(&a);
/// let r = qr.r();
/// assert!((r[(0, 0)] + 10.0_f64.sqrt()).abs() < 1e-12);
/// assert_eq!(r[(1, 0)], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Qr<T> {
    qr: DynMatrix<T>,
    tau: Vec<T>,
}

impl<T: LinalgScalar> Qr<T> {
    /// Factor `a`. Never fails; empty and rank-deficient inputs are valid.
    pub fn new(a: &DynMatrix<T>) -> Self {
        debug!("qr: factoring {}x{}", a.nrows(), a.ncols());
        let mut qr = a.clone();
        let mut tau = alloc::vec![T::zero(); a.nrows().min(a.ncols())];
        qr_in_place(&mut qr, &mut tau);
        Self { qr, tau }
    }

    pub fn nrows(&self) -> usize {
        self.qr.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.qr.ncols()
    }

    /// Packed output: R in the upper trapezoid, reflector tails below.
    pub fn packed(&self) -> &DynMatrix<T> {
        &self.qr
    }

    /// Reflector scalars, one per eliminated column.
    pub fn tau(&self) -> &[T] {
        &self.tau
    }

    /// Upper-trapezoidal R (M×N) with exact zeros below the diagonal.
    pub fn r(&self) -> DynMatrix<T> {
        self.qr.triu()
    }

    /// Economy R: the first min(M, N) rows of [`r`](Self::r).
    pub fn r_economy(&self) -> DynMatrix<T> {
        self.r().top_rows(self.tau.len())
    }

    /// Full unitary Q (M×M).
    pub fn q(&self) -> DynMatrix<T> {
        form_q(&self.qr, &self.tau, self.qr.nrows())
    }

    /// Economy Q (M×min(M, N)) with orthonormal columns.
    pub fn q_economy(&self) -> DynMatrix<T> {
        form_q(&self.qr, &self.tau, self.tau.len())
    }

    /// `Qᴴ·B` without forming Q.
    pub fn apply_qh(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        if b.nrows() != self.qr.nrows() {
            return Err(LinalgError::DimensionMismatch);
        }
        let mut c = b.clone();
        let ncols = c.ncols();
        for col in 0..self.tau.len() {
            let v = self.qr.col_as_slice(col, col + 1);
            apply_reflector(v, self.tau[col].conj(), col, &mut c, 0..ncols);
        }
        Ok(c)
    }

    /// Least-squares solution of `A·X = B` via `R \ (Qᴴ·B)`.
    ///
    /// For M < N the basic solution (trailing unknowns zero) is returned. A
    /// zero on the diagonal of R propagates as an infinite or NaN entry.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// use qrfact::linalg::Qr;
    ///
    /// // y = c0 + c1·x through (0,1), (1,2), (2,4)
    /// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
    /// let b = DynMatrix::col_vector(&[1.0, 2.0, 4.0]);
    /// let x = Qr::new(&a).solve(&b).unwrap();
    /// assert!((x[(0, 0)] - 5.0 / 6.0).abs() < 1e-12);
    /// assert!((x[(1, 0)] - 1.5).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>, LinalgError> {
        let c = self.apply_qh(b)?;
        let n = self.qr.ncols();
        let k = self.tau.len();
        let mut x = DynMatrix::zeros(n, b.ncols(), T::zero());
        for rhs in 0..b.ncols() {
            for i in (0..k).rev() {
                let mut sum = c[(i, rhs)];
                for j in (i + 1)..k {
                    sum = sum - self.qr[(i, j)] * x[(j, rhs)];
                }
                x[(i, rhs)] = sum / self.qr[(i, i)];
            }
        }
        Ok(x)
    }
}

/// Explicit `(Q, R)` pair with `Q·R = A`.
///
/// Full shape: Q is M×M unitary, R is M×N. Economy shape (M > N): Q is M×N
/// with orthonormal columns, R is N×N. The update operations
/// ([`update`](Self::update), [`insert_cols`](Self::insert_cols), …) consume
/// the factorization and return the factorization of the edited matrix.
///
/// ```
/// use qrfact::DynMatrix;
/// use qrfact::linalg::{QrFactorization, QrMode};
///
/// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// let f = QrFactorization::new(&a, QrMode::Economy);
/// assert_eq!((f.q().nrows(), f.q().ncols()), (3, 2));
/// assert!((&(f.q() * f.r()) - &a).max_abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QrFactorization<T> {
    pub(crate) q: DynMatrix<T>,
    pub(crate) r: DynMatrix<T>,
}

impl<T: LinalgScalar> QrFactorization<T> {
    /// Factor `a`. `Raw` is treated as `Full` since both factors are kept.
    pub fn new(a: &DynMatrix<T>, mode: QrMode) -> Self {
        let packed = Qr::new(a);
        match mode {
            QrMode::Economy => Self {
                q: packed.q_economy(),
                r: packed.r_economy(),
            },
            QrMode::Full | QrMode::Raw => Self {
                q: packed.q(),
                r: packed.r(),
            },
        }
    }

    /// Adopt caller-supplied factors after checking their shapes.
    ///
    /// Q must be M×K and R K×N with K = M, or K = N < M (economy). The
    /// numeric content is trusted.
    pub fn from_parts(q: DynMatrix<T>, r: DynMatrix<T>) -> Result<Self, LinalgError> {
        let m = q.nrows();
        let k = r.nrows();
        let n = r.ncols();
        if q.ncols() != k || !(m == k || (k == n && k < m)) {
            return Err(LinalgError::DimensionMismatch);
        }
        Ok(Self { q, r })
    }

    pub fn q(&self) -> &DynMatrix<T> {
        &self.q
    }

    pub fn r(&self) -> &DynMatrix<T> {
        &self.r
    }

    pub fn into_parts(self) -> (DynMatrix<T>, DynMatrix<T>) {
        (self.q, self.r)
    }

    /// Rows of the factored matrix.
    pub fn nrows(&self) -> usize {
        self.q.nrows()
    }

    /// Columns of the factored matrix.
    pub fn ncols(&self) -> usize {
        self.r.ncols()
    }

    /// Q is square.
    pub fn is_full(&self) -> bool {
        self.q.is_square()
    }

    /// Q has fewer columns than rows.
    pub fn is_economy(&self) -> bool {
        !self.is_full()
    }

    /// R is square with a nonzero diagonal.
    pub fn is_regular(&self) -> bool {
        self.r.is_square() && (0..self.r.nrows()).all(|i| !self.r[(i, i)].is_zero())
    }

    /// `Q·R`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.q * &self.r
    }
}
