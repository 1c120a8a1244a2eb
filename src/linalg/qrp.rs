use alloc::vec::Vec;

use log::{debug, trace};
use num_traits::{Float, Zero};

use crate::linalg::householder::{apply_reflector, make_reflector, norm2};
use crate::linalg::permutation::Permutation;
use crate::linalg::qr::{form_q, QrMode};
use crate::traits::{FloatScalar, LinalgScalar, MatrixMut, MatrixRef};
use crate::DynMatrix;

/// Tunables for column-pivoted QR.
#[derive(Debug, Clone, Copy)]
pub struct PivotSettings<R> {
    /// A downdated column norm whose relative accuracy estimate drops to this
    /// value or below is recomputed from the trailing rows.
    pub norm_recompute_tol: R,
}

impl<R: FloatScalar> Default for PivotSettings<R> {
    fn default() -> Self {
        Self {
            norm_recompute_tol: R::epsilon().sqrt(),
        }
    }
}

/// Column-pivoted QR: `A·P = Q·R` with `|R[0,0]| ≥ |R[1,1]| ≥ …`.
///
/// At each step the remaining column with the largest 2-norm is moved into
/// pivot position; ties go to the leftmost column.
///
/// ```
/// use qrfact::DynMatrix;
/// use qrfact::linalg::{PivotedQr, QrMode};
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let f = PivotedQr::new(&a, QrMode::Full);
/// assert_eq!(f.permutation().as_slice(), &[1, 0]);
/// assert!((f.r()[(0, 0)] + 20.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PivotedQr<T> {
    qr: DynMatrix<T>,
    tau: Vec<T>,
    perm: Permutation,
    mode: QrMode,
}

impl<T: LinalgScalar> PivotedQr<T> {
    /// Factor with default [`PivotSettings`].
    pub fn new(a: &DynMatrix<T>, mode: QrMode) -> Self {
        Self::with_settings(a, mode, &PivotSettings::default())
    }

    pub fn with_settings(a: &DynMatrix<T>, mode: QrMode, settings: &PivotSettings<T::Real>) -> Self {
        let m = a.nrows();
        let n = a.ncols();
        let k = m.min(n);
        debug!("qrp: factoring {}x{} ({:?})", m, n, mode);

        let mut qr = a.clone();
        let mut tau = alloc::vec![T::zero(); k];
        let mut perm = Permutation::identity(n);

        // vn1: running norm estimate, vn2: norm at last recompute
        let mut vn1: Vec<T::Real> = (0..n).map(|j| norm2(qr.col_as_slice(j, 0))).collect();
        let mut vn2 = vn1.clone();

        for i in 0..k {
            let mut pvt = i;
            for j in (i + 1)..n {
                if vn1[j] > vn1[pvt] {
                    pvt = j;
                }
            }
            if pvt != i {
                qr.swap_cols(pvt, i);
                perm.swap(pvt, i);
                vn1[pvt] = vn1[i];
                vn2[pvt] = vn2[i];
            }
            trace!("qrp: step {} pivots column {}", i, perm.as_slice()[i]);

            tau[i] = make_reflector(qr.col_as_mut_slice(i, i));
            if i + 1 < n {
                let v: Vec<T> = qr.col_as_slice(i, i + 1).to_vec();
                apply_reflector(&v, tau[i].conj(), i, &mut qr, (i + 1)..n);
            }

            downdate_norms(&qr, i, &mut vn1, &mut vn2, settings.norm_recompute_tol);
        }

        Self { qr, tau, perm, mode }
    }

    pub fn mode(&self) -> QrMode {
        self.mode
    }

    /// Column permutation `P`, as a 0-based index vector.
    pub fn permutation(&self) -> &Permutation {
        &self.perm
    }

    /// R with exact zeros below the diagonal; min(M, N)×N in economy mode.
    pub fn r(&self) -> DynMatrix<T> {
        let r = self.qr.triu();
        match self.mode {
            QrMode::Economy => r.top_rows(self.tau.len()),
            QrMode::Full | QrMode::Raw => r,
        }
    }

    /// Q (M×M, or M×min(M, N) in economy mode).
    pub fn q(&self) -> DynMatrix<T> {
        let qcols = match self.mode {
            QrMode::Economy => self.tau.len(),
            QrMode::Full | QrMode::Raw => self.qr.nrows(),
        };
        form_q(&self.qr, &self.tau, qcols)
    }
}

/// Update trailing column norms after step `i` has been applied.
fn downdate_norms<T: LinalgScalar>(
    qr: &DynMatrix<T>,
    i: usize,
    vn1: &mut [T::Real],
    vn2: &mut [T::Real],
    tol: T::Real,
) {
    let zero = <T::Real as Zero>::zero();
    let one = <T::Real as num_traits::One>::one();
    let m = qr.nrows();
    for j in (i + 1)..qr.ncols() {
        if vn1[j] == zero {
            continue;
        }
        let ratio = qr[(i, j)].modulus() / vn1[j];
        let temp = (one - ratio * ratio).max(zero);
        let scale = vn1[j] / vn2[j];
        if temp * scale * scale <= tol {
            vn1[j] = if i + 1 < m {
                norm2(qr.col_as_slice(j, i + 1))
            } else {
                zero
            };
            vn2[j] = vn1[j];
        } else {
            vn1[j] = vn1[j] * temp.sqrt();
        }
    }
}
