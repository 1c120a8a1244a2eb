//! Incremental updates of an explicit `(Q, R)` pair.
//!
//! Every edit is expressed as a short sequence of Givens rotations `G` applied
//! as `R ← G·R`, `Q ← Q·Gᴴ`, which keeps `Q·R` invariant. Entries that a
//! rotation annihilates are written as exact zeros, so `R` stays exactly upper
//! trapezoidal.

use alloc::vec::Vec;

use log::{debug, warn};
use num_traits::{Float, Zero};

use crate::linalg::givens::Givens;
use crate::linalg::householder::norm2;
use crate::linalg::{LinalgError, QrFactorization};
use crate::traits::{FloatScalar, LinalgScalar, MatrixRef};
use crate::DynMatrix;

/// Tunables for growing an economy `Q` by one column.
#[derive(Debug, Clone, Copy)]
pub struct OrthoSettings<R> {
    /// A Gram-Schmidt pass that keeps less than this fraction of the vector's
    /// norm is repeated once; if the repeat also falls below it, the vector is
    /// treated as lying in `range(Q)`.
    pub reorth_ratio: R,
}

impl<R: FloatScalar> Default for OrthoSettings<R> {
    fn default() -> Self {
        let two = R::one() + R::one();
        Self {
            reorth_ratio: two.sqrt().recip(),
        }
    }
}

/// `Qᴴ·x`
fn qh_times<T: LinalgScalar>(q: &DynMatrix<T>, x: &[T]) -> Vec<T> {
    (0..q.ncols())
        .map(|c| {
            let mut acc = T::zero();
            for (i, &xi) in x.iter().enumerate() {
                acc = acc + q[(i, c)].conj() * xi;
            }
            acc
        })
        .collect()
}

/// `x ← x - Q·w`
fn sub_q_times<T: LinalgScalar>(q: &DynMatrix<T>, w: &[T], x: &mut [T]) {
    for (c, &wc) in w.iter().enumerate() {
        for (i, xi) in x.iter_mut().enumerate() {
            *xi = *xi - q[(i, c)] * wc;
        }
    }
}

/// Where a vector sits relative to `range(Q)` after projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    /// The vector itself is zero.
    Zero,
    /// Nothing survives two Gram-Schmidt passes.
    Inside,
    /// A usable residual remains.
    Outside,
}

/// Project `x` off `range(Q)` with at most two classical Gram-Schmidt passes.
///
/// Returns `(w, r, span)` with `x = Q·w + r`.
fn project_out<T: LinalgScalar>(q: &DynMatrix<T>, x: &[T], ratio: T::Real) -> (Vec<T>, Vec<T>, Span) {
    let zero = <T::Real as Zero>::zero();
    let xnorm = norm2(x);
    let mut w = qh_times(q, x);
    let mut r = x.to_vec();
    if xnorm == zero {
        return (w, r, Span::Zero);
    }
    sub_q_times(q, &w, &mut r);
    let rnorm = norm2(&r);
    if rnorm >= ratio * xnorm {
        return (w, r, Span::Outside);
    }

    let w2 = qh_times(q, &r);
    sub_q_times(q, &w2, &mut r);
    for (a, b) in w.iter_mut().zip(w2) {
        *a = *a + b;
    }
    let span = if norm2(&r) < ratio * rnorm { Span::Inside } else { Span::Outside };
    (w, r, span)
}

/// Unit vector orthogonal to `range(Q)` (requires `Q.ncols() < Q.nrows()`).
///
/// Starts from the canonical basis vector whose row of `Q` has the smallest
/// norm, which guarantees a residual of at least `sqrt(1 - k/m)`.
fn complement_vector<T: LinalgScalar>(q: &DynMatrix<T>) -> Vec<T> {
    let m = q.nrows();
    let mut best = 0;
    let mut best_norm = <T::Real as Float>::infinity();
    for i in 0..m {
        let mut s = <T::Real as Zero>::zero();
        for c in 0..q.ncols() {
            s = s + q[(i, c)].modulus_sq();
        }
        if s < best_norm {
            best_norm = s;
            best = i;
        }
    }
    let mut e = alloc::vec![T::zero(); m];
    e[best] = T::one();
    for _ in 0..2 {
        let w = qh_times(q, &e);
        sub_q_times(q, &w, &mut e);
    }
    let scale = T::from_real(norm2(&e));
    for v in e.iter_mut() {
        *v = *v / scale;
    }
    e
}

/// New orthonormal direction for an economy `Q` absorbing `x`.
///
/// Returns `(w, q_new, rho)` with `x ≈ Q·w + rho·q_new`.
fn extend_basis<T: LinalgScalar>(q: &DynMatrix<T>, x: &[T], ratio: T::Real) -> (Vec<T>, Vec<T>, T::Real) {
    let (w, r, span) = project_out(q, x, ratio);
    match span {
        Span::Zero => return (w, complement_vector(q), <T::Real as Zero>::zero()),
        Span::Inside => {
            warn!("qr: inserted data lies in range(Q); completing the basis with a canonical vector");
            return (w, complement_vector(q), <T::Real as Zero>::zero());
        }
        Span::Outside => {}
    }
    let rho = norm2(&r);
    let scale = T::from_real(rho);
    let q_new = r.into_iter().map(|v| v / scale).collect();
    (w, q_new, rho)
}

/// Zero `R[row, col]` against `R[p, col]` with a rotation on rows `(p, row)`.
fn annihilate<T: LinalgScalar>(q: &mut DynMatrix<T>, r: &mut DynMatrix<T>, p: usize, row: usize, col: usize) {
    let (g, rr) = Givens::new(r[(p, col)], r[(row, col)]);
    r[(p, col)] = rr;
    r[(row, col)] = T::zero();
    let n = r.ncols();
    g.rotate_rows(r, p, row, (col + 1)..n);
    g.rotate_cols_adjoint(q, p, row);
}

/// Append one column to `Q` and one zero row to `R`.
fn grow<T: LinalgScalar>(q: &DynMatrix<T>, r: &DynMatrix<T>, q_new: &[T]) -> (DynMatrix<T>, DynMatrix<T>) {
    let q1 = q.insert_cols(q.ncols(), &DynMatrix::from_slice(q.nrows(), 1, q_new));
    let r1 = r.insert_rows(r.nrows(), &DynMatrix::zeros(1, r.ncols(), T::zero()));
    (q1, r1)
}

/// Rank-1 update with `w = Qᴴ·u` already formed and `len(w) = Q.ncols()`.
fn rank1_core<T: LinalgScalar>(q: &mut DynMatrix<T>, r: &mut DynMatrix<T>, mut w: Vec<T>, v: &[T]) {
    let k = w.len();
    let n = r.ncols();

    // Reduce w to a multiple of e₀; R becomes upper Hessenberg.
    for i in (1..k).rev() {
        let (g, rr) = Givens::new(w[i - 1], w[i]);
        w[i - 1] = rr;
        w[i] = T::zero();
        g.rotate_rows(r, i - 1, i, (i - 1)..n);
        g.rotate_cols_adjoint(q, i - 1, i);
    }

    if k > 0 {
        for (c, &vc) in v.iter().enumerate() {
            r[(0, c)] = r[(0, c)] + w[0] * vc.conj();
        }
    }

    for c in 0..n.min(k.saturating_sub(1)) {
        annihilate(q, r, c, c + 1, c);
    }
}

impl<T: LinalgScalar> QrFactorization<T> {
    fn rank1(self, u: &[T], v: &[T], settings: &OrthoSettings<T::Real>) -> Self {
        let QrFactorization { mut q, mut r } = self;
        if q.is_square() {
            let w = qh_times(&q, u);
            rank1_core(&mut q, &mut r, w, v);
            return Self { q, r };
        }

        let k = q.ncols();
        let (mut w, q_new, rho) = extend_basis(&q, u, settings.reorth_ratio);
        w.push(T::from_real(rho));
        let (mut q1, mut r1) = grow(&q, &r, &q_new);
        rank1_core(&mut q1, &mut r1, w, v);
        Self {
            q: q1.left_cols(k),
            r: r1.top_rows(k),
        }
    }

    /// Factorization of `A + u·vᴴ`.
    ///
    /// `u` is M×p and `v` is N×p; the update is applied as p successive
    /// rank-1 updates. A single vector may be passed as a row or a column.
    /// For real data `vᴴ = vᵀ`.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// use qrfact::linalg::{QrFactorization, QrMode};
    ///
    /// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 7.0]);
    /// let u = DynMatrix::col_vector(&[1.0, 0.0, -1.0]);
    /// let v = DynMatrix::col_vector(&[0.5, 2.0]);
    /// let f = QrFactorization::new(&a, QrMode::Full).update(&u, &v).unwrap();
    /// let expected = &a + &(&u * &v.transpose());
    /// assert!((&f.reconstruct() - &expected).max_abs() < 1e-12);
    /// ```
    pub fn update(self, u: &DynMatrix<T>, v: &DynMatrix<T>) -> Result<Self, LinalgError> {
        self.update_with(u, v, &OrthoSettings::default())
    }

    pub fn update_with(
        self,
        u: &DynMatrix<T>,
        v: &DynMatrix<T>,
        settings: &OrthoSettings<T::Real>,
    ) -> Result<Self, LinalgError> {
        let m = self.nrows();
        let n = self.ncols();
        let single = u.is_vector() && v.is_vector() && u.len() == m && v.len() == n;
        if !single && (u.nrows() != m || v.nrows() != n || u.ncols() != v.ncols()) {
            return Err(LinalgError::DimensionMismatch);
        }
        let p = if single { 1 } else { u.ncols() };
        debug!("qrupdate: rank-{} update of {}x{} ({} Q)", p, m, n, if self.is_full() { "full" } else { "economy" });
        if p > 1 && 2 * p >= n {
            warn!("qrupdate: rank-{} update of a {}-column factorization; refactoring may be faster and more accurate", p, n);
        }

        if single {
            return Ok(self.rank1(u.as_slice(), v.as_slice(), settings));
        }
        let mut f = self;
        for c in 0..p {
            f = f.rank1(u.col_as_slice(c, 0), v.col_as_slice(c, 0), settings);
        }
        Ok(f)
    }

    fn insert_one_col(self, x: &[T], j: usize, settings: &OrthoSettings<T::Real>) -> Self {
        let QrFactorization { q, r } = self;
        let (mut q, mut r) = if q.is_square() {
            let w = qh_times(&q, x);
            let r = r.insert_cols(j, &DynMatrix::from_vec(w.len(), 1, w));
            (q, r)
        } else {
            let (mut w, q_new, rho) = extend_basis(&q, x, settings.reorth_ratio);
            w.push(T::from_real(rho));
            let (q1, r1) = grow(&q, &r, &q_new);
            let r1 = r1.insert_cols(j, &DynMatrix::from_vec(w.len(), 1, w));
            (q1, r1)
        };

        let kk = r.nrows();
        for i in ((j + 1)..kk).rev() {
            annihilate(&mut q, &mut r, i - 1, i, j);
        }
        Self { q, r }
    }

    /// Factorization of `A` with the columns of `x` inserted.
    ///
    /// `j[c]` is the 0-based position that column `c` of `x` occupies in the
    /// enlarged matrix. An economy factorization grows `Q` by one column per
    /// inserted column until `Q` is square.
    pub fn insert_cols(self, x: &DynMatrix<T>, j: &[usize]) -> Result<Self, LinalgError> {
        self.insert_cols_with(x, j, &OrthoSettings::default())
    }

    pub fn insert_cols_with(
        self,
        x: &DynMatrix<T>,
        j: &[usize],
        settings: &OrthoSettings<T::Real>,
    ) -> Result<Self, LinalgError> {
        let m = self.nrows();
        let n = self.ncols();
        if x.nrows() != m || x.ncols() != j.len() {
            return Err(LinalgError::DimensionMismatch);
        }
        let mut order: Vec<(usize, usize)> = j.iter().copied().zip(0..).collect();
        order.sort_unstable();
        if order.windows(2).any(|p| p[0].0 == p[1].0) {
            return Err(LinalgError::DuplicateIndex);
        }
        if order.iter().any(|&(pos, _)| pos >= n + j.len()) {
            return Err(LinalgError::InvalidIndex);
        }
        debug!("qrinsert: {} column(s) into {}x{}", j.len(), m, n);

        let mut f = self;
        for (pos, c) in order {
            f = f.insert_one_col(x.col_as_slice(c, 0), pos, settings);
        }
        Ok(f)
    }

    /// Single-column form of [`insert_cols`](Self::insert_cols); `j ∈ 0..=N`.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// use qrfact::linalg::{QrFactorization, QrMode};
    ///
    /// let a = DynMatrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 7.0]);
    /// let f = QrFactorization::new(&a, QrMode::Full)
    ///     .insert_col(&[1.0, 1.0, 1.0], 1)
    ///     .unwrap();
    /// assert_eq!(f.ncols(), 3);
    /// assert!((f.reconstruct()[(2, 1)] - 1.0).abs() < 1e-12);
    /// ```
    pub fn insert_col(self, x: &[T], j: usize) -> Result<Self, LinalgError> {
        let x = DynMatrix::from_slice(x.len(), 1, x);
        self.insert_cols(&x, &[j])
    }

    fn delete_one_col(self, j: usize) -> Self {
        let QrFactorization { mut q, r } = self;
        let mut r = r.remove_col(j);
        let kk = r.nrows();
        let n = r.ncols();
        for c in j..n.min(kk.saturating_sub(1)) {
            annihilate(&mut q, &mut r, c, c + 1, c);
        }
        if !q.is_square() {
            let k = kk - 1;
            return Self {
                q: q.left_cols(k),
                r: r.top_rows(k),
            };
        }
        Self { q, r }
    }

    /// Factorization of `A` with columns `j` (0-based, original numbering)
    /// removed. An economy factorization shrinks by one per deleted column.
    pub fn delete_cols(self, j: &[usize]) -> Result<Self, LinalgError> {
        let n = self.ncols();
        let mut order = j.to_vec();
        order.sort_unstable_by(|a, b| b.cmp(a));
        if order.windows(2).any(|p| p[0] == p[1]) {
            return Err(LinalgError::DuplicateIndex);
        }
        if order.iter().any(|&c| c >= n) {
            return Err(LinalgError::InvalidIndex);
        }
        debug!("qrdelete: {} column(s) from {}x{}", j.len(), self.nrows(), n);

        let mut f = self;
        for c in order {
            f = f.delete_one_col(c);
        }
        Ok(f)
    }

    /// Single-column form of [`delete_cols`](Self::delete_cols).
    pub fn delete_col(self, j: usize) -> Result<Self, LinalgError> {
        self.delete_cols(&[j])
    }

    /// Factorization of `A` with row `x` inserted before row `j` (`j ∈ 0..=M`).
    ///
    /// Requires a full (square `Q`) factorization.
    pub fn insert_row(self, x: &[T], j: usize) -> Result<Self, LinalgError> {
        let m = self.nrows();
        let n = self.ncols();
        if !self.is_full() || x.len() != n {
            return Err(LinalgError::DimensionMismatch);
        }
        if j > m {
            return Err(LinalgError::InvalidIndex);
        }
        debug!("qrinsert: row at {} into {}x{}", j, m, n);

        let QrFactorization { q, r } = self;
        let mut r1 = r.insert_rows(0, &DynMatrix::from_slice(1, n, x));
        let mut q1 = DynMatrix::zeros(m + 1, m + 1, T::zero());
        q1[(0, 0)] = T::one();
        q1.set_block(1, 1, &q);

        for i in 0..m.min(n) {
            annihilate(&mut q1, &mut r1, i, i + 1, i);
        }

        let rows: Vec<usize> = (0..=m)
            .map(|i| match i.cmp(&j) {
                core::cmp::Ordering::Less => i + 1,
                core::cmp::Ordering::Equal => 0,
                core::cmp::Ordering::Greater => i,
            })
            .collect();
        Ok(Self {
            q: q1.select_rows(&rows),
            r: r1,
        })
    }

    /// Factorization of `A` with row `j` removed (`j ∈ 0..M`).
    ///
    /// Requires a full (square `Q`) factorization.
    pub fn delete_row(self, j: usize) -> Result<Self, LinalgError> {
        let m = self.nrows();
        let n = self.ncols();
        if !self.is_full() {
            return Err(LinalgError::DimensionMismatch);
        }
        if j >= m {
            return Err(LinalgError::InvalidIndex);
        }
        debug!("qrdelete: row {} from {}x{}", j, m, n);

        let QrFactorization { mut q, mut r } = self;
        let mut w: Vec<T> = (0..m).map(|c| q[(j, c)].conj()).collect();
        for i in (1..m).rev() {
            let (g, rr) = Givens::new(w[i - 1], w[i]);
            w[i - 1] = rr;
            w[i] = T::zero();
            g.rotate_rows(&mut r, i - 1, i, (i - 1)..n);
            g.rotate_cols_adjoint(&mut q, i - 1, i);
        }

        let keep: Vec<usize> = (0..m).filter(|&i| i != j).collect();
        let q = q.select_rows(&keep).block(0, 1, m - 1, m - 1);
        let r = r.block(1, 0, m - 1, n);
        Ok(Self { q, r })
    }

    /// Factorization of `A(:, p)` where column `i` moves to position `j`.
    ///
    /// `i < j` shifts columns `i+1..=j` left; `i > j` shifts columns `j..i`
    /// right; `i == j` leaves the factorization unchanged.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// use qrfact::linalg::{QrFactorization, QrMode};
    ///
    /// let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 7.0]);
    /// let f = QrFactorization::new(&a, QrMode::Full).shift_cols(0, 2).unwrap();
    /// let shifted = a.select_cols(&[1, 2, 0]);
    /// assert!((&f.reconstruct() - &shifted).max_abs() < 1e-12);
    /// ```
    pub fn shift_cols(self, i: usize, j: usize) -> Result<Self, LinalgError> {
        let n = self.ncols();
        if i >= n || j >= n {
            return Err(LinalgError::InvalidIndex);
        }
        debug!("qrshift: column {} to {} in {}x{}", i, j, self.nrows(), n);
        if i == j {
            return Ok(self);
        }

        let QrFactorization { mut q, r } = self;
        let kk = r.nrows();
        let mut p: Vec<usize> = (0..n).collect();
        if i < j {
            p[i..=j].rotate_left(1);
        } else {
            p[j..=i].rotate_right(1);
        }
        let mut r = r.select_cols(&p);

        if i < j {
            for c in i..j {
                if c + 1 >= kk {
                    break;
                }
                annihilate(&mut q, &mut r, c, c + 1, c);
            }
        } else {
            for row in ((j + 1)..=i.min(kk.saturating_sub(1))).rev() {
                annihilate(&mut q, &mut r, row - 1, row, j);
            }
        }
        Ok(Self { q, r })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::QrMode;

    fn sample(m: usize, n: usize) -> DynMatrix<f64> {
        DynMatrix::from_fn(m, n, |i, j| {
            let x = (i * 7 + j * 3 + 1) as f64;
            (x * 0.37).sin() + if i == j { 2.0 } else { 0.0 }
        })
    }

    fn check(f: &QrFactorization<f64>, a: &DynMatrix<f64>) {
        let q = f.q();
        let qtq = &q.adjoint() * q;
        let orth = (&qtq - &DynMatrix::eye(q.ncols(), 0.0)).norm_inf();
        assert!(orth < 32.0 * f64::EPSILON * q.nrows() as f64, "orthogonality {}", orth);
        assert!(f.r().is_upper_triangular(), "R not upper triangular:\n{}", f.r());
        let err = (&f.reconstruct() - a).norm_inf();
        assert!(err < 1e-13 * a.norm_inf().max(1.0), "reconstruction {}", err);
    }

    #[test]
    fn rank1_update_full_and_economy() {
        let a = sample(5, 3);
        let u = DynMatrix::col_vector(&[0.3, -1.0, 0.5, 2.0, 0.1]);
        let v = DynMatrix::row_vector(&[1.0, 0.25, -0.5]);
        let expected = &a + &(&u * &v);
        for mode in [QrMode::Full, QrMode::Economy] {
            let f = QrFactorization::new(&a, mode).update(&u, &v).unwrap();
            check(&f, &expected);
        }
    }

    #[test]
    fn rank_k_update() {
        let a = sample(4, 4);
        let u = sample(4, 2);
        let v = DynMatrix::from_fn(4, 2, |i, j| (i as f64 - j as f64) * 0.5);
        let expected = &a + &(&u * &v.transpose());
        let f = QrFactorization::new(&a, QrMode::Full).update(&u, &v).unwrap();
        check(&f, &expected);
    }

    #[test]
    fn update_with_u_in_range_of_economy_q() {
        let a = sample(5, 2);
        let u = a.col(0);
        let v = DynMatrix::col_vector(&[1.0, 1.0]);
        let expected = &a + &(&u * &v.transpose());
        let f = QrFactorization::new(&a, QrMode::Economy).update(&u, &v).unwrap();
        check(&f, &expected);
    }

    #[test]
    fn projection_separates_zero_from_dependent() {
        let a = sample(5, 2);
        let q = QrFactorization::new(&a, QrMode::Economy).q().clone();
        let ratio = core::f64::consts::FRAC_1_SQRT_2;

        let (w, _, span) = project_out(&q, &[0.0; 5], ratio);
        assert_eq!(span, Span::Zero);
        assert!(w.iter().all(|&x| x == 0.0));

        let (_, _, span) = project_out(&q, a.col(1).as_slice(), ratio);
        assert_eq!(span, Span::Inside);

        let (_, _, span) = project_out(&q, &[1.0, -2.0, 0.5, 3.0, -1.0], ratio);
        assert_eq!(span, Span::Outside);
    }

    #[test]
    fn economy_update_with_zero_u() {
        let a = sample(5, 2);
        let u = DynMatrix::col_vector(&[0.0; 5]);
        let v = DynMatrix::col_vector(&[1.0, -1.0]);
        let f = QrFactorization::new(&a, QrMode::Economy).update(&u, &v).unwrap();
        check(&f, &a);
    }

    #[test]
    fn update_rejects_bad_shapes() {
        let f = QrFactorization::new(&sample(3, 2), QrMode::Full);
        let u = DynMatrix::col_vector(&[1.0, 2.0]);
        let v = DynMatrix::col_vector(&[1.0, 2.0]);
        assert_eq!(f.update(&u, &v).unwrap_err(), LinalgError::DimensionMismatch);
    }

    #[test]
    fn insert_and_delete_columns() {
        let a = sample(5, 3);
        let x = sample(5, 2);
        let b = a.insert_cols(1, &x.col(0)).insert_cols(3, &x.col(1));
        for mode in [QrMode::Full, QrMode::Economy] {
            let f = QrFactorization::new(&a, mode).insert_cols(&x, &[1, 3]).unwrap();
            check(&f, &b);
            let back = f.delete_cols(&[3, 1]).unwrap();
            check(&back, &a);
        }
    }

    #[test]
    fn economy_delete_shrinks() {
        let a = sample(5, 3);
        let f = QrFactorization::new(&a, QrMode::Economy).delete_col(1).unwrap();
        assert_eq!((f.q().nrows(), f.q().ncols()), (5, 2));
        assert_eq!((f.r().nrows(), f.r().ncols()), (2, 2));
        check(&f, &a.remove_col(1));
    }

    #[test]
    fn insert_column_order_does_not_matter() {
        let a = sample(4, 2);
        let x = sample(4, 2);
        let f1 = QrFactorization::new(&a, QrMode::Full).insert_cols(&x, &[0, 3]).unwrap();
        let swapped = x.select_cols(&[1, 0]);
        let f2 = QrFactorization::new(&a, QrMode::Full).insert_cols(&swapped, &[3, 0]).unwrap();
        assert!((&f1.reconstruct() - &f2.reconstruct()).max_abs() < 1e-13);
    }

    #[test]
    fn economy_insert_fills_up_to_square() {
        let a = sample(3, 2);
        let x = sample(3, 2);
        let f = QrFactorization::new(&a, QrMode::Economy).insert_cols(&x, &[0, 1]).unwrap();
        assert!(f.is_full());
        assert_eq!((f.r().nrows(), f.r().ncols()), (3, 4));
        check(&f, &a.insert_cols(0, &x));
    }

    #[test]
    fn economy_insert_dependent_column() {
        let a = sample(5, 2);
        let x = &a.col(0) * 2.0;
        let f = QrFactorization::new(&a, QrMode::Economy).insert_col(x.as_slice(), 2).unwrap();
        check(&f, &a.insert_cols(2, &x));
    }

    #[test]
    fn column_index_errors() {
        let f = QrFactorization::new(&sample(4, 3), QrMode::Full);
        let x = sample(4, 2);
        assert_eq!(f.clone().insert_cols(&x, &[1, 1]).unwrap_err(), LinalgError::DuplicateIndex);
        assert_eq!(f.clone().insert_cols(&x, &[0, 5]).unwrap_err(), LinalgError::InvalidIndex);
        assert_eq!(f.clone().insert_cols(&x, &[0]).unwrap_err(), LinalgError::DimensionMismatch);
        assert_eq!(f.clone().delete_cols(&[2, 2]).unwrap_err(), LinalgError::DuplicateIndex);
        assert_eq!(f.delete_col(3).unwrap_err(), LinalgError::InvalidIndex);
    }

    #[test]
    fn insert_and_delete_rows() {
        let a = sample(4, 3);
        let x = [0.5, -1.5, 2.0];
        for j in 0..=4 {
            let b = a.insert_rows(j, &DynMatrix::row_vector(&x));
            let f = QrFactorization::new(&a, QrMode::Full).insert_row(&x, j).unwrap();
            check(&f, &b);
            let back = f.delete_row(j).unwrap();
            check(&back, &a);
        }
    }

    #[test]
    fn row_edits_on_wide_and_tiny_matrices() {
        let a = sample(2, 4);
        let f = QrFactorization::new(&a, QrMode::Full).delete_row(1).unwrap();
        check(&f, &a.remove_row(1));

        let one = sample(1, 3);
        let f = QrFactorization::new(&one, QrMode::Full).delete_row(0).unwrap();
        assert_eq!((f.q().nrows(), f.r().nrows(), f.r().ncols()), (0, 0, 3));
    }

    #[test]
    fn row_edits_require_full_q() {
        let f = QrFactorization::new(&sample(4, 2), QrMode::Economy);
        assert_eq!(f.clone().insert_row(&[1.0, 2.0], 0).unwrap_err(), LinalgError::DimensionMismatch);
        assert_eq!(f.delete_row(0).unwrap_err(), LinalgError::DimensionMismatch);

        let f = QrFactorization::new(&sample(4, 2), QrMode::Full);
        assert_eq!(f.clone().insert_row(&[1.0, 2.0], 5).unwrap_err(), LinalgError::InvalidIndex);
        assert_eq!(f.clone().insert_row(&[1.0], 0).unwrap_err(), LinalgError::DimensionMismatch);
        assert_eq!(f.delete_row(4).unwrap_err(), LinalgError::InvalidIndex);
    }

    #[test]
    fn shifts_in_both_directions() {
        let a = sample(3, 5);
        for (i, j) in [(1, 3), (3, 1), (0, 4), (4, 0)] {
            let mut p: Vec<usize> = (0..5).collect();
            if i < j {
                p[i..=j].rotate_left(1);
            } else {
                p[j..=i].rotate_right(1);
            }
            let f = QrFactorization::new(&a, QrMode::Full).shift_cols(i, j).unwrap();
            check(&f, &a.select_cols(&p));
        }
        let tall = sample(6, 3);
        let f = QrFactorization::new(&tall, QrMode::Economy).shift_cols(2, 0).unwrap();
        check(&f, &tall.select_cols(&[2, 0, 1]));
    }

    #[test]
    fn shift_noop_and_errors() {
        let f = QrFactorization::new(&sample(3, 3), QrMode::Full);
        assert_eq!(f.clone().shift_cols(1, 1).unwrap(), f);
        assert_eq!(f.shift_cols(0, 3).unwrap_err(), LinalgError::InvalidIndex);
    }

    #[test]
    fn single_precision_update() {
        let a = DynMatrix::from_fn(4, 3, |i, j| ((i + 2 * j) as f32 * 0.3).cos());
        let u = DynMatrix::col_vector(&[1.0_f32, -1.0, 0.5, 0.0]);
        let v = DynMatrix::col_vector(&[0.2_f32, 0.4, 0.6]);
        let expected = &a + &(&u * &v.transpose());
        let f = QrFactorization::new(&a, QrMode::Full).update(&u, &v).unwrap();
        assert!(f.r().is_upper_triangular());
        assert!((&f.reconstruct() - &expected).max_abs() < 1e-5);
    }
}
