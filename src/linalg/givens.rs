use core::ops::Range;

use num_traits::{Float, One, Zero};

use crate::traits::{LinalgScalar, MatrixMut};

/// Plane rotation `G = [c s; -conj(s) c]` with real `c` and `|c|² + |s|² = 1`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Givens<T: LinalgScalar> {
    c: T::Real,
    s: T,
}

impl<T: LinalgScalar> Givens<T> {
    /// Rotation with `G·[f; g] = [r; 0]`. Returns `(G, r)`.
    ///
    /// `g == 0` yields the identity; `f == 0` yields a pure swap with phase.
    pub(crate) fn new(f: T, g: T) -> (Self, T) {
        let zero = <T::Real as Zero>::zero();
        let one = <T::Real as One>::one();
        if g == T::zero() {
            return (Self { c: one, s: T::zero() }, f);
        }
        let gabs = g.modulus();
        if f == T::zero() {
            return (
                Self {
                    c: zero,
                    s: g.conj() / T::from_real(gabs),
                },
                T::from_real(gabs),
            );
        }
        let fabs = f.modulus();
        let norm = fabs.hypot(gabs);
        let phase = f / T::from_real(fabs);
        let c = fabs / norm;
        let s = phase * g.conj() / T::from_real(norm);
        (Self { c, s }, phase * T::from_real(norm))
    }

    /// `[x; y] ← G·[x; y]`
    #[inline]
    pub(crate) fn rotate(&self, x: T, y: T) -> (T, T) {
        let c = T::from_real(self.c);
        (c * x + self.s * y, c * y - self.s.conj() * x)
    }

    /// Rows `p` and `q` of `a` ← `G·[a(p, :); a(q, :)]` over `cols`.
    pub(crate) fn rotate_rows(&self, a: &mut impl MatrixMut<T>, p: usize, q: usize, cols: Range<usize>) {
        for j in cols {
            let (x, y) = self.rotate(*a.get(p, j), *a.get(q, j));
            *a.get_mut(p, j) = x;
            *a.get_mut(q, j) = y;
        }
    }

    /// Columns `p` and `q` of `a` ← `[a(:, p) a(:, q)]·Gᴴ` over all rows.
    pub(crate) fn rotate_cols_adjoint(&self, a: &mut impl MatrixMut<T>, p: usize, q: usize) {
        let c = T::from_real(self.c);
        let sc = self.s.conj();
        for i in 0..a.nrows() {
            let x = *a.get(i, p);
            let y = *a.get(i, q);
            *a.get_mut(i, p) = c * x + sc * y;
            *a.get_mut(i, q) = c * y - self.s * x;
        }
    }
}
