use core::ops::Range;

use num_traits::{Float, One, Zero};

use crate::traits::{LinalgScalar, MatrixMut};

/// Euclidean norm of a slice, scaled to avoid overflow and underflow.
pub(crate) fn norm2<T: LinalgScalar>(x: &[T]) -> T::Real {
    let zero = <T::Real as Zero>::zero();
    let one = <T::Real as One>::one();
    let mut scale = zero;
    let mut ssq = one;
    for &v in x {
        for part in [v.re(), v.im()] {
            if part != zero {
                let a = part.abs();
                if scale < a {
                    let t = scale / a;
                    ssq = one + ssq * t * t;
                    scale = a;
                } else {
                    let t = a / scale;
                    ssq = ssq + t * t;
                }
            }
        }
    }
    scale * ssq.sqrt()
}

/// Generate an elementary reflector `H = I - tau·v·vᴴ` with `Hᴴ·x = beta·e₀`.
///
/// On return `x[0] = beta` (real) and `x[1..]` holds the tail of `v`
/// (`v[0] = 1` is implicit). Returns `tau`. When `x[1..]` is zero and
/// `x[0]` is real, `tau = 0` and `H = I`.
pub(crate) fn make_reflector<T: LinalgScalar>(x: &mut [T]) -> T {
    let Some((alpha, tail)) = x.split_first_mut() else {
        return T::zero();
    };
    let zero = <T::Real as Zero>::zero();
    let xnorm = norm2(tail);
    let alphr = alpha.re();
    let alphi = alpha.im();
    if xnorm == zero && alphi == zero {
        return T::zero();
    }

    let norm = alphr.hypot(alphi).hypot(xnorm);
    let beta = if alphr >= zero { -norm } else { norm };
    let tau = T::from_parts((beta - alphr) / beta, -alphi / beta);
    let scale = T::one() / (*alpha - T::from_real(beta));
    for v in tail.iter_mut() {
        *v = *v * scale;
    }
    *alpha = T::from_real(beta);
    tau
}

/// Apply `I - tau·v·vᴴ` from the left to rows `row..` of `a`, columns `cols`.
///
/// `v_tail` holds `v[1..]`; `v[0] = 1` aligns with `row`. Pass `conj(tau)`
/// to apply the adjoint reflector.
pub(crate) fn apply_reflector<T: LinalgScalar>(
    v_tail: &[T],
    tau: T,
    row: usize,
    a: &mut impl MatrixMut<T>,
    cols: Range<usize>,
) {
    if tau == T::zero() {
        return;
    }
    for j in cols {
        let col = a.col_as_mut_slice(j, row);
        let (head, rest) = col.split_at_mut(1);
        let mut dot = head[0];
        for (vi, ai) in v_tail.iter().zip(rest.iter()) {
            dot = dot + vi.conj() * *ai;
        }
        dot = dot * tau;
        head[0] = head[0] - dot;
        for (vi, ai) in v_tail.iter().zip(rest.iter_mut()) {
            *ai = *ai - dot * *vi;
        }
    }
}
