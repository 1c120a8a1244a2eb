use num_traits::Zero;

use crate::traits::LinalgScalar;

use super::DynMatrix;

impl<T: LinalgScalar> DynMatrix<T> {
    /// Frobenius norm (square root of sum of squared moduli).
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        let mut sum = <T::Real as Zero>::zero();
        for &x in &self.data {
            sum = sum + x.modulus_sq();
        }
        sum.lsqrt()
    }

    /// Infinity norm (maximum row sum of moduli).
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert!((m.norm_inf() - 7.0).abs() < 1e-12);
    /// ```
    pub fn norm_inf(&self) -> T::Real {
        let mut best = <T::Real as Zero>::zero();
        for i in 0..self.nrows {
            let mut s = <T::Real as Zero>::zero();
            for j in 0..self.ncols {
                s = s + self[(i, j)].modulus();
            }
            if s > best {
                best = s;
            }
        }
        best
    }

    /// One norm (maximum column sum of moduli).
    pub fn norm_one(&self) -> T::Real {
        let mut best = <T::Real as Zero>::zero();
        for j in 0..self.ncols {
            let start = j * self.nrows;
            let mut s = <T::Real as Zero>::zero();
            for x in &self.data[start..start + self.nrows] {
                s = s + x.modulus();
            }
            if s > best {
                best = s;
            }
        }
        best
    }

    /// Largest element modulus (`norm(vec(A), Inf)`).
    pub fn max_abs(&self) -> T::Real {
        let mut best = <T::Real as Zero>::zero();
        for &x in &self.data {
            let m = x.modulus();
            if m > best {
                best = m;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norms_of_known_matrix() {
        let m = DynMatrix::from_rows(2, 3, &[1.0_f64, -2.0, 3.0, -4.0, 5.0, -6.0]);
        assert!((m.frobenius_norm() - 91.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(m.norm_inf(), 15.0);
        assert_eq!(m.norm_one(), 9.0);
        assert_eq!(m.max_abs(), 6.0);
    }

    #[test]
    fn empty_norms_are_zero() {
        let m = DynMatrix::zeros(0, 4, 0.0_f32);
        assert_eq!(m.frobenius_norm(), 0.0);
        assert_eq!(m.norm_inf(), 0.0);
        assert_eq!(m.max_abs(), 0.0);
    }
}
