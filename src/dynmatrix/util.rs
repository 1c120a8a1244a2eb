use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::traits::{LinalgScalar, Scalar};

use super::DynMatrix;

// ── Map ─────────────────────────────────────────────────────────────

impl<T> DynMatrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_slice(2, 2, &[1.0_f64, 4.0, 9.0, 16.0]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DynMatrix<U>
    where
        T: Copy,
    {
        let data: Vec<U> = self.data.iter().map(|&x| f(x)).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Transpose / triangular parts ────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Transpose (no conjugation).
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = m.transpose();
    /// assert_eq!((t.nrows(), t.ncols()), (3, 2));
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Self {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// Upper-triangular (trapezoidal) part; entries below the diagonal are
    /// set to exactly zero.
    pub fn triu(&self) -> Self {
        DynMatrix::from_fn(self.nrows, self.ncols, |i, j| {
            if i <= j {
                self[(i, j)]
            } else {
                T::zero()
            }
        })
    }

    /// Whether every entry below the main diagonal is exactly zero.
    pub fn is_upper_triangular(&self) -> bool {
        (0..self.ncols).all(|j| ((j + 1)..self.nrows).all(|i| self[(i, j)] == T::zero()))
    }

    /// Swap two columns in place.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            let m = self.nrows;
            for i in 0..m {
                self.data.swap(a * m + i, b * m + i);
            }
        }
    }
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Conjugate transpose (`Aᴴ`); equal to [`transpose`](Self::transpose)
    /// for real matrices.
    pub fn adjoint(&self) -> Self {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)].conj())
    }
}

// ── Row / Column access ─────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Extract column `j` as an `nrows x 1` matrix.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let c = m.col(1);
    /// assert_eq!(c.as_slice(), &[2.0, 4.0]);
    /// ```
    pub fn col(&self, j: usize) -> Self {
        let start = j * self.nrows;
        DynMatrix::from_slice(self.nrows, 1, &self.data[start..start + self.nrows])
    }

    /// Extract row `i` as a `1 x ncols` matrix.
    pub fn row(&self, i: usize) -> Self {
        DynMatrix::from_fn(1, self.ncols, |_, j| self[(i, j)])
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for DynMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.nrows;
        let n = self.ncols;

        // Render every cell once so columns can be right-aligned.
        let mut cells: Vec<String> = Vec::with_capacity(m * n);
        let mut widths: Vec<usize> = alloc::vec![0; n];
        for i in 0..m {
            for (j, width) in widths.iter_mut().enumerate() {
                let mut s = String::new();
                match f.precision() {
                    Some(p) => write!(s, "{:.*}", p, self[(i, j)])?,
                    None => write!(s, "{}", self[(i, j)])?,
                }
                *width = (*width).max(s.len());
                cells.push(s);
            }
        }

        for i in 0..m {
            f.write_str(if i == 0 { "[" } else { " " })?;
            for (j, width) in widths.iter().enumerate() {
                if j > 0 {
                    f.write_str("  ")?;
                }
                write!(f, "{:>w$}", cells[i * n + j], w = *width)?;
            }
            if i + 1 == m {
                f.write_str("]")?;
            } else {
                f.write_str("\n")?;
            }
        }
        if m == 0 {
            write!(f, "[]({}x{})", m, n)?;
        }
        Ok(())
    }
}
