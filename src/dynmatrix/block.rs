use alloc::vec::Vec;

use crate::traits::Scalar;

use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Extract a sub-matrix of size `rows x cols` starting at `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_fn(3, 3, |i, j| (i * 3 + j) as f64);
    /// let b = m.block(1, 1, 2, 2);
    /// assert_eq!(b[(0, 0)], 4.0);
    /// assert_eq!(b[(1, 1)], 8.0);
    /// ```
    pub fn block(&self, i: usize, j: usize, rows: usize, cols: usize) -> Self {
        assert!(
            i + rows <= self.nrows && j + cols <= self.ncols,
            "block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, rows, cols, self.nrows, self.ncols,
        );
        DynMatrix::from_fn(rows, cols, |r, c| self[(i + r, j + c)])
    }

    /// Write a sub-matrix into self starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block(&mut self, i: usize, j: usize, src: &DynMatrix<T>) {
        assert!(
            i + src.nrows <= self.nrows && j + src.ncols <= self.ncols,
            "set_block ({},{}) size {}x{} out of bounds for {}x{} matrix",
            i, j, src.nrows, src.ncols, self.nrows, self.ncols,
        );
        for c in 0..src.ncols {
            for r in 0..src.nrows {
                self[(i + r, j + c)] = src[(r, c)];
            }
        }
    }

    /// Extract the first `n` rows.
    pub fn top_rows(&self, n: usize) -> Self {
        self.block(0, 0, n, self.ncols)
    }

    /// Extract the first `n` columns.
    pub fn left_cols(&self, n: usize) -> Self {
        self.block(0, 0, self.nrows, n)
    }

    /// Gather columns by index, in the given order (`A(:, idx)`).
    ///
    /// ```
    /// use qrfact::DynMatrix;
    /// let m = DynMatrix::from_rows(1, 3, &[10.0, 20.0, 30.0]);
    /// assert_eq!(m.select_cols(&[2, 0]).as_slice(), &[30.0, 10.0]);
    /// ```
    pub fn select_cols(&self, idx: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.nrows * idx.len());
        for &j in idx {
            assert!(j < self.ncols, "column {} out of bounds for {} columns", j, self.ncols);
            let start = j * self.nrows;
            data.extend_from_slice(&self.data[start..start + self.nrows]);
        }
        DynMatrix::from_vec(self.nrows, idx.len(), data)
    }

    /// Gather rows by index, in the given order (`A(idx, :)`).
    pub fn select_rows(&self, idx: &[usize]) -> Self {
        for &i in idx {
            assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        }
        DynMatrix::from_fn(idx.len(), self.ncols, |r, c| self[(idx[r], c)])
    }

    /// Copy of self with column `j` removed.
    pub fn remove_col(&self, j: usize) -> Self {
        let keep: Vec<usize> = (0..self.ncols).filter(|&c| c != j).collect();
        self.select_cols(&keep)
    }

    /// Copy of self with row `i` removed.
    pub fn remove_row(&self, i: usize) -> Self {
        let keep: Vec<usize> = (0..self.nrows).filter(|&r| r != i).collect();
        self.select_rows(&keep)
    }

    /// Copy of self with the `nrows x k` block `x` inserted before column `j`.
    pub fn insert_cols(&self, j: usize, x: &DynMatrix<T>) -> Self {
        assert_eq!(x.nrows, self.nrows, "row count mismatch");
        assert!(j <= self.ncols, "insert position {} out of bounds", j);
        let split = j * self.nrows;
        let mut data = Vec::with_capacity(self.data.len() + x.data.len());
        data.extend_from_slice(&self.data[..split]);
        data.extend_from_slice(&x.data);
        data.extend_from_slice(&self.data[split..]);
        DynMatrix::from_vec(self.nrows, self.ncols + x.ncols, data)
    }

    /// Copy of self with the `k x ncols` block `x` inserted before row `i`.
    pub fn insert_rows(&self, i: usize, x: &DynMatrix<T>) -> Self {
        assert_eq!(x.ncols, self.ncols, "column count mismatch");
        assert!(i <= self.nrows, "insert position {} out of bounds", i);
        let k = x.nrows;
        DynMatrix::from_fn(self.nrows + k, self.ncols, |r, c| {
            if r < i {
                self[(r, c)]
            } else if r < i + k {
                x[(r - i, c)]
            } else {
                self[(r - k, c)]
            }
        })
    }
}
