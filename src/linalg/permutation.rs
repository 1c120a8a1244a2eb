use alloc::vec::Vec;

use crate::traits::Scalar;
use crate::DynMatrix;

/// Column permutation stored as a 0-based index vector.
///
/// `perm[j]` is the original column that ends up at position `j`, so
/// `A·P = A(:, perm)`. The matrix and 1-based forms are produced only on
/// request.
///
/// ```
/// use qrfact::linalg::Permutation;
/// let p = Permutation::from_indices(vec![1, 0, 2]).unwrap();
/// assert_eq!(p.to_one_based(), vec![2, 1, 3]);
/// let m = p.to_matrix(0.0_f64);
/// assert_eq!(m[(1, 0)], 1.0);
/// assert_eq!(m[(0, 1)], 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

impl Permutation {
    /// Identity permutation of length `n`.
    pub fn identity(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
        }
    }

    /// Validate and wrap an index vector. Returns `None` unless every value
    /// in `0..len` appears exactly once.
    pub fn from_indices(perm: Vec<usize>) -> Option<Self> {
        let n = perm.len();
        let mut seen = alloc::vec![false; n];
        for &p in &perm {
            if p >= n || seen[p] {
                return None;
            }
            seen[p] = true;
        }
        Some(Self { perm })
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.perm
    }

    /// Exchange positions `a` and `b`.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.perm.swap(a, b);
    }

    /// 1-based index vector, the form returned by economy pivoted `qr`.
    pub fn to_one_based(&self) -> Vec<usize> {
        self.perm.iter().map(|&p| p + 1).collect()
    }

    /// Dense 0/1 matrix with `P[perm[j], j] = 1`.
    pub fn to_matrix<T: Scalar>(&self, zero: T) -> DynMatrix<T> {
        let n = self.perm.len();
        let mut p = DynMatrix::zeros(n, n, zero);
        for (j, &src) in self.perm.iter().enumerate() {
            p[(src, j)] = T::one();
        }
        p
    }

    /// `A(:, perm)`. Panics if `a` has the wrong column count.
    pub fn apply_to_cols<T: Scalar>(&self, a: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(a.ncols(), self.perm.len(), "permutation length mismatch");
        a.select_cols(&self.perm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_permutations() {
        assert!(Permutation::from_indices(alloc::vec![0, 0]).is_none());
        assert!(Permutation::from_indices(alloc::vec![0, 2]).is_none());
        assert!(Permutation::from_indices(alloc::vec![]).is_some());
    }

    #[test]
    fn matrix_form_matches_column_gather() {
        let p = Permutation::from_indices(alloc::vec![2, 0, 1]).unwrap();
        let a = DynMatrix::from_fn(2, 3, |i, j| (10 * i + j) as f64);
        let by_matrix = &a * &p.to_matrix(0.0);
        assert_eq!(by_matrix, p.apply_to_cols(&a));
    }

    #[test]
    fn identity_and_one_based() {
        let p = Permutation::identity(3);
        assert_eq!(p.as_slice(), &[0, 1, 2]);
        let q = Permutation::from_indices(alloc::vec![3, 1, 0, 2]).unwrap();
        assert_eq!(q.to_one_based(), alloc::vec![4, 2, 1, 3]);
    }
}
