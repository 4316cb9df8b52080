//! Algorithms over the [`Matrix`] contract, independent of backend.

use smallvec::SmallVec;

use crate::storage::{Element, Matrix};

/// Clears `dest` and copies every value from `src` into it at the same
/// coordinate offsets.
///
/// The shapes need not match: cells of `src` that fall outside `dest` are
/// cropped away, and cells of `dest` that `src` does not cover are left
/// zero. The dimensionality need not match either; a 2D source copied into
/// a 3D destination lands on the plane where the extra offsets are zero,
/// and vice versa.
///
/// Only the non-zero cells of `src` are visited, so copying out of a
/// sparse backend costs time proportional to its populated cells, not its
/// volume.
///
/// # Examples
///
/// ```
/// use ndmatrix::{copy, Grid, Matrix, Sparse};
///
/// let mut src: Sparse<i32> = Sparse::new(&[1000, 1000]);
/// src.set_at(&[2, 3], 7);
///
/// let mut dest: Grid<i32> = Grid::new(&[4, 4]);
/// copy(&mut dest, &src);
/// assert_eq!(dest.get_at(&[2, 3]), 7);
/// ```
pub fn copy<T, D, S>(dest: &mut D, src: &S)
where
    T: Element,
    D: Matrix<T>,
    S: Matrix<T>,
{
    dest.clear();
    let ndim = src.ndim().max(dest.ndim());
    let mut off: SmallVec<[usize; 4]> = smallvec::smallvec![0; ndim];
    let mut it = src.next(None);
    while let Some(idx) = it {
        off.fill(0);
        src.dims().offsets(idx, &mut off);
        if dest.dims().contains(&off) {
            dest.set(dest.dims().index(&off), src.get(idx));
        }
        it = src.next(Some(idx));
    }
}

/// Folds `combine` over every cell value of `m`, in arbitrary order,
/// starting from `identity`.
///
/// Every cell takes part, zero or not, so `combine` must treat the zero
/// value sensibly (for sums and counts it already does).
///
/// # Examples
///
/// ```
/// use ndmatrix::{reduce, Diagonal, Matrix};
///
/// let m = Diagonal::from_diagonal(2, vec![1, 2, 3]);
/// assert_eq!(reduce(&m, 0, |a, b| a + b), 6);
/// assert_eq!(reduce(&m, i32::MIN, i32::max), 3);
/// ```
pub fn reduce<T, A, M, F>(m: &M, identity: A, combine: F) -> A
where
    T: Element,
    M: Matrix<T>,
    F: Fn(A, T) -> A,
{
    let mut total = identity;
    for i in 0..m.size() {
        total = combine(total, m.get(i));
    }
    total
}
