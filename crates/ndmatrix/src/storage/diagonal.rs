//! Diagonal storage: only the main diagonal of a hypercube is backed by
//! memory.

use smallvec::SmallVec;

use crate::dims::{Dims, Lengths};
use crate::storage::{check_index, scan_start, Element, Matrix};

/// A diagonal matrix: a hypercube where every cell off the main diagonal is
/// zero, stored as a flat slice of just the diagonal values.
///
/// A `d`-dimensional matrix with sides of length `x` stores `x` values
/// instead of `x^d`. Cells on the diagonal sit at flat indexes `0, n, 2n,
/// ...` where `n = x^0 + x^1 + ... + x^(d-1)`, so lookups are a single
/// division.
///
/// Writing a non-zero value anywhere off the diagonal panics; writing zero
/// there is a no-op.
#[derive(Debug, Clone)]
pub struct Diagonal<T> {
    dims: Dims,
    values: Vec<T>,
}

impl<T: Element> Diagonal<T> {
    /// Creates an all-zero diagonal matrix.
    ///
    /// Unlike the other backends, a diagonal matrix has the same length
    /// along every axis, so the shape is given as a dimensionality and the
    /// length of one side.
    ///
    /// # Panics
    ///
    /// Panics if `dimensionality` or `side` is zero.
    pub fn new(dimensionality: usize, side: usize) -> Self {
        Diagonal {
            dims: cube(dimensionality, side),
            values: vec![T::default(); side],
        }
    }

    /// Creates a diagonal matrix from the values along its diagonal; the
    /// length of one side is the number of values.
    ///
    /// # Panics
    ///
    /// Panics if `dimensionality` is zero or `values` is empty.
    pub fn from_diagonal(dimensionality: usize, values: Vec<T>) -> Self {
        Diagonal {
            dims: cube(dimensionality, values.len()),
            values,
        }
    }

    /// The distance between consecutive cells of the diagonal, in flat
    /// indexes: the geometric series `side^0 + side^1 + ... + side^(d-1)`.
    fn step(&self) -> usize {
        let side = self.values.len();
        let mut n = 1;
        let mut term = 1;
        for _ in 1..self.dims.ndim() {
            term *= side;
            n += term;
        }
        n
    }

    /// The position along the diagonal of the cell at `idx`, or `None` if
    /// the cell is off the diagonal.
    fn diagonal_offset(&self, idx: usize) -> Option<usize> {
        let step = self.step();
        (idx % step == 0).then(|| idx / step)
    }
}

fn cube(dimensionality: usize, side: usize) -> Dims {
    let lengths: Lengths = SmallVec::from_elem(side, dimensionality);
    Dims::new(&lengths)
}

impl<T: Element> Matrix<T> for Diagonal<T> {
    #[inline]
    fn dims(&self) -> &Dims {
        &self.dims
    }

    fn get(&self, idx: usize) -> T {
        check_index(idx, self.size());
        match self.diagonal_offset(idx) {
            Some(i) => self.values[i],
            None => T::default(),
        }
    }

    fn set(&mut self, idx: usize, value: T) {
        check_index(idx, self.size());
        match self.diagonal_offset(idx) {
            Some(i) => self.values[i] = value,
            None => {
                if value != T::default() {
                    panic!("can not set a non-zero value off the matrix diagonal");
                }
            }
        }
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        let zero = T::default();
        let step = self.step();
        let start = scan_start(after).div_ceil(step);
        (start..self.values.len())
            .find(|&i| self.values[i] != zero)
            .map(|i| i * step)
    }

    fn clear(&mut self) {
        self.values.fill(T::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_indexes() {
        // 2D, side 5: diagonal cells are (0,0), (1,1) ... at strides of 6
        let mut m: Diagonal<i32> = Diagonal::new(2, 5);
        for i in 0..5 {
            m.set_at(&[i, i], 1 + i as i32);
        }
        for (i, idx) in [0, 6, 12, 18, 24].into_iter().enumerate() {
            assert_eq!(m.get(idx), 1 + i as i32);
        }
        assert_eq!(m.get(1), 0);
        assert_eq!(m.get(23), 0);
    }

    #[test]
    fn test_3d_step() {
        // 3D, side 3: step is 1 + 3 + 9 = 13
        let mut m: Diagonal<i32> = Diagonal::new(3, 3);
        m.set_at(&[2, 2, 2], 9);
        assert_eq!(m.get(26), 9);
        assert_eq!(m.next(None), Some(26));
    }

    #[test]
    fn test_next_includes_origin() {
        let m: Diagonal<i32> = Diagonal::from_diagonal(2, vec![5, 0, 7, 0]);
        assert_eq!(m.next(None), Some(0));
        assert_eq!(m.next(Some(0)), Some(10));
        assert_eq!(m.next(Some(10)), None);
    }

    #[test]
    fn test_next_skips_zero_diagonal_cells() {
        let m: Diagonal<i32> = Diagonal::from_diagonal(2, vec![0, 0, 1, 1]);
        assert_eq!(m.next(None), Some(10));
        assert_eq!(m.next(Some(10)), Some(15));
        assert_eq!(m.next(Some(15)), None);
    }

    #[test]
    fn test_off_diagonal_zero_write_is_noop() {
        let mut m: Diagonal<i32> = Diagonal::new(2, 4);
        m.set(1, 0);
        assert_eq!(m.get(1), 0);
    }

    #[test]
    #[should_panic(expected = "off the matrix diagonal")]
    fn test_off_diagonal_nonzero_write_panics() {
        let mut m: Diagonal<i32> = Diagonal::new(2, 4);
        m.set(1, 3);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_get_out_of_range_panics() {
        let m: Diagonal<i32> = Diagonal::new(2, 4);
        m.get(16);
    }

    #[test]
    fn test_one_dimensional_degenerates_to_dense() {
        // with one axis the step is 1 and every cell is on the diagonal
        let mut m: Diagonal<i32> = Diagonal::new(1, 5);
        for i in 0..5 {
            m.set(i, i as i32);
        }
        assert_eq!(m.next(None), Some(1));
        assert_eq!(m.next(Some(1)), Some(2));
    }
}
