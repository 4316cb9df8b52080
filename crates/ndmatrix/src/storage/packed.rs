//! Bit-packed storage: one bit per cell, 64 cells per word.

use crate::bitseq::Store;
use crate::dims::Dims;
use crate::storage::{check_index, scan_start, Matrix};

/// A dense matrix of booleans packed one bit per cell.
///
/// Sixty-four times smaller than `Grid<bool>`, and
/// [`next`](Matrix::next) skips whole words of `false` cells at a time.
///
/// # Examples
///
/// ```
/// use ndmatrix::{Bool, Matrix};
///
/// let mut m = Bool::new(&[100, 100]);
/// m.set_at(&[40, 70], true);
/// assert_eq!(m.next(None), Some(m.dims().index(&[40, 70])));
/// ```
#[derive(Debug, Clone)]
pub struct Bool {
    dims: Dims,
    bits: Store,
}

impl Bool {
    /// Creates an all-`false` matrix of the given shape.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or contains a zero.
    pub fn new(lengths: &[usize]) -> Self {
        let dims = Dims::new(lengths);
        let bits = Store::with_len(dims.size());
        Bool { dims, bits }
    }
}

impl Matrix<bool> for Bool {
    #[inline]
    fn dims(&self) -> &Dims {
        &self.dims
    }

    fn get(&self, idx: usize) -> bool {
        check_index(idx, self.size());
        self.bits.get(idx)
    }

    fn set(&mut self, idx: usize, value: bool) {
        check_index(idx, self.size());
        self.bits.set(idx, value);
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        self.bits.next_true(scan_start(after))
    }

    fn clear(&mut self) {
        self.bits.clear();
    }
}

/// A dense matrix of 0-or-1 integers packed one bit per cell.
///
/// The integer twin of [`Bool`]: any non-zero write stores 1. Useful where
/// the cells take part in arithmetic, e.g. counting with
/// [`reduce`](crate::operations::reduce).
#[derive(Debug, Clone)]
pub struct Bit {
    dims: Dims,
    bits: Store,
}

impl Bit {
    /// Creates an all-zero matrix of the given shape.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or contains a zero.
    pub fn new(lengths: &[usize]) -> Self {
        let dims = Dims::new(lengths);
        let bits = Store::with_len(dims.size());
        Bit { dims, bits }
    }
}

impl Matrix<u8> for Bit {
    #[inline]
    fn dims(&self) -> &Dims {
        &self.dims
    }

    fn get(&self, idx: usize) -> u8 {
        check_index(idx, self.size());
        self.bits.get(idx) as u8
    }

    fn set(&mut self, idx: usize, value: u8) {
        check_index(idx, self.size());
        self.bits.set(idx, value != 0);
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        self.bits.next_true(scan_start(after))
    }

    fn clear(&mut self) {
        self.bits.clear();
    }
}
