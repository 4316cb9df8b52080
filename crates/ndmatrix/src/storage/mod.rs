//! Storage backends implementing the [`Matrix`] contract.
//!
//! Every backend stores elements of a shape described by
//! [`Dims`](crate::dims::Dims) and is addressed either by flat index or by
//! coordinate offsets. The backends trade memory for speed differently:
//!
//! * [`Grid`] / [`SharedGrid`] — dense, one element per cell.
//! * [`Bool`] / [`Bit`] — dense, one bit per cell.
//! * [`Sparse`] — an ordered map, paying only for non-zero cells.
//! * [`Diagonal`] — `d` elements for a `d`-cube, everything off-diagonal
//!   pinned to zero.
//! * [`View`] — no storage at all, a coordinate transform over a parent.
//! * [`Const`] — a read-only wrapper over any of the above.
//!
//! Code written against `Matrix<T>` works identically on all of them; see
//! [`operations`](crate::operations) for algorithms written that way.

use std::fmt::Debug;

use crate::dims::Dims;
use crate::error::MatrixError;

mod diagonal;
mod grid;
mod packed;
mod sparse;
mod view;

pub use diagonal::Diagonal;
pub use grid::{Grid, SharedGrid};
pub use packed::{Bit, Bool};
pub use sparse::Sparse;
pub use view::{Const, View};

/// Element types storable in a matrix.
///
/// Every cell of every backend defaults to `T::default()`, the zero value;
/// sparse backends lean on this by not storing zero cells at all, and
/// equality with zero is how they decide what to drop.
pub trait Element: Copy + Default + PartialEq + Debug {}

impl<T: Copy + Default + PartialEq + Debug> Element for T {}

/// The common contract of all storage backends.
///
/// Cells are addressed by flat index in row-major order; the coordinate
/// codec lives in [`Dims`], and the `*_at` methods go through it. Reading
/// any cell of a fresh matrix yields zero (`T::default()`).
///
/// # Panics
///
/// All implementations panic on a flat index `>= self.size()`. Coordinate
/// offsets, by contrast, wrap modulo the axis lengths and never panic from
/// being too large (too *few* offsets for the shape do panic, in the codec).
pub trait Matrix<T: Element> {
    /// The shape of this matrix.
    fn dims(&self) -> &Dims;

    /// Returns the value at the given flat index.
    fn get(&self, idx: usize) -> T;

    /// Sets the value at the given flat index.
    fn set(&mut self, idx: usize, value: T);

    /// Returns the flat index of the next non-zero cell after `after`, or
    /// `None` when every remaining cell is zero.
    ///
    /// `None` for `after` starts the scan from the beginning, including
    /// index 0. Indices come back in strictly increasing order, so repeated
    /// calls enumerate every non-zero cell exactly once. Sparse backends
    /// answer this without touching zero regions.
    fn next(&self, after: Option<usize>) -> Option<usize>;

    /// Resets every cell to zero.
    fn clear(&mut self);

    /// The total number of cells.
    #[inline]
    fn size(&self) -> usize {
        self.dims().size()
    }

    /// The number of axes.
    #[inline]
    fn ndim(&self) -> usize {
        self.dims().ndim()
    }

    /// Returns the value at the given coordinate offsets, wrapping each
    /// offset modulo the axis length.
    #[inline]
    fn get_at(&self, offsets: &[usize]) -> T {
        self.get(self.dims().index(offsets))
    }

    /// Sets the value at the given coordinate offsets, wrapping each offset
    /// modulo the axis length.
    #[inline]
    fn set_at(&mut self, offsets: &[usize], value: T) {
        self.set(self.dims().index(offsets), value);
    }
}

/// Panics if `idx` does not address a cell of a `size`-cell matrix.
#[inline]
pub(crate) fn check_index(idx: usize, size: usize) {
    if idx >= size {
        panic!("{}", MatrixError::IndexOutOfRange { index: idx, size });
    }
}

/// The first candidate index of a scan continuing after `after`.
#[inline]
pub(crate) fn scan_start(after: Option<usize>) -> usize {
    match after {
        Some(after) => after + 1,
        None => 0,
    }
}
