//! Sparse storage: an ordered map keyed by flat index.

use std::collections::BTreeMap;

use crate::dims::Dims;
use crate::storage::{check_index, scan_start, Element, Matrix};

/// A sparse matrix storing only its non-zero cells in an ordered map.
///
/// Memory use scales with the number of non-zero cells rather than the
/// shape's volume, so this backend suits very large, very sparse matrices.
/// Writing zero to a cell removes its entry, so the map never accumulates
/// dead weight, and because the map is ordered by flat index,
/// [`next`](Matrix::next) never touches the zero regions at all.
#[derive(Debug, Clone)]
pub struct Sparse<T> {
    dims: Dims,
    values: BTreeMap<usize, T>,
}

impl<T: Element> Sparse<T> {
    /// Creates an empty (all-zero) sparse matrix of the given shape.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or contains a zero.
    pub fn new(lengths: &[usize]) -> Self {
        Sparse {
            dims: Dims::new(lengths),
            values: BTreeMap::new(),
        }
    }

    /// Creates a sparse matrix from a pre-populated map of flat index to
    /// value. Zero-valued entries are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or contains a zero, or if any key is
    /// out of range for the shape's volume.
    pub fn from_map(lengths: &[usize], mut values: BTreeMap<usize, T>) -> Self {
        let dims = Dims::new(lengths);
        if let Some((&idx, _)) = values.range(dims.size()..).next() {
            panic!(
                "{}",
                crate::error::MatrixError::IndexOutOfRange {
                    index: idx,
                    size: dims.size(),
                }
            );
        }
        values.retain(|_, value| *value != T::default());
        Sparse { dims, values }
    }

    /// The number of non-zero cells currently stored.
    pub fn stored(&self) -> usize {
        self.values.len()
    }
}

impl<T: Element> Matrix<T> for Sparse<T> {
    #[inline]
    fn dims(&self) -> &Dims {
        &self.dims
    }

    fn get(&self, idx: usize) -> T {
        check_index(idx, self.size());
        self.values.get(&idx).copied().unwrap_or_default()
    }

    fn set(&mut self, idx: usize, value: T) {
        check_index(idx, self.size());
        if value == T::default() {
            self.values.remove(&idx);
        } else {
            self.values.insert(idx, value);
        }
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        self.values
            .range(scan_start(after)..)
            .next()
            .map(|(&idx, _)| idx)
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}
