//! Dense storage: a contiguous buffer of values in row-major order.

use smallvec::SmallVec;

use crate::dims::{Dims, Lengths};
use crate::error::MatrixError;
use crate::storage::{check_index, scan_start, Element, Matrix};

/// The next backing length to reserve when an axis grows to `x`.
///
/// Small axes double, like small vectors do; larger axes grow by x1.5 and
/// then x1.25. Axes grow independently, so an irregular shape only pays for
/// spare capacity along the axes that actually changed. Note that growing n
/// axes at once multiplies the total memory by the product of the per-axis
/// factors, which is why the factors fall off quickly.
fn next_length(x: usize) -> usize {
    match x {
        12.. => x + x / 4,
        4.. => x + x / 2,
        _ => x + x,
    }
}

/// A dense matrix backed by a contiguous buffer, one element per cell.
///
/// This is the best representation when few cells are zero. Resizing
/// reserves spare capacity along each grown axis so that a pattern of
/// repeated small grows does not reallocate and relocate every time;
/// [`compact`](Grid::compact) trims the spare capacity away again.
///
/// # Examples
///
/// ```
/// use ndmatrix::{Grid, Matrix};
///
/// let mut m: Grid<i32> = Grid::new(&[4, 4]);
/// m.set_at(&[1, 2], 7);
/// assert_eq!(m.get_at(&[1, 2]), 7);
/// assert_eq!(m.get_at(&[5, 6]), 7); // offsets wrap
/// ```
#[derive(Debug, Clone)]
pub struct Grid<T> {
    dims: Dims,
    // layout of the buffer, including spare capacity; covers at least the
    // logical shape along every axis
    backing: Dims,
    values: Vec<T>,
}

impl<T: Element> Grid<T> {
    /// Creates a zero-filled dense matrix of the given shape.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or contains a zero.
    pub fn new(lengths: &[usize]) -> Self {
        let dims = Dims::new(lengths);
        let values = vec![T::default(); dims.size()];
        Grid {
            backing: dims.clone(),
            dims,
            values,
        }
    }

    /// Resizes the matrix, discarding its contents: every cell of the new
    /// shape reads zero. The dimensionality may change.
    ///
    /// Shrinking, or growing within previously reserved capacity, does not
    /// reallocate.
    pub fn set_size(&mut self, lengths: &[usize]) {
        self.apply_size(lengths, false);
    }

    /// Resizes the matrix, preserving its contents: cells keep their
    /// coordinate offsets, cells outside the new shape are cropped away,
    /// and new cells read zero. The dimensionality may change.
    ///
    /// Growing reserves spare capacity along each grown axis, so repeated
    /// small grows relocate the contents only occasionally. Shrinking keeps
    /// the reserved capacity; call [`compact`](Grid::compact) to release it.
    pub fn resize(&mut self, lengths: &[usize]) {
        self.apply_size(lengths, true);
    }

    /// Rearranges storage so that no spare capacity is reserved, releasing
    /// the memory kept back by [`resize`](Grid::resize).
    pub fn compact(&mut self) {
        if self.backing == self.dims {
            return;
        }
        let mut buf = vec![T::default(); self.dims.size()];
        let dims = self.dims.clone();
        self.relocate(&mut buf, &dims);
        self.values = buf;
        self.backing = dims;
    }

    fn apply_size(&mut self, lengths: &[usize], preserve: bool) {
        let wanted = Dims::new(lengths);
        if wanted.size() > self.values.len() {
            // reserve a bigger buffer than necessary
            let grown: Lengths = lengths.iter().map(|&x| next_length(x)).collect();
            let backing = Dims::new(&grown);
            let mut buf = vec![T::default(); backing.size()];
            if preserve {
                self.relocate(&mut buf, &backing);
            }
            self.values = buf;
            self.backing = backing;
            self.dims = wanted;
            return;
        }

        // rearrange in the existing buffer without reallocating; the
        // backing stays at its larger size if the new shape fits inside it
        let fits = self.backing.ndim() >= wanted.ndim()
            && (0..wanted.ndim()).all(|i| self.backing.length(i) >= wanted.length(i));
        if preserve {
            let backing = if fits {
                self.backing.clone()
            } else {
                wanted.clone()
            };
            let mut buf = vec![T::default(); backing.size()];
            self.relocate(&mut buf, &backing);
            self.values.fill(T::default());
            self.values[..buf.len()].copy_from_slice(&buf);
            self.backing = backing;
        } else {
            if !fits {
                self.backing = wanted.clone();
            }
            self.values.fill(T::default());
        }
        self.dims = wanted;
    }

    /// Copies the current contents into `dest`, which is laid out according
    /// to `dest_dims`. Cells whose offsets fall outside `dest_dims` are
    /// cropped away.
    fn relocate(&self, dest: &mut [T], dest_dims: &Dims) {
        let ndim = self.backing.ndim().max(dest_dims.ndim());
        let mut off: SmallVec<[usize; 4]> = smallvec::smallvec![0; ndim];
        for i in 0..self.dims.size() {
            off.fill(0);
            self.dims.offsets(i, &mut off);
            if !dest_dims.contains(&off) {
                continue;
            }
            dest[dest_dims.index(&off)] = self.values[self.backing.index(&off)];
        }
    }

    /// Translates a flat index on the logical shape to an index into the
    /// backing buffer.
    ///
    /// The backing can have more axes than the logical shape after a
    /// shrink; the missing offsets are zero.
    #[inline]
    fn backing_index(&self, idx: usize) -> usize {
        if self.backing == self.dims {
            return idx;
        }
        let mut off: SmallVec<[usize; 4]> = smallvec::smallvec![0; self.backing.ndim()];
        self.dims.offsets(idx, &mut off);
        self.backing.index(&off)
    }
}

impl<T: Element> Matrix<T> for Grid<T> {
    #[inline]
    fn dims(&self) -> &Dims {
        &self.dims
    }

    fn get(&self, idx: usize) -> T {
        check_index(idx, self.size());
        self.values[self.backing_index(idx)]
    }

    fn set(&mut self, idx: usize, value: T) {
        check_index(idx, self.size());
        let i = self.backing_index(idx);
        self.values[i] = value;
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        let zero = T::default();
        (scan_start(after)..self.size()).find(|&i| self.values[self.backing_index(i)] != zero)
    }

    fn clear(&mut self) {
        self.values.fill(T::default());
    }
}

/// A dense matrix over a borrowed buffer.
///
/// The memory is shared: writes through the matrix are visible in the
/// borrowed slice and vice versa once the borrow ends. Values are laid out
/// in row-major order with no spare capacity, so this backend cannot be
/// resized.
///
/// # Examples
///
/// ```
/// use ndmatrix::{Matrix, SharedGrid};
///
/// let mut buf = [0u8, 1, 2, 3, 4, 5];
/// let m = SharedGrid::new(&[3, 2], &mut buf).unwrap();
/// assert_eq!(m.get_at(&[2, 1]), 5);
/// ```
#[derive(Debug)]
pub struct SharedGrid<'a, T> {
    dims: Dims,
    values: &'a mut [T],
}

impl<'a, T: Element> SharedGrid<'a, T> {
    /// Creates a dense matrix of the given shape over the borrowed buffer.
    ///
    /// Fails with [`MatrixError::SharedBufferTooSmall`] if the buffer holds
    /// fewer elements than the shape's volume; a longer buffer is fine, and
    /// its tail is ignored except by [`clear`](Matrix::clear).
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or contains a zero.
    pub fn new(lengths: &[usize], values: &'a mut [T]) -> Result<Self, MatrixError> {
        let dims = Dims::new(lengths);
        if values.len() < dims.size() {
            return Err(MatrixError::SharedBufferTooSmall {
                expected: dims.size(),
                actual: values.len(),
            });
        }
        Ok(SharedGrid { dims, values })
    }
}

impl<T: Element> Matrix<T> for SharedGrid<'_, T> {
    #[inline]
    fn dims(&self) -> &Dims {
        &self.dims
    }

    fn get(&self, idx: usize) -> T {
        check_index(idx, self.size());
        self.values[idx]
    }

    fn set(&mut self, idx: usize, value: T) {
        check_index(idx, self.size());
        self.values[idx] = value;
    }

    fn next(&self, after: Option<usize>) -> Option<usize> {
        let zero = T::default();
        (scan_start(after)..self.size()).find(|&i| self.values[i] != zero)
    }

    /// Zeroes the whole borrowed buffer, including any tail beyond the
    /// shape's volume.
    fn clear(&mut self) {
        self.values.fill(T::default());
    }
}
