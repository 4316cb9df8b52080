//! Dimension codec: a bidirectional mapping between flat indexes and
//! coordinate vectors for matrices of arbitrary dimensionality.
//!
//! [`Dims`] assumes row-major order: axis 0 varies fastest. Out-of-range
//! coordinates wrap modulo the axis length rather than failing; this is a
//! deliberate design choice supporting cyclic addressing (tiling, sampling),
//! not an error-tolerance measure. Direct flat-index bounds errors are the
//! responsibility of the storage layer.

mod mappings;

pub use mappings::{crop, sampler, Map, Mapper};

use smallvec::SmallVec;

use crate::error::MatrixError;

/// Shape lengths, stack-allocated through 4 dimensions.
pub(crate) type Lengths = SmallVec<[usize; 4]>;

/// The dimensionality and per-axis lengths of a matrix.
///
/// `Dims` is an immutable value, cheap to clone. Every axis length is at
/// least 1.
///
/// # Examples
///
/// ```
/// use ndmatrix::Dims;
///
/// let d = Dims::new(&[4, 3, 2]);
/// assert_eq!(d.ndim(), 3);
/// assert_eq!(d.size(), 24);
/// assert_eq!(d.index(&[1, 1, 0]), 5);
///
/// let mut offsets = [0usize; 3];
/// d.offsets(5, &mut offsets);
/// assert_eq!(offsets, [1, 1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dims {
    lengths: Lengths,
}

impl Dims {
    /// Create a shape from per-axis lengths.
    ///
    /// # Panics
    ///
    /// Panics if `lengths` is empty or any length is zero.
    pub fn new(lengths: &[usize]) -> Self {
        assert!(!lengths.is_empty(), "Dims::new with empty lengths slice");
        assert!(
            lengths.iter().all(|&l| l > 0),
            "Dims::new with zero-length axis"
        );
        Self {
            lengths: SmallVec::from_slice(lengths),
        }
    }

    /// The number of dimensions, e.g. 2 for "2D".
    #[inline]
    pub fn ndim(&self) -> usize {
        self.lengths.len()
    }

    /// The number of unique indexes, from 0 to size minus 1 inclusive. This
    /// is also the unit volume of the shape.
    #[inline]
    pub fn size(&self) -> usize {
        self.lengths.iter().product()
    }

    /// The length along the given zero-indexed axis, or 0 if `axis` is not
    /// less than the dimensionality.
    #[inline]
    pub fn length(&self, axis: usize) -> usize {
        self.lengths.get(axis).copied().unwrap_or(0)
    }

    /// The lengths along each axis.
    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Compute a flat index from the offsets along each axis.
    ///
    /// Any individual offset that is out of bounds is wrapped round, modulo
    /// the length along that axis. Offsets beyond the dimensionality are
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if fewer offsets are provided than the dimensionality.
    pub fn index(&self, offsets: &[usize]) -> usize {
        if offsets.len() < self.ndim() {
            panic!(
                "{}",
                MatrixError::DimensionMismatch {
                    requested: offsets.len(),
                    actual: self.ndim(),
                }
            );
        }
        match *self.lengths.as_slice() {
            [w] => offsets[0] % w,
            [w, h] => (offsets[1] % h) * w + (offsets[0] % w),
            [w, h, d] => ((offsets[2] % d) * h + (offsets[1] % h)) * w + (offsets[0] % w),
            [w, h, d, e] => {
                (((offsets[3] % e) * d + (offsets[2] % d)) * h + (offsets[1] % h)) * w
                    + (offsets[0] % w)
            }
            _ => index_generic(&self.lengths, offsets),
        }
    }

    /// Compute the offsets along each axis identified by the given flat
    /// index, storing them in `dest`. An index that is out of bounds wraps
    /// round modulo [`size`](Self::size). Entries of `dest` beyond the
    /// dimensionality are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than the dimensionality.
    pub fn offsets(&self, idx: usize, dest: &mut [usize]) {
        if dest.len() < self.ndim() {
            panic!(
                "{}",
                MatrixError::DimensionMismatch {
                    requested: dest.len(),
                    actual: self.ndim(),
                }
            );
        }
        match *self.lengths.as_slice() {
            [w] => dest[0] = idx % w,
            [w, h] => {
                dest[0] = idx % w;
                dest[1] = (idx / w) % h;
            }
            [w, h, d] => {
                dest[0] = idx % w;
                dest[1] = (idx / w) % h;
                dest[2] = (idx / (w * h)) % d;
            }
            [w, h, d, e] => {
                dest[0] = idx % w;
                dest[1] = (idx / w) % h;
                dest[2] = (idx / (w * h)) % d;
                dest[3] = (idx / (w * h * d)) % e;
            }
            _ => offsets_generic(&self.lengths, idx, dest),
        }
    }

    /// Convenience variant of [`offsets`](Self::offsets) returning a fresh
    /// coordinate vector.
    pub fn offsets_vec(&self, idx: usize) -> SmallVec<[usize; 4]> {
        let mut dest: SmallVec<[usize; 4]> = smallvec::smallvec![0; self.ndim()];
        self.offsets(idx, &mut dest);
        dest
    }

    /// Whether each provided offset is less than the length along its
    /// respective axis.
    ///
    /// As a special case, offsets beyond the declared dimensionality are
    /// still considered contained when they are zero. For example,
    /// `(2, 4, 0)` is contained by a 2-dimensional shape iff `(2, 4)` is.
    pub fn contains(&self, offsets: &[usize]) -> bool {
        let ndim = self.ndim();
        for (i, &offset) in offsets.iter().enumerate() {
            if i < ndim {
                if offset >= self.lengths[i] {
                    return false;
                }
            } else if offset > 0 {
                return false;
            }
        }
        true
    }
}

/// Loop form of [`Dims::index`], used beyond 4 dimensions. The unrolled
/// arms must agree with this.
fn index_generic(lengths: &[usize], offsets: &[usize]) -> usize {
    let mut stride = 1;
    let mut total = 0;
    for (&length, &offset) in lengths.iter().zip(offsets) {
        total += (offset % length) * stride;
        stride *= length;
    }
    total
}

/// Loop form of [`Dims::offsets`], used beyond 4 dimensions.
fn offsets_generic(lengths: &[usize], idx: usize, dest: &mut [usize]) {
    let mut stride = 1;
    for (i, &length) in lengths.iter().enumerate() {
        dest[i] = (idx / stride) % length;
        stride *= length;
    }
}
