//! Data structures for efficiently representing large matrices of arbitrary
//! size and dimensionality.
//!
//! A matrix here is a shaped container of values, not a linear-algebra
//! object: the crate cares about storage layout, addressing, and
//! enumeration, and leaves arithmetic to the caller. Several backends
//! implement the one [`Matrix`] contract with different storage trade-offs:
//!
//! * [`Grid`] stores every cell contiguously, and grows with reserved
//!   capacity like a vector does.
//! * [`SharedGrid`] is a `Grid` over a borrowed buffer.
//! * [`Bool`] and [`Bit`] pack one cell per bit.
//! * [`Sparse`] stores only non-zero cells in an ordered map.
//! * [`Diagonal`] stores only the main diagonal of a hypercube.
//! * [`View`] and [`Const`] borrow another matrix through a coordinate
//!   transform or a read-only window.
//!
//! Cells are addressed by coordinate offsets or by a flat row-major index;
//! [`Dims`] is the codec between the two. Out-of-range offsets wrap round
//! modulo the axis lengths, which makes toroidal topologies (and cheap
//! tiling reads) a property of the addressing rather than of any backend.
//!
//! ```
//! use ndmatrix::{copy, Grid, Matrix, Sparse};
//!
//! let mut world: Sparse<u8> = Sparse::new(&[1 << 16, 1 << 16]);
//! world.set_at(&[3, 5], 1);
//!
//! // pull the populated corner into a small dense window; enumeration of
//! // the sparse source visits non-zero cells only
//! let mut local: Grid<u8> = Grid::new(&[64, 64]);
//! copy(&mut local, &world);
//! assert_eq!(local.get_at(&[3, 5]), 1);
//! ```
//!
//! Fixed-size small matrices (the 4x4 of computer graphics, say) are
//! better served by a special-purpose crate; everything here assumes the
//! shape is dynamic and possibly large.

pub mod bitseq;
pub mod dims;
mod error;
pub mod operations;
mod storage;

pub use dims::{crop, sampler, Dims, Map, Mapper};
pub use error::{MatrixError, SamplerErrorKind, StoreError};
pub use operations::{copy, reduce};
pub use storage::{Bit, Bool, Const, Diagonal, Element, Grid, Matrix, SharedGrid, Sparse, View};
