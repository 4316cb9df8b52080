//! Coordinate transforms between shapes: cropping, reordering, mirroring,
//! and axis binding.
//!
//! A [`Map`] is a pure transform from offsets on a new shape back to offsets
//! on an original shape; it never owns storage. A [`Mapper`] is a reusable
//! factory producing a [`Map`] for any concrete parent shape. Because the set
//! of transform kinds is closed, maps are represented as small data structs
//! interpreted by one dispatch function rather than boxed closures, keeping
//! them `Clone` and allocation-free on the hot path.

use smallvec::SmallVec;

use crate::dims::{Dims, Lengths};
use crate::error::{MatrixError, SamplerErrorKind};

/// One output axis of a swizzle: which parent axis it addresses, and whether
/// it is mirrored or bound to a constant offset.
#[derive(Debug, Clone, Copy)]
struct AxisOutput {
    axis: u8,
    mirror: bool,
    constant: bool,
}

#[derive(Debug, Clone)]
enum Transform {
    /// Adds a fixed start offset along each axis, wrapping modulo the
    /// original length (a circular crop).
    Crop { start: Lengths },

    /// Reorders, mirrors, drops, or constant-binds axes according to a
    /// parsed sampler pattern.
    Swizzle {
        outputs: SmallVec<[AxisOutput; 8]>,
        constants: Lengths,
    },
}

/// A new shape formed by applying a coordinate transform to an original
/// shape: cropping, reordering, mirroring, or projections of dimensions.
///
/// A `Map` carries the new shape (accessible through [`dims`](Map::dims)),
/// the original shape, and the transform between them. It owns no element
/// storage; binding it to actual values is the job of
/// [`View`](crate::storage::View).
#[derive(Debug, Clone)]
pub struct Map {
    dims: Dims,
    original: Dims,
    transform: Transform,
}

impl Map {
    /// The new shape described by this map.
    #[inline]
    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    /// The original (parent) shape this map translates back to.
    #[inline]
    pub fn original(&self) -> &Dims {
        &self.original
    }

    /// Convert offsets on the new shape (`source`) to offsets on the
    /// original shape, storing them in `dest`.
    ///
    /// `dest` should hold at least `original().ndim()` entries; `source`
    /// entries beyond the new shape's dimensionality are ignored, and
    /// missing entries are treated as zero.
    pub fn map_offsets(&self, dest: &mut [usize], source: &[usize]) {
        match &self.transform {
            Transform::Crop { start } => {
                for i in 0..self.original.ndim() {
                    if i >= dest.len() {
                        break;
                    }
                    dest[i] = match source.get(i) {
                        Some(&offset) => {
                            (start[i] + (offset % self.dims.length(i))) % self.original.length(i)
                        }
                        None => 0,
                    };
                }
            }
            Transform::Swizzle { outputs, constants } => {
                for d in dest.iter_mut() {
                    *d = 0;
                }
                let mut c = 0;
                let mut s = 0;
                for output in outputs {
                    let axis = output.axis as usize;
                    if output.constant {
                        dest[axis] = constants[c];
                        c += 1;
                        continue;
                    }
                    let offset = match source.get(s) {
                        Some(&offset) => offset % self.original.length(axis),
                        None => 0,
                    };
                    s += 1;
                    dest[axis] = if output.mirror {
                        self.original.length(axis) - offset - 1
                    } else {
                        offset
                    };
                }
            }
        }
    }

    /// Convert a flat index on the new shape to a flat index on the original
    /// shape, by composing offset decoding, [`map_offsets`](Self::map_offsets),
    /// and offset encoding.
    pub fn map_index(&self, idx: usize) -> usize {
        let mut new_offsets: SmallVec<[usize; 4]> = smallvec::smallvec![0; self.dims.ndim()];
        let mut original_offsets: SmallVec<[usize; 4]> =
            smallvec::smallvec![0; self.original.ndim()];
        self.dims.offsets(idx, &mut new_offsets);
        self.map_offsets(&mut original_offsets, &new_offsets);
        self.original.index(&original_offsets)
    }
}

/// A reusable factory of [`Map`]s: where a `Map` relates two specific
/// shapes, a `Mapper` relates two kinds of shape, and is bound to a concrete
/// parent with [`bind`](Mapper::bind).
#[derive(Debug, Clone)]
pub struct Mapper {
    outputs: SmallVec<[AxisOutput; 8]>,
    constants: Lengths,
}

impl Mapper {
    /// Resolve this mapper against a concrete parent shape, producing a
    /// [`Map`] whose new shape takes each non-constant output axis's length
    /// from the parent.
    ///
    /// # Panics
    ///
    /// Panics if the mapper references an axis the parent shape does not
    /// have (its length would be zero).
    pub fn bind(&self, original: &Dims) -> Map {
        let lengths: Lengths = self
            .outputs
            .iter()
            .filter(|output| !output.constant)
            .map(|output| original.length(output.axis as usize))
            .collect();
        Map {
            dims: Dims::new(&lengths),
            original: original.clone(),
            transform: Transform::Swizzle {
                outputs: self.outputs.clone(),
                constants: self.constants.clone(),
            },
        }
    }
}

/// Returns a [`Map`] of a sub-region of the target shape.
///
/// The sub-region is specified by the flat index of a start point on the
/// target and the requested length along each axis. A length that would
/// reach past the target boundary is clamped to it. Reading a mapped offset
/// past the clamp boundary wraps round: the crop is circular, like the
/// underlying codec.
///
/// # Panics
///
/// Panics if `lengths` does not provide one length per target axis, or if
/// any requested length is zero.
///
/// # Examples
///
/// ```
/// use ndmatrix::{crop, Dims};
///
/// let target = Dims::new(&[9, 9]);
/// let map = crop(&target, target.index(&[2, 3]), &[4, 5]);
/// assert_eq!(map.dims().lengths(), &[4, 5]);
///
/// let mut offsets = [0usize; 2];
/// map.map_offsets(&mut offsets, &[0, 0]);
/// assert_eq!(offsets, [2, 3]);
/// map.map_offsets(&mut offsets, &[3, 3]);
/// assert_eq!(offsets, [5, 6]);
/// ```
pub fn crop(target: &Dims, start_idx: usize, lengths: &[usize]) -> Map {
    let ndim = target.ndim();
    if lengths.len() != ndim {
        panic!(
            "{}",
            MatrixError::DimensionMismatch {
                requested: lengths.len(),
                actual: ndim,
            }
        );
    }

    let mut start: Lengths = smallvec::smallvec![0; ndim];
    target.offsets(start_idx, &mut start);

    // clamp to the target boundaries
    let mut clamped: Lengths = SmallVec::from_slice(lengths);
    for i in 0..ndim {
        if start[i] + clamped[i] > target.length(i) {
            clamped[i] = target.length(i) - start[i];
        }
    }

    Map {
        dims: Dims::new(&clamped),
        original: target.clone(),
        transform: Transform::Crop { start },
    }
}

/// Parses a pattern describing how to flip, drop, reorder, or constant-bind
/// the axes of a shape, returning a [`Mapper`] that applies it.
///
/// The pattern is a sequence of axis tokens: the characters `0`-`9` and
/// `a`-`f` (case-insensitive) identify axes 0 to 15 on the parent, and as
/// syntax sugar the characters `x`, `y`, `z`, `w` are interchangeable with
/// `0`-`3`. The order of tokens is the order of axes on the new shape.
///
/// An axis preceded by `-` is mirrored, so that instead of being read e.g.
/// left to right it is read right to left. An axis preceded by `!` is
/// excluded from the new shape and instead bound to the next value in
/// `constants`, a fixed offset along that axis. Axes omitted entirely map to
/// offset zero on the parent.
///
/// ASCII whitespace is ignored. An axis may not be referenced twice, at
/// least one non-constant output axis is required, and any other character
/// is a syntax error; all errors report the byte offset.
///
/// # Examples
///
/// ```
/// use ndmatrix::{sampler, Dims};
///
/// // reverse the axis order of a 3D shape
/// let map = sampler("zyx", &[]).unwrap().bind(&Dims::new(&[4, 3, 2]));
/// assert_eq!(map.dims().lengths(), &[2, 3, 4]);
///
/// let mut offsets = [0usize; 3];
/// map.map_offsets(&mut offsets, &[1, 2, 3]);
/// assert_eq!(offsets, [3, 2, 1]);
///
/// // a 2D slice of a 3D shape along the plane z=4
/// let face = sampler("xy !z", &[4]).unwrap().bind(&Dims::new(&[3, 4, 5]));
/// assert_eq!(face.dims().lengths(), &[3, 4]);
/// face.map_offsets(&mut offsets, &[2, 3]);
/// assert_eq!(offsets, [2, 3, 4]);
/// ```
pub fn sampler(pattern: &str, constants: &[usize]) -> Result<Mapper, MatrixError> {
    let syntax_error = |offset: usize, kind: SamplerErrorKind| MatrixError::SamplerSyntax {
        input: pattern.to_owned(),
        offset,
        kind,
    };

    let mut outputs: SmallVec<[AxisOutput; 8]> = SmallVec::new();
    let mut seen = 0u16;
    let mut precede: Option<u8> = None;
    let mut consumed_constants = 0;
    let mut output_axes = 0;

    for (i, c) in pattern.bytes().enumerate() {
        let axis = match c {
            b'\t' | b'\n' | b' ' => continue,
            b'-' | b'!' if precede.is_none() => {
                precede = Some(c);
                continue;
            }
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => 10 + (c - b'a'),
            b'A'..=b'F' => 10 + (c - b'A'),
            b'x' | b'X' => 0,
            b'y' | b'Y' => 1,
            b'z' | b'Z' => 2,
            b'w' | b'W' => 3,
            _ => return Err(syntax_error(i, SamplerErrorKind::UnexpectedByte(c))),
        };

        if seen & (1 << axis) != 0 {
            return Err(syntax_error(i, SamplerErrorKind::DuplicateAxis));
        }
        let constant = precede == Some(b'!');
        if constant && consumed_constants >= constants.len() {
            return Err(syntax_error(i, SamplerErrorKind::ConstantsExhausted));
        }
        seen |= 1 << axis;

        if constant {
            consumed_constants += 1;
        } else {
            output_axes += 1;
        }
        outputs.push(AxisOutput {
            axis,
            mirror: precede == Some(b'-'),
            constant,
        });
        precede = None;
    }

    if output_axes == 0 {
        return Err(syntax_error(0, SamplerErrorKind::NoOutputAxes));
    }

    Ok(Mapper {
        outputs,
        constants: SmallVec::from_slice(&constants[..consumed_constants]),
    })
}
