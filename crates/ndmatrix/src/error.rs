//! Error types for ndmatrix.

use thiserror::Error;

/// Errors that can occur constructing or addressing matrices.
///
/// These are all input-validation failures. None are transient; callers that
/// need graceful degradation should validate shapes and coordinates before
/// calling.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// An access used a coordinate arity incompatible with the matrix's
    /// declared dimensionality.
    #[error("matrix dimension mismatch: {requested}D access, but matrix is {actual}D")]
    DimensionMismatch { requested: usize, actual: usize },

    /// A flat index is out of range for the matrix volume.
    ///
    /// This is raised only for direct-index access; coordinate-based access
    /// wraps out-of-range offsets modulo the axis length instead.
    #[error("matrix index out of range: index {index} for size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Caller-provided backing storage is smaller than the declared shape's
    /// volume.
    #[error("shared buffer too small: shape needs {expected} elements, buffer holds {actual}")]
    SharedBufferTooSmall { expected: usize, actual: usize },

    /// A malformed sampler pattern (see [`crate::dims::sampler`]).
    #[error("error parsing sampler pattern {input:?}: at byte offset {offset}: {kind}")]
    SamplerSyntax {
        input: String,
        offset: usize,
        kind: SamplerErrorKind,
    },
}

/// The specific way a sampler pattern failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SamplerErrorKind {
    #[error("unexpected byte {0:#04x}")]
    UnexpectedByte(u8),

    #[error("dimension referenced twice")]
    DuplicateAxis,

    #[error("must have at least one non-constant output")]
    NoOutputAxes,

    #[error("constant index out of range")]
    ConstantsExhausted,
}

/// Errors reading or writing the binary representation of a
/// [`crate::bitseq::Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The input does not begin with the bit store magic tag.
    #[error("bad magic: not a serialized bit store")]
    BadMagic,

    /// The trailing checksum does not match the data read.
    #[error("checksum mismatch: expected {expected:#018x}, found {actual:#018x}")]
    ChecksumMismatch { expected: u64, actual: u64 },

    /// The header declares more buckets than the caller-supplied limit.
    ///
    /// This bounds allocation when reading untrusted input.
    #[error("refusing to read {buckets} buckets (limit {limit})")]
    TooLarge { buckets: usize, limit: usize },

    /// The header fields are internally inconsistent.
    #[error("malformed bit store: {0}")]
    Malformed(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
