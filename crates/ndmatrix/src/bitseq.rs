//! A growable sequence of bits packed into 64-bit buckets, with a
//! checksummed binary representation.
//!
//! [`Store`] keeps an explicit logical bit length separate from its backing
//! buckets, so trailing zero bits cost nothing: setting a bit beyond the
//! backing simply grows it, and setting a `false` bit beyond the length is a
//! no-op. This makes the all-zero store of any length free, which the
//! bit-packed matrix backends rely on.

use std::io::{Read, Write};

use crc::{Crc, Digest, CRC_64_XZ};

use crate::error::StoreError;

const BUCKET_BITS: usize = 64;

/// Identifies serialized bit store data; the little-endian encoding of the
/// ASCII bytes `BitseqV1`.
const MAGIC: u64 = u64::from_le_bytes(*b"BitseqV1");

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

/// A growable bit vector packed 64 bits per bucket.
///
/// Bits default to `false`. The logical length is tracked separately from
/// the backing buckets: bits beyond the last bucket read as `false`, and
/// the backing only grows when a `true` bit is written there.
///
/// # Examples
///
/// ```
/// use ndmatrix::bitseq::Store;
///
/// let mut bits = Store::new();
/// bits.set(3, true);
/// bits.set(200, true);
/// assert_eq!(bits.len(), 201);
/// assert!(bits.get(3));
/// assert!(!bits.get(4));
/// assert_eq!(bits.next_true(4), Some(200));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    length: usize,
    buckets: Vec<u64>,
}

impl Store {
    /// Creates an empty bit store.
    pub fn new() -> Self {
        Store::default()
    }

    /// Creates an all-zero bit store of the given logical length.
    ///
    /// No buckets are allocated; the backing grows on the first `true` write.
    pub fn with_len(length: usize) -> Self {
        Store {
            length,
            buckets: Vec::new(),
        }
    }

    /// The logical number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the bit at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not less than [`len`](Self::len).
    pub fn get(&self, idx: usize) -> bool {
        if idx >= self.length {
            panic!(
                "bit index out of range: index {idx} for length {}",
                self.length
            );
        }
        match self.buckets.get(idx / BUCKET_BITS) {
            Some(bucket) => bucket & (1 << (idx % BUCKET_BITS)) != 0,
            None => false,
        }
    }

    /// Sets the bit at `idx`, extending the logical length to cover it.
    ///
    /// Writing `false` past the backing is a no-op apart from the length
    /// extension; no buckets are allocated for it.
    pub fn set(&mut self, idx: usize, value: bool) {
        if idx >= self.length {
            self.length = idx + 1;
        }
        let bucket = idx / BUCKET_BITS;
        if bucket >= self.buckets.len() {
            if !value {
                return;
            }
            self.buckets.resize(bucket + 1, 0);
        }
        let mask = 1u64 << (idx % BUCKET_BITS);
        if value {
            self.buckets[bucket] |= mask;
        } else {
            self.buckets[bucket] &= !mask;
        }
    }

    /// Appends a bit at the end of the sequence.
    pub fn push(&mut self, value: bool) {
        self.set(self.length, value);
    }

    /// Removes and returns the last bit, or `None` if the store is empty.
    pub fn pop(&mut self) -> Option<bool> {
        let value = self.peek()?;
        self.resize(self.length - 1);
        Some(value)
    }

    /// Returns the last bit without removing it, or `None` if the store is
    /// empty.
    pub fn peek(&self) -> Option<bool> {
        if self.length == 0 {
            None
        } else {
            Some(self.get(self.length - 1))
        }
    }

    /// Resets every bit to `false`, keeping the logical length.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Changes the logical length.
    ///
    /// Shrinking drops buckets past the new end and masks off the bits of
    /// the final partial bucket, so a later grow reads them as `false`.
    pub fn resize(&mut self, length: usize) {
        self.length = length;
        let buckets = length.div_ceil(BUCKET_BITS);
        if buckets < self.buckets.len() {
            self.buckets.truncate(buckets);
        }
        let tail = length % BUCKET_BITS;
        if tail != 0 {
            if let Some(last) = self.buckets.get_mut(buckets - 1) {
                *last &= (1u64 << tail) - 1;
            }
        }
    }

    /// Returns the index of the first `true` bit at or after `start`, or
    /// `None` if the rest of the sequence is `false`.
    pub fn next_true(&self, start: usize) -> Option<usize> {
        if start >= self.length {
            return None;
        }
        let mut bucket = start / BUCKET_BITS;
        // mask off bits before start in the first bucket
        let mut mask = !0u64 << (start % BUCKET_BITS);
        while bucket < self.buckets.len() {
            let word = self.buckets[bucket] & mask;
            if word != 0 {
                let idx = bucket * BUCKET_BITS + word.trailing_zeros() as usize;
                return (idx < self.length).then_some(idx);
            }
            bucket += 1;
            mask = !0;
        }
        None
    }

    /// Returns the index of the first `false` bit at or after `start`, or
    /// `None` if the rest of the sequence is `true`.
    ///
    /// Bits past the backing buckets but within the logical length count as
    /// `false`.
    pub fn next_false(&self, start: usize) -> Option<usize> {
        if start >= self.length {
            return None;
        }
        let total = self.length.div_ceil(BUCKET_BITS);
        let mut bucket = start / BUCKET_BITS;
        let mut mask = !0u64 << (start % BUCKET_BITS);
        while bucket < total {
            // buckets past the backing are implicitly all-false
            let word = !self.buckets.get(bucket).copied().unwrap_or(0) & mask;
            if word != 0 {
                let idx = bucket * BUCKET_BITS + word.trailing_zeros() as usize;
                return (idx < self.length).then_some(idx);
            }
            bucket += 1;
            mask = !0;
        }
        None
    }

    /// Writes the binary representation of the store.
    ///
    /// The format is a sequence of little-endian 64-bit words: a magic tag,
    /// a stats word packing the bit length and bucket count, the buckets
    /// themselves, and a CRC-64 checksum of everything before it. Trailing
    /// all-zero buckets are not written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), StoreError> {
        let mut buckets = self.buckets.len();
        while buckets > 0 && self.buckets[buckets - 1] == 0 {
            buckets -= 1;
        }

        let mut digest = CRC64.digest();
        write_word(w, &mut digest, MAGIC)?;
        write_word(w, &mut digest, (self.length as u64) << 32 | buckets as u64)?;
        for &bucket in &self.buckets[..buckets] {
            write_word(w, &mut digest, bucket)?;
        }
        let checksum = digest.finalize();
        w.write_all(&checksum.to_le_bytes())?;
        Ok(())
    }

    /// Reads a store previously written with [`write_to`](Self::write_to).
    ///
    /// `max_buckets` bounds the allocation: input declaring more buckets is
    /// rejected with [`StoreError::TooLarge`] before anything is allocated,
    /// so untrusted data cannot force a huge allocation with a small header.
    pub fn read_from<R: Read>(r: &mut R, max_buckets: usize) -> Result<Self, StoreError> {
        let mut digest = CRC64.digest();
        if read_word(r, &mut digest)? != MAGIC {
            return Err(StoreError::BadMagic);
        }

        let stats = read_word(r, &mut digest)?;
        let length = (stats >> 32) as usize;
        let count = (stats & 0xffff_ffff) as usize;
        if count > max_buckets {
            return Err(StoreError::TooLarge {
                buckets: count,
                limit: max_buckets,
            });
        }
        if count > length.div_ceil(BUCKET_BITS) {
            return Err(StoreError::Malformed("more buckets than the length holds"));
        }

        let mut buckets = Vec::with_capacity(count);
        for _ in 0..count {
            buckets.push(read_word(r, &mut digest)?);
        }

        let expected = digest.finalize();
        let mut actual = [0u8; 8];
        r.read_exact(&mut actual)?;
        let actual = u64::from_le_bytes(actual);
        if actual != expected {
            return Err(StoreError::ChecksumMismatch { expected, actual });
        }

        Ok(Store { length, buckets })
    }
}

fn write_word<W: Write>(
    w: &mut W,
    digest: &mut Digest<'_, u64>,
    word: u64,
) -> Result<(), StoreError> {
    let bytes = word.to_le_bytes();
    digest.update(&bytes);
    w.write_all(&bytes)?;
    Ok(())
}

fn read_word<R: Read>(r: &mut R, digest: &mut Digest<'_, u64>) -> Result<u64, StoreError> {
    let mut bytes = [0u8; 8];
    r.read_exact(&mut bytes)?;
    digest.update(&bytes);
    Ok(u64::from_le_bytes(bytes))
}
