//! Packed per-point boolean masks
//!
//! Bit order is big-endian within each byte: point `i` lives in byte `i >> 3`
//! at bit position `7 - (i & 7)`. This matches `numpy.packbits(bitorder="big")`
//! on the other side of the store.

use crate::error::CodecError;

/// Number of bytes needed to pack `n_points` bits.
///
/// The count arrives as a plain number from the store, so negative, fractional
/// and non-finite counts are rejected with `InvalidCount`.
pub fn packed_mask_length(n_points: f64) -> Result<usize, CodecError> {
    if !n_points.is_finite() || n_points < 0.0 || n_points.fract() != 0.0 {
        return Err(CodecError::InvalidCount(n_points.to_string()));
    }
    Ok(PackedMask::byte_len(n_points as usize))
}

/// Set bit `index` in a raw mask buffer
pub fn set_bit(mask: &mut [u8], index: usize) -> Result<(), CodecError> {
    let byte = index >> 3;
    if byte >= mask.len() {
        return Err(CodecError::IndexOutOfRange {
            index,
            len: mask.len(),
        });
    }
    mask[byte] |= 1 << (7 - (index & 7));
    Ok(())
}

/// Read bit `index`; out-of-range reads are `false`
pub fn get_bit(mask: &[u8], index: usize) -> bool {
    match mask.get(index >> 3) {
        Some(byte) => byte & (1 << (7 - (index & 7))) != 0,
        None => false,
    }
}

/// An owned packed mask sized for a fixed number of points
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedMask {
    bytes: Vec<u8>,
    n_points: usize,
}

impl PackedMask {
    /// `ceil(n_points / 8)`
    pub fn byte_len(n_points: usize) -> usize {
        n_points.div_ceil(8)
    }

    /// All-zero mask for `n_points` points
    pub fn new(n_points: usize) -> Self {
        Self {
            bytes: vec![0u8; Self::byte_len(n_points)],
            n_points,
        }
    }

    /// Zero-length mask selecting nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mask with exactly `indices` selected.
    ///
    /// Indices at or past `n_points` are a caller bug and are skipped.
    pub fn from_indices(n_points: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut mask = Self::new(n_points);
        for index in indices {
            debug_assert!(index < n_points, "index {} out of range for {} points", index, n_points);
            if index < n_points {
                mask.bytes[index >> 3] |= 1 << (7 - (index & 7));
            }
        }
        mask
    }

    /// Decode a mask received from the store.
    ///
    /// Extra trailing bytes and bits beyond `n_points` are dropped so the pad
    /// bits of the result are always zero.
    pub fn from_bytes(mut bytes: Vec<u8>, n_points: usize) -> Result<Self, CodecError> {
        let expected = Self::byte_len(n_points);
        if bytes.len() < expected {
            return Err(CodecError::MaskTooShort {
                actual: bytes.len(),
                expected,
                n_points,
            });
        }
        bytes.truncate(expected);
        let used = n_points & 7;
        if used != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
        Ok(Self { bytes, n_points })
    }

    /// Mark point `index` as selected
    pub fn set(&mut self, index: usize) -> Result<(), CodecError> {
        if index >= self.n_points {
            return Err(CodecError::IndexOutOfRange {
                index,
                len: self.bytes.len(),
            });
        }
        set_bit(&mut self.bytes, index)
    }

    pub fn get(&self, index: usize) -> bool {
        index < self.n_points && get_bit(&self.bytes, index)
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of selected points
    pub fn count_selected(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Selected point indices in ascending order
    pub fn iter_selected(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_points).filter(move |&i| get_bit(&self.bytes, i))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
