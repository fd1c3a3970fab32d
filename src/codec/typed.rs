//! Typed numeric views over raw byte buffers
//!
//! A view borrows the source bytes when they are already aligned for the
//! element type and stored in host byte order. Anything else is decoded into
//! a fresh, aligned buffer. Callers get a `Cow` and must not assume aliasing.

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::CodecError;

/// Byte order of elements inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the host
    pub const NATIVE: Endian = if cfg!(target_endian = "little") {
        Endian::Little
    } else {
        Endian::Big
    };
}

/// Fixed-width numeric element that can be viewed inside a byte buffer
pub trait Element: bytemuck::Pod {
    /// Width of one element in bytes
    const WIDTH: usize = std::mem::size_of::<Self>();

    fn read<B: ByteOrder>(bytes: &[u8]) -> Self;
    fn write<B: ByteOrder>(self, out: &mut [u8]);
}

impl Element for u8 {
    fn read<B: ByteOrder>(bytes: &[u8]) -> Self {
        bytes[0]
    }
    fn write<B: ByteOrder>(self, out: &mut [u8]) {
        out[0] = self;
    }
}

impl Element for i8 {
    fn read<B: ByteOrder>(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }
    fn write<B: ByteOrder>(self, out: &mut [u8]) {
        out[0] = self as u8;
    }
}

macro_rules! impl_element {
    ($ty:ty, $read:ident, $write:ident) => {
        impl Element for $ty {
            fn read<B: ByteOrder>(bytes: &[u8]) -> Self {
                B::$read(bytes)
            }
            fn write<B: ByteOrder>(self, out: &mut [u8]) {
                B::$write(out, self)
            }
        }
    };
}

impl_element!(u16, read_u16, write_u16);
impl_element!(i16, read_i16, write_i16);
impl_element!(u32, read_u32, write_u32);
impl_element!(i32, read_i32, write_i32);
impl_element!(f32, read_f32, write_f32);
impl_element!(f64, read_f64, write_f64);

/// View `bytes` as a sequence of `T` stored in `endian` byte order.
///
/// Fails with `MisalignedLength` when the length is not a multiple of the
/// element width.
pub fn to_typed_view<T: Element>(bytes: &[u8], endian: Endian) -> Result<Cow<'_, [T]>, CodecError> {
    if bytes.len() % T::WIDTH != 0 {
        return Err(CodecError::MisalignedLength {
            len: bytes.len(),
            width: T::WIDTH,
        });
    }

    if endian == Endian::NATIVE {
        if let Ok(view) = bytemuck::try_cast_slice::<u8, T>(bytes) {
            return Ok(Cow::Borrowed(view));
        }
    }

    let decoded: Vec<T> = match endian {
        Endian::Little => bytes.chunks_exact(T::WIDTH).map(T::read::<LittleEndian>).collect(),
        Endian::Big => bytes.chunks_exact(T::WIDTH).map(T::read::<BigEndian>).collect(),
    };
    Ok(Cow::Owned(decoded))
}

/// Encode elements into a byte buffer in the given byte order
pub fn encode_elements<T: Element>(values: &[T], endian: Endian) -> Vec<u8> {
    let mut buffer = vec![0u8; values.len() * T::WIDTH];
    for (&value, out) in values.iter().zip(buffer.chunks_exact_mut(T::WIDTH)) {
        match endian {
            Endian::Little => value.write::<LittleEndian>(out),
            Endian::Big => value.write::<BigEndian>(out),
        }
    }
    buffer
}

/// Group a flat `[x0, y0, z0, x1, ...]` array into xyz triples without copying
pub fn positions_from_floats(floats: &[f32]) -> Result<&[[f32; 3]], CodecError> {
    bytemuck::try_cast_slice(floats).map_err(|_| CodecError::MisalignedLength {
        len: floats.len() * f32::WIDTH,
        width: 3 * f32::WIDTH,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backing storage with guaranteed 8-byte alignment
    fn aligned_backing(bytes: &[u8]) -> Vec<u64> {
        let mut words = vec![0u64; bytes.len() / 8 + 2];
        bytemuck::cast_slice_mut::<u64, u8>(&mut words)[..bytes.len()].copy_from_slice(bytes);
        words
    }

    #[test]
    fn test_aligned_little_endian_view_borrows() {
        let backing = aligned_backing(&[0, 0, 128, 63, 0, 0, 0, 64]);
        let bytes = &bytemuck::cast_slice::<u64, u8>(&backing)[..8];

        let view = to_typed_view::<f32>(bytes, Endian::Little).unwrap();
        assert_eq!(&*view, &[1.0, 2.0]);
        if cfg!(target_endian = "little") {
            assert!(matches!(view, Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_misaligned_view_copies_same_values() {
        let mut raw = vec![0xAAu8];
        raw.extend_from_slice(&[0, 0, 128, 63]);
        let backing = aligned_backing(&raw);
        let bytes = &bytemuck::cast_slice::<u64, u8>(&backing)[1..5];

        let view = to_typed_view::<f32>(bytes, Endian::Little).unwrap();
        assert_eq!(&*view, &[1.0]);
        assert!(matches!(view, Cow::Owned(_)));
    }

    #[test]
    fn test_length_not_multiple_of_width() {
        let err = to_typed_view::<u32>(&[1, 2, 3, 4, 5, 6], Endian::Little).unwrap_err();
        assert_eq!(err, CodecError::MisalignedLength { len: 6, width: 4 });
    }

    #[test]
    fn test_big_endian_u16() {
        let view = to_typed_view::<u16>(&[0x01, 0x02, 0x00, 0xFF], Endian::Big).unwrap();
        assert_eq!(&*view, &[0x0102, 0x00FF]);
    }

    #[test]
    fn test_encode_elements_matches_to_le_bytes() {
        let codes: Vec<u16> = vec![2, 1, 0, 513];
        let encoded = encode_elements(&codes, Endian::Little);
        assert_eq!(encoded, vec![2, 0, 1, 0, 0, 0, 1, 2]);

        let decoded = to_typed_view::<u16>(&encoded, Endian::Little).unwrap();
        assert_eq!(&*decoded, codes.as_slice());
    }

    #[test]
    fn test_positions_from_floats() {
        let floats = [1.0f32, 2.0, 3.0, 4.5, 5.5, 6.5];
        let positions = positions_from_floats(&floats).unwrap();
        assert_eq!(positions, &[[1.0, 2.0, 3.0], [4.5, 5.5, 6.5]]);

        assert!(positions_from_floats(&floats[..4]).is_err());
    }
}
