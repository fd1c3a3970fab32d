//! Normalisation of byte-like inputs into a plain byte sequence

use std::borrow::Cow;

use super::transport::base64_to_bytes;
use crate::error::CodecError;

/// Anything that exposes an underlying byte buffer
pub trait HasBuffer {
    fn buffer(&self) -> &[u8];
}

impl HasBuffer for Vec<u8> {
    fn buffer(&self) -> &[u8] {
        self
    }
}

/// The shapes a "bytes-like" value can take when it reaches the codec
#[derive(Clone, Copy)]
pub enum BytesLike<'a> {
    /// A whole raw buffer
    Buffer(&'a [u8]),
    /// A byte window onto a larger backing buffer
    ByteView {
        backing: &'a [u8],
        byte_offset: usize,
        byte_length: usize,
    },
    /// A window of fixed-width elements onto a backing buffer
    ElementView {
        backing: &'a [u8],
        byte_offset: usize,
        element_width: usize,
        length: usize,
    },
    /// An object exposing its buffer
    Wrapped(&'a dyn HasBuffer),
    /// Base64 text, used when the store cannot carry raw bytes
    Base64(&'a str),
}

impl std::fmt::Debug for BytesLike<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BytesLike::Buffer(b) => write!(f, "Buffer({} bytes)", b.len()),
            BytesLike::ByteView { byte_offset, byte_length, .. } => {
                write!(f, "ByteView({}+{})", byte_offset, byte_length)
            }
            BytesLike::ElementView { byte_offset, element_width, length, .. } => {
                write!(f, "ElementView({}+{}x{})", byte_offset, length, element_width)
            }
            BytesLike::Wrapped(w) => write!(f, "Wrapped({} bytes)", w.buffer().len()),
            BytesLike::Base64(s) => write!(f, "Base64({} chars)", s.len()),
        }
    }
}

fn window(backing: &[u8], offset: usize, len: usize) -> Result<&[u8], CodecError> {
    let end = offset.checked_add(len).unwrap_or(usize::MAX);
    backing.get(offset..end).ok_or(CodecError::WindowOutOfBounds {
        offset,
        end,
        len: backing.len(),
    })
}

/// Normalise a byte-like input. Views keep pointing into their backing
/// buffer (so alignment is preserved for typed views); base64 decodes into
/// an owned buffer.
pub fn to_bytes(input: BytesLike<'_>) -> Result<Cow<'_, [u8]>, CodecError> {
    match input {
        BytesLike::Buffer(bytes) => Ok(Cow::Borrowed(bytes)),
        BytesLike::ByteView { backing, byte_offset, byte_length } => {
            window(backing, byte_offset, byte_length).map(Cow::Borrowed)
        }
        BytesLike::ElementView { backing, byte_offset, element_width, length } => {
            let byte_length = element_width.checked_mul(length).ok_or(CodecError::WindowOutOfBounds {
                offset: byte_offset,
                end: usize::MAX,
                len: backing.len(),
            })?;
            window(backing, byte_offset, byte_length).map(Cow::Borrowed)
        }
        BytesLike::Wrapped(wrapper) => Ok(Cow::Borrowed(wrapper.buffer())),
        BytesLike::Base64(text) => base64_to_bytes(text).map(Cow::Owned),
    }
}
