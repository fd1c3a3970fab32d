//! Base64 text transport for stores that cannot carry raw bytes

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::CodecError;

/// Input bytes per encode chunk (multiple of 3, so no padding mid-stream)
const ENCODE_CHUNK: usize = 3 * 8192;
/// Input chars per decode chunk (multiple of 4)
const DECODE_CHUNK: usize = 4 * 8192;

/// Encode bytes as standard padded base64, chunk by chunk
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(ENCODE_CHUNK) {
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

/// Decode standard base64 text. Surrounding whitespace is ignored.
pub fn base64_to_bytes(text: &str) -> Result<Vec<u8>, CodecError> {
    let text = text.trim().as_bytes();
    let mut out = Vec::with_capacity(text.len() / 4 * 3);
    for chunk in text.chunks(DECODE_CHUNK) {
        STANDARD
            .decode_vec(chunk, &mut out)
            .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
    }
    Ok(out)
}
