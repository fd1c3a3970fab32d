//! Binary codec for the store boundary
//!
//! Turns opaque byte buffers into typed numeric views, packs per-point
//! selections into bitmasks, and provides the base64 fallback transport.
//!
//! # Submodules
//! - `bytes` - byte-like input normalisation
//! - `typed` - typed views with explicit alignment / byte-order handling
//! - `mask` - big-endian packed boolean masks
//! - `transport` - chunked base64 encode/decode

mod bytes;
mod mask;
mod transport;
mod typed;

pub use bytes::{to_bytes, BytesLike, HasBuffer};

pub use typed::{
    encode_elements,
    positions_from_floats,
    to_typed_view,
    Element,
    Endian,
};

pub use mask::{
    get_bit,
    packed_mask_length,
    set_bit,
    PackedMask,
};

pub use transport::{base64_to_bytes, bytes_to_base64};
