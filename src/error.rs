//! Error types shared across the crate
//!
//! Codec and geometry errors are data-contract violations and propagate
//! synchronously. Store mutation errors arrive asynchronously and are only
//! reported, never rolled back.

use thiserror::Error;

/// Errors raised by the binary codec layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unsupported byte-like input: {0}")]
    UnsupportedInputKind(String),

    #[error("buffer length {len} is not a multiple of element width {width}")]
    MisalignedLength { len: usize, width: usize },

    #[error("invalid point count: {0}")]
    InvalidCount(String),

    #[error("bit index {index} out of range for a mask of {len} bytes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("window {offset}..{end} exceeds backing buffer of {len} bytes")]
    WindowOutOfBounds { offset: usize, end: usize, len: usize },

    #[error("packed mask has {actual} bytes, {expected} needed for {n_points} points")]
    MaskTooShort { actual: usize, expected: usize, n_points: usize },

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Errors raised while preparing, submitting or observing a lasso commit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("label {0:?} is not in the label table")]
    UnknownLabel(String),

    #[error("coded values hold {codes} entries but the selection covers {points} points")]
    LengthMismatch { codes: usize, points: usize },

    #[error("store value {key:?} is missing or malformed: {reason}")]
    MalformedStoreValue { key: String, reason: String },

    #[error("store rejected lasso request {request_id}: {message}")]
    StoreMutationError { request_id: u64, message: String },
}

/// Errors raised by the store-side category model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("value {0:?} is not in the label list")]
    UnknownValue(String),

    #[error("label list contains duplicate label {0:?}")]
    DuplicateLabel(String),

    #[error("labels {0:?} are in use but missing from the new label list")]
    MissingLabels(Vec<String>),

    #[error("expected {expected} coded values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("code {code} has no label (label list has {labels} entries)")]
    CodeOutOfRange { code: u16, labels: usize },

    #[error("label list of {0} entries does not fit 16-bit codes")]
    TooManyLabels(usize),
}

/// Errors raised while mapping coded values to colours
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("no color for code {code} (palette has {palette_len} entries)")]
    MissingColor { code: u16, palette_len: usize },
}
