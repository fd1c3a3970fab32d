//! Reactive key/value store contract
//!
//! The viewer core only consumes this interface. `MemoryStore` is an
//! in-process implementation used by the session server and the tests.

mod memory;

pub use memory::MemoryStore;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::codec::{to_bytes, BytesLike};
use crate::error::CodecError;

/// A value held by the store
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoreValue {
    #[default]
    Null,
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl StoreValue {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            StoreValue::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for StoreValue {
    fn from(value: serde_json::Value) -> Self {
        StoreValue::Json(value)
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(bytes: Vec<u8>) -> Self {
        StoreValue::Bytes(bytes)
    }
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Change callback; receives the new value of the key
pub type ChangeCallback = Box<dyn FnMut(&StoreValue)>;

/// Event name fired when `key` changes
pub fn change_event(key: &str) -> String {
    format!("change:{}", key)
}

/// Key/value model that persists state across a process boundary and
/// notifies on change
pub trait ReactiveStore {
    fn get(&self, key: &str) -> Option<&StoreValue>;

    fn set(&mut self, key: &str, value: StoreValue);

    /// Flush pending `set`s to the other side as one update
    fn save_changes(&mut self);

    fn subscribe(&mut self, event: &str, callback: ChangeCallback) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// How to treat store values that are not byte-like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Fail with `UnsupportedInputKind`
    #[default]
    Strict,
    /// Treat the value as an empty byte sequence
    Permissive,
}

fn classify(value: &StoreValue) -> Result<BytesLike<'_>, CodecError> {
    match value {
        StoreValue::Bytes(bytes) => Ok(BytesLike::Buffer(bytes)),
        StoreValue::Json(serde_json::Value::String(text)) => Ok(BytesLike::Base64(text)),
        StoreValue::Json(serde_json::Value::Object(map)) => match map.get("buffer") {
            Some(serde_json::Value::String(text)) => Ok(BytesLike::Base64(text)),
            Some(other) => Err(CodecError::UnsupportedInputKind(format!("buffer member {}", json_kind(other)))),
            None => Err(CodecError::UnsupportedInputKind("object without buffer".to_string())),
        },
        StoreValue::Json(other) => Err(CodecError::UnsupportedInputKind(json_kind(other).to_string())),
        StoreValue::Null => Err(CodecError::UnsupportedInputKind("null".to_string())),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Bytes carried by a store value: raw bytes, base64 text, or an object with
/// a base64 `buffer` member
pub fn bytes_of(value: &StoreValue, mode: InputMode) -> Result<Cow<'_, [u8]>, CodecError> {
    match classify(value) {
        Ok(input) => to_bytes(input),
        Err(CodecError::UnsupportedInputKind(kind)) if mode == InputMode::Permissive => {
            log::debug!("treating unsupported {} store value as empty bytes", kind);
            Ok(Cow::Borrowed(&[]))
        }
        Err(e) => Err(e),
    }
}
