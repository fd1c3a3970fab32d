//! Line framing for the session server
//!
//! Each stdin line holds one `Request`; each reply is one `Response` line on
//! stdout carrying the same `id`. Exactly one of `result` or `error` is set.

use serde::{Deserialize, Serialize};

/// A viewer command such as `Load`, `PointerMove` or `Commit`
#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// Reply to one command, echoing its `id`
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

/// Failure payload; `code` is one of [`error_codes`]
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

impl Response {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Wrap a handler snapshot (viewport, receipt, ...) as the result
    pub fn from_serializable<T: Serialize>(id: Option<serde_json::Value>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Response::success(id, value),
            Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to encode result: {}", e)),
        }
    }

    pub fn error(id: Option<serde_json::Value>, code: i32, message: String) -> Self {
        Response {
            id,
            result: None,
            error: Some(ErrorResponse { code, message }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Framing errors reuse the JSON-RPC numbers; viewer failures are small positives
pub mod error_codes {
    /// Input line is not a `Request`
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    /// A command needs points and labels, but nothing was loaded
    pub const NO_DATA_LOADED: i32 = 2;
    /// `Load` payload is inconsistent (bad base64, counts, labels)
    pub const INVALID_DATA: i32 = 3;
    pub const NOT_IN_LASSO_MODE: i32 = 4;
    /// `submit` refused the commit; the store is untouched
    pub const COMMIT_FAILED: i32 = 5;
}
