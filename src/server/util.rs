//! Helpers shared by the request handlers

use serde::de::DeserializeOwned;

use super::protocol::{error_codes, Response};

/// Deserialize `params`, or build the `INVALID_PARAMS` response to send back.
///
/// `expected` is a short shape hint such as `"{x, y}"`.
pub fn parse_params<T: DeserializeOwned>(
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    expected: &str,
) -> Result<T, Response> {
    let params = params.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(params).map_err(|e| {
        Response::error(
            id,
            error_codes::INVALID_PARAMS,
            format!("Invalid params: expected {} ({})", expected, e),
        )
    })
}
