//! Lasso commit handler: runs the full pipeline for one committed lasso

use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::error::CommitError;
use crate::interaction::{InteractionMode, Polygon};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::SessionState;
use crate::server::util::parse_params;

/// Check a commit can run before the ready lasso is consumed
pub fn check_commit_ready(
    state: &SessionState,
    id: Option<serde_json::Value>,
    label: Option<&str>,
) -> Result<String, Response> {
    let Some(label) = label else {
        return Err(Response::error(id, error_codes::INVALID_PARAMS, "Invalid params: expected {label}".to_string()));
    };
    if !state.is_loaded() {
        return Err(Response::error(id, error_codes::NO_DATA_LOADED, "No data loaded. Call Load first.".to_string()));
    }
    if !matches!(state.interaction.mode(), InteractionMode::Lasso { .. }) {
        return Err(Response::error(id, error_codes::NOT_IN_LASSO_MODE, "Not in lasso mode".to_string()));
    }
    Ok(label.to_string())
}

/// Prepare, submit, let the store side answer, then observe the result
pub fn commit_polygon(
    state: &mut SessionState,
    id: Option<serde_json::Value>,
    polygon: Option<Polygon>,
    label: &str,
) -> Response {
    let InteractionMode::Lasso { operation } = state.interaction.mode() else {
        return Response::error(id, error_codes::NOT_IN_LASSO_MODE, "Not in lasso mode".to_string());
    };
    let Some(polygon) = polygon else {
        return Response::success(id, json!({ "status": "noop" }));
    };

    let Some(prepared) = state
        .protocol
        .prepare_commit(polygon, &state.positions, &state.projector, operation, label)
    else {
        return Response::success(id, json!({ "status": "empty" }));
    };

    let receipt = match state.protocol.submit(&mut state.store, prepared) {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!("Lasso commit failed: {}", e);
            return Response::error(id, error_codes::COMMIT_FAILED, e.to_string());
        }
    };

    // The in-process category plays the store side of the boundary
    let keys = state.config.keys.clone();
    if let Some(category) = state.category.as_mut() {
        category.respond_to_store(&mut state.store, &keys, state.config.input_mode);
    }

    let mut store_error = None;
    if state.take_result_ready() {
        match state.protocol.read_result(&state.store) {
            Ok(Some(result)) => {
                if let Err(CommitError::StoreMutationError { message, .. }) = state.protocol.on_commit_result(&result) {
                    store_error = Some(message);
                }
                state.last_result = Some(result);
            }
            Ok(None) => {}
            Err(e) => warn!("Unreadable lasso result: {}", e),
        }
    }

    info!(
        "Lasso {} for {:?}: {} selected, {} changed",
        receipt.request_id, label, receipt.num_selected, receipt.num_changed
    );

    let status = if store_error.is_some() { "error" } else { "ok" };
    Response::success(
        id,
        json!({
            "status": status,
            "receipt": receipt,
            "result": state.last_result,
            "store_error": store_error,
            "num_unassigned": state.category.as_ref().map(|c| c.num_unassigned()),
        }),
    )
}

/// Handle Commit request - commits the ready lasso with `label`
pub fn handle_commit(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    struct CommitParams {
        label: String,
    }

    let p: CommitParams = match parse_params(id.clone(), params, "{label}") {
        Ok(p) => p,
        Err(e) => return e,
    };
    let label = match check_commit_ready(state, id.clone(), Some(&p.label)) {
        Ok(label) => label,
        Err(e) => return e,
    };

    let polygon = state.interaction.commit();
    commit_polygon(state, id, polygon, &label)
}
