//! Pointer and mode handlers: SetMode, PointerDown/Move/Up/Leave, Key, Cancel

use serde::Deserialize;
use serde_json::json;

use super::lasso::{check_commit_ready, commit_polygon};
use crate::interaction::{InteractionMode, KeyOutcome, LassoKey, LassoState, PointerInfo};
use crate::server::protocol::Response;
use crate::server::state::SessionState;
use crate::server::util::parse_params;

#[derive(Deserialize)]
struct PointerParams {
    x: f32,
    y: f32,
}

fn lasso_summary(state: &SessionState) -> serde_json::Value {
    let kind = match state.interaction.lasso() {
        LassoState::Idle => "idle",
        LassoState::Drawing { .. } => "drawing",
        LassoState::Ready { .. } => "ready",
    };
    json!({
        "lasso": kind,
        "num_points": state.interaction.lasso().points().len(),
    })
}

fn pointer(state: &SessionState, p: &PointerParams) -> PointerInfo {
    let (width, height) = state.surface_size;
    PointerInfo::from_surface(p.x, p.y, width, height)
}

/// Handle SetMode request - `{kind: "rotate"}` or `{kind: "lasso", operation}`
pub fn handle_set_mode(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    let mode: InteractionMode = match parse_params(id.clone(), params, "{kind: rotate|lasso, operation?: add|remove}") {
        Ok(m) => m,
        Err(e) => return e,
    };
    state.interaction.set_mode(mode);
    Response::success(id, lasso_summary(state))
}

pub fn handle_pointer_down(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    let p: PointerParams = match parse_params(id.clone(), params, "{x, y}") {
        Ok(p) => p,
        Err(e) => return e,
    };
    let info = pointer(state, &p);
    state.interaction.pointer_down(&info);
    Response::success(id, lasso_summary(state))
}

pub fn handle_pointer_move(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    let p: PointerParams = match parse_params(id.clone(), params, "{x, y}") {
        Ok(p) => p,
        Err(e) => return e,
    };
    let info = pointer(state, &p);
    state.interaction.pointer_move(&info);
    Response::success(id, lasso_summary(state))
}

pub fn handle_pointer_up(state: &mut SessionState, id: Option<serde_json::Value>) -> Response {
    state.interaction.pointer_up();
    Response::success(id, lasso_summary(state))
}

pub fn handle_pointer_leave(state: &mut SessionState, id: Option<serde_json::Value>) -> Response {
    state.interaction.pointer_leave();
    Response::success(id, lasso_summary(state))
}

pub fn handle_cancel(state: &mut SessionState, id: Option<serde_json::Value>) -> Response {
    state.interaction.cancel();
    Response::success(id, lasso_summary(state))
}

/// Handle Key request - Escape cancels, Enter commits with `label`
pub fn handle_key(state: &mut SessionState, id: Option<serde_json::Value>, params: Option<serde_json::Value>) -> Response {
    #[derive(Deserialize)]
    struct KeyParams {
        key: LassoKey,
        #[serde(default)]
        label: Option<String>,
    }

    let p: KeyParams = match parse_params(id.clone(), params, "{key: Escape|Enter, label?}") {
        Ok(p) => p,
        Err(e) => return e,
    };

    let label = match (p.key, p.label) {
        (LassoKey::Enter, label) => match check_commit_ready(state, id.clone(), label.as_deref()) {
            Ok(label) => Some(label),
            Err(e) => return e,
        },
        (LassoKey::Escape, _) => None,
    };

    match (state.interaction.handle_key(p.key), label) {
        (KeyOutcome::Committed(polygon), Some(label)) => commit_polygon(state, id, polygon, &label),
        _ => Response::success(id, lasso_summary(state)),
    }
}
