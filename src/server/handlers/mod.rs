//! Handler module declarations and request dispatch

pub mod interaction;
pub mod lasso;
pub mod session;

pub use interaction::*;
pub use lasso::*;
pub use session::*;

use super::protocol::{error_codes, Request, Response};
use super::state::SessionState;

/// Route one request to its handler
pub fn dispatch(state: &mut SessionState, request: Request) -> Response {
    let Request { id, method, params } = request;
    match method.as_str() {
        "Load" => handle_load(state, id, params),
        "SetCamera" => handle_set_camera(state, id, params),
        "Resize" => handle_resize(state, id, params),
        "SetMode" => handle_set_mode(state, id, params),
        "PointerDown" => handle_pointer_down(state, id, params),
        "PointerMove" => handle_pointer_move(state, id, params),
        "PointerUp" => handle_pointer_up(state, id),
        "PointerLeave" => handle_pointer_leave(state, id),
        "Key" => handle_key(state, id, params),
        "Cancel" => handle_cancel(state, id),
        "Commit" => handle_commit(state, id, params),
        "GetState" => handle_get_state(state, id),
        "GetColors" => handle_get_colors(state, id),
        "Close" => handle_close(state, id),
        _ => Response::error(id, error_codes::METHOD_NOT_FOUND, format!("Method not found: {}", method)),
    }
}
