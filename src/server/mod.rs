//! Session server - drives a viewer session over JSON lines
//!
//! # Module Structure
//! - `protocol` - request/response types
//! - `state` - session state
//! - `util` - parameter parsing
//! - `handlers` - request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;
pub mod util;

pub use handlers::dispatch;
pub use protocol::{error_codes, ErrorResponse, Request, Response};
pub use state::SessionState;
