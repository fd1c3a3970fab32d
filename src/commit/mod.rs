//! Lasso commit protocol
//!
//! # Submodules
//! - `protocol` - request / result wire types
//! - `local` - optimistic mutation of coded values
//! - `committer` - request ids, validation and the store write sequence

mod committer;
mod local;
mod protocol;

pub use committer::{read_coded_values, read_labels, CommitProtocol, CommitReceipt, PreparedCommit};
pub use local::apply_selection;
pub use protocol::{CommitRequest, CommitResult, CommitStatus, StoreRequest};
