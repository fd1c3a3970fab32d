//! Wire types exchanged through the store

use serde::{Deserialize, Serialize};

use crate::interaction::Operation;

/// Lasso commit request written to `lasso_request_t`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    #[serde(rename = "op")]
    pub operation: Operation,
    pub label: String,
    pub request_id: u64,
}

/// Envelope tagging each request with its `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreRequest {
    LassoCommit(CommitRequest),
}

/// Outcome of a commit as reported by the store side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommitStatus {
    Ok { num_selected: usize, num_changed: usize },
    Error { message: String },
}

/// Result written to `lasso_result_t`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub request_id: u64,
    #[serde(flatten)]
    pub status: CommitStatus,
}

impl CommitResult {
    pub fn ok(request_id: u64, num_selected: usize, num_changed: usize) -> Self {
        Self {
            request_id,
            status: CommitStatus::Ok { num_selected, num_changed },
        }
    }

    pub fn error(request_id: u64, message: impl Into<String>) -> Self {
        Self {
            request_id,
            status: CommitStatus::Error { message: message.into() },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, CommitStatus::Ok { .. })
    }
}
