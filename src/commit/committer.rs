//! Request-id bookkeeping and the store write sequence for a lasso commit

use glam::Vec2;
use indexmap::IndexSet;
use log::{debug, info, warn};
use serde::Serialize;

use super::local::apply_selection;
use super::protocol::{CommitRequest, CommitResult, CommitStatus, StoreRequest};
use crate::codec::{bytes_to_base64, encode_elements, to_typed_view, Endian, PackedMask};
use crate::config::{MaskTransport, StoreKeys, ViewerConfig};
use crate::error::CommitError;
use crate::interaction::{Operation, Polygon};
use crate::selection::{select_mask, Projector};
use crate::store::{bytes_of, InputMode, ReactiveStore, StoreValue};

/// A selection that has been assigned a request id but not yet written
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCommit {
    pub request_id: u64,
    pub operation: Operation,
    pub label: String,
    pub mask: PackedMask,
}

/// What `submit` wrote, for the caller's bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    pub request_id: u64,
    pub num_selected: usize,
    pub num_changed: usize,
}

/// Client side of the lasso commit protocol.
///
/// Request ids start at 1 and only increase for the lifetime of the value.
/// Results arrive asynchronously; they are reported but never rolled back.
#[derive(Debug, Clone)]
pub struct CommitProtocol {
    next_request_id: u64,
    pending: IndexSet<u64>,
    keys: StoreKeys,
    transport: MaskTransport,
    input_mode: InputMode,
}

impl Default for CommitProtocol {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl CommitProtocol {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            next_request_id: 1,
            pending: IndexSet::new(),
            keys: config.keys.clone(),
            transport: config.mask_transport,
            input_mode: config.input_mode,
        }
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Request ids submitted but not yet answered, oldest first
    pub fn pending(&self) -> impl Iterator<Item = u64> + '_ {
        self.pending.iter().copied()
    }

    /// Run the selection for `polygon` and reserve a request id.
    ///
    /// Returns `None` when no point is selected; no id is consumed then.
    pub fn prepare_commit<P>(
        &mut self,
        polygon: Polygon,
        points: &[[f32; 3]],
        projector: &P,
        operation: Operation,
        label: &str,
    ) -> Option<PreparedCommit>
    where
        P: Projector + ?Sized,
    {
        let vertices: &[Vec2] = polygon.as_ref();
        let mask = select_mask(vertices, points, projector);
        if mask.is_empty() {
            debug!("lasso selected no points, nothing to commit");
            return None;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        debug!(
            "prepared lasso request {}: {} of {} points",
            request_id,
            mask.count_selected(),
            mask.n_points()
        );

        Some(PreparedCommit {
            request_id,
            operation,
            label: label.to_string(),
            mask,
        })
    }

    /// Apply the selection locally and publish it through `store`.
    ///
    /// Validation happens before any write, so a failed submit leaves the
    /// store untouched. On success the coded values, the mask and the request
    /// go out in a single `save_changes`.
    pub fn submit<S>(&mut self, store: &mut S, prepared: PreparedCommit) -> Result<CommitReceipt, CommitError>
    where
        S: ReactiveStore + ?Sized,
    {
        let labels = read_labels(store, &self.keys.labels)?;
        let code = labels
            .iter()
            .position(|l| *l == prepared.label)
            .ok_or_else(|| CommitError::UnknownLabel(prepared.label.clone()))?;
        let code = u16::try_from(code + 1).map_err(|_| CommitError::MalformedStoreValue {
            key: self.keys.labels.clone(),
            reason: format!("{} labels do not fit 16-bit codes", labels.len()),
        })?;

        let mut codes = read_coded_values(store, &self.keys.coded_values, self.input_mode)?;
        if codes.len() != prepared.mask.n_points() {
            return Err(CommitError::LengthMismatch {
                codes: codes.len(),
                points: prepared.mask.n_points(),
            });
        }

        let num_selected = prepared.mask.count_selected();
        let num_changed = apply_selection(&mut codes, &prepared.mask, prepared.operation, code);

        let request = StoreRequest::LassoCommit(CommitRequest {
            operation: prepared.operation,
            label: prepared.label,
            request_id: prepared.request_id,
        });
        let request = serde_json::to_value(&request).map_err(|e| CommitError::MalformedStoreValue {
            key: self.keys.lasso_request.clone(),
            reason: e.to_string(),
        })?;

        let mask = match self.transport {
            MaskTransport::Raw => StoreValue::Bytes(prepared.mask.into_bytes()),
            MaskTransport::Base64 => StoreValue::Json(bytes_to_base64(prepared.mask.as_bytes()).into()),
        };

        store.set(&self.keys.coded_values, StoreValue::Bytes(encode_elements(&codes, Endian::Little)));
        store.set(&self.keys.lasso_mask, mask);
        store.set(&self.keys.lasso_request, StoreValue::Json(request));
        store.save_changes();

        self.pending.insert(prepared.request_id);
        info!(
            "submitted lasso request {} ({:?} code {}): {} selected, {} changed locally",
            prepared.request_id, prepared.operation, code, num_selected, num_changed
        );

        Ok(CommitReceipt {
            request_id: prepared.request_id,
            num_selected,
            num_changed,
        })
    }

    /// Observe a result from the store side.
    ///
    /// An error result is returned as `StoreMutationError`; local state is
    /// left as is. Results for ids this protocol never submitted are ignored.
    pub fn on_commit_result(&mut self, result: &CommitResult) -> Result<(), CommitError> {
        if !self.pending.shift_remove(&result.request_id) {
            warn!("ignoring result for unknown lasso request {}", result.request_id);
            return Ok(());
        }

        match &result.status {
            CommitStatus::Ok { num_selected, num_changed } => {
                info!(
                    "lasso request {} applied: {} selected, {} changed",
                    result.request_id, num_selected, num_changed
                );
                Ok(())
            }
            CommitStatus::Error { message } => {
                warn!("lasso request {} failed: {}", result.request_id, message);
                Err(CommitError::StoreMutationError {
                    request_id: result.request_id,
                    message: message.clone(),
                })
            }
        }
    }

    /// Decode the current `lasso_result_t`, if one has been written
    pub fn read_result<S>(&self, store: &S) -> Result<Option<CommitResult>, CommitError>
    where
        S: ReactiveStore + ?Sized,
    {
        match store.get(&self.keys.lasso_result) {
            None | Some(StoreValue::Null) => Ok(None),
            Some(StoreValue::Json(value)) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                CommitError::MalformedStoreValue {
                    key: self.keys.lasso_result.clone(),
                    reason: e.to_string(),
                }
            }),
            Some(StoreValue::Bytes(_)) => Err(CommitError::MalformedStoreValue {
                key: self.keys.lasso_result.clone(),
                reason: "expected JSON, found bytes".to_string(),
            }),
        }
    }
}

/// Label table: a JSON array of strings, code = index + 1
pub fn read_labels<S>(store: &S, key: &str) -> Result<Vec<String>, CommitError>
where
    S: ReactiveStore + ?Sized,
{
    let malformed = |reason: &str| CommitError::MalformedStoreValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let value = store
        .get(key)
        .and_then(StoreValue::as_json)
        .ok_or_else(|| malformed("expected a JSON array of labels"))?;
    let items = value.as_array().ok_or_else(|| malformed("expected a JSON array of labels"))?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| malformed("label is not a string")))
        .collect()
}

/// Coded values: u16 little-endian per point
pub fn read_coded_values<S>(store: &S, key: &str, mode: InputMode) -> Result<Vec<u16>, CommitError>
where
    S: ReactiveStore + ?Sized,
{
    let value = store.get(key).ok_or_else(|| CommitError::MalformedStoreValue {
        key: key.to_string(),
        reason: "missing".to_string(),
    })?;
    let bytes = bytes_of(value, mode)?;
    let codes = to_typed_view::<u16>(&bytes, Endian::Little)?;
    Ok(codes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{InteractionMode, InteractionState, PointerInfo};
    use crate::selection::CameraProjector;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn points() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [-0.9, -0.9, 0.0], [5.0, 5.0, 2.0], [0.1, -0.1, 0.0]]
    }

    fn triangle() -> Polygon {
        let mut state = InteractionState::new();
        state.set_mode(InteractionMode::Lasso { operation: Operation::Add });
        // 100x100 surface: pixels map to NDC (-1,-1), (1,-1), (0,1)
        state.pointer_down(&PointerInfo::from_surface(0.0, 100.0, 100.0, 100.0));
        state.pointer_move(&PointerInfo::from_surface(100.0, 100.0, 100.0, 100.0));
        state.pointer_move(&PointerInfo::from_surface(50.0, 0.0, 100.0, 100.0));
        state.pointer_up();
        state.commit().unwrap()
    }

    fn seeded_store(codes: &[u16]) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set_remote("labels_t", StoreValue::Json(json!(["France", "Spain"])));
        store.set_remote("coded_values_t", StoreValue::Bytes(encode_elements(codes, Endian::Little)));
        store
    }

    #[test]
    fn test_request_ids_increase_from_one() {
        let mut protocol = CommitProtocol::default();
        let projector = CameraProjector::default();
        let a = protocol
            .prepare_commit(triangle(), &points(), &projector, Operation::Add, "Spain")
            .unwrap();
        let b = protocol
            .prepare_commit(triangle(), &points(), &projector, Operation::Add, "Spain")
            .unwrap();
        assert_eq!((a.request_id, b.request_id), (1, 2));
    }

    #[test]
    fn test_empty_selection_consumes_no_id() {
        let mut protocol = CommitProtocol::default();
        let projector = CameraProjector::default();
        let far = vec![[5.0, 5.0, 0.0]];
        assert!(protocol
            .prepare_commit(triangle(), &far, &projector, Operation::Add, "Spain")
            .is_none());
        let next = protocol
            .prepare_commit(triangle(), &points(), &projector, Operation::Add, "Spain")
            .unwrap();
        assert_eq!(next.request_id, 1);
    }

    #[test]
    fn test_submit_writes_codes_mask_and_request_once() {
        let mut protocol = CommitProtocol::default();
        let mut store = seeded_store(&[0, 0, 1, 0, 0]);
        let prepared = protocol
            .prepare_commit(triangle(), &points(), &CameraProjector::default(), Operation::Add, "Spain")
            .unwrap();

        let receipt = protocol.submit(&mut store, prepared).unwrap();
        assert_eq!(
            receipt,
            CommitReceipt {
                request_id: 1,
                num_selected: 3,
                num_changed: 3
            }
        );

        assert_eq!(
            store.take_flushed(),
            vec!["coded_values_t".to_string(), "lasso_mask_t".to_string(), "lasso_request_t".to_string()]
        );
        assert_eq!(store.get("lasso_mask_t"), Some(&StoreValue::Bytes(vec![0b1010_1000])));
        assert_eq!(
            store.get("lasso_request_t").and_then(StoreValue::as_json),
            Some(&json!({"kind": "lasso_commit", "op": "add", "label": "Spain", "request_id": 1}))
        );
        let codes = read_coded_values(&store, "coded_values_t", InputMode::Strict).unwrap();
        assert_eq!(codes, vec![2, 0, 2, 0, 2]);
        assert_eq!(protocol.pending().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_base64_transport() {
        let config = ViewerConfig {
            mask_transport: MaskTransport::Base64,
            ..ViewerConfig::default()
        };
        let mut protocol = CommitProtocol::new(&config);
        let mut store = seeded_store(&[0; 5]);
        let prepared = protocol
            .prepare_commit(triangle(), &points(), &CameraProjector::default(), Operation::Add, "France")
            .unwrap();
        protocol.submit(&mut store, prepared).unwrap();
        assert_eq!(store.get("lasso_mask_t"), Some(&StoreValue::Json(json!("qA=="))));
    }

    #[test]
    fn test_unknown_label_leaves_store_untouched() {
        let mut protocol = CommitProtocol::default();
        let mut store = seeded_store(&[0; 5]);
        let prepared = protocol
            .prepare_commit(triangle(), &points(), &CameraProjector::default(), Operation::Add, "Italy")
            .unwrap();
        assert_eq!(
            protocol.submit(&mut store, prepared).unwrap_err(),
            CommitError::UnknownLabel("Italy".to_string())
        );
        assert!(store.take_flushed().is_empty());
        assert!(store.get("lasso_request_t").is_none());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut protocol = CommitProtocol::default();
        let mut store = seeded_store(&[0; 4]);
        let prepared = protocol
            .prepare_commit(triangle(), &points(), &CameraProjector::default(), Operation::Add, "Spain")
            .unwrap();
        assert_eq!(
            protocol.submit(&mut store, prepared).unwrap_err(),
            CommitError::LengthMismatch { codes: 4, points: 5 }
        );
    }

    #[test]
    fn test_error_result_is_reported_not_rolled_back() {
        let mut protocol = CommitProtocol::default();
        let mut store = seeded_store(&[0; 5]);
        let prepared = protocol
            .prepare_commit(triangle(), &points(), &CameraProjector::default(), Operation::Add, "Spain")
            .unwrap();
        protocol.submit(&mut store, prepared).unwrap();

        store.set_remote(
            "lasso_result_t",
            StoreValue::Json(json!({"request_id": 1, "status": "error", "message": "boom"})),
        );
        let result = protocol.read_result(&store).unwrap().unwrap();
        assert_eq!(
            protocol.on_commit_result(&result).unwrap_err(),
            CommitError::StoreMutationError {
                request_id: 1,
                message: "boom".to_string()
            }
        );
        let codes = read_coded_values(&store, "coded_values_t", InputMode::Strict).unwrap();
        assert_eq!(codes, vec![2, 0, 2, 0, 2]);
        assert_eq!(protocol.pending().count(), 0);

        // a repeated or foreign result is ignored
        assert!(protocol.on_commit_result(&result).is_ok());
    }

    #[test]
    fn test_overlapping_commits_resolve_in_any_order() {
        let mut protocol = CommitProtocol::default();
        let mut store = seeded_store(&[0; 5]);
        let projector = CameraProjector::default();

        for label in ["Spain", "France"] {
            let prepared = protocol
                .prepare_commit(triangle(), &points(), &projector, Operation::Add, label)
                .unwrap();
            protocol.submit(&mut store, prepared).unwrap();
        }
        assert_eq!(protocol.pending().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            store.get("lasso_request_t").and_then(StoreValue::as_json),
            Some(&json!({"kind": "lasso_commit", "op": "add", "label": "France", "request_id": 2}))
        );

        assert!(protocol.on_commit_result(&CommitResult::ok(2, 3, 3)).is_ok());
        assert_eq!(protocol.pending().collect::<Vec<_>>(), vec![1]);
        assert!(protocol.on_commit_result(&CommitResult::ok(1, 3, 3)).is_ok());
        assert_eq!(protocol.pending().count(), 0);
    }

    #[test]
    fn test_read_result_absent_and_malformed() {
        let protocol = CommitProtocol::default();
        let mut store = MemoryStore::new();
        assert_eq!(protocol.read_result(&store).unwrap(), None);
        store.set_remote("lasso_result_t", StoreValue::Json(json!({"status": "maybe"})));
        assert!(matches!(
            protocol.read_result(&store),
            Err(CommitError::MalformedStoreValue { .. })
        ));
    }
}
