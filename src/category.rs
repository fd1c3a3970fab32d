//! Store-side categorical labelling
//!
//! `Category` owns the authoritative label table and per-point codes. It
//! answers lasso requests written by the client and publishes its state back
//! through the store.

use indexmap::IndexSet;
use log::{debug, info, warn};

use crate::codec::{encode_elements, Endian, PackedMask};
use crate::commit::{apply_selection, CommitResult, StoreRequest};
use crate::config::StoreKeys;
use crate::error::CategoryError;
use crate::store::{bytes_of, InputMode, MemoryStore, ReactiveStore, StoreValue};

/// What `set_label_list` does with codes whose label disappears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingLabelPolicy {
    #[default]
    Error,
    SetMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    labels: IndexSet<String>,
    codes: Vec<u16>,
}

fn label_set(list: Vec<String>) -> Result<IndexSet<String>, CategoryError> {
    if list.len() > u16::MAX as usize {
        return Err(CategoryError::TooManyLabels(list.len()));
    }
    let mut labels = IndexSet::with_capacity(list.len());
    for label in list {
        if labels.contains(&label) {
            return Err(CategoryError::DuplicateLabel(label));
        }
        labels.insert(label);
    }
    Ok(labels)
}

impl Category {
    /// Build from per-point values (`None` = unassigned).
    ///
    /// Without an explicit `label_list` the labels are the sorted unique
    /// values. With one, every value must appear in it.
    pub fn new(name: &str, values: &[Option<&str>], label_list: Option<Vec<String>>) -> Result<Self, CategoryError> {
        let list = match label_list {
            Some(list) => list,
            None => {
                let mut unique: Vec<String> = values.iter().flatten().map(|v| v.to_string()).collect();
                unique.sort();
                unique.dedup();
                unique
            }
        };
        let labels = label_set(list)?;

        let codes = values
            .iter()
            .map(|value| match value {
                None => Ok(0),
                Some(v) => labels
                    .get_index_of(*v)
                    .map(|i| (i + 1) as u16)
                    .ok_or_else(|| CategoryError::UnknownValue(v.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            labels,
            codes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn coded_values(&self) -> &[u16] {
        &self.codes
    }

    pub fn label_list(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }

    /// `(label, code)` pairs in code order
    pub fn label_coding(&self) -> Vec<(String, u16)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), (i + 1) as u16))
            .collect()
    }

    pub fn label_of(&self, code: u16) -> Option<&str> {
        if code == 0 {
            return None;
        }
        self.labels.get_index(code as usize - 1).map(String::as_str)
    }

    pub fn code_of(&self, label: &str) -> Option<u16> {
        self.labels.get_index_of(label).map(|i| (i + 1) as u16)
    }

    /// Per-point labels, `None` for unassigned
    pub fn values(&self) -> Vec<Option<&str>> {
        self.codes.iter().map(|&code| self.label_of(code)).collect()
    }

    pub fn num_unassigned(&self) -> usize {
        self.codes.iter().filter(|&&c| c == 0).count()
    }

    /// Replace the label list and remap codes so every point keeps its label
    pub fn set_label_list(&mut self, list: Vec<String>, policy: MissingLabelPolicy) -> Result<(), CategoryError> {
        let next = label_set(list)?;

        let mut dropped: Vec<String> = Vec::new();
        let remap: Vec<u16> = self
            .labels
            .iter()
            .map(|label| match next.get_index_of(label) {
                Some(i) => (i + 1) as u16,
                None => {
                    dropped.push(label.clone());
                    0
                }
            })
            .collect();

        dropped.retain(|label| {
            self.code_of(label)
                .is_some_and(|code| self.codes.contains(&code))
        });
        if !dropped.is_empty() && policy == MissingLabelPolicy::Error {
            return Err(CategoryError::MissingLabels(dropped));
        }
        if !dropped.is_empty() {
            warn!("category {}: labels {:?} dropped, points set to missing", self.name, dropped);
        }

        for code in self.codes.iter_mut().filter(|c| **c != 0) {
            *code = remap[*code as usize - 1];
        }
        self.labels = next;
        Ok(())
    }

    /// Replace all codes; length must match and every code must have a label
    pub fn set_coded_values(&mut self, codes: Vec<u16>) -> Result<(), CategoryError> {
        if codes.len() != self.codes.len() {
            return Err(CategoryError::LengthMismatch {
                expected: self.codes.len(),
                actual: codes.len(),
            });
        }
        if let Some(&code) = codes.iter().find(|&&c| c as usize > self.labels.len()) {
            return Err(CategoryError::CodeOutOfRange {
                code,
                labels: self.labels.len(),
            });
        }
        self.codes = codes;
        Ok(())
    }

    /// Apply a lasso request against a packed mask.
    ///
    /// Errors become an `error` result and leave the codes untouched.
    pub fn apply_lasso(&mut self, request: &StoreRequest, mask_bytes: &[u8]) -> CommitResult {
        let StoreRequest::LassoCommit(request) = request;

        let Some(code) = self.code_of(&request.label) else {
            return CommitResult::error(request.request_id, format!("Unknown label: {}", request.label));
        };
        let mask = match PackedMask::from_bytes(mask_bytes.to_vec(), self.codes.len()) {
            Ok(mask) => mask,
            Err(e) => return CommitResult::error(request.request_id, e.to_string()),
        };

        let num_selected = mask.count_selected();
        let num_changed = apply_selection(&mut self.codes, &mask, request.operation, code);
        debug!(
            "category {}: request {} {:?} {:?} changed {} of {} selected",
            self.name, request.request_id, request.operation, request.label, num_changed, num_selected
        );
        CommitResult::ok(request.request_id, num_selected, num_changed)
    }

    /// Answer the pending request in `store`, if any.
    ///
    /// Reads the request and mask, applies them, then publishes the codes and
    /// the result as writes from this side of the boundary.
    pub fn respond_to_store(&mut self, store: &mut MemoryStore, keys: &StoreKeys, mode: InputMode) -> Option<CommitResult> {
        let request = match store.get(&keys.lasso_request).and_then(StoreValue::as_json) {
            Some(value) => value.clone(),
            None => return None,
        };
        let request_id = request.get("request_id").and_then(|v| v.as_u64()).unwrap_or(0);

        let result = match serde_json::from_value::<StoreRequest>(request) {
            Err(e) => CommitResult::error(request_id, format!("Malformed lasso request: {}", e)),
            Ok(request) => {
                let empty = StoreValue::Null;
                let mask_value = store.get(&keys.lasso_mask).unwrap_or(&empty);
                match bytes_of(mask_value, mode) {
                    Ok(bytes) => {
                        let bytes = bytes.into_owned();
                        self.apply_lasso(&request, &bytes)
                    }
                    Err(e) => CommitResult::error(request_id, e.to_string()),
                }
            }
        };

        if result.is_ok() {
            info!("category {}: lasso request {} applied", self.name, result.request_id);
        } else {
            warn!("category {}: lasso request {} rejected", self.name, result.request_id);
        }

        store.set_remote(&keys.coded_values, StoreValue::Bytes(encode_elements(&self.codes, Endian::Little)));
        match serde_json::to_value(&result) {
            Ok(value) => store.set_remote(&keys.lasso_result, StoreValue::Json(value)),
            Err(e) => warn!("could not encode lasso result: {}", e),
        }
        Some(result)
    }

    /// Publish the label table and codes
    pub fn sync_to_store(&self, store: &mut MemoryStore, keys: &StoreKeys) {
        store.set_remote(&keys.labels, StoreValue::Json(serde_json::Value::from(self.label_list())));
        store.set_remote(&keys.coded_values, StoreValue::Bytes(encode_elements(&self.codes, Endian::Little)));
    }
}
