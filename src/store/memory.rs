//! In-process reactive store

use indexmap::IndexMap;
use log::debug;

use super::{change_event, ChangeCallback, ReactiveStore, StoreValue, SubscriptionId};

struct Subscription {
    id: SubscriptionId,
    event: String,
    callback: ChangeCallback,
}

/// Ordered key/value store with change subscriptions.
///
/// Local `set`s are buffered as dirty keys until `save_changes`, which hands
/// them to the other side (`take_flushed`). Writes coming back from the other
/// side go through `set_remote` and notify subscribers.
#[derive(Default)]
pub struct MemoryStore {
    values: IndexMap<String, StoreValue>,
    dirty: Vec<String>,
    flushed: Vec<String>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys flushed by `save_changes` since the last call, in write order
    pub fn take_flushed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flushed)
    }

    /// Apply a write from the other side and notify subscribers of the key
    pub fn set_remote(&mut self, key: &str, value: StoreValue) {
        self.values.insert(key.to_string(), value);
        self.notify(key);
    }

    fn notify(&mut self, key: &str) {
        let event = change_event(key);
        let Some(value) = self.values.get(key) else {
            return;
        };
        for subscription in self.subscriptions.iter_mut().filter(|s| s.event == event) {
            (subscription.callback)(value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl ReactiveStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&StoreValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoreValue) {
        self.values.insert(key.to_string(), value);
        if !self.dirty.iter().any(|k| k == key) {
            self.dirty.push(key.to_string());
        }
    }

    fn save_changes(&mut self) {
        debug!("flushing {} store keys", self.dirty.len());
        for key in std::mem::take(&mut self.dirty) {
            if !self.flushed.contains(&key) {
                self.flushed.push(key);
            }
        }
    }

    fn subscribe(&mut self, event: &str, callback: ChangeCallback) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscriptions.push(Subscription {
            id,
            event: event.to_string(),
            callback,
        });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|s| s.id != id);
    }
}
