//! Request model store
//!
//! Holds the request values of the active session. Every write replaces the
//! whole map and hands listeners a shared, immutable snapshot, so no reader
//! can observe a half-applied edit.

use std::sync::Arc;

use crate::models::RequestValues;

/// Immutable view of the values at one revision
pub type Snapshot = Arc<RequestValues>;

/// Who produced a change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Structured controls, examples, session resets
    External,
    /// A commit from the JSON text buffer
    TextEditor,
}

/// Notification delivered to listeners after each write
#[derive(Clone, Debug)]
pub struct ModelChange {
    pub values: Snapshot,
    pub origin: ChangeOrigin,
    pub revision: u64,
}

/// Observer of store writes
pub trait ModelListener: Send {
    fn on_model_change(&mut self, change: &ModelChange);
}

impl<F> ModelListener for F
where
    F: FnMut(&ModelChange) + Send,
{
    fn on_model_change(&mut self, change: &ModelChange) {
        self(change)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ModelStore {
    values: Snapshot,
    revision: u64,
    listeners: Vec<(SubscriptionId, Box<dyn ModelListener>)>,
    next_subscription: u64,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore {
    pub fn new() -> Self {
        ModelStore {
            values: Arc::new(RequestValues::new()),
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Current values. The store never writes through a handed-out snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.values)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the values on behalf of an external editor
    pub fn set_values(&mut self, values: RequestValues) -> u64 {
        self.replace(values, ChangeOrigin::External)
    }

    /// Replace the values and notify every listener once, in registration order
    pub fn replace(&mut self, values: RequestValues, origin: ChangeOrigin) -> u64 {
        self.values = Arc::new(values);
        self.revision += 1;

        let change = ModelChange {
            values: self.snapshot(),
            origin,
            revision: self.revision,
        };
        tracing::debug!(
            revision = self.revision,
            ?origin,
            keys = change.values.len(),
            "Request model replaced"
        );

        for (_, listener) in self.listeners.iter_mut() {
            listener.on_model_change(&change);
        }
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl ModelListener + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
