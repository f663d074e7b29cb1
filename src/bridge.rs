//! JSON text buffer kept in step with the request model
//!
//! Model to text: every external change re-renders the buffer as pretty JSON.
//! Text to model: edits are stored as typed and committed after the
//! quiescence window, only when the text parses to a JSON object.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;

use crate::debounce::{CommitTicket, Scheduler};
use crate::error::SyncError;
use crate::models::RequestValues;
use crate::store::{ChangeOrigin, ModelChange, ModelStore, SubscriptionId};

/// Pretty-print values with two-space indentation
pub fn render_values(values: &RequestValues) -> String {
    // string-keyed maps of JSON values always serialize
    serde_json::to_string_pretty(values).unwrap_or_else(|_| String::from("{}"))
}

/// Parse editor text into request values. Blank text means `{}`.
pub fn parse_values(text: &str) -> Result<RequestValues, SyncError> {
    if text.trim().is_empty() {
        return Ok(RequestValues::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(values)) => Ok(values),
        Ok(other) => Err(SyncError::InvalidJsonEdit(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(SyncError::InvalidJsonEdit(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Editor contents shared between the bridge and its store subscription
#[derive(Clone, Debug, Default)]
pub struct TextBuffer(Arc<Mutex<String>>);

impl TextBuffer {
    fn lock(&self) -> MutexGuard<'_, String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn text(&self) -> String {
        self.lock().clone()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    /// Re-render for external changes; the bridge's own commits are not echoed
    pub fn on_model_change(&self, change: &ModelChange) {
        if change.origin == ChangeOrigin::External {
            self.set(render_values(&change.values));
        }
    }
}

/// What a deferred commit attempt did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Values replaced with the parsed text
    Committed { revision: u64 },
    /// Parsed fine but equal to the current values
    Unchanged,
    /// Text did not parse to an object; model and buffer left alone
    Rejected(SyncError),
    /// Superseded by a newer edit or cancelled
    Stale,
}

pub struct TextSyncBridge<S: Scheduler> {
    buffer: TextBuffer,
    scheduler: S,
    quiescence: Duration,
    pending: Option<CommitTicket>,
    next_ticket: u64,
    attempts: u64,
}

impl<S: Scheduler> TextSyncBridge<S> {
    pub fn new(scheduler: S, quiescence: Duration) -> Self {
        TextSyncBridge {
            buffer: TextBuffer::default(),
            scheduler,
            quiescence,
            pending: None,
            next_ticket: 1,
            attempts: 0,
        }
    }

    /// Subscribe the buffer to `store` and render its current values
    pub fn attach(&mut self, store: &mut ModelStore) -> SubscriptionId {
        self.cancel_pending();
        self.buffer.set(render_values(&store.snapshot()));
        let buffer = self.buffer.clone();
        store.subscribe(move |change: &ModelChange| buffer.on_model_change(change))
    }

    pub fn on_model_change(&self, change: &ModelChange) {
        self.buffer.on_model_change(change);
    }

    /// Keep the text as typed and restart the quiescence window
    pub fn on_text_edit(&mut self, text: impl Into<String>) -> CommitTicket {
        self.buffer.set(text);
        let ticket = CommitTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.scheduler.schedule(self.quiescence, ticket);
        ticket
    }

    /// Deferred commit attempt for `ticket`
    pub fn commit(&mut self, ticket: CommitTicket, store: &mut ModelStore) -> CommitOutcome {
        if self.pending != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "Ignoring superseded commit");
            return CommitOutcome::Stale;
        }
        self.pending = None;
        self.attempts += 1;

        match parse_values(&self.buffer.text()) {
            Ok(values) if values == *store.snapshot() => CommitOutcome::Unchanged,
            Ok(values) => {
                let revision = store.replace(values, ChangeOrigin::TextEditor);
                tracing::debug!(ticket = ticket.0, revision, "Committed editor text");
                CommitOutcome::Committed { revision }
            }
            Err(err) => {
                tracing::debug!(ticket = ticket.0, %err, "Keeping invalid editor text");
                CommitOutcome::Rejected(err)
            }
        }
    }

    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.scheduler.cancel();
        }
    }

    pub fn raw_text(&self) -> String {
        self.buffer.text()
    }

    pub fn has_pending_commit(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of commit attempts that actually parsed the buffer
    pub fn commit_attempts(&self) -> u64 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::testing::ManualScheduler;
    use serde_json::json;

    fn bridge_with_store() -> (TextSyncBridge<ManualScheduler>, ModelStore) {
        let mut store = ModelStore::new();
        let mut bridge =
            TextSyncBridge::new(ManualScheduler::default(), Duration::from_millis(300));
        bridge.attach(&mut store);
        (bridge, store)
    }

    fn fire(bridge: &mut TextSyncBridge<ManualScheduler>, store: &mut ModelStore) -> CommitOutcome {
        let ticket = bridge.scheduler.take_pending().expect("a commit should be scheduled");
        bridge.commit(ticket, store)
    }

    #[test]
    fn test_valid_text_commits() {
        let (mut bridge, mut store) = bridge_with_store();
        bridge.on_text_edit(r#"{"q": "cats", "limit": 3}"#);

        assert!(matches!(fire(&mut bridge, &mut store), CommitOutcome::Committed { .. }));
        assert_eq!(
            serde_json::Value::Object((*store.snapshot()).clone()),
            json!({"q": "cats", "limit": 3})
        );
        assert_eq!(bridge.scheduler.scheduled[0].0, Duration::from_millis(300));
    }

    #[test]
    fn test_repeated_identical_text_commits_once() {
        let (mut bridge, mut store) = bridge_with_store();
        bridge.on_text_edit(r#"{"a": 1}"#);
        fire(&mut bridge, &mut store);
        let revision = store.revision();

        bridge.on_text_edit(r#"{"a": 1}"#);
        assert_eq!(fire(&mut bridge, &mut store), CommitOutcome::Unchanged);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_invalid_text_leaves_model_and_buffer() {
        let (mut bridge, mut store) = bridge_with_store();
        store.set_values(json!({"a": 1}).as_object().unwrap().clone());
        let before = store.snapshot();

        bridge.on_text_edit(r#"{"a": 1,"#);
        assert!(matches!(
            fire(&mut bridge, &mut store),
            CommitOutcome::Rejected(SyncError::InvalidJsonEdit(_))
        ));
        assert_eq!(store.snapshot(), before);
        assert_eq!(bridge.raw_text(), r#"{"a": 1,"#);
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let (mut bridge, mut store) = bridge_with_store();
        bridge.on_text_edit("[1, 2]");
        assert!(matches!(fire(&mut bridge, &mut store), CommitOutcome::Rejected(_)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_empty_text_commits_empty_object() {
        let (mut bridge, mut store) = bridge_with_store();
        store.set_values(json!({"a": 1}).as_object().unwrap().clone());

        bridge.on_text_edit("   ");
        assert!(matches!(fire(&mut bridge, &mut store), CommitOutcome::Committed { .. }));
        assert!(store.snapshot().is_empty());
        assert_eq!(bridge.raw_text(), "   ");
    }

    #[test]
    fn test_two_quick_edits_one_attempt_with_final_text() {
        let (mut bridge, mut store) = bridge_with_store();
        let first = bridge.on_text_edit(r#"{"a":1"#);
        let second = bridge.on_text_edit(r#"{"a":1}"#);

        assert_eq!(bridge.commit(first, &mut store), CommitOutcome::Stale);
        assert!(matches!(bridge.commit(second, &mut store), CommitOutcome::Committed { .. }));
        assert_eq!(bridge.commit_attempts(), 1);
        assert_eq!(store.snapshot().get("a"), Some(&json!(1)));
        assert_eq!(bridge.scheduler.scheduled.len(), 2);
    }

    #[test]
    fn test_own_commit_is_not_echoed() {
        let (mut bridge, mut store) = bridge_with_store();
        let typed = "{\"b\":   true}";
        bridge.on_text_edit(typed);
        fire(&mut bridge, &mut store);
        assert_eq!(bridge.raw_text(), typed);
    }

    #[test]
    fn test_external_change_rerenders_pretty() {
        let (mut bridge, mut store) = bridge_with_store();
        assert_eq!(bridge.raw_text(), "{}");
        bridge.on_text_edit("{\"half");

        store.set_values(json!({"a": 1, "b": [true]}).as_object().unwrap().clone());
        assert_eq!(bridge.raw_text(), "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}");
    }

    #[test]
    fn test_pretty_round_trip_keeps_order() {
        let values = json!({"zeta": 1, "alpha": {"nested": null}, "mid": "x"})
            .as_object()
            .unwrap()
            .clone();
        let text = render_values(&values);
        let parsed = parse_values(&text).unwrap();
        assert_eq!(parsed, values);
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_cancel_pending_makes_ticket_stale() {
        let (mut bridge, mut store) = bridge_with_store();
        let ticket = bridge.on_text_edit(r#"{"a": 1}"#);
        bridge.cancel_pending();
        assert_eq!(bridge.scheduler.cancels, 1);
        assert_eq!(bridge.commit(ticket, &mut store), CommitOutcome::Stale);
        assert!(store.snapshot().is_empty());
    }
}
