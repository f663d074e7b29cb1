//! Command handlers - session logic for processing events

use std::sync::Arc;

use serde_json::Value;

use crate::app::SessionState;
use crate::bridge::CommitOutcome;
use crate::codegen::CodeView;
use crate::debounce::{CommitTicket, Scheduler};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{EndpointDescriptor, RequestResult, RequestValues};
use crate::network::prepare;
use crate::store::ModelStore;

impl<S: Scheduler> SessionState<S> {
    // ========================
    // Session lifecycle
    // ========================

    /// Fresh model for `endpoint`. Output and any in-flight generation are dropped.
    pub fn select_endpoint(&mut self, endpoint: EndpointDescriptor) {
        tracing::info!(
            recipe = %endpoint.label(),
            method = endpoint.method.as_str(),
            "Session selected"
        );
        self.reset();
        self.endpoint = Some(Arc::new(endpoint));
    }

    pub fn close(&mut self) {
        if let Some(endpoint) = self.endpoint.take() {
            tracing::info!(recipe = %endpoint.label(), "Session closed");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.store = ModelStore::new();
        self.bridge.attach(&mut self.store);
        self.result = None;
        self.last_request = None;
        self.pending_request_id = None;
    }

    // ========================
    // Editing
    // ========================

    pub fn edit_text(&mut self, text: String) -> Option<CommitTicket> {
        if self.endpoint.is_none() {
            tracing::debug!("Ignoring edit without a selected recipe");
            return None;
        }
        Some(self.bridge.on_text_edit(text))
    }

    /// Deferred commit from the debounce timer
    pub fn commit_due(&mut self, ticket: CommitTicket) -> CommitOutcome {
        self.bridge.commit(ticket, &mut self.store)
    }

    pub fn set_values(&mut self, values: RequestValues) {
        if self.endpoint.is_some() {
            self.store.set_values(values);
        }
    }

    pub fn set_parameter(&mut self, name: String, value: Value) {
        let mut values = (*self.store.snapshot()).clone();
        values.insert(name, value);
        self.set_values(values);
    }

    pub fn remove_parameter(&mut self, name: &str) -> bool {
        let mut values = (*self.store.snapshot()).clone();
        if values.shift_remove(name).is_none() {
            return false;
        }
        self.set_values(values);
        true
    }

    pub fn load_example(&mut self, index: usize) -> bool {
        let body = self
            .endpoint
            .as_ref()
            .and_then(|ep| ep.examples.get(index))
            .map(|example| example.body.clone());
        match body {
            Some(body) => {
                self.set_values(body);
                true
            }
            None => false,
        }
    }

    // ========================
    // Execution
    // ========================

    /// Validate the current request and hand it to the network layer.
    ///
    /// Validation failures become the new result immediately. Returns None
    /// while a request is still in flight.
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        let endpoint = Arc::clone(self.endpoint.as_ref()?);

        if let Some(id) = self.pending_request_id {
            tracing::warn!(id, "Request already in flight, ignoring send");
            return None;
        }

        self.result = None;
        match prepare(&endpoint, &self.store.snapshot(), &*self.auth) {
            Ok(request) => {
                let id = self.next_id();
                self.pending_request_id = Some(id);
                self.last_request = Some(request.clone());
                Some(NetworkCommand::Execute { id, request })
            }
            Err(err) => {
                tracing::warn!(recipe = %endpoint.label(), %err, "Request not sent");
                self.result = Some(RequestResult::Failure(err));
                None
            }
        }
    }

    /// Accept the result of the current generation; anything older is dropped
    pub fn handle_response(&mut self, response: NetworkResponse) -> bool {
        let NetworkResponse::Completed { id, result } = response;
        if self.pending_request_id != Some(id) {
            tracing::warn!(id, current = ?self.pending_request_id, "Discarding stale response");
            return false;
        }
        self.pending_request_id = None;
        self.result = Some(result);
        true
    }

    pub fn clear_output(&mut self) {
        self.result = None;
    }

    pub fn select_code_view(&mut self, view: CodeView) {
        self.code_view = view;
    }
}
