//! Session snapshot - read-only view published after every event

use std::sync::Arc;

use crate::codegen::CodeView;
use crate::models::{EndpointDescriptor, RequestResult};
use crate::store::Snapshot;

/// Everything a front end needs to draw the session
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub endpoint: Option<Arc<EndpointDescriptor>>,
    pub raw_text: String,
    pub values: Snapshot,
    pub revision: u64,
    pub pending_commit: bool,
    pub is_sending: bool,
    pub result: Option<RequestResult>,
    pub code_view: CodeView,
    pub code_preview: String,
    pub needs_auth_setup: bool,
    pub needs_params: bool,
}

impl SessionSnapshot {
    /// Nothing left to settle: no pending commit, no request in flight
    pub fn is_idle(&self) -> bool {
        !self.pending_commit && !self.is_sending
    }
}
