//! Session state - pure data structure with no I/O logic

use std::sync::Arc;

use crate::auth::{resolve_headers, AuthResolver};
use crate::bridge::TextSyncBridge;
use crate::codegen::CodeView;
use crate::config::SessionConfig;
use crate::constants::EMPTY_CODE_PREVIEW;
use crate::debounce::Scheduler;
use crate::messages::SessionSnapshot;
use crate::models::{EndpointDescriptor, RequestInfo, RequestResult};
use crate::store::ModelStore;

/// Shared credential lookup
pub type SharedResolver = Arc<dyn AuthResolver + Send + Sync>;

/// State of the single active session
pub struct SessionState<S: Scheduler> {
    pub config: SessionConfig,
    pub auth: SharedResolver,

    // Selected recipe and its request body
    pub endpoint: Option<Arc<EndpointDescriptor>>,
    pub store: ModelStore,
    pub bridge: TextSyncBridge<S>,

    // Output
    pub result: Option<RequestResult>,
    pub last_request: Option<RequestInfo>,
    pub code_view: CodeView,

    // Generation tokens for sent requests
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,
}

impl<S: Scheduler> SessionState<S> {
    pub fn new(config: SessionConfig, auth: SharedResolver, scheduler: S) -> Self {
        let mut store = ModelStore::new();
        let mut bridge = TextSyncBridge::new(scheduler, config.quiescence);
        bridge.attach(&mut store);

        SessionState {
            config,
            auth,
            endpoint: None,
            store,
            bridge,
            result: None,
            last_request: None,
            code_view: CodeView::default(),
            next_request_id: 1,
            pending_request_id: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_sending(&self) -> bool {
        self.pending_request_id.is_some()
    }

    /// The recipe needs a secret that is not configured
    pub fn needs_auth_setup(&self) -> bool {
        self.endpoint
            .as_ref()
            .is_some_and(|ep| ep.auth.is_required() && self.auth.resolve(ep).is_none())
    }

    /// The recipe has required parameters and nothing has been entered yet
    pub fn needs_params(&self) -> bool {
        self.endpoint
            .as_ref()
            .is_some_and(|ep| ep.has_required_params() && self.store.snapshot().is_empty())
    }

    /// Code for the last sent request, or a draft of the current one
    pub fn code_preview(&self) -> String {
        if let Some(info) = &self.last_request {
            return self.code_view.render(info);
        }
        let Some(endpoint) = &self.endpoint else {
            return String::from(EMPTY_CODE_PREVIEW);
        };
        match resolve_headers(endpoint, &*self.auth) {
            Ok(headers) => {
                let draft = RequestInfo::new(endpoint, headers, &self.store.snapshot());
                self.code_view.render(&draft)
            }
            Err(_) => String::from(EMPTY_CODE_PREVIEW),
        }
    }

    /// Convert state to a snapshot for readers
    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            endpoint: self.endpoint.clone(),
            raw_text: self.bridge.raw_text(),
            values: self.store.snapshot(),
            revision: self.store.revision(),
            pending_commit: self.bridge.has_pending_commit(),
            is_sending: self.is_sending(),
            result: self.result.clone(),
            code_view: self.code_view,
            code_preview: self.code_preview(),
            needs_auth_setup: self.needs_auth_setup(),
            needs_params: self.needs_params(),
        }
    }
}
