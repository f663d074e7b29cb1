//! # Recipe Bench
//!
//! Core of an API recipe explorer: pick a predefined request from a
//! catalog, edit its JSON body, send it, and export it as client code.
//!
//! ## Features
//! - Fuzzy search over a YAML/JSON recipe catalog
//! - JSON body editor kept in sync with a structured request model
//! - Bearer / API-key auth from a per-project secret store
//! - cURL and fetch code generation
//!
//! ## Architecture
//! Actor-based with channels:
//! - Session Layer - request model, text sync and result bookkeeping
//! - Network Layer (Tokio runtime) - one HTTP call per send, never retried

pub mod app;
pub mod auth;
pub mod bridge;
pub mod catalog;
pub mod codegen;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod store;

// Re-export commonly used types
pub use app::{SessionActor, SessionState};
pub use auth::{AuthResolver, SecretStore};
pub use bridge::{CommitOutcome, TextSyncBridge};
pub use catalog::Catalog;
pub use codegen::{to_fetch_snippet, to_shell_command, CodeView};
pub use config::SessionConfig;
pub use error::{CatalogError, ExecuteError, SyncError};
pub use messages::{NetworkCommand, NetworkResponse, SessionEvent, SessionSnapshot};
pub use models::{
    AuthKind, EndpointDescriptor, HttpMethod, ParamSpec, ParameterSchema, RequestInfo,
    RequestResult, RequestValues, ResponseBody, ResponsePayload,
};
pub use network::{NetworkActor, ReqwestTransport, RequestExecutor, Transport};
pub use store::{ModelStore, Snapshot};
