//! App layer - session state management and event processing
//!
//! The Session actor receives events, debounce ticks and network responses,
//! updates state, and emits network commands and snapshots.

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::SessionActor;
pub use state::{SessionState, SharedResolver};
