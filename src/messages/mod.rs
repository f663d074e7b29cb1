//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the caller, the
//! Session and the Network layers.

pub mod network;
pub mod session;
pub mod snapshot;

pub use network::{NetworkCommand, NetworkResponse};
pub use session::SessionEvent;
pub use snapshot::SessionSnapshot;
