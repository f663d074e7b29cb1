//! Network layer - HTTP transport and request execution
//!
//! The Network actor receives execute commands and sends back results.

pub mod actor;
pub mod client;
pub mod executor;

pub use actor::NetworkActor;
pub use client::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use executor::{prepare, RequestExecutor};
