//! Network messages - communication between Session and Network layers

use crate::models::{RequestInfo, RequestResult};

/// Commands sent from the session to the Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Send an already validated request; `id` is the session's generation token
    Execute { id: u64, request: RequestInfo },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from the Network layer back to the session
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Exactly one per `Execute`, success or failure
    Completed { id: u64, result: RequestResult },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
        }
    }
}
