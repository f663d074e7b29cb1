//! Session events - what the outside world can ask of a session

use serde_json::Value;

use crate::codegen::CodeView;
use crate::models::{EndpointDescriptor, RequestValues};

/// Events sent to the session actor
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Start a fresh request for this recipe, discarding the previous one
    SelectEndpoint(EndpointDescriptor),
    /// New contents of the JSON editor
    EditText(String),
    /// Replace the whole body from structured controls
    SetValues(RequestValues),
    SetParameter { name: String, value: Value },
    RemoveParameter { name: String },
    /// Load the recipe's n-th example body
    LoadExample(usize),
    /// Execute the current request
    Send,
    ClearOutput,
    SelectCodeView(CodeView),
    /// Drop the current session state
    Close,
    /// Stop the actor (and the network actor behind it)
    Quit,
}
