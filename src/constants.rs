//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Quiet period after the last body edit before the text is committed
pub const QUIESCENCE_WINDOW: Duration = Duration::from_millis(300);

/// Per-request timeout for the HTTP client
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type sent with every request
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Shown in the code panel until there is something to render
pub const EMPTY_CODE_PREVIEW: &str = "Make a request first!";

/// Log file written by the binary
pub const LOG_FILE_NAME: &str = "recipe-bench.log";
