//! Session configuration

use std::time::Duration;

use crate::constants::{QUIESCENCE_WINDOW, REQUEST_TIMEOUT};

/// Tunables for a session and the transport backing it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Debounce delay between the last text edit and the commit attempt
    pub quiescence: Duration,
    /// Timeout applied by the HTTP client
    pub request_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            quiescence: QUIESCENCE_WINDOW,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl SessionConfig {
    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
