//! HTTP request execution configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for live HTTP calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in seconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Defaults to 30 seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value of the `User-Agent` header sent with every call.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("rest-script/{}", env!("CARGO_PKG_VERSION"))
}

impl ExecutionConfig {
    /// Creates a new ExecutionConfig with the given timeout and the default user agent.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            user_agent: default_user_agent(),
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}
