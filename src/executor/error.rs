//! HTTP request execution error types.
//!
//! This module defines the transport failures the call executor can report.
//! The interpreter turns every one of them into a fatal script error.

use std::fmt;

/// Errors that can occur during HTTP request execution.
#[derive(Debug)]
pub enum RequestError {
    /// Network error occurred during request execution.
    ///
    /// This includes connection failures, DNS resolution errors,
    /// and other network-level issues.
    NetworkError(String),

    /// Request timed out before completion.
    Timeout,

    /// The joined URL could not be parsed.
    InvalidUrl(String),

    /// TLS/SSL error occurred during HTTPS connection.
    TlsError(String),

    /// The HTTP client or request could not be constructed.
    BuildError(String),

    /// Only HTTP and HTTPS are supported.
    UnsupportedProtocol(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            RequestError::Timeout => write!(f, "Request timed out"),
            RequestError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            RequestError::TlsError(msg) => write!(f, "TLS/SSL error: {}", msg),
            RequestError::BuildError(msg) => write!(f, "Request build error: {}", msg),
            RequestError::UnsupportedProtocol(protocol) => {
                write!(f, "Unsupported protocol: {}", protocol)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Maps reqwest's error kinds onto our variants.
impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let text = err.to_string();
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::BuildError(text)
        } else if text.contains("certificate") || text.contains("TLS") || text.contains("SSL") {
            RequestError::TlsError(text)
        } else {
            RequestError::NetworkError(text)
        }
    }
}

impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}
