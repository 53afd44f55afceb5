//! HTTP response data models.
//!
//! This module defines the response returned by the call executor. The body is
//! kept as raw bytes; it becomes the cached "last response" that `response:`
//! placeholders resolve against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Represents an HTTP response received from a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// HTTP status text (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response headers as key-value pairs.
    pub headers: HashMap<String, String>,

    /// Response body as raw bytes.
    pub body: Vec<u8>,

    /// Wall-clock time from sending the request to the end of the body.
    pub duration: Duration,
}

impl HttpResponse {
    /// Creates a new HttpResponse with the given status code and text.
    pub fn new(status_code: u16, status_text: String) -> Self {
        Self {
            status_code,
            status_text,
            headers: HashMap::new(),
            body: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Gets the Content-Type header value if present (case-insensitive lookup).
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the Content-Type names a JSON media type.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .map(|media| media.trim().to_lowercase().contains("json"))
            .unwrap_or(false)
    }

    /// Adds a header to the response.
    pub fn add_header(&mut self, name: String, value: String) {
        self.headers.insert(name, value);
    }

    /// Sets the response body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_new() {
        let response = HttpResponse::new(200, "OK".to_string());

        assert_eq!(response.status_code, 200);
        assert_eq!(response.status_text, "OK");
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_http_response_content_type() {
        let mut response = HttpResponse::new(200, "OK".to_string());
        assert_eq!(response.content_type(), None);
        assert!(!response.is_json());

        response.add_header(
            "content-type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
        assert!(response.is_json());
    }

    #[test]
    fn test_problem_json_is_json() {
        let mut response = HttpResponse::new(400, "Bad Request".to_string());
        response.add_header(
            "Content-Type".to_string(),
            "application/problem+json".to_string(),
        );
        assert!(response.is_json());
    }
}
