//! HTTP request data models.
//!
//! This module defines the fully resolved request handed to the call executor:
//! the verb, the absolute URL, the active header set and an optional body.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTTP verbs a script can issue.
///
/// These are exactly the verbs whose commands may carry a multi-line body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP DELETE method - remove a resource
    DELETE,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request with every placeholder already expanded.
///
/// Headers are kept in a sorted map so that both the live call and the
/// offline `curl` rendering see them in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRequest {
    /// HTTP verb.
    pub method: HttpMethod,

    /// Absolute target URL (base URL joined with the relative URL).
    pub url: String,

    /// Header name to value. Entries with an empty name or value are never sent.
    pub headers: BTreeMap<String, String>,

    /// Optional request body, sent verbatim.
    pub body: Option<String>,
}

impl ScriptRequest {
    /// Creates a request without headers or body.
    pub fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Adds a header to the request.
    pub fn add_header(&mut self, name: String, value: String) {
        self.headers.insert(name, value);
    }

    /// Sets the request body.
    pub fn set_body(&mut self, body: String) {
        self.body = Some(body);
    }

    /// Headers that will actually be transmitted.
    pub fn effective_headers(&self) -> impl Iterator<Item = (&String, &String)> {
        self.headers
            .iter()
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
    }
}
