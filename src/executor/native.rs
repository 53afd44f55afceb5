//! Live HTTP executor backed by reqwest's blocking client.
//!
//! Script execution is strictly sequential, so the blocking client is enough:
//! a call holds the interpreter until the full response body is read.

use super::config::ExecutionConfig;
use super::error::RequestError;
use super::{validate_url, CallExecutor};
use crate::models::request::{HttpMethod, ScriptRequest};
use crate::models::response::HttpResponse;
use log::debug;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::time::Instant;

/// Performs real network calls.
///
/// The underlying client is built on the first call, so constructing the
/// executor never touches the network stack.
#[derive(Debug)]
pub struct ReqwestExecutor {
    config: ExecutionConfig,
    client: Option<Client>,
}

impl ReqwestExecutor {
    /// Creates an executor with the given configuration.
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    fn client(&mut self) -> Result<&Client, RequestError> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.config.timeout_duration())
                .user_agent(self.config.user_agent.clone())
                .build()
                .map_err(|e| RequestError::BuildError(e.to_string()))?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| RequestError::BuildError("HTTP client unavailable".to_string()))
    }
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new(ExecutionConfig::default())
    }
}

impl CallExecutor for ReqwestExecutor {
    fn execute(&mut self, request: &ScriptRequest) -> Result<HttpResponse, RequestError> {
        validate_url(&request.url)?;

        let method = match request.method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        };

        let client = self.client()?;
        let mut req_builder = client.request(method, &request.url);

        for (name, value) in request.effective_headers() {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            if !body.is_empty() {
                req_builder = req_builder.body(body.clone());
            }
        }

        debug!("sending {} {}", request.method, request.url);
        let start_time = Instant::now();
        let response = req_builder.send()?;

        let status_code = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_string(), value_str.to_string());
            }
        }

        let body = response.bytes()?.to_vec();
        let duration = start_time.elapsed();
        debug!(
            "received {} ({} bytes) in {:?}",
            status_code,
            body.len(),
            duration
        );

        let mut http_response = HttpResponse::new(status_code, status_text);
        http_response.headers = headers;
        http_response.body = body;
        http_response.duration = duration;
        Ok(http_response)
    }
}
