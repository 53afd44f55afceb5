//! Call Executor boundary.
//!
//! The interpreter hands a fully resolved [`ScriptRequest`] to a
//! [`CallExecutor`] and gets an [`HttpResponse`] back. The live
//! implementation is [`ReqwestExecutor`]; tests substitute their own.

pub mod config;
pub mod error;
pub mod native;

pub use config::ExecutionConfig;
pub use error::RequestError;
pub use native::ReqwestExecutor;

use crate::models::request::ScriptRequest;
use crate::models::response::HttpResponse;

/// Performs one HTTP call.
///
/// Implementations must not return before the response body is fully read.
///
/// # Examples
///
/// ```
/// use rest_script::executor::{CallExecutor, RequestError};
/// use rest_script::models::{HttpResponse, ScriptRequest};
///
/// struct Canned;
///
/// impl CallExecutor for Canned {
///     fn execute(&mut self, _request: &ScriptRequest) -> Result<HttpResponse, RequestError> {
///         let mut response = HttpResponse::new(200, "OK".to_string());
///         response.set_body(br#"{"id": "7"}"#.to_vec());
///         Ok(response)
///     }
/// }
/// ```
pub trait CallExecutor {
    /// Executes the request and returns the complete response.
    fn execute(&mut self, request: &ScriptRequest) -> Result<HttpResponse, RequestError>;
}

impl<T: CallExecutor + ?Sized> CallExecutor for Box<T> {
    fn execute(&mut self, request: &ScriptRequest) -> Result<HttpResponse, RequestError> {
        (**self).execute(request)
    }
}

/// Validates that the URL is well-formed and uses a supported protocol.
///
/// # Returns
///
/// `Ok(())` if the URL is valid, or `Err(RequestError)` if invalid.
pub fn validate_url(url: &str) -> Result<(), RequestError> {
    let parsed = url::Url::parse(url)?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RequestError::UnsupportedProtocol(format!(
            "Only HTTP and HTTPS are supported, got: {}",
            scheme
        )));
    }

    Ok(())
}
