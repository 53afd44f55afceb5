//! Data models for HTTP requests and responses.
//!
//! This module contains the data structures exchanged between the interpreter
//! and the call executor.

pub mod request;
pub mod response;

pub use request::{HttpMethod, ScriptRequest};
pub use response::HttpResponse;
