//! Offline mode.
//!
//! Instead of performing a call, the interpreter can print the equivalent
//! `curl` invocation so the whole script becomes a pastable shell script.

pub mod generator;

pub use generator::{generate_curl_command, EXTERNAL_FILE_PREFIX};
