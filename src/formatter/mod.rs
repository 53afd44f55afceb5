//! HTTP response formatter.
//!
//! Renders a response as the plain text block the interpreter prints after a
//! live call: a status line, optional headers, an optional timing line and
//! the body.

pub mod json;

use crate::models::response::HttpResponse;
use log::warn;
use std::fmt;
use std::time::Duration;

/// Response headers whose name ends with this suffix are flagged.
const ATTENTION_SUFFIX: &str = "-error";

/// Marker appended to flagged header lines.
const ATTENTION_MARKER: &str = "  <-- attention";

/// Errors that can occur during response formatting.
#[derive(Debug)]
pub enum FormatError {
    /// JSON parsing or formatting error.
    JsonError(String),

    /// UTF-8 encoding error.
    EncodingError(String),

    /// Response too large to format.
    ResponseTooLarge(usize),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::JsonError(msg) => write!(f, "JSON formatting error: {}", msg),
            FormatError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            FormatError::ResponseTooLarge(size) => {
                write!(f, "Response too large to format: {} bytes", size)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// What to include when displaying a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Print response headers.
    pub show_headers: bool,
    /// Pretty-print JSON bodies.
    pub pretty_body: bool,
    /// Print how long the call took.
    pub show_timing: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_headers: true,
            pretty_body: true,
            show_timing: false,
        }
    }
}

/// Whether a response header deserves attention.
pub fn attention_needed(name: &str) -> bool {
    name.to_lowercase().ends_with(ATTENTION_SUFFIX)
}

/// Formats a duration like "1.234s" or "567ms".
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

/// Formats a response for display.
///
/// Headers are listed in name order. A JSON body that fails to pretty-print
/// is shown as received.
///
/// # Examples
///
/// ```
/// use rest_script::formatter::{format_response, DisplayOptions};
/// use rest_script::models::HttpResponse;
///
/// let mut response = HttpResponse::new(404, "Not Found".to_string());
/// response.add_header("X-Request-Error".to_string(), "missing".to_string());
///
/// let text = format_response(&response, &DisplayOptions::default());
/// assert_eq!(
///     text,
///     "Status: 404 Not Found\n\tHeader: [X-Request-Error] = [missing]  <-- attention\nBody is empty."
/// );
/// ```
pub fn format_response(response: &HttpResponse, options: &DisplayOptions) -> String {
    let mut lines = vec![format!(
        "Status: {} {}",
        response.status_code, response.status_text
    )];

    if options.show_headers {
        let mut names: Vec<&String> = response.headers.keys().collect();
        names.sort();
        for name in names {
            let mut line = format!("\tHeader: [{}] = [{}]", name, response.headers[name]);
            if attention_needed(name) {
                line.push_str(ATTENTION_MARKER);
            }
            lines.push(line);
        }
    }

    if options.show_timing {
        lines.push(format!(
            "the request took {}",
            format_duration(response.duration)
        ));
    }

    lines.push(format_body(response, options.pretty_body));
    lines.join("\n")
}

fn format_body(response: &HttpResponse, pretty: bool) -> String {
    if response.body.is_empty() {
        return "Body is empty.".to_string();
    }

    let text = String::from_utf8_lossy(&response.body);
    if pretty && response.is_json() {
        match json::format_json_pretty(&text) {
            Ok(formatted) => return format!("Body: {}", formatted),
            Err(e) => warn!("showing body as received: {}", e),
        }
    }
    format!("Body: {}", text)
}
