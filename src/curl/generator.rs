//! cURL command generator.
//!
//! Renders a resolved [`ScriptRequest`] as a shell-pastable `curl` invocation.
//! The output is deterministic: headers come out in sorted order.

use crate::models::request::ScriptRequest;

/// Prefix marking a body that lives in an external file.
pub const EXTERNAL_FILE_PREFIX: char = '@';

/// Generates the offline rendering of a call.
///
/// The first line is a `#` comment naming the verb and URL, followed by the
/// `curl` command split over several lines with backslash continuations.
///
/// # Arguments
///
/// * `request` - The fully expanded request
/// * `curl_options` - Extra flags inserted verbatim after `curl` (skipped when empty)
///
/// # Examples
///
/// ```
/// use rest_script::curl::generate_curl_command;
/// use rest_script::models::{HttpMethod, ScriptRequest};
///
/// let mut request = ScriptRequest::new(HttpMethod::POST, "https://api.example.com/users".to_string());
/// request.add_header("Content-Type".to_string(), "application/json".to_string());
/// request.set_body(r#"{"name":"John"}"#.to_string());
///
/// let curl = generate_curl_command(&request, "-i");
/// assert!(curl.starts_with("# POST https://api.example.com/users\ncurl \\\n"));
/// assert!(curl.contains("--header 'Content-Type: application/json'"));
/// assert!(curl.ends_with(r#"--data '{"name":"John"}'"#));
/// ```
pub fn generate_curl_command(request: &ScriptRequest, curl_options: &str) -> String {
    let mut parts = vec!["curl".to_string()];

    let curl_options = curl_options.trim();
    if !curl_options.is_empty() {
        parts.push(curl_options.to_string());
    }
    parts.push(format!("--request {}", request.method.as_str()));
    parts.push(format!("--url {}", escape_shell_arg(&request.url)));

    for (name, value) in request.effective_headers() {
        parts.push(format!(
            "--header {}",
            escape_shell_arg(&format!("{}: {}", name, value))
        ));
    }

    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        if body.starts_with(EXTERNAL_FILE_PREFIX) {
            parts.push(format!("--data-binary {}", escape_shell_arg(body)));
        } else {
            parts.push(format!("--data {}", quote(body)));
        }
    }

    format!(
        "# {} {}\n{}",
        request.method.as_str(),
        request.url,
        format_multiline(&parts)
    )
}

/// Escapes a string for safe use in shell commands.
///
/// Uses single quotes when needed, escaping any embedded single quotes.
fn escape_shell_arg(arg: &str) -> String {
    if needs_quoting(arg) {
        quote(arg)
    } else {
        arg.to_string()
    }
}

/// Wraps in single quotes unconditionally.
fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Checks if a string needs quoting for shell safety.
fn needs_quoting(s: &str) -> bool {
    let special_chars = [
        ' ', '\t', '\n', '\r', '|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\'', '*',
        '?', '[', ']', '#', '~', '=', '%', '{', '}',
    ];

    s.is_empty() || s.chars().any(|c| special_chars.contains(&c))
}

/// Joins command parts with backslash continuations, indenting every part after the first.
fn format_multiline(parts: &[String]) -> String {
    let mut result = String::new();
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            result.push_str(" \\\n  ");
        }
        result.push_str(part);
    }
    result
}
