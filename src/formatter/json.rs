//! JSON pretty-printing for response bodies.

use crate::formatter::FormatError;
use serde::Serialize;
use serde_json::Value;

/// Maximum JSON size to format (10MB).
///
/// Larger bodies are shown as received.
const MAX_JSON_FORMAT_SIZE: usize = 10 * 1024 * 1024;

/// Indentation unit for pretty output.
const INDENT: &[u8] = b"    ";

/// Formats JSON with pretty-printing using 4-space indentation.
///
/// # Returns
///
/// `Ok(String)` with formatted JSON, or `Err(FormatError)` if the input is
/// malformed or exceeds the size limit.
///
/// # Examples
///
/// ```
/// use rest_script::formatter::json::format_json_pretty;
///
/// let formatted = format_json_pretty(r#"{"name":"John"}"#).unwrap();
/// assert_eq!(formatted, "{\n    \"name\": \"John\"\n}");
/// ```
pub fn format_json_pretty(json: &str) -> Result<String, FormatError> {
    if json.len() > MAX_JSON_FORMAT_SIZE {
        return Err(FormatError::ResponseTooLarge(json.len()));
    }

    let value: Value =
        serde_json::from_str(json).map_err(|e| FormatError::JsonError(e.to_string()))?;

    let mut buf = Vec::with_capacity(json.len() + (json.len() / 2));
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    value
        .serialize(&mut serializer)
        .map_err(|e| FormatError::JsonError(e.to_string()))?;

    String::from_utf8(buf).map_err(|e| FormatError::EncodingError(e.to_string()))
}
