//! Default-settings file schema.
//!
//! The file is a flat JSON object. Known keys use dotted names; any key
//! starting with `header:` seeds the header set. Values are normally strings,
//! with booleans spelled in a loose vocabulary (`yes`, `sure`, `nope`, ...).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Key prefix naming a default header.
pub const HEADER_KEY_PREFIX: &str = "header:";

/// Words read as `true`.
const TRUE_WORDS: [&str; 11] = [
    "true",
    "yes",
    "ok",
    "okay",
    "please",
    "do it",
    "go ahead",
    "sure",
    "affirmative",
    "yeap",
    "yeah",
];

/// Words read as `false`.
const FALSE_WORDS: [&str; 5] = ["false", "no", "nope", "nada", "no way"];

/// Settings applied to the script context before the first command.
///
/// Every field is optional; `None` keeps the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptDefaults {
    /// Base URL every relative call URL is joined to.
    #[serde(rename = "base.url", default)]
    pub base_url: Option<String>,

    /// Extra flags placed after `curl` in offline mode.
    #[serde(rename = "curl.options", default)]
    pub curl_options: Option<String>,

    /// Start in offline mode, rendering calls as `curl` commands.
    #[serde(
        rename = "generate.curl.commands",
        default,
        deserialize_with = "loose_bool"
    )]
    pub generate_curl_commands: Option<bool>,

    /// Print response headers after live calls.
    #[serde(
        rename = "print.response.headers",
        default,
        deserialize_with = "loose_bool"
    )]
    pub print_response_headers: Option<bool>,

    /// Print how long each live call took.
    #[serde(
        rename = "collect.timing.info",
        default,
        deserialize_with = "loose_bool"
    )]
    pub collect_timing_info: Option<bool>,

    /// Pretty-print JSON response bodies.
    #[serde(rename = "pretty.print.body", default, deserialize_with = "loose_bool")]
    pub pretty_print_body: Option<bool>,

    /// Fail on unresolved placeholders instead of substituting empty text.
    #[serde(rename = "strict.resolution", default, deserialize_with = "loose_bool")]
    pub strict_resolution: Option<bool>,

    /// Live call timeout in seconds.
    #[serde(default, deserialize_with = "loose_u64")]
    pub timeout: Option<u64>,

    /// Everything else, including `header:*` keys.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ScriptDefaults {
    /// Parses a settings document.
    ///
    /// Keys are matched case-insensitively; the name part of a `header:` key
    /// keeps its spelling.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let normalized = match value {
            Value::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (normalize_key(&key), value))
                    .collect(),
            ),
            other => other,
        };
        serde_json::from_value(normalized)
    }

    /// Default headers declared with `header:<Name>` keys.
    ///
    /// Non-string values become empty, which removes the header.
    pub fn headers(&self) -> BTreeMap<String, String> {
        self.extra
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(HEADER_KEY_PREFIX).map(|name| {
                    let value = value.as_str().unwrap_or_default().to_string();
                    (name.trim().to_string(), value)
                })
            })
            .filter(|(name, _)| !name.is_empty())
            .collect()
    }

    /// Keys that are neither known settings nor headers.
    pub fn unknown_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .extra
            .keys()
            .map(String::as_str)
            .filter(|key| !key.starts_with(HEADER_KEY_PREFIX))
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Validates the settings.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == Some(0) {
            return Err("timeout must be greater than 0".to_string());
        }
        if let Some(base_url) = &self.base_url {
            if base_url.trim().is_empty() {
                return Err("base.url cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    match key.get(..HEADER_KEY_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(HEADER_KEY_PREFIX) => {
            format!("{}{}", HEADER_KEY_PREFIX, &key[HEADER_KEY_PREFIX.len()..])
        }
        _ => key.to_lowercase(),
    }
}

/// Reads a word from the loose boolean vocabulary.
///
/// Returns `None` for anything outside it.
///
/// # Examples
///
/// ```
/// use rest_script::config::parse_loose_bool;
///
/// assert_eq!(parse_loose_bool("Sure"), Some(true));
/// assert_eq!(parse_loose_bool("no way"), Some(false));
/// assert_eq!(parse_loose_bool("maybe"), None);
/// ```
pub fn parse_loose_bool(text: &str) -> Option<bool> {
    let lowered = text.trim().to_lowercase();
    if TRUE_WORDS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        Value::String(text) => parse_loose_bool(&text),
        _ => None,
    })
}

fn loose_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}
