//! Handlers for the non-HTTP commands.

use super::context::ScriptContext;
use super::error::ScriptError;
use crate::config::parse_loose_bool;
use crate::parser::split_word;
use crate::resolver::{resolve, Tree};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Value a toggle takes when `SET` gets a word outside the boolean vocabulary.
const UNKNOWN_BOOLEAN_FALLBACK: bool = false;

/// The only file format `LOAD` understands.
const LOAD_FORMAT_JSON: &str = "json";

fn malformed(command: &str, reason: impl Into<String>) -> ScriptError {
    ScriptError::MalformedPayload {
        command: command.to_string(),
        reason: reason.into(),
    }
}

/// `SET key value`: a toggle, the base URL or the offline `curl` flags.
pub fn set(ctx: &mut ScriptContext, payload: &str) -> Result<(), ScriptError> {
    ctx.note(ctx.dials.echo.set, &format!("SET command: {}", payload))?;

    let expanded = ctx.expand(payload)?;
    let (key, value) = split_word(&expanded);
    if key.is_empty() {
        return Err(malformed("set", "missing key"));
    }
    let key = key.to_lowercase();

    if let Some(dial) = ctx.dials.dial_mut(&key) {
        *dial = parse_loose_bool(value).unwrap_or(UNKNOWN_BOOLEAN_FALLBACK);
        ctx.sync_resolution_mode();
        return Ok(());
    }

    match key.as_str() {
        "baseurl" | "base.url" => ctx.base_url = value.to_string(),
        "curl.options" => ctx.curl_options = value.to_string(),
        _ => return Err(ScriptError::UnknownSetting(key)),
    }
    Ok(())
}

/// `MAP[:base64|:url] key value`: binds the expanded value.
pub fn map(ctx: &mut ScriptContext, payload: &str, option: Option<&str>) -> Result<(), ScriptError> {
    ctx.note(ctx.dials.echo.map, &format!("MAP command: {}", payload))?;

    let expanded = ctx.expand(payload)?;
    let (key, value) = split_word(&expanded);
    if key.is_empty() {
        return Err(malformed("map", "missing key"));
    }

    let value = match option.map(str::to_lowercase).as_deref() {
        None | Some("") => value.to_string(),
        Some("base64") => STANDARD.encode(value.as_bytes()),
        Some("url") => url::form_urlencoded::byte_serialize(value.as_bytes()).collect(),
        Some(other) => {
            return Err(ScriptError::UnknownOption {
                command: "map".to_string(),
                option: other.to_string(),
            })
        }
    };

    ctx.resolver.bind(key, value);
    Ok(())
}

/// Splits `Name: value`, `Name:value` or `Name value`.
fn split_header(payload: &str) -> (&str, &str) {
    match payload.find(':') {
        Some(colon) if !payload[..colon].contains(char::is_whitespace) => {
            (&payload[..colon], payload[colon + 1..].trim())
        }
        _ => split_word(payload),
    }
}

/// `HEADER name: value`: sets a header, or removes it when the value is empty.
///
/// The value is stored raw and expanded right before each call.
pub fn header(ctx: &mut ScriptContext, payload: &str) -> Result<(), ScriptError> {
    ctx.note(ctx.dials.echo.header, &format!("HEADER command: {}", payload))?;

    let (name, value) = split_header(payload);
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed("header", "header name cannot be empty/absent"));
    }

    if value.is_empty() {
        ctx.headers.remove(name);
    } else {
        ctx.headers.insert(name.to_string(), value.to_string());
    }
    Ok(())
}

/// `ECHO text`. Silent in offline mode.
pub fn echo(ctx: &mut ScriptContext, payload: &str) -> Result<(), ScriptError> {
    if ctx.offline() || !ctx.dials.echo.echo {
        return Ok(());
    }
    let text = ctx.expand(payload)?;
    ctx.print(&text)
}

/// `SECTION text`. Silent in offline mode.
pub fn section(ctx: &mut ScriptContext, payload: &str) -> Result<(), ScriptError> {
    if ctx.offline() || !ctx.dials.echo.section {
        return Ok(());
    }
    let text = ctx.expand(payload)?;
    ctx.print("")?;
    ctx.print(&format!("==== {} ====", text))
}

/// `REQUIRE left right`: both sides expanded and compared.
///
/// Without a right side the left side must expand to something non-empty.
pub fn require(ctx: &mut ScriptContext, payload: &str) -> Result<(), ScriptError> {
    ctx.note(ctx.dials.echo.require, &format!("REQUIRE: {}", payload))?;

    let (left, right) = split_word(payload);
    let expanded_left = ctx.expand(left)?;

    if right.is_empty() {
        if expanded_left.is_empty() {
            return Err(ScriptError::RequireFailed {
                left: expanded_left,
                right: String::new(),
            });
        }
        return ctx.note(
            ctx.dials.echo.progress,
            &format!("Require passed: [{}] is not empty", left),
        );
    }

    let expanded_right = ctx.expand(right)?;
    if expanded_left != expanded_right {
        if expanded_left.to_lowercase() != expanded_right.to_lowercase() {
            return Err(ScriptError::RequireFailed {
                left: expanded_left,
                right: expanded_right,
            });
        }
        debug!(
            "require succeeded only in case-insensitive comparison: [{}] and [{}]",
            expanded_left, expanded_right
        );
    }

    ctx.note(
        ctx.dials.echo.progress,
        &format!("Require passed: [{}] == [{}]", left, right),
    )
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> Result<PathBuf, ScriptError> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        return Err(malformed(
            "load",
            format!("cannot expand user-specific home dir in [{}]", path),
        ));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| malformed("load", "cannot find user-specific home dir"))?;
    Ok(home.join(rest.trim_start_matches(['/', '\\'])))
}

/// `LOAD entry filename json key`: binds `entry` to `key` resolved inside the file.
pub fn load(ctx: &mut ScriptContext, payload: &str) -> Result<(), ScriptError> {
    ctx.note(ctx.dials.echo.load, &format!("LOAD: {}", payload))?;

    let parts: Vec<&str> = payload.split_whitespace().collect();
    let [entry, filename, format, key] = parts[..] else {
        return Err(malformed(
            "load",
            format!("wrong arguments [{}]; expected: entry filename json key", payload),
        ));
    };

    if !format.eq_ignore_ascii_case(LOAD_FORMAT_JSON) {
        return Err(malformed("load", format!("wrong format [{}]", format)));
    }

    let path = expand_home(&ctx.expand(filename)?)?;
    let text = fs::read_to_string(&path).map_err(|source| ScriptError::Io {
        target: path.clone(),
        source,
    })?;
    let tree = Tree::parse(&text).map_err(|source| ScriptError::Json {
        target: path.clone(),
        source,
    })?;

    match resolve(&tree, key)? {
        Some(value) => {
            let value = ctx.expand(&value)?;
            ctx.resolver.bind(entry, value);
            Ok(())
        }
        None => Err(ScriptError::LoadKeyMissing {
            key: key.to_string(),
            file: filename.to_string(),
        }),
    }
}
