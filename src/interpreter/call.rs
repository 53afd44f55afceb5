//! HTTP call commands: `GET|POST|PUT|PATCH|DELETE relative-url [body]`.

use super::context::ScriptContext;
use super::error::ScriptError;
use crate::curl::{generate_curl_command, EXTERNAL_FILE_PREFIX};
use crate::executor::RequestError;
use crate::formatter::{format_response, DisplayOptions};
use crate::models::request::{HttpMethod, ScriptRequest};
use crate::parser::split_word;
use log::debug;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Joins a relative URL onto the base URL.
///
/// The relative path is appended to the base path; a query string on the
/// relative part replaces the base query. An absolute `http(s)` URL is used
/// as is.
///
/// # Examples
///
/// ```
/// use rest_script::interpreter::call::join_url;
///
/// assert_eq!(
///     join_url("https://api.example.com/v1", "/users?page=2").unwrap(),
///     "https://api.example.com/v1/users?page=2"
/// );
/// ```
pub fn join_url(base: &str, relative: &str) -> Result<String, RequestError> {
    if let Ok(absolute) = Url::parse(relative) {
        if absolute.scheme() == "http" || absolute.scheme() == "https" {
            return Ok(absolute.to_string());
        }
    }

    let mut url = Url::parse(base)?;
    if relative.is_empty() {
        return Ok(url.to_string());
    }

    let (path, query) = match relative.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (relative, None),
    };

    if !path.is_empty() {
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
    }
    if query.is_some() {
        url.set_query(query);
    }
    Ok(url.to_string())
}

/// Issues (or, offline, renders) one HTTP call.
pub fn call(ctx: &mut ScriptContext, method: HttpMethod, payload: &str) -> Result<(), ScriptError> {
    ctx.note(
        ctx.dials.echo.for_method(method),
        &format!("{} command: {}", method, payload),
    )?;

    let expanded = ctx.expand(payload)?;
    let (relative, body) = split_word(&expanded);
    let base = ctx.expand(&ctx.base_url)?;
    let url = join_url(&base, relative)?;

    let mut request = ScriptRequest::new(method, url);
    for (name, value) in &ctx.headers {
        request.add_header(name.clone(), ctx.resolver.expand(value)?);
    }
    if !body.is_empty() {
        request.set_body(body.to_string());
    }

    if ctx.offline() {
        let command = generate_curl_command(&request, &ctx.curl_options);
        ctx.print(&command)?;
        return ctx.print("");
    }

    if ctx.dials.resolve_external_files {
        if let Some(file) = body.strip_prefix(EXTERNAL_FILE_PREFIX) {
            let path = PathBuf::from(file);
            debug!("reading request body from {}", path.display());
            let content = fs::read_to_string(&path)
                .map_err(|source| ScriptError::Io { target: path, source })?;
            request.set_body(content);
        }
    }

    let response = ctx.executor.execute(&request)?;
    ctx.resolver.set_last_response(&response.body);

    let options = DisplayOptions {
        show_headers: ctx.dials.print_response_headers,
        pretty_body: ctx.dials.pretty_print_body,
        show_timing: ctx.dials.collect_timing_info,
    };
    ctx.print(&format_response(&response, &options))
}
