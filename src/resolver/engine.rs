//! Binding table, dynamic keys and `${...}` placeholder expansion.
//!
//! A [`Resolver`] answers a key in this order:
//!
//! 1. Built-in dynamic keys: `random`, `increment`, `timestamp`, `now` and the
//!    `response:<path>` prefix (matched case-insensitively)
//! 2. Caller-registered dynamic filters, in registration order
//! 3. The binding table, by exact key
//! 4. A hierarchical lookup `name/rest`, where `name` is bound to a JSON
//!    document and `rest` is resolved inside it

use super::error::ResolveError;
use super::path::{break_path, resolve};
use super::tree::Tree;
use chrono::{SecondsFormat, Utc};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Matches `${key}` placeholders. The key is everything up to the first `}`.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("Failed to compile placeholder regex"));

/// Reserved key producing a fresh unique id.
pub const KEY_RANDOM: &str = "random";

/// Reserved key producing the next value of the per-run counter.
pub const KEY_INCREMENT: &str = "increment";

/// Reserved key producing the current Unix time in seconds.
pub const KEY_TIMESTAMP: &str = "timestamp";

/// Reserved key producing the current UTC time in RFC 3339 form.
pub const KEY_NOW: &str = "now";

/// Prefix routing a lookup into the last cached response body.
pub const RESPONSE_PREFIX: &str = "response:";

/// A caller-supplied synthesizer for special keys.
///
/// Returning `None` means the filter does not handle the key.
pub type DynamicFilter = Box<dyn Fn(&str) -> Option<String>>;

/// What happens when a placeholder cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Substitute an empty string and log a warning.
    #[default]
    Tolerant,
    /// Fail with [`ResolveError::Unresolved`].
    Strict,
}

/// The Resolution Engine.
pub struct Resolver {
    bindings: HashMap<String, String>,
    filters: Vec<DynamicFilter>,
    counter: Cell<u64>,
    response: Option<Tree>,
    mode: ResolutionMode,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("bindings", &self.bindings)
            .field("filters", &self.filters.len())
            .field("counter", &self.counter.get())
            .field("response", &self.response.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Creates an empty resolver in tolerant mode.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            filters: Vec::new(),
            counter: Cell::new(0),
            response: None,
            mode: ResolutionMode::default(),
        }
    }

    /// Binds `key` to `value`, replacing any previous value.
    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        debug!("binding [{}] = [{}]", key, value);
        self.bindings.insert(key, value);
    }

    /// Returns the value bound to `key`, without dynamic or hierarchical lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    /// Registers a dynamic filter consulted after the built-in keys.
    pub fn add_filter<F>(&mut self, filter: F)
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.filters.push(Box::new(filter));
    }

    /// Caches a response body for `response:` lookups.
    ///
    /// A body that is not JSON clears the cache.
    pub fn set_last_response(&mut self, body: &[u8]) {
        self.response = match Tree::parse_slice(body) {
            Ok(tree) => Some(tree),
            Err(e) => {
                debug!("response body is not JSON, not cached for lookups: {}", e);
                None
            }
        };
    }

    /// Current miss handling mode.
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Switches miss handling mode.
    pub fn set_mode(&mut self, mode: ResolutionMode) {
        self.mode = mode;
    }

    /// Looks a key up through every source.
    ///
    /// `Ok(None)` is an ordinary miss. Errors are path-language misuse.
    pub fn lookup(&self, key: &str) -> Result<Option<String>, ResolveError> {
        if let Some(value) = self.dynamic(key)? {
            return Ok(Some(value));
        }

        for filter in &self.filters {
            if let Some(value) = filter(key) {
                return Ok(Some(value));
            }
        }

        if let Some(value) = self.bindings.get(key) {
            return Ok(Some(value.clone()));
        }

        let (name, rest) = break_path(key);
        if rest.is_empty() {
            return Ok(None);
        }
        match self.bindings.get(name) {
            Some(value) => {
                let tree = Tree::parse(value).unwrap_or_else(|_| Tree::from(value.as_str()));
                resolve(&tree, rest)
            }
            None => Ok(None),
        }
    }

    /// Replaces every `${key}` in `text` with its resolved value.
    ///
    /// Substituted text is never expanded again. Keys are trimmed before lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use rest_script::resolver::Resolver;
    ///
    /// let mut resolver = Resolver::new();
    /// resolver.bind("host", "api.example.com");
    /// assert_eq!(
    ///     resolver.expand("https://${host}/users").unwrap(),
    ///     "https://api.example.com/users"
    /// );
    /// ```
    pub fn expand(&self, text: &str) -> Result<String, ResolveError> {
        if !text.contains("${") {
            return Ok(text.to_string());
        }

        let mut result = String::with_capacity(text.len());
        let mut last_match_end = 0;

        for cap in PLACEHOLDER_REGEX.captures_iter(text) {
            let (Some(full_match), Some(key)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let key = key.as_str().trim();

            result.push_str(&text[last_match_end..full_match.start()]);

            match self.lookup(key)? {
                Some(value) => result.push_str(&value),
                None => match self.mode {
                    ResolutionMode::Strict => {
                        return Err(ResolveError::Unresolved(key.to_string()))
                    }
                    ResolutionMode::Tolerant => {
                        warn!("unresolved placeholder [{}] replaced with empty text", key);
                    }
                },
            }

            last_match_end = full_match.end();
        }

        result.push_str(&text[last_match_end..]);
        Ok(result)
    }

    fn dynamic(&self, key: &str) -> Result<Option<String>, ResolveError> {
        let lowered = key.to_lowercase();
        match lowered.as_str() {
            KEY_RANDOM => Ok(Some(Uuid::new_v4().simple().to_string())),
            KEY_INCREMENT => {
                let next = self.counter.get() + 1;
                self.counter.set(next);
                Ok(Some(next.to_string()))
            }
            KEY_TIMESTAMP => Ok(Some(Utc::now().timestamp().to_string())),
            KEY_NOW => Ok(Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))),
            _ => match key.get(..RESPONSE_PREFIX.len()) {
                Some(prefix) if prefix.eq_ignore_ascii_case(RESPONSE_PREFIX) => {
                    self.response_value(key[RESPONSE_PREFIX.len()..].trim())
                }
                _ => Ok(None),
            },
        }
    }

    fn response_value(&self, path: &str) -> Result<Option<String>, ResolveError> {
        let Some(tree) = &self.response else {
            warn!("no JSON response available to resolve [{}]", path);
            return Ok(None);
        };

        if let Some(value) = resolve(tree, path)? {
            return Ok(Some(value));
        }

        // single top-level key: fall back to a case-insensitive match
        if let Tree::Object(members) = tree {
            if !path.contains('/') {
                for (name, child) in members {
                    if name.eq_ignore_ascii_case(path) {
                        return Ok(child.as_scalar().map(str::to_string));
                    }
                }
            }
        }
        Ok(None)
    }
}
