//! Script state shared by every command handler.

use super::error::ScriptError;
use crate::config::ScriptDefaults;
use crate::executor::CallExecutor;
use crate::models::request::HttpMethod;
use crate::resolver::{ResolutionMode, Resolver};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Base URL used until a script or the defaults file sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Flags placed after `curl` in offline mode unless overridden.
pub const DEFAULT_CURL_OPTIONS: &str = "-i";

/// Binding holding a unique id for the run.
pub const SESSION_KEY: &str = "session";

/// Binding holding the script file name as given.
pub const SCRIPT_KEY: &str = "script";

/// Binding holding the absolute script path.
pub const SCRIPT_FULL_KEY: &str = "script.full";

/// Per-command-family echo toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoDials {
    pub map: bool,
    pub set: bool,
    pub get: bool,
    pub post: bool,
    pub put: bool,
    pub patch: bool,
    pub delete: bool,
    pub header: bool,
    pub echo: bool,
    pub section: bool,
    pub require: bool,
    pub load: bool,
    pub progress: bool,
}

impl EchoDials {
    /// Every echo on or off.
    pub fn all(on: bool) -> Self {
        Self {
            map: on,
            set: on,
            get: on,
            post: on,
            put: on,
            patch: on,
            delete: on,
            header: on,
            echo: on,
            section: on,
            require: on,
            load: on,
            progress: on,
        }
    }

    /// Echo toggle for an HTTP verb.
    pub fn for_method(&self, method: HttpMethod) -> bool {
        match method {
            HttpMethod::GET => self.get,
            HttpMethod::POST => self.post,
            HttpMethod::PUT => self.put,
            HttpMethod::PATCH => self.patch,
            HttpMethod::DELETE => self.delete,
        }
    }
}

impl Default for EchoDials {
    fn default() -> Self {
        Self::all(true)
    }
}

/// Boolean toggles settable with `SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dials {
    pub print_response_headers: bool,
    /// Offline mode.
    pub generate_curl_commands: bool,
    pub collect_timing_info: bool,
    pub resolve_external_files: bool,
    pub pretty_print_body: bool,
    pub strict_resolution: bool,
    pub echo: EchoDials,
}

impl Default for Dials {
    fn default() -> Self {
        Self {
            print_response_headers: true,
            generate_curl_commands: false,
            collect_timing_info: false,
            resolve_external_files: true,
            pretty_print_body: true,
            strict_resolution: false,
            echo: EchoDials::default(),
        }
    }
}

impl Dials {
    /// Looks a toggle up by its `SET` name (already lower-cased).
    pub fn dial_mut(&mut self, name: &str) -> Option<&mut bool> {
        let dial = match name {
            "print.response.headers" => &mut self.print_response_headers,
            "generate.curl.commands" => &mut self.generate_curl_commands,
            "collect.timing.info" => &mut self.collect_timing_info,
            "resolve.external.files" => &mut self.resolve_external_files,
            "pretty.print.body" => &mut self.pretty_print_body,
            "strict.resolution" => &mut self.strict_resolution,
            "echo.map" => &mut self.echo.map,
            "echo.set" => &mut self.echo.set,
            "echo.get" => &mut self.echo.get,
            "echo.post" => &mut self.echo.post,
            "echo.put" => &mut self.echo.put,
            "echo.patch" => &mut self.echo.patch,
            "echo.delete" => &mut self.echo.delete,
            "echo.header" => &mut self.echo.header,
            "echo.echo" => &mut self.echo.echo,
            "echo.section" => &mut self.echo.section,
            "echo.require" => &mut self.echo.require,
            "echo.load" => &mut self.echo.load,
            "echo.progress" => &mut self.echo.progress,
            _ => return None,
        };
        Some(dial)
    }
}

/// Where execution currently is, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub command: String,
}

/// Mutable state of one script run.
pub struct ScriptContext {
    /// Bindings, dynamic keys and the cached last response.
    pub resolver: Resolver,
    /// Active header set. Values are expanded at call time.
    pub headers: BTreeMap<String, String>,
    /// Base URL, expanded at call time.
    pub base_url: String,
    /// Extra `curl` flags for offline mode.
    pub curl_options: String,
    pub dials: Dials,
    pub location: Location,
    /// Performs live calls.
    pub executor: Box<dyn CallExecutor>,
    /// Destination of notes, echo output, responses and `curl` commands.
    pub output: Box<dyn Write>,
}

impl ScriptContext {
    /// Creates a fresh context with a new `session` binding.
    pub fn new(executor: Box<dyn CallExecutor>, output: Box<dyn Write>) -> Self {
        let mut resolver = Resolver::new();
        resolver.bind(SESSION_KEY, Uuid::new_v4().simple().to_string());

        Self {
            resolver,
            headers: BTreeMap::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            curl_options: DEFAULT_CURL_OPTIONS.to_string(),
            dials: Dials::default(),
            location: Location::default(),
            executor,
            output,
        }
    }

    /// Whether calls are rendered as `curl` commands instead of performed.
    pub fn offline(&self) -> bool {
        self.dials.generate_curl_commands
    }

    /// Expands placeholders in `text`.
    pub fn expand(&self, text: &str) -> Result<String, ScriptError> {
        Ok(self.resolver.expand(text)?)
    }

    /// Writes one line to the output.
    pub fn print(&mut self, text: &str) -> Result<(), ScriptError> {
        writeln!(self.output, "{}", text).map_err(|source| ScriptError::Io {
            target: PathBuf::from("<output>"),
            source,
        })
    }

    /// Writes a progress note when `enabled`.
    ///
    /// In offline mode notes become shell comments.
    pub fn note(&mut self, enabled: bool, text: &str) -> Result<(), ScriptError> {
        if !enabled {
            return Ok(());
        }
        if self.offline() {
            self.print(&format!("# {}", text))
        } else {
            self.print(text)
        }
    }

    /// Keeps the resolver's miss handling in line with the `strict.resolution` toggle.
    pub fn sync_resolution_mode(&mut self) {
        let mode = if self.dials.strict_resolution {
            ResolutionMode::Strict
        } else {
            ResolutionMode::Tolerant
        };
        self.resolver.set_mode(mode);
    }

    /// Applies settings from a defaults file.
    pub fn apply_defaults(&mut self, defaults: &ScriptDefaults) {
        if let Some(base_url) = &defaults.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(curl_options) = &defaults.curl_options {
            self.curl_options = curl_options.clone();
        }
        if let Some(flag) = defaults.generate_curl_commands {
            self.dials.generate_curl_commands = flag;
        }
        if let Some(flag) = defaults.print_response_headers {
            self.dials.print_response_headers = flag;
        }
        if let Some(flag) = defaults.collect_timing_info {
            self.dials.collect_timing_info = flag;
        }
        if let Some(flag) = defaults.pretty_print_body {
            self.dials.pretty_print_body = flag;
        }
        if let Some(flag) = defaults.strict_resolution {
            self.dials.strict_resolution = flag;
        }
        for (name, value) in defaults.headers() {
            if value.is_empty() {
                self.headers.remove(&name);
            } else {
                self.headers.insert(name, value);
            }
        }
        self.sync_resolution_mode();
    }
}
