//! Script interpreter.
//!
//! Ties the reader, the dispatcher and the script state together. Commands
//! run strictly in document order; the first failing command ends the run
//! with a [`Fatal`] carrying the file, line and command text.
//!
//! # Examples
//!
//! ```
//! use rest_script::executor::{CallExecutor, RequestError};
//! use rest_script::interpreter::Interpreter;
//! use rest_script::models::{HttpResponse, ScriptRequest};
//!
//! struct Unreachable;
//!
//! impl CallExecutor for Unreachable {
//!     fn execute(&mut self, _: &ScriptRequest) -> Result<HttpResponse, RequestError> {
//!         Err(RequestError::NetworkError("no network in this example".to_string()))
//!     }
//! }
//!
//! let mut interpreter = Interpreter::new(Box::new(Unreachable), Box::new(std::io::sink()));
//! interpreter
//!     .run_script("inline", "map name world\nrequire ${name} world")
//!     .unwrap();
//! assert_eq!(interpreter.context().resolver.get("name"), Some("world"));
//! ```

pub mod call;
pub mod commands;
pub mod context;
pub mod error;
pub mod handlers;

pub use commands::{dispatch, Command};
pub use context::{Dials, EchoDials, ScriptContext};
pub use error::{Fatal, ScriptError};

use crate::config::{load_env_defaults, ScriptDefaults};
use crate::executor::CallExecutor;
use crate::parser::{ScriptCommand, ScriptReader};
use crate::resolver::ResolutionMode;
use context::{SCRIPT_FULL_KEY, SCRIPT_KEY};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exit code of a run that completed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code of a malformed command-line invocation.
pub const EXIT_USAGE: i32 = 3;

/// Exit code of a run ended by a fatal script error.
pub const EXIT_FATAL: i32 = 7;

/// Executes scripts against one [`ScriptContext`].
pub struct Interpreter {
    context: ScriptContext,
}

impl Interpreter {
    /// Creates an interpreter with a fresh context.
    pub fn new(executor: Box<dyn CallExecutor>, output: Box<dyn Write>) -> Self {
        Self {
            context: ScriptContext::new(executor, output),
        }
    }

    /// Read access to the script state.
    pub fn context(&self) -> &ScriptContext {
        &self.context
    }

    /// Switches offline mode on and silences notes that would clutter the output.
    pub fn enable_offline_mode(&mut self) {
        let dials = &mut self.context.dials;
        dials.generate_curl_commands = true;
        dials.echo.header = false;
        dials.echo.map = false;
        dials.echo.get = false;
        dials.echo.post = false;
        dials.echo.put = false;
        dials.echo.patch = false;
        dials.echo.delete = false;
    }

    /// Silences every echo toggle.
    pub fn silence(&mut self) {
        self.context.dials.echo = EchoDials::all(false);
    }

    /// Sets how unresolved placeholders are handled.
    pub fn set_resolution_mode(&mut self, mode: ResolutionMode) {
        self.context.dials.strict_resolution = mode == ResolutionMode::Strict;
        self.context.sync_resolution_mode();
    }

    /// Applies settings from a defaults file.
    pub fn apply_defaults(&mut self, defaults: &ScriptDefaults) {
        self.context.apply_defaults(defaults);
    }

    /// Loads and applies the default-settings file named by the environment, if any.
    ///
    /// Problems with the file are logged and otherwise ignored. Returns the
    /// settings that were applied.
    pub fn apply_env_defaults(&mut self) -> Option<ScriptDefaults> {
        let defaults = load_env_defaults()?;
        self.apply_defaults(&defaults);
        Some(defaults)
    }

    /// Reads and runs a script file.
    ///
    /// Binds `script` (the path as given) and `script.full` (the absolute
    /// path) before the first command.
    pub fn run_file(&mut self, path: &Path) -> Result<(), Fatal> {
        let name = path.display().to_string();
        self.context.location.file = name.clone();

        let text = fs::read_to_string(path).map_err(|source| {
            self.fatal(ScriptError::Io {
                target: path.to_path_buf(),
                source,
            })
        })?;

        let full = fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
        self.context.resolver.bind(SCRIPT_KEY, name.clone());
        self.context
            .resolver
            .bind(SCRIPT_FULL_KEY, full.display().to_string());

        self.run_script(&name, &text)
    }

    /// Runs script text; `name` is used in diagnostics.
    pub fn run_script(&mut self, name: &str, script: &str) -> Result<(), Fatal> {
        self.context.location.file = name.to_string();

        let banner = if self.context.offline() {
            self.context
                .print(&format!("# generating curl commands from {}", name))
        } else {
            let enabled = self.context.dials.echo.progress;
            self.context
                .note(enabled, &format!("Processing file {}", name))
        };
        banner.map_err(|e| self.fatal(e))?;

        for command in ScriptReader::new(script) {
            self.execute(&command)?;
        }
        Ok(())
    }

    /// Runs a single logical command.
    pub fn execute(&mut self, command: &ScriptCommand) -> Result<(), Fatal> {
        self.context.location.line = command.line;
        self.context.location.command = command.text.clone();
        debug!("line {}: {}", command.line, command.text);

        dispatch(&mut self.context, &command.text).map_err(|e| self.fatal(e))?;
        self.context.output.flush().map_err(|source| {
            self.fatal(ScriptError::Io {
                target: PathBuf::from("<output>"),
                source,
            })
        })
    }

    fn fatal(&self, error: ScriptError) -> Fatal {
        let location = &self.context.location;
        Fatal {
            error,
            file: location.file.clone(),
            line: location.line,
            command: location.command.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::RequestError;
    use crate::models::{HttpResponse, ScriptRequest};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Counter(Rc<Cell<usize>>);

    impl CallExecutor for Counter {
        fn execute(&mut self, _request: &ScriptRequest) -> Result<HttpResponse, RequestError> {
            self.0.set(self.0.get() + 1);
            Ok(HttpResponse::new(200, "OK".to_string()))
        }
    }

    fn interpreter() -> (Interpreter, Counter) {
        let counter = Counter::default();
        let interpreter = Interpreter::new(Box::new(counter.clone()), Box::new(std::io::sink()));
        (interpreter, counter)
    }

    #[test]
    fn test_no_calls_without_http_verbs() {
        let (mut interpreter, counter) = interpreter();
        interpreter
            .run_script("t", "set baseurl http://h\nmap a 1\necho ${a}\n")
            .unwrap();
        assert_eq!(counter.0.get(), 0);
    }

    #[test]
    fn test_calls_are_counted() {
        let (mut interpreter, counter) = interpreter();
        interpreter
            .run_script("t", "get /a\n\npost /b\n{}\n\ndelete /c")
            .unwrap();
        assert_eq!(counter.0.get(), 3);
    }

    #[test]
    fn test_unknown_command_reports_location() {
        let (mut interpreter, _) = interpreter();
        let fatal = interpreter
            .run_script("broken.rest", "# header\nmap a 1\n\nfrobnicate the thing\necho never")
            .unwrap_err();
        assert!(matches!(fatal.error, ScriptError::UnknownCommand(ref verb) if verb == "frobnicate"));
        assert_eq!(fatal.file, "broken.rest");
        assert_eq!(fatal.line, 4);
        assert_eq!(fatal.command, "frobnicate the thing");
    }

    #[test]
    fn test_execution_stops_at_first_failure() {
        let (mut interpreter, _) = interpreter();
        let result = interpreter.run_script("t", "require a b\nmap after 1");
        assert!(result.is_err());
        assert_eq!(interpreter.context().resolver.get("after"), None);
    }

    #[test]
    fn test_offline_mode_makes_no_calls() {
        let (mut interpreter, counter) = interpreter();
        interpreter.enable_offline_mode();
        interpreter.run_script("t", "get /a\n\npatch /b {}").unwrap();
        assert_eq!(counter.0.get(), 0);
    }

    #[test]
    fn test_strict_mode_fails_on_miss() {
        let (mut interpreter, _) = interpreter();
        interpreter.set_resolution_mode(ResolutionMode::Strict);
        let fatal = interpreter.run_script("t", "echo ${nothing}").unwrap_err();
        assert!(matches!(fatal.error, ScriptError::Resolve(_)));
    }

    #[test]
    fn test_missing_file() {
        let (mut interpreter, _) = interpreter();
        let fatal = interpreter
            .run_file(Path::new("/no/such/script.rest"))
            .unwrap_err();
        assert!(matches!(fatal.error, ScriptError::Io { .. }));
        assert_eq!(fatal.line, 0);
    }
}
