//! Script error types.
//!
//! Every [`ScriptError`] ends the run. [`Fatal`] attaches the location the
//! error was raised at, which is what gets reported to the user.

use crate::executor::RequestError;
use crate::resolver::ResolveError;
use std::fmt;
use std::path::PathBuf;

/// Errors raised while executing a single command.
#[derive(Debug)]
pub enum ScriptError {
    /// The verb is not in the command table.
    UnknownCommand(String),

    /// The payload does not fit the command's grammar.
    MalformedPayload {
        /// Command name
        command: String,
        /// What is wrong with it
        reason: String,
    },

    /// `SET` with a key that is neither a toggle nor a known setting.
    UnknownSetting(String),

    /// A `:option` suffix the command does not accept.
    UnknownOption {
        /// Command name
        command: String,
        /// The unrecognized option
        option: String,
    },

    /// A `REQUIRE` condition did not hold.
    RequireFailed {
        /// Expanded left side
        left: String,
        /// Expanded right side (empty when non-emptiness was asserted)
        right: String,
    },

    /// `LOAD` could not find its key inside the file.
    LoadKeyMissing {
        /// Path expression that was looked up
        key: String,
        /// File it was looked up in
        file: String,
    },

    /// Path-expression misuse or a strict-mode miss.
    Resolve(ResolveError),

    /// The live call failed.
    Request(RequestError),

    /// A file could not be read, or output could not be written.
    Io {
        /// What was being accessed
        target: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A file's content is not valid JSON.
    Json {
        /// The file
        target: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnknownCommand(verb) => write!(f, "Unknown command [{}]", verb),
            ScriptError::MalformedPayload { command, reason } => {
                write!(f, "{} command: {}", command.to_uppercase(), reason)
            }
            ScriptError::UnknownSetting(key) => write!(f, "Unknown SET: [{}]", key),
            ScriptError::UnknownOption { command, option } => write!(
                f,
                "{} command has unknown option [{}]",
                command.to_uppercase(),
                option
            ),
            ScriptError::RequireFailed { left, right } => {
                if right.is_empty() {
                    write!(f, "failed required condition: [{}] is empty", left)
                } else {
                    write!(f, "failed required condition: [{}] != [{}]", left, right)
                }
            }
            ScriptError::LoadKeyMissing { key, file } => write!(
                f,
                "Cannot resolve key [{}] inside of the content of file [{}]",
                key, file
            ),
            ScriptError::Resolve(err) => write!(f, "{}", err),
            ScriptError::Request(err) => write!(f, "{}", err),
            ScriptError::Io { target, source } => {
                write!(f, "accessing [{}]: {}", target.display(), source)
            }
            ScriptError::Json { target, source } => {
                write!(f, "parsing content of file [{}]: {}", target.display(), source)
            }
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Resolve(err) => Some(err),
            ScriptError::Request(err) => Some(err),
            ScriptError::Io { source, .. } => Some(source),
            ScriptError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ResolveError> for ScriptError {
    fn from(err: ResolveError) -> Self {
        ScriptError::Resolve(err)
    }
}

impl From<RequestError> for ScriptError {
    fn from(err: RequestError) -> Self {
        ScriptError::Request(err)
    }
}

/// A script error with the location it was raised at.
#[derive(Debug)]
pub struct Fatal {
    /// What went wrong.
    pub error: ScriptError,
    /// Script file being executed.
    pub file: String,
    /// 1-based line the offending command starts on (0 before the first command).
    pub line: usize,
    /// Text of the offending command.
    pub command: String,
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\tfile: {}\n\tline: {}\n\tcommand: {}",
            self.error, self.file, self.line, self.command
        )
    }
}

impl std::error::Error for Fatal {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
