//! Command Dispatcher.
//!
//! A command is `verb[:option] payload`. The verb is looked up
//! case-insensitively in a fixed table and the matching handler receives the
//! raw payload and the option.

use super::call;
use super::context::ScriptContext;
use super::error::ScriptError;
use super::handlers;
use crate::models::request::HttpMethod;
use crate::parser::split_word;
use log::debug;

/// Separates a verb from its option.
const OPTION_SEPARATOR: char = ':';

/// Everything a script can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set,
    Map,
    Header,
    Call(HttpMethod),
    Echo,
    Section,
    Require,
    Load,
}

/// Verb table.
const COMMANDS: [(&str, Command); 12] = [
    ("set", Command::Set),
    ("map", Command::Map),
    ("header", Command::Header),
    ("get", Command::Call(HttpMethod::GET)),
    ("post", Command::Call(HttpMethod::POST)),
    ("put", Command::Call(HttpMethod::PUT)),
    ("patch", Command::Call(HttpMethod::PATCH)),
    ("delete", Command::Call(HttpMethod::DELETE)),
    ("echo", Command::Echo),
    ("section", Command::Section),
    ("require", Command::Require),
    ("load", Command::Load),
];

impl Command {
    /// Finds the command for a verb, ignoring case.
    pub fn lookup(verb: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(verb))
            .map(|(_, command)| *command)
    }

    /// The verb as written in the table.
    pub fn name(&self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(_, command)| command == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

/// A command line split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub verb: &'a str,
    pub option: Option<&'a str>,
    pub payload: &'a str,
}

impl<'a> Invocation<'a> {
    /// Splits `verb[:option] payload`.
    pub fn parse(text: &'a str) -> Self {
        let (full_verb, payload) = split_word(text);
        let (verb, option) = match full_verb.split_once(OPTION_SEPARATOR) {
            Some((verb, option)) => (verb, Some(option)),
            None => (full_verb, None),
        };
        Self {
            verb,
            option,
            payload,
        }
    }
}

/// Runs one command against the context.
pub fn dispatch(ctx: &mut ScriptContext, text: &str) -> Result<(), ScriptError> {
    let invocation = Invocation::parse(text);
    let command = Command::lookup(invocation.verb).ok_or_else(|| {
        let (full_verb, _) = split_word(text);
        ScriptError::UnknownCommand(full_verb.to_string())
    })?;

    debug!("dispatching {:?} with [{}]", command, invocation.payload);

    if command != Command::Map {
        if let Some(option) = invocation.option {
            debug!("option [{}] ignored by {}", option, command.name());
        }
    }

    match command {
        Command::Set => handlers::set(ctx, invocation.payload),
        Command::Map => handlers::map(ctx, invocation.payload, invocation.option),
        Command::Header => handlers::header(ctx, invocation.payload),
        Command::Call(method) => call::call(ctx, method, invocation.payload),
        Command::Echo => handlers::echo(ctx, invocation.payload),
        Command::Section => handlers::section(ctx, invocation.payload),
        Command::Require => handlers::require(ctx, invocation.payload),
        Command::Load => handlers::load(ctx, invocation.payload),
    }
}
