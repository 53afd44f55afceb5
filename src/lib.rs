//! REST Script
//!
//! A small interpreter for line-oriented scripts that drive HTTP interactions:
//! set variables, define headers, issue calls, and assert on what comes back.
//!
//! # Architecture
//!
//! - **parser**: turns script text into logical commands (comments, shebang,
//!   multi-line request bodies)
//! - **interpreter**: dispatches commands against the script state and
//!   reports fatal errors with their location
//! - **resolver**: expands `${...}` placeholders from bindings, dynamic keys
//!   and path expressions over JSON documents
//! - **executor**: the call boundary, with a reqwest-backed implementation
//! - **curl**: renders calls as `curl` commands in offline mode
//! - **formatter**: prints responses
//! - **config**: default settings loaded before a run
//! - **models**: requests and responses exchanged with the executor
//!
//! # Script example
//!
//! ```text
//! #!/usr/bin/env rest-script
//! set baseurl https://api.example.com
//! header Content-Type: application/json
//!
//! POST /users
//! {"name": "user-${increment}"}
//!
//! map id ${response:id}
//! GET /users/${id}
//!
//! require ${response:name} user-1
//! ```
//!
//! # Path expressions
//!
//! Placeholders can reach into JSON: `${response:items/state=open;created:latest/id}`
//! narrows the `items` array to open entries, picks the one with the greatest
//! `created` value and returns its `id`. See [`resolver::path`] for the grammar.

pub mod config;
pub mod curl;
pub mod executor;
pub mod formatter;
pub mod interpreter;
pub mod models;
pub mod parser;
pub mod resolver;

pub use interpreter::{Fatal, Interpreter, ScriptError};
pub use resolver::{ResolveError, Resolver, Tree};
