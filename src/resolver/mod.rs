//! Resolution Engine.
//!
//! Placeholders (`${key}`) are answered from dynamic keys, bindings, or a path
//! expression evaluated against a loaded JSON tree.

pub mod engine;
pub mod error;
pub mod path;
pub mod tree;

pub use engine::{DynamicFilter, ResolutionMode, Resolver};
pub use error::ResolveError;
pub use path::{resolve, Comparison, Filter, Selector};
pub use tree::Tree;
