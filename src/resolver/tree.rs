//! Loaded trees.
//!
//! A [`Tree`] is the parsed, immutable shape the resolver walks: an object, an
//! array or a scalar string. JSON numbers and booleans become scalars holding
//! their JSON text; `null` members and elements are dropped, so they read as
//! "not found".

use serde_json::Value;
use std::collections::HashMap;

/// A parsed hierarchical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    /// String-keyed mapping (key order is irrelevant).
    Object(HashMap<String, Tree>),
    /// Ordered sequence.
    Array(Vec<Tree>),
    /// Terminal value.
    Scalar(String),
}

impl Tree {
    /// Parses a JSON document. A `null` document becomes an empty object.
    pub fn parse(text: &str) -> Result<Tree, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Tree::from_json(&value).unwrap_or_else(|| Tree::Object(HashMap::new())))
    }

    /// Parses a JSON document held as raw bytes.
    pub fn parse_slice(bytes: &[u8]) -> Result<Tree, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Tree::from_json(&value).unwrap_or_else(|| Tree::Object(HashMap::new())))
    }

    /// Converts a JSON value, returning `None` for `null`.
    pub fn from_json(value: &Value) -> Option<Tree> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Tree::Scalar(flag.to_string())),
            Value::Number(number) => Some(Tree::Scalar(number.to_string())),
            Value::String(text) => Some(Tree::Scalar(text.clone())),
            Value::Array(items) => Some(Tree::Array(
                items.iter().filter_map(Tree::from_json).collect(),
            )),
            Value::Object(members) => Some(Tree::Object(
                members
                    .iter()
                    .filter_map(|(key, member)| {
                        Tree::from_json(member).map(|tree| (key.clone(), tree))
                    })
                    .collect(),
            )),
        }
    }

    /// Returns the scalar text, if this node is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Tree::Scalar(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Tree {
    fn from(text: &str) -> Self {
        Tree::Scalar(text.to_string())
    }
}
