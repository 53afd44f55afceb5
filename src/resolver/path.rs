//! Path expressions and their evaluation against a [`Tree`].
//!
//! A path is a `/`-separated list of segments. Object nodes consume a segment
//! as a key. Array nodes consume a segment that picks exactly one element:
//!
//! - `name:first`, `name:last`, `name:random` pick by position (`name` unused)
//! - `name:earliest`, `name:latest` resolve `name` in every element and pick
//!   the element whose value sorts first or last (plain string order)
//! - `f1=v1;f2==v2;name:last` narrows the array with each filter, in written
//!   order, then applies the single selector to what is left
//!
//! A segment without a selector selects nothing: there is no implicit
//! "first element" default.
//!
//! The path is cut at every `/` before a segment's clauses are read, so a
//! filter value cannot contain `/`. In `routes/path=/web;id:first` the array
//! segment is just `path=`, which carries no selector and finds nothing.
//!
//! # Examples
//!
//! ```
//! use rest_script::resolver::{resolve, Tree};
//!
//! let tree = Tree::parse(r#"{"items": [
//!     {"k": "a", "t": "x"},
//!     {"k": "a", "t": "y"},
//!     {"k": "b", "t": "z"}
//! ]}"#).unwrap();
//!
//! assert_eq!(resolve(&tree, "items/k=a;t:last/t").unwrap(), Some("y".to_string()));
//! assert_eq!(resolve(&tree, "items/:first/k").unwrap(), Some("a".to_string()));
//! assert_eq!(resolve(&tree, "missing").unwrap(), None);
//! ```

use super::error::ResolveError;
use super::tree::Tree;
use log::debug;
use rand::Rng;
use std::collections::BTreeMap;

/// Separates path segments.
pub const SEGMENT_SEPARATOR: char = '/';

/// Separates clauses inside one array segment.
pub const CLAUSE_SEPARATOR: char = ';';

/// Introduces a selector option.
pub const OPTION_SEPARATOR: char = ':';

/// Marks a filter clause.
const FILTER_MARKER: char = '=';

/// Positional or temporal rule choosing one array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Index 0.
    First,
    /// Index `len - 1`.
    Last,
    /// A uniformly random index.
    Random,
    /// The element whose resolved field sorts first.
    Earliest,
    /// The element whose resolved field sorts last.
    Latest,
}

impl Selector {
    /// Parses a selector option (case-sensitive, as written in scripts).
    pub fn parse(option: &str) -> Option<Self> {
        match option {
            "first" => Some(Selector::First),
            "last" => Some(Selector::Last),
            "random" => Some(Selector::Random),
            "earliest" => Some(Selector::Earliest),
            "latest" => Some(Selector::Latest),
            _ => None,
        }
    }

    /// Returns the option text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Selector::First => "first",
            Selector::Last => "last",
            Selector::Random => "random",
            Selector::Earliest => "earliest",
            Selector::Latest => "latest",
        }
    }
}

/// Comparison applied by a filter clause to an element's field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `==` or `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=` (field contains value)
    Contains,
    /// `=>` (field does not contain value)
    NotContains,
    /// `=(` (field starts with value)
    Prefix,
    /// `=)` (field ends with value)
    Suffix,
}

/// Operator spellings in lookup order. Every spelling contains `=`, and the
/// single `=` comes last so that two-character operators win.
const OPERATORS: [(&str, Comparison); 7] = [
    ("==", Comparison::Equal),
    ("!=", Comparison::NotEqual),
    ("<=", Comparison::Contains),
    ("=>", Comparison::NotContains),
    ("=(", Comparison::Prefix),
    ("=)", Comparison::Suffix),
    ("=", Comparison::Equal),
];

impl Comparison {
    /// Evaluates the comparison with the element's field on the left.
    pub fn evaluate(self, left: &str, right: &str) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::Contains => left.contains(right),
            Comparison::NotContains => !left.contains(right),
            Comparison::Prefix => left.starts_with(right),
            Comparison::Suffix => left.ends_with(right),
        }
    }
}

/// A parsed `field<op>value` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field resolved inside each element.
    pub field: String,
    /// Value compared against.
    pub value: String,
    /// How the two are compared.
    pub comparison: Comparison,
}

impl Filter {
    /// Parses a filter clause. Field and value are trimmed.
    pub fn parse(clause: &str) -> Result<Self, ResolveError> {
        for (spelling, comparison) in OPERATORS {
            if let Some(index) = clause.find(spelling) {
                return Ok(Filter {
                    field: clause[..index].trim().to_string(),
                    value: clause[index + spelling.len()..].trim().to_string(),
                    comparison,
                });
            }
        }
        Err(ResolveError::NoOperator(clause.to_string()))
    }

    /// Whether an array element passes this filter.
    ///
    /// Only object elements carry fields; the field must resolve to a scalar.
    pub fn matches(&self, element: &Tree) -> Result<bool, ResolveError> {
        if !matches!(element, Tree::Object(_)) {
            return Ok(false);
        }
        Ok(match resolve(element, &self.field)? {
            Some(found) => self.comparison.evaluate(&found, &self.value),
            None => false,
        })
    }
}

/// Splits a path into its first segment and the remainder.
pub fn break_path(path: &str) -> (&str, &str) {
    match path.split_once(SEGMENT_SEPARATOR) {
        Some((first, remainder)) => (first, remainder),
        None => (path, ""),
    }
}

/// Splits a segment into `name` and optional `:option`.
pub fn break_param(segment: &str) -> Result<(&str, Option<&str>), ResolveError> {
    let mut parts = segment.split(OPTION_SEPARATOR);
    let name = parts.next().unwrap_or("");
    let option = parts.next();
    if parts.next().is_some() {
        return Err(ResolveError::TooManyParts(segment.to_string()));
    }
    Ok((name, option))
}

/// Resolves `path` against `tree`.
///
/// Returns `Ok(Some(value))` when a scalar is reached with the path exhausted,
/// `Ok(None)` for an ordinary miss, and an error for a misuse of the path
/// language.
pub fn resolve(tree: &Tree, path: &str) -> Result<Option<String>, ResolveError> {
    match tree {
        Tree::Scalar(value) => {
            if path.is_empty() {
                Ok(Some(value.clone()))
            } else {
                Err(ResolveError::PastScalar {
                    path: path.to_string(),
                    value: value.clone(),
                })
            }
        }
        Tree::Object(members) => {
            let (first, remainder) = break_path(path);
            match members.get(first) {
                Some(child) => resolve(child, remainder),
                None => Ok(None),
            }
        }
        Tree::Array(items) => {
            let items: Vec<&Tree> = items.iter().collect();
            resolve_array(&items, path)
        }
    }
}

fn resolve_array(items: &[&Tree], path: &str) -> Result<Option<String>, ResolveError> {
    if items.is_empty() {
        return Ok(None);
    }

    let (segment, remainder) = break_path(path);
    if !segment.contains(CLAUSE_SEPARATOR) {
        return select(items, segment, remainder);
    }

    let mut filters = Vec::new();
    let mut selectors = Vec::new();
    for clause in segment.split(CLAUSE_SEPARATOR) {
        if clause.contains(FILTER_MARKER) {
            filters.push(Filter::parse(clause)?);
        } else if clause.contains(OPTION_SEPARATOR) {
            selectors.push(clause);
        } else {
            return Err(ResolveError::IllegalClause {
                clause: clause.to_string(),
                expression: path.to_string(),
            });
        }
    }

    if selectors.len() > 1 {
        return Err(ResolveError::MultipleSelectors {
            selectors: selectors.join("; "),
            expression: path.to_string(),
        });
    }

    let mut reduced: Vec<&Tree> = items.to_vec();
    for filter in &filters {
        let before = reduced.len();
        let mut kept = Vec::with_capacity(before);
        for element in reduced {
            if filter.matches(element)? {
                kept.push(element);
            }
        }
        debug!(
            "reduced array from {} to {} using [{}{}]",
            before,
            kept.len(),
            filter.field,
            filter.value
        );
        reduced = kept;
    }

    match selectors.first() {
        Some(selector) => {
            if reduced.is_empty() {
                return Ok(None);
            }
            select(&reduced, selector, remainder)
        }
        None => Err(ResolveError::MissingSelector(path.to_string())),
    }
}

/// Picks one element with a `name:option` segment and continues with `remainder`.
fn select(items: &[&Tree], segment: &str, remainder: &str) -> Result<Option<String>, ResolveError> {
    let (name, option) = break_param(segment)?;
    let option = match option {
        Some(option) => option,
        None => return Ok(None),
    };
    let selector = Selector::parse(option).ok_or_else(|| ResolveError::UnknownSelector {
        option: option.to_string(),
        segment: segment.to_string(),
    })?;

    let index = match selector {
        Selector::First => Some(0),
        Selector::Last => Some(items.len() - 1),
        Selector::Random => Some(rand::thread_rng().gen_range(0..items.len())),
        Selector::Earliest | Selector::Latest => collate(items, name, selector)?,
    };

    match index {
        Some(index) => resolve(items[index], remainder),
        None => Ok(None),
    }
}

/// Sorts elements by the string `name` resolves to and returns the chosen index.
///
/// Elements where `name` does not resolve are skipped. Equal values keep the
/// highest index.
fn collate(items: &[&Tree], name: &str, selector: Selector) -> Result<Option<usize>, ResolveError> {
    let mut collation = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        if let Some(value) = resolve(item, name)? {
            collation.insert(value, index);
        }
    }

    let chosen = match selector {
        Selector::Earliest => collation.values().next(),
        _ => collation.values().next_back(),
    };
    Ok(chosen.copied())
}
