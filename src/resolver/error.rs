//! Resolution error types.
//!
//! An ordinary missing key is not an error: it surfaces as `Ok(None)`. The
//! variants below are misuses of the path language (or a miss in strict mode)
//! and end the script.

use std::fmt;

/// Errors raised while resolving a path expression or expanding placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The path continues below a scalar value.
    PastScalar {
        /// Path left over when the scalar was reached
        path: String,
        /// The scalar that was reached
        value: String,
    },

    /// More than one positional/temporal selector in one array traversal.
    MultipleSelectors {
        /// The offending selector clauses, `; `-joined
        selectors: String,
        /// The full expression they belong to
        expression: String,
    },

    /// A `:` option outside of first/last/random/earliest/latest.
    UnknownSelector {
        /// The unrecognized option
        option: String,
        /// The segment it appeared in
        segment: String,
    },

    /// A segment with more than one `:` separator.
    TooManyParts(String),

    /// A `;` clause that is neither a filter (`=`) nor a selector (`:`).
    IllegalClause {
        /// The clause
        clause: String,
        /// The full expression it belongs to
        expression: String,
    },

    /// Filter clauses without a selector to pick a single element.
    MissingSelector(String),

    /// A filter clause with no recognizable comparison operator.
    NoOperator(String),

    /// A placeholder that could not be resolved while in strict mode.
    Unresolved(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::PastScalar { path, value } => write!(
                f,
                "still have non-empty path [{}] for terminal value [{}]",
                path, value
            ),
            ResolveError::MultipleSelectors {
                selectors,
                expression,
            } => write!(
                f,
                "more than one selector: [{}], which is a part of [{}]",
                selectors, expression
            ),
            ResolveError::UnknownSelector { option, segment } => write!(
                f,
                "unknown selector [{}] in [{}]; expected one of first, last, random, earliest, latest",
                option, segment
            ),
            ResolveError::TooManyParts(segment) => {
                write!(f, "too many parts in [{}]", segment)
            }
            ResolveError::IllegalClause { clause, expression } => write!(
                f,
                "illegal clause [{}], which is a part of [{}]",
                clause, expression
            ),
            ResolveError::MissingSelector(expression) => write!(
                f,
                "cannot resolve the condition [{}]: filters need a selector",
                expression
            ),
            ResolveError::NoOperator(clause) => write!(
                f,
                "cannot find an appropriate evaluator for [{}] expression",
                clause
            ),
            ResolveError::Unresolved(key) => write!(f, "unresolved placeholder [{}]", key),
        }
    }
}

impl std::error::Error for ResolveError {}
