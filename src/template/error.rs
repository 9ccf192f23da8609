//! Error types for template construction and rendering.

use thiserror::Error;

/// Errors arising from parsing or rendering a [`Template`](super::Template).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A substitution segment failed when evaluated against a version.
    #[error("substitution `{label}` failed: {reason}")]
    Substitution {
        /// Label of the failing substitution.
        label: String,
        /// Description of the failure.
        reason: String,
    },

    /// A placeholder named something the parser does not recognise.
    #[error("unknown placeholder `{{{name}}}`; expected one of: {expected}")]
    UnknownPlaceholder {
        /// The placeholder name between the braces.
        name: String,
        /// Comma-separated list of accepted placeholder names.
        expected: String,
    },

    /// An opening brace was never closed.
    #[error("unclosed `{{` at byte offset {offset}")]
    Unclosed {
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// A closing brace appeared without a matching opening brace.
    #[error("unmatched `}}` at byte offset {offset}; write `}}}}` for a literal brace")]
    UnmatchedClose {
        /// Byte offset of the stray closing brace.
        offset: usize,
    },
}

/// Result type alias using [`TemplateError`].
pub type Result<T> = std::result::Result<T, TemplateError>;
