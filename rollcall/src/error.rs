//! Widget construction errors.

use thiserror::Error;

/// Errors raised while turning page markup into a widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The element is missing or is not a `<select>`. Transforming the same
    /// element twice ends here too, since the select is gone after the first
    /// pass.
    #[error("element `{id}` is not a select-like control (found {})", .found.as_deref().unwrap_or("nothing"))]
    NotSelectLike {
        id: String,
        /// Tag of the element that was found, if any.
        found: Option<String>,
    },

    /// The element is the tree root and has no parent to be replaced in.
    #[error("element `{0}` has no parent to replace it in")]
    Detached(String),

    #[error("select `{0}` has no options")]
    NoOptions(String),

    /// A pre-rendered dropdown is missing one of its parts.
    #[error("dropdown `{wrapper}` is missing its {part}")]
    MissingPart {
        wrapper: String,
        part: &'static str,
    },
}
