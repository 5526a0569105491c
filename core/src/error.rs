//! Validation failures for client-supplied input.
//!
//! Every variant maps to a 400 response on the server; the `Display` text is
//! sent back verbatim as the response body.

use thiserror::Error;

/// Input that cannot be turned into a valid todo operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The body was not JSON, or did not match the expected shape.
    #[error("malformed JSON body: {0}")]
    MalformedJson(String),

    /// `title` was missing, empty, or only whitespace.
    #[error("title is required")]
    EmptyTitle,

    /// The path segment that should hold the todo id is not an integer.
    #[error("invalid todo id: {0:?}")]
    InvalidId(String),
}
