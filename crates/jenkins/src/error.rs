//! Error types for Jenkins pipeline construction.

use thiserror::Error;

/// Result type for Jenkins pipeline construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing Jenkins pipeline entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required field was empty.
    #[error("{entity} requires a non-empty {field}")]
    EmptyField {
        /// Entity under construction.
        entity: &'static str,
        /// The field that must not be empty.
        field: &'static str,
    },

    /// A choice parameter declared no choices.
    #[error("choice parameter '{name}' requires at least one choice")]
    EmptyChoices {
        /// The parameter name.
        name: String,
    },
}
