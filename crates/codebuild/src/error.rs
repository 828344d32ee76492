//! Error types for buildspec construction.

use thiserror::Error;

/// Result type for buildspec construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing buildspec entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A phase name outside the closed phase enumeration.
    #[error("unknown build phase '{name}'")]
    UnknownPhase {
        /// The rejected name.
        name: String,
    },

    /// A required field was empty.
    #[error("{entity} requires a non-empty {field}")]
    EmptyField {
        /// Entity under construction.
        entity: &'static str,
        /// The field that must not be empty.
        field: &'static str,
    },
}
