//! Error types for model construction.
//!
//! Every constructor in this crate validates its invariants at creation time
//! and returns one of these variants immediately rather than deferring the
//! failure to emission.

use std::fmt;
use thiserror::Error;

/// Result type for model construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Which identifier rule a name was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Job key in a pipeline (`^[a-zA-Z_][a-zA-Z0-9_-]*$`).
    Job,
    /// Step identifier (`^[a-zA-Z_][a-zA-Z0-9_-]*$`).
    Step,
    /// Secret reference (`^[A-Z][A-Z0-9_]*$`).
    Secret,
    /// Variable reference (`^[A-Z][A-Z0-9_]*$`).
    Variable,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Job => "job",
            Self::Step => "step",
            Self::Secret => "secret",
            Self::Variable => "variable",
        };
        f.write_str(label)
    }
}

/// Errors raised while constructing pipeline entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A name does not match the identifier rule for its kind.
    #[error("invalid {kind} name '{name}'")]
    InvalidName {
        /// The identifier rule that was violated.
        kind: NameKind,
        /// The offending name.
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

    /// A count field was given a value outside its valid range.
    #[error("{entity} field {field} must be at least 1")]
    InvalidCount {
        /// Entity under construction.
        entity: &'static str,
        /// The offending field.
        field: &'static str,
    },

    /// Two jobs were added under the same key.
    #[error("duplicate job key '{key}'")]
    DuplicateJob {
        /// The duplicated key.
        key: String,
    },

    /// A pipeline was finished without any jobs.
    #[error("pipeline '{name}' declares no jobs")]
    EmptyPipeline {
        /// The pipeline name.
        name: String,
    },
}
