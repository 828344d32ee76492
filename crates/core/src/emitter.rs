//! Emitter interface shared by the platform crates.
//!
//! Each target platform implements [`Emitter`] for its own model type and
//! produces the platform's native textual configuration. Emitters are pure:
//! they read a completed, immutable model and return a string.

use thiserror::Error;

/// Error types for emitter operations.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// YAML serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The model violates a structural rule of this target.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The model uses a feature this target cannot express.
    #[error("unsupported feature '{feature}' for {emitter} emitter")]
    UnsupportedFeature {
        /// The feature the model asked for.
        feature: String,
        /// The emitter that cannot express it.
        emitter: &'static str,
    },
}

impl From<serde_yaml::Error> for EmitterError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for emitter operations.
pub type EmitterResult<T> = std::result::Result<T, EmitterError>;

/// Trait for CI configuration emitters.
///
/// Implementations transform a completed model into one target platform's
/// native format. Emitters only read; a host application may run several of
/// them over the same model concurrently.
pub trait Emitter: Send + Sync {
    /// The model type this emitter consumes.
    type Model;

    /// Emit a configuration document from the model.
    ///
    /// # Errors
    /// Returns [`EmitterError`] if the model cannot be transformed or
    /// serialized for this target.
    fn emit(&self, model: &Self::Model) -> EmitterResult<String>;

    /// Format identifier for this emitter (e.g. "github", "jenkins").
    fn format_name(&self) -> &'static str;

    /// File extension for output files (e.g. "yml", "groovy").
    fn file_extension(&self) -> &'static str;

    /// Human-readable description of this emitter.
    fn description(&self) -> &'static str {
        "CI configuration emitter"
    }

    /// Validate the model before emission.
    ///
    /// Override to perform target-specific structural checks beyond the
    /// invariants already enforced at construction time.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidModel`] if validation fails.
    fn validate(&self, model: &Self::Model) -> EmitterResult<()> {
        let _ = model;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Emitter for Upper {
        type Model = String;

        fn emit(&self, model: &String) -> EmitterResult<String> {
            Ok(model.to_uppercase())
        }

        fn format_name(&self) -> &'static str {
            "upper"
        }

        fn file_extension(&self) -> &'static str {
            "txt"
        }
    }

    #[test]
    fn trait_defaults() {
        let emitter = Upper;
        let model = "ci".to_string();
        assert_eq!(emitter.emit(&model).unwrap(), "CI");
        assert!(emitter.validate(&model).is_ok());
        assert_eq!(emitter.description(), "CI configuration emitter");
    }

    #[test]
    fn serialization_errors_convert() {
        let err = serde_yaml::from_str::<serde_yaml::Value>("a: [")
            .map(|_| ())
            .unwrap_err();
        let emitter_err: EmitterError = err.into();
        assert!(matches!(emitter_err, EmitterError::Serialization(_)));
    }
}
