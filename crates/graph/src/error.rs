//! Error types for dependency graph operations.

use thiserror::Error;

/// Result type for dependency graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while deriving or ordering the job dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// One or more `needs` entries reference jobs not declared in the
    /// pipeline. All offenders are collected before failing.
    #[error("missing dependencies: {}", format_missing(missing))]
    MissingDependencies {
        /// (job, missing predecessor) pairs in declaration order.
        missing: Vec<(String, String)>,
    },

    /// The `needs` edges form a cycle.
    #[error("dependency cycle detected: {path}")]
    CycleDetected {
        /// A cycle path in `a -> b -> a` form.
        path: String,
    },
}

fn format_missing(missing: &[(String, String)]) -> String {
    missing
        .iter()
        .map(|(job, dep)| format!("job '{job}' needs undeclared job '{dep}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependencies_name_every_offender() {
        let err = Error::MissingDependencies {
            missing: vec![
                ("deploy".to_string(), "build".to_string()),
                ("deploy".to_string(), "test".to_string()),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("job 'deploy' needs undeclared job 'build'"));
        assert!(text.contains("job 'deploy' needs undeclared job 'test'"));
    }

    #[test]
    fn cycle_error_carries_path() {
        let err = Error::CycleDetected {
            path: "a -> b -> a".to_string(),
        };
        assert_eq!(err.to_string(), "dependency cycle detected: a -> b -> a");
    }
}
