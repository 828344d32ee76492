//! Buildspec YAML emitter.

use crate::spec::BuildSpec;
use pipewright_core::emitter::{Emitter, EmitterError, EmitterResult};
use tracing::debug;

/// Emits CodeBuild buildspec YAML from a [`BuildSpec`].
#[derive(Debug, Clone, Default)]
pub struct CodeBuildEmitter;

impl CodeBuildEmitter {
    /// Create an emitter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for CodeBuildEmitter {
    type Model = BuildSpec;

    fn emit(&self, spec: &BuildSpec) -> EmitterResult<String> {
        self.validate(spec)?;
        debug!(phases = spec.phases().len(), "emitting buildspec");
        let yaml = serde_yaml::to_string(spec)?;
        Ok(format!(
            "# Generated by pipewright - do not edit manually\n{yaml}"
        ))
    }

    fn format_name(&self) -> &'static str {
        "codebuild"
    }

    fn file_extension(&self) -> &'static str {
        "yml"
    }

    fn description(&self) -> &'static str {
        "AWS CodeBuild buildspec emitter"
    }

    fn validate(&self, spec: &BuildSpec) -> EmitterResult<()> {
        if spec.phases().is_empty() {
            return Err(EmitterError::InvalidModel(
                "buildspec declares no phases".to_string(),
            ));
        }
        Ok(())
    }
}
