//! GitHub Actions workflow emitter.
//!
//! Transforms a completed [`Pipeline`] into workflow YAML suitable for
//! `.github/workflows/`. The emitter only reads the model; structural
//! soundness of `needs` edges is checked through the dependency graph before
//! anything is serialized.

use pipewright_core::compact::compact;
use pipewright_core::emitter::{Emitter, EmitterError, EmitterResult};
use pipewright_core::{Pipeline, Trigger};
use pipewright_graph::DependencyGraph;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Emits GitHub Actions workflow YAML from a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct GitHubActionsEmitter {
    /// Prepend a generated-file header comment.
    pub header: bool,
}

impl Default for GitHubActionsEmitter {
    fn default() -> Self {
        Self { header: true }
    }
}

impl GitHubActionsEmitter {
    /// Create an emitter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable the generated-file header comment.
    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    /// Assemble the workflow `on` value.
    ///
    /// A single bare trigger becomes the scalar label; an all-bare set
    /// becomes a label sequence; any filtered trigger switches the whole
    /// value to a label-keyed mapping, in which bare triggers contribute an
    /// empty mapping under their label.
    fn triggers_value(triggers: &[Trigger]) -> EmitterResult<Value> {
        if let [only] = triggers
            && only.is_bare()
        {
            return Ok(Value::String(only.label().to_string()));
        }

        if triggers.iter().all(Trigger::is_bare) {
            return Ok(Value::Sequence(
                triggers
                    .iter()
                    .map(|t| Value::String(t.label().to_string()))
                    .collect(),
            ));
        }

        let mut map = Mapping::new();
        for trigger in triggers {
            let payload = if trigger.is_bare() {
                Value::Mapping(Mapping::new())
            } else {
                trigger.filter_value()?
            };
            map.insert(Value::String(trigger.label().to_string()), payload);
        }
        Ok(Value::Mapping(map))
    }

    /// Build the full workflow document as a YAML value.
    fn document(pipeline: &Pipeline) -> EmitterResult<Value> {
        let mut root = Mapping::new();
        root.insert(
            Value::String("name".to_string()),
            Value::String(pipeline.name().to_string()),
        );
        if !pipeline.triggers().is_empty() {
            root.insert(
                Value::String("on".to_string()),
                Self::triggers_value(pipeline.triggers())?,
            );
        }
        if !pipeline.permissions().is_empty() {
            root.insert(
                Value::String("permissions".to_string()),
                serde_yaml::to_value(pipeline.permissions())?,
            );
        }
        if !pipeline.env().is_empty() {
            root.insert(
                Value::String("env".to_string()),
                serde_yaml::to_value(pipeline.env())?,
            );
        }
        root.insert(
            Value::String("jobs".to_string()),
            serde_yaml::to_value(pipeline.jobs())?,
        );

        // Bare triggers are the one place an intentionally empty mapping is
        // meaningful, so compaction runs before they are inserted back.
        let on_key = Value::String("on".to_string());
        let on = root.remove(&on_key);
        let mut compacted = match compact(Value::Mapping(root)) {
            Value::Mapping(map) => map,
            other => return Err(EmitterError::Serialization(format!(
                "workflow document compacted to a non-mapping value: {other:?}"
            ))),
        };
        if let Some(on) = on {
            compacted.insert(on_key, on);
        }

        // Restore key order: name, on, permissions, env, jobs.
        let mut ordered = Mapping::new();
        for key in ["name", "on", "permissions", "env", "jobs"] {
            let key = Value::String(key.to_string());
            if let Some(value) = compacted.remove(&key) {
                ordered.insert(key, value);
            }
        }
        Ok(Value::Mapping(ordered))
    }
}

impl Emitter for GitHubActionsEmitter {
    type Model = Pipeline;

    fn emit(&self, pipeline: &Pipeline) -> EmitterResult<String> {
        self.validate(pipeline)?;
        debug!(pipeline = %pipeline.name(), "emitting GitHub Actions workflow");

        let document = Self::document(pipeline)?;
        let yaml = serde_yaml::to_string(&document)?;
        if self.header {
            Ok(format!(
                "# Generated by pipewright - do not edit manually\n{yaml}"
            ))
        } else {
            Ok(yaml)
        }
    }

    fn format_name(&self) -> &'static str {
        "github"
    }

    fn file_extension(&self) -> &'static str {
        "yml"
    }

    fn description(&self) -> &'static str {
        "GitHub Actions workflow emitter"
    }

    fn validate(&self, pipeline: &Pipeline) -> EmitterResult<()> {
        for (key, job) in pipeline.jobs() {
            if job.steps().is_empty() {
                return Err(EmitterError::InvalidModel(format!(
                    "job '{key}' declares no steps"
                )));
            }
        }

        let mut seen = Vec::new();
        for trigger in pipeline.triggers() {
            let label = trigger.label();
            if seen.contains(&label) {
                return Err(EmitterError::InvalidModel(format!(
                    "duplicate trigger '{label}'"
                )));
            }
            seen.push(label);
        }

        let graph = DependencyGraph::from_pipeline(pipeline)
            .map_err(|e| EmitterError::InvalidModel(e.to_string()))?;
        graph
            .topological_order()
            .map_err(|e| EmitterError::InvalidModel(e.to_string()))?;
        Ok(())
    }
}
