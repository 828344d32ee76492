//! Job steps.
//!
//! A step is either a reference to a reusable action with keyed parameters,
//! or a literal command script. The two variants form a closed enum; each
//! serializes through its own derive, selected by tag.

use crate::error::{Error, NameKind, Result};
use crate::naming::ensure_name;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

/// An atomic action within a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Step {
    /// Invoke a reusable external action.
    Action(ActionStep),
    /// Run a literal command script.
    Run(RunStep),
}

impl Step {
    /// The display name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Action(step) => step.name.as_deref(),
            Self::Run(step) => step.name.as_deref(),
        }
    }
}

impl From<ActionStep> for Step {
    fn from(step: ActionStep) -> Self {
        Self::Action(step)
    }
}

impl From<RunStep> for Step {
    fn from(step: RunStep) -> Self {
        Self::Run(step)
    }
}

/// A step that invokes a reusable external action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionStep {
    /// Display name shown in the run log.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Identifier for referencing step outputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Conditional execution expression.
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    condition: Option<String>,

    /// Action reference (e.g. "actions/checkout@v4").
    uses: String,

    /// Keyed action parameters.
    #[serde(rename = "with", skip_serializing_if = "IndexMap::is_empty")]
    with_inputs: IndexMap<String, Value>,

    /// Step environment variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    env: IndexMap<String, String>,
}

impl ActionStep {
    /// Create a step invoking `uses`.
    ///
    /// # Errors
    /// Fails if the action reference is empty.
    pub fn new(uses: impl Into<String>) -> Result<Self> {
        let uses = uses.into();
        if uses.is_empty() {
            return Err(Error::EmptyField {
                entity: "action step",
                field: "uses",
            });
        }
        Ok(Self {
            name: None,
            id: None,
            condition: None,
            uses,
            with_inputs: IndexMap::new(),
            env: IndexMap::new(),
        })
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the step identifier.
    ///
    /// # Errors
    /// Fails if `id` does not match the step identifier rule.
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        ensure_name(NameKind::Step, &id)?;
        self.id = Some(id);
        Ok(self)
    }

    /// Set the execution condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Add a keyed action parameter.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_inputs.insert(key.into(), value.into());
        self
    }

    /// Add a step environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The action reference.
    #[must_use]
    pub fn uses(&self) -> &str {
        &self.uses
    }
}

/// A step that runs a literal command script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunStep {
    /// Display name shown in the run log.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Identifier for referencing step outputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Conditional execution expression.
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    condition: Option<String>,

    /// The command script. Multi-line scripts keep their line breaks.
    run: String,

    /// Shell to run the script with (e.g. "bash", "pwsh").
    #[serde(skip_serializing_if = "Option::is_none")]
    shell: Option<String>,

    /// Working directory for the script.
    #[serde(skip_serializing_if = "Option::is_none")]
    working_directory: Option<String>,

    /// Step environment variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    env: IndexMap<String, String>,
}

impl RunStep {
    /// Create a step running `script`.
    ///
    /// # Errors
    /// Fails if the script is empty.
    pub fn new(script: impl Into<String>) -> Result<Self> {
        let run = script.into();
        if run.is_empty() {
            return Err(Error::EmptyField {
                entity: "run step",
                field: "script",
            });
        }
        Ok(Self {
            name: None,
            id: None,
            condition: None,
            run,
            shell: None,
            working_directory: None,
            env: IndexMap::new(),
        })
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the step identifier.
    ///
    /// # Errors
    /// Fails if `id` does not match the step identifier rule.
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        ensure_name(NameKind::Step, &id)?;
        self.id = Some(id);
        Ok(self)
    }

    /// Set the execution condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Set the shell.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Add a step environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The command script.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_step_serializes_uses_and_with() {
        let step: Step = ActionStep::new("actions/setup-python@v5")
            .unwrap()
            .with_name("Set up Python")
            .with_input("python-version", "3.12")
            .into();

        let yaml = serde_yaml::to_string(&step).unwrap();
        assert!(yaml.contains("name: Set up Python"));
        assert!(yaml.contains("uses: actions/setup-python@v5"));
        assert!(yaml.contains("python-version: '3.12'") || yaml.contains("python-version: 3.12"));
        assert!(!yaml.contains("env:"));
        assert!(!yaml.contains("if:"));
    }

    #[test]
    fn run_step_keeps_literal_line_breaks() {
        let script = "echo one\necho two\n";
        let step: Step = RunStep::new(script).unwrap().into();
        let yaml = serde_yaml::to_string(&step).unwrap();
        assert!(yaml.contains("run: |"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["run"], serde_yaml::Value::String(script.to_string()));
    }

    #[test]
    fn empty_required_fields_fail_at_construction() {
        assert!(ActionStep::new("").is_err());
        assert!(RunStep::new("").is_err());
    }

    #[test]
    fn step_id_is_validated() {
        assert!(RunStep::new("make").unwrap().with_id("build step").is_err());
        assert!(RunStep::new("make").unwrap().with_id("build_step").is_ok());
    }

    #[test]
    fn working_directory_key_is_kebab_case() {
        let step = RunStep::new("ls").unwrap().with_working_directory("src");
        let yaml = serde_yaml::to_string(&step).unwrap();
        assert!(yaml.contains("working-directory: src"));
    }

    #[test]
    fn condition_serializes_as_if() {
        let step = RunStep::new("deploy.sh")
            .unwrap()
            .with_condition("github.event_name == 'release'");
        let yaml = serde_yaml::to_string(&step).unwrap();
        assert!(yaml.starts_with("if:") || yaml.contains("\nif:"));
    }
}
