//! Jobs: named units of execution within a pipeline.

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::step::Step;
use crate::strategy::Strategy;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Permission level for a platform token scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Read-only access.
    Read,
    /// Read and write access.
    Write,
    /// No access.
    None,
}

/// Predecessor job names.
///
/// Serializes as a bare string for exactly one predecessor, otherwise as a
/// sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Needs(Vec<String>);

impl Needs {
    /// Whether no predecessors are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Predecessor names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl Serialize for Needs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let [only] = self.0.as_slice() {
            serializer.serialize_str(only)
        } else {
            self.0.serialize(serializer)
        }
    }
}

/// A unit of execution: a runner label plus an ordered step sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Job {
    /// Runner label (e.g. "ubuntu-latest").
    runs_on: String,

    /// Jobs that must complete before this one.
    #[serde(skip_serializing_if = "Needs::is_empty")]
    needs: Needs,

    /// Conditional execution expression.
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    condition: Option<String>,

    /// Deployment environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<Environment>,

    /// Token permissions for this job.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    permissions: IndexMap<String, PermissionLevel>,

    /// Execution strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<Strategy>,

    /// Job-level environment variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    env: IndexMap<String, String>,

    /// Ordered steps.
    steps: Vec<Step>,
}

impl Job {
    /// Create a job running on the given runner label.
    ///
    /// # Errors
    /// Fails if the runner label is empty.
    pub fn new(runs_on: impl Into<String>) -> Result<Self> {
        let runs_on = runs_on.into();
        if runs_on.is_empty() {
            return Err(Error::EmptyField {
                entity: "job",
                field: "runs-on",
            });
        }
        Ok(Self {
            runs_on,
            needs: Needs::default(),
            condition: None,
            environment: None,
            permissions: IndexMap::new(),
            strategy: None,
            env: IndexMap::new(),
            steps: Vec::new(),
        })
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Declare predecessor jobs. Referential integrity against the pipeline
    /// is checked by the dependency graph, not here.
    #[must_use]
    pub fn needs(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.needs = Needs(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the execution condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Set the deployment environment.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Grant a token permission scope.
    #[must_use]
    pub fn with_permission(mut self, scope: impl Into<String>, level: PermissionLevel) -> Self {
        self.permissions.insert(scope.into(), level);
        self
    }

    /// Set the execution strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Add a job-level environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The runner label.
    #[must_use]
    pub fn runs_on(&self) -> &str {
        &self.runs_on
    }

    /// Predecessor job names in declaration order.
    #[must_use]
    pub fn needed_jobs(&self) -> &[String] {
        self.needs.names()
    }

    /// Ordered steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The execution strategy, if set.
    #[must_use]
    pub fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::RunStep;

    fn run(script: &str) -> Step {
        RunStep::new(script).unwrap().into()
    }

    #[test]
    fn minimal_job_serializes_only_runs_on_and_steps() {
        let job = Job::new("ubuntu-latest").unwrap().step(run("make"));
        let value = serde_yaml::to_value(&job).unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map.len(), 2);
        assert!(map.contains_key("runs-on"));
        assert!(map.contains_key("steps"));
    }

    #[test]
    fn single_predecessor_serializes_as_bare_string() {
        let job = Job::new("ubuntu-latest")
            .unwrap()
            .needs(["build"])
            .step(run("make test"));
        let yaml = serde_yaml::to_string(&job).unwrap();
        assert!(yaml.contains("needs: build\n"));
    }

    #[test]
    fn multiple_predecessors_serialize_as_sequence() {
        let job = Job::new("ubuntu-latest")
            .unwrap()
            .needs(["test", "security"])
            .step(run("make dist"));
        let yaml = serde_yaml::to_string(&job).unwrap();
        assert!(yaml.contains("needs:\n- test\n- security\n"));
    }

    #[test]
    fn permissions_serialize_lowercase() {
        let job = Job::new("ubuntu-latest")
            .unwrap()
            .with_permission("id-token", PermissionLevel::Write)
            .step(run("publish"));
        let yaml = serde_yaml::to_string(&job).unwrap();
        assert!(yaml.contains("id-token: write"));
    }

    #[test]
    fn empty_runner_label_is_rejected() {
        assert!(Job::new("").is_err());
    }
}
