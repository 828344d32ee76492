//! The pipeline root entity and its builder.
//!
//! A pipeline is built incrementally through [`PipelineBuilder`] and becomes
//! visible only as a completed, immutable [`Pipeline`] when `finish()`
//! succeeds. Emitters receive it read-only.

use crate::error::{Error, NameKind, Result};
use crate::job::{Job, PermissionLevel};
use crate::naming::ensure_name;
use crate::trigger::Trigger;
use indexmap::IndexMap;
use tracing::debug;

/// The root entity describing one complete CI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    name: String,
    triggers: Vec<Trigger>,
    env: IndexMap<String, String>,
    permissions: IndexMap<String, PermissionLevel>,
    jobs: IndexMap<String, Job>,
}

impl Pipeline {
    /// Start building a pipeline with the given display name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder {
            name: name.into(),
            triggers: Vec::new(),
            env: IndexMap::new(),
            permissions: IndexMap::new(),
            jobs: IndexMap::new(),
        }
    }

    /// The pipeline display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared triggers in declaration order.
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Global environment variables.
    #[must_use]
    pub fn env(&self) -> &IndexMap<String, String> {
        &self.env
    }

    /// Global token permissions.
    #[must_use]
    pub fn permissions(&self) -> &IndexMap<String, PermissionLevel> {
        &self.permissions
    }

    /// Jobs keyed by name, in declaration order.
    #[must_use]
    pub fn jobs(&self) -> &IndexMap<String, Job> {
        &self.jobs
    }
}

/// Incremental builder for [`Pipeline`].
///
/// Methods consume and return the builder; the ones that can violate an
/// invariant return `Result` and fail at the point of the bad call.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    triggers: Vec<Trigger>,
    env: IndexMap<String, String>,
    permissions: IndexMap<String, PermissionLevel>,
    jobs: IndexMap<String, Job>,
}

impl PipelineBuilder {
    /// Add a trigger.
    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Add a global environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Grant a global token permission scope.
    #[must_use]
    pub fn permission(mut self, scope: impl Into<String>, level: PermissionLevel) -> Self {
        self.permissions.insert(scope.into(), level);
        self
    }

    /// Add a job under `key`.
    ///
    /// # Errors
    /// Fails if `key` is not a valid job identifier or is already taken.
    pub fn job(mut self, key: impl Into<String>, job: Job) -> Result<Self> {
        let key = key.into();
        ensure_name(NameKind::Job, &key)?;
        if self.jobs.contains_key(&key) {
            return Err(Error::DuplicateJob { key });
        }
        self.jobs.insert(key, job);
        Ok(self)
    }

    /// Complete the build, producing an immutable pipeline.
    ///
    /// # Errors
    /// Fails if the name is empty or no job was added.
    pub fn finish(self) -> Result<Pipeline> {
        if self.name.is_empty() {
            return Err(Error::EmptyField {
                entity: "pipeline",
                field: "name",
            });
        }
        if self.jobs.is_empty() {
            return Err(Error::EmptyPipeline { name: self.name });
        }
        debug!(
            pipeline = %self.name,
            jobs = self.jobs.len(),
            triggers = self.triggers.len(),
            "completed pipeline model"
        );
        Ok(Pipeline {
            name: self.name,
            triggers: self.triggers,
            env: self.env,
            permissions: self.permissions,
            jobs: self.jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::RunStep;
    use crate::trigger::Trigger;

    fn job() -> Job {
        Job::new("ubuntu-latest")
            .unwrap()
            .step(RunStep::new("make").unwrap())
    }

    #[test]
    fn builder_produces_pipeline_in_declaration_order() {
        let pipeline = Pipeline::builder("ci")
            .trigger(Trigger::on_push(["main"]))
            .job("build", job())
            .unwrap()
            .job("test", job())
            .unwrap()
            .finish()
            .unwrap();

        let keys: Vec<&String> = pipeline.jobs().keys().collect();
        assert_eq!(keys, ["build", "test"]);
        assert_eq!(pipeline.name(), "ci");
        assert_eq!(pipeline.triggers().len(), 1);
    }

    #[test]
    fn invalid_job_key_fails_immediately() {
        let err = Pipeline::builder("ci").job("1st-job", job()).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn duplicate_job_key_fails_immediately() {
        let err = Pipeline::builder("ci")
            .job("build", job())
            .unwrap()
            .job("build", job())
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateJob {
                key: "build".to_string(),
            }
        );
    }

    #[test]
    fn pipeline_requires_at_least_one_job() {
        let err = Pipeline::builder("ci").finish().unwrap_err();
        assert_eq!(
            err,
            Error::EmptyPipeline {
                name: "ci".to_string(),
            }
        );
    }

    #[test]
    fn pipeline_requires_a_name() {
        let err = Pipeline::builder("").job("build", job()).unwrap().finish();
        assert!(err.is_err());
    }
}
