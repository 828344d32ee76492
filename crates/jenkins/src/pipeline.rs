//! Jenkins declarative pipeline model.
//!
//! Every entity is validated at construction, so a value that exists can be
//! emitted. Stage and step order is significant and preserved exactly as
//! declared.

use crate::error::{Error, Result};

/// Where the pipeline (or a stage) runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Agent {
    /// Any available executor.
    Any,
    /// An executor carrying the given label.
    Label(String),
    /// A Docker container agent.
    Docker {
        /// Container image to run in.
        image: String,
        /// Extra `docker run` arguments.
        args: Option<String>,
    },
}

impl Agent {
    /// Label agent. Fails on an empty label.
    pub fn label(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "agent",
                field: "label",
            });
        }
        Ok(Self::Label(label))
    }

    /// Docker agent. Fails on an empty image.
    pub fn docker(image: impl Into<String>) -> Result<Self> {
        let image = image.into();
        if image.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "agent",
                field: "image",
            });
        }
        Ok(Self::Docker { image, args: None })
    }

    /// Attach `docker run` arguments to a Docker agent. No-op for other agents.
    #[must_use]
    pub fn with_args(self, args: impl Into<String>) -> Self {
        match self {
            Self::Docker { image, .. } => Self::Docker {
                image,
                args: Some(args.into()),
            },
            other => other,
        }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::Any
    }
}

/// A single step inside a stage or post block.
///
/// Each variant lowers to one fixed Groovy call shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStep {
    /// Shell command (`sh`).
    Sh(String),
    /// Console message (`echo`).
    Echo(String),
    /// Git checkout (`git url: ..., branch: ...`).
    Checkout {
        /// Repository URL.
        url: String,
        /// Branch to check out.
        branch: Option<String>,
        /// Jenkins credentials id for the clone.
        credentials_id: Option<String>,
    },
    /// Run a command inside a container (`docker.image(...).inside`).
    DockerRun {
        /// Container image.
        image: String,
        /// Command executed inside the container.
        command: String,
    },
    /// Slack notification (`slackSend`).
    SlackNotify {
        /// Channel, e.g. `#ci`.
        channel: String,
        /// Message body.
        message: String,
    },
    /// Mail notification (`mail`).
    MailNotify {
        /// Recipient address.
        to: String,
        /// Subject line.
        subject: String,
        /// Message body.
        body: String,
    },
    /// Artifact archiving (`archiveArtifacts`).
    ArchiveArtifacts {
        /// Glob pattern of files to archive.
        pattern: String,
        /// Record file fingerprints.
        fingerprint: bool,
        /// Do not fail when nothing matches.
        allow_empty: bool,
    },
    /// JUnit test report publishing (`junit`).
    PublishJunit {
        /// Glob pattern of report files.
        pattern: String,
        /// Do not fail when no reports match.
        allow_empty_results: bool,
    },
}

impl StageStep {
    /// Shell step. Fails on an empty command.
    pub fn sh(command: impl Into<String>) -> Result<Self> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "sh step",
                field: "command",
            });
        }
        Ok(Self::Sh(command))
    }

    /// Echo step. Fails on an empty message.
    pub fn echo(message: impl Into<String>) -> Result<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "echo step",
                field: "message",
            });
        }
        Ok(Self::Echo(message))
    }

    /// Git checkout step. Fails on an empty URL.
    pub fn checkout(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "checkout step",
                field: "url",
            });
        }
        Ok(Self::Checkout {
            url,
            branch: None,
            credentials_id: None,
        })
    }

    /// Set the branch on a checkout step. No-op for other steps.
    #[must_use]
    pub fn with_branch(self, branch: impl Into<String>) -> Self {
        match self {
            Self::Checkout {
                url,
                credentials_id,
                ..
            } => Self::Checkout {
                url,
                branch: Some(branch.into()),
                credentials_id,
            },
            other => other,
        }
    }

    /// Set the credentials id on a checkout step. No-op for other steps.
    #[must_use]
    pub fn with_credentials(self, id: impl Into<String>) -> Self {
        match self {
            Self::Checkout { url, branch, .. } => Self::Checkout {
                url,
                branch,
                credentials_id: Some(id.into()),
            },
            other => other,
        }
    }

    /// Container run step. Fails on an empty image or command.
    pub fn docker_run(image: impl Into<String>, command: impl Into<String>) -> Result<Self> {
        let image = image.into();
        let command = command.into();
        if image.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "docker step",
                field: "image",
            });
        }
        if command.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "docker step",
                field: "command",
            });
        }
        Ok(Self::DockerRun { image, command })
    }

    /// Slack notification step. Fails on an empty channel or message.
    pub fn slack_notify(channel: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        let channel = channel.into();
        let message = message.into();
        if channel.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "slack step",
                field: "channel",
            });
        }
        if message.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "slack step",
                field: "message",
            });
        }
        Ok(Self::SlackNotify { channel, message })
    }

    /// Mail notification step. Fails on an empty recipient or subject.
    pub fn mail_notify(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self> {
        let to = to.into();
        let subject = subject.into();
        if to.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "mail step",
                field: "to",
            });
        }
        if subject.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "mail step",
                field: "subject",
            });
        }
        Ok(Self::MailNotify {
            to,
            subject,
            body: body.into(),
        })
    }

    /// Artifact archiving step. Fails on an empty pattern.
    pub fn archive_artifacts(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "archive step",
                field: "pattern",
            });
        }
        Ok(Self::ArchiveArtifacts {
            pattern,
            fingerprint: false,
            allow_empty: false,
        })
    }

    /// Record fingerprints on an archive step. No-op for other steps.
    #[must_use]
    pub fn with_fingerprint(self) -> Self {
        match self {
            Self::ArchiveArtifacts {
                pattern,
                allow_empty,
                ..
            } => Self::ArchiveArtifacts {
                pattern,
                fingerprint: true,
                allow_empty,
            },
            other => other,
        }
    }

    /// Tolerate empty matches on an archive or junit step. No-op otherwise.
    #[must_use]
    pub fn allow_empty(self) -> Self {
        match self {
            Self::ArchiveArtifacts {
                pattern,
                fingerprint,
                ..
            } => Self::ArchiveArtifacts {
                pattern,
                fingerprint,
                allow_empty: true,
            },
            Self::PublishJunit { pattern, .. } => Self::PublishJunit {
                pattern,
                allow_empty_results: true,
            },
            other => other,
        }
    }

    /// JUnit report step. Fails on an empty pattern.
    pub fn publish_junit(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "junit step",
                field: "pattern",
            });
        }
        Ok(Self::PublishJunit {
            pattern,
            allow_empty_results: false,
        })
    }
}

/// A named stage holding an ordered step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    name: String,
    steps: Vec<StageStep>,
}

impl Stage {
    /// Create a stage. Fails on an empty name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyField {
                entity: "stage",
                field: "name",
            });
        }
        Ok(Self {
            name,
            steps: Vec::new(),
        })
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: StageStep) -> Self {
        self.steps.push(step);
        self
    }

    /// The stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The steps in declaration order.
    #[must_use]
    pub fn steps(&self) -> &[StageStep] {
        &self.steps
    }
}

/// A build parameter exposed in the Jenkins UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Free-text parameter.
    String {
        /// Parameter name.
        name: String,
        /// Default value.
        default: String,
        /// UI description.
        description: String,
    },
    /// Checkbox parameter.
    Boolean {
        /// Parameter name.
        name: String,
        /// Default value.
        default: bool,
        /// UI description.
        description: String,
    },
    /// Drop-down parameter; the first choice is the default.
    Choice {
        /// Parameter name.
        name: String,
        /// Selectable values.
        choices: Vec<String>,
        /// UI description.
        description: String,
    },
}

impl Parameter {
    /// String parameter. Fails on an empty name.
    pub fn string(
        name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let name = non_empty_name(name)?;
        Ok(Self::String {
            name,
            default: default.into(),
            description: description.into(),
        })
    }

    /// Boolean parameter. Fails on an empty name.
    pub fn boolean(
        name: impl Into<String>,
        default: bool,
        description: impl Into<String>,
    ) -> Result<Self> {
        let name = non_empty_name(name)?;
        Ok(Self::Boolean {
            name,
            default,
            description: description.into(),
        })
    }

    /// Choice parameter. Fails on an empty name or empty choice list.
    pub fn choice<I, S>(
        name: impl Into<String>,
        choices: I,
        description: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = non_empty_name(name)?;
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        if choices.is_empty() {
            return Err(Error::EmptyChoices { name });
        }
        Ok(Self::Choice {
            name,
            choices,
            description: description.into(),
        })
    }
}

fn non_empty_name(name: impl Into<String>) -> Result<String> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(Error::EmptyField {
            entity: "parameter",
            field: "name",
        });
    }
    Ok(name)
}

/// The value side of an `environment` entry.
///
/// Credential entries reference a Jenkins credentials id; the secret value
/// itself never appears in the model or the emitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// A literal value, emitted as a quoted string.
    Literal(String),
    /// A `credentials('id')` reference.
    Credential(String),
}

/// Steps to run after the stages complete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostActions {
    /// Steps that run regardless of outcome.
    pub always: Vec<StageStep>,
    /// Steps that run only on success.
    pub success: Vec<StageStep>,
    /// Steps that run only on failure.
    pub failure: Vec<StageStep>,
}

impl PostActions {
    /// Empty post block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an always step.
    #[must_use]
    pub fn always(mut self, step: StageStep) -> Self {
        self.always.push(step);
        self
    }

    /// Append a success step.
    #[must_use]
    pub fn success(mut self, step: StageStep) -> Self {
        self.success.push(step);
        self
    }

    /// Append a failure step.
    #[must_use]
    pub fn failure(mut self, step: StageStep) -> Self {
        self.failure.push(step);
        self
    }

    /// True when no condition holds any step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.always.is_empty() && self.success.is_empty() && self.failure.is_empty()
    }
}

/// A complete declarative pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JenkinsPipeline {
    agent: Agent,
    parameters: Vec<Parameter>,
    environment: Vec<(String, EnvValue)>,
    stages: Vec<Stage>,
    post: PostActions,
}

impl JenkinsPipeline {
    /// Start a pipeline on the given agent.
    #[must_use]
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            parameters: Vec::new(),
            environment: Vec::new(),
            stages: Vec::new(),
            post: PostActions::new(),
        }
    }

    /// Append a build parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set an environment entry to a literal value.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment
            .push((key.into(), EnvValue::Literal(value.into())));
        self
    }

    /// Set an environment entry to a credentials reference.
    #[must_use]
    pub fn env_credential(mut self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.environment
            .push((key.into(), EnvValue::Credential(id.into())));
        self
    }

    /// Append a stage.
    #[must_use]
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Set the post block.
    #[must_use]
    pub fn post(mut self, post: PostActions) -> Self {
        self.post = post;
        self
    }

    /// The agent.
    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Environment entries in declaration order.
    #[must_use]
    pub fn environment(&self) -> &[(String, EnvValue)] {
        &self.environment
    }

    /// Stages in declaration order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The post block.
    #[must_use]
    pub fn post_actions(&self) -> &PostActions {
        &self.post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_fields_are_rejected() {
        assert!(Agent::label("  ").is_err());
        assert!(Agent::docker("").is_err());
        assert!(StageStep::sh("").is_err());
        assert!(StageStep::checkout("").is_err());
        assert!(StageStep::docker_run("python:3.12", " ").is_err());
        assert!(Stage::new("").is_err());
        assert!(Parameter::string("", "x", "").is_err());
    }

    #[test]
    fn choice_parameter_needs_choices() {
        let err = Parameter::choice("target", Vec::<String>::new(), "").unwrap_err();
        assert_eq!(
            err,
            Error::EmptyChoices {
                name: "target".to_string()
            }
        );
    }

    #[test]
    fn checkout_builders_fill_optional_fields() {
        let step = StageStep::checkout("https://example.com/repo.git")
            .unwrap()
            .with_branch("main")
            .with_credentials("repo-key");
        let StageStep::Checkout {
            branch,
            credentials_id,
            ..
        } = step
        else {
            panic!("expected checkout");
        };
        assert_eq!(branch.as_deref(), Some("main"));
        assert_eq!(credentials_id.as_deref(), Some("repo-key"));
    }

    #[test]
    fn stage_preserves_step_order() {
        let stage = Stage::new("Build")
            .unwrap()
            .step(StageStep::sh("make").unwrap())
            .step(StageStep::echo("done").unwrap());
        assert_eq!(stage.steps().len(), 2);
        assert!(matches!(stage.steps()[0], StageStep::Sh(_)));
        assert!(matches!(stage.steps()[1], StageStep::Echo(_)));
    }
}
