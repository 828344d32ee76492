//! Declarative pipeline text emitter.

use crate::pipeline::{Agent, EnvValue, JenkinsPipeline, Parameter, Stage, StageStep};
use crate::writer::{GroovyWriter, quote, quote_multiline};
use pipewright_core::emitter::{Emitter, EmitterError, EmitterResult};
use tracing::debug;

/// Emits Jenkinsfile text from a [`JenkinsPipeline`].
#[derive(Debug, Clone, Default)]
pub struct JenkinsEmitter;

impl JenkinsEmitter {
    /// Create an emitter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for JenkinsEmitter {
    type Model = JenkinsPipeline;

    fn emit(&self, pipeline: &JenkinsPipeline) -> EmitterResult<String> {
        self.validate(pipeline)?;
        debug!(stages = pipeline.stages().len(), "emitting Jenkinsfile");

        let mut w = GroovyWriter::new();
        w.line("// Generated by pipewright - do not edit manually");
        w.open("pipeline");
        write_agent(&mut w, pipeline.agent());

        if !pipeline.parameters().is_empty() {
            w.open("parameters");
            for parameter in pipeline.parameters() {
                w.line(&render_parameter(parameter));
            }
            w.close();
        }

        if !pipeline.environment().is_empty() {
            w.open("environment");
            for (key, value) in pipeline.environment() {
                let rendered = match value {
                    EnvValue::Literal(value) => quote(value),
                    EnvValue::Credential(id) => format!("credentials({})", quote(id)),
                };
                w.line(&format!("{key} = {rendered}"));
            }
            w.close();
        }

        w.open("stages");
        for stage in pipeline.stages() {
            write_stage(&mut w, stage);
        }
        w.close();

        let post = pipeline.post_actions();
        if !post.is_empty() {
            w.open("post");
            for (condition, steps) in [
                ("always", &post.always),
                ("success", &post.success),
                ("failure", &post.failure),
            ] {
                if steps.is_empty() {
                    continue;
                }
                w.open(condition);
                for step in steps {
                    write_step(&mut w, step);
                }
                w.close();
            }
            w.close();
        }

        w.close();
        Ok(w.finish())
    }

    fn format_name(&self) -> &'static str {
        "jenkins"
    }

    fn file_extension(&self) -> &'static str {
        "groovy"
    }

    fn description(&self) -> &'static str {
        "Jenkins declarative pipeline emitter"
    }

    fn validate(&self, pipeline: &JenkinsPipeline) -> EmitterResult<()> {
        if pipeline.stages().is_empty() {
            return Err(EmitterError::InvalidModel(
                "pipeline declares no stages".to_string(),
            ));
        }
        for stage in pipeline.stages() {
            if stage.steps().is_empty() {
                return Err(EmitterError::InvalidModel(format!(
                    "stage '{}' declares no steps",
                    stage.name()
                )));
            }
        }
        Ok(())
    }
}

fn render_parameter(parameter: &Parameter) -> String {
    match parameter {
        Parameter::String {
            name,
            default,
            description,
        } => format!(
            "string(name: {}, defaultValue: {}, description: {})",
            quote(name),
            quote(default),
            quote(description)
        ),
        Parameter::Boolean {
            name,
            default,
            description,
        } => format!(
            "booleanParam(name: {}, defaultValue: {default}, description: {})",
            quote(name),
            quote(description)
        ),
        Parameter::Choice {
            name,
            choices,
            description,
        } => {
            let choices: Vec<String> = choices.iter().map(|c| quote(c)).collect();
            format!(
                "choice(name: {}, choices: [{}], description: {})",
                quote(name),
                choices.join(", "),
                quote(description)
            )
        }
    }
}

fn write_agent(w: &mut GroovyWriter, agent: &Agent) {
    match agent {
        Agent::Any => w.line("agent any"),
        Agent::Label(label) => {
            w.open("agent");
            w.line(&format!("label {}", quote(label)));
            w.close();
        }
        Agent::Docker { image, args } => {
            w.open("agent");
            w.open("docker");
            w.line(&format!("image {}", quote(image)));
            if let Some(args) = args {
                w.line(&format!("args {}", quote(args)));
            }
            w.close();
            w.close();
        }
    }
}

fn write_stage(w: &mut GroovyWriter, stage: &Stage) {
    w.open(&format!("stage({})", quote(stage.name())));
    w.open("steps");
    for step in stage.steps() {
        write_step(w, step);
    }
    w.close();
    w.close();
}

fn write_step(w: &mut GroovyWriter, step: &StageStep) {
    match step {
        StageStep::Sh(command) => {
            if command.contains('\n') {
                w.line(&format!("sh {}", quote_multiline(command)));
            } else {
                w.line(&format!("sh {}", quote(command)));
            }
        }
        StageStep::Echo(message) => w.line(&format!("echo {}", quote(message))),
        StageStep::Checkout {
            url,
            branch,
            credentials_id,
        } => {
            let mut call = format!("git url: {}", quote(url));
            if let Some(branch) = branch {
                call.push_str(&format!(", branch: {}", quote(branch)));
            }
            if let Some(id) = credentials_id {
                call.push_str(&format!(", credentialsId: {}", quote(id)));
            }
            w.line(&call);
        }
        StageStep::DockerRun { image, command } => {
            w.open("script");
            w.open(&format!("docker.image({}).inside", quote(image)));
            w.line(&format!("sh {}", quote(command)));
            w.close();
            w.close();
        }
        StageStep::SlackNotify { channel, message } => w.line(&format!(
            "slackSend channel: {}, message: {}",
            quote(channel),
            quote(message)
        )),
        StageStep::MailNotify { to, subject, body } => w.line(&format!(
            "mail to: {}, subject: {}, body: {}",
            quote(to),
            quote(subject),
            quote(body)
        )),
        StageStep::ArchiveArtifacts {
            pattern,
            fingerprint,
            allow_empty,
        } => {
            let mut call = format!("archiveArtifacts artifacts: {}", quote(pattern));
            if *fingerprint {
                call.push_str(", fingerprint: true");
            }
            if *allow_empty {
                call.push_str(", allowEmptyArchive: true");
            }
            w.line(&call);
        }
        StageStep::PublishJunit {
            pattern,
            allow_empty_results,
        } => {
            if *allow_empty_results {
                w.line(&format!(
                    "junit testResults: {}, allowEmptyResults: true",
                    quote(pattern)
                ));
            } else {
                w.line(&format!("junit {}", quote(pattern)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Parameter, PostActions, Stage};

    fn sample() -> JenkinsPipeline {
        JenkinsPipeline::new(Agent::Any)
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .env_credential("PYPI_TOKEN", "pypi-token")
            .stage(
                Stage::new("Checkout").unwrap().step(
                    StageStep::checkout("https://example.com/repo.git")
                        .unwrap()
                        .with_branch("main"),
                ),
            )
            .stage(
                Stage::new("Test")
                    .unwrap()
                    .step(StageStep::sh("pytest tests/").unwrap()),
            )
            .post(
                PostActions::new()
                    .always(StageStep::publish_junit("reports/*.xml").unwrap().allow_empty())
                    .failure(
                        StageStep::slack_notify("#ci", "build failed").unwrap(),
                    ),
            )
    }

    #[test]
    fn emits_declarative_skeleton_in_order() {
        let text = JenkinsEmitter::new().emit(&sample()).unwrap();
        assert!(text.starts_with("// Generated by pipewright"));

        let positions: Vec<usize> = [
            "pipeline {",
            "agent any",
            "environment {",
            "PYPI_TOKEN = credentials('pypi-token')",
            "stages {",
            "stage('Checkout')",
            "git url: 'https://example.com/repo.git', branch: 'main'",
            "stage('Test')",
            "sh 'pytest tests/'",
            "post {",
            "always {",
            "junit testResults: 'reports/*.xml', allowEmptyResults: true",
            "failure {",
            "slackSend channel: '#ci', message: 'build failed'",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn balanced_braces() {
        let text = JenkinsEmitter::new().emit(&sample()).unwrap();
        let opens = text.matches('{').count();
        let closes = text.matches('}').count();
        assert_eq!(opens, closes, "{text}");
    }

    #[test]
    fn docker_agent_and_parameters_render() {
        let pipeline = JenkinsPipeline::new(
            Agent::docker("python:3.12").unwrap().with_args("-u root"),
        )
        .parameter(Parameter::string("VERSION", "1.0.0", "release version").unwrap())
        .parameter(Parameter::boolean("DRY_RUN", true, "skip publish").unwrap())
        .parameter(Parameter::choice("TARGET", ["staging", "production"], "").unwrap())
        .stage(
            Stage::new("Build")
                .unwrap()
                .step(StageStep::sh("make").unwrap()),
        );

        let text = JenkinsEmitter::new().emit(&pipeline).unwrap();
        assert!(text.contains("image 'python:3.12'"));
        assert!(text.contains("args '-u root'"));
        assert!(text.contains(
            "string(name: 'VERSION', defaultValue: '1.0.0', description: 'release version')"
        ));
        assert!(text.contains("booleanParam(name: 'DRY_RUN', defaultValue: true, description: 'skip publish')"));
        assert!(text.contains("choice(name: 'TARGET', choices: ['staging', 'production'], description: '')"));
    }

    #[test]
    fn docker_run_step_nests_inside_script_block() {
        let pipeline = JenkinsPipeline::new(Agent::Any).stage(
            Stage::new("Scan")
                .unwrap()
                .step(StageStep::docker_run("aquasec/trivy", "trivy fs .").unwrap()),
        );
        let text = JenkinsEmitter::new().emit(&pipeline).unwrap();
        assert!(text.contains("script {"));
        assert!(text.contains("docker.image('aquasec/trivy').inside {"));
        assert!(text.contains("sh 'trivy fs .'"));
    }

    #[test]
    fn single_quotes_are_escaped() {
        let pipeline = JenkinsPipeline::new(Agent::Any).stage(
            Stage::new("Say")
                .unwrap()
                .step(StageStep::echo("it's done").unwrap()),
        );
        let text = JenkinsEmitter::new().emit(&pipeline).unwrap();
        assert!(text.contains(r"echo 'it\'s done'"), "{text}");
    }

    #[test]
    fn multiline_shell_uses_triple_quotes() {
        let pipeline = JenkinsPipeline::new(Agent::Any).stage(
            Stage::new("Build")
                .unwrap()
                .step(StageStep::sh("set -e\nmake\nmake install").unwrap()),
        );
        let text = JenkinsEmitter::new().emit(&pipeline).unwrap();
        assert!(text.contains("sh '''set -e\nmake\nmake install'''"), "{text}");
    }

    #[test]
    fn empty_pipeline_fails_validation() {
        let err = JenkinsEmitter::new()
            .emit(&JenkinsPipeline::new(Agent::Any))
            .unwrap_err();
        assert!(matches!(err, EmitterError::InvalidModel(_)));
    }

    #[test]
    fn stage_without_steps_fails_validation() {
        let pipeline = JenkinsPipeline::new(Agent::Any).stage(Stage::new("Empty").unwrap());
        let err = JenkinsEmitter::new().emit(&pipeline).unwrap_err();
        assert!(err.to_string().contains("Empty"), "{err}");
    }

    #[test]
    fn emitter_metadata() {
        let emitter = JenkinsEmitter::new();
        assert_eq!(emitter.format_name(), "jenkins");
        assert_eq!(emitter.file_extension(), "groovy");
    }
}
