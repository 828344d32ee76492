//! Ready-made pipeline templates.
//!
//! Each template builds a complete [`Pipeline`] through the validated
//! builder API. They serve as starting points for common project shapes and
//! as living documentation of the model.

use pipewright_core::secrets::matrix_expr;
use pipewright_core::{
    ActionStep, Environment, Job, Matrix, PermissionLevel, Pipeline, Result, RunStep, Strategy,
    Trigger,
};

fn checkout() -> Result<ActionStep> {
    Ok(ActionStep::new("actions/checkout@v4")?.with_name("Checkout code"))
}

/// CI pipeline for a Python project: lint and test across interpreter
/// versions on every push and pull request to `main`.
pub fn python_ci(versions: &[&str]) -> Result<Pipeline> {
    let matrix = Matrix::new().variable("python_version", versions.iter().copied());

    let test = Job::new("ubuntu-latest")?
        .with_strategy(Strategy::new().with_matrix(matrix))
        .step(checkout()?)
        .step(
            ActionStep::new("actions/setup-python@v5")?
                .with_name(format!("Set up Python {}", matrix_expr("python_version")))
                .with_input("python-version", matrix_expr("python_version")),
        )
        .step(RunStep::new("python -m pip install --upgrade pip")?.with_name("Upgrade pip"))
        .step(RunStep::new("pip install -e .[dev]")?.with_name("Install dependencies"))
        .step(RunStep::new("pytest tests/ --cov")?.with_name("Run tests with coverage"));

    Pipeline::builder("Python CI")
        .trigger(Trigger::on_push(["main"]))
        .trigger(Trigger::on_pull_request(["main"]))
        .job("test", test)?
        .finish()
}

/// CI pipeline for a Node.js project.
pub fn node_ci(versions: &[&str]) -> Result<Pipeline> {
    let matrix = Matrix::new().variable("node_version", versions.iter().copied());

    let test = Job::new("ubuntu-latest")?
        .with_strategy(Strategy::new().with_matrix(matrix))
        .step(checkout()?)
        .step(
            ActionStep::new("actions/setup-node@v4")?
                .with_name(format!("Set up Node {}", matrix_expr("node_version")))
                .with_input("node-version", matrix_expr("node_version"))
                .with_input("cache", "npm"),
        )
        .step(RunStep::new("npm ci")?.with_name("Install dependencies"))
        .step(RunStep::new("npm test")?.with_name("Run tests"));

    Pipeline::builder("Node CI")
        .trigger(Trigger::on_push(["main"]))
        .trigger(Trigger::on_pull_request(["main"]))
        .job("test", test)?
        .finish()
}

/// Build a container image on every push to `main`.
pub fn docker_build(image: &str) -> Result<Pipeline> {
    let build = Job::new("ubuntu-latest")?
        .step(checkout()?)
        .step(
            ActionStep::new("docker/setup-buildx-action@v3")?.with_name("Set up Docker Buildx"),
        )
        .step(
            RunStep::new(format!("docker build -t {image}:latest ."))?
                .with_name("Build image"),
        );

    Pipeline::builder("Docker Build")
        .trigger(Trigger::on_push(["main"]))
        .job("build", build)?
        .finish()
}

/// Build, verify, and publish a package when a release is published.
///
/// Mirrors the publish flow the original project uses for itself: a build
/// job gated by tests, then a publish job bound to a deployment environment
/// with OIDC token permissions.
pub fn release(package_url: &str) -> Result<Pipeline> {
    let test = Job::new("ubuntu-latest")?
        .step(checkout()?)
        .step(RunStep::new("pip install -e .[dev]")?.with_name("Install dependencies"))
        .step(RunStep::new("pytest tests/")?.with_name("Run tests"));

    let build = Job::new("ubuntu-latest")?
        .needs(["test"])
        .step(checkout()?)
        .step(
            RunStep::new("python -m pip install --upgrade pip build twine")?
                .with_name("Install build tools"),
        )
        .step(RunStep::new("python -m build")?.with_name("Build package"))
        .step(RunStep::new("twine check dist/*")?.with_name("Verify package metadata"))
        .step(
            ActionStep::new("actions/upload-artifact@v4")?
                .with_name("Upload build artifacts")
                .with_input("name", "dist")
                .with_input("path", "dist/"),
        );

    let publish = Job::new("ubuntu-latest")?
        .needs(["build"])
        .with_condition("github.event_name == 'release'")
        .with_environment(Environment::new("pypi")?.with_url(package_url))
        .with_permission("id-token", PermissionLevel::Write)
        .step(
            ActionStep::new("actions/download-artifact@v4")?
                .with_name("Download build artifacts")
                .with_input("name", "dist")
                .with_input("path", "dist/"),
        )
        .step(
            ActionStep::new("pypa/gh-action-pypi-publish@release/v1")?
                .with_name("Publish package")
                .with_input("skip-existing", "true")
                .with_input("verify-metadata", "true"),
        );

    Pipeline::builder("Release")
        .trigger(Trigger::on_push(["main"]))
        .trigger(Trigger::on_release(["published"]))
        .job("test", test)?
        .job("build", build)?
        .job("publish", publish)?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::GitHubActionsEmitter;
    use pipewright_core::emitter::Emitter;
    use pipewright_graph::DependencyGraph;
    use pipewright_validator::validate_workflow_yaml;

    #[test]
    fn every_template_emits_a_valid_workflow() {
        let emitter = GitHubActionsEmitter::new();
        let pipelines = [
            python_ci(&["3.11", "3.12"]).unwrap(),
            node_ci(&["20", "22"]).unwrap(),
            docker_build("pipewright/app").unwrap(),
            release("https://pypi.org/p/pipewright").unwrap(),
        ];

        for pipeline in &pipelines {
            let yaml = emitter.emit(pipeline).unwrap();
            let errors = validate_workflow_yaml(&yaml);
            assert!(errors.is_empty(), "{}: {errors:?}", pipeline.name());
        }
    }

    #[test]
    fn release_jobs_order_topologically() {
        let pipeline = release("https://pypi.org/p/pipewright").unwrap();
        let graph = DependencyGraph::from_pipeline(&pipeline).unwrap();
        assert_eq!(
            graph.topological_order().unwrap(),
            ["test", "build", "publish"]
        );
    }

    #[test]
    fn python_ci_exposes_matrix_variable() {
        let pipeline = python_ci(&["3.12"]).unwrap();
        let yaml = GitHubActionsEmitter::new().emit(&pipeline).unwrap();
        assert!(yaml.contains("python_version:"));
        assert!(yaml.contains("${{ matrix.python_version }}"));
    }
}
