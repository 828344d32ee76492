//! Jenkins declarative pipeline emitter for pipewright.
//!
//! Unlike the YAML-based targets, a Jenkinsfile is structured text: order of
//! stages and steps is significant, and nesting is expressed with braces and
//! indentation rather than a data structure. The model here is a closed set
//! of plugin-style steps, each lowering to one fixed Groovy call shape, so
//! every constructible pipeline renders to syntactically valid declarative
//! pipeline text.
//!
//! ```
//! use pipewright_core::emitter::Emitter;
//! use pipewright_jenkins::{Agent, JenkinsEmitter, JenkinsPipeline, Stage, StageStep};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = JenkinsPipeline::new(Agent::Any).stage(
//!     Stage::new("Test")?.step(StageStep::sh("pytest tests/")?),
//! );
//! let text = JenkinsEmitter::new().emit(&pipeline)?;
//! assert!(text.contains("stage('Test')"));
//! # Ok(())
//! # }
//! ```

pub mod emitter;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use emitter::JenkinsEmitter;
pub use error::{Error, Result};
pub use pipeline::{
    Agent, EnvValue, JenkinsPipeline, Parameter, PostActions, Stage, StageStep,
};
