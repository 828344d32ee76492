//! Pipeline entity model for pipewright.
//!
//! This crate holds the typed building blocks a caller composes into a
//! [`Pipeline`]: jobs, steps, triggers, strategies, environments, and
//! secret/variable references. Every constructor validates its invariants at
//! creation time, so a completed model is structurally sound before any
//! emitter sees it. The crate also defines the [`emitter::Emitter`] trait the
//! platform crates implement and the [`compact`](compact::compact) utility
//! that keeps omitted optional fields out of emitted documents.
//!
//! # Example
//!
//! ```
//! use pipewright_core::{Job, Pipeline, RunStep, Trigger};
//!
//! # fn main() -> pipewright_core::Result<()> {
//! let pipeline = Pipeline::builder("ci")
//!     .trigger(Trigger::on_push(["main"]))
//!     .job(
//!         "build",
//!         Job::new("ubuntu-latest")?.step(RunStep::new("cargo build")?),
//!     )?
//!     .finish()?;
//!
//! assert_eq!(pipeline.jobs().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod compact;
pub mod emitter;
pub mod environment;
pub mod error;
pub mod job;
pub mod naming;
pub mod pipeline;
pub mod secrets;
pub mod step;
pub mod strategy;
pub mod trigger;

pub use environment::Environment;
pub use error::{Error, NameKind, Result};
pub use job::{Job, Needs, PermissionLevel};
pub use naming::{is_valid_job_name, is_valid_secret_name, is_valid_step_name};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use secrets::{Secret, Variable};
pub use step::{ActionStep, RunStep, Step};
pub use strategy::{Matrix, Strategy};
pub use trigger::{DispatchInput, Trigger};
