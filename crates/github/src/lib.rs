//! GitHub Actions workflow emitter for pipewright.
//!
//! Turns a [`pipewright_core::Pipeline`] into workflow YAML. Structural
//! checks on `needs` edges run through `pipewright-graph` before emission;
//! the emitted text can be checked again with `pipewright-validator`.
//!
//! # Model to workflow mapping
//!
//! | Model | Workflow YAML |
//! |-------|---------------|
//! | `Pipeline::name` | `name:` |
//! | `Pipeline::triggers` | `on:` (bare label, label sequence, or mapping) |
//! | job key | key under `jobs:` |
//! | `Job::needs` | `needs:` (bare string for one predecessor) |
//! | `Step::Action` | `uses:` + `with:` |
//! | `Step::Run` | `run:` (block scalar for multi-line scripts) |

pub mod emitter;
pub mod templates;

pub use emitter::GitHubActionsEmitter;
