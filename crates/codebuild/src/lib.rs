//! AWS CodeBuild buildspec emitter for pipewright.
//!
//! Models a buildspec as a schema version plus a closed set of ordered
//! phases with optional artifacts, cache, and env blocks, then emits it as
//! YAML. Unknown phase names are rejected at construction rather than passed
//! through.

pub mod emitter;
pub mod error;
pub mod spec;

pub use emitter::CodeBuildEmitter;
pub use error::{Error, Result};
pub use spec::{
    BUILDSPEC_VERSION, BuildArtifacts, BuildCache, BuildEnv, BuildPhase, BuildSpec, PhaseKind,
};
