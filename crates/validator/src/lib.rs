//! Structural schema validation for emitted CI documents.
//!
//! Validators parse a YAML document and walk its structure, collecting every
//! problem they find instead of stopping at the first one. Text that is not
//! parseable YAML at all yields a single syntax error entry.

pub mod buildspec;
pub mod workflow;

pub use buildspec::validate_buildspec_yaml;
pub use workflow::validate_workflow_yaml;
