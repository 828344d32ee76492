//! Secret and variable references.
//!
//! Secrets and variables are references into the platform's managed store.
//! They carry a validated name and nothing else; the value never enters the
//! model. `expr()` renders the interpolation the platform substitutes at run
//! time, which emitters pass through as an opaque string.

use crate::error::{NameKind, Result};
use crate::naming::ensure_name;
use std::fmt;

/// A reference to a platform-managed secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    name: String,
}

impl Secret {
    /// Create a secret reference.
    ///
    /// # Errors
    /// Fails if the name does not match `^[A-Z][A-Z0-9_]*$`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        ensure_name(NameKind::Secret, &name)?;
        Ok(Self { name })
    }

    /// The secret name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The interpolation expression for this secret.
    #[must_use]
    pub fn expr(&self) -> String {
        format!("${{{{ secrets.{} }}}}", self.name)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr())
    }
}

/// A reference to a platform-managed configuration variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Create a variable reference.
    ///
    /// # Errors
    /// Fails if the name does not match `^[A-Z][A-Z0-9_]*$`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        ensure_name(NameKind::Variable, &name)?;
        Ok(Self { name })
    }

    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The interpolation expression for this variable.
    #[must_use]
    pub fn expr(&self) -> String {
        format!("${{{{ vars.{} }}}}", self.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr())
    }
}

/// The interpolation expression for a matrix variable.
///
/// Emitters do not interpret these; they are opaque strings the platform
/// resolves per matrix combination.
#[must_use]
pub fn matrix_expr(variable: &str) -> String {
    format!("${{{{ matrix.{variable} }}}}")
}

/// The interpolation expression for an event-context field.
#[must_use]
pub fn github_expr(field: &str) -> String {
    format!("${{{{ github.{field} }}}}")
}
