//! Platform identifier rules.
//!
//! Job keys, step identifiers, and secret/variable names each follow a
//! regular-expression contract. The predicates here are evaluated at
//! construction time by the entity constructors and are also exposed for
//! callers that want to pre-check names.

use crate::error::{Error, NameKind, Result};
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_-]*$").unwrap()
});

static SECRET: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap()
});

/// Check whether `name` is a valid job key.
///
/// Letters or underscore first, then letters, digits, underscore, or hyphen.
#[must_use]
pub fn is_valid_job_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Check whether `name` is a valid step identifier.
///
/// Same rule as job keys.
#[must_use]
pub fn is_valid_step_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Check whether `name` is a valid secret or variable reference.
///
/// Upper-case convention: an upper-case letter first, then upper-case
/// letters, digits, or underscore.
#[must_use]
pub fn is_valid_secret_name(name: &str) -> bool {
    SECRET.is_match(name)
}

/// Validate a name against the rule for `kind`, failing with
/// [`Error::InvalidName`].
pub(crate) fn ensure_name(kind: NameKind, name: &str) -> Result<()> {
    let valid = match kind {
        NameKind::Job | NameKind::Step => IDENTIFIER.is_match(name),
        NameKind::Secret | NameKind::Variable => SECRET.is_match(name),
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}
