//! Deployment environment descriptors.

use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A deployment-target descriptor attached to a job.
///
/// Serializes to a bare string when only the name is set, otherwise to a
/// `{name, url}` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    name: String,
    url: Option<String>,
}

impl Environment {
    /// Create an environment with the given name.
    ///
    /// # Errors
    /// Fails if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyField {
                entity: "environment",
                field: "name",
            });
        }
        Ok(Self { name, url: None })
    }

    /// Attach the deployment URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The environment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The deployment URL, if set.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.url {
            None => serializer.serialize_str(&self.name),
            Some(url) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", &self.name)?;
                map.serialize_entry("url", url)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only_serializes_to_string() {
        let env = Environment::new("production").unwrap();
        let yaml = serde_yaml::to_string(&env).unwrap();
        assert_eq!(yaml, "production\n");
    }

    #[test]
    fn url_switches_to_mapping() {
        let env = Environment::new("pypi")
            .unwrap()
            .with_url("https://pypi.org/p/pipewright");
        let yaml = serde_yaml::to_string(&env).unwrap();
        assert_eq!(yaml, "name: pypi\nurl: https://pypi.org/p/pipewright\n");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(Environment::new("").is_err());
    }
}
