//! Execution strategy and build matrix.
//!
//! A matrix holds an open-ended, ordered set of variables (name → values)
//! plus the fixed include/exclude override lists. Variables are declared
//! explicitly rather than discovered by reflection, so emission iterates
//! them deterministically in declaration order.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml::Value;
use std::num::NonZeroU32;

/// A build matrix: ordered variables plus include/exclude overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    variables: IndexMap<String, Vec<Value>>,
    include: Vec<IndexMap<String, Value>>,
    exclude: Vec<IndexMap<String, Value>>,
}

impl Matrix {
    /// An empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a matrix variable with its ordered values.
    ///
    /// Re-declaring a name replaces its values but keeps its position.
    #[must_use]
    pub fn variable(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        self.variables
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Add an include override combination.
    #[must_use]
    pub fn include(mut self, entry: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.include.push(entry.into_iter().collect());
        self
    }

    /// Add an exclude override combination.
    #[must_use]
    pub fn exclude(mut self, entry: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.exclude.push(entry.into_iter().collect());
        self
    }

    /// Declared variables in declaration order.
    #[must_use]
    pub fn variables(&self) -> &IndexMap<String, Vec<Value>> {
        &self.variables
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = self.variables.len()
            + usize::from(!self.include.is_empty())
            + usize::from(!self.exclude.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, values) in &self.variables {
            map.serialize_entry(name, values)?;
        }
        if !self.include.is_empty() {
            map.serialize_entry("include", &self.include)?;
        }
        if !self.exclude.is_empty() {
            map.serialize_entry("exclude", &self.exclude)?;
        }
        map.end()
    }
}

/// Execution strategy for a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Strategy {
    /// Build matrix.
    #[serde(skip_serializing_if = "Option::is_none")]
    matrix: Option<Matrix>,

    /// Cancel remaining matrix jobs when one fails.
    #[serde(rename = "fail-fast", skip_serializing_if = "Option::is_none")]
    fail_fast: Option<bool>,

    /// Maximum number of matrix jobs running at once.
    #[serde(rename = "max-parallel", skip_serializing_if = "Option::is_none")]
    max_parallel: Option<NonZeroU32>,
}

impl Strategy {
    /// An empty strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the build matrix.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Set the fail-fast flag.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = Some(fail_fast);
        self
    }

    /// Set the maximum parallel job count.
    ///
    /// # Errors
    /// Fails if `max_parallel` is zero.
    pub fn with_max_parallel(mut self, max_parallel: u32) -> Result<Self> {
        let Some(count) = NonZeroU32::new(max_parallel) else {
            return Err(Error::InvalidCount {
                entity: "strategy",
                field: "max-parallel",
            });
        };
        self.max_parallel = Some(count);
        Ok(self)
    }

    /// The build matrix, if set.
    #[must_use]
    pub fn matrix(&self) -> Option<&Matrix> {
        self.matrix.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_variable_matrix_emits_only_that_key() {
        let matrix = Matrix::new().variable("python_version", ["3.11", "3.12"]);
        let value = serde_yaml::to_value(&matrix).unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map.len(), 1);
        let versions = map.get("python_version").unwrap().as_sequence().unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0], Value::String("3.11".to_string()));
        assert_eq!(versions[1], Value::String("3.12".to_string()));
        assert!(!map.contains_key("include"));
        assert!(!map.contains_key("exclude"));
    }

    #[test]
    fn variables_keep_declaration_order() {
        let matrix = Matrix::new()
            .variable("os", ["ubuntu-latest", "macos-latest"])
            .variable("arch", ["x64", "arm64"]);
        let yaml = serde_yaml::to_string(&matrix).unwrap();
        let os_at = yaml.find("os:").unwrap();
        let arch_at = yaml.find("arch:").unwrap();
        assert!(os_at < arch_at);
    }

    #[test]
    fn include_and_exclude_serialize_after_variables() {
        let matrix = Matrix::new()
            .variable("os", ["linux"])
            .include([("os".to_string(), Value::String("windows".to_string()))]);
        let yaml = serde_yaml::to_string(&matrix).unwrap();
        assert!(yaml.contains("include:"));
        assert!(!yaml.contains("exclude:"));
        assert!(yaml.find("os:").unwrap() < yaml.find("include:").unwrap());
    }

    #[test]
    fn strategy_keys_are_kebab_case() {
        let strategy = Strategy::new()
            .with_fail_fast(false)
            .with_max_parallel(4)
            .unwrap();
        let yaml = serde_yaml::to_string(&strategy).unwrap();
        assert!(yaml.contains("fail-fast: false"));
        assert!(yaml.contains("max-parallel: 4"));
        assert!(!yaml.contains("matrix"));
    }

    #[test]
    fn zero_max_parallel_is_a_construction_error() {
        let err = Strategy::new().with_max_parallel(0).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCount {
                entity: "strategy",
                field: "max-parallel",
            }
        );
    }

    #[test]
    fn empty_strategy_serializes_to_empty_mapping() {
        let value = serde_yaml::to_value(Strategy::new()).unwrap();
        assert!(value.as_mapping().unwrap().is_empty());
    }
}
