//! Buildspec model types.
//!
//! A buildspec is a schema version plus up to four named phases in a fixed
//! canonical order, with optional artifacts, cache, and environment blocks.
//! The phase set is a closed enumeration; an unknown phase name is rejected
//! at construction instead of being passed through to the platform.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The buildspec schema version this emitter targets.
pub const BUILDSPEC_VERSION: &str = "0.2";

/// The closed set of build phases, in canonical execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Install runtimes and tooling.
    Install,
    /// Sign in to services, install dependencies.
    PreBuild,
    /// Run the build commands.
    Build,
    /// Package artifacts, push images, notify.
    PostBuild,
}

impl PhaseKind {
    /// All phases in canonical order.
    pub const ALL: [Self; 4] = [Self::Install, Self::PreBuild, Self::Build, Self::PostBuild];

    /// The phase name as it appears in a buildspec document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::PreBuild => "pre_build",
            Self::Build => "build",
            Self::PostBuild => "post_build",
        }
    }

    /// Parse a phase name, rejecting anything outside the closed set.
    ///
    /// # Errors
    /// Fails with [`Error::UnknownPhase`] for any other name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "install" => Ok(Self::Install),
            "pre_build" => Ok(Self::PreBuild),
            "build" => Ok(Self::Build),
            "post_build" => Ok(Self::PostBuild),
            _ => Err(Error::UnknownPhase {
                name: name.to_string(),
            }),
        }
    }
}

impl Serialize for PhaseKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One build phase: an ordered command sequence plus optional extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPhase {
    /// Runtime versions to activate (e.g. python: "3.12").
    #[serde(rename = "runtime-versions", skip_serializing_if = "IndexMap::is_empty")]
    runtime_versions: IndexMap<String, String>,

    /// Commands, run in order.
    commands: Vec<String>,

    /// Commands that run even if the phase fails.
    #[serde(rename = "finally", skip_serializing_if = "Vec::is_empty")]
    finally_commands: Vec<String>,
}

impl BuildPhase {
    /// Create a phase from its commands.
    ///
    /// # Errors
    /// Fails if the command list is empty or contains an empty command.
    pub fn new(commands: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let commands: Vec<String> = commands.into_iter().map(Into::into).collect();
        if commands.is_empty() || commands.iter().any(String::is_empty) {
            return Err(Error::EmptyField {
                entity: "build phase",
                field: "commands",
            });
        }
        Ok(Self {
            runtime_versions: IndexMap::new(),
            commands,
            finally_commands: Vec::new(),
        })
    }

    /// Activate a runtime version in this phase.
    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>, version: impl Into<String>) -> Self {
        self.runtime_versions.insert(runtime.into(), version.into());
        self
    }

    /// Add commands that run even if the phase fails.
    #[must_use]
    pub fn with_finally(mut self, commands: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.finally_commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// The phase commands.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// The artifacts block: which files the build produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildArtifacts {
    /// File patterns to collect.
    files: Vec<String>,

    /// Artifact name override.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Directory the patterns are relative to.
    #[serde(rename = "base-directory", skip_serializing_if = "Option::is_none")]
    base_directory: Option<String>,

    /// Flatten directory structure in the artifact.
    #[serde(rename = "discard-paths", skip_serializing_if = "Option::is_none")]
    discard_paths: Option<bool>,
}

impl BuildArtifacts {
    /// Create an artifacts block from file patterns.
    ///
    /// # Errors
    /// Fails if no file pattern is given.
    pub fn new(files: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let files: Vec<String> = files.into_iter().map(Into::into).collect();
        if files.is_empty() {
            return Err(Error::EmptyField {
                entity: "artifacts",
                field: "files",
            });
        }
        Ok(Self {
            files,
            name: None,
            base_directory: None,
            discard_paths: None,
        })
    }

    /// Set the artifact name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the base directory.
    #[must_use]
    pub fn with_base_directory(mut self, dir: impl Into<String>) -> Self {
        self.base_directory = Some(dir.into());
        self
    }

    /// Flatten directory structure.
    #[must_use]
    pub fn discard_paths(mut self) -> Self {
        self.discard_paths = Some(true);
        self
    }
}

/// The cache block: paths persisted between builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildCache {
    /// Cached path patterns.
    paths: Vec<String>,
}

impl BuildCache {
    /// Create a cache block from path patterns.
    ///
    /// # Errors
    /// Fails if no path is given.
    pub fn new(paths: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(Error::EmptyField {
                entity: "cache",
                field: "paths",
            });
        }
        Ok(Self { paths })
    }
}

/// The env block: plain variables plus managed-store references.
///
/// Parameter-store and secrets-manager entries are references into the
/// platform's stores; values never enter the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnv {
    /// Plain environment variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    variables: IndexMap<String, String>,

    /// SSM parameter-store references (variable → parameter path).
    #[serde(rename = "parameter-store", skip_serializing_if = "IndexMap::is_empty")]
    parameter_store: IndexMap<String, String>,

    /// Secrets-manager references (variable → secret-id:json-key).
    #[serde(rename = "secrets-manager", skip_serializing_if = "IndexMap::is_empty")]
    secrets_manager: IndexMap<String, String>,
}

impl BuildEnv {
    /// An empty env block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain variable.
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Add a parameter-store reference.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.parameter_store.insert(key.into(), path.into());
        self
    }

    /// Add a secrets-manager reference.
    #[must_use]
    pub fn secret(mut self, key: impl Into<String>, reference: impl Into<String>) -> Self {
        self.secrets_manager.insert(key.into(), reference.into());
        self
    }

    /// Whether nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
            && self.parameter_store.is_empty()
            && self.secrets_manager.is_empty()
    }
}

/// A complete buildspec document.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSpec {
    version: String,
    env: Option<BuildEnv>,
    phases: IndexMap<PhaseKind, BuildPhase>,
    artifacts: Option<BuildArtifacts>,
    cache: Option<BuildCache>,
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildSpec {
    /// An empty buildspec at the supported schema version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: BUILDSPEC_VERSION.to_string(),
            env: None,
            phases: IndexMap::new(),
            artifacts: None,
            cache: None,
        }
    }

    /// Set a phase. Re-setting a phase replaces it; emission order is the
    /// canonical phase order regardless of insertion order.
    #[must_use]
    pub fn phase(mut self, kind: PhaseKind, phase: BuildPhase) -> Self {
        self.phases.insert(kind, phase);
        self
    }

    /// Set the env block.
    #[must_use]
    pub fn with_env(mut self, env: BuildEnv) -> Self {
        self.env = Some(env);
        self
    }

    /// Set the artifacts block.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: BuildArtifacts) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Set the cache block.
    #[must_use]
    pub fn with_cache(mut self, cache: BuildCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The schema version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Declared phases (unordered view; emission uses canonical order).
    #[must_use]
    pub fn phases(&self) -> &IndexMap<PhaseKind, BuildPhase> {
        &self.phases
    }
}

impl Serialize for BuildSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let env = self.env.as_ref().filter(|e| !e.is_empty());
        let len = 1
            + usize::from(env.is_some())
            + usize::from(!self.phases.is_empty())
            + usize::from(self.artifacts.is_some())
            + usize::from(self.cache.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("version", &self.version)?;
        if let Some(env) = env {
            map.serialize_entry("env", env)?;
        }
        if !self.phases.is_empty() {
            let ordered: IndexMap<PhaseKind, &BuildPhase> = PhaseKind::ALL
                .into_iter()
                .filter_map(|kind| self.phases.get(&kind).map(|phase| (kind, phase)))
                .collect();
            map.serialize_entry("phases", &ordered)?;
        }
        if let Some(artifacts) = &self.artifacts {
            map.serialize_entry("artifacts", artifacts)?;
        }
        if let Some(cache) = &self.cache {
            map.serialize_entry("cache", cache)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_phase_names_are_rejected() {
        let err = PhaseKind::from_name("deploy").unwrap_err();
        assert_eq!(err.to_string(), "unknown build phase 'deploy'");
        assert_eq!(PhaseKind::from_name("pre_build").unwrap(), PhaseKind::PreBuild);
    }

    #[test]
    fn phases_emit_in_canonical_order() {
        let spec = BuildSpec::new()
            .phase(PhaseKind::PostBuild, BuildPhase::new(["echo done"]).unwrap())
            .phase(PhaseKind::Install, BuildPhase::new(["echo hi"]).unwrap());

        let yaml = serde_yaml::to_string(&spec).unwrap();
        let install_at = yaml.find("install:").unwrap();
        let post_at = yaml.find("post_build:").unwrap();
        assert!(install_at < post_at);
    }

    #[test]
    fn empty_commands_fail_at_construction() {
        assert!(BuildPhase::new(Vec::<String>::new()).is_err());
        assert!(BuildPhase::new([""]).is_err());
    }

    #[test]
    fn artifacts_require_files() {
        assert!(BuildArtifacts::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn env_block_uses_store_reference_keys() {
        let env = BuildEnv::new()
            .variable("STAGE", "prod")
            .parameter("DB_HOST", "/app/db/host")
            .secret("DB_PASSWORD", "prod/db:password");
        let yaml = serde_yaml::to_string(&env).unwrap();
        assert!(yaml.contains("parameter-store:"));
        assert!(yaml.contains("secrets-manager:"));
        assert!(yaml.contains("DB_PASSWORD: prod/db:password"));
    }

    #[test]
    fn optional_blocks_are_omitted() {
        let spec = BuildSpec::new().phase(
            PhaseKind::Build,
            BuildPhase::new(["cargo build --release"]).unwrap(),
        );
        let yaml = serde_yaml::to_string(&spec).unwrap();
        assert!(!yaml.contains("artifacts"));
        assert!(!yaml.contains("cache"));
        assert!(!yaml.contains("env"));
        assert!(yaml.contains("version: '0.2'"));
    }
}
