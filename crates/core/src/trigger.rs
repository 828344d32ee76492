//! Workflow trigger declarations.
//!
//! A trigger names the external event that starts a pipeline, plus optional
//! filters on that event. Each variant serializes to either its bare event
//! label (no filters set) or a keyed mapping containing only the filters that
//! are set.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

/// A declaration of which external events cause a pipeline to run.
///
/// Closed set of event families; each carries its own filter payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Push events, optionally filtered by branch/tag/path patterns.
    Push(PushFilter),
    /// Pull request events, optionally filtered by activity type and target.
    PullRequest(PullRequestFilter),
    /// Scheduled runs from one or more cron expressions.
    Schedule(ScheduleFilter),
    /// Manual runs, optionally with typed input declarations.
    WorkflowDispatch(DispatchFilter),
    /// Release events, optionally filtered by activity type.
    Release(ReleaseFilter),
}

/// Filters for push event triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PushFilter {
    /// Branch patterns to trigger on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    /// Branch patterns to ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches_ignore: Vec<String>,

    /// Tag patterns to trigger on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Tag patterns to ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags_ignore: Vec<String>,

    /// Path patterns that must match to trigger.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    /// Path patterns to ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths_ignore: Vec<String>,
}

impl PushFilter {
    fn is_empty(&self) -> bool {
        self.branches.is_empty()
            && self.branches_ignore.is_empty()
            && self.tags.is_empty()
            && self.tags_ignore.is_empty()
            && self.paths.is_empty()
            && self.paths_ignore.is_empty()
    }
}

/// Filters for pull request event triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PullRequestFilter {
    /// Activity types to trigger on (e.g. "opened", "synchronize").
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Target branch patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    /// Target branch patterns to ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches_ignore: Vec<String>,

    /// Path patterns that must match to trigger.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    /// Path patterns to ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths_ignore: Vec<String>,
}

impl PullRequestFilter {
    fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.branches.is_empty()
            && self.branches_ignore.is_empty()
            && self.paths.is_empty()
            && self.paths_ignore.is_empty()
    }
}

/// Cron expressions for scheduled triggers. Always serialized in the keyed
/// list-of-cron form; a schedule with no expressions is not constructible.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleFilter {
    crons: Vec<String>,
}

impl ScheduleFilter {
    /// Cron expressions, in declaration order.
    #[must_use]
    pub fn crons(&self) -> &[String] {
        &self.crons
    }
}

/// Filters for release event triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReleaseFilter {
    /// Activity types to trigger on (e.g. "published", "created").
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// Input declarations for manual dispatch triggers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchFilter {
    /// Input definitions, keyed by input name (order preserved).
    pub inputs: IndexMap<String, DispatchInput>,
}

/// One input declaration for a manual dispatch trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchInput {
    /// Human-readable description shown in the run form.
    pub description: String,

    /// Whether the input must be supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Input type (string, boolean, choice, environment).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    /// Options for choice-type inputs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl DispatchInput {
    /// Create an input with a description and all other fields unset.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            required: None,
            default: None,
            input_type: None,
            options: Vec::new(),
        }
    }

    /// Mark the input required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the input type.
    #[must_use]
    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    /// Set the options for a choice-type input.
    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

impl Trigger {
    /// A push trigger with no filters.
    #[must_use]
    pub fn push() -> Self {
        Self::Push(PushFilter::default())
    }

    /// A push trigger filtered to the given branches.
    #[must_use]
    pub fn on_push(branches: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Push(PushFilter {
            branches: branches.into_iter().map(Into::into).collect(),
            ..PushFilter::default()
        })
    }

    /// A pull request trigger with no filters.
    #[must_use]
    pub fn pull_request() -> Self {
        Self::PullRequest(PullRequestFilter::default())
    }

    /// A pull request trigger filtered to the given target branches.
    #[must_use]
    pub fn on_pull_request(branches: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::PullRequest(PullRequestFilter {
            branches: branches.into_iter().map(Into::into).collect(),
            ..PullRequestFilter::default()
        })
    }

    /// A scheduled trigger from cron expressions.
    ///
    /// # Errors
    /// Fails if no cron expression is given or any expression is empty.
    pub fn on_schedule(crons: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let crons: Vec<String> = crons.into_iter().map(Into::into).collect();
        if crons.is_empty() || crons.iter().any(String::is_empty) {
            return Err(Error::EmptyField {
                entity: "schedule trigger",
                field: "cron expression",
            });
        }
        Ok(Self::Schedule(ScheduleFilter { crons }))
    }

    /// A manual dispatch trigger with no inputs.
    #[must_use]
    pub fn workflow_dispatch() -> Self {
        Self::WorkflowDispatch(DispatchFilter::default())
    }

    /// A manual dispatch trigger with input declarations.
    #[must_use]
    pub fn on_dispatch(inputs: impl IntoIterator<Item = (String, DispatchInput)>) -> Self {
        Self::WorkflowDispatch(DispatchFilter {
            inputs: inputs.into_iter().collect(),
        })
    }

    /// A release trigger with no filters.
    #[must_use]
    pub fn release() -> Self {
        Self::Release(ReleaseFilter::default())
    }

    /// A release trigger filtered to the given activity types.
    #[must_use]
    pub fn on_release(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Release(ReleaseFilter {
            types: types.into_iter().map(Into::into).collect(),
        })
    }

    /// The event label this trigger serializes under.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Push(_) => "push",
            Self::PullRequest(_) => "pull_request",
            Self::Schedule(_) => "schedule",
            Self::WorkflowDispatch(_) => "workflow_dispatch",
            Self::Release(_) => "release",
        }
    }

    /// Whether this trigger serializes to its bare label.
    ///
    /// Schedules always need their cron list, so they are never bare.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        match self {
            Self::Push(f) => f.is_empty(),
            Self::PullRequest(f) => f.is_empty(),
            Self::Schedule(_) => false,
            Self::WorkflowDispatch(f) => f.inputs.is_empty(),
            Self::Release(f) => f.types.is_empty(),
        }
    }

    /// The filter payload as a YAML value, containing only set fields.
    ///
    /// # Errors
    /// Fails if the payload cannot be represented as YAML.
    pub fn filter_value(&self) -> serde_yaml::Result<Value> {
        match self {
            Self::Push(f) => serde_yaml::to_value(f),
            Self::PullRequest(f) => serde_yaml::to_value(f),
            Self::Schedule(f) => {
                let entries: Vec<IndexMap<&str, &str>> = f
                    .crons
                    .iter()
                    .map(|cron| IndexMap::from([("cron", cron.as_str())]))
                    .collect();
                serde_yaml::to_value(entries)
            }
            Self::WorkflowDispatch(f) => {
                let mut map = IndexMap::new();
                if !f.inputs.is_empty() {
                    map.insert("inputs", &f.inputs);
                }
                serde_yaml::to_value(map)
            }
            Self::Release(f) => serde_yaml::to_value(f),
        }
    }

    /// Serialize this trigger on its own: the bare label when no filter is
    /// set, otherwise a single-entry mapping from label to filter payload.
    ///
    /// # Errors
    /// Fails if the payload cannot be represented as YAML.
    pub fn to_value(&self) -> serde_yaml::Result<Value> {
        if self.is_bare() {
            return Ok(Value::String(self.label().to_string()));
        }
        let mut map = serde_yaml::Mapping::new();
        map.insert(
            Value::String(self.label().to_string()),
            self.filter_value()?,
        );
        Ok(Value::Mapping(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_release_serializes_to_label() {
        let trigger = Trigger::release();
        assert!(trigger.is_bare());
        assert_eq!(
            trigger.to_value().unwrap(),
            Value::String("release".to_string())
        );
    }

    #[test]
    fn release_with_types_serializes_to_mapping() {
        let trigger = Trigger::on_release(["published"]);
        assert!(!trigger.is_bare());

        let value = trigger.to_value().unwrap();
        let yaml = serde_yaml::to_string(&value).unwrap();
        assert_eq!(yaml, "release:\n  types:\n  - published\n");
    }

    #[test]
    fn push_filter_omits_unset_fields() {
        let trigger = Trigger::on_push(["main"]);
        let value = trigger.filter_value().unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("branches"));
    }

    #[test]
    fn push_ignore_fields_use_kebab_keys() {
        let trigger = Trigger::Push(PushFilter {
            paths_ignore: vec!["docs/**".to_string()],
            ..PushFilter::default()
        });
        let yaml = serde_yaml::to_string(&trigger.to_value().unwrap()).unwrap();
        assert!(yaml.contains("paths-ignore:"));
    }

    #[test]
    fn schedule_requires_cron() {
        assert!(Trigger::on_schedule(Vec::<String>::new()).is_err());
        assert!(Trigger::on_schedule([""]).is_err());

        let trigger = Trigger::on_schedule(["0 0 * * *"]).unwrap();
        assert!(!trigger.is_bare());
        let yaml = serde_yaml::to_string(&trigger.to_value().unwrap()).unwrap();
        assert_eq!(yaml, "schedule:\n- cron: 0 0 * * *\n");
    }

    #[test]
    fn dispatch_inputs_serialize_with_type_key() {
        let trigger = Trigger::on_dispatch([(
            "environment".to_string(),
            DispatchInput::new("Target environment")
                .required()
                .with_type("choice")
                .with_options(["staging", "production"]),
        )]);

        let yaml = serde_yaml::to_string(&trigger.to_value().unwrap()).unwrap();
        assert!(yaml.contains("workflow_dispatch:"));
        assert!(yaml.contains("type: choice"));
        assert!(yaml.contains("required: true"));
        assert!(!yaml.contains("default"));
    }

    #[test]
    fn bare_dispatch_is_bare() {
        assert!(Trigger::workflow_dispatch().is_bare());
        assert!(Trigger::push().is_bare());
        assert!(Trigger::pull_request().is_bare());
    }
}
