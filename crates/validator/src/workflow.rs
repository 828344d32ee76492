//! GitHub Actions workflow document validation.

use serde_yaml::Value;
use tracing::debug;

/// Trigger labels a workflow `on` block may carry.
const KNOWN_TRIGGERS: &[&str] = &[
    "push",
    "pull_request",
    "schedule",
    "workflow_dispatch",
    "release",
];

/// Validate a workflow document against the structure GitHub Actions expects.
///
/// Returns every problem found, as human-readable messages. An empty vector
/// means the document is structurally valid. Text that fails to parse as YAML
/// yields exactly one syntax error entry.
#[must_use]
pub fn validate_workflow_yaml(text: &str) -> Vec<String> {
    let doc: Value = match serde_yaml::from_str(text) {
        Ok(doc) => doc,
        Err(err) => return vec![format!("YAML syntax error: {err}")],
    };

    let mut errors = Vec::new();
    let Value::Mapping(root) = &doc else {
        errors.push("workflow root must be a mapping".to_string());
        return errors;
    };

    if !root.contains_key("on") {
        errors.push("workflow is missing required key 'on'".to_string());
    } else {
        check_triggers(&doc["on"], &mut errors);
    }

    if !root.contains_key("jobs") {
        errors.push("workflow is missing required key 'jobs'".to_string());
    } else {
        check_jobs(&doc["jobs"], &mut errors);
    }

    debug!(errors = errors.len(), "validated workflow document");
    errors
}

fn check_triggers(on: &Value, errors: &mut Vec<String>) {
    match on {
        Value::String(label) => check_trigger_label(label, errors),
        Value::Sequence(labels) => {
            for label in labels {
                match label {
                    Value::String(label) => check_trigger_label(label, errors),
                    other => errors.push(format!(
                        "trigger list entries must be strings, found {}",
                        kind_of(other)
                    )),
                }
            }
        }
        Value::Mapping(map) => {
            for key in map.keys() {
                match key {
                    Value::String(label) => check_trigger_label(label, errors),
                    other => errors.push(format!(
                        "trigger keys must be strings, found {}",
                        kind_of(other)
                    )),
                }
            }
        }
        other => errors.push(format!(
            "'on' must be a string, sequence, or mapping, found {}",
            kind_of(other)
        )),
    }
}

fn check_trigger_label(label: &str, errors: &mut Vec<String>) {
    if !KNOWN_TRIGGERS.contains(&label) {
        errors.push(format!("unknown trigger '{label}'"));
    }
}

fn check_jobs(jobs: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(jobs) = jobs else {
        errors.push(format!("'jobs' must be a mapping, found {}", kind_of(jobs)));
        return;
    };
    if jobs.is_empty() {
        errors.push("'jobs' must declare at least one job".to_string());
    }
    for (key, job) in jobs {
        let name = key.as_str().unwrap_or("<non-string>");
        check_job(name, job, errors);
    }
}

fn check_job(name: &str, job: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(map) = job else {
        errors.push(format!("job '{name}' must be a mapping"));
        return;
    };

    if !map.contains_key("runs-on") {
        errors.push(format!("job '{name}' is missing required key 'runs-on'"));
    }

    if map.contains_key("steps") {
        check_steps(name, &job["steps"], errors);
    } else {
        errors.push(format!("job '{name}' is missing required key 'steps'"));
    }

    if map.contains_key("strategy") {
        check_strategy(name, &job["strategy"], errors);
    }
}

fn check_steps(job: &str, steps: &Value, errors: &mut Vec<String>) {
    let Value::Sequence(steps) = steps else {
        errors.push(format!("job '{job}' steps must be a sequence"));
        return;
    };
    if steps.is_empty() {
        errors.push(format!("job '{job}' declares no steps"));
    }
    for (index, step) in steps.iter().enumerate() {
        let Value::Mapping(map) = step else {
            errors.push(format!("job '{job}' step {index} must be a mapping"));
            continue;
        };
        if !map.contains_key("uses") && !map.contains_key("run") {
            errors.push(format!(
                "job '{job}' step {index} must declare 'uses' or 'run'"
            ));
        }
    }
}

fn check_strategy(job: &str, strategy: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(map) = strategy else {
        errors.push(format!("job '{job}' strategy must be a mapping"));
        return;
    };
    if map.contains_key("matrix") && !strategy["matrix"].is_mapping() {
        errors.push(format!("job '{job}' strategy matrix must be a mapping"));
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
