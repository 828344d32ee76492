//! CodeBuild buildspec document validation.

use pipewright_codebuild::PhaseKind;
use serde_yaml::Value;
use tracing::debug;

/// Validate a buildspec document against the structure CodeBuild expects.
///
/// Returns every problem found. An empty vector means the document is
/// structurally valid. Text that fails to parse as YAML yields exactly one
/// syntax error entry.
#[must_use]
pub fn validate_buildspec_yaml(text: &str) -> Vec<String> {
    let doc: Value = match serde_yaml::from_str(text) {
        Ok(doc) => doc,
        Err(err) => return vec![format!("YAML syntax error: {err}")],
    };

    let mut errors = Vec::new();
    let Value::Mapping(root) = &doc else {
        errors.push("buildspec root must be a mapping".to_string());
        return errors;
    };

    if !root.contains_key("version") {
        errors.push("buildspec is missing required key 'version'".to_string());
    }

    if root.contains_key("phases") {
        check_phases(&doc["phases"], &mut errors);
    } else {
        errors.push("buildspec is missing required key 'phases'".to_string());
    }

    debug!(errors = errors.len(), "validated buildspec document");
    errors
}

fn check_phases(phases: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(phases) = phases else {
        errors.push("'phases' must be a mapping".to_string());
        return;
    };
    if phases.is_empty() {
        errors.push("'phases' must declare at least one phase".to_string());
    }
    for (key, phase) in phases {
        let Some(name) = key.as_str() else {
            errors.push("phase names must be strings".to_string());
            continue;
        };
        if PhaseKind::from_name(name).is_err() {
            errors.push(format!("unknown build phase '{name}'"));
            continue;
        }
        check_phase(name, phase, errors);
    }
}

fn check_phase(name: &str, phase: &Value, errors: &mut Vec<String>) {
    let Value::Mapping(map) = phase else {
        errors.push(format!("phase '{name}' must be a mapping"));
        return;
    };
    if map.contains_key("commands") {
        if !phase["commands"].is_sequence() {
            errors.push(format!("phase '{name}' commands must be a sequence"));
        }
    } else {
        errors.push(format!("phase '{name}' is missing required key 'commands'"));
    }
}
