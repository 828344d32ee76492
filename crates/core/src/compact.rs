//! Compaction of dynamically assembled YAML values.
//!
//! Optional fields are omitted from serialized output entirely rather than
//! emitted as null/empty. For serde-derived types that rule is carried by
//! `skip_serializing_if` attributes; for values assembled by hand (the
//! workflow `on` value, validator fixtures) every emitter routes through
//! [`compact`] so the rule holds in one place.

use serde_yaml::Value;

/// Whether a value counts as "absent" when it appears as a mapping entry.
#[must_use]
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(map) => map.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        _ => false,
    }
}

/// Recursively drop absent entries from every mapping in `value`.
///
/// Sequence elements are compacted in place but never removed; only mapping
/// entries are dropped, since those are the "fields" the no-null rule is
/// about.
#[must_use]
pub fn compact(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let compacted = map
                .into_iter()
                .map(|(k, v)| (k, compact(v)))
                .filter(|(_, v)| !is_absent(v))
                .collect();
            Value::Mapping(compacted)
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(compact).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn drops_null_and_empty_entries() {
        let value: Value = serde_yaml::from_str(
            r"
            name: ci
            on: null
            jobs: {}
            steps: []
            keep: value
            ",
        )
        .unwrap();

        let compacted = compact(value);
        let map = compacted.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("name"));
        assert!(map.contains_key("keep"));
    }

    #[test]
    fn compacts_nested_mappings() {
        let value: Value = serde_yaml::from_str(
            r"
            outer:
              inner:
                gone: null
              kept: 1
            ",
        )
        .unwrap();

        let compacted = compact(value);
        let outer = &compacted["outer"];
        let map = outer.as_mapping().unwrap();
        // `inner` became empty after compaction and was itself dropped.
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("kept"));
    }

    #[test]
    fn sequence_elements_survive() {
        let value: Value = serde_yaml::from_str("[push, pull_request]").unwrap();
        assert_eq!(compact(value.clone()), value);
    }
}
