//! Deep merge of JSON objects for `ortb2` fragments.

use serde_json::{Map, Value};

/// Merge `source` into `target` in place.
///
/// Nested objects merge recursively. Arrays are copied when the target has no
/// such key and otherwise extended with the items it does not already hold.
/// Everything else overwrites.
///
/// Unlike the host's `mergeDeep`, a target value of the wrong shape is
/// replaced rather than kept: an object or array from `source` overwrites a
/// scalar already stored under the same key.
pub fn merge_deep(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Object(nested) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(slot) = slot {
                    merge_deep(slot, nested);
                }
            }
            Value::Array(items) => match target.get_mut(key) {
                Some(Value::Array(existing)) => {
                    for item in items {
                        if !existing.contains(item) {
                            existing.push(item.clone());
                        }
                    }
                }
                _ => {
                    target.insert(key.clone(), value.clone());
                }
            },
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("fixture should be an object")
    }

    #[test]
    fn merges_nested_objects_without_dropping_siblings() {
        let mut target = object(json!({ "site": { "page": "/a" }, "ext": { "other": 1 } }));
        let source = object(json!({ "ext": { "hmns": { "info": "bot+" } } }));

        merge_deep(&mut target, &source);

        assert_eq!(
            Value::Object(target),
            json!({
                "site": { "page": "/a" },
                "ext": { "other": 1, "hmns": { "info": "bot+" } }
            })
        );
    }

    #[test]
    fn arrays_append_only_missing_items() {
        let mut target = object(json!({ "cat": ["IAB1", "IAB2"] }));
        let source = object(json!({ "cat": ["IAB2", "IAB3"], "fresh": [1] }));

        merge_deep(&mut target, &source);

        assert_eq!(target["cat"], json!(["IAB1", "IAB2", "IAB3"]));
        assert_eq!(target["fresh"], json!([1]));
    }

    #[test]
    fn object_replaces_scalar_in_target() {
        let mut target = object(json!({ "ext": "legacy" }));
        let source = object(json!({ "ext": { "hmns": {} } }));

        merge_deep(&mut target, &source);

        assert_eq!(target["ext"], json!({ "hmns": {} }));
    }

    #[test]
    fn array_replaces_scalar_in_target() {
        let mut target = object(json!({ "cat": "IAB1" }));
        let source = object(json!({ "cat": ["IAB2"] }));

        merge_deep(&mut target, &source);

        assert_eq!(target["cat"], json!(["IAB2"]));
    }

    #[test]
    fn source_is_copied_not_aliased() {
        let mut target = Map::new();
        let mut source = object(json!({ "ext": { "hmns": { "a": 1 } } }));

        merge_deep(&mut target, &source);
        source.insert("ext".to_string(), json!({}));

        assert_eq!(target["ext"]["hmns"]["a"], json!(1));
    }
}
