//! Response normalization.
//!
//! The API answers with a bare array, an object wrapping an array under
//! `list`, or a single object. Each shape flattens into output records.

use crate::constants::{ERROR_FIELD, LIST_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record in the output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub json: Value,
}

impl OutputRecord {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Record standing in for a failed input under continue-on-failure.
    pub fn error(message: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert(ERROR_FIELD.to_string(), Value::String(message.into()));
        Self {
            json: Value::Object(body),
        }
    }

    /// Message of an error record.
    pub fn error_message(&self) -> Option<&str> {
        self.json.get(ERROR_FIELD).and_then(Value::as_str)
    }
}

/// Classified response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Bare JSON array.
    Sequence(Vec<Value>),
    /// Object with an array under `list`.
    Listed(Vec<Value>),
    /// Anything else.
    Single(Value),
}

impl ResponseShape {
    pub fn classify(response: Value) -> Self {
        match response {
            Value::Array(items) => ResponseShape::Sequence(items),
            Value::Object(mut map) => match map.remove(LIST_FIELD) {
                Some(Value::Array(items)) => ResponseShape::Listed(items),
                Some(other) => {
                    map.insert(LIST_FIELD.to_string(), other);
                    ResponseShape::Single(Value::Object(map))
                }
                None => ResponseShape::Single(Value::Object(map)),
            },
            other => ResponseShape::Single(other),
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            ResponseShape::Sequence(items) | ResponseShape::Listed(items) => items,
            ResponseShape::Single(value) => vec![value],
        }
    }
}

/// Flatten a response into output records, preserving element order.
pub fn normalize(response: Value) -> Vec<OutputRecord> {
    ResponseShape::classify(response)
        .into_items()
        .into_iter()
        .map(OutputRecord::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_sequence_expands_in_order() {
        let records = normalize(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        let ids: Vec<_> = records.iter().map(|r| r.json["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_listed_expands_list_only() {
        let records = normalize(json!({"list": ["a", "b"], "hasMore": true}));
        assert_eq!(
            records,
            vec![OutputRecord::new(json!("a")), OutputRecord::new(json!("b"))]
        );
    }

    #[test]
    fn test_plain_object_is_single_record() {
        let records = normalize(json!({"foo": "bar"}));
        assert_eq!(records, vec![OutputRecord::new(json!({"foo": "bar"}))]);
    }

    #[test]
    fn test_non_array_list_is_single_record() {
        let response = json!({"list": "not-an-array", "id": 7});
        let records = normalize(response.clone());
        assert_eq!(records, vec![OutputRecord::new(response)]);
    }

    #[test]
    fn test_empty_sequence_yields_nothing() {
        assert!(normalize(json!([])).is_empty());
        assert!(normalize(json!({"list": []})).is_empty());
    }

    #[test]
    fn test_scalar_response_is_single_record() {
        assert_eq!(normalize(Value::Null), vec![OutputRecord::new(Value::Null)]);
    }

    #[test]
    fn test_error_record_shape() {
        let record = OutputRecord::error("boom");
        assert_eq!(record.json, json!({"error": "boom"}));
        assert_eq!(record.error_message(), Some("boom"));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"json": {"error": "boom"}})
        );
    }

    proptest! {
        #[test]
        fn prop_array_and_list_expand_every_element(items in proptest::collection::vec(any::<i64>(), 0..20)) {
            let values: Vec<Value> = items.into_iter().map(Value::from).collect();
            let from_array: Vec<Value> = normalize(Value::Array(values.clone()))
                .into_iter()
                .map(|r| r.json)
                .collect();
            let from_list: Vec<Value> = normalize(json!({ "list": values.clone() }))
                .into_iter()
                .map(|r| r.json)
                .collect();
            prop_assert_eq!(&from_array, &values);
            prop_assert_eq!(&from_list, &values);
        }
    }
}
