//! Object-fixture codec for error definitions.
//!
//! A fixture is a JSON array of records, each carrying a model label, a
//! nullable primary key and the field map of one [`ErrorDefinition`]:
//!
//! ```json
//! [{"model": "error.error", "pk": null, "fields": {"name": "timeout", ...}}]
//! ```
//!
//! Parsing is all-or-nothing: the first bad record rejects the whole input.

use crate::{CoreError, ErrorDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Model label carried by every error-definition record.
pub const FIXTURE_MODEL: &str = "error.error";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureRecord {
    model: String,
    #[serde(default)]
    #[allow(dead_code)]
    pk: Option<i64>,
    fields: ErrorDefinition,
}

#[derive(Serialize)]
struct FixtureRecordRef<'a> {
    model: &'static str,
    pk: Option<i64>,
    fields: &'a ErrorDefinition,
}

/// Parse and validate a fixture document.
///
/// Every record is decoded and validated, and names must be unique across
/// the document. Nothing is returned unless the whole document is valid.
pub fn parse_fixture(input: &str) -> Result<Vec<ErrorDefinition>, CoreError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(input)?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut definitions = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        let record: FixtureRecord =
            serde_json::from_value(value).map_err(|e| CoreError::InvalidRecord {
                index,
                reason: e.to_string(),
            })?;

        if record.model != FIXTURE_MODEL {
            return Err(CoreError::InvalidRecord {
                index,
                reason: format!(
                    "unexpected model '{}', expected '{}'",
                    record.model, FIXTURE_MODEL
                ),
            });
        }

        let definition = record.fields;
        definition
            .validate()
            .map_err(|e| CoreError::InvalidRecord {
                index,
                reason: e.to_string(),
            })?;

        if !seen.insert(definition.name.clone()) {
            return Err(CoreError::DuplicateName {
                name: definition.name.into_inner(),
                index,
            });
        }
        definitions.push(definition);
    }

    Ok(definitions)
}

/// Serialize definitions as a fixture document, in the given order.
pub fn to_fixture_string(definitions: &[ErrorDefinition]) -> Result<String, CoreError> {
    let records: Vec<FixtureRecordRef<'_>> = definitions
        .iter()
        .map(|fields| FixtureRecordRef {
            model: FIXTURE_MODEL,
            pk: None,
            fields,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use serde_json::json;

    fn record(name: &str, category: &str) -> serde_json::Value {
        json!({
            "model": "error.error",
            "pk": null,
            "fields": {
                "name": name,
                "title": "Some Title",
                "description": "Some description.",
                "category": category,
                "is_builtin": true,
                "should_be_retried": false,
                "created": "2015-03-11T00:00:00.000Z",
                "last_modified": "2015-03-11T00:00:00.000Z"
            }
        })
    }

    fn parse(records: Vec<serde_json::Value>) -> Result<Vec<ErrorDefinition>, CoreError> {
        parse_fixture(&serde_json::Value::Array(records).to_string())
    }

    #[test]
    fn test_parse_minimal() {
        let defs = parse(vec![
            record("timeout", "ALGORITHM"),
            record("pull", "SYSTEM"),
        ])
        .unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name.as_str(), "timeout");
        assert_eq!(defs[0].category, ErrorCategory::Algorithm);
        assert_eq!(defs[1].category, ErrorCategory::System);
    }

    #[test]
    fn test_empty_fixture() {
        assert!(parse_fixture("[]").unwrap().is_empty());
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            parse_fixture("{\"model\": \"error.error\"}"),
            Err(CoreError::Serialization(_))
        ));
        assert!(matches!(parse_fixture("[{"), Err(CoreError::Serialization(_))));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = parse(vec![
            record("node-lost", "SYSTEM"),
            record("timeout", "ALGORITHM"),
            record("node-lost", "SYSTEM"),
        ])
        .unwrap_err();

        assert!(matches!(
            &err,
            CoreError::DuplicateName { name, index: 2 } if name == "node-lost"
        ));
        assert!(err.to_string().contains("record #2"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = parse(vec![
            record("timeout", "ALGORITHM"),
            record("odd", "NETWORK"),
        ])
        .unwrap_err();

        match err {
            CoreError::InvalidRecord { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("NETWORK"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut bad = record("timeout", "ALGORITHM");
        bad["fields"].as_object_mut().unwrap().remove("should_be_retried");

        let err = parse(vec![bad]).unwrap_err();
        match err {
            CoreError::InvalidRecord { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("should_be_retried"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut bad = record("timeout", "ALGORITHM");
        bad["fields"]["should_be_retired"] = json!(true);

        assert!(matches!(parse(vec![bad]), Err(CoreError::InvalidRecord { .. })));
    }

    #[test]
    fn test_wrong_model_rejected() {
        let mut bad = record("timeout", "ALGORITHM");
        bad["model"] = json!("job.job");

        let err = parse(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("job.job"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let err = parse(vec![record("Node Lost", "SYSTEM")]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut bad = record("timeout", "ALGORITHM");
        bad["fields"]["title"] = json!("");

        let err = parse(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("title is empty"));
    }

    #[test]
    fn test_pk_is_optional() {
        let mut rec = record("timeout", "ALGORITHM");
        rec.as_object_mut().unwrap().remove("pk");
        assert_eq!(parse(vec![rec]).unwrap().len(), 1);

        let mut rec = record("timeout", "ALGORITHM");
        rec["pk"] = json!(7);
        assert_eq!(parse(vec![rec]).unwrap().len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let defs = parse(vec![record("timeout", "ALGORITHM")]).unwrap();
        let text = to_fixture_string(&defs).unwrap();
        let out: serde_json::Value = serde_json::from_str(&text).unwrap();

        let rec = &out[0];
        assert_eq!(rec["model"], "error.error");
        assert!(rec["pk"].is_null());

        let mut keys: Vec<&str> = rec["fields"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "category",
                "created",
                "description",
                "is_builtin",
                "last_modified",
                "name",
                "should_be_retried",
                "title"
            ]
        );
        assert_eq!(rec["fields"]["category"], "ALGORITHM");
    }
}
