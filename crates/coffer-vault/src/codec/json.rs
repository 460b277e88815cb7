//! Structured-document (JSON) format.
//!
//! Export is a pretty-printed array of [`VaultRecord`]s. Import is lenient
//! per field but strict per item: each item must be an object with a
//! non-blank `name`; everything else is coerced.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{Result, VaultError};
use crate::record::{RecordId, RecordType, VaultRecord, non_empty, parse_timestamp};

/// Serialize records as a JSON array.
pub fn export_json(records: &[VaultRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a JSON array of record-like objects.
pub fn import_json(content: &str, now: DateTime<Utc>) -> Result<Vec<VaultRecord>> {
    let value: Value = serde_json::from_str(content).map_err(|e| VaultError::json(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(VaultError::json("expected an array of records"));
    };

    records_from_values(items, now)
}

/// Coerce a list of JSON values into records. Shared with backup restore.
pub(crate) fn records_from_values(items: Vec<Value>, now: DateTime<Utc>) -> Result<Vec<VaultRecord>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| record_from_value(index, item, now))
        .collect()
}

fn record_from_value(index: usize, item: Value, now: DateTime<Utc>) -> Result<VaultRecord> {
    let Value::Object(map) = item else {
        return Err(VaultError::json(format!("item {index} is not an object")));
    };

    let name = text(&map, "name").unwrap_or_default();
    if name.trim().is_empty() {
        return Err(VaultError::json(format!("item {index} has no name")));
    }

    let id = non_empty(text(&map, "id"))
        .map(RecordId::from)
        .unwrap_or_else(RecordId::generate);

    Ok(VaultRecord {
        id,
        name,
        username: text(&map, "username").unwrap_or_default(),
        password: text(&map, "password").unwrap_or_default(),
        url: non_empty(text(&map, "url")),
        notes: non_empty(text(&map, "notes")),
        record_type: text(&map, "type")
            .map(|t| RecordType::parse_lenient(&t))
            .unwrap_or_default(),
        folder: non_empty(text(&map, "folder")),
        favorite: truthy(map.get("favorite")),
        created_at: timestamp(map.get("createdAt"), now),
        updated_at: timestamp(map.get("updatedAt"), now),
    })
}

/// Read a scalar as text. Numbers and booleans are stringified.
fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Boolean coercion for the favorite flag.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !matches!(s.trim(), "" | "false" | "0"),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Timestamps are ISO-8601 strings or epoch milliseconds. Anything else,
/// including a missing value, becomes `now`.
fn timestamp(value: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    let parsed = match value {
        Some(Value::String(s)) => parse_timestamp(s),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        if value.is_some() {
            tracing::debug!(raw = ?value, "invalid timestamp in import, using now");
        }
        now
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 3, 3, 3).unwrap()
    }

    #[test]
    fn keeps_offsetless_and_date_only_timestamps() {
        let content = r#"[
            {"name": "Acme", "createdAt": "2020-05-01", "updatedAt": "2020-05-01T10:00:00"}
        ]"#;
        let records = import_json(content, now()).unwrap();
        let r = &records[0];

        assert_eq!(r.created_at, Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(r.updated_at, Utc.with_ymd_and_hms(2020, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn coerces_fields() {
        let content = r#"[
            {"name": "Acme", "favorite": 1, "type": "vault-door", "createdAt": "garbage",
             "updatedAt": 1704067200000, "url": "", "password": 1234}
        ]"#;
        let records = import_json(content, now()).unwrap();
        let r = &records[0];

        assert!(!r.id.as_str().is_empty());
        assert!(r.favorite);
        assert_eq!(r.record_type, RecordType::Login);
        assert_eq!(r.created_at, now());
        assert_eq!(
            r.updated_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(r.url, None);
        assert_eq!(r.password, "1234");
    }

    #[test]
    fn favorite_truthiness() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&Value::String("false".into()))));
        assert!(!truthy(Some(&Value::String(String::new()))));
        assert!(truthy(Some(&Value::String("yes".into()))));
        assert!(!truthy(Some(&serde_json::json!(0))));
        assert!(truthy(Some(&serde_json::json!({}))));
    }

    #[test]
    fn keeps_supplied_ids() {
        let records = import_json(r#"[{"id": "abc", "name": "x"}]"#, now()).unwrap();
        assert_eq!(records[0].id, RecordId::from("abc"));
    }

    #[test]
    fn non_array_root_fails() {
        let err = import_json(r#"{"name": "x"}"#, now()).unwrap_err();
        assert!(err.to_string().contains("expected an array"));
    }

    #[test]
    fn one_bad_item_fails_the_batch() {
        let err = import_json(r#"[{"name": "ok"}, 42]"#, now()).unwrap_err();
        assert!(err.to_string().contains("item 1"));

        let err = import_json(r#"[{"name": "ok"}, {"username": "nameless"}]"#, now()).unwrap_err();
        assert!(err.to_string().contains("has no name"));
    }

    #[test]
    fn malformed_json_fails() {
        assert!(matches!(
            import_json("[{", now()),
            Err(VaultError::Parse { format: "json", .. })
        ));
    }
}
