//! Soft-delete marker carried by catalog records.
//!
//! The API reports `deleted_at` in two shapes depending on the record type:
//! a plain timestamp string, or a nullable wrapper object
//! `{"Time": "...", "Valid": bool}`. Both are folded into [`SoftDelete`]
//! when the record is deserialized so callers never inspect raw JSON.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SoftDelete {
    #[default]
    Active,
    ArchivedAt(String),
}

impl SoftDelete {
    pub fn is_archived(&self) -> bool {
        matches!(self, SoftDelete::ArchivedAt(_))
    }

    /// Timestamp of the archive, when archived.
    pub fn archived_at(&self) -> Option<&str> {
        match self {
            SoftDelete::Active => None,
            SoftDelete::ArchivedAt(at) => Some(at),
        }
    }

    /// Label used in tables and exports.
    pub fn status_label(&self) -> &'static str {
        if self.is_archived() { "Archived" } else { "Active" }
    }

    /// Classifies a raw `deleted_at` value.
    ///
    /// - `null`, `false`, `""` and `0` are active
    /// - a non-empty string is archived at that timestamp
    /// - an object is archived iff its `Valid` flag is true
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => SoftDelete::Active,
            Value::String(s) if s.is_empty() => SoftDelete::Active,
            Value::String(s) => SoftDelete::ArchivedAt(s.clone()),
            Value::Object(map) => {
                let valid = map.get("Valid").and_then(Value::as_bool).unwrap_or(false);
                if valid {
                    let at = map
                        .get("Time")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    SoftDelete::ArchivedAt(at)
                } else {
                    SoftDelete::Active
                }
            }
            Value::Number(n) if n.as_f64() == Some(0.0) => SoftDelete::Active,
            other => SoftDelete::ArchivedAt(other.to_string()),
        }
    }
}

/// `Active` is `null`, a timestamped archive is the timestamp. An archive
/// without a timestamp is written as `{"Valid": true}` since `""` reads back
/// as active.
impl Serialize for SoftDelete {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SoftDelete::Active => serializer.serialize_none(),
            SoftDelete::ArchivedAt(at) if at.is_empty() => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Valid", &true)?;
                map.end()
            }
            SoftDelete::ArchivedAt(at) => serializer.serialize_str(at),
        }
    }
}

impl<'de> Deserialize<'de> for SoftDelete {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SoftDelete::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Record {
        #[serde(default)]
        deleted_at: SoftDelete,
    }

    fn classify(raw: Value) -> SoftDelete {
        serde_json::from_value::<Record>(raw).unwrap().deleted_at
    }

    #[test]
    fn test_null_is_active() {
        assert!(!classify(json!({"deleted_at": null})).is_archived());
    }

    #[test]
    fn test_absent_is_active() {
        assert!(!classify(json!({})).is_archived());
    }

    #[test]
    fn test_timestamp_is_archived() {
        let marker = classify(json!({"deleted_at": "2024-01-01"}));
        assert!(marker.is_archived());
        assert_eq!(marker.archived_at(), Some("2024-01-01"));
    }

    #[test]
    fn test_empty_string_is_active() {
        assert!(!classify(json!({"deleted_at": ""})).is_archived());
    }

    #[test]
    fn test_wrapper_object_follows_valid_flag() {
        assert!(!classify(json!({"deleted_at": {"Valid": false}})).is_archived());
        assert!(classify(json!({"deleted_at": {"Valid": true}})).is_archived());

        let marker = classify(json!({
            "deleted_at": {"Time": "2024-03-05T10:00:00Z", "Valid": true}
        }));
        assert_eq!(marker.archived_at(), Some("2024-03-05T10:00:00Z"));
    }

    #[test]
    fn test_status_label() {
        assert_eq!(SoftDelete::Active.status_label(), "Active");
        assert_eq!(
            SoftDelete::ArchivedAt("2024-01-01".into()).status_label(),
            "Archived"
        );
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_value(SoftDelete::Active).unwrap(), Value::Null);
        assert_eq!(
            serde_json::to_value(SoftDelete::ArchivedAt("2024-01-01".into())).unwrap(),
            json!("2024-01-01")
        );
    }

    #[test]
    fn test_archive_without_timestamp_stays_archived() {
        let marker = classify(json!({"deleted_at": {"Valid": true}}));
        assert_eq!(marker, SoftDelete::ArchivedAt(String::new()));

        let written = serde_json::to_value(&marker).unwrap();
        assert_eq!(written, json!({"Valid": true}));
        assert!(classify(json!({ "deleted_at": written })).is_archived());
    }
}
