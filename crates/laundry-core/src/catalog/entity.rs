//! Shared shape of catalog records.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::catalog::soft_delete::SoftDelete;

/// A single cell of a flattened record, used for sorting and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Orders two cells; numbers compare numerically, text case-insensitively.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Int(a), CellValue::Number(b)) => (*a as f64).total_cmp(b),
            (CellValue::Number(a), CellValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (a, b) => a
                .to_string()
                .to_lowercase()
                .cmp(&b.to_string().to_lowercase()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// A record type served by one REST resource of the catalog API.
pub trait CatalogEntity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Payload sent on create/update.
    type Form: Clone + fmt::Debug + Default + Serialize + Send + Sync + 'static;

    /// Summary figures shown above the table.
    type Stats: fmt::Display + fmt::Debug + Serialize + Send;

    /// Path segment of the resource, e.g. `users`.
    const RESOURCE: &'static str;

    /// Lowercase singular used in prompts, e.g. `user`.
    const LABEL: &'static str;

    /// Title of the exported sheet.
    const SHEET_NAME: &'static str;

    fn id(&self) -> i64;

    /// Value matched by the table's search box.
    fn name(&self) -> &str;

    fn deleted_at(&self) -> &SoftDelete;

    fn is_archived(&self) -> bool {
        self.deleted_at().is_archived()
    }

    /// Form prefilled with this record's editable fields.
    fn to_form(&self) -> Self::Form;

    /// Column headers of the flattened record, in export order.
    fn columns() -> &'static [&'static str];

    /// Value of the named column (case-insensitive), if it exists.
    fn cell(&self, column: &str) -> Option<CellValue>;

    /// Flattened row in [`CatalogEntity::columns`] order.
    fn row(&self) -> Vec<CellValue> {
        Self::columns()
            .iter()
            .map(|column| self.cell(column).unwrap_or(CellValue::Text(String::new())))
            .collect()
    }

    fn stats(items: &[Self]) -> Self::Stats;
}

/// Formats an API timestamp as local `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS`; anything else is returned
/// unchanged.
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &chrono::Local)
}

/// [`format_timestamp`] against an explicit zone. Offset-less timestamps
/// are already wall-clock time and are not shifted.
pub fn format_timestamp_in<Tz>(raw: &str, zone: &Tz) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(zone)
            .format("%Y-%m-%d %H:%M")
            .to_string();
    }
    if let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}
