//! Export model: the flat table handed to file serializers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::catalog::{CatalogEntity, CellValue};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Headers plus rows, ready to be written to any export format.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ExportTable {
    /// Flattens records using the entity's column layout.
    pub fn from_records<'a, E, I>(records: I) -> Self
    where
        E: CatalogEntity,
        I: IntoIterator<Item = &'a E>,
    {
        Self {
            title: E::SHEET_NAME.to_string(),
            headers: E::columns().iter().map(|h| h.to_string()).collect(),
            rows: records.into_iter().map(|record| record.row()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Writes an [`ExportTable`] into a file body.
pub trait TableSerializer: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>>;
}

/// A serialized export, named and ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// `<resource>_export_YYYYMMDD.<ext>`
pub fn export_file_name(resource: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}_export_{}.{}",
        resource,
        date.format("%Y%m%d"),
        format.extension()
    )
}
