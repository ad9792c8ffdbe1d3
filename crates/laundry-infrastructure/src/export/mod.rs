//! File serializers for exported tables.

pub mod pdf;
pub mod spreadsheet;

use std::path::{Path, PathBuf};

use laundry_core::error::{AdminError, Result};
use laundry_core::export::{ExportArtifact, ExportFormat, TableSerializer};

pub use pdf::PdfTableSerializer;
pub use spreadsheet::SpreadsheetSerializer;

/// Returns the serializer writing `format`.
pub fn serializer_for(format: ExportFormat) -> Box<dyn TableSerializer> {
    match format {
        ExportFormat::Csv | ExportFormat::Xlsx => Box::new(SpreadsheetSerializer::new(format)),
        ExportFormat::Pdf => Box::new(PdfTableSerializer::default()),
    }
}

/// Writes an artifact into `dir` under its own file name.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)
        .map_err(|e| AdminError::io(format!("Failed to write {:?}: {}", path, e)))?;
    tracing::info!("[Export] Wrote {} bytes to {:?}", artifact.bytes.len(), path);
    Ok(path)
}
