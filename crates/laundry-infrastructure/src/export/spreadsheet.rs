//! CSV and XLSX writers.

use laundry_core::catalog::CellValue;
use laundry_core::error::{AdminError, Result};
use laundry_core::export::{ExportFormat, ExportTable, TableSerializer};
use rust_xlsxwriter::{Format, Workbook};

/// Excel caps sheet names at 31 characters.
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, Copy)]
pub struct SpreadsheetSerializer {
    format: ExportFormat,
}

impl SpreadsheetSerializer {
    /// `format` must be CSV or XLSX; anything else is written as CSV.
    pub fn new(format: ExportFormat) -> Self {
        let format = match format {
            ExportFormat::Xlsx => ExportFormat::Xlsx,
            _ => ExportFormat::Csv,
        };
        Self { format }
    }

    fn write_csv(table: &ExportTable) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&table.headers).map_err(csv_error)?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(csv_error)?;
        }
        writer
            .into_inner()
            .map_err(|e| AdminError::serialization("CSV", e.to_string()))
    }

    fn write_xlsx(table: &ExportTable) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        let sheet_name: String = table.title.chars().take(MAX_SHEET_NAME).collect();
        worksheet.set_name(sheet_name).map_err(xlsx_error)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .map_err(xlsx_error)?;
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    CellValue::Int(v) => worksheet.write_number(row_num, col, *v as f64),
                    CellValue::Number(v) => worksheet.write_number(row_num, col, *v),
                    CellValue::Text(v) => worksheet.write_string(row_num, col, v),
                }
                .map_err(xlsx_error)?;
            }
        }

        workbook.save_to_buffer().map_err(xlsx_error)
    }
}

fn csv_error(err: csv::Error) -> AdminError {
    AdminError::serialization("CSV", err.to_string())
}

fn xlsx_error(err: rust_xlsxwriter::XlsxError) -> AdminError {
    AdminError::serialization("XLSX", err.to_string())
}

impl TableSerializer for SpreadsheetSerializer {
    fn format(&self) -> ExportFormat {
        self.format
    }

    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>> {
        match self.format {
            ExportFormat::Xlsx => Self::write_xlsx(table),
            _ => Self::write_csv(table),
        }
    }
}
