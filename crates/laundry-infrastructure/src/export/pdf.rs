//! PDF table writer.
//!
//! Renders the table as plain text rows on landscape A4 pages using the
//! built-in Helvetica fonts, repeating the header on every page.

use laundry_core::error::{AdminError, Result};
use laundry_core::export::{ExportFormat, ExportTable, TableSerializer};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 15.0;
const LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Clone)]
pub struct PdfTableSerializer {
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for PdfTableSerializer {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            line_height: 6.0,
        }
    }
}

impl PdfTableSerializer {
    /// Data rows that fit below the title and header on one page.
    pub fn rows_per_page(&self) -> usize {
        let usable = PAGE_HEIGHT - 2.0 * MARGIN - 3.0 * self.line_height;
        (usable / self.line_height).floor().max(1.0) as usize
    }

    fn column_width(&self, columns: usize) -> f32 {
        (PAGE_WIDTH - 2.0 * MARGIN) / columns.max(1) as f32
    }

    /// Approximate characters of Helvetica that fit in `width` millimetres.
    fn max_chars(&self, width: f32) -> usize {
        let char_width = self.font_size * 0.3528 * 0.55;
        ((width - 2.0) / char_width).floor().max(1.0) as usize
    }

    fn draw_row(
        &self,
        layer: &PdfLayerReference,
        cells: &[String],
        y: f32,
        font: &IndirectFontRef,
    ) {
        let width = self.column_width(cells.len());
        let max_chars = self.max_chars(width);
        for (col, text) in cells.iter().enumerate() {
            let x = MARGIN + col as f32 * width;
            layer.use_text(
                truncate(text, max_chars),
                self.font_size,
                Mm(x),
                Mm(y),
                font,
            );
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn pdf_error(err: impl std::fmt::Display) -> AdminError {
    AdminError::serialization("PDF", err.to_string())
}

impl TableSerializer for PdfTableSerializer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            table.title.as_str(),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            LAYER_NAME,
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        let empty: &[Vec<String>] = &[];
        let chunks: Vec<&[Vec<String>]> = if rows.is_empty() {
            vec![empty]
        } else {
            rows.chunks(self.rows_per_page()).collect()
        };
        let page_count = chunks.len();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
                doc.get_page(page).get_layer(layer)
            };

            let mut y = PAGE_HEIGHT - MARGIN;
            let title = format!("{} ({}/{})", table.title, index + 1, page_count);
            layer.use_text(title, self.font_size + 4.0, Mm(MARGIN), Mm(y), &bold);

            y -= 2.0 * self.line_height;
            self.draw_row(&layer, &table.headers, y, &bold);

            for row in chunk {
                y -= self.line_height;
                self.draw_row(&layer, row, y, &regular);
            }
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laundry_core::catalog::CellValue;

    fn table(rows: usize) -> ExportTable {
        ExportTable {
            title: "Users".into(),
            headers: vec!["ID".into(), "Name".into()],
            rows: (0..rows)
                .map(|i| vec![CellValue::Int(i as i64), format!("User {}", i).into()])
                .collect(),
        }
    }

    #[test]
    fn test_produces_pdf_bytes() {
        let bytes = PdfTableSerializer::default().serialize(&table(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_table_still_renders_header_page() {
        let bytes = PdfTableSerializer::default().serialize(&table(0)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_tables_paginate() {
        let serializer = PdfTableSerializer::default();
        let per_page = serializer.rows_per_page();
        assert!(per_page > 10);

        let short = serializer.serialize(&table(per_page)).unwrap();
        let long = serializer.serialize(&table(per_page * 3)).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }
}
