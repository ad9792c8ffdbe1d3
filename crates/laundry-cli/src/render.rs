//! Plain-text rendering of tables, records and the tab strip.

use colored::Colorize;
use laundry_core::catalog::CatalogEntity;
use laundry_core::workspace::TabWorkspace;

const MAX_CELL_WIDTH: usize = 32;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

/// Lays out `rows` under `headers` as fixed-width text lines.
pub fn layout(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", clip(cell, *width), width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(headers.to_vec())];
    lines.extend(
        rows.iter()
            .map(|row| line(row.iter().map(String::as_str).collect())),
    );
    lines
}

/// Prints catalog rows. Selected rows are marked, archived rows dimmed.
pub fn print_rows<E: CatalogEntity>(rows: &[&E], is_selected: impl Fn(i64) -> bool) {
    if rows.is_empty() {
        println!("{}", format!("No {}s found.", E::LABEL).bright_black());
        return;
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.row().iter().map(|cell| cell.to_string()).collect())
        .collect();
    let lines = layout(E::columns(), &cells);

    println!("   {}", lines[0].bold());
    for (row, line) in rows.iter().zip(&lines[1..]) {
        let marker = if is_selected(row.id()) { " * " } else { "   " };
        if row.is_archived() {
            println!("{}{}", marker, line.bright_black());
        } else {
            println!("{}{}", marker, line);
        }
    }
    println!(
        "{}",
        format!("{} {}(s)", rows.len(), E::LABEL).bright_black()
    );
}

/// Prints one record as `Column: value` lines.
pub fn print_record<E: CatalogEntity>(record: &E) {
    let width = E::columns().iter().map(|c| c.len()).max().unwrap_or(0);
    for column in E::columns() {
        let value = record
            .cell(column)
            .map(|cell| cell.to_string())
            .unwrap_or_default();
        println!("{:>width$}: {}", column.bold(), value, width = width);
    }
}

/// Prints the tab strip with the active tab highlighted.
pub fn print_tabs(workspace: &TabWorkspace) {
    let strip: Vec<String> = workspace
        .tabs()
        .iter()
        .map(|tab| {
            if tab.id == workspace.active_tab_id() {
                format!("[{}]", tab.title).bright_green().bold().to_string()
            } else {
                format!(" {} ", tab.title)
            }
        })
        .collect();
    println!("{}", strip.join(" "));
}
