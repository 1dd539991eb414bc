//! Terminal tables for schemas, decoded records and diagnostics.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fixlen_codec::{DefectKind, ParseError, TokenRecord};
use fixlen_model::Schema;

use crate::commands::{CheckOutcome, DecodeOutcome};

/// Column layout with offsets and a total row.
#[must_use]
pub fn schema_table(schema: &Schema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Width"),
        header_cell("Offset"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (index, (offset, column)) in schema.offsets().enumerate() {
        table.add_row(vec![
            Cell::new(index),
            Cell::new(column.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(column.width()),
            dim_cell(offset),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(schema.total_width()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

/// Decoded records, one row per line, headed by the column names.
#[must_use]
pub fn records_table(schema: &Schema, records: &[TokenRecord]) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Line")];
    header.extend(schema.iter().map(|column| header_cell(column.name())));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, record) in records.iter().enumerate() {
        let mut row = vec![dim_cell(index + 1)];
        row.extend(record.iter().map(|token| {
            if token.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(token)
            }
        }));
        table.add_row(row);
    }
    table
}

/// Diagnostics in the order they were recorded.
#[must_use]
pub fn diagnostics_table(diagnostics: &[ParseError]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Line"),
        header_cell("Column"),
        header_cell("Defect"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for diagnostic in diagnostics {
        table.add_row(vec![
            Cell::new(diagnostic.line_number),
            diagnostic
                .column
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            defect_cell(diagnostic.kind),
        ]);
    }
    table
}

pub fn print_schema(schema: &Schema) {
    println!("{}", schema_table(schema));
}

/// Report diagnostics and the halting defect, if any, on stderr.
pub fn print_decode_report(outcome: &DecodeOutcome) {
    print_diagnostics(&outcome.diagnostics);
    if let Some(defect) = &outcome.halted {
        eprintln!("error: {defect}");
    }
}

pub fn print_check_report(outcome: &CheckOutcome) {
    println!(
        "Lines: {}  Records: {}  Defects: {}",
        outcome.lines_consumed,
        outcome.records,
        outcome.diagnostics.len()
    );
    if outcome.diagnostics.is_empty() {
        println!("No defects found.");
    } else {
        println!("{}", diagnostics_table(&outcome.diagnostics));
    }
    if let Some(defect) = &outcome.halted {
        eprintln!("error: {defect}");
    }
}

fn print_diagnostics(diagnostics: &[ParseError]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("Diagnostics:");
    eprintln!("{}", diagnostics_table(diagnostics));
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn defect_cell(kind: DefectKind) -> Cell {
    let color = match kind {
        DefectKind::LineTooLong | DefectKind::LineTooShort => Color::Yellow,
        DefectKind::EmptyColumn => Color::Magenta,
    };
    Cell::new(kind.description()).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
