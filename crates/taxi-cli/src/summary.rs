//! Console rendering of the run report.

use std::collections::BTreeSet;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use taxi_cli::types::RunReport;

pub fn print_run_summary(report: &RunReport) {
    println!("Dataset: {}", report.dataset.display());
    println!("Table: {}", report.table);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows fetched"),
        header_cell("Rows loaded"),
        header_cell("Invalid cells"),
        header_cell("Filled cells"),
        header_cell("Residual nulls"),
        header_cell("Duration (ms)"),
    ]);
    apply_table_style(&mut table);
    for idx in 0..6 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.rows_fetched),
        Cell::new(report.rows_loaded),
        count_cell(report.coercion.total_invalid(), Color::Yellow),
        count_cell(report.coercion.total_filled(), Color::Cyan),
        count_cell(report.coercion.total_residual_nulls(), Color::Yellow),
        Cell::new(report.duration_ms),
    ]);
    println!("{table}");
    print_anomaly_table(report);
}

/// Per-column anomaly detail, omitted for clean runs.
fn print_anomaly_table(report: &RunReport) {
    if report.coercion.is_clean() {
        return;
    }
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    columns.extend(report.coercion.invalid.keys().map(String::as_str));
    columns.extend(report.coercion.filled.keys().map(String::as_str));
    columns.extend(report.coercion.residual_nulls.keys().map(String::as_str));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Invalid"),
        header_cell("Filled"),
        header_cell("Residual nulls"),
    ]);
    apply_table_style(&mut table);
    for idx in 1..4 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for column in columns {
        table.add_row(vec![
            Cell::new(column),
            count_cell(count_for(&report.coercion.invalid, column), Color::Yellow),
            count_cell(count_for(&report.coercion.filled, column), Color::Cyan),
            count_cell(
                count_for(&report.coercion.residual_nulls, column),
                Color::Yellow,
            ),
        ]);
    }
    println!("{table}");
}

fn count_for(counts: &std::collections::BTreeMap<String, usize>, column: &str) -> usize {
    counts.get(column).copied().unwrap_or(0)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color)
    }
}
