use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use fieldnorm_standards::ColumnOrderReport;

use crate::commands::display_path;
use crate::types::NormalizeResult;

pub fn print_summary(result: &NormalizeResult) {
    println!("Schema: {}", result.schema);
    println!("Input: {}", display_path(&result.input));
    println!("Output: {}", display_path(&result.output));
    if let Some(path) = &result.report {
        println!("Report: {}", display_path(path));
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Valid"),
        header_cell("Null"),
        header_cell("Failed"),
        header_cell("Noted"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let (mut valid, mut nulls, mut failed, mut noted) = (0, 0, 0, 0);
    for field in &result.fields {
        valid += field.valid;
        nulls += field.nulls;
        failed += field.failed;
        noted += field.noted;
        table.add_row(vec![
            field_cell(&field.name, field.failed > 0),
            dim_cell(field.logical_type),
            Cell::new(field.valid),
            count_cell(field.nulls, Color::DarkGrey),
            count_cell(field.failed, Color::Red),
            count_cell(field.noted, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} rows", result.rows))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(valid).add_attribute(Attribute::Bold),
        count_cell(nulls, Color::DarkGrey).add_attribute(Attribute::Bold),
        count_cell(failed, Color::Red).add_attribute(Attribute::Bold),
        count_cell(noted, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if !result.missing_columns.is_empty() {
        eprintln!("Missing columns (treated as empty):");
        for name in &result.missing_columns {
            eprintln!("- {name}");
        }
    }
    if result.repaired_cells > 0 {
        eprintln!(
            "{} cells contained invalid UTF-8; the invalid bytes were dropped",
            result.repaired_cells
        );
    }
}

pub fn print_column_report(report: &ColumnOrderReport) {
    if report.is_ok() {
        println!("{report}");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Issue")]);
    apply_table_style(&mut table);
    for issue in &report.issues {
        table.add_row(vec![Cell::new(issue).fg(Color::Red)]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn field_cell(name: &str, has_failures: bool) -> Cell {
    if has_failures {
        Cell::new(name).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new(name).fg(Color::Blue)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
