use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use rma_common::any_to_string;
use rma_map::ClosestHeader;
use rma_model::{ReportOutcome, ReportResult, Role, SemanticField};
use rma_report::TemplateInfo;
use rma_transform::IgnoredConstraint;

pub fn print_result(result: &ReportResult, ignored: &[IgnoredConstraint]) {
    println!("{}", result.title);
    for constraint in ignored {
        eprintln!("note: ignored {constraint} (column not found)");
    }
    match &result.outcome {
        ReportOutcome::Table(frame) => {
            println!("{}", result_table(frame));
            println!("{} row(s)", frame.height());
        }
        ReportOutcome::Empty => println!("No matching data."),
        ReportOutcome::MissingColumns(columns) => {
            eprintln!("Missing columns:");
            for column in columns {
                eprintln!("- {}", column.label());
            }
        }
    }
}

pub fn result_table(frame: &DataFrame) -> Table {
    let mut table = Table::new();
    let columns = frame.get_columns();
    table.set_header(
        columns
            .iter()
            .map(|column| header_cell(column.name().as_str()))
            .collect::<Vec<_>>(),
    );
    apply_result_table_style(&mut table);
    for (index, column) in columns.iter().enumerate() {
        if column.dtype().is_numeric() {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    for row in 0..frame.height() {
        table.add_row(
            columns
                .iter()
                .map(|column| value_cell(column.get(row).unwrap_or(AnyValue::Null)))
                .collect::<Vec<_>>(),
        );
    }
    table
}

pub fn print_reports(reports: &[TemplateInfo], role: Role) {
    println!("Reports available to {role}:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Report"),
        header_cell("Description"),
        header_cell("Parameters"),
        header_cell("Role"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for info in reports {
        table.add_row(vec![
            Cell::new(info.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(info.summary),
            params_cell(info),
            Cell::new(info.min_role),
        ]);
    }
    println!("{table}");
}

pub fn print_columns(resolved: &[(SemanticField, Option<String>, Option<ClosestHeader>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Hint"),
    ]);
    apply_table_style(&mut table);
    for (field, header, hint) in resolved {
        let column_cell = match header {
            Some(header) => Cell::new(header).fg(Color::Green),
            None => Cell::new("not found")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        };
        let hint_cell = match hint {
            Some(hint) => Cell::new(format!(
                "closest: {} ({:.0}% like '{}')",
                hint.header,
                hint.similarity * 100.0,
                hint.candidate
            ))
            .fg(Color::Yellow),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(field), column_cell, hint_cell]);
    }
    println!("{table}");
}

fn params_cell(info: &TemplateInfo) -> Cell {
    let mut parts: Vec<String> = info.required.iter().map(|p| p.name().to_string()).collect();
    parts.extend(info.optional.iter().map(|p| format!("[{}]", p.name())));
    if parts.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(parts.join(" "))
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_result_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn value_cell(value: AnyValue<'_>) -> Cell {
    if matches!(value, AnyValue::Null) {
        return dim_cell("-");
    }
    let is_zero = match value {
        AnyValue::UInt32(v) => v == 0,
        AnyValue::Float64(v) => v == 0.0,
        _ => false,
    };
    let text = any_to_string(value);
    if is_zero {
        dim_cell(text)
    } else {
        Cell::new(text)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
