use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use synthea_cli::types::IngestOutcome;

pub fn print_summary(outcome: &IngestOutcome) {
    println!("Output: {}", outcome.output_dir.display());
    if let Some(store) = &outcome.store {
        println!("Store schema: {}", store.schema);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Rows"),
        header_cell("File"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let files = outcome.files.tables.iter();
    let mut total = 0usize;
    for ((label, rows), file) in outcome.row_counts().into_iter().zip(files) {
        total += rows;
        let file_name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(label).fg(Color::Blue),
            count_cell(rows),
            Cell::new(file_name),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    if let Some(store) = &outcome.store {
        let mut loaded = Table::new();
        loaded.set_header(vec![header_cell("Store table"), header_cell("Rows")]);
        apply_table_style(&mut loaded);
        align_column(&mut loaded, 1, CellAlignment::Right);
        for table in &store.tables {
            loaded.add_row(vec![Cell::new(&table.name), Cell::new(table.rows)]);
        }
        println!("{loaded}");
    }
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(rows: usize) -> Cell {
    if rows == 0 {
        Cell::new(rows).fg(Color::Yellow)
    } else {
        Cell::new(rows)
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
