use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::info;

use synthea_cli::pipeline::run_ingest;
use synthea_cli::types::{IngestOutcome, IngestRequest};
use synthea_model::SourceTable;
use synthea_output::StoreConfig;

use crate::cli::IngestArgs;
use crate::summary::{apply_table_style, header_cell};

pub fn run_ingest_command(args: &IngestArgs) -> Result<IngestOutcome> {
    let mut request = IngestRequest::new(&args.input_dir, &args.output_dir);
    if args.load_db {
        // Checked before any file is read so a bad environment writes nothing.
        let config = StoreConfig::from_env().context("read PostgreSQL settings")?;
        info!(?config, "store load enabled");
        request = request.with_store(config);
    }
    run_ingest(&request)
}

pub fn run_tables() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("File"),
        header_cell("Datetime columns"),
        header_cell("Numeric columns"),
    ]);
    apply_table_style(&mut table);
    for source in SourceTable::ALL {
        table.add_row(vec![
            Cell::new(source.as_str()),
            Cell::new(source.file_name()),
            Cell::new(join_or_dash(source.datetime_columns())),
            Cell::new(join_or_dash(source.numeric_columns())),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn join_or_dash(columns: &[&str]) -> String {
    if columns.is_empty() {
        "-".to_string()
    } else {
        columns.join(", ")
    }
}
