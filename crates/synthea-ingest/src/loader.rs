//! Loading of the required Synthea source tables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::DataFrame;
use synthea_model::SourceTable;
use tracing::{info, info_span};

use crate::error::{IngestError, Result};
use crate::normalize::normalize_frame;
use crate::reader::read_csv_frame;

/// Normalized source frames keyed by table, iterated in load order.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    tables: BTreeMap<SourceTable, DataFrame>,
}

impl SourceTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: SourceTable, frame: DataFrame) {
        self.tables.insert(source, frame);
    }

    pub fn get(&self, source: SourceTable) -> Option<&DataFrame> {
        self.tables.get(&source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceTable, &DataFrame)> {
        self.tables.iter().map(|(source, frame)| (*source, frame))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Row count per table in load order.
    pub fn row_counts(&self) -> Vec<(SourceTable, usize)> {
        self.iter()
            .map(|(source, frame)| (source, frame.height()))
            .collect()
    }
}

/// Resolve the expected path of every required source under `input_dir`.
///
/// Fails on the first table whose file is absent, before anything is read.
pub fn required_source_paths(input_dir: &Path) -> Result<Vec<(SourceTable, PathBuf)>> {
    if !input_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    SourceTable::ALL
        .into_iter()
        .map(|source| {
            let path = input_dir.join(source.file_name());
            if path.is_file() {
                Ok((source, path))
            } else {
                Err(IngestError::MissingSource {
                    table: source,
                    path,
                })
            }
        })
        .collect()
}

/// Load and normalize every required source table from `input_dir`.
pub fn load_core_tables(input_dir: &Path) -> Result<SourceTables> {
    let sources = required_source_paths(input_dir)?;
    let mut tables = SourceTables::new();

    for (source, path) in sources {
        let span = info_span!("load_table", table = %source, path = %path.display());
        let _guard = span.enter();
        let start = Instant::now();

        let raw = read_csv_frame(&path)?;
        let (frame, stats) = normalize_frame(source, &raw)?;
        info!(
            rows = frame.height(),
            columns = frame.width(),
            datetime_columns = stats.datetime_columns,
            numeric_columns = stats.numeric_columns,
            coerced_nulls = stats.coerced_nulls,
            duration_ms = start.elapsed().as_millis(),
            "table loaded"
        );
        tables.insert(source, frame);
    }

    Ok(tables)
}
