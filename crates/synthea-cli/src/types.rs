use std::path::PathBuf;

use synthea_model::SourceTable;
use synthea_output::{ExportSummary, LoadedTable, StoreConfig};

/// Inputs of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Validated store settings; `None` skips the store load.
    pub store: Option<StoreConfig>,
}

impl IngestRequest {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            store: None,
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = Some(store);
        self
    }
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub output_dir: PathBuf,
    pub source_rows: Vec<(SourceTable, usize)>,
    pub feedback_rows: usize,
    pub files: ExportSummary,
    /// Present when the store was loaded.
    pub store: Option<StoreLoad>,
}

#[derive(Debug)]
pub struct StoreLoad {
    pub schema: String,
    pub tables: Vec<LoadedTable>,
}

impl IngestOutcome {
    /// Row counts keyed `<table>_rows`, feedback last.
    pub fn row_counts(&self) -> Vec<(String, usize)> {
        self.source_rows
            .iter()
            .map(|(source, rows)| (format!("{source}_rows"), *rows))
            .chain(std::iter::once((
                "patient_feedback_rows".to_string(),
                self.feedback_rows,
            )))
            .collect()
    }
}
