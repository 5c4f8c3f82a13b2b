//! Ingestion run: load, generate feedback, export.

use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span, trace};

use synthea_feedback::{feedback_table, generate_feedback};
use synthea_ingest::load_core_tables;
use synthea_model::{FeedbackRecord, SourceTable};
use synthea_output::{PostgresStore, export_csv};

use crate::logging::redact_value;
use crate::types::{IngestOutcome, IngestRequest, StoreLoad};

/// Run one ingestion.
///
/// Nothing is written unless every source loads and feedback generation
/// succeeds. Store settings are expected to be validated by the caller.
pub fn run_ingest(request: &IngestRequest) -> Result<IngestOutcome> {
    let span = info_span!(
        "ingest",
        input = %request.input_dir.display(),
        output = %request.output_dir.display(),
        load_db = request.store.is_some()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let sources = load_core_tables(&request.input_dir).with_context(|| {
        format!("load Synthea tables from {}", request.input_dir.display())
    })?;
    let encounters = sources
        .get(SourceTable::Encounters)
        .ok_or_else(|| anyhow!("encounters table was not loaded"))?;

    let records = generate_feedback(encounters).context("generate patient feedback")?;
    log_complaints(&records);
    let feedback = feedback_table(&records).context("build feedback table")?;

    let files = export_csv(&request.output_dir, &sources, &feedback).with_context(|| {
        format!("write outputs to {}", request.output_dir.display())
    })?;

    let store = match &request.store {
        Some(config) => {
            let mut store = PostgresStore::connect(config).context("connect to store")?;
            let tables = store
                .replace_all(&sources, &feedback)
                .context("load tables into store")?;
            Some(StoreLoad {
                schema: store.schema().to_string(),
                tables,
            })
        }
        None => None,
    };

    info!(
        tables = sources.len(),
        feedback_rows = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingestion complete"
    );

    Ok(IngestOutcome {
        output_dir: request.output_dir.clone(),
        source_rows: sources.row_counts(),
        feedback_rows: records.len(),
        files,
        store,
    })
}

fn log_complaints(records: &[FeedbackRecord]) {
    for record in records.iter().filter(|record| record.complaint_flag) {
        trace!(
            consult_id = redact_value(record.consult_id.as_deref().unwrap_or_default()),
            category = %record.complaint_category,
            "complaint raised"
        );
    }
}
