//! CSV file export of the processed tables.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use synthea_ingest::SourceTables;
use synthea_model::{FEEDBACK_TABLE_NAME, SourceTable};
use tracing::{info, info_span};

use crate::error::{ExportError, Result};

/// File name of the feedback dataset.
pub const FEEDBACK_FILE_NAME: &str = "patient_feedback_synthetic.csv";

/// Rendering of UTC timestamps in every CSV the pipeline writes.
///
/// Fractional seconds appear only when non-zero.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// File name of a cleaned source table.
pub fn clean_file_name(source: SourceTable) -> String {
    format!("{}_clean.csv", source.as_str())
}

/// A CSV writer with the pipeline's timestamp rendering.
pub(crate) fn csv_writer<W: Write>(buffer: W) -> CsvWriter<W> {
    CsvWriter::new(buffer).with_datetime_format(Some(DATETIME_FORMAT.to_string()))
}

/// One written output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTable {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Outputs written by [`export_csv`], source tables first, feedback last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub tables: Vec<ExportedTable>,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|table| table.rows).sum()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.tables.iter().map(|table| table.path.as_path())
    }
}

/// Write every source frame and the feedback frame under `output_dir`.
///
/// The directory is created if absent; existing files are overwritten.
pub fn export_csv(
    output_dir: &Path,
    sources: &SourceTables,
    feedback: &DataFrame,
) -> Result<ExportSummary> {
    let span = info_span!("export", sink = "csv", path = %output_dir.display());
    let _guard = span.enter();

    fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut summary = ExportSummary::default();
    for (source, frame) in sources.iter() {
        let path = output_dir.join(clean_file_name(source));
        summary
            .tables
            .push(write_table(&path, source.as_str(), frame)?);
    }
    let path = output_dir.join(FEEDBACK_FILE_NAME);
    summary
        .tables
        .push(write_table(&path, FEEDBACK_TABLE_NAME, feedback)?);

    info!(
        files = summary.tables.len(),
        rows = summary.total_rows(),
        "csv export complete"
    );
    Ok(summary)
}

/// Write one frame with a header row. Nulls are empty cells.
pub fn write_table(path: &Path, name: &str, frame: &DataFrame) -> Result<ExportedTable> {
    let start = Instant::now();
    let io_err = |source: std::io::Error| ExportError::CreateFile {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    csv_writer(&mut writer)
        .include_header(true)
        .finish(&mut frame.clone())
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(io_err)?;

    info!(
        table = name,
        rows = frame.height(),
        path = %path.display(),
        duration_ms = start.elapsed().as_millis(),
        "table written"
    );
    Ok(ExportedTable {
        name: name.to_string(),
        rows: frame.height(),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use synthea_model::timestamp_column;

    use super::*;

    fn render(frame: &DataFrame) -> String {
        let mut buffer = Vec::new();
        csv_writer(&mut buffer)
            .include_header(true)
            .finish(&mut frame.clone())
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn clean_file_names_follow_table_names() {
        assert_eq!(clean_file_name(SourceTable::Encounters), "encounters_clean.csv");
        assert_eq!(clean_file_name(SourceTable::Providers), "providers_clean.csv");
    }

    #[test]
    fn timestamps_are_rendered_in_utc_with_optional_fraction() {
        let whole = chrono::DateTime::from_timestamp(1_577_869_200, 0).unwrap();
        let fractional = chrono::DateTime::from_timestamp(1_577_869_200, 250_000_000).unwrap();
        let frame = DataFrame::new(vec![timestamp_column(
            "start",
            [Some(whole), Some(fractional), None],
        )])
        .unwrap();

        assert_eq!(
            render(&frame),
            "start\n2020-01-01T09:00:00Z\n2020-01-01T09:00:00.250Z\n\n"
        );
    }

    #[test]
    fn text_with_separators_is_quoted_and_nulls_are_empty() {
        let frame = DataFrame::new(vec![
            Series::new("reason".into(), [Some("a,b"), None, Some("")]).into_column(),
        ])
        .unwrap();
        assert_eq!(render(&frame), "reason\n\"a,b\"\n\n\"\"\n");
    }
}
