//! CSV file reading.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Cell contents read as null in every column, alongside empty fields.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads a comma-separated file with a single header row into a Polars frame.
///
/// Schema inference is disabled so every column arrives as text; typing is
/// the normalizer's job. Empty fields and [`NULL_TOKENS`] are read as null.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a regular file"),
        });
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_missing_is_null(true)
                .with_null_values(Some(NullValues::AllColumns(
                    NULL_TOKENS.iter().copied().map(PlSmallStr::from).collect(),
                ))),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_every_column_as_text() {
        let file = create_temp_csv("Id,Lat,Start\nP1,42.1,2020-01-01\nP2,x,\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
    }

    #[test]
    fn null_tokens_read_as_null() {
        let file =
            create_temp_csv("Id,Class,Reason\nE1,NA,N/A\nE2,NULL,ambulatory\nE3,nan,None\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.column("Class").unwrap().null_count(), 3);
        assert_eq!(df.column("Reason").unwrap().null_count(), 2);
        assert_eq!(df.column("Id").unwrap().null_count(), 0);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv_frame(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(IngestError::FileRead { .. })));
    }
}
