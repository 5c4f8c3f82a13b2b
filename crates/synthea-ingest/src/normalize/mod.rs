//! Column-name normalization and per-table type coercion.
//!
//! A raw frame becomes a typed frame:
//!
//! - column names are lowercased and reduced to `[a-z0-9_]`
//! - declared datetime columns are parsed to `Datetime(Microseconds, UTC)`
//! - declared numeric columns are parsed to `Float64`
//! - every other textual column is trimmed, and empty cells become null
//!
//! Malformed cells become null. Nothing here fails because of cell contents.

pub mod datetime;
pub mod numeric;

use std::collections::HashSet;

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use synthea_model::{SourceTable, text_values, timestamp_column};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

pub use datetime::parse_timestamp;
pub use numeric::parse_f64;

/// Counts gathered while normalizing one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Columns parsed as datetimes.
    pub datetime_columns: usize,
    /// Columns parsed as numbers.
    pub numeric_columns: usize,
    /// Non-empty cells that failed to parse and were set to null.
    pub coerced_nulls: usize,
}

/// Normalize a raw column name.
///
/// Lowercases, turns every run of characters outside `[a-z0-9]` into a
/// single `_`, and drops leading and trailing separators. Idempotent.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.push(ch);
        } else {
            pending_separator = true;
        }
    }
    normalized
}

/// Normalize a raw frame read for `table`.
///
/// Declared columns absent from the frame are ignored. Column order and row
/// count are kept. Fails only when two headers normalize to the same name.
pub fn normalize_frame(
    table: SourceTable,
    frame: &DataFrame,
) -> Result<(DataFrame, NormalizeStats)> {
    let mut columns = Vec::with_capacity(frame.width());
    let mut seen = HashSet::with_capacity(frame.width());
    let mut stats = NormalizeStats::default();

    for raw in frame.get_columns() {
        let name = normalize_column_name(raw.name().as_str());
        if !seen.insert(name.clone()) {
            return Err(IngestError::DuplicateColumn {
                table,
                column: name,
            });
        }

        let column = if table.is_datetime_column(&name) {
            stats.datetime_columns += 1;
            let (column, failed) = coerce_timestamps(&name, raw)?;
            stats.coerced_nulls += failed;
            column
        } else if table.is_numeric_column(&name) {
            stats.numeric_columns += 1;
            let (column, failed) = coerce_numbers(&name, raw)?;
            stats.coerced_nulls += failed;
            column
        } else {
            passthrough(&name, raw)?
        };

        debug!(
            table = %table,
            raw_column = %raw.name(),
            column = %name,
            dtype = %column.dtype(),
            "normalized column"
        );
        columns.push(column);
    }

    if stats.coerced_nulls > 0 {
        warn!(
            table = %table,
            coerced_nulls = stats.coerced_nulls,
            "unparseable values replaced with null"
        );
    }

    let normalized = DataFrame::new_with_height(frame.height(), columns)?;
    Ok((normalized, stats))
}

fn coerce_timestamps(name: &str, raw: &Column) -> Result<(Column, usize)> {
    let mut failed = 0usize;
    let values: Vec<_> = text_values(raw)?
        .into_iter()
        .map(|value| {
            let value = value?;
            let parsed = parse_timestamp(&value);
            if parsed.is_none() && !value.trim().is_empty() {
                failed += 1;
            }
            parsed
        })
        .collect();
    Ok((timestamp_column(name, values), failed))
}

fn coerce_numbers(name: &str, raw: &Column) -> Result<(Column, usize)> {
    if is_numeric_dtype(raw.dtype()) {
        let mut column = raw.cast(&DataType::Float64)?;
        column.rename(name.into());
        return Ok((column, 0));
    }
    let mut failed = 0usize;
    let values: Vec<Option<f64>> = text_values(raw)?
        .into_iter()
        .map(|value| {
            let value = value?;
            let parsed = parse_f64(&value);
            if parsed.is_none() && !value.trim().is_empty() {
                failed += 1;
            }
            parsed
        })
        .collect();
    Ok((Series::new(name.into(), values).into_column(), failed))
}

/// Undeclared columns: text is trimmed, native numbers and booleans keep their type.
///
/// An empty cell, quoted or not, is null. A cell of blanks trims to an empty
/// string and stays non-null.
fn passthrough(name: &str, raw: &Column) -> Result<Column> {
    let dtype = raw.dtype();
    if is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean) {
        let mut column = raw.clone();
        column.rename(name.into());
        return Ok(column);
    }
    let values: Vec<Option<String>> = text_values(raw)?
        .into_iter()
        .map(|value| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| v.trim().to_string())
        })
        .collect();
    Ok(Series::new(name.into(), values).into_column())
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}
