//! Polars helpers for the columns every pipeline stage shares.
//!
//! Timestamps are stored as `Datetime(Microseconds, Some(UTC))`. Text is read
//! through a cast to `String`, so any column can be viewed as optional text.

use chrono::{DateTime, Utc};
use polars::prelude::{
    Column, DataType, Int64Chunked, IntoColumn, NewChunkedArray, PlSmallStr, PolarsResult,
    TimeUnit, TimeZone,
};

/// Resolution of every timestamp column the pipeline builds.
pub const TIMESTAMP_UNIT: TimeUnit = TimeUnit::Microseconds;

pub fn utc_timestamp_dtype() -> DataType {
    DataType::Datetime(TIMESTAMP_UNIT, Some(TimeZone::UTC))
}

/// True for a `Datetime` column carrying the UTC zone, at any resolution.
pub fn is_utc_timestamp(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, Some(tz)) if *tz == TimeZone::UTC)
}

/// Build a UTC timestamp column from optional instants.
pub fn timestamp_column<I>(name: &str, values: I) -> Column
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    Int64Chunked::from_iter_options(
        PlSmallStr::from(name),
        values
            .into_iter()
            .map(|value| value.map(|at| at.timestamp_micros())),
    )
    .into_datetime(TIMESTAMP_UNIT, Some(TimeZone::UTC))
    .into_column()
}

/// Read a `Datetime` column back as UTC instants.
///
/// Fails with a schema error when the column is not a `Datetime`.
pub fn timestamp_values(column: &Column) -> PolarsResult<Vec<Option<DateTime<Utc>>>> {
    let values = column.datetime()?;
    let unit = values.time_unit();
    Ok(values
        .physical()
        .iter()
        .map(|raw| raw.and_then(|raw| from_raw(raw, unit)))
        .collect())
}

/// Read any column as optional text.
pub fn text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn from_raw(raw: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(raw)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(raw),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw),
    }
}
