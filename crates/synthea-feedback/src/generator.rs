//! Feedback dataset generation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use synthea_model::{
    FEEDBACK_COLUMNS, FeedbackRecord, NpsCategory, text_values, timestamp_column,
    timestamp_values,
};
use tracing::{debug, info, info_span};

use crate::complaint::assess_complaint;
use crate::error::{FeedbackError, Result};
use crate::score::nps_score;

/// Encounter columns the generator reads.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "patient",
    "provider",
    "start",
    "stop",
    "encounterclass",
    "description",
    "reasondescription",
];

/// Encounter fields for one row of the encounters frame.
#[derive(Debug, Clone, Default)]
pub struct EncounterRow {
    pub id: Option<String>,
    pub patient: Option<String>,
    pub provider: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub stop: Option<DateTime<Utc>>,
    pub encounterclass: Option<String>,
    pub description: Option<String>,
    pub reasondescription: Option<String>,
}

/// Derive one feedback record per encounter, in encounter order.
///
/// `start` and `stop` must be `Datetime` columns; every other required
/// column is read as text.
pub fn generate_feedback(encounters: &DataFrame) -> Result<Vec<FeedbackRecord>> {
    let span = info_span!("feedback", encounters = encounters.height());
    let _guard = span.enter();

    let names = encounters.get_column_names_str();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !names.contains(*name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FeedbackError::MissingColumns { columns: missing });
    }

    let start = timestamps(encounters.column("start")?)?;
    let stop = timestamps(encounters.column("stop")?)?;
    let mut id = text_values(encounters.column("id")?)?.into_iter();
    let mut patient = text_values(encounters.column("patient")?)?.into_iter();
    let mut provider = text_values(encounters.column("provider")?)?.into_iter();
    let mut encounterclass = text_values(encounters.column("encounterclass")?)?.into_iter();
    let mut description = text_values(encounters.column("description")?)?.into_iter();
    let mut reason = text_values(encounters.column("reasondescription")?)?.into_iter();

    let records: Vec<FeedbackRecord> = start
        .into_iter()
        .zip(stop)
        .map(|(start, stop)| {
            derive_record(EncounterRow {
                id: id.next().flatten(),
                patient: patient.next().flatten(),
                provider: provider.next().flatten(),
                start,
                stop,
                encounterclass: encounterclass.next().flatten(),
                description: description.next().flatten(),
                reasondescription: reason.next().flatten(),
            })
        })
        .collect();

    let complaints = records.iter().filter(|r| r.complaint_flag).count();
    let mut by_category: BTreeMap<&'static str, usize> = BTreeMap::new();
    for record in &records {
        *by_category.entry(record.nps_category.as_str()).or_insert(0) += 1;
    }
    debug!(?by_category, "nps categories");
    info!(rows = records.len(), complaints, "feedback generated");

    Ok(records)
}

/// Derive the feedback record of a single encounter.
pub fn derive_record(encounter: EncounterRow) -> FeedbackRecord {
    let duration_hours = match (encounter.start, encounter.stop) {
        (Some(start), Some(stop)) => Some(hours_between(start, stop)),
        _ => None,
    };
    let score = nps_score(encounter.id.as_deref());
    let category = NpsCategory::from_score(score);
    let complaint = assess_complaint(score, duration_hours, encounter.encounterclass.as_deref());

    FeedbackRecord {
        consult_id: encounter.id,
        patient_id: encounter.patient,
        clinician_id: encounter.provider,
        consult_start: encounter.start,
        consult_stop: encounter.stop,
        encounterclass: encounter.encounterclass,
        consult_description: encounter.description,
        reason_description: encounter.reasondescription,
        consult_duration_hours: duration_hours,
        nps_score: score,
        nps_category: category,
        survey_response: category.survey_response(),
        complaint_flag: complaint.flag,
        complaint_category: complaint.category,
        qualitative_comment: category.comment(),
    }
}

/// Render feedback records as a frame with the published column order.
///
/// Timestamps are UTC `Datetime`, the duration is `Float64`, the score is
/// `Int64` and the complaint flag is `Boolean`.
pub fn feedback_table(records: &[FeedbackRecord]) -> Result<DataFrame> {
    let [
        consult_id,
        patient_id,
        clinician_id,
        consult_start,
        consult_stop,
        encounterclass,
        consult_description,
        reason_description,
        duration,
        score,
        category,
        response,
        complaint_flag,
        complaint_category,
        comment,
    ] = FEEDBACK_COLUMNS;

    let text = |name: &str, f: fn(&FeedbackRecord) -> Option<&str>| -> Column {
        let values: Vec<Option<&str>> = records.iter().map(f).collect();
        Series::new(name.into(), values).into_column()
    };
    let label = |name: &str, f: fn(&FeedbackRecord) -> &'static str| -> Column {
        let values: Vec<&str> = records.iter().map(f).collect();
        Series::new(name.into(), values).into_column()
    };

    let columns = vec![
        text(consult_id, |r| r.consult_id.as_deref()),
        text(patient_id, |r| r.patient_id.as_deref()),
        text(clinician_id, |r| r.clinician_id.as_deref()),
        timestamp_column(consult_start, records.iter().map(|r| r.consult_start)),
        timestamp_column(consult_stop, records.iter().map(|r| r.consult_stop)),
        text(encounterclass, |r| r.encounterclass.as_deref()),
        text(consult_description, |r| r.consult_description.as_deref()),
        text(reason_description, |r| r.reason_description.as_deref()),
        Series::new(
            duration.into(),
            records
                .iter()
                .map(|r| r.consult_duration_hours)
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            score.into(),
            records
                .iter()
                .map(|r| i64::from(r.nps_score))
                .collect::<Vec<_>>(),
        )
        .into_column(),
        label(category, |r| r.nps_category.as_str()),
        label(response, |r| r.survey_response.as_str()),
        Series::new(
            complaint_flag.into(),
            records.iter().map(|r| r.complaint_flag).collect::<Vec<_>>(),
        )
        .into_column(),
        label(complaint_category, |r| r.complaint_category.as_str()),
        label(comment, |r| r.qualitative_comment.as_str()),
    ];

    Ok(DataFrame::new_with_height(records.len(), columns)?)
}

fn hours_between(start: DateTime<Utc>, stop: DateTime<Utc>) -> f64 {
    let delta = stop - start;
    let seconds = delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1_000.0,
        |micros| micros as f64 / 1_000_000.0,
    );
    seconds / 3_600.0
}

fn timestamps(column: &Column) -> Result<Vec<Option<DateTime<Utc>>>> {
    if !matches!(column.dtype(), DataType::Datetime(..)) {
        return Err(FeedbackError::ColumnType {
            column: column.name().to_string(),
            expected: "a Datetime column".to_string(),
            found: column.dtype().clone(),
        });
    }
    Ok(timestamp_values(column)?)
}
