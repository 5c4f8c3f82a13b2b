//! Drop-and-recreate loading into PostgreSQL.
//!
//! Each table is replaced inside its own transaction: drop, create with
//! column types taken from the frame's dtypes, then a CSV `COPY`. A failure
//! rolls back only the table being written; tables replaced earlier in the
//! same run stay replaced.
//!
//! The statements are planned up front by [`store_plan`], which performs no
//! I/O; [`PostgresStore`] only executes a plan.

use std::io::Write;
use std::time::Instant;

use polars::prelude::{DataFrame, DataType, PolarsResult, QuoteStyle, SerWriter};
use postgres::{Client, NoTls};
use synthea_ingest::SourceTables;
use synthea_model::FEEDBACK_TABLE_NAME;
use tracing::{debug, info, info_span};

use crate::config::StoreConfig;
use crate::csv_export::csv_writer;
use crate::error::{ExportError, Result};

/// Marker written for null cells in the `COPY` payload.
pub const COPY_NULL: &str = "\\N";

/// Destination name of a processed table.
pub fn store_table_name(table: &str) -> String {
    format!("raw_{table}")
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// PostgreSQL column type for a frame dtype. Unlisted dtypes are stored as text.
pub fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::String => "TEXT",
        DataType::Float32 | DataType::Float64 => "DOUBLE PRECISION",
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::UInt8 | DataType::UInt16 => {
            "INTEGER"
        }
        DataType::Int64 | DataType::UInt32 | DataType::UInt64 => "BIGINT",
        DataType::Boolean => "BOOLEAN",
        DataType::Datetime(_, Some(_)) => "TIMESTAMPTZ",
        DataType::Datetime(_, None) => "TIMESTAMP",
        DataType::Date => "DATE",
        _ => "TEXT",
    }
}

fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

pub fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

pub fn drop_table_sql(schema: &str, table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", qualified(schema, table))
}

/// `CREATE TABLE` statement matching the dtypes of `frame`.
pub fn create_table_sql(schema: &str, table: &str, frame: &DataFrame) -> String {
    let columns: Vec<String> = frame
        .get_columns()
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                quote_ident(column.name()),
                sql_type(column.dtype())
            )
        })
        .collect();
    format!(
        "CREATE TABLE {} ({})",
        qualified(schema, table),
        columns.join(", ")
    )
}

pub fn copy_sql(schema: &str, table: &str, frame: &DataFrame) -> String {
    let columns: Vec<String> = frame
        .get_column_names_str()
        .into_iter()
        .map(quote_ident)
        .collect();
    format!(
        "COPY {} ({}) FROM STDIN (FORMAT csv, NULL '{}')",
        qualified(schema, table),
        columns.join(", "),
        COPY_NULL
    )
}

/// Rows of `frame` as headerless CSV for `COPY`.
///
/// Nulls are the bare [`COPY_NULL`] marker. Every non-null, non-numeric value
/// is quoted, so text that reads `\N` is not taken for a null.
pub fn copy_payload(frame: &DataFrame) -> PolarsResult<Vec<u8>> {
    let mut payload = Vec::new();
    csv_writer(&mut payload)
        .include_header(false)
        .with_quote_style(QuoteStyle::NonNumeric)
        .with_null_value(COPY_NULL.to_string())
        .finish(&mut frame.clone())?;
    Ok(payload)
}

/// Statements that replace one destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlan {
    pub name: String,
    pub drop: String,
    pub create: String,
    /// Absent for a frame without columns; there is nothing to copy.
    pub copy: Option<String>,
}

impl TablePlan {
    pub fn new(schema: &str, name: &str, frame: &DataFrame) -> Self {
        Self {
            name: name.to_string(),
            drop: drop_table_sql(schema, name),
            create: create_table_sql(schema, name, frame),
            copy: (frame.width() > 0).then(|| copy_sql(schema, name, frame)),
        }
    }
}

/// Everything a store load runs, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePlan {
    pub create_schema: String,
    pub tables: Vec<TablePlan>,
}

impl StorePlan {
    /// The plan as a flat statement list; each table sits in its own transaction.
    pub fn statements(&self) -> Vec<String> {
        let mut statements = vec![self.create_schema.clone()];
        for table in &self.tables {
            statements.push("BEGIN".to_string());
            statements.push(table.drop.clone());
            statements.push(table.create.clone());
            if let Some(copy) = &table.copy {
                statements.push(copy.clone());
            }
            statements.push("COMMIT".to_string());
        }
        statements
    }
}

/// Plan the replacement of each named frame, in the order given.
pub fn store_plan(schema: &str, tables: &[(&str, &DataFrame)]) -> StorePlan {
    StorePlan {
        create_schema: create_schema_sql(schema),
        tables: tables
            .iter()
            .map(|(name, frame)| TablePlan::new(schema, name, frame))
            .collect(),
    }
}

/// Rows written for one destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub name: String,
    pub rows: u64,
}

/// Blocking connection to the PostgreSQL store.
pub struct PostgresStore {
    client: Client,
    schema: String,
}

impl PostgresStore {
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let client = config
            .connection_params()
            .connect(NoTls)
            .map_err(|source| ExportError::Connect {
                host: config.host.clone(),
                port: config.port,
                database: config.database.clone(),
                source,
            })?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            schema = %config.schema,
            "connected to store"
        );
        Ok(Self {
            client,
            schema: config.schema.clone(),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Replace every source table and the feedback table in the store.
    pub fn replace_all(
        &mut self,
        sources: &SourceTables,
        feedback: &DataFrame,
    ) -> Result<Vec<LoadedTable>> {
        let span = info_span!("export", sink = "postgres", schema = %self.schema);
        let _guard = span.enter();

        let names: Vec<(String, &DataFrame)> = sources
            .iter()
            .map(|(source, frame)| (store_table_name(source.as_str()), frame))
            .chain([(store_table_name(FEEDBACK_TABLE_NAME), feedback)])
            .collect();
        let tables: Vec<(&str, &DataFrame)> = names
            .iter()
            .map(|(name, frame)| (name.as_str(), *frame))
            .collect();
        let plan = store_plan(&self.schema, &tables);

        self.client
            .batch_execute(&plan.create_schema)
            .map_err(|source| ExportError::Store {
                table: self.schema.clone(),
                source,
            })?;

        let mut loaded = Vec::with_capacity(plan.tables.len());
        for (table, (_, frame)) in plan.tables.iter().zip(&tables) {
            loaded.push(self.replace_table(table, frame)?);
        }

        let rows: u64 = loaded.iter().map(|table| table.rows).sum();
        info!(tables = loaded.len(), rows, "store load complete");
        Ok(loaded)
    }

    /// Drop, recreate and fill one table in a single transaction.
    pub fn replace_table(&mut self, plan: &TablePlan, frame: &DataFrame) -> Result<LoadedTable> {
        let start = Instant::now();
        let name = plan.name.clone();
        let store_err = |source: postgres::Error| ExportError::Store {
            table: name.clone(),
            source,
        };
        let copy_err = |source: std::io::Error| ExportError::Copy {
            table: name.clone(),
            source,
        };

        let payload = copy_payload(frame).map_err(|source| ExportError::Encode {
            table: name.clone(),
            source,
        })?;

        let mut tx = self.client.transaction().map_err(store_err)?;
        tx.batch_execute(&plan.drop).map_err(store_err)?;
        tx.batch_execute(&plan.create).map_err(store_err)?;

        let rows = match &plan.copy {
            Some(copy) => {
                let mut writer = tx.copy_in(copy.as_str()).map_err(store_err)?;
                writer.write_all(&payload).map_err(copy_err)?;
                writer.finish().map_err(store_err)?
            }
            None => 0,
        };
        tx.commit().map_err(store_err)?;

        debug!(bytes = payload.len(), "copy payload sent");
        info!(
            table = %name,
            rows,
            duration_ms = start.elapsed().as_millis(),
            "table replaced"
        );
        Ok(LoadedTable { name, rows })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series, TimeUnit};
    use synthea_model::timestamp_column;

    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("consult_id".into(), [Some("E1"), None]).into_column(),
            Series::new("nps_score".into(), [6i64, 9]).into_column(),
            Series::new("complaint_flag".into(), [true, false]).into_column(),
            Series::new("consult_duration_hours".into(), [Some(0.5), None]).into_column(),
            timestamp_column("consult_start", [None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("id"), "\"id\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn prefixes_store_table_names() {
        assert_eq!(store_table_name("encounters"), "raw_encounters");
        assert_eq!(store_table_name("patient_feedback"), "raw_patient_feedback");
    }

    #[test]
    fn sixty_four_bit_integers_are_bigint() {
        assert_eq!(sql_type(&DataType::Int64), "BIGINT");
        assert_eq!(sql_type(&DataType::UInt64), "BIGINT");
        assert_eq!(sql_type(&DataType::Int32), "INTEGER");
        assert_eq!(
            sql_type(&DataType::Datetime(TimeUnit::Microseconds, None)),
            "TIMESTAMP"
        );
        assert_eq!(sql_type(&DataType::Null), "TEXT");
    }

    #[test]
    fn create_table_uses_column_dtypes() {
        insta::assert_snapshot!(
            create_table_sql("digital_health", "raw_patient_feedback", &sample()),
            @r#"CREATE TABLE "digital_health"."raw_patient_feedback" ("consult_id" TEXT, "nps_score" BIGINT, "complaint_flag" BOOLEAN, "consult_duration_hours" DOUBLE PRECISION, "consult_start" TIMESTAMPTZ)"#
        );
    }

    #[test]
    fn copy_statement_names_columns_and_null_marker() {
        let sql = copy_sql("digital_health", "raw_patient_feedback", &sample());
        assert!(sql.starts_with("COPY \"digital_health\".\"raw_patient_feedback\" (\"consult_id\", "));
        assert!(sql.ends_with("FROM STDIN (FORMAT csv, NULL '\\N')"));
    }

    #[test]
    fn copy_payload_marks_nulls() {
        let payload = String::from_utf8(copy_payload(&sample()).unwrap()).unwrap();
        assert_eq!(
            payload,
            "\"E1\",6,\"true\",0.5,\\N\n\\N,9,\"false\",\\N,\\N\n"
        );
    }

    #[test]
    fn literal_null_marker_text_is_not_a_null() {
        let frame = DataFrame::new(vec![
            Series::new("reason".into(), [Some("\\N"), None]).into_column(),
        ])
        .unwrap();
        let payload = String::from_utf8(copy_payload(&frame).unwrap()).unwrap();
        assert_eq!(payload, "\"\\N\"\n\\N\n");
    }

    #[test]
    fn copy_payload_renders_timestamps_in_utc() {
        let at = chrono::Utc.with_ymd_and_hms(2020, 1, 1, 9, 30, 0).unwrap();
        let frame = DataFrame::new(vec![timestamp_column("start", [Some(at)])]).unwrap();
        let payload = String::from_utf8(copy_payload(&frame).unwrap()).unwrap();
        assert_eq!(payload, "\"2020-01-01T09:30:00Z\"\n");
    }

    #[test]
    fn schema_and_drop_statements() {
        assert_eq!(
            create_schema_sql("digital_health"),
            "CREATE SCHEMA IF NOT EXISTS \"digital_health\""
        );
        assert_eq!(
            drop_table_sql("s", "raw_encounters"),
            "DROP TABLE IF EXISTS \"s\".\"raw_encounters\""
        );
    }

    #[test]
    fn plan_replaces_each_table_in_its_own_transaction() {
        let providers = DataFrame::new(vec![
            Series::new("id".into(), ["PR1"]).into_column(),
            Series::new("utilization".into(), [1042.0]).into_column(),
        ])
        .unwrap();
        let empty = DataFrame::new(Vec::<Column>::new()).unwrap();
        let plan = store_plan(
            "digital_health",
            &[("raw_providers", &providers), ("raw_patient_feedback", &empty)],
        );

        insta::assert_snapshot!(plan.statements().join(";\n"), @r#"
        CREATE SCHEMA IF NOT EXISTS "digital_health";
        BEGIN;
        DROP TABLE IF EXISTS "digital_health"."raw_providers";
        CREATE TABLE "digital_health"."raw_providers" ("id" TEXT, "utilization" DOUBLE PRECISION);
        COPY "digital_health"."raw_providers" ("id", "utilization") FROM STDIN (FORMAT csv, NULL '\N');
        COMMIT;
        BEGIN;
        DROP TABLE IF EXISTS "digital_health"."raw_patient_feedback";
        CREATE TABLE "digital_health"."raw_patient_feedback" ();
        COMMIT
        "#);
    }
}
