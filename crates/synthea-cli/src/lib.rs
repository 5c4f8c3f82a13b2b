//! Library side of the `synthea-pipeline` command.

pub mod logging;
pub mod pipeline;
pub mod types;

pub use pipeline::run_ingest;
pub use types::{IngestOutcome, IngestRequest, StoreLoad};
