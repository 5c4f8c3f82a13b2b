//! Synthetic patient feedback derived from encounter records.
//!
//! Every encounter yields exactly one [`FeedbackRecord`]. The score comes
//! from an MD5 digest of the encounter id; everything else is a pure
//! function of the score, the visit duration, and the encounter class, so
//! regenerating from the same encounters reproduces the same dataset.
//!
//! [`FeedbackRecord`]: synthea_model::FeedbackRecord

#![deny(unsafe_code)]

pub mod complaint;
pub mod error;
pub mod generator;
pub mod score;

pub use complaint::{Complaint, assess_complaint, complaint_category_for_class};
pub use error::{FeedbackError, Result};
pub use generator::{
    EncounterRow, REQUIRED_COLUMNS, derive_record, feedback_table, generate_feedback,
};
pub use score::{NPS_HASH_ALGORITHM, nps_score};
