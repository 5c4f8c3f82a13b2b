//! Synthetic patient-feedback record and its categorical values.

use std::fmt;

use chrono::{DateTime, Utc};

/// Name of the feedback dataset wherever it is stored.
pub const FEEDBACK_TABLE_NAME: &str = "patient_feedback";

/// Output column order of the feedback dataset.
pub const FEEDBACK_COLUMNS: [&str; 15] = [
    "consult_id",
    "patient_id",
    "clinician_id",
    "consult_start",
    "consult_stop",
    "encounterclass",
    "consult_description",
    "reason_description",
    "consult_duration_hours",
    "nps_score",
    "nps_category",
    "survey_response",
    "complaint_flag",
    "complaint_category",
    "qualitative_comment",
];

/// Net Promoter band of a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NpsCategory {
    /// Scores 0-6. Also the fallback for labels that are neither
    /// `Promoter` nor `Passive` (see [`NpsCategory::from_label`]).
    #[default]
    Detractor,
    /// Scores 7-8.
    Passive,
    /// Scores 9-10.
    Promoter,
}

impl NpsCategory {
    /// Bin a score: `<= 6` Detractor, `7..=8` Passive, `>= 9` Promoter.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=6 => NpsCategory::Detractor,
            7..=8 => NpsCategory::Passive,
            _ => NpsCategory::Promoter,
        }
    }

    /// Read a category label as stored in an exported dataset.
    ///
    /// Exact `Promoter` and `Passive` map to their variants; any other label
    /// falls back to [`NpsCategory::Detractor`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Promoter" => NpsCategory::Promoter,
            "Passive" => NpsCategory::Passive,
            _ => NpsCategory::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NpsCategory::Detractor => "Detractor",
            NpsCategory::Passive => "Passive",
            NpsCategory::Promoter => "Promoter",
        }
    }

    pub fn survey_response(&self) -> SurveyResponse {
        match self {
            NpsCategory::Detractor => SurveyResponse::Dissatisfied,
            NpsCategory::Passive => SurveyResponse::Neutral,
            NpsCategory::Promoter => SurveyResponse::Satisfied,
        }
    }

    pub fn comment(&self) -> QualitativeComment {
        match self {
            NpsCategory::Promoter => QualitativeComment::Efficient,
            NpsCategory::Passive => QualitativeComment::RoomForImprovement,
            NpsCategory::Detractor => QualitativeComment::DelaysAndFollowUp,
        }
    }
}

impl fmt::Display for NpsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyResponse {
    Dissatisfied,
    Neutral,
    Satisfied,
}

impl SurveyResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyResponse::Dissatisfied => "Dissatisfied",
            SurveyResponse::Neutral => "Neutral",
            SurveyResponse::Satisfied => "Satisfied",
        }
    }
}

impl fmt::Display for SurveyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complaint classification attached to a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplaintCategory {
    NoComplaint,
    ServiceQuality,
    WaitTime,
    EmergencyProcess,
    ContinuityOfCare,
    UrgentCareFlow,
    General,
}

impl ComplaintCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintCategory::NoComplaint => "No complaint",
            ComplaintCategory::ServiceQuality => "Service quality concern",
            ComplaintCategory::WaitTime => "Wait time concern",
            ComplaintCategory::EmergencyProcess => "Emergency process concern",
            ComplaintCategory::ContinuityOfCare => "Continuity of care concern",
            ComplaintCategory::UrgentCareFlow => "Urgent care flow concern",
            ComplaintCategory::General => "General complaint",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed free-text comment templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualitativeComment {
    Efficient,
    RoomForImprovement,
    DelaysAndFollowUp,
}

impl QualitativeComment {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualitativeComment::Efficient => "Service was efficient and communication was clear.",
            QualitativeComment::RoomForImprovement => {
                "Care was acceptable but there is room for improvement."
            }
            QualitativeComment::DelaysAndFollowUp => {
                "I experienced delays and would like better follow-up."
            }
        }
    }
}

impl fmt::Display for QualitativeComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One synthetic feedback record, derived from exactly one encounter.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub consult_id: Option<String>,
    pub patient_id: Option<String>,
    pub clinician_id: Option<String>,
    pub consult_start: Option<DateTime<Utc>>,
    pub consult_stop: Option<DateTime<Utc>>,
    pub encounterclass: Option<String>,
    pub consult_description: Option<String>,
    pub reason_description: Option<String>,
    /// `consult_stop - consult_start` in hours; negative when stop precedes start.
    pub consult_duration_hours: Option<f64>,
    pub nps_score: u8,
    pub nps_category: NpsCategory,
    pub survey_response: SurveyResponse,
    pub complaint_flag: bool,
    pub complaint_category: ComplaintCategory,
    pub qualitative_comment: QualitativeComment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_scores_at_band_edges() {
        assert_eq!(NpsCategory::from_score(0), NpsCategory::Detractor);
        assert_eq!(NpsCategory::from_score(6), NpsCategory::Detractor);
        assert_eq!(NpsCategory::from_score(7), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_score(8), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_score(9), NpsCategory::Promoter);
        assert_eq!(NpsCategory::from_score(10), NpsCategory::Promoter);
    }

    #[test]
    fn unknown_label_falls_back_to_detractor() {
        assert_eq!(NpsCategory::from_label("Promoter"), NpsCategory::Promoter);
        assert_eq!(NpsCategory::from_label("Passive"), NpsCategory::Passive);
        assert_eq!(NpsCategory::from_label("promoter"), NpsCategory::Detractor);
        assert_eq!(NpsCategory::from_label(""), NpsCategory::Detractor);
        assert_eq!(
            NpsCategory::from_label("Unknown").comment().as_str(),
            "I experienced delays and would like better follow-up."
        );
    }

    #[test]
    fn responses_follow_categories() {
        assert_eq!(
            NpsCategory::Detractor.survey_response(),
            SurveyResponse::Dissatisfied
        );
        assert_eq!(NpsCategory::Passive.survey_response(), SurveyResponse::Neutral);
        assert_eq!(NpsCategory::Promoter.survey_response(), SurveyResponse::Satisfied);
    }
}
