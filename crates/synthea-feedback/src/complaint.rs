//! Complaint classification.

use synthea_model::{ComplaintCategory, NpsCategory};

/// Visits longer than this many hours raise a complaint regardless of score.
pub const LONG_VISIT_HOURS: f64 = 8.0;

/// Complaint fields of one feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Complaint {
    pub flag: bool,
    pub category: ComplaintCategory,
}

/// Decide the complaint fields from score, duration and encounter class.
///
/// A complaint is raised for detractor scores or visits longer than
/// [`LONG_VISIT_HOURS`]. A missing duration counts as zero.
pub fn assess_complaint(
    nps_score: u8,
    duration_hours: Option<f64>,
    encounter_class: Option<&str>,
) -> Complaint {
    let detractor = NpsCategory::from_score(nps_score) == NpsCategory::Detractor;
    let long_visit = duration_hours.unwrap_or(0.0) > LONG_VISIT_HOURS;
    let flag = detractor || long_visit;
    let category = if flag {
        complaint_category_for_class(encounter_class)
    } else {
        ComplaintCategory::NoComplaint
    };
    Complaint { flag, category }
}

/// Case-insensitive lookup of the concern raised for an encounter class.
pub fn complaint_category_for_class(encounter_class: Option<&str>) -> ComplaintCategory {
    let class = encounter_class.map(str::to_lowercase);
    match class.as_deref() {
        Some("wellness") => ComplaintCategory::ServiceQuality,
        Some("ambulatory") => ComplaintCategory::WaitTime,
        Some("emergency") => ComplaintCategory::EmergencyProcess,
        Some("inpatient") => ComplaintCategory::ContinuityOfCare,
        Some("urgentcare") => ComplaintCategory::UrgentCareFlow,
        _ => ComplaintCategory::General,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detractor_scores_raise_complaints() {
        let complaint = assess_complaint(6, Some(0.5), Some("Wellness"));
        assert!(complaint.flag);
        assert_eq!(complaint.category, ComplaintCategory::ServiceQuality);
    }

    #[test]
    fn long_visits_raise_complaints_for_promoters() {
        let complaint = assess_complaint(10, Some(8.5), Some("inpatient"));
        assert!(complaint.flag);
        assert_eq!(complaint.category, ComplaintCategory::ContinuityOfCare);
    }

    #[test]
    fn eight_hours_exactly_is_not_long() {
        let complaint = assess_complaint(7, Some(8.0), Some("emergency"));
        assert!(!complaint.flag);
        assert_eq!(complaint.category, ComplaintCategory::NoComplaint);
    }

    #[test]
    fn missing_duration_never_triggers() {
        let complaint = assess_complaint(9, None, Some("ambulatory"));
        assert_eq!(
            complaint,
            Complaint {
                flag: false,
                category: ComplaintCategory::NoComplaint
            }
        );
    }

    #[test]
    fn class_lookup_ignores_case() {
        assert_eq!(
            complaint_category_for_class(Some("URGENTCARE")),
            ComplaintCategory::UrgentCareFlow
        );
        assert_eq!(
            complaint_category_for_class(Some("Ambulatory")),
            ComplaintCategory::WaitTime
        );
        assert_eq!(
            complaint_category_for_class(Some("EMERGENCY")),
            ComplaintCategory::EmergencyProcess
        );
    }

    #[test]
    fn unknown_or_missing_class_is_general() {
        assert_eq!(
            complaint_category_for_class(Some("home")),
            ComplaintCategory::General
        );
        assert_eq!(
            complaint_category_for_class(Some("")),
            ComplaintCategory::General
        );
        assert_eq!(complaint_category_for_class(None), ComplaintCategory::General);
        assert_eq!(
            assess_complaint(2, None, None).category,
            ComplaintCategory::General
        );
    }
}
