//! Clinical section taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Section a line of a note belongs to
///
/// The set is closed: every rewrite decision in the engine is an exhaustive
/// `match` over these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    ChiefComplaint,
    HistoryOfPresentIllness,
    PastMedicalHistory,
    PastPsychiatricHistory,
    SocialHistory,
    FamilyHistory,
    SubstanceUse,
    Medications,
    Allergies,
    ReviewOfSystems,
    PhysicalExam,
    MentalStatusExam,
    Vitals,
    Labs,
    Imaging,
    Diagnosis,
    Assessment,
    Plan,
    HospitalCourse,
    Discharge,
    Procedures,
    FollowUp,
    /// No header precedes the line
    Plain,
}

/// How the content of a section is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    /// Tilde-delimited items become bulleted lines
    List,
    /// "Label Value" runs are split one pair per line
    Measurements,
    /// Sub-labels start new lines when the content is long
    Examination,
    /// Free text; only long content is detached from its header
    Prose,
    /// Whitespace normalization only
    Plain,
}

impl SectionType {
    /// Every section type, in declaration order
    pub const ALL: [SectionType; 23] = [
        SectionType::ChiefComplaint,
        SectionType::HistoryOfPresentIllness,
        SectionType::PastMedicalHistory,
        SectionType::PastPsychiatricHistory,
        SectionType::SocialHistory,
        SectionType::FamilyHistory,
        SectionType::SubstanceUse,
        SectionType::Medications,
        SectionType::Allergies,
        SectionType::ReviewOfSystems,
        SectionType::PhysicalExam,
        SectionType::MentalStatusExam,
        SectionType::Vitals,
        SectionType::Labs,
        SectionType::Imaging,
        SectionType::Diagnosis,
        SectionType::Assessment,
        SectionType::Plan,
        SectionType::HospitalCourse,
        SectionType::Discharge,
        SectionType::Procedures,
        SectionType::FollowUp,
        SectionType::Plain,
    ];

    /// Catalog identifier (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::ChiefComplaint => "chief_complaint",
            SectionType::HistoryOfPresentIllness => "history_of_present_illness",
            SectionType::PastMedicalHistory => "past_medical_history",
            SectionType::PastPsychiatricHistory => "past_psychiatric_history",
            SectionType::SocialHistory => "social_history",
            SectionType::FamilyHistory => "family_history",
            SectionType::SubstanceUse => "substance_use",
            SectionType::Medications => "medications",
            SectionType::Allergies => "allergies",
            SectionType::ReviewOfSystems => "review_of_systems",
            SectionType::PhysicalExam => "physical_exam",
            SectionType::MentalStatusExam => "mental_status_exam",
            SectionType::Vitals => "vitals",
            SectionType::Labs => "labs",
            SectionType::Imaging => "imaging",
            SectionType::Diagnosis => "diagnosis",
            SectionType::Assessment => "assessment",
            SectionType::Plan => "plan",
            SectionType::HospitalCourse => "hospital_course",
            SectionType::Discharge => "discharge",
            SectionType::Procedures => "procedures",
            SectionType::FollowUp => "follow_up",
            SectionType::Plain => "plain",
        }
    }

    /// Block expansion style for this section
    pub fn block_style(&self) -> BlockStyle {
        match self {
            SectionType::Medications | SectionType::Allergies | SectionType::Diagnosis => {
                BlockStyle::List
            }
            SectionType::Vitals | SectionType::Labs => BlockStyle::Measurements,
            SectionType::ReviewOfSystems
            | SectionType::PhysicalExam
            | SectionType::MentalStatusExam => BlockStyle::Examination,
            SectionType::ChiefComplaint
            | SectionType::HistoryOfPresentIllness
            | SectionType::PastMedicalHistory
            | SectionType::PastPsychiatricHistory
            | SectionType::SocialHistory
            | SectionType::FamilyHistory
            | SectionType::SubstanceUse
            | SectionType::Imaging
            | SectionType::Assessment
            | SectionType::Plan
            | SectionType::HospitalCourse
            | SectionType::Discharge
            | SectionType::Procedures
            | SectionType::FollowUp => BlockStyle::Prose,
            SectionType::Plain => BlockStyle::Plain,
        }
    }

    /// Whether a header introduced this section
    pub fn is_recognized(&self) -> bool {
        !matches!(self, SectionType::Plain)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(|c: char| c == '-' || c == ' ', "_");
        SectionType::ALL
            .iter()
            .copied()
            .find(|section| section.as_str() == normalized)
            .ok_or_else(|| format!("Unknown section type: {s}"))
    }
}

impl fmt::Display for BlockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockStyle::List => "list",
            BlockStyle::Measurements => "measurements",
            BlockStyle::Examination => "examination",
            BlockStyle::Prose => "prose",
            BlockStyle::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Classified range of lines in a working buffer
///
/// Covers the half-open line range `start..end`. Spans exist only for the
/// duration of one format call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpan {
    /// Section shared by every line in the span
    pub section: SectionType,
    /// First line index
    pub start: usize,
    /// One past the last line index
    pub end: usize,
}

impl SectionSpan {
    /// Number of lines covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no lines
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_catalog_names() {
        for section in SectionType::ALL {
            assert_eq!(section.as_str().parse::<SectionType>().unwrap(), section);
        }
    }

    #[test]
    fn test_from_str_accepts_loose_spelling() {
        assert_eq!(
            "Physical Exam".parse::<SectionType>().unwrap(),
            SectionType::PhysicalExam
        );
        assert_eq!(
            "follow-up".parse::<SectionType>().unwrap(),
            SectionType::FollowUp
        );
        assert!("vital_statistics".parse::<SectionType>().is_err());
    }

    #[test]
    fn test_block_styles() {
        assert_eq!(SectionType::Medications.block_style(), BlockStyle::List);
        assert_eq!(SectionType::Diagnosis.block_style(), BlockStyle::List);
        assert_eq!(SectionType::Labs.block_style(), BlockStyle::Measurements);
        assert_eq!(
            SectionType::MentalStatusExam.block_style(),
            BlockStyle::Examination
        );
        assert_eq!(SectionType::Plan.block_style(), BlockStyle::Prose);
        assert_eq!(SectionType::Plain.block_style(), BlockStyle::Plain);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&SectionType::MentalStatusExam).unwrap();
        assert_eq!(json, "\"mental_status_exam\"");
    }

    #[test]
    fn test_span_len() {
        let span = SectionSpan {
            section: SectionType::Labs,
            start: 2,
            end: 5,
        };
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
    }
}
