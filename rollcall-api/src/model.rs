//! Request and response payloads
//!
//! Response types default every field, so a partial payload still
//! deserializes. Text fields accept numbers and `null` too.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    Scheduled,
    Running,
    Completed,
    Cancelled,
}

impl PeriodStatus {
    pub const ALL: [PeriodStatus; 4] = [Self::Scheduled, Self::Running, Self::Completed, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Display label, e.g. `Running`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether attendance can be reviewed for a period in this state.
    pub fn has_attendance(self) -> bool {
        matches!(self, Self::Running | Self::Completed)
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status string that is not one of the four states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for PeriodStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

// =============================================================================
// Periods
// =============================================================================

/// One scheduled period as listed by the "today" endpoints.
///
/// The student listing has no id, class or teacher; those stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Period {
    pub id: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub class_name: String,
    #[serde(alias = "subject", deserialize_with = "lenient_string")]
    pub subject_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub teacher_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
}

impl Period {
    /// The parsed status, if the backend sent a known one.
    pub fn parsed_status(&self) -> Option<PeriodStatus> {
        self.status.parse().ok()
    }
}

/// Body of `POST /admin/api/periods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPeriod {
    pub teacher_subject_id: u64,
    #[serde(serialize_with = "day_month_year")]
    pub date: NaiveDate,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PeriodStatus>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: PeriodStatus,
}

/// A student of the period's class with their mark, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PeriodStudent {
    pub id: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub roll_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
}

impl PeriodStudent {
    pub fn is_present(&self) -> bool {
        self.status.eq_ignore_ascii_case("present")
    }
}

// =============================================================================
// Students and teachers
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct Enrollment {
    pub student_id: u64,
    pub class_id: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct Rejection {
    pub student_id: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct ClassAssignment {
    pub class_id: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct TeacherAssignment {
    pub class_id: u64,
    pub subject_id: u64,
}

// =============================================================================
// Images
// =============================================================================

/// One training image of a student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentImage {
    pub id: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub file_name: String,
    pub has_encoding: bool,
}

/// Image listing with counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageList {
    pub total_images: u32,
    pub encoded_images: u32,
    pub images: Vec<StudentImage>,
}

/// A file to upload as a training image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadReport {
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    pub uploaded_count: u32,
}

/// Outcome of an encoding run. The backend can report a failure with a
/// success status, so check [`EncodingReport::error`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncodingReport {
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    pub error: Option<String>,
    pub errors: Vec<String>,
}

// =============================================================================
// Generic replies
// =============================================================================

/// `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Ack {
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    pub success: Option<bool>,
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Strings pass through, `null` becomes empty and other scalars are printed.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn day_month_year<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%d/%m/%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_period_defaults() {
        let period: Period = serde_json::from_str(r#"{"subject": "Math", "status": null, "start_time": "09:00"}"#).unwrap();
        assert_eq!(period.id, 0);
        assert_eq!(period.subject_name, "Math");
        assert_eq!(period.status, "");
        assert_eq!(period.parsed_status(), None);
        assert_eq!(period.start_time, "09:00");
    }

    #[test]
    fn test_numeric_roll_no() {
        let student: PeriodStudent =
            serde_json::from_str(r#"{"id": 4, "roll_no": 17, "name": "Asha", "status": "present"}"#).unwrap();
        assert_eq!(student.roll_no, "17");
        assert!(student.is_present());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Running".parse(), Ok(PeriodStatus::Running));
        assert_eq!(" cancelled ".parse(), Ok(PeriodStatus::Cancelled));
        assert_eq!("late".parse::<PeriodStatus>(), Err(UnknownStatus("late".into())));
        assert!(PeriodStatus::Completed.has_attendance());
        assert!(!PeriodStatus::Scheduled.has_attendance());
    }

    #[test]
    fn test_new_period_wire_format() {
        let period = NewPeriod {
            teacher_subject_id: 12,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            start_time: "09:00".into(),
            end_time: "09:45".into(),
            status: None,
        };
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "teacher_subject_id": 12,
                "date": "05/03/2024",
                "start_time": "09:00",
                "end_time": "09:45",
            })
        );
    }
}
