use serde::{Deserialize, Serialize};
use shared::{OccurrenceId, Severity, StaffId};

/// Tagged-variant enum for the eight constraint kinds (design note
/// §9: "tagged-variant enum for ConstraintType").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    BlockedTime,
    IncompatibleStaff,
    DailyShiftLimit,
    WeeklyShiftLimit,
    MonthlyShiftLimit,
    YearlyShiftLimit,
    RestDaysWithStaff,
    ConsecutiveRestDays,
}

/// Structured detail payload, separate from the human-readable
/// `message` so callers can build their own UI around the numbers
/// without re-parsing prose.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViolationDetails {
    pub constraint_name: String,
    pub current_value: Option<i64>,
    pub limit_value: Option<i64>,
    pub period: Option<String>,
    pub related_staff_id: Option<StaffId>,
    pub related_staff_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub id: String,
    pub staff_id: StaffId,
    pub staff_name: String,
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub severity: Severity,
    pub message: String,
    pub details: ViolationDetails,
    /// Occurrence the violation was raised against, when applicable.
    pub occurrence_id: Option<OccurrenceId>,
}
