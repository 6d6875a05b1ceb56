use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{BlockedTimeId, StaffId, TraitId};
use std::collections::HashSet;

/// Default caps, explicit rather than relying on zero/`Option::None`
/// falling out of language falsy semantics (see design note in spec).
pub const DEFAULT_MAX_SHIFTS_PER_DAY: u32 = 1;
pub const DEFAULT_MAX_SHIFTS_PER_WEEK: u32 = 5;
pub const DEFAULT_MAX_SHIFTS_PER_MONTH: u32 = 21;

/// A read-only snapshot of one staff member and the constraints that
/// apply to them. The scheduler and validator never mutate this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub trait_ids: HashSet<TraitId>,
    #[serde(default)]
    pub constraints: StaffConstraints,
    #[serde(default)]
    pub blocked_times: Vec<BlockedTime>,
}

impl StaffMember {
    pub fn has_trait(&self, trait_id: TraitId) -> bool {
        self.trait_ids.contains(&trait_id)
    }
}

/// Per-staff workload and rest-day rules. Every field is optional;
/// absence means the documented default applies, never an implicit
/// language-level falsy value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffConstraints {
    pub max_shifts_per_day: Option<u32>,
    pub max_shifts_per_week: Option<u32>,
    pub max_shifts_per_month: Option<u32>,
    /// No default in the source spec; this implementation resolves the
    /// "missing ⇒ 250 or Infinity" open question by treating a missing
    /// yearly cap as unbounded (see DESIGN.md).
    pub max_shifts_per_year: Option<u32>,
    #[serde(default)]
    pub incompatible_with: HashSet<StaffId>,
    #[serde(default)]
    pub rest_days_with_staff: Vec<RestDaysWithStaff>,
    #[serde(default)]
    pub consecutive_rest_days: Vec<ConsecutiveRestDays>,
}

impl Default for StaffConstraints {
    fn default() -> Self {
        Self {
            max_shifts_per_day: None,
            max_shifts_per_week: None,
            max_shifts_per_month: None,
            max_shifts_per_year: None,
            incompatible_with: HashSet::new(),
            rest_days_with_staff: Vec::new(),
            consecutive_rest_days: Vec::new(),
        }
    }
}

impl StaffConstraints {
    pub fn effective_max_per_day(&self) -> u32 {
        self.max_shifts_per_day.unwrap_or(DEFAULT_MAX_SHIFTS_PER_DAY)
    }

    pub fn effective_max_per_week(&self) -> u32 {
        self.max_shifts_per_week
            .unwrap_or(DEFAULT_MAX_SHIFTS_PER_WEEK)
    }

    pub fn effective_max_per_month(&self) -> u32 {
        self.max_shifts_per_month
            .unwrap_or(DEFAULT_MAX_SHIFTS_PER_MONTH)
    }

    /// `None` means unbounded — there is no documented default cap for
    /// the yearly period.
    pub fn effective_max_per_year(&self) -> Option<u32> {
        self.max_shifts_per_year
    }
}

/// Calendar period a cap or rest-day rule is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

/// "Staff A must share at least N rest days with staff B per period."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestDaysWithStaff {
    pub peer: StaffId,
    pub min_rest_days: u32,
    pub period: Period,
}

/// "Staff must have a run of at least N consecutive rest days per period."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsecutiveRestDays {
    pub min_consecutive_days: u32,
    pub period: Period,
}

/// An interval, possibly recurring, during which a staff member is
/// unavailable. Expansion into concrete occurrences lives in
/// [`crate::temporal`], alongside the rest of the period math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedTime {
    pub id: BlockedTimeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_full_day: bool,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    pub interval: u32,
    #[serde(default)]
    pub weekdays: HashSet<u8>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
}
