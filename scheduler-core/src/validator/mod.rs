//! The constraint validator: eight independent checks over a single
//! (staff, occurrence, world) context, each producing structured
//! [`ConstraintViolation`](crate::model::ConstraintViolation) records.
//! Both the scheduler and UI-facing callers ("can this person take
//! that shift?", "is this shift properly staffed?") go through the
//! same registry so the semantics can never drift between them.

mod blocked_time;
mod consecutive_rest_days;
mod incompatible_staff;
mod rest_days_with_staff;
mod shift_limit;

use crate::formatter::Formatter;
use crate::model::{ConstraintViolation, ShiftOccurrence, StaffMember};
use chrono::NaiveDate;
use shared::StaffId;

/// Whether we're previewing a not-yet-made assignment or auditing one
/// that already exists. Cap-style validators branch on this exactly at
/// the comparison step (design note §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// "Would adding this assignment produce a violation?"
    CheckAssignment,
    /// "Does the current state already violate a rule?"
    ValidateExisting,
}

/// Everything a single validator kind needs to decide whether
/// `target_staff` can/does hold `target_occurrence`.
pub struct ValidationContext<'a> {
    pub target_staff: &'a StaffMember,
    pub target_occurrence: &'a ShiftOccurrence,
    pub all_staff: &'a [StaffMember],
    pub all_occurrences: &'a [ShiftOccurrence],
    pub evaluation_date: NaiveDate,
    pub mode: Mode,
    pub formatter: &'a dyn Formatter,
}

impl<'a> ValidationContext<'a> {
    pub fn staff_by_id(&self, id: StaffId) -> Option<&'a StaffMember> {
        self.all_staff.iter().find(|s| s.id == id)
    }
}

/// One of the eight constraint kinds.
pub trait Validator: Send + Sync {
    fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation>;
}

/// The fixed list of registered validators. Built once; read-only
/// thereafter (§5 resource discipline note — this is the one
/// "global-ish" structure the engine keeps).
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorRegistry {
    pub fn standard() -> Self {
        Self {
            validators: vec![
                Box::new(blocked_time::BlockedTimeValidator),
                Box::new(incompatible_staff::IncompatibleStaffValidator),
                Box::new(shift_limit::ShiftLimitValidator::daily()),
                Box::new(shift_limit::ShiftLimitValidator::weekly()),
                Box::new(shift_limit::ShiftLimitValidator::monthly()),
                Box::new(shift_limit::ShiftLimitValidator::yearly()),
                Box::new(rest_days_with_staff::RestDaysWithStaffValidator),
                Box::new(consecutive_rest_days::ConsecutiveRestDaysValidator),
            ],
        }
    }

    /// Run every validator kind, independent of each other — a
    /// failure in one never suppresses another — and return all
    /// violations sorted error-first.
    pub fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = self
            .validators
            .iter()
            .flat_map(|v| v.validate(context))
            .collect();
        violations.sort_by_key(|v| v.severity);
        violations
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
