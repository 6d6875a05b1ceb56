use super::{Mode, ValidationContext, Validator};
use crate::formatter::{keys, params};
use crate::model::staff::Period;
use crate::model::{ConstraintViolation, ViolationDetails, ViolationType};
use crate::temporal;
use chrono::NaiveDate;
use shared::Severity;

/// "Staff A must share at least N rest days with staff B per period":
/// counts the days in the period on which *neither* staff member has
/// any assignment. In check-assignment mode the day under
/// consideration is assumed taken, so it's subtracted up front — the
/// new assignment can only remove a potential shared rest day, never
/// add one.
pub struct RestDaysWithStaffValidator;

fn period_bounds(period: Period, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Week => (temporal::start_of_week(anchor), temporal::end_of_week(anchor)),
        Period::Month => (temporal::start_of_month(anchor), temporal::end_of_month(anchor)),
        Period::Day | Period::Year => (anchor, anchor),
    }
}

fn is_assigned_on(occurrences: &[crate::model::ShiftOccurrence], staff_id: shared::StaffId, date: NaiveDate) -> bool {
    occurrences
        .iter()
        .any(|occ| occ.start.date_naive() == date && occ.is_assigned(staff_id))
}

impl Validator for RestDaysWithStaffValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        let anchor = context.target_occurrence.start.date_naive();

        for rule in &context.target_staff.constraints.rest_days_with_staff {
            let (start, end) = period_bounds(rule.period, anchor);
            let days = temporal::enumerate_days(start, end);

            let mut shared_rest_days = days
                .iter()
                .filter(|&&day| {
                    !is_assigned_on(context.all_occurrences, context.target_staff.id, day)
                        && !is_assigned_on(context.all_occurrences, rule.peer, day)
                })
                .count() as i64;

            if context.mode == Mode::CheckAssignment {
                shared_rest_days -= 1;
            }

            if shared_rest_days >= rule.min_rest_days as i64 {
                continue;
            }

            let peer_name = context
                .staff_by_id(rule.peer)
                .map(|s| s.name.clone())
                .unwrap_or_default();

            let message = context.formatter.format(
                keys::REST_DAYS_WITH_STAFF,
                &params(&[
                    ("staff_name", context.target_staff.name.clone()),
                    ("peer_name", peer_name.clone()),
                    ("count", shared_rest_days.to_string()),
                    ("min", rule.min_rest_days.to_string()),
                ]),
            );

            violations.push(ConstraintViolation {
                id: format!(
                    "rest_days_with_staff:{}:{}:{}",
                    context.target_staff.id, rule.peer, context.target_occurrence.id
                ),
                staff_id: context.target_staff.id,
                staff_name: context.target_staff.name.clone(),
                kind: ViolationType::RestDaysWithStaff,
                severity: Severity::Error,
                message,
                details: ViolationDetails {
                    constraint_name: "rest_days_with_staff".to_string(),
                    current_value: Some(shared_rest_days),
                    limit_value: Some(rule.min_rest_days as i64),
                    related_staff_id: Some(rule.peer),
                    related_staff_name: Some(peer_name),
                    ..Default::default()
                },
                occurrence_id: Some(context.target_occurrence.id),
            });
        }

        violations
    }
}
