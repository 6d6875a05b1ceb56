use super::{Mode, ValidationContext, Validator};
use crate::formatter::{keys, params};
use crate::model::staff::Period;
use crate::model::{ConstraintViolation, ViolationDetails, ViolationType};
use crate::temporal;
use chrono::NaiveDate;
use shared::Severity;

/// "Staff must have a run of at least N consecutive rest days per
/// period": computes the sequence of rest days (no assignment) in the
/// period and finds the longest run of adjacent calendar days. In
/// `check-assignment` mode the day under evaluation is treated as
/// worked regardless of what `all_occurrences` currently holds there,
/// the same way [`super::shift_limit::ShiftLimitValidator`] folds the
/// pending assignment into its count.
pub struct ConsecutiveRestDaysValidator;

fn period_bounds(period: Period, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Week => (temporal::start_of_week(anchor), temporal::end_of_week(anchor)),
        Period::Month => (temporal::start_of_month(anchor), temporal::end_of_month(anchor)),
        Period::Day | Period::Year => (anchor, anchor),
    }
}

fn longest_consecutive_run(rest_days: &[bool]) -> u32 {
    let mut longest = 0u32;
    let mut current = 0u32;
    for &is_rest in rest_days {
        if is_rest {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

impl Validator for ConsecutiveRestDaysValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        let anchor = context.target_occurrence.start.date_naive();
        let staff_id = context.target_staff.id;

        for rule in &context.target_staff.constraints.consecutive_rest_days {
            let (start, end) = period_bounds(rule.period, anchor);
            let days = temporal::enumerate_days(start, end);

            let rest_flags: Vec<bool> = days
                .iter()
                .map(|&day| {
                    if context.mode == Mode::CheckAssignment && day == anchor {
                        return false;
                    }
                    !context
                        .all_occurrences
                        .iter()
                        .any(|occ| occ.start.date_naive() == day && occ.is_assigned(staff_id))
                })
                .collect();

            let longest = longest_consecutive_run(&rest_flags);

            if longest >= rule.min_consecutive_days {
                continue;
            }

            let message = context.formatter.format(
                keys::CONSECUTIVE_REST_DAYS,
                &params(&[
                    ("staff_name", context.target_staff.name.clone()),
                    ("longest", longest.to_string()),
                    ("min", rule.min_consecutive_days.to_string()),
                ]),
            );

            violations.push(ConstraintViolation {
                id: format!(
                    "consecutive_rest_days:{}:{}",
                    staff_id, context.target_occurrence.id
                ),
                staff_id,
                staff_name: context.target_staff.name.clone(),
                kind: ViolationType::ConsecutiveRestDays,
                severity: Severity::Error,
                message,
                details: ViolationDetails {
                    constraint_name: "consecutive_rest_days".to_string(),
                    current_value: Some(longest as i64),
                    limit_value: Some(rule.min_consecutive_days as i64),
                    ..Default::default()
                },
                occurrence_id: Some(context.target_occurrence.id),
            });
        }

        violations
    }
}
