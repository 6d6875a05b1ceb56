use super::{Mode, ValidationContext, Validator};
use crate::formatter::{keys, params};
use crate::model::{staff::Period, ConstraintViolation, ViolationDetails, ViolationType};
use crate::temporal;
use shared::Severity;

/// Daily/weekly/monthly/yearly shift-count cap, one instance per
/// period. Counts how many occurrences in the period anchored on the
/// target occurrence's start already have `target_staff` assigned and
/// compares against that staff member's cap for the period.
///
/// The mode flag changes the comparison exactly at this point (design
/// note §9): `check-assignment` asks "would the new assignment push us
/// over?" (`count + 1 > cap`); `validate-existing` asks "are we over
/// already?" (`count > cap`).
pub struct ShiftLimitValidator {
    period: Period,
}

impl ShiftLimitValidator {
    pub fn daily() -> Self {
        Self { period: Period::Day }
    }
    pub fn weekly() -> Self {
        Self { period: Period::Week }
    }
    pub fn monthly() -> Self {
        Self { period: Period::Month }
    }
    pub fn yearly() -> Self {
        Self { period: Period::Year }
    }

    fn violation_type(&self) -> ViolationType {
        match self.period {
            Period::Day => ViolationType::DailyShiftLimit,
            Period::Week => ViolationType::WeeklyShiftLimit,
            Period::Month => ViolationType::MonthlyShiftLimit,
            Period::Year => ViolationType::YearlyShiftLimit,
        }
    }

    fn message_key(&self) -> &'static str {
        match self.period {
            Period::Day => keys::DAILY_SHIFT_LIMIT,
            Period::Week => keys::WEEKLY_SHIFT_LIMIT,
            Period::Month => keys::MONTHLY_SHIFT_LIMIT,
            Period::Year => keys::YEARLY_SHIFT_LIMIT,
        }
    }

    fn period_label_key(&self) -> &'static str {
        match self.period {
            Period::Day => keys::PERIOD_DAY,
            Period::Week => keys::PERIOD_WEEK,
            Period::Month => keys::PERIOD_MONTH,
            Period::Year => keys::PERIOD_YEAR,
        }
    }

    fn cap(&self, context: &ValidationContext) -> Option<u32> {
        let constraints = &context.target_staff.constraints;
        match self.period {
            Period::Day => Some(constraints.effective_max_per_day()),
            Period::Week => Some(constraints.effective_max_per_week()),
            Period::Month => Some(constraints.effective_max_per_month()),
            Period::Year => constraints.effective_max_per_year(),
        }
    }

    fn period_bounds(&self, context: &ValidationContext) -> (chrono::NaiveDate, chrono::NaiveDate) {
        let anchor = context.target_occurrence.start.date_naive();
        match self.period {
            Period::Day => (temporal::start_of_day(anchor), temporal::end_of_day(anchor)),
            Period::Week => (temporal::start_of_week(anchor), temporal::end_of_week(anchor)),
            Period::Month => (temporal::start_of_month(anchor), temporal::end_of_month(anchor)),
            Period::Year => (temporal::start_of_year(anchor), temporal::end_of_year(anchor)),
        }
    }
}

impl Validator for ShiftLimitValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation> {
        let Some(cap) = self.cap(context) else {
            return vec![];
        };

        let (period_start, period_end) = self.period_bounds(context);
        let staff_id = context.target_staff.id;

        let count = context
            .all_occurrences
            .iter()
            .filter(|occ| {
                let date = occ.start.date_naive();
                date >= period_start && date <= period_end && occ.is_assigned(staff_id)
            })
            .count() as u32;

        let over_limit = match context.mode {
            Mode::CheckAssignment => count + 1 > cap,
            Mode::ValidateExisting => count > cap,
        };

        if !over_limit {
            return vec![];
        }

        let period_label = context.formatter.format(self.period_label_key(), &params(&[
            ("start", period_start.to_string()),
            ("end", period_end.to_string()),
        ]));

        let message = context.formatter.format(
            self.message_key(),
            &params(&[
                ("staff_name", context.target_staff.name.clone()),
                ("count", count.to_string()),
                ("cap", cap.to_string()),
                ("period", period_label.clone()),
            ]),
        );

        vec![ConstraintViolation {
            id: format!(
                "{:?}:{}:{}",
                self.violation_type(),
                staff_id,
                context.target_occurrence.id
            ),
            staff_id,
            staff_name: context.target_staff.name.clone(),
            kind: self.violation_type(),
            severity: Severity::Error,
            message,
            details: ViolationDetails {
                constraint_name: format!("{:?}", self.violation_type()),
                current_value: Some(count as i64),
                limit_value: Some(cap as i64),
                period: Some(period_label),
                ..Default::default()
            },
            occurrence_id: Some(context.target_occurrence.id),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DebugFormatter;
    use crate::model::{ShiftOccurrence, ShiftRequirements, StaffConstraints, StaffMember};
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn occ_on(day: u32, assigned: Vec<uuid::Uuid>) -> ShiftOccurrence {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        ShiftOccurrence {
            id: Uuid::new_v4(),
            name: "Shift".into(),
            start: date.and_hms_opt(9, 0, 0).unwrap().and_utc(),
            end: date.and_hms_opt(17, 0, 0).unwrap().and_utc(),
            requirements: ShiftRequirements {
                staff_count: 1,
                required_traits: vec![],
                excluded_traits: HashSet::new(),
                preferred_traits: HashSet::new(),
            },
            assigned_staff: assigned,
        }
    }

    #[test]
    fn weekly_cap_blocks_the_sixth_shift_by_default() {
        let staff_id = Uuid::new_v4();
        let staff = StaffMember {
            id: staff_id,
            name: "Alice".into(),
            trait_ids: HashSet::new(),
            constraints: StaffConstraints::default(), // default weekly cap is 5
            blocked_times: vec![],
        };
        // Sunday 2024-01-14 through Thursday 2024-01-18: five shifts already.
        let mut occurrences: Vec<ShiftOccurrence> = (14..=18)
            .map(|d| occ_on(d, vec![staff_id]))
            .collect();
        let target = occ_on(19, vec![]); // Friday, same week
        occurrences.push(target.clone());

        let formatter = DebugFormatter;
        let context = ValidationContext {
            target_staff: &staff,
            target_occurrence: &target,
            all_staff: &[],
            all_occurrences: &occurrences,
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
            mode: Mode::CheckAssignment,
            formatter: &formatter,
        };

        let violations = ShiftLimitValidator::weekly().validate(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationType::WeeklyShiftLimit);
    }

    #[test]
    fn validate_existing_mode_does_not_subtract_the_pending_assignment() {
        let staff_id = Uuid::new_v4();
        let staff = StaffMember {
            id: staff_id,
            name: "Alice".into(),
            trait_ids: HashSet::new(),
            constraints: StaffConstraints {
                max_shifts_per_week: Some(5),
                ..Default::default()
            },
            blocked_times: vec![],
        };
        let occurrences: Vec<ShiftOccurrence> = (14..=18).map(|d| occ_on(d, vec![staff_id])).collect();
        let target = occurrences[0].clone();

        let formatter = DebugFormatter;
        let context = ValidationContext {
            target_staff: &staff,
            target_occurrence: &target,
            all_staff: &[],
            all_occurrences: &occurrences,
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            mode: Mode::ValidateExisting,
            formatter: &formatter,
        };

        // Exactly at cap (5 == 5), validate-existing is not a violation.
        assert!(ShiftLimitValidator::weekly().validate(&context).is_empty());
    }

    #[test]
    fn missing_yearly_cap_is_unbounded() {
        let staff_id = Uuid::new_v4();
        let staff = StaffMember {
            id: staff_id,
            name: "Alice".into(),
            trait_ids: HashSet::new(),
            constraints: StaffConstraints::default(),
            blocked_times: vec![],
        };
        let target = occ_on(19, vec![]);
        let formatter = DebugFormatter;
        let context = ValidationContext {
            target_staff: &staff,
            target_occurrence: &target,
            all_staff: &[],
            all_occurrences: &[],
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
            mode: Mode::CheckAssignment,
            formatter: &formatter,
        };

        assert!(ShiftLimitValidator::yearly().validate(&context).is_empty());
    }
}
