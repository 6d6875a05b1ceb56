use super::{ValidationContext, Validator};
use crate::formatter::{keys, params};
use crate::model::{ConstraintViolation, ViolationDetails, ViolationType};
use crate::temporal::expand_blocked_time;
use chrono::Duration;
use shared::Severity;

/// A staff member cannot be assigned to (or already be assigned to) an
/// occurrence that overlaps one of their blocked-time intervals.
pub struct BlockedTimeValidator;

impl Validator for BlockedTimeValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation> {
        let occurrence = context.target_occurrence;
        let window_start = (context.evaluation_date - Duration::days(365))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        let window_end = (context.evaluation_date + Duration::days(365))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();

        let overlaps = context.target_staff.blocked_times.iter().any(|blocked| {
            expand_blocked_time(blocked, window_start, window_end)
                .iter()
                .any(|(start, end)| occurrence.overlaps(*start, *end))
        });

        if !overlaps {
            return vec![];
        }

        let message = context.formatter.format(
            keys::BLOCKED_TIME,
            &params(&[
                ("staff_name", context.target_staff.name.clone()),
                ("occurrence_name", occurrence.name.clone()),
            ]),
        );

        vec![ConstraintViolation {
            id: format!("blocked_time:{}:{}", context.target_staff.id, occurrence.id),
            staff_id: context.target_staff.id,
            staff_name: context.target_staff.name.clone(),
            kind: ViolationType::BlockedTime,
            severity: Severity::Error,
            message,
            details: ViolationDetails {
                constraint_name: "blocked_time".to_string(),
                ..Default::default()
            },
            occurrence_id: Some(occurrence.id),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DebugFormatter;
    use crate::model::{BlockedTime, ShiftOccurrence, ShiftRequirements, StaffMember};
    use crate::validator::Mode;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> chrono::DateTime<chrono::Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn overlapping_blocked_time_is_an_error() {
        let staff = StaffMember {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            trait_ids: HashSet::new(),
            constraints: Default::default(),
            blocked_times: vec![BlockedTime {
                id: Uuid::new_v4(),
                start: dt(2024, 1, 15, 8),
                end: dt(2024, 1, 15, 16),
                is_full_day: false,
                recurrence: None,
            }],
        };
        let occurrence = ShiftOccurrence {
            id: Uuid::new_v4(),
            name: "Morning shift".into(),
            start: dt(2024, 1, 15, 9),
            end: dt(2024, 1, 15, 17),
            requirements: ShiftRequirements {
                staff_count: 1,
                required_traits: vec![],
                excluded_traits: HashSet::new(),
                preferred_traits: HashSet::new(),
            },
            assigned_staff: vec![],
        };
        let formatter = DebugFormatter;
        let context = ValidationContext {
            target_staff: &staff,
            target_occurrence: &occurrence,
            all_staff: &[],
            all_occurrences: &[],
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            mode: Mode::CheckAssignment,
            formatter: &formatter,
        };

        let violations = BlockedTimeValidator.validate(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationType::BlockedTime);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn non_overlapping_blocked_time_is_clean() {
        let staff = StaffMember {
            id: Uuid::new_v4(),
            name: "Bob".into(),
            trait_ids: HashSet::new(),
            constraints: Default::default(),
            blocked_times: vec![BlockedTime {
                id: Uuid::new_v4(),
                start: dt(2024, 1, 10, 8),
                end: dt(2024, 1, 10, 16),
                is_full_day: false,
                recurrence: None,
            }],
        };
        let occurrence = ShiftOccurrence {
            id: Uuid::new_v4(),
            name: "Morning shift".into(),
            start: dt(2024, 1, 15, 9),
            end: dt(2024, 1, 15, 17),
            requirements: ShiftRequirements {
                staff_count: 1,
                required_traits: vec![],
                excluded_traits: HashSet::new(),
                preferred_traits: HashSet::new(),
            },
            assigned_staff: vec![],
        };
        let formatter = DebugFormatter;
        let context = ValidationContext {
            target_staff: &staff,
            target_occurrence: &occurrence,
            all_staff: &[],
            all_occurrences: &[],
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            mode: Mode::CheckAssignment,
            formatter: &formatter,
        };

        assert!(BlockedTimeValidator.validate(&context).is_empty());
    }
}
