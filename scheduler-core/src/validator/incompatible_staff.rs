use super::{ValidationContext, Validator};
use crate::formatter::{keys, params};
use crate::model::{ConstraintViolation, ViolationDetails, ViolationType};
use shared::Severity;

/// Two staff members flagged incompatible (either direction) cannot
/// both appear on the same occurrence.
pub struct IncompatibleStaffValidator;

impl Validator for IncompatibleStaffValidator {
    fn validate(&self, context: &ValidationContext) -> Vec<ConstraintViolation> {
        let occurrence = context.target_occurrence;
        let mut violations = Vec::new();

        for &other_id in &occurrence.assigned_staff {
            if other_id == context.target_staff.id {
                continue;
            }
            let incompatible = context
                .target_staff
                .constraints
                .incompatible_with
                .contains(&other_id)
                || context
                    .staff_by_id(other_id)
                    .map(|other| other.constraints.incompatible_with.contains(&context.target_staff.id))
                    .unwrap_or(false);

            if !incompatible {
                continue;
            }

            let other_name = context
                .staff_by_id(other_id)
                .map(|s| s.name.clone())
                .unwrap_or_default();

            let message = context.formatter.format(
                keys::INCOMPATIBLE_STAFF,
                &params(&[
                    ("staff_name", context.target_staff.name.clone()),
                    ("other_name", other_name.clone()),
                ]),
            );

            violations.push(ConstraintViolation {
                id: format!(
                    "incompatible_staff:{}:{}:{}",
                    context.target_staff.id, other_id, occurrence.id
                ),
                staff_id: context.target_staff.id,
                staff_name: context.target_staff.name.clone(),
                kind: ViolationType::IncompatibleStaff,
                severity: Severity::Error,
                message,
                details: ViolationDetails {
                    constraint_name: "incompatible_staff".to_string(),
                    related_staff_id: Some(other_id),
                    related_staff_name: Some(other_name),
                    ..Default::default()
                },
                occurrence_id: Some(occurrence.id),
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DebugFormatter;
    use crate::model::{ShiftOccurrence, ShiftRequirements, StaffConstraints, StaffMember};
    use crate::validator::Mode;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn staff(name: &str, incompatible_with: HashSet<uuid::Uuid>) -> StaffMember {
        StaffMember {
            id: Uuid::new_v4(),
            name: name.into(),
            trait_ids: HashSet::new(),
            constraints: StaffConstraints {
                incompatible_with,
                ..Default::default()
            },
            blocked_times: vec![],
        }
    }

    fn occurrence(assigned: Vec<uuid::Uuid>) -> ShiftOccurrence {
        ShiftOccurrence {
            id: Uuid::new_v4(),
            name: "Shift".into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                .and_utc(),
            end: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap()
                .and_utc(),
            requirements: ShiftRequirements {
                staff_count: 2,
                required_traits: vec![],
                excluded_traits: HashSet::new(),
                preferred_traits: HashSet::new(),
            },
            assigned_staff: assigned,
        }
    }

    #[test]
    fn incompatible_pair_is_rejected() {
        let bob_id = Uuid::new_v4();
        let mut incompatible = HashSet::new();
        incompatible.insert(bob_id);
        let alice = staff("Alice", incompatible);
        let bob = StaffMember {
            id: bob_id,
            name: "Bob".into(),
            trait_ids: HashSet::new(),
            constraints: Default::default(),
            blocked_times: vec![],
        };
        let occ = occurrence(vec![bob_id]);
        let formatter = DebugFormatter;
        let all_staff = vec![bob.clone()];
        let context = ValidationContext {
            target_staff: &alice,
            target_occurrence: &occ,
            all_staff: &all_staff,
            all_occurrences: &[],
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            mode: Mode::CheckAssignment,
            formatter: &formatter,
        };

        let violations = IncompatibleStaffValidator.validate(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].details.related_staff_id, Some(bob_id));
    }

    #[test]
    fn compatible_staff_raises_nothing() {
        let charlie_id = Uuid::new_v4();
        let alice = staff("Alice", HashSet::new());
        let charlie = StaffMember {
            id: charlie_id,
            name: "Charlie".into(),
            trait_ids: HashSet::new(),
            constraints: Default::default(),
            blocked_times: vec![],
        };
        let occ = occurrence(vec![charlie_id]);
        let formatter = DebugFormatter;
        let all_staff = vec![charlie];
        let context = ValidationContext {
            target_staff: &alice,
            target_occurrence: &occ,
            all_staff: &all_staff,
            all_occurrences: &[],
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            mode: Mode::CheckAssignment,
            formatter: &formatter,
        };

        assert!(IncompatibleStaffValidator.validate(&context).is_empty());
    }
}
