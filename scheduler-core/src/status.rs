//! Staffing-status evaluator: classifies an occurrence as
//! properly-staffed / understaffed / overstaffed / not-staffed /
//! constraint-violation, combining required counts, trait coverage,
//! and the validator (§4.3).

use crate::formatter::{keys, params, Formatter};
use crate::model::{ConstraintViolation, ShiftOccurrence, StaffMember, Trait};
use crate::validator::{Mode, ValidationContext, ValidatorRegistry};
use shared::TraitId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffingStatus {
    NotStaffed,
    UnderstaffedByTrait,
    ConstraintViolation,
    Understaffed,
    Overstaffed,
    ProperlyStaffed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Green,
    Orange,
    Red,
}

impl StaffingStatus {
    pub fn color(self) -> StatusColor {
        match self {
            StaffingStatus::ProperlyStaffed => StatusColor::Green,
            StaffingStatus::Understaffed | StaffingStatus::Overstaffed => StatusColor::Orange,
            StaffingStatus::NotStaffed | StaffingStatus::ConstraintViolation => StatusColor::Red,
        }
    }
}

pub struct StaffingStatusReport {
    pub status: StaffingStatus,
    pub color: StatusColor,
    pub message: String,
    pub missing_traits: Vec<TraitId>,
    pub constraint_violations: Vec<ConstraintViolation>,
}

/// Evaluate the staffing status of `occurrence`, given its currently
/// assigned staff. Precedence (first match wins), per §4.3:
/// not-staffed > understaffed-by-trait > constraint-violation >
/// understaffed > overstaffed > properly-staffed.
pub fn staffing_status(
    occurrence: &ShiftOccurrence,
    assigned: &[StaffMember],
    _all_traits: &[Trait],
    all_occurrences: &[ShiftOccurrence],
    all_staff: &[StaffMember],
    formatter: &dyn Formatter,
) -> StaffingStatusReport {
    if assigned.is_empty() {
        return StaffingStatusReport {
            status: StaffingStatus::NotStaffed,
            color: StatusColor::Red,
            message: formatter.format(keys::STATUS_NOT_STAFFED, &params(&[(
                "occurrence_name",
                occurrence.name.clone(),
            )])),
            missing_traits: occurrence
                .requirements
                .required_traits
                .iter()
                .map(|rt| rt.trait_id)
                .collect(),
            constraint_violations: vec![],
        };
    }

    let missing_traits: Vec<TraitId> = occurrence
        .requirements
        .required_traits
        .iter()
        .filter(|rt| {
            let have = assigned.iter().filter(|s| s.has_trait(rt.trait_id)).count() as u32;
            have < rt.min_count
        })
        .map(|rt| rt.trait_id)
        .collect();

    if !missing_traits.is_empty() {
        return StaffingStatusReport {
            status: StaffingStatus::UnderstaffedByTrait,
            color: StatusColor::Orange,
            message: formatter.format(
                keys::STATUS_UNDERSTAFFED_TRAIT,
                &params(&[("occurrence_name", occurrence.name.clone())]),
            ),
            missing_traits,
            constraint_violations: vec![],
        };
    }

    let registry = ValidatorRegistry::standard();
    let evaluation_date = occurrence.start.date_naive();
    let violations: Vec<ConstraintViolation> = assigned
        .iter()
        .flat_map(|staff| {
            let context = ValidationContext {
                target_staff: staff,
                target_occurrence: occurrence,
                all_staff,
                all_occurrences,
                evaluation_date,
                mode: Mode::ValidateExisting,
                formatter,
            };
            registry.validate(&context)
        })
        .collect();

    if !violations.is_empty() {
        return StaffingStatusReport {
            status: StaffingStatus::ConstraintViolation,
            color: StatusColor::Red,
            message: formatter.format(
                keys::STATUS_CONSTRAINT_VIOLATION,
                &params(&[("occurrence_name", occurrence.name.clone())]),
            ),
            missing_traits: vec![],
            constraint_violations: violations,
        };
    }

    let required = occurrence.requirements.staff_count as usize;
    if assigned.len() < required {
        return StaffingStatusReport {
            status: StaffingStatus::Understaffed,
            color: StatusColor::Orange,
            message: formatter.format(
                keys::STATUS_UNDERSTAFFED,
                &params(&[
                    ("assigned", assigned.len().to_string()),
                    ("required", required.to_string()),
                ]),
            ),
            missing_traits: vec![],
            constraint_violations: vec![],
        };
    }

    if assigned.len() > required {
        return StaffingStatusReport {
            status: StaffingStatus::Overstaffed,
            color: StatusColor::Orange,
            message: formatter.format(
                keys::STATUS_OVERSTAFFED,
                &params(&[
                    ("assigned", assigned.len().to_string()),
                    ("required", required.to_string()),
                ]),
            ),
            missing_traits: vec![],
            constraint_violations: vec![],
        };
    }

    StaffingStatusReport {
        status: StaffingStatus::ProperlyStaffed,
        color: StatusColor::Green,
        message: formatter.format(
            keys::STATUS_PROPERLY_STAFFED,
            &params(&[("occurrence_name", occurrence.name.clone())]),
        ),
        missing_traits: vec![],
        constraint_violations: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DebugFormatter;
    use crate::model::{RequiredTrait, ShiftRequirements};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn staff(name: &str, traits: Vec<TraitId>) -> StaffMember {
        StaffMember {
            id: Uuid::new_v4(),
            name: name.into(),
            trait_ids: traits.into_iter().collect(),
            constraints: Default::default(),
            blocked_times: vec![],
        }
    }

    fn occurrence(staff_count: u32, required_traits: Vec<RequiredTrait>) -> ShiftOccurrence {
        ShiftOccurrence {
            id: Uuid::new_v4(),
            name: "Shift".into(),
            start: chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                .and_utc(),
            end: chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap()
                .and_utc(),
            requirements: ShiftRequirements {
                staff_count,
                required_traits,
                excluded_traits: HashSet::new(),
                preferred_traits: HashSet::new(),
            },
            assigned_staff: vec![],
        }
    }

    #[test]
    fn empty_assignment_is_not_staffed() {
        let occ = occurrence(1, vec![]);
        let formatter = DebugFormatter;
        let report = staffing_status(&occ, &[], &[], &[], &[], &formatter);
        assert_eq!(report.status, StaffingStatus::NotStaffed);
        assert_eq!(report.color, StatusColor::Red);
    }

    #[test]
    fn missing_required_trait_outranks_plain_understaffing() {
        let manager_trait = Uuid::new_v4();
        let occ = occurrence(
            1,
            vec![RequiredTrait {
                trait_id: manager_trait,
                min_count: 1,
            }],
        );
        let cook = staff("Bob", vec![]);
        let report = staffing_status(&occ, &[cook], &[], &[], &[], &DebugFormatter);
        assert_eq!(report.status, StaffingStatus::UnderstaffedByTrait);
        assert_eq!(report.missing_traits, vec![manager_trait]);
    }

    #[test]
    fn exact_count_with_traits_met_is_properly_staffed() {
        let occ = occurrence(1, vec![]);
        let alice = staff("Alice", vec![]);
        let report = staffing_status(&occ, &[alice], &[], &[], &[], &DebugFormatter);
        assert_eq!(report.status, StaffingStatus::ProperlyStaffed);
        assert_eq!(report.color, StatusColor::Green);
    }

    #[test]
    fn too_many_assigned_is_overstaffed() {
        let occ = occurrence(1, vec![]);
        let alice = staff("Alice", vec![]);
        let bob = staff("Bob", vec![]);
        let report = staffing_status(&occ, &[alice, bob], &[], &[], &[], &DebugFormatter);
        assert_eq!(report.status, StaffingStatus::Overstaffed);
    }

    #[test]
    fn blocked_time_overlap_is_a_constraint_violation_regardless_of_wall_clock() {
        use crate::model::BlockedTime;

        let occ = occurrence(1, vec![]);
        let mut alice = staff("Alice", vec![]);
        alice.blocked_times.push(BlockedTime {
            id: Uuid::new_v4(),
            start: occ.start - chrono::Duration::hours(1),
            end: occ.end + chrono::Duration::hours(1),
            is_full_day: false,
            recurrence: None,
        });
        let all_staff = vec![alice.clone()];
        let report = staffing_status(&occ, &[alice], &[], &[], &all_staff, &DebugFormatter);
        assert_eq!(report.status, StaffingStatus::ConstraintViolation);
        assert_eq!(report.constraint_violations.len(), 1);
    }
}
