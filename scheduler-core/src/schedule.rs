//! Top-level orchestration (§6): validates the snapshot, runs the ILP
//! driver, falls back to the greedy scheduler, and packages the result
//! the way callers consume it.

use crate::formatter::{keys, params, Formatter};
use crate::greedy::schedule_greedy;
use crate::ilp::driver::{self, SolveOutcome};
use crate::model::{AssignmentMap, ShiftOccurrence, StaffMember};
use crate::temporal;
use chrono::NaiveDate;
use shared::{OccurrenceId, SchedulerError};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    IlpExact,
    IlpRelaxed,
    Greedy,
}

pub struct ScheduleWarning {
    pub occurrence_id: OccurrenceId,
    pub message: String,
    pub reasons: Vec<String>,
}

pub struct ScheduleResult {
    pub success: bool,
    pub assignments: AssignmentMap,
    pub warnings: Vec<ScheduleWarning>,
    pub errors: Vec<String>,
    pub objective: f64,
    pub algorithm: Option<Algorithm>,
}

fn input_errors(
    shifts: &[ShiftOccurrence],
    staff: &[StaffMember],
    formatter: &dyn Formatter,
) -> Vec<SchedulerError> {
    let known_staff: std::collections::HashSet<_> = staff.iter().map(|s| s.id).collect();
    for occurrence in shifts {
        for staff_id in &occurrence.assigned_staff {
            if !known_staff.contains(staff_id) {
                let message = formatter.format(
                    keys::ERROR_UNKNOWN_STAFF_REFERENCE,
                    &params(&[
                        ("occurrence_name", occurrence.name.clone()),
                        ("staff_id", staff_id.to_string()),
                    ]),
                );
                return vec![SchedulerError::InvalidInput(message)];
            }
        }
    }
    vec![]
}

/// Up to three contributing reasons an occurrence fell short, drawn
/// from {insufficient total staff, unmet trait requirements, staff
/// blocked during required times} (§4.5 step 2).
fn contributing_reasons(
    occurrence: &ShiftOccurrence,
    staff: &[StaffMember],
    formatter: &dyn Formatter,
) -> Vec<String> {
    let mut reasons = Vec::new();

    let eligible_total = staff
        .iter()
        .filter(|s| {
            !s.trait_ids
                .iter()
                .any(|t| occurrence.requirements.excluded_traits.contains(t))
        })
        .count() as u32;
    if eligible_total < occurrence.requirements.staff_count {
        reasons.push(formatter.format(keys::REASON_INSUFFICIENT_STAFF, &params(&[])));
    }

    let trait_shortfall = occurrence.requirements.required_traits.iter().any(|rt| {
        staff.iter().filter(|s| s.has_trait(rt.trait_id)).count() < rt.min_count as usize
    });
    if trait_shortfall {
        reasons.push(formatter.format(keys::REASON_UNMET_TRAIT_REQUIREMENTS, &params(&[])));
    }

    let blocked_candidates = staff.iter().any(|s| {
        s.blocked_times.iter().any(|bt| {
            temporal::expand_blocked_time(
                bt,
                occurrence.start - chrono::Duration::days(1),
                occurrence.end + chrono::Duration::days(1),
            )
            .iter()
            .any(|(start, end)| occurrence.overlaps(*start, *end))
        })
    });
    if blocked_candidates {
        reasons.push(formatter.format(keys::REASON_STAFF_BLOCKED, &params(&[])));
    }

    reasons.into_iter().take(3).collect()
}

fn warnings_for(
    week: &[ShiftOccurrence],
    assignments: &AssignmentMap,
    staff: &[StaffMember],
    formatter: &dyn Formatter,
) -> Vec<ScheduleWarning> {
    week.iter()
        .filter_map(|occ| {
            let assigned = assignments.get(occ.id).map(|v| v.len()).unwrap_or(0) as u32;
            let required = occ.requirements.staff_count;
            if assigned >= required {
                return None;
            }
            let key = if assigned == 0 {
                keys::WARNING_UNFILLED_SHIFTS
            } else {
                keys::WARNING_UNDERSTAFFED_SHIFTS
            };
            let message = formatter.format(
                key,
                &params(&[
                    ("occurrence_name", occ.name.clone()),
                    ("assigned", assigned.to_string()),
                    ("required", required.to_string()),
                ]),
            );
            Some(ScheduleWarning {
                occurrence_id: occ.id,
                message,
                reasons: contributing_reasons(occ, staff, formatter),
            })
        })
        .collect()
}

/// Run the scheduler for the week starting `week_start`. `shifts` must
/// include every occurrence the caller knows about, not just the
/// target week, so month/year cap accounting sees the full picture.
#[instrument(skip(shifts, staff, formatter))]
pub fn schedule(
    week_start: NaiveDate,
    shifts: &[ShiftOccurrence],
    staff: &[StaffMember],
    formatter: &dyn Formatter,
) -> ScheduleResult {
    let errors = input_errors(shifts, staff, formatter);
    if !errors.is_empty() {
        return ScheduleResult {
            success: false,
            assignments: AssignmentMap::new(),
            warnings: vec![],
            errors: errors.iter().map(ToString::to_string).collect(),
            objective: 0.0,
            algorithm: None,
        };
    }

    let week_end = temporal::end_of_week(week_start);
    let week: Vec<ShiftOccurrence> = shifts
        .iter()
        .filter(|o| {
            let date = o.start.date_naive();
            date >= week_start && date <= week_end
        })
        .cloned()
        .collect();

    info!(week = %week_start, occurrences = week.len(), staff = staff.len(), "scheduling week");
    let result = match driver::solve(week_start, &week, shifts, staff) {
        Ok(result) => result,
        Err(err) => {
            return ScheduleResult {
                success: false,
                assignments: AssignmentMap::new(),
                warnings: vec![],
                errors: vec![formatter.format(
                    keys::ERROR_SOLVER_FAILURE,
                    &params(&[("message", err.to_string())]),
                )],
                objective: 0.0,
                algorithm: None,
            };
        }
    };

    match result.outcome {
        SolveOutcome::Exact => ScheduleResult {
            success: true,
            warnings: vec![],
            errors: vec![],
            objective: result.objective,
            algorithm: Some(Algorithm::IlpExact),
            assignments: sorted(result.assignments),
        },
        SolveOutcome::Relaxed => {
            let warnings = warnings_for(&week, &result.assignments, staff, formatter);
            ScheduleResult {
                success: true,
                warnings,
                errors: vec![],
                objective: result.objective,
                algorithm: Some(Algorithm::IlpRelaxed),
                assignments: sorted(result.assignments),
            }
        }
        SolveOutcome::Infeasible => {
            let greedy_result = schedule_greedy(&week, shifts, staff);
            let mut warnings = warnings_for(&week, &greedy_result.assignments, staff, formatter);
            if warnings.is_empty() {
                warnings.push(ScheduleWarning {
                    occurrence_id: week.first().map(|o| o.id).unwrap_or_default(),
                    message: formatter.format(keys::WARNING_ALL_CONSTRAINTS_RESPECTED, &params(&[])),
                    reasons: vec![],
                });
            }
            let objective = greedy_result
                .assignments
                .iter()
                .map(|(_, s)| s.len() as f64)
                .sum();
            ScheduleResult {
                success: true,
                warnings,
                errors: vec![],
                objective,
                algorithm: Some(Algorithm::Greedy),
                assignments: sorted(greedy_result.assignments),
            }
        }
    }
}

/// Normalize per-shift staff lists for stable output (§5 ordering note).
fn sorted(assignments: AssignmentMap) -> AssignmentMap {
    let mut normalized = AssignmentMap::new();
    for (occurrence_id, staff) in assignments.iter() {
        let mut staff = staff.to_vec();
        staff.sort();
        normalized.insert(occurrence_id, staff);
    }
    normalized
}
