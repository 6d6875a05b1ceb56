//! Drives the exact ILP solve, falls back to a relaxed solve when the
//! exact model is infeasible, and reports which shifts could not be
//! fully staffed (§4.5).

use super::{Model, ModelBuilder, StaffingMode};
use crate::model::{AssignmentMap, ShiftOccurrence, StaffMember};
use chrono::NaiveDate;
use good_lp::{highs, ResolutionError, Solution, SolverModel};
use shared::{OccurrenceId, SchedulerError};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Exact,
    Relaxed,
    Infeasible,
}

pub struct SolveResult {
    pub outcome: SolveOutcome,
    pub assignments: AssignmentMap,
    pub objective: f64,
    pub understaffed: Vec<(OccurrenceId, u32, u32)>,
}

enum SolveAttempt {
    Solved(AssignmentMap, f64),
    Infeasible,
    SolverError(String),
}

fn solve_once(model: Model) -> SolveAttempt {
    let mut problem = model.vars.maximise(model.objective.clone()).using(highs);
    for constraint in model.constraints {
        problem = problem.with(constraint);
    }

    match problem.solve() {
        Ok(solution) => {
            let mut assignments = AssignmentMap::new();
            for ((staff_id, occurrence_id), var) in &model.x {
                if solution.value(*var) > 0.5 {
                    assignments.entry_or_default(*occurrence_id).push(*staff_id);
                }
            }
            let objective = model.x.values().map(|v| solution.value(*v)).sum();
            SolveAttempt::Solved(assignments, objective)
        }
        Err(ResolutionError::Infeasible) => SolveAttempt::Infeasible,
        Err(other) => SolveAttempt::SolverError(other.to_string()),
    }
}

fn understaffed_counts(
    week: &[ShiftOccurrence],
    assignments: &AssignmentMap,
) -> Vec<(OccurrenceId, u32, u32)> {
    week.iter()
        .filter_map(|occ| {
            let assigned = assignments.get(occ.id).map(|v| v.len()).unwrap_or(0) as u32;
            let required = occ.requirements.staff_count;
            if assigned < required {
                Some((occ.id, assigned, required))
            } else {
                None
            }
        })
        .collect()
}

/// Attempt an exact solve; on infeasibility, relax the shift-staffing
/// equalities to upper bounds and retry. A genuine solver error (not a
/// feasibility issue) propagates up to `schedule::schedule` as an
/// error, per §7 — it is never silently treated as "delegate to
/// greedy".
pub fn solve(
    week_start: NaiveDate,
    week: &[ShiftOccurrence],
    all_occurrences: &[ShiftOccurrence],
    staff: &[StaffMember],
) -> Result<SolveResult, SchedulerError> {
    let builder = ModelBuilder::new(week_start, week, all_occurrences, staff);

    debug!(week = %week_start, occurrences = week.len(), staff = staff.len(), "building exact ilp model");
    match solve_once(builder.build(StaffingMode::Exact)) {
        SolveAttempt::Solved(assignments, objective) => {
            let understaffed = understaffed_counts(week, &assignments);
            if understaffed.is_empty() {
                return Ok(SolveResult {
                    outcome: SolveOutcome::Exact,
                    assignments,
                    objective,
                    understaffed,
                });
            }
        }
        SolveAttempt::SolverError(message) => return Err(SchedulerError::Solver(message)),
        SolveAttempt::Infeasible => {}
    }

    warn!(week = %week_start, "exact ilp model infeasible, relaxing shift-staffing constraints");
    match solve_once(builder.build(StaffingMode::Relaxed)) {
        SolveAttempt::Solved(assignments, objective) => {
            let understaffed = understaffed_counts(week, &assignments);
            Ok(SolveResult {
                outcome: SolveOutcome::Relaxed,
                assignments,
                objective,
                understaffed,
            })
        }
        SolveAttempt::SolverError(message) => Err(SchedulerError::Solver(message)),
        SolveAttempt::Infeasible => Ok(SolveResult {
            outcome: SolveOutcome::Infeasible,
            assignments: AssignmentMap::new(),
            objective: 0.0,
            understaffed: week
                .iter()
                .map(|occ| (occ.id, 0, occ.requirements.staff_count))
                .collect(),
        }),
    }
}
