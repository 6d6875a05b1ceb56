//! Deterministic best-effort scheduler used when the ILP solver (even
//! relaxed) cannot produce a feasible solution (§4.6). Runs the week's
//! occurrences in start-time order; for each, a trait-coverage pass
//! places enough staff to satisfy required traits, then a fill pass
//! tops the occurrence up to its staff count. Both passes reuse the
//! same [`ValidatorRegistry`] the ILP eligibility filter and the
//! "can this person take this shift" UI path use, in
//! [`Mode::CheckAssignment`] — one set of rejection rules, never
//! duplicated.

use crate::formatter::DebugFormatter;
use crate::model::{AssignmentMap, ShiftOccurrence, StaffMember};
use crate::validator::{Mode, ValidationContext, ValidatorRegistry};
use shared::{OccurrenceId, StaffId};
use tracing::debug;

pub struct GreedyResult {
    pub assignments: AssignmentMap,
    pub unfilled: Vec<(OccurrenceId, u32, u32)>,
}

fn staff_eligible(staff: &StaffMember, occurrence: &ShiftOccurrence) -> bool {
    !staff
        .trait_ids
        .iter()
        .any(|t| occurrence.requirements.excluded_traits.contains(t))
}

fn has_all_required_traits(staff: &StaffMember, occurrence: &ShiftOccurrence) -> bool {
    occurrence
        .requirements
        .required_traits
        .iter()
        .all(|rt| staff.has_trait(rt.trait_id))
}

fn has_any_preferred_trait(staff: &StaffMember, occurrence: &ShiftOccurrence) -> bool {
    occurrence
        .requirements
        .preferred_traits
        .iter()
        .any(|t| staff.has_trait(*t))
}

/// Tier 1: all required traits and at least one preferred trait.
/// Tier 2: all required traits only. Tier 3: at least one preferred
/// trait only. Tier 4: neither.
fn tier_of(staff: &StaffMember, occurrence: &ShiftOccurrence) -> u8 {
    let required = has_all_required_traits(staff, occurrence);
    let preferred = has_any_preferred_trait(staff, occurrence);
    match (required, preferred) {
        (true, true) => 1,
        (true, false) => 2,
        (false, true) => 3,
        (false, false) => 4,
    }
}

fn week_assignment_count(staff_id: StaffId, working: &[ShiftOccurrence]) -> u32 {
    working.iter().filter(|o| o.is_assigned(staff_id)).count() as u32
}

/// Eligible candidates for `occurrence`, partitioned into tiers and
/// sorted within each tier by ascending current-week assignment count
/// (workload balancing) then by id for determinism. `max_tier` is 2 to
/// restrict the trait-coverage pass to staff holding every required
/// trait, or 4 to include everyone for the fill pass.
fn tiered_candidates<'a>(
    occurrence: &ShiftOccurrence,
    staff: &'a [StaffMember],
    working: &[ShiftOccurrence],
    max_tier: u8,
) -> Vec<&'a StaffMember> {
    let mut tiers: [Vec<&StaffMember>; 4] = [Vec::new(), Vec::new(), Vec::new(), Vec::new()];
    for s in staff {
        if !staff_eligible(s, occurrence) {
            continue;
        }
        let tier = tier_of(s, occurrence);
        if tier <= max_tier {
            tiers[(tier - 1) as usize].push(s);
        }
    }
    for tier in &mut tiers {
        tier.sort_by_key(|s| (week_assignment_count(s.id, working), s.id));
    }
    tiers.into_iter().flatten().collect()
}

fn can_place(
    registry: &ValidatorRegistry,
    candidate: &StaffMember,
    occurrence: &ShiftOccurrence,
    all_staff: &[StaffMember],
    working: &[ShiftOccurrence],
) -> bool {
    if occurrence.is_assigned(candidate.id) {
        return false;
    }
    let context = ValidationContext {
        target_staff: candidate,
        target_occurrence: occurrence,
        all_staff,
        all_occurrences: working,
        evaluation_date: occurrence.start.date_naive(),
        mode: Mode::CheckAssignment,
        formatter: &DebugFormatter,
    };
    registry.validate(&context).is_empty()
}

/// Fill occurrences in the scheduled week in two passes. `all_occurrences`
/// must include every occurrence the caller knows about, including those
/// outside the week, so cap and rest-day validators see the full picture;
/// occurrences inside the week are treated as empty going in and filled
/// here — the scheduler is authoritative for them.
pub fn schedule_greedy(
    week: &[ShiftOccurrence],
    all_occurrences: &[ShiftOccurrence],
    staff: &[StaffMember],
) -> GreedyResult {
    debug!(occurrences = week.len(), "falling back to greedy scheduler");

    let registry = ValidatorRegistry::standard();
    let week_ids: std::collections::HashSet<OccurrenceId> = week.iter().map(|o| o.id).collect();

    // Working snapshot: everything outside the week as given, week
    // occurrences cleared and processed in start-time order.
    let mut working: Vec<ShiftOccurrence> = all_occurrences
        .iter()
        .filter(|o| !week_ids.contains(&o.id))
        .cloned()
        .collect();
    let mut sorted_week: Vec<ShiftOccurrence> = week.to_vec();
    sorted_week.sort_by_key(|o| (o.start, o.id));
    for occ in &mut sorted_week {
        occ.assigned_staff.clear();
    }
    working.extend(sorted_week.iter().cloned());

    for index in 0..sorted_week.len() {
        let occurrence_id = sorted_week[index].id;

        for required in sorted_week[index].requirements.required_traits.clone() {
            loop {
                let current = working
                    .iter()
                    .find(|o| o.id == occurrence_id)
                    .expect("occurrence present in working snapshot");
                let have = current
                    .assigned_staff
                    .iter()
                    .filter(|id| {
                        staff
                            .iter()
                            .find(|s| s.id == **id)
                            .map(|s| s.has_trait(required.trait_id))
                            .unwrap_or(false)
                    })
                    .count() as u32;
                if have >= required.min_count {
                    break;
                }
                let candidates = tiered_candidates(current, staff, &working, 2);
                let placed = candidates
                    .into_iter()
                    .find(|c| c.has_trait(required.trait_id) && can_place(&registry, c, current, staff, &working));
                match placed {
                    Some(candidate) => {
                        let candidate_id = candidate.id;
                        let entry = working.iter_mut().find(|o| o.id == occurrence_id).unwrap();
                        entry.assigned_staff.push(candidate_id);
                    }
                    None => break,
                }
            }
        }

        loop {
            let current = working
                .iter()
                .find(|o| o.id == occurrence_id)
                .expect("occurrence present in working snapshot");
            if current.assigned_staff.len() as u32 >= current.requirements.staff_count {
                break;
            }
            let candidates = tiered_candidates(current, staff, &working, 4);
            let placed = candidates
                .into_iter()
                .find(|c| can_place(&registry, c, current, staff, &working));
            match placed {
                Some(candidate) => {
                    let candidate_id = candidate.id;
                    let entry = working.iter_mut().find(|o| o.id == occurrence_id).unwrap();
                    entry.assigned_staff.push(candidate_id);
                }
                None => break,
            }
        }
    }

    let mut assignments = AssignmentMap::new();
    let mut unfilled = Vec::new();
    for occ in &sorted_week {
        let filled = working.iter().find(|o| o.id == occ.id).unwrap();
        let mut assigned = filled.assigned_staff.clone();
        assigned.sort();
        if (assigned.len() as u32) < occ.requirements.staff_count {
            unfilled.push((occ.id, assigned.len() as u32, occ.requirements.staff_count));
        }
        assignments.insert(occ.id, assigned);
    }

    GreedyResult {
        assignments,
        unfilled,
    }
}
