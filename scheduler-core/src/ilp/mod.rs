//! 0/1 ILP model builder (§4.4). Translates the target week's shifts,
//! staff, and world into decision variables and linear constraints
//! maximizing the number of filled staffing slots.

pub mod driver;

use crate::model::staff::Period;
use crate::model::{ShiftOccurrence, StaffMember};
use crate::temporal;
use chrono::NaiveDate;
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use shared::{OccurrenceId, StaffId};
use std::collections::HashMap;

/// Every variable and constraint the solver needs, plus enough
/// bookkeeping (id maps) to read a solution back into an
/// [`AssignmentMap`](crate::model::AssignmentMap).
pub struct Model {
    pub vars: ProblemVariables,
    pub x: HashMap<(StaffId, OccurrenceId), Variable>,
    pub work: HashMap<(StaffId, NaiveDate), Variable>,
    pub rest_window: HashMap<(StaffId, usize), Variable>,
    pub shared_rest: HashMap<(StaffId, StaffId, NaiveDate), Variable>,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
}

/// Whether shift-staffing constraints are exact equalities or
/// relaxed upper bounds (§4.5 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffingMode {
    Exact,
    Relaxed,
}

pub struct ModelBuilder<'a> {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week: &'a [ShiftOccurrence],
    pub all_occurrences: &'a [ShiftOccurrence],
    pub staff: &'a [StaffMember],
}

impl<'a> ModelBuilder<'a> {
    pub fn new(week_start: NaiveDate, week: &'a [ShiftOccurrence], all_occurrences: &'a [ShiftOccurrence], staff: &'a [StaffMember]) -> Self {
        Self {
            week_start,
            week_end: temporal::end_of_week(week_start),
            week,
            all_occurrences,
            staff,
        }
    }

    fn staff_eligible(&self, staff: &StaffMember, occurrence: &ShiftOccurrence) -> bool {
        let blocked = staff.blocked_times.iter().any(|bt| {
            temporal::expand_blocked_time(
                bt,
                occurrence.start - chrono::Duration::days(1),
                occurrence.end + chrono::Duration::days(1),
            )
            .iter()
            .any(|(s, e)| occurrence.overlaps(*s, *e))
        });
        if blocked {
            return false;
        }
        !staff
            .trait_ids
            .iter()
            .any(|t| occurrence.requirements.excluded_traits.contains(t))
    }

    /// Count of occurrences outside the scheduled week, in the given
    /// period around `anchor`, that already have `staff_id` assigned —
    /// the "assignments already persisted" terms of the §4.4 cap
    /// constraints.
    fn existing_count_outside_week(&self, staff_id: StaffId, period: Period, anchor: NaiveDate) -> u32 {
        let (start, end) = match period {
            Period::Day => (anchor, anchor),
            Period::Week => (temporal::start_of_week(anchor), temporal::end_of_week(anchor)),
            Period::Month => (temporal::start_of_month(anchor), temporal::end_of_month(anchor)),
            Period::Year => (temporal::start_of_year(anchor), temporal::end_of_year(anchor)),
        };
        self.all_occurrences
            .iter()
            .filter(|occ| {
                let date = occ.start.date_naive();
                date >= start
                    && date <= end
                    && (date < self.week_start || date > self.week_end)
                    && occ.is_assigned(staff_id)
            })
            .count() as u32
    }

    pub fn build(&self, mode: StaffingMode) -> Model {
        let mut vars = ProblemVariables::new();
        let mut x = HashMap::new();
        let mut work = HashMap::new();
        let mut rest_window = HashMap::new();
        let mut shared_rest = HashMap::new();

        // Sort staff and occurrences before building so repeated calls
        // on identical inputs yield byte-identical models (§9 determinism).
        let mut staff_sorted: Vec<&StaffMember> = self.staff.iter().collect();
        staff_sorted.sort_by_key(|s| s.id);
        let mut week_sorted: Vec<&ShiftOccurrence> = self.week.iter().collect();
        week_sorted.sort_by_key(|o| (o.start, o.id));

        for staff in &staff_sorted {
            for occurrence in &week_sorted {
                if self.staff_eligible(staff, occurrence) {
                    x.insert((staff.id, occurrence.id), vars.add(variable().binary()));
                }
            }
        }

        let days = temporal::enumerate_days(self.week_start, self.week_end);
        for staff in &staff_sorted {
            for &day in &days {
                work.insert((staff.id, day), vars.add(variable().binary()));
            }
        }

        for staff in &staff_sorted {
            for rule in &staff.constraints.consecutive_rest_days {
                if rule.period != Period::Week {
                    continue;
                }
                let k = rule.min_consecutive_days as usize;
                if k == 0 || k > days.len() {
                    continue;
                }
                for start_index in 0..=(days.len() - k) {
                    rest_window
                        .entry((staff.id, start_index))
                        .or_insert_with(|| vars.add(variable().binary()));
                }
            }
        }

        for staff in &staff_sorted {
            for rule in &staff.constraints.rest_days_with_staff {
                if rule.period != Period::Week {
                    continue;
                }
                for &day in &days {
                    shared_rest
                        .entry((staff.id, rule.peer, day))
                        .or_insert_with(|| vars.add(variable().binary()));
                }
            }
        }

        let mut constraints = Vec::new();

        // Shift staffing: exact count, or relaxed upper bound.
        for occurrence in &week_sorted {
            let sum: Expression = staff_sorted
                .iter()
                .filter_map(|s| x.get(&(s.id, occurrence.id)))
                .map(|&v| Expression::from(v))
                .sum();
            constraints.push(match mode {
                StaffingMode::Exact => {
                    constraint!(sum == occurrence.requirements.staff_count as f64)
                }
                StaffingMode::Relaxed => {
                    constraint!(sum <= occurrence.requirements.staff_count as f64)
                }
            });
        }

        // Minimum trait counts.
        for occurrence in &week_sorted {
            for required in &occurrence.requirements.required_traits {
                let sum: Expression = staff_sorted
                    .iter()
                    .filter(|s| s.has_trait(required.trait_id))
                    .filter_map(|s| x.get(&(s.id, occurrence.id)))
                    .map(|&v| Expression::from(v))
                    .sum();
                constraints.push(constraint!(sum >= required.min_count as f64));
            }
        }

        // Per-period caps.
        for staff in &staff_sorted {
            for &day in &days {
                let existing = self.existing_count_outside_week(staff.id, Period::Day, day);
                let remaining = staff.constraints.effective_max_per_day().saturating_sub(existing);
                let sum: Expression = week_sorted
                    .iter()
                    .filter(|o| o.start.date_naive() == day)
                    .filter_map(|o| x.get(&(staff.id, o.id)))
                    .map(|&v| Expression::from(v))
                    .sum();
                constraints.push(constraint!(sum <= remaining as f64));
            }

            let existing_week = self.existing_count_outside_week(staff.id, Period::Week, self.week_start);
            let remaining_week = staff.constraints.effective_max_per_week().saturating_sub(existing_week);
            let week_sum: Expression = week_sorted
                .iter()
                .filter_map(|o| x.get(&(staff.id, o.id)))
                .map(|&v| Expression::from(v))
                .sum();
            constraints.push(constraint!(week_sum <= remaining_week as f64));

            let existing_month = self.existing_count_outside_week(staff.id, Period::Month, self.week_start);
            let remaining_month = staff.constraints.effective_max_per_month().saturating_sub(existing_month);
            let month_sum: Expression = week_sorted
                .iter()
                .filter_map(|o| x.get(&(staff.id, o.id)))
                .map(|&v| Expression::from(v))
                .sum();
            constraints.push(constraint!(month_sum <= remaining_month as f64));

            if let Some(year_cap) = staff.constraints.effective_max_per_year() {
                let existing_year = self.existing_count_outside_week(staff.id, Period::Year, self.week_start);
                let remaining_year = year_cap.saturating_sub(existing_year);
                let year_sum: Expression = week_sorted
                    .iter()
                    .filter_map(|o| x.get(&(staff.id, o.id)))
                    .map(|&v| Expression::from(v))
                    .sum();
                constraints.push(constraint!(year_sum <= remaining_year as f64));
            }
        }

        // Incompatibility.
        for occurrence in &week_sorted {
            for (i, s1) in staff_sorted.iter().enumerate() {
                for s2 in staff_sorted.iter().skip(i + 1) {
                    let incompatible = s1.constraints.incompatible_with.contains(&s2.id)
                        || s2.constraints.incompatible_with.contains(&s1.id);
                    if !incompatible {
                        continue;
                    }
                    if let (Some(&v1), Some(&v2)) = (
                        x.get(&(s1.id, occurrence.id)),
                        x.get(&(s2.id, occurrence.id)),
                    ) {
                        constraints.push(constraint!(v1 + v2 <= 1.0));
                    }
                }
            }
        }

        // work[s,d] linkage: x[s,o] - work[s,d] <= 0.
        for occurrence in &week_sorted {
            let day = occurrence.start.date_naive();
            for staff in &staff_sorted {
                if let (Some(&xv), Some(&wv)) =
                    (x.get(&(staff.id, occurrence.id)), work.get(&(staff.id, day)))
                {
                    constraints.push(constraint!(xv - wv <= 0.0));
                }
            }
        }

        // Consecutive rest windows.
        for staff in &staff_sorted {
            for rule in &staff.constraints.consecutive_rest_days {
                if rule.period != Period::Week {
                    continue;
                }
                let k = rule.min_consecutive_days as usize;
                if k == 0 || k > days.len() {
                    continue;
                }
                let mut window_sum = Expression::from(0.0);
                for start_index in 0..=(days.len() - k) {
                    let Some(&rw) = rest_window.get(&(staff.id, start_index)) else {
                        continue;
                    };
                    window_sum += rw;
                    for offset in 0..k {
                        if let Some(&wv) = work.get(&(staff.id, days[start_index + offset])) {
                            constraints.push(constraint!(rw + wv <= 1.0));
                        }
                    }
                }
                constraints.push(constraint!(window_sum >= 1.0));
            }
        }

        // Shared rest with peer.
        for staff in &staff_sorted {
            for rule in &staff.constraints.rest_days_with_staff {
                if rule.period != Period::Week {
                    continue;
                }
                let mut shared_sum = Expression::from(0.0);
                for &day in &days {
                    let Some(&sr) = shared_rest.get(&(staff.id, rule.peer, day)) else {
                        continue;
                    };
                    shared_sum += sr;
                    if let Some(&wv) = work.get(&(staff.id, day)) {
                        constraints.push(constraint!(sr + wv <= 1.0));
                    }
                    if let Some(&wv) = work.get(&(rule.peer, day)) {
                        constraints.push(constraint!(sr + wv <= 1.0));
                    }
                }
                constraints.push(constraint!(shared_sum >= rule.min_rest_days as f64));
            }
        }

        let objective: Expression = x.values().map(|&v| Expression::from(v)).sum();

        Model {
            vars,
            x,
            work,
            rest_window,
            shared_rest,
            objective,
            constraints,
        }
    }
}
