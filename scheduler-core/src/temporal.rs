//! Period boundaries, day enumeration, and blocked-time occurrence
//! expansion. Every other component (validator, ILP builder, greedy
//! scheduler) goes through these functions for period math so the
//! week-start convention cannot drift between them.

use crate::model::staff::{BlockedTime, Recurrence, RecurrenceKind};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Week starts on Sunday — the convention used throughout this crate
/// (validator period counts, ILP day enumeration, greedy scheduling).
/// Resolves spec.md's open question about week-start weekday
/// explicitly; see DESIGN.md.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday();
    date - Duration::days(days_from_sunday as i64)
}

pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDate {
    date
}

pub fn end_of_day(date: NaiveDate) -> NaiveDate {
    date
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let next_month_first = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month_first
        .map(|d| d - Duration::days(1))
        .unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

pub fn same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn day_difference(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Every calendar date in `[from, to]`, inclusive.
pub fn enumerate_days(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cursor = from;
    while cursor <= to {
        out.push(cursor);
        cursor += Duration::days(1);
    }
    out
}

/// Every occurrence day of a Sunday-starting week containing `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    enumerate_days(start_of_week(date), end_of_week(date))
}

/// Monthly recurrence without an explicit `end_date` is bounded to a
/// one-year horizon past the query's `from` — a pragmatic choice the
/// distilled spec flags as non-normative, fixed here so expansion
/// always terminates.
pub const DEFAULT_RECURRENCE_HORIZON_DAYS: i64 = 365;

fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() as u32 + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, date.day())
}

/// Expand a `BlockedTime` into every concrete `[start, end)`
/// sub-interval overlapping the query window `[from, to]`.
///
/// - No recurrence: the single base interval if it overlaps the query.
/// - Weekly with weekdays set: one occurrence per selected weekday,
///   every `interval`-th week from the week containing the base start,
///   at the base time-of-day, until `recurrence.end_date` (or `to`).
/// - Otherwise (daily, weekly without weekdays, monthly): step the
///   base interval by `interval` daily/weekly/monthly units.
pub fn expand_blocked_time(
    blocked: &BlockedTime,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let duration = blocked.end - blocked.start;

    let Some(recurrence) = &blocked.recurrence else {
        return if intervals_overlap(blocked.start, blocked.end, from, to) {
            vec![(blocked.start, blocked.end)]
        } else {
            vec![]
        };
    };

    let horizon_end = recurrence
        .end_date
        .unwrap_or(blocked.start + Duration::days(DEFAULT_RECURRENCE_HORIZON_DAYS))
        .min(to);

    match recurrence.kind {
        RecurrenceKind::Weekly if !recurrence.weekdays.is_empty() => {
            expand_weekly_with_weekdays(blocked, from, horizon_end, duration, recurrence)
        }
        RecurrenceKind::Daily => expand_stepped(
            blocked,
            from,
            horizon_end,
            duration,
            Duration::days(recurrence.interval.max(1) as i64),
        ),
        RecurrenceKind::Weekly => expand_stepped(
            blocked,
            from,
            horizon_end,
            duration,
            Duration::weeks(recurrence.interval.max(1) as i64),
        ),
        RecurrenceKind::Monthly => {
            expand_monthly(blocked, from, horizon_end, duration, recurrence.interval.max(1))
        }
    }
}

fn expand_weekly_with_weekdays(
    blocked: &BlockedTime,
    from: DateTime<Utc>,
    horizon_end: DateTime<Utc>,
    duration: Duration,
    recurrence: &Recurrence,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let interval = recurrence.interval.max(1) as i64;
    let base_week = start_of_week(blocked.start.date_naive());
    let query_week = start_of_week(from.date_naive().max(blocked.start.date_naive()));

    let mut out = Vec::new();
    let mut week = query_week;
    while week.and_time(chrono::NaiveTime::MIN).and_utc() <= horizon_end {
        let week_index = (week - base_week).num_days() / 7;
        if week_index >= 0 && week_index % interval == 0 {
            for weekday in &recurrence.weekdays {
                if let Some(day) = week.checked_add_signed(Duration::days(*weekday as i64)) {
                    let occ_start = day.and_time(blocked.start.time()).and_utc();
                    let occ_end = occ_start + duration;
                    if occ_start >= blocked.start
                        && intervals_overlap(occ_start, occ_end, from, horizon_end)
                    {
                        out.push((occ_start, occ_end));
                    }
                }
            }
        }
        week += Duration::weeks(1);
    }
    out.sort_by_key(|(s, _)| *s);
    out
}

fn expand_stepped(
    blocked: &BlockedTime,
    from: DateTime<Utc>,
    horizon_end: DateTime<Utc>,
    duration: Duration,
    step: Duration,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut out = Vec::new();
    let mut cursor = blocked.start;
    while cursor <= horizon_end {
        let occ_end = cursor + duration;
        if intervals_overlap(cursor, occ_end, from, horizon_end) {
            out.push((cursor, occ_end));
        }
        cursor += step;
    }
    out
}

fn expand_monthly(
    blocked: &BlockedTime,
    from: DateTime<Utc>,
    horizon_end: DateTime<Utc>,
    duration: Duration,
    interval: u32,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut out = Vec::new();
    let mut month_offset = 0u32;
    loop {
        let Some(cursor_date) = add_months(blocked.start.date_naive(), month_offset * interval)
        else {
            break;
        };
        let cursor = cursor_date.and_time(blocked.start.time()).and_utc();
        if cursor > horizon_end {
            break;
        }
        let occ_end = cursor + duration;
        if intervals_overlap(cursor, occ_end, from, horizon_end) {
            out.push((cursor, occ_end));
        }
        month_offset += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::staff::RecurrenceKind;
    use uuid::Uuid;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-01-15 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let start = start_of_week(monday);
        assert_eq!(start.weekday(), chrono::Weekday::Sun);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    }

    #[test]
    fn non_recurring_blocked_time_expands_once_if_overlapping() {
        let blocked = BlockedTime {
            id: Uuid::new_v4(),
            start: dt(2024, 1, 15, 9),
            end: dt(2024, 1, 15, 17),
            is_full_day: false,
            recurrence: None,
        };
        let occs = expand_blocked_time(&blocked, dt(2024, 1, 1, 0), dt(2024, 2, 1, 0));
        assert_eq!(occs, vec![(dt(2024, 1, 15, 9), dt(2024, 1, 15, 17))]);

        let none = expand_blocked_time(&blocked, dt(2024, 2, 1, 0), dt(2024, 3, 1, 0));
        assert!(none.is_empty());
    }

    #[test]
    fn weekly_recurrence_with_weekdays_emits_selected_days() {
        let mut weekdays = std::collections::HashSet::new();
        weekdays.insert(1u8); // Monday, relative to base week's Sunday
        weekdays.insert(3u8); // Wednesday
        let blocked = BlockedTime {
            id: Uuid::new_v4(),
            start: dt(2024, 1, 14, 9), // Sunday
            end: dt(2024, 1, 14, 10),
            is_full_day: false,
            recurrence: Some(Recurrence {
                kind: RecurrenceKind::Weekly,
                interval: 1,
                weekdays,
                end_date: Some(dt(2024, 1, 28, 0)),
            }),
        };
        let occs = expand_blocked_time(&blocked, dt(2024, 1, 14, 0), dt(2024, 1, 28, 0));
        // Two weeks * two weekdays = 4 occurrences.
        assert_eq!(occs.len(), 4);
    }

    #[test]
    fn daily_recurrence_steps_by_interval() {
        let blocked = BlockedTime {
            id: Uuid::new_v4(),
            start: dt(2024, 1, 1, 9),
            end: dt(2024, 1, 1, 10),
            is_full_day: false,
            recurrence: Some(Recurrence {
                kind: RecurrenceKind::Daily,
                interval: 2,
                weekdays: Default::default(),
                end_date: Some(dt(2024, 1, 8, 0)),
            }),
        };
        let occs = expand_blocked_time(&blocked, dt(2024, 1, 1, 0), dt(2024, 1, 8, 0));
        assert_eq!(occs.len(), 4); // Jan 1, 3, 5, 7
    }
}
