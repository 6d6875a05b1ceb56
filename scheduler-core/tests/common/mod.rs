use chrono::{DateTime, NaiveDate, Utc};
use scheduler_core::{
    RequiredTrait, ShiftOccurrence, ShiftRequirements, StaffConstraints, StaffMember,
};
use std::collections::HashSet;
use uuid::Uuid;

pub fn dt(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn staff(name: &str) -> StaffMember {
    StaffMember {
        id: Uuid::new_v4(),
        name: name.to_string(),
        trait_ids: HashSet::new(),
        constraints: StaffConstraints::default(),
        blocked_times: vec![],
    }
}

pub fn staff_with_traits(name: &str, traits: &[Uuid]) -> StaffMember {
    StaffMember {
        trait_ids: traits.iter().copied().collect(),
        ..staff(name)
    }
}

pub fn staff_with_constraints(name: &str, constraints: StaffConstraints) -> StaffMember {
    StaffMember {
        constraints,
        ..staff(name)
    }
}

pub fn shift(name: &str, day: NaiveDate, staff_count: u32) -> ShiftOccurrence {
    ShiftOccurrence {
        id: Uuid::new_v4(),
        name: name.to_string(),
        start: day.and_hms_opt(9, 0, 0).unwrap().and_utc(),
        end: day.and_hms_opt(17, 0, 0).unwrap().and_utc(),
        requirements: ShiftRequirements {
            staff_count,
            required_traits: vec![],
            excluded_traits: HashSet::new(),
            preferred_traits: HashSet::new(),
        },
        assigned_staff: vec![],
    }
}

pub fn shift_requiring_trait(
    name: &str,
    day: NaiveDate,
    staff_count: u32,
    trait_id: Uuid,
    min_count: u32,
) -> ShiftOccurrence {
    ShiftOccurrence {
        requirements: ShiftRequirements {
            required_traits: vec![RequiredTrait { trait_id, min_count }],
            ..ShiftRequirements {
                staff_count,
                required_traits: vec![],
                excluded_traits: HashSet::new(),
                preferred_traits: HashSet::new(),
            }
        },
        ..shift(name, day, staff_count)
    }
}

pub fn week_of(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
