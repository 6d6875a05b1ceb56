use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{OccurrenceId, StaffId, TraitId};
use std::collections::HashSet;

/// Reference data: a skill label attached to staff and referenced by
/// shift requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trait {
    pub id: TraitId,
    pub name: String,
}

/// A single scheduled instance of a shift with a fixed start and end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOccurrence {
    pub id: OccurrenceId,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requirements: ShiftRequirements,
    #[serde(default)]
    pub assigned_staff: Vec<StaffId>,
}

impl ShiftOccurrence {
    pub fn is_assigned(&self, staff_id: StaffId) -> bool {
        self.assigned_staff.contains(&staff_id)
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequirements {
    pub staff_count: u32,
    #[serde(default)]
    pub required_traits: Vec<RequiredTrait>,
    #[serde(default)]
    pub excluded_traits: HashSet<TraitId>,
    #[serde(default)]
    pub preferred_traits: HashSet<TraitId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredTrait {
    pub trait_id: TraitId,
    pub min_count: u32,
}
