use serde::{Deserialize, Serialize};
use shared::{OccurrenceId, StaffId};

/// Occurrence-id → ordered list of staff-ids, as produced by the
/// scheduler.
///
/// Ordered by occurrence id in the order occurrences were enumerated
/// in the input (§5: "insertion-ordered by occurrence id as enumerated
/// in the input"), not by id value — a plain `HashMap`/`BTreeMap`
/// can't express that, so this wraps a `Vec` instead. Per-shift staff
/// lists are sorted by each producer before being stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentMap {
    entries: Vec<(OccurrenceId, Vec<StaffId>)>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, occurrence_id: OccurrenceId, staff: Vec<StaffId>) {
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == occurrence_id) {
            entry.1 = staff;
        } else {
            self.entries.push((occurrence_id, staff));
        }
    }

    pub fn get(&self, occurrence_id: OccurrenceId) -> Option<&[StaffId]> {
        self.entries
            .iter()
            .find(|(id, _)| *id == occurrence_id)
            .map(|(_, staff)| staff.as_slice())
    }

    pub fn entry_or_default(&mut self, occurrence_id: OccurrenceId) -> &mut Vec<StaffId> {
        if !self.entries.iter().any(|(id, _)| *id == occurrence_id) {
            self.entries.push((occurrence_id, Vec::new()));
        }
        &mut self
            .entries
            .iter_mut()
            .find(|(id, _)| *id == occurrence_id)
            .unwrap()
            .1
    }

    pub fn iter(&self) -> impl Iterator<Item = (OccurrenceId, &[StaffId])> {
        self.entries.iter().map(|(id, staff)| (*id, staff.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
