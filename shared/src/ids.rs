use uuid::Uuid;

/// Identifier for a [`StaffMember`](crate) snapshot entry.
pub type StaffId = Uuid;

/// Identifier for a shift occurrence.
pub type OccurrenceId = Uuid;

/// Identifier for a trait (skill label).
pub type TraitId = Uuid;

/// Identifier for a blocked-time entry on a staff member.
pub type BlockedTimeId = Uuid;
