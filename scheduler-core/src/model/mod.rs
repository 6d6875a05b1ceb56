pub mod assignment;
pub mod shift;
pub mod staff;
pub mod violation;

pub use assignment::AssignmentMap;
pub use shift::{RequiredTrait, ShiftOccurrence, ShiftRequirements, Trait};
pub use staff::{
    BlockedTime, ConsecutiveRestDays, Period, Recurrence, RecurrenceKind, RestDaysWithStaff,
    StaffConstraints, StaffMember,
};
pub use violation::{ConstraintViolation, ViolationDetails, ViolationType};
