//! Workforce shift-scheduling engine: builds and solves a 0/1 ILP for
//! a target week, falls back to a deterministic greedy pass when the
//! solver can't fully staff the week, and exposes the constraint
//! validator and staffing-status evaluator used by both the scheduler
//! and interactive callers.
//!
//! Invoked synchronously as a pure function: inputs in, outputs out,
//! no shared mutable state (§5). The three public entry points are
//! [`schedule`], [`validate`], and [`staffing_status`].

pub mod formatter;
pub mod greedy;
pub mod ilp;
pub mod model;
pub mod schedule;
pub mod status;
pub mod temporal;
pub mod validator;

pub use formatter::{Formatter, keys};
pub use schedule::{schedule, Algorithm, ScheduleResult, ScheduleWarning};
pub use status::{staffing_status, StaffingStatus, StaffingStatusReport, StatusColor};
pub use validator::{Mode, ValidationContext, Validator, ValidatorRegistry};

pub use model::{
    AssignmentMap, BlockedTime, ConsecutiveRestDays, ConstraintViolation, Period, Recurrence,
    RecurrenceKind, RequiredTrait, RestDaysWithStaff, ShiftOccurrence, ShiftRequirements,
    StaffConstraints, StaffMember, Trait, ViolationDetails, ViolationType,
};

/// Validate one (staff, occurrence) pairing against every registered
/// constraint kind (§4.2, §6 operation 2).
pub fn validate(context: &ValidationContext) -> Vec<ConstraintViolation> {
    ValidatorRegistry::standard().validate(context)
}
