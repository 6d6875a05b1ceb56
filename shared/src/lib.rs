pub mod error;
pub mod ids;
pub mod severity;

// Re-export commonly used items
pub use error::{SchedulerError, SchedulerResult};
pub use ids::{BlockedTimeId, OccurrenceId, StaffId, TraitId};
pub use severity::Severity;
