use thiserror::Error;

/// Error surface shared by the validator and the scheduler.
///
/// The validator never produces one of these: its contract is "pure,
/// total, deterministic" and violations are data, not errors. The
/// scheduler's contract is "best-effort, never throws" — infeasibility
/// is recovered locally (relaxation, then greedy) and never reaches
/// this type; only malformed snapshots and solver failures do.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("solver error: {0}")]
    Solver(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
