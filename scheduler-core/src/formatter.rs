//! Message formatting hook. The core never hard-codes user-facing
//! text — every violation message and staffing-status message is built
//! by calling an injected formatter with a stable key and parameters,
//! so the core stays language-agnostic (§6, §9).

use std::collections::HashMap;

/// `(key, params) -> rendered string`. Implementations typically look
/// `key` up in a translation table and interpolate `params`.
pub trait Formatter: Send + Sync {
    fn format(&self, key: &str, params: &HashMap<String, String>) -> String;
}

/// Message keys emitted by the validator and staffing-status
/// evaluator. Part of the documented interface contract (§6): callers
/// can rely on these exact strings when wiring up translations.
pub mod keys {
    pub const BLOCKED_TIME: &str = "violation.blocked_time";
    pub const INCOMPATIBLE_STAFF: &str = "violation.incompatible_staff";
    pub const DAILY_SHIFT_LIMIT: &str = "violation.daily_shift_limit";
    pub const WEEKLY_SHIFT_LIMIT: &str = "violation.weekly_shift_limit";
    pub const MONTHLY_SHIFT_LIMIT: &str = "violation.monthly_shift_limit";
    pub const YEARLY_SHIFT_LIMIT: &str = "violation.yearly_shift_limit";
    pub const REST_DAYS_WITH_STAFF: &str = "violation.rest_days_with_staff";
    pub const CONSECUTIVE_REST_DAYS: &str = "violation.consecutive_rest_days";

    pub const STATUS_NOT_STAFFED: &str = "status.not_staffed";
    pub const STATUS_UNDERSTAFFED_TRAIT: &str = "status.understaffed_trait";
    pub const STATUS_CONSTRAINT_VIOLATION: &str = "status.constraint_violation";
    pub const STATUS_UNDERSTAFFED: &str = "status.understaffed";
    pub const STATUS_OVERSTAFFED: &str = "status.overstaffed";
    pub const STATUS_PROPERLY_STAFFED: &str = "status.properly_staffed";

    pub const PERIOD_DAY: &str = "period.day";
    pub const PERIOD_WEEK: &str = "period.week";
    pub const PERIOD_MONTH: &str = "period.month";
    pub const PERIOD_YEAR: &str = "period.year";

    pub const WARNING_UNFILLED_SHIFTS: &str = "warning.unfilled_shifts";
    pub const WARNING_UNDERSTAFFED_SHIFTS: &str = "warning.understaffed_shifts";
    pub const WARNING_ALL_CONSTRAINTS_RESPECTED: &str = "warning.all_constraints_respected";
    pub const REASON_INSUFFICIENT_STAFF: &str = "reason.insufficient_staff";
    pub const REASON_UNMET_TRAIT_REQUIREMENTS: &str = "reason.unmet_trait_requirements";
    pub const REASON_STAFF_BLOCKED: &str = "reason.staff_blocked";

    pub const ERROR_UNKNOWN_STAFF_REFERENCE: &str = "error.unknown_staff_reference";
    pub const ERROR_SOLVER_FAILURE: &str = "error.solver_failure";
}

/// Default formatter used by tests and by callers that have not wired
/// translations yet: renders `key` with its params inline rather than
/// looking anything up.
pub struct DebugFormatter;

impl Formatter for DebugFormatter {
    fn format(&self, key: &str, params: &HashMap<String, String>) -> String {
        let mut parts: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        parts.sort();
        format!("{key}{{{}}}", parts.join(", "))
    }
}

pub fn params(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
}
