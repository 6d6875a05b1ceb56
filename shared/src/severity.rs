use serde::{Deserialize, Serialize};

/// Violation severity. Ordered so a list of violations can be sorted
/// error-first: `error < warning < info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
