//! Bulk import policy and outcome

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

// == Import Policy ==
/// How a bulk import reacts to a candidate it cannot persist.
///
/// Fixed per service instance, never chosen per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportPolicy {
    /// Process candidates in order and stop at the first failure. Entities
    /// saved before the failure stay committed.
    #[default]
    FailFast,
    /// Process candidates concurrently, skip and log the ones that fail,
    /// commit the rest.
    BestEffort,
}

impl FromStr for ImportPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" => Ok(ImportPolicy::FailFast),
            "best-effort" | "best_effort" | "besteffort" => Ok(ImportPolicy::BestEffort),
            other => Err(ConfigError::UnknownImportPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ImportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportPolicy::FailFast => f.write_str("fail-fast"),
            ImportPolicy::BestEffort => f.write_str("best-effort"),
        }
    }
}

// == Import Report ==
/// Outcome of a completed bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    /// Entities validated, saved and cached
    pub imported: usize,
    /// Entities skipped (always 0 under [`ImportPolicy::FailFast`])
    pub skipped: usize,
}
