//! Service States
//!
//! The four outcomes defined by the monitoring plugin API, ordered by
//! significance. The numeric rank doubles as the process exit code, so the
//! mapping is frozen: renumbering would break every alerting integration
//! that keys off exit codes.

use serde::{Deserialize, Serialize};

/// Outcome of a check or of a single metric evaluation.
///
/// States form a total order: `Ok < Warning < Critical < Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    /// The measured value is within all thresholds
    Ok = 0,
    /// The warning threshold was breached
    Warning = 1,
    /// The critical threshold was breached
    Critical = 2,
    /// The status could not be determined
    Unknown = 3,
}

impl ServiceState {
    /// Plugin-API compliant exit code (0/1/2/3).
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Maps an exit code back to a state.
    ///
    /// Anything outside the defined 0..=3 band is treated as [`Unknown`],
    /// matching how monitoring engines classify stray exit codes.
    ///
    /// [`Unknown`]: ServiceState::Unknown
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ServiceState::Ok,
            1 => ServiceState::Warning,
            2 => ServiceState::Critical,
            _ => ServiceState::Unknown,
        }
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Ok => write!(f, "ok"),
            ServiceState::Warning => write!(f, "warning"),
            ServiceState::Critical => write!(f, "critical"),
            ServiceState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Reduces a sequence of states to the most significant one.
///
/// An empty sequence reduces to [`ServiceState::Ok`]: an evaluation that
/// produced nothing is, by convention, healthy. This is a deliberate part of
/// the contract, not an accident of implementation.
pub fn worst<I>(states: I) -> ServiceState
where
    I: IntoIterator<Item = ServiceState>,
{
    states.into_iter().max().unwrap_or(ServiceState::Ok)
}
