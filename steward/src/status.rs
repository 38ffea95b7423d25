//! Status vocabulary for the service-manager side of the library.
//!
//! Managers report fine-grained states (`RawServiceState`); callers of
//! [`status`](crate::controller::LifecycleController::status) only ever
//! see the collapsed [`ObservedStatus`].

/// Fine-grained state of an installed service instance as reported by
/// the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    /// A state code this library does not model
    Other(u32),
}

impl RawServiceState {
    /// Map a manager's numeric state code onto the enum. Codes follow the
    /// conventional service-manager numbering; anything unrecognized is
    /// preserved as `Other`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => RawServiceState::Stopped,
            2 => RawServiceState::StartPending,
            3 => RawServiceState::StopPending,
            4 => RawServiceState::Running,
            5 => RawServiceState::ContinuePending,
            6 => RawServiceState::PausePending,
            7 => RawServiceState::Paused,
            other => RawServiceState::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            RawServiceState::Stopped => 1,
            RawServiceState::StartPending => 2,
            RawServiceState::StopPending => 3,
            RawServiceState::Running => 4,
            RawServiceState::ContinuePending => 5,
            RawServiceState::PausePending => 6,
            RawServiceState::Paused => 7,
            RawServiceState::Other(code) => *code,
        }
    }
}

impl std::fmt::Display for RawServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RawServiceState::Stopped => "stopped",
            RawServiceState::StartPending => "start-pending",
            RawServiceState::StopPending => "stop-pending",
            RawServiceState::Running => "running",
            RawServiceState::ContinuePending => "continue-pending",
            RawServiceState::PausePending => "pause-pending",
            RawServiceState::Paused => "paused",
            RawServiceState::Other(code) => return write!(f, "other({})", code),
        };
        f.write_str(name)
    }
}

/// Coarse status reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedStatus {
    Running,
    Stopped,
    Unknown,
}

impl ObservedStatus {
    /// Collapse a raw manager state. Total: every raw state maps to
    /// exactly one observed status, with unmodeled states as `Unknown`.
    pub fn from_raw(raw: RawServiceState) -> Self {
        match raw {
            RawServiceState::StartPending | RawServiceState::Running => ObservedStatus::Running,
            RawServiceState::PausePending
            | RawServiceState::Paused
            | RawServiceState::ContinuePending
            | RawServiceState::StopPending
            | RawServiceState::Stopped => ObservedStatus::Stopped,
            RawServiceState::Other(_) => ObservedStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObservedStatus::Running => "running",
            ObservedStatus::Stopped => "stopped",
            ObservedStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ObservedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
