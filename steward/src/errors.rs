use thiserror::Error;
use tokio::sync::mpsc;

use crate::client::ClientError;
use crate::status::RawServiceState;

/// Which lifecycle call on the application produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Start,
    Stop,
    Shutdown,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Start => "start",
            LifecyclePhase::Stop => "stop",
            LifecyclePhase::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which convergence wait ran out of budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedOperation {
    Stop,
    Removal,
}

impl TimedOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimedOperation::Stop => "stop",
            TimedOperation::Removal => "removal",
        }
    }
}

impl std::fmt::Display for TimedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StewardError {
    #[error("Cannot reach the service manager: {0}")]
    Connection(String),

    #[error("Service {0} is not installed")]
    NotInstalled(String),

    #[error("Service {0} already exists")]
    AlreadyExists(String),

    #[error("{operation} wait for service {name} timed out")]
    Timeout { name: String, operation: TimedOperation },

    #[error("Service {phase} failed: {fault}")]
    Client { phase: LifecyclePhase, fault: ClientError },

    #[error("Unknown service status: {0}")]
    UnknownStatus(RawServiceState),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StewardError {
    /// Wrap an application failure with the phase that produced it
    pub fn client(phase: LifecyclePhase, fault: ClientError) -> Self {
        StewardError::Client { phase, fault }
    }
}

pub type Result<T> = std::result::Result<T, StewardError>;

/// Delivery channel for errors that never surface in a `Result`, such as
/// the best-effort stop failure during uninstall. Sending never blocks;
/// a dropped receiver is ignored.
pub type ErrorSink = mpsc::UnboundedSender<StewardError>;
