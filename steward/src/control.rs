//! Control-channel vocabulary between a host supervisor and the dispatch loop.
//!
//! The host drives the service with [`ControlRequest`]s and observes
//! [`StatusReport`]s coming back. Requests ride a bounded channel because the
//! supervisor serializes delivery; reports ride an unbounded channel so that
//! emitting a status can never stall lifecycle progress.

use tokio::sync::mpsc;

/// Control request delivered by the host supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Ask the service to re-emit its current status
    Interrogate,
    /// Stop the service
    Stop,
    /// The host is shutting down; stop the service
    Shutdown,
    /// A request code this library does not handle
    Other(u32),
}

impl ControlRequest {
    /// Get a string representation of the request type
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlRequest::Interrogate => "interrogate",
            ControlRequest::Stop => "stop",
            ControlRequest::Shutdown => "shutdown",
            ControlRequest::Other(_) => "other",
        }
    }
}

/// Lifecycle phase reported back to the host supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    StartPending,
    Running,
    StopPending,
    Stopped,
}

impl StatusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusState::StartPending => "start-pending",
            StatusState::Running => "running",
            StatusState::StopPending => "stop-pending",
            StatusState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitmask of control requests the service currently honors.
///
/// Advertised with every status report; empty during pending states so the
/// supervisor does not deliver controls the service cannot act on yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcceptedCommands(u8);

impl AcceptedCommands {
    pub const NONE: AcceptedCommands = AcceptedCommands(0);
    pub const STOP: AcceptedCommands = AcceptedCommands(1 << 0);
    pub const SHUTDOWN: AcceptedCommands = AcceptedCommands(1 << 1);

    pub fn contains(self, other: AcceptedCommands) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for AcceptedCommands {
    type Output = AcceptedCommands;

    fn bitor(self, rhs: AcceptedCommands) -> AcceptedCommands {
        AcceptedCommands(self.0 | rhs.0)
    }
}

/// Status report emitted by the dispatch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub state: StatusState,
    pub accepts: AcceptedCommands,
}

impl StatusReport {
    pub const fn start_pending() -> Self {
        Self {
            state: StatusState::StartPending,
            accepts: AcceptedCommands::NONE,
        }
    }

    pub const fn running(accepts: AcceptedCommands) -> Self {
        Self {
            state: StatusState::Running,
            accepts,
        }
    }

    pub const fn stop_pending() -> Self {
        Self {
            state: StatusState::StopPending,
            accepts: AcceptedCommands::NONE,
        }
    }

    /// Terminal report. Emitted by hosts after the dispatch loop returns,
    /// never by the loop itself.
    pub const fn stopped() -> Self {
        Self {
            state: StatusState::Stopped,
            accepts: AcceptedCommands::NONE,
        }
    }
}

/// Service end of the control channel, consumed by the dispatch loop
pub struct ControlChannel {
    pub requests: mpsc::Receiver<ControlRequest>,
    pub status: mpsc::UnboundedSender<StatusReport>,
}

/// Host end of the control channel
pub struct SupervisorChannel {
    pub requests: mpsc::Sender<ControlRequest>,
    pub status: mpsc::UnboundedReceiver<StatusReport>,
}

/// Capacity of the request queue. Hosts deliver controls one at a time, so
/// this only needs headroom for a short burst.
pub const CONTROL_REQUEST_CAPACITY: usize = 16;

/// Create a connected channel pair
///
/// Returns (host end, service end) where:
/// - host end: used by the supervisor to deliver requests and read reports
/// - service end: handed to the dispatch loop for one supervised run
pub fn control_channel() -> (SupervisorChannel, ControlChannel) {
    let (request_tx, request_rx) = mpsc::channel(CONTROL_REQUEST_CAPACITY);
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    (
        SupervisorChannel {
            requests: request_tx,
            status: status_rx,
        },
        ControlChannel {
            requests: request_rx,
            status: status_tx,
        },
    )
}

#[cfg(test)]
mod tests;
