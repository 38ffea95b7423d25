//! Control-request dispatch for supervised runs.
//!
//! One [`DispatchLoop`] drives one service session: it starts the
//! application, announces `Running`, then translates supervisor controls
//! into lifecycle calls until a stop or shutdown ends the session.
//! Application failures never cross the host boundary as return values;
//! they are recorded in the shared [`ErrorRelay`] and the host only sees
//! the numeric outcome.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::LifecycleClient;
use crate::control::{AcceptedCommands, ControlChannel, ControlRequest, StatusReport};
use crate::errors::{LifecyclePhase, StewardError};
use crate::relay::ErrorRelay;

/// How a dispatch-loop run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The application stopped cleanly
    Stopped,
    /// `start` failed; the loop was never entered
    StartFailed,
    /// A stop or shutdown handler failed
    StopFailed,
}

impl DispatchOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, DispatchOutcome::Stopped)
    }

    /// Numeric code the host reports to the OS for this session
    pub fn exit_code(&self) -> u32 {
        match self {
            DispatchOutcome::Stopped => 0,
            DispatchOutcome::StartFailed => 1,
            DispatchOutcome::StopFailed => 2,
        }
    }
}

/// State machine owning one control channel for the duration of a
/// supervised run
pub struct DispatchLoop {
    name: String,
    client: Arc<dyn LifecycleClient>,
    relay: Arc<ErrorRelay>,
}

impl DispatchLoop {
    pub fn new(
        name: impl Into<String>,
        client: Arc<dyn LifecycleClient>,
        relay: Arc<ErrorRelay>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            relay,
        }
    }

    /// Name of the service this loop drives
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drive one service session over `channel`.
    ///
    /// Emissions happen in loop order: `StartPending`, then `Running`, then
    /// exactly one `StopPending` once a stop or shutdown request arrives.
    /// The terminal `Stopped` report is the host's to emit after this
    /// returns.
    pub async fn run(&self, mut channel: ControlChannel) -> DispatchOutcome {
        let mut current = StatusReport::start_pending();
        self.emit(&channel, current);

        if let Err(fault) = self.client.start().await {
            error!("Service {} failed to start: {}", self.name, fault);
            self.relay
                .record(StewardError::client(LifecyclePhase::Start, fault));
            return DispatchOutcome::StartFailed;
        }

        current = StatusReport::running(AcceptedCommands::STOP | AcceptedCommands::SHUTDOWN);
        self.emit(&channel, current);
        info!("Service {} is running", self.name);

        loop {
            match channel.requests.recv().await {
                Some(ControlRequest::Interrogate) => {
                    self.emit(&channel, current);
                }
                Some(ControlRequest::Stop) => {
                    self.emit(&channel, StatusReport::stop_pending());
                    return self.stop_client(LifecyclePhase::Stop).await;
                }
                Some(ControlRequest::Shutdown) => {
                    self.emit(&channel, StatusReport::stop_pending());
                    return self.shutdown_or_stop().await;
                }
                Some(ControlRequest::Other(code)) => {
                    debug!("Service {} ignoring control request {}", self.name, code);
                }
                None => {
                    // The host side is gone, so no transition is emitted;
                    // the application still gets wound down.
                    debug!("Control channel for {} closed by host", self.name);
                    return self.shutdown_or_stop().await;
                }
            }
        }
    }

    /// Run the shutdown handler when the client advertises one, the plain
    /// stop otherwise
    async fn shutdown_or_stop(&self) -> DispatchOutcome {
        match self.client.shutdowner() {
            Some(shutdowner) => {
                if let Err(fault) = shutdowner.shutdown().await {
                    error!("Service {} failed to shut down: {}", self.name, fault);
                    self.relay
                        .record(StewardError::client(LifecyclePhase::Shutdown, fault));
                    return DispatchOutcome::StopFailed;
                }
                info!("Service {} shut down", self.name);
                DispatchOutcome::Stopped
            }
            None => self.stop_client(LifecyclePhase::Stop).await,
        }
    }

    async fn stop_client(&self, phase: LifecyclePhase) -> DispatchOutcome {
        if let Err(fault) = self.client.stop().await {
            error!("Service {} failed to stop: {}", self.name, fault);
            self.relay.record(StewardError::client(phase, fault));
            return DispatchOutcome::StopFailed;
        }
        info!("Service {} stopped", self.name);
        DispatchOutcome::Stopped
    }

    fn emit(&self, channel: &ControlChannel, report: StatusReport) {
        if channel.status.send(report).is_err() {
            debug!(
                "Status receiver for {} dropped; {} report not delivered",
                self.name, report.state
            );
        }
    }
}
