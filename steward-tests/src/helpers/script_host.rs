//! Supervisor host fake
//!
//! Plays the host side of the control channel: feeds a scripted request
//! sequence to the dispatch loop, records every status report that comes
//! back, and appends the terminal stopped report a real host announces
//! after the loop returns.

use async_trait::async_trait;
use parking_lot::Mutex;
use steward::control::{ControlRequest, StatusReport, StatusState, control_channel};
use steward::dispatch::{DispatchLoop, DispatchOutcome};
use steward::errors::{Result, StewardError};
use steward::host::SupervisorHost;

pub struct ScriptedHost {
    script: Vec<ControlRequest>,
    host_error: Mutex<Option<StewardError>>,
    reports: Mutex<Vec<StatusReport>>,
    outcome: Mutex<Option<DispatchOutcome>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedHost {
    pub fn new(script: Vec<ControlRequest>) -> Self {
        Self {
            script,
            host_error: Mutex::new(None),
            reports: Mutex::new(Vec::new()),
            outcome: Mutex::new(None),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Host that delivers a single stop request
    pub fn stop_after_start() -> Self {
        Self::new(vec![ControlRequest::Stop])
    }

    /// Host that reports a transport failure after the loop returns
    pub fn failing(script: Vec<ControlRequest>, err: StewardError) -> Self {
        let host = Self::new(script);
        *host.host_error.lock() = Some(err);
        host
    }

    /// Every report the dispatch loop emitted, plus the terminal stopped
    /// report
    pub fn reports(&self) -> Vec<StatusReport> {
        self.reports.lock().clone()
    }

    /// Just the states of [`reports`](Self::reports)
    pub fn states(&self) -> Vec<StatusState> {
        self.reports.lock().iter().map(|r| r.state).collect()
    }

    pub fn outcome(&self) -> Option<DispatchOutcome> {
        *self.outcome.lock()
    }

    /// Service names this host was asked to run, in order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl SupervisorHost for ScriptedHost {
    async fn run(&self, name: &str, dispatch: DispatchLoop) -> Result<()> {
        self.seen.lock().push(name.to_string());

        let (mut host, service) = control_channel();
        let script = self.script.clone();
        let feeder = host.requests.clone();
        tokio::spawn(async move {
            for request in script {
                if feeder.send(request).await.is_err() {
                    break;
                }
            }
        });
        drop(host.requests);

        let outcome = dispatch.run(service).await;
        *self.outcome.lock() = Some(outcome);

        let mut reports = self.reports.lock();
        while let Ok(report) = host.status.try_recv() {
            reports.push(report);
        }
        reports.push(StatusReport::stopped());
        drop(reports);

        match self.host_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
