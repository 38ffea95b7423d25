//! Scripted lifecycle client
//!
//! Records every call the dispatch loop or controller makes and replays
//! scripted results. Scripts are consumed front to back; an empty script
//! means success.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use steward::client::{ClientError, LifecycleClient, Shutdowner};

type CallResult = Result<(), String>;

#[derive(Default)]
pub struct RecordingClient {
    advertise_shutdowner: bool,
    calls: Mutex<Vec<&'static str>>,
    start_results: Mutex<VecDeque<CallResult>>,
    stop_results: Mutex<VecDeque<CallResult>>,
    shutdown_results: Mutex<VecDeque<CallResult>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client that also advertises a shutdown handler
    pub fn with_shutdowner() -> Self {
        Self {
            advertise_shutdowner: true,
            ..Self::default()
        }
    }

    pub fn fail_next_start(&self, message: &str) {
        self.start_results.lock().push_back(Err(message.to_string()));
    }

    pub fn fail_next_stop(&self, message: &str) {
        self.stop_results.lock().push_back(Err(message.to_string()));
    }

    pub fn fail_next_shutdown(&self, message: &str) {
        self.shutdown_results.lock().push_back(Err(message.to_string()));
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn consume(script: &Mutex<VecDeque<CallResult>>) -> Result<(), ClientError> {
        match script.lock().pop_front() {
            Some(Err(message)) => Err(message.into()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl LifecycleClient for RecordingClient {
    async fn start(&self) -> Result<(), ClientError> {
        self.calls.lock().push("start");
        Self::consume(&self.start_results)
    }

    async fn stop(&self) -> Result<(), ClientError> {
        self.calls.lock().push("stop");
        Self::consume(&self.stop_results)
    }

    fn shutdowner(&self) -> Option<&dyn Shutdowner> {
        if self.advertise_shutdowner {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl Shutdowner for RecordingClient {
    async fn shutdown(&self) -> Result<(), ClientError> {
        self.calls.lock().push("shutdown");
        Self::consume(&self.shutdown_results)
    }
}
