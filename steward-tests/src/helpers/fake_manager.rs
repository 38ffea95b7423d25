//! In-memory service manager backend
//!
//! [`FakeManager`] implements the manager traits over a shared map of
//! registrations. Stop and removal convergence are scripted in poll counts
//! so paused-clock tests can pin down exactly when a wait resolves.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use steward::descriptor::ServiceDescriptor;
use steward::errors::{Result, StewardError};
use steward::manager::{
    ControlSignal, ManagerAccess, ManagerConnection, ServiceHandle, ServiceManager,
};
use steward::status::RawServiceState;

/// How a registration reacts to a stop control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBehavior {
    /// Already stopped when the control lands
    Immediate,
    /// Reports stop-pending until the n-th status poll, which observes
    /// stopped
    AfterPolls(u32),
    /// Reports stop-pending forever
    Never,
}

/// How a registration reacts to deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalBehavior {
    /// Gone as soon as the delete call returns
    Immediate,
    /// Stays visible for this many absence probes, gone on the next one
    AfterProbes(u32),
    /// Never actually removed
    Never,
}

struct Registration {
    descriptor: ServiceDescriptor,
    state: RawServiceState,
    stop_behavior: StopBehavior,
    removal_behavior: RemovalBehavior,
    stop_countdown: u32,
    pending_removal: bool,
    removal_countdown: u32,
    opens: u32,
    starts: u32,
    stop_controls: u32,
    status_polls: u32,
    query_error: Option<String>,
    control_error: Option<String>,
}

impl Registration {
    fn new(descriptor: ServiceDescriptor, state: RawServiceState) -> Self {
        Self {
            descriptor,
            state,
            stop_behavior: StopBehavior::Immediate,
            removal_behavior: RemovalBehavior::Immediate,
            stop_countdown: 0,
            pending_removal: false,
            removal_countdown: 0,
            opens: 0,
            starts: 0,
            stop_controls: 0,
            status_polls: 0,
            query_error: None,
            control_error: None,
        }
    }
}

#[derive(Default)]
struct ManagerState {
    services: HashMap<String, Registration>,
    connect_error: Option<String>,
    connects: u32,
}

/// Service manager fake backed by a shared registration map.
///
/// Clones share state, so a test can keep one copy for assertions while the
/// controller owns another.
#[derive(Default, Clone)]
pub struct FakeManager {
    state: Arc<Mutex<ManagerState>>,
}

impl FakeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service as a create call would, in the given state
    pub fn seed(&self, descriptor: ServiceDescriptor, state: RawServiceState) {
        let name = descriptor.name.clone();
        self.state
            .lock()
            .services
            .insert(name, Registration::new(descriptor, state));
    }

    /// Register a running service with default behaviors
    pub fn seed_running(&self, name: &str) {
        self.seed(ServiceDescriptor::new(name), RawServiceState::Running);
    }

    pub fn set_stop_behavior(&self, name: &str, behavior: StopBehavior) {
        if let Some(registration) = self.state.lock().services.get_mut(name) {
            registration.stop_behavior = behavior;
        }
    }

    pub fn set_removal_behavior(&self, name: &str, behavior: RemovalBehavior) {
        if let Some(registration) = self.state.lock().services.get_mut(name) {
            registration.removal_behavior = behavior;
        }
    }

    /// Make every connect attempt fail with the given message
    pub fn deny_connections(&self, message: &str) {
        self.state.lock().connect_error = Some(message.to_string());
    }

    /// Make status polls on one service fail with the given message
    pub fn fail_queries(&self, name: &str, message: &str) {
        if let Some(registration) = self.state.lock().services.get_mut(name) {
            registration.query_error = Some(message.to_string());
        }
    }

    /// Make control delivery to one service fail with the given message
    pub fn fail_controls(&self, name: &str, message: &str) {
        if let Some(registration) = self.state.lock().services.get_mut(name) {
            registration.control_error = Some(message.to_string());
        }
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.state.lock().services.contains_key(name)
    }

    pub fn state_of(&self, name: &str) -> Option<RawServiceState> {
        self.state.lock().services.get(name).map(|r| r.state)
    }

    pub fn descriptor_of(&self, name: &str) -> Option<ServiceDescriptor> {
        self.state
            .lock()
            .services
            .get(name)
            .map(|r| r.descriptor.clone())
    }

    pub fn connects(&self) -> u32 {
        self.state.lock().connects
    }

    pub fn opens(&self, name: &str) -> u32 {
        self.state
            .lock()
            .services
            .get(name)
            .map(|r| r.opens)
            .unwrap_or(0)
    }

    pub fn starts(&self, name: &str) -> u32 {
        self.state
            .lock()
            .services
            .get(name)
            .map(|r| r.starts)
            .unwrap_or(0)
    }

    pub fn stop_controls(&self, name: &str) -> u32 {
        self.state
            .lock()
            .services
            .get(name)
            .map(|r| r.stop_controls)
            .unwrap_or(0)
    }

    pub fn status_polls(&self, name: &str) -> u32 {
        self.state
            .lock()
            .services
            .get(name)
            .map(|r| r.status_polls)
            .unwrap_or(0)
    }
}

#[async_trait]
impl ServiceManager for FakeManager {
    async fn connect(&self, _access: ManagerAccess) -> Result<Box<dyn ManagerConnection>> {
        let mut state = self.state.lock();
        state.connects += 1;
        if let Some(message) = &state.connect_error {
            return Err(StewardError::Connection(message.clone()));
        }
        Ok(Box::new(FakeConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeConnection {
    state: Arc<Mutex<ManagerState>>,
}

#[async_trait]
impl ManagerConnection for FakeConnection {
    async fn open_service(&self, name: &str) -> Result<Box<dyn ServiceHandle>> {
        let mut state = self.state.lock();
        let gone = match state.services.get_mut(name) {
            None => true,
            Some(registration) if registration.pending_removal => {
                match registration.removal_behavior {
                    RemovalBehavior::Never => false,
                    _ => {
                        if registration.removal_countdown == 0 {
                            true
                        } else {
                            registration.removal_countdown -= 1;
                            false
                        }
                    }
                }
            }
            Some(_) => false,
        };
        if gone {
            state.services.remove(name);
            return Err(StewardError::NotInstalled(name.to_string()));
        }
        if let Some(registration) = state.services.get_mut(name) {
            registration.opens += 1;
        }
        Ok(Box::new(FakeHandle {
            name: name.to_string(),
            state: Arc::clone(&self.state),
        }))
    }

    async fn create_service(
        &self,
        descriptor: &ServiceDescriptor,
    ) -> Result<Box<dyn ServiceHandle>> {
        let mut state = self.state.lock();
        if state.services.contains_key(&descriptor.name) {
            return Err(StewardError::AlreadyExists(descriptor.name.clone()));
        }
        state.services.insert(
            descriptor.name.clone(),
            Registration::new(descriptor.clone(), RawServiceState::Stopped),
        );
        Ok(Box::new(FakeHandle {
            name: descriptor.name.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeHandle {
    name: String,
    state: Arc<Mutex<ManagerState>>,
}

#[async_trait]
impl ServiceHandle for FakeHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_status(&self) -> Result<RawServiceState> {
        let mut state = self.state.lock();
        let Some(registration) = state.services.get_mut(&self.name) else {
            return Err(StewardError::NotInstalled(self.name.clone()));
        };
        if let Some(message) = &registration.query_error {
            return Err(StewardError::Connection(message.clone()));
        }
        registration.status_polls += 1;
        if registration.state == RawServiceState::StopPending && registration.stop_countdown > 0 {
            registration.stop_countdown -= 1;
            if registration.stop_countdown == 0 {
                registration.state = RawServiceState::Stopped;
            }
        }
        Ok(registration.state)
    }

    async fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        let Some(registration) = state.services.get_mut(&self.name) else {
            return Err(StewardError::NotInstalled(self.name.clone()));
        };
        registration.starts += 1;
        registration.state = RawServiceState::Running;
        Ok(())
    }

    async fn send_control(&self, signal: ControlSignal) -> Result<RawServiceState> {
        let mut state = self.state.lock();
        let Some(registration) = state.services.get_mut(&self.name) else {
            return Err(StewardError::NotInstalled(self.name.clone()));
        };
        if let Some(message) = &registration.control_error {
            return Err(StewardError::Connection(message.clone()));
        }
        match signal {
            ControlSignal::Stop => {
                registration.stop_controls += 1;
                match registration.stop_behavior {
                    StopBehavior::Immediate => registration.state = RawServiceState::Stopped,
                    StopBehavior::AfterPolls(polls) => {
                        registration.state = RawServiceState::StopPending;
                        registration.stop_countdown = polls;
                    }
                    StopBehavior::Never => {
                        registration.state = RawServiceState::StopPending;
                        registration.stop_countdown = 0;
                    }
                }
            }
        }
        Ok(registration.state)
    }

    async fn delete(&self) -> Result<()> {
        let mut state = self.state.lock();
        let Some(registration) = state.services.get_mut(&self.name) else {
            return Err(StewardError::NotInstalled(self.name.clone()));
        };
        match registration.removal_behavior {
            RemovalBehavior::Immediate => {
                state.services.remove(&self.name);
            }
            RemovalBehavior::AfterProbes(probes) => {
                registration.pending_removal = true;
                registration.removal_countdown = probes;
            }
            RemovalBehavior::Never => registration.pending_removal = true,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
