//! Service-manager boundary.
//!
//! Real OS backends implement these traits; the library itself never talks
//! to a service manager directly. The split mirrors how managers are
//! actually shaped: a connection-level session, then per-service handles
//! opened through it. Connections and handles are RAII values, so dropping
//! one releases the underlying resource.

use async_trait::async_trait;

use crate::descriptor::ServiceDescriptor;
use crate::errors::Result;
use crate::status::RawServiceState;

/// Access level requested when connecting to the service manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerAccess {
    /// Enough to query, start, and stop existing services
    Minimal,
    /// Everything, including creating and deleting registrations
    Full,
}

/// Control signal deliverable to an installed service instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Stop,
}

#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Connect with the given access level. An acquisition failure aborts
    /// the calling operation before any waiting begins.
    async fn connect(&self, access: ManagerAccess) -> Result<Box<dyn ManagerConnection>>;
}

impl std::fmt::Debug for dyn ManagerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerConnection").finish_non_exhaustive()
    }
}

/// One open session with the service manager
#[async_trait]
pub trait ManagerConnection: Send + Sync {
    /// Open a handle to an installed service. Fails with a not-installed
    /// error when the registration is absent.
    async fn open_service(&self, name: &str) -> Result<Box<dyn ServiceHandle>>;

    /// Register a new service. Arguments, dependencies, environment, start
    /// kind, and the failure recovery policy are all registration state the
    /// backend applies from the descriptor here.
    async fn create_service(&self, descriptor: &ServiceDescriptor)
    -> Result<Box<dyn ServiceHandle>>;
}

impl std::fmt::Debug for dyn ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle").field("name", &self.name()).finish_non_exhaustive()
    }
}

/// Handle to one installed service instance
#[async_trait]
pub trait ServiceHandle: Send + Sync {
    fn name(&self) -> &str;

    async fn query_status(&self) -> Result<RawServiceState>;

    /// Ask the manager to start the instance. Fire and forget; callers that
    /// need confirmation poll the status afterwards.
    async fn start(&self) -> Result<()>;

    /// Deliver a control signal and report the instance state observed at
    /// delivery time.
    async fn send_control(&self, signal: ControlSignal) -> Result<RawServiceState>;

    /// Mark the registration for removal. The manager may defer the actual
    /// removal; callers poll for absence.
    async fn delete(&self) -> Result<()>;
}
