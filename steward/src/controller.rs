//! Lifecycle orchestration for one named service.
//!
//! [`LifecycleController`] ties the pieces together: a [`ServiceDescriptor`]
//! identifying the registration, a [`LifecycleClient`] carrying the
//! application callbacks, a [`ServiceManager`] backend, and a
//! [`SupervisorHost`] for supervised execution. Every lifecycle operation
//! the library offers lives here.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::client::LifecycleClient;
use crate::convergence::{WaitError, wait_budget, wait_until};
use crate::descriptor::ServiceDescriptor;
use crate::dispatch::DispatchLoop;
use crate::errors::{ErrorSink, LifecyclePhase, Result, StewardError, TimedOperation};
use crate::host::{RunContext, SupervisorHost};
use crate::manager::{ControlSignal, ManagerAccess, ServiceHandle, ServiceManager};
use crate::policy::{HostPolicy, SystemPolicy};
use crate::relay::ErrorRelay;
use crate::status::{ObservedStatus, RawServiceState};

/// Poll cadence while waiting for a stopping service to report stopped
pub const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Poll cadence while waiting for a deleted registration to disappear
pub const REMOVAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Coordinates every lifecycle operation for one named service.
///
/// Mutating operations connect with full access; [`status`] connects with
/// the minimal level so unprivileged callers can still observe the service.
///
/// [`status`]: LifecycleController::status
pub struct LifecycleController {
    descriptor: ServiceDescriptor,
    client: Arc<dyn LifecycleClient>,
    manager: Arc<dyn ServiceManager>,
    host: Arc<dyn SupervisorHost>,
    policy: Arc<dyn SystemPolicy>,
    context: RunContext,
    relay: Arc<ErrorRelay>,
    error_sink: Option<ErrorSink>,
}

impl LifecycleController {
    /// Create a controller with the host policy and an auto-detected run
    /// context
    pub fn new(
        descriptor: ServiceDescriptor,
        client: Arc<dyn LifecycleClient>,
        manager: Arc<dyn ServiceManager>,
        host: Arc<dyn SupervisorHost>,
    ) -> Self {
        Self {
            descriptor,
            client,
            manager,
            host,
            policy: Arc::new(HostPolicy),
            context: RunContext::detect(),
            relay: Arc::new(ErrorRelay::new()),
            error_sink: None,
        }
    }

    /// Override the system policy
    pub fn with_policy(mut self, policy: Arc<dyn SystemPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Override the detected run context
    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = context;
        self
    }

    /// Deliver errors from best-effort steps that do not fail their
    /// operation, such as the stop attempt before removal
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.error_sink = Some(sink);
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Run the service until it is told to stop.
    ///
    /// Supervised processes hand control to the [`SupervisorHost`] and let
    /// the dispatch loop field control requests; interactive ones start the
    /// application directly and stop it on interrupt. A failure recorded by
    /// the dispatch loop wins over whatever the host returned.
    pub async fn run(&self) -> Result<()> {
        if self.context.interactive {
            self.run_interactive(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
        } else {
            self.run_supervised().await
        }
    }

    async fn run_interactive(&self, interrupt: impl Future<Output = ()>) -> Result<()> {
        info!("Service {} running interactively", self.descriptor.name);
        self.client
            .start()
            .await
            .map_err(|err| StewardError::client(LifecyclePhase::Start, err))?;
        interrupt.await;
        debug!("Interrupt received, stopping service {}", self.descriptor.name);
        self.client
            .stop()
            .await
            .map_err(|err| StewardError::client(LifecyclePhase::Stop, err))
    }

    async fn run_supervised(&self) -> Result<()> {
        self.relay.reset();
        let dispatch = DispatchLoop::new(
            self.descriptor.name.clone(),
            self.client.clone(),
            self.relay.clone(),
        );
        let outcome = self.host.run(&self.descriptor.name, dispatch).await;
        if let Some(err) = self.relay.take() {
            return Err(err);
        }
        outcome
    }

    /// Report the collapsed status of the installed service.
    ///
    /// States outside the recognized set are surfaced as an error carrying
    /// the raw value rather than guessed at.
    pub async fn status(&self) -> Result<ObservedStatus> {
        let connection = self.manager.connect(ManagerAccess::Minimal).await?;
        let service = connection.open_service(&self.descriptor.name).await?;
        let raw = service.query_status().await?;
        match ObservedStatus::from_raw(raw) {
            ObservedStatus::Unknown => Err(StewardError::UnknownStatus(raw)),
            observed => Ok(observed),
        }
    }

    /// Ask the service manager to start the installed service
    pub async fn start(&self) -> Result<()> {
        let connection = self.manager.connect(ManagerAccess::Full).await?;
        let service = connection.open_service(&self.descriptor.name).await?;
        service.start().await?;
        info!("Started service {}", self.descriptor.name);
        Ok(())
    }

    /// Stop the installed service and wait for it to report stopped
    pub async fn stop(&self) -> Result<()> {
        let connection = self.manager.connect(ManagerAccess::Full).await?;
        let service = connection.open_service(&self.descriptor.name).await?;
        self.stop_and_wait(&*service).await?;
        info!("Stopped service {}", self.descriptor.name);
        Ok(())
    }

    /// Stop the installed service, wait for it to report stopped, and start
    /// it again through the same handle
    pub async fn restart(&self) -> Result<()> {
        let connection = self.manager.connect(ManagerAccess::Full).await?;
        let service = connection.open_service(&self.descriptor.name).await?;
        self.stop_and_wait(&*service).await?;
        service.start().await?;
        info!("Restarted service {}", self.descriptor.name);
        Ok(())
    }

    /// Deliver a stop and poll until the instance reports stopped.
    ///
    /// The state observed at delivery is compared verbatim; only an exact
    /// stopped answer skips the wait, pending states do not.
    async fn stop_and_wait(&self, service: &dyn ServiceHandle) -> Result<()> {
        let at_delivery = service.send_control(ControlSignal::Stop).await?;
        if at_delivery == RawServiceState::Stopped {
            return Ok(());
        }
        debug!(
            "Service {} is {} after stop delivery, waiting",
            self.descriptor.name, at_delivery
        );

        let budget = wait_budget(self.policy.kill_timeout(), STOP_POLL_INTERVAL);
        let poll =
            move || async move { Ok(service.query_status().await? == RawServiceState::Stopped) };
        match wait_until(STOP_POLL_INTERVAL, budget, poll).await {
            Ok(()) => Ok(()),
            Err(WaitError::Expired) => Err(StewardError::Timeout {
                name: self.descriptor.name.clone(),
                operation: TimedOperation::Stop,
            }),
            Err(WaitError::Probe(err)) => Err(err),
        }
    }

    /// Register the service with the manager.
    ///
    /// The executable path is resolved up front so a missing binary fails
    /// before any manager work happens.
    pub async fn install(&self) -> Result<()> {
        let executable = self.descriptor.exec_path()?;
        let connection = self.manager.connect(ManagerAccess::Full).await?;
        match connection.open_service(&self.descriptor.name).await {
            Ok(_) => return Err(StewardError::AlreadyExists(self.descriptor.name.clone())),
            Err(StewardError::NotInstalled(_)) => {}
            Err(err) => return Err(err),
        }
        connection.create_service(&self.descriptor).await?;
        info!(
            "Installed service {} running {}",
            self.descriptor.name,
            executable.display()
        );
        Ok(())
    }

    /// Remove the service registration, stopping the instance first when
    /// possible.
    ///
    /// A stop failure is delivered to the error sink and does not block
    /// removal. A registration that is already absent is not an error.
    /// Managers may defer the removal while handles stay open, so after
    /// deleting this drops its handle and polls until the registration is
    /// actually gone.
    pub async fn uninstall(&self) -> Result<()> {
        if let Err(err) = self.stop().await {
            warn!(
                "Could not stop service {} before removal: {}",
                self.descriptor.name, err
            );
            if let Some(sink) = &self.error_sink {
                let _ = sink.send(err);
            }
        }

        let connection = self.manager.connect(ManagerAccess::Full).await?;
        let service = match connection.open_service(&self.descriptor.name).await {
            Ok(service) => service,
            Err(StewardError::NotInstalled(_)) => {
                debug!("Service {} is already gone", self.descriptor.name);
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        service.delete().await?;
        drop(service);

        let budget = wait_budget(self.policy.kill_timeout(), REMOVAL_POLL_INTERVAL);
        let connection = &*connection;
        let name = self.descriptor.name.as_str();
        let poll = move || async move {
            match connection.open_service(name).await {
                Err(StewardError::NotInstalled(_)) => Ok(true),
                Ok(_) => Ok(false),
                Err(err) => Err(err),
            }
        };
        match wait_until(REMOVAL_POLL_INTERVAL, budget, poll).await {
            Ok(()) => {
                info!("Uninstalled service {}", self.descriptor.name);
                Ok(())
            }
            Err(WaitError::Expired) => Err(StewardError::Timeout {
                name: self.descriptor.name.clone(),
                operation: TimedOperation::Removal,
            }),
            Err(WaitError::Probe(err)) => Err(err),
        }
    }
}
