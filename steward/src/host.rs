//! Host-supervisor boundary and run-mode detection.

use async_trait::async_trait;
use std::io::IsTerminal;

use crate::dispatch::DispatchLoop;
use crate::errors::Result;

/// Environment variable marking the process as supervisor-launched. Any
/// value but `0` counts.
pub const SUPERVISED_ENV: &str = "STEWARD_SUPERVISED";

/// The OS supervisor's blocking run primitive.
///
/// A backend wires the dispatch loop to the real supervisor: it builds the
/// control channel, forwards supervisor controls in, relays status reports
/// out, and blocks until the service session ends. The host also owns the
/// final `Stopped` transition and reports
/// [`DispatchOutcome::exit_code`](crate::dispatch::DispatchOutcome::exit_code)
/// to the OS; the loop never does either.
#[async_trait]
pub trait SupervisorHost: Send + Sync {
    async fn run(&self, name: &str, dispatch: DispatchLoop) -> Result<()>;
}

/// Whether this process should run interactively or under a supervisor.
/// Resolved once and threaded through controller construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub interactive: bool,
}

impl RunContext {
    /// Detect from the environment: supervised when [`SUPERVISED_ENV`] says
    /// so, otherwise interactive exactly when stdin is a terminal.
    /// Supervisors do not attach one.
    pub fn detect() -> Self {
        let supervised = std::env::var_os(SUPERVISED_ENV).is_some_and(|v| v != "0");
        Self {
            interactive: !supervised && std::io::stdin().is_terminal(),
        }
    }

    pub const fn interactive() -> Self {
        Self { interactive: true }
    }

    pub const fn supervised() -> Self {
        Self { interactive: false }
    }
}
