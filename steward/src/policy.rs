//! Host-level timing policy.
//!
//! The only knob today is the kill timeout: how long the operating system
//! allows a service to finish stopping before it gives up on it. Convergence
//! waits derive their budget from it.

use std::time::Duration;

use tracing::warn;

use crate::duration::parse_duration;

/// Allowance used when the host does not say otherwise
pub const DEFAULT_KILL_TIMEOUT: Duration = Duration::from_secs(20);

/// Environment variable overriding the kill timeout, in the shared duration
/// grammar (`20s`, `1500ms`, bare seconds)
pub const KILL_TIMEOUT_ENV: &str = "STEWARD_KILL_TIMEOUT";

pub trait SystemPolicy: Send + Sync {
    /// How long the OS allows a service to stop. Re-resolved on every wait,
    /// never cached at construction, so a host-side change applies to the
    /// next operation.
    fn kill_timeout(&self) -> Duration;
}

/// Policy backed by the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPolicy;

impl SystemPolicy for HostPolicy {
    fn kill_timeout(&self) -> Duration {
        let Some(raw) = std::env::var_os(KILL_TIMEOUT_ENV) else {
            return DEFAULT_KILL_TIMEOUT;
        };
        let Some(text) = raw.to_str() else {
            warn!("Ignoring {}: not valid UTF-8", KILL_TIMEOUT_ENV);
            return DEFAULT_KILL_TIMEOUT;
        };
        match parse_duration(text) {
            Ok(timeout) => timeout,
            Err(err) => {
                warn!("Ignoring {}: {}", KILL_TIMEOUT_ENV, err);
                DEFAULT_KILL_TIMEOUT
            }
        }
    }
}

/// Fixed policy for embedders and tests that know their budget
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub Duration);

impl SystemPolicy for FixedPolicy {
    fn kill_timeout(&self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests;
