//! Service identity and registration metadata.
//!
//! A [`ServiceDescriptor`] is everything the service manager needs to know
//! about one service: its name, what to execute, and the install-time knobs
//! the registration carries. Descriptors are plain serde data so callers can
//! load them from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::duration::{deserialize_duration, serialize_duration};

/// How the manager starts the service
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StartKind {
    /// Started by the manager at boot
    #[default]
    Automatic,
    /// Started on demand
    Manual,
    /// Registered but never started by the manager
    Disabled,
}

/// What the manager does when the service fails
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureAction {
    #[default]
    Restart,
    Reboot,
    NoAction,
}

/// Recovery policy registered with the manager
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FailurePolicy {
    #[serde(default)]
    pub action: FailureAction,
    /// Delay before the action runs
    #[serde(
        default = "default_failure_delay",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub delay: Duration,
    /// The failure count resets after this long without an incident
    #[serde(
        default = "default_reset_period",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub reset_period: Duration,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            action: FailureAction::default(),
            delay: default_failure_delay(),
            reset_period: default_reset_period(),
        }
    }
}

/// Account the service runs under; absent means the system account
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunAs {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Install-time knobs
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceOptions {
    #[serde(default)]
    pub start: StartKind,
    /// Defer an automatic start until after boot settles
    #[serde(default)]
    pub delayed_auto_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<FailurePolicy>,
    /// Ask for an interactive session type at registration
    #[serde(default)]
    pub interactive_session: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as: Option<RunAs>,
}

/// Identity and registration metadata for one service
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceDescriptor {
    /// The service manager's key for this instance
    pub name: String,
    /// Human-readable name; empty means "use `name`"
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Program the registration points at; the current executable when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    #[serde(default)]
    pub arguments: Vec<String>,
    /// Services that must be running before this one starts
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Environment persisted with the registration
    #[serde(default)]
    pub env_vars: HashMap<String, String>,
    #[serde(default)]
    pub options: ServiceOptions,
}

impl ServiceDescriptor {
    /// Descriptor with a name and defaults for everything else
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            description: String::new(),
            executable: None,
            arguments: Vec::new(),
            dependencies: Vec::new(),
            env_vars: HashMap::new(),
            options: ServiceOptions::default(),
        }
    }

    /// Program path the registration points at. Falls back to the running
    /// executable so an application can install itself.
    pub fn exec_path(&self) -> std::io::Result<PathBuf> {
        match &self.executable {
            Some(path) => Ok(path.clone()),
            None => std::env::current_exe(),
        }
    }
}

impl std::fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.display_name.is_empty() {
            f.write_str(&self.name)
        } else {
            f.write_str(&self.display_name)
        }
    }
}

fn default_failure_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_reset_period() -> Duration {
    Duration::from_secs(10)
}
