//! Service lifecycle management for long-running programs
//!
//! This crate drives one named service through its whole lifecycle:
//! running under a host supervisor or interactively, starting, stopping,
//! restarting, querying status, and installing or removing its
//! registration with the system service manager. Applications implement
//! [`LifecycleClient`]; platform backends implement the
//! [`manager::ServiceManager`] and [`host::SupervisorHost`] traits.

pub mod client;
pub mod control;
pub mod controller;
pub mod convergence;
pub mod descriptor;
pub mod dispatch;
pub mod duration;
pub mod errors;
pub mod host;
pub mod manager;
pub mod policy;
pub mod relay;
pub mod status;

pub use client::{ClientError, LifecycleClient, Shutdowner};
pub use controller::LifecycleController;
pub use descriptor::ServiceDescriptor;
pub use errors::{Result, StewardError};
pub use status::ObservedStatus;
