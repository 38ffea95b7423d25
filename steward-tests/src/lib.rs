//! Test utilities for the steward workspace
//!
//! This crate provides in-memory fakes for the boundaries the library
//! leaves to platform backends: a service manager, a supervisor host, and
//! a lifecycle client. Integration tests drive controller operations end
//! to end against them without touching a real service manager.

pub mod helpers;

pub use helpers::fake_manager::{FakeManager, RemovalBehavior, StopBehavior};
pub use helpers::recording_client::RecordingClient;
pub use helpers::script_host::ScriptedHost;
