//! Shared fakes for steward integration tests

pub mod fake_manager;
pub mod recording_client;
pub mod script_host;
