//! Application-side lifecycle boundary.
//!
//! The application implements [`LifecycleClient`]; the library calls it from
//! the dispatch loop (supervised mode) or directly (interactive mode). Both
//! calls must return promptly: long-running work belongs in tasks the
//! implementation spawns from `start` and winds down from `stop`.

use async_trait::async_trait;

/// Failure reported by the application's own lifecycle code
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait LifecycleClient: Send + Sync {
    /// Bring the application up. Must not block for the lifetime of the
    /// application; spawn and return.
    async fn start(&self) -> Result<(), ClientError>;

    /// Wind the application down and release its resources.
    async fn stop(&self) -> Result<(), ClientError>;

    /// Applications that react differently to a host shutdown than to a
    /// plain stop return themselves here. The default opts out, and the
    /// dispatch loop falls back to [`stop`](LifecycleClient::stop).
    fn shutdowner(&self) -> Option<&dyn Shutdowner> {
        None
    }
}

/// Optional capability for shutdown-aware applications
#[async_trait]
pub trait Shutdowner: Send + Sync {
    async fn shutdown(&self) -> Result<(), ClientError>;
}
