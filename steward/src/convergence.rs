//! Deadline-bounded polling until an async predicate converges.
//!
//! Service managers expose no notification for "the instance finished
//! stopping" or "the registration is gone", so callers poll. [`wait_until`]
//! owns the loop: tick, probe, give up when the budget runs out. Keeping the
//! loop here means an event-driven status source could replace polling later
//! without touching any caller.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};

use crate::errors::StewardError;

/// Why a wait ended without converging
#[derive(Debug, Error)]
pub enum WaitError {
    /// The budget elapsed first. Callers attach the operation name when
    /// mapping this onto [`StewardError::Timeout`].
    #[error("Convergence deadline elapsed")]
    Expired,

    /// The probe itself failed; polling aborts immediately
    #[error(transparent)]
    Probe(#[from] StewardError),
}

/// Total budget for a convergence wait: the system's kill timeout plus two
/// poll intervals of slack so a flip right at the timeout is still observed.
pub fn wait_budget(kill_timeout: Duration, interval: Duration) -> Duration {
    kill_timeout + interval * 2
}

/// Poll `probe` every `interval` until it returns `Ok(true)`.
///
/// The first probe fires one full interval after the call; the state at call
/// time is the caller's business (the stop wait, for example, gets it for
/// free from the control delivery). `Ok(false)` keeps polling, `Err` aborts
/// the wait, and a probe observed during the final slack interval still
/// counts as converged.
pub async fn wait_until<F, Fut>(
    interval: Duration,
    budget: Duration,
    mut probe: F,
) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::errors::Result<bool>>,
{
    let deadline = sleep(budget);
    tokio::pin!(deadline);

    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut deadline => return Err(WaitError::Expired),
            _ = ticker.tick() => {
                if probe().await? {
                    return Ok(());
                }
            }
        }
    }
}
