//! Polling retry driver with deadline and cooperative cancellation.
//!
//! Repeatedly runs an async attempt until it succeeds, the deadline
//! passes, or the cancellation token fires. Attempts never overlap: each
//! one completes before the next starts. An abort rejects immediately,
//! even while an attempt or interval wait is in flight.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};

/// Default spacing between attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default overall deadline.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(5000);

/// Poll `attempt` until it succeeds or a terminal condition is reached.
///
/// Terminal outcomes:
/// - the attempt resolves: its value is returned immediately;
/// - the deadline passes: [`Error::Timeout`] with the configured timeout;
/// - `abort` fires: [`Error::Aborted`], without waiting for the in-flight
///   attempt or the next interval boundary.
pub async fn poll_until<T, F, Fut>(
    interval: Duration,
    timeout: Duration,
    abort: Option<CancellationToken>,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let deadline = Instant::now() + timeout;
    let timeout_ms = timeout.as_millis() as u64;

    let run = async {
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(cause) => {
                    if Instant::now() >= deadline {
                        return Err(Error::Timeout(timeout_ms));
                    }
                    debug!(%cause, "attempt failed, retrying");
                    tokio::time::sleep(interval).await;
                    if Instant::now() >= deadline {
                        return Err(Error::Timeout(timeout_ms));
                    }
                }
            }
        }
    };

    match abort {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Aborted),
                result = run => result,
            }
        }
        None => run.await,
    }
}
