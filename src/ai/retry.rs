//! Bounded retry for backends that report a transient condition.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::warn;

/// Fixed-delay retry limited to `max_attempts` calls in total.
///
/// Only errors the caller classifies as transient are retried. The wait is a
/// tokio timer, so other tasks keep running while a run is backing off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt hit the transient condition. `last` is `None` only when
    /// the policy allows zero attempts.
    Exhausted { attempts: u32, last: Option<E> },
    /// A non-transient error; returned on the attempt that produced it.
    Permanent(E),
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of attempts.
    ///
    /// # Errors
    ///
    /// See [`RetryError`].
    pub async fn run<T, E, F, Fut, P>(
        &self,
        mut operation: F,
        mut is_transient: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&E) -> bool,
    {
        if self.max_attempts == 0 {
            return Err(RetryError::Exhausted {
                attempts: 0,
                last: None,
            });
        }

        let attempts = AtomicU32::new(0);
        let max_attempts = self.max_attempts;
        let strategy = FixedInterval::new(self.delay).take(max_attempts as usize - 1);

        let result = RetryIf::spawn(
            strategy,
            || {
                attempts.fetch_add(1, Ordering::Relaxed);
                operation()
            },
            |e: &E| {
                let transient = is_transient(e);
                let made = attempts.load(Ordering::Relaxed);
                if transient && made < max_attempts {
                    warn!(
                        attempt = made,
                        max_attempts,
                        "Backend not ready, retrying in {}s",
                        self.delay.as_secs_f32()
                    );
                }
                transient
            },
        )
        .await;

        let made = attempts.load(Ordering::Relaxed);
        match result {
            Ok(value) => Ok(value),
            Err(e) if is_transient(&e) => Err(RetryError::Exhausted {
                attempts: made,
                last: Some(e),
            }),
            Err(e) => Err(RetryError::Permanent(e)),
        }
    }
}
