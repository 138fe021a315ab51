use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use super::page::{DomError, DomResult};
use crate::error::{Error, Result};

/// Bounds for an explicit wait
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitPolicy {
    pub const fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Poll `probe` until it yields `Some`, or fail with [`Error::WaitTimeout`].
    ///
    /// The probe runs at least once. `NoSuchElement` counts as "not yet";
    /// every other DOM error ends the wait immediately.
    pub async fn until<T, F, Fut>(&self, condition: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DomResult<Option<T>>>,
    {
        let started = Instant::now();
        let mut polls = 0u32;

        loop {
            polls += 1;
            match probe().await {
                Ok(Some(value)) => {
                    trace!("{} after {} poll(s)", condition, polls);
                    return Ok(value);
                }
                Ok(None) | Err(DomError::NoSuchElement) => {}
                Err(e) => return Err(e.into()),
            }

            if started.elapsed() >= self.timeout {
                return Err(Error::WaitTimeout {
                    condition: condition.to_string(),
                    timeout: self.timeout,
                });
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> WaitPolicy {
        WaitPolicy::new(Duration::from_secs(1), Duration::from_millis(50))
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_once_condition_holds() {
        let calls = &AtomicU32::new(0);
        let value = policy()
            .until("third poll", move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok((n == 3).then_some(n))
            })
            .await
            .unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_is_not_an_error() {
        let calls = &AtomicU32::new(0);
        let value = policy()
            .until("element", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(DomError::NoSuchElement)
                } else {
                    Ok(Some("found"))
                }
            })
            .await
            .unwrap();
        assert_eq!(value, "found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let err = policy()
            .until("never", || async { Ok::<Option<()>, DomError>(None) })
            .await
            .unwrap_err();
        assert!(err.is_wait_timeout());
        assert!(err.to_string().contains("never"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_element_ends_wait() {
        let err = policy()
            .until("read", || async { Err::<Option<()>, _>(DomError::StaleElement) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StaleElement));
    }
}
