//! Poll-with-ceiling primitive for provider-side async jobs.
//!
//! Replaces the bespoke while-loop per call site: a fixed interval, a
//! maximum attempt count, and a tagged outcome so callers cannot confuse
//! "the job failed" with "we stopped waiting".

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Polling behavior.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
    /// Fixed delay between checks.
    pub interval: Duration,
    /// Operation name for logging.
    pub operation_name: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
            operation_name: "poll".to_string(),
        }
    }
}

impl PollConfig {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// One observation of the remote job.
#[derive(Debug)]
pub enum PollStatus<T> {
    /// Job still running; keep polling.
    Pending,
    /// Job finished with a result.
    Done(T),
    /// Job failed on the provider side.
    Failed(String),
}

/// Final outcome of a polling loop.
#[derive(Debug)]
pub enum PollOutcome<T> {
    Completed(T),
    Failed(String),
    TimedOut { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed(_))
    }
}

/// Poll `check` at a fixed interval until it reports done/failed or the
/// attempt ceiling is reached. A transport error from `check` aborts the
/// loop immediately; it is distinct from a provider-side failure.
pub async fn poll_with_ceiling<F, Fut, T, E>(
    config: &PollConfig,
    check: F,
) -> Result<PollOutcome<T>, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, E>>,
{
    for attempt in 1..=config.max_attempts {
        match check().await? {
            PollStatus::Done(value) => {
                debug!(
                    "{} completed after {} attempt(s)",
                    config.operation_name, attempt
                );
                return Ok(PollOutcome::Completed(value));
            }
            PollStatus::Failed(reason) => {
                debug!("{} failed: {}", config.operation_name, reason);
                return Ok(PollOutcome::Failed(reason));
            }
            PollStatus::Pending => {
                if attempt < config.max_attempts {
                    tokio::time::sleep(config.interval).await;
                }
            }
        }
    }

    Ok(PollOutcome::TimedOut {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> PollConfig {
        PollConfig::new("test")
            .with_max_attempts(max_attempts)
            .with_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_completes_when_done() {
        let calls = AtomicU32::new(0);
        let outcome = poll_with_ceiling(&fast_config(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Ok::<_, String>(PollStatus::Pending)
                } else {
                    Ok(PollStatus::Done(42))
                }
            }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_provider_failure_is_tagged() {
        let outcome = poll_with_ceiling(&fast_config(5), || async {
            Ok::<PollStatus<()>, String>(PollStatus::Failed("bad audio".to_string()))
        })
        .await
        .unwrap();

        assert!(matches!(outcome, PollOutcome::Failed(reason) if reason == "bad audio"));
    }

    #[tokio::test]
    async fn test_ceiling_produces_timed_out() {
        let calls = AtomicU32::new(0);
        let outcome = poll_with_ceiling(&fast_config(4), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<PollStatus<()>, String>(PollStatus::Pending) }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, PollOutcome::TimedOut { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        let err = poll_with_ceiling(&fast_config(5), || async {
            Err::<PollStatus<()>, String>("connection reset".to_string())
        })
        .await
        .unwrap_err();

        assert_eq!(err, "connection reset");
    }
}
