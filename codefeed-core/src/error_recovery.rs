//! Recovery strategies for failures of external collaborators.
//!
//! Feed interactions never need recovery: validation failures are reported and
//! the state stays as it was. Backend writes and judge calls can fail for
//! transient reasons and are retried here before being surfaced to the user.

use crate::{BackendError, CoreError, ErrorExt};
use std::time::Duration;
use tracing::info;

/// Recovery strategy for handling errors
#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    /// Retry the operation with exponential backoff
    RetryWithBackoff {
        max_attempts: usize,
        initial_delay: Duration,
        max_delay: Duration,
    },
    /// Skip the operation and continue
    Skip,
    /// Run the operation once and fail on error
    Fail,
}

/// Result of an error recovery attempt
#[derive(Debug)]
pub enum RecoveryResult<T> {
    /// The operation eventually succeeded
    Recovered(T),
    /// The operation should be skipped
    Skipped,
    /// Recovery failed, error should be propagated
    Failed(CoreError),
}

impl<T> RecoveryResult<T> {
    pub fn is_recovered(&self) -> bool {
        matches!(self, RecoveryResult::Recovered(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecoveryResult::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecoveryResult::Failed(_))
    }

    /// Converts back into a plain result. A skipped operation yields `None`.
    pub fn into_result(self) -> Result<Option<T>, CoreError> {
        match self {
            RecoveryResult::Recovered(value) => Ok(Some(value)),
            RecoveryResult::Skipped => Ok(None),
            RecoveryResult::Failed(error) => Err(error),
        }
    }
}

pub struct ErrorRecovery;

impl ErrorRecovery {
    /// Determine the appropriate recovery strategy for a given error
    pub fn determine_strategy(error: &CoreError) -> RecoveryStrategy {
        match error {
            CoreError::Network(_) | CoreError::Verification(_) => {
                RecoveryStrategy::RetryWithBackoff {
                    max_attempts: 3,
                    initial_delay: Duration::from_secs(1),
                    max_delay: Duration::from_secs(30),
                }
            }

            CoreError::Backend(backend_error) => match backend_error {
                BackendError::DatabaseLocked => RecoveryStrategy::RetryWithBackoff {
                    max_attempts: 5,
                    initial_delay: Duration::from_millis(100),
                    max_delay: Duration::from_secs(5),
                },
                BackendError::ConnectionFailed { .. } => RecoveryStrategy::RetryWithBackoff {
                    max_attempts: 3,
                    initial_delay: Duration::from_secs(1),
                    max_delay: Duration::from_secs(10),
                },
                _ => RecoveryStrategy::Fail,
            },

            CoreError::Config(_) => RecoveryStrategy::Fail,

            CoreError::Timeout { .. } => RecoveryStrategy::RetryWithBackoff {
                max_attempts: 2,
                initial_delay: Duration::from_secs(5),
                max_delay: Duration::from_secs(10),
            },

            // The user has to change something before trying again
            CoreError::Feed(_) => RecoveryStrategy::Skip,

            CoreError::Internal { .. } => RecoveryStrategy::Fail,
        }
    }

    /// Runs `operation` once and, if it fails, recovers according to the
    /// strategy for that failure.
    pub async fn run<F, T, Fut>(mut operation: F) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>> + Send,
        T: Send,
    {
        match operation().await {
            Ok(value) => RecoveryResult::Recovered(value),
            Err(error) => {
                let strategy = Self::determine_strategy(&error);
                match strategy {
                    RecoveryStrategy::RetryWithBackoff {
                        max_attempts,
                        initial_delay,
                        max_delay,
                    } if max_attempts > 1 && error.is_retryable() => {
                        let delay = error.retry_after().unwrap_or(initial_delay).min(max_delay);
                        info!("Operation failed, retrying after {:?}: {}", delay, error);
                        tokio::time::sleep(delay).await;
                        Self::retry_with_backoff(
                            operation,
                            max_attempts - 1,
                            initial_delay,
                            max_delay,
                        )
                        .await
                    }
                    RecoveryStrategy::Skip => RecoveryResult::Skipped,
                    _ => RecoveryResult::Failed(error),
                }
            }
        }
    }

    /// Apply the recovery strategy to an operation
    pub async fn apply_strategy<F, T, Fut>(
        strategy: RecoveryStrategy,
        mut operation: F,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>> + Send,
        T: Send,
    {
        match strategy {
            RecoveryStrategy::RetryWithBackoff {
                max_attempts,
                initial_delay,
                max_delay,
            } => Self::retry_with_backoff(operation, max_attempts, initial_delay, max_delay).await,
            RecoveryStrategy::Skip => RecoveryResult::Skipped,
            RecoveryStrategy::Fail => match operation().await {
                Ok(value) => RecoveryResult::Recovered(value),
                Err(error) => RecoveryResult::Failed(error),
            },
        }
    }

    async fn retry_with_backoff<F, T, Fut>(
        mut operation: F,
        max_attempts: usize,
        initial_delay: Duration,
        max_delay: Duration,
    ) -> RecoveryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>> + Send,
        T: Send,
    {
        let mut attempt = 0;
        let mut delay = initial_delay;

        loop {
            match operation().await {
                Ok(result) => return RecoveryResult::Recovered(result),
                Err(error) => {
                    attempt += 1;

                    if attempt >= max_attempts || !error.is_retryable() {
                        return RecoveryResult::Failed(error);
                    }

                    if let Some(retry_delay) = error.retry_after() {
                        delay = retry_delay;
                    }

                    if delay > max_delay {
                        delay = max_delay;
                    }

                    info!(
                        "Recovery attempt {}/{} failed. Retrying after {:?}: {}",
                        attempt,
                        max_attempts,
                        delay,
                        error.user_friendly_message()
                    );

                    tokio::time::sleep(delay).await;

                    delay = std::cmp::min(delay * 2, max_delay);
                }
            }
        }
    }
}
