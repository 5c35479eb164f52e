pub mod heuristic;
pub mod llm;

pub use heuristic::HeuristicVerifier;
pub use llm::LlmJudgeVerifier;

use codefeed_core::{CoreError, VerifierConfig, VerifierKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Judges whether `solution` plausibly solves the problem described by `problem`.
///
/// A negative verdict is `Ok(false)`, not an error. Errors are reserved for the
/// judge itself being unreachable or misbehaving.
pub trait SolutionVerifier: Send + Sync {
    fn verify(&self, problem: &str, solution: &str) -> BoxFuture<'static, Result<bool, CoreError>>;

    fn name(&self) -> &'static str;
}

pub fn verifier_from_config(
    config: &VerifierConfig,
) -> Result<Arc<dyn SolutionVerifier>, CoreError> {
    let verifier: Arc<dyn SolutionVerifier> = match config.kind {
        VerifierKind::Heuristic => Arc::new(HeuristicVerifier::from_config(config)),
        VerifierKind::Llm => Arc::new(LlmJudgeVerifier::from_config(config)?),
    };
    info!("Using {} solution verifier", verifier.name());
    Ok(verifier)
}

/// Bounds a verdict by `timeout`. Running over yields `CoreError::Timeout`.
pub fn verify_within(
    verifier: &dyn SolutionVerifier,
    problem: &str,
    solution: &str,
    timeout: Duration,
) -> BoxFuture<'static, Result<bool, CoreError>> {
    let verdict = verifier.verify(problem, solution);
    async move {
        match tokio::time::timeout(timeout, verdict).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Solution judge did not answer within {:?}", timeout);
                Err(CoreError::Timeout {
                    seconds: timeout.as_secs(),
                })
            }
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_heuristic() {
        let verifier = verifier_from_config(&VerifierConfig::default()).unwrap();
        assert_eq!(verifier.name(), "heuristic");
    }

    #[test]
    fn test_llm_config_without_url_fails() {
        let config = VerifierConfig {
            kind: VerifierKind::Llm,
            ..VerifierConfig::default()
        };
        assert!(verifier_from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_slow_judge_times_out() {
        let slow = HeuristicVerifier::new(Duration::from_millis(500), 10);
        let result = verify_within(
            &slow,
            "Write a function to calculate the fibonacci sequence",
            "function fib(n) { return n; }",
            Duration::from_millis(20),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_fast_judge_within_timeout() {
        let fast = HeuristicVerifier::new(Duration::ZERO, 10);
        let result = verify_within(&fast, "Reverse a string", "x", Duration::from_secs(1)).await;
        assert!(!result.unwrap());
    }
}
