//! Placeholder judge: a keyword-overlap check behind an artificial delay.
//!
//! This is not analysis of any kind. It accepts text that is long enough,
//! looks vaguely like code and mentions something from the problem statement.

use crate::SolutionVerifier;
use codefeed_core::{CoreError, VerifierConfig};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

const CODE_KEYWORDS: [&str; 14] = [
    "if", "else", "for", "while", "loop", "match", "function", "def", "fn", "return", "class",
    "let", "const", "var",
];

const CODE_SYMBOLS: [&str; 3] = ["=", "=>", "->"];

/// Shared words shorter than this are ignored.
const MIN_SHARED_WORD_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct HeuristicVerifier {
    delay: Duration,
    min_length: usize,
}

impl HeuristicVerifier {
    pub fn new(delay: Duration, min_length: usize) -> Self {
        Self { delay, min_length }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(config.delay(), config.min_solution_length)
    }

    /// The verdict without the delay.
    pub fn judge(&self, problem: &str, solution: &str) -> bool {
        let solution = solution.trim();
        if solution.chars().count() <= self.min_length {
            debug!("Solution rejected: too short");
            return false;
        }

        let solution_words = words(solution);
        let has_code = CODE_SYMBOLS.iter().any(|symbol| solution.contains(symbol))
            || CODE_KEYWORDS
                .iter()
                .any(|keyword| solution_words.contains(*keyword));
        if !has_code {
            debug!("Solution rejected: no code structure");
            return false;
        }

        let shares_word = words(problem)
            .iter()
            .filter(|word| word.chars().count() >= MIN_SHARED_WORD_LEN)
            .any(|word| solution_words.contains(word));
        if !shares_word {
            debug!("Solution rejected: unrelated to the problem");
        }
        shares_word
    }
}

impl SolutionVerifier for HeuristicVerifier {
    fn verify(&self, problem: &str, solution: &str) -> BoxFuture<'static, Result<bool, CoreError>> {
        let verdict = self.judge(problem, solution);
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            Ok(verdict)
        }
        .boxed()
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIBONACCI: &str = "Write a function to calculate the fibonacci sequence";

    fn verifier() -> HeuristicVerifier {
        HeuristicVerifier::new(Duration::from_millis(5), 10)
    }

    #[tokio::test]
    async fn test_fibonacci_solution_passes() {
        let solution = "function fib(n) { if (n<=1) return n; return fib(n-1)+fib(n-2); }";
        assert!(verifier().verify(FIBONACCI, solution).await.unwrap());
    }

    #[tokio::test]
    async fn test_single_character_fails() {
        assert!(!verifier().verify(FIBONACCI, "x").await.unwrap());
        assert!(!verifier().verify("x", "x").await.unwrap());
    }

    #[test]
    fn test_prose_without_code_fails() {
        let solution = "I would calculate the fibonacci sequence recursively";
        assert!(!verifier().judge(FIBONACCI, solution));
    }

    #[test]
    fn test_code_unrelated_to_problem_fails() {
        let solution = "let total = items.len(); return total;";
        assert!(!verifier().judge(FIBONACCI, solution));
    }

    #[test]
    fn test_shared_word_is_case_insensitive() {
        let solution = "def Fibonacci(n): return n if n < 2 else Fibonacci(n-1) + Fibonacci(n-2)";
        assert!(verifier().judge(FIBONACCI, solution));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let verifier = HeuristicVerifier::new(Duration::ZERO, 10);
        // exactly ten characters
        assert!(!verifier.judge("sequence problem", "sequence=1"));
        assert!(verifier.judge("sequence problem", "sequence = 1"));
    }
}
