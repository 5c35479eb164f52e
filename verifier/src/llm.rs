use crate::SolutionVerifier;
use codefeed_core::{ConfigError, CoreError, VerificationError, VerifierConfig};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a strict programming judge. You receive a problem \
statement and a candidate solution. Reply with exactly one word: PASS if the solution \
correctly solves the problem, FAIL otherwise.";

/// Asks an OpenAI-compatible chat-completions endpoint for a PASS/FAIL verdict.
#[derive(Clone)]
pub struct LlmJudgeVerifier {
    api_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl LlmJudgeVerifier {
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
            model,
            client,
        })
    }

    pub fn from_config(config: &VerifierConfig) -> Result<Self, CoreError> {
        let api_url = config
            .api_url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::ValidationFailed {
                reason: "verifier.api_url is required for the llm verifier".to_string(),
            })?;
        Self::new(
            api_url,
            config.api_key.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn ask(self, problem: String, solution: String) -> Result<bool, CoreError> {
        let url = format!("{}/chat/completions", self.api_url);
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Problem:\n{}\n\nSolution:\n{}", problem, solution),
                },
            ],
            temperature: 0.0,
            max_tokens: 4,
        };

        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| transport_error(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok());
            warn!("Judge returned HTTP {}", status);
            return Err(status_error(&url, status.as_u16(), retry_after).into());
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            VerificationError::InvalidResponse {
                details: e.to_string(),
            }
        })?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| VerificationError::InvalidResponse {
                details: "no choices in response".to_string(),
            })?;

        debug!("Judge verdict: {}", content.trim());
        Ok(parse_verdict(content)?)
    }
}

impl SolutionVerifier for LlmJudgeVerifier {
    fn verify(&self, problem: &str, solution: &str) -> BoxFuture<'static, Result<bool, CoreError>> {
        self.clone()
            .ask(problem.to_string(), solution.to_string())
            .boxed()
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> CoreError {
    if error.is_timeout() {
        VerificationError::RequestTimeout.into()
    } else if error.is_connect() {
        VerificationError::EndpointUnavailable {
            endpoint: url.to_string(),
        }
        .into()
    } else {
        CoreError::Network(error)
    }
}

fn status_error(url: &str, status_code: u16, retry_after: Option<u64>) -> VerificationError {
    match status_code {
        401 | 403 => VerificationError::InvalidApiKey,
        429 => VerificationError::RateLimitExceeded {
            retry_after: retry_after.unwrap_or(30),
        },
        404 => VerificationError::EndpointUnavailable {
            endpoint: url.to_string(),
        },
        _ => VerificationError::ServerError { status_code },
    }
}

fn parse_verdict(content: &str) -> Result<bool, VerificationError> {
    let verdict = content
        .trim()
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_ascii_uppercase();
    if verdict.starts_with("PASS") {
        Ok(true)
    } else if verdict.starts_with("FAIL") {
        Ok(false)
    } else {
        Err(VerificationError::InvalidResponse {
            details: format!("unexpected verdict '{}'", content.trim()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codefeed_core::VerifierKind;

    #[test]
    fn test_parse_verdict() {
        assert!(parse_verdict("PASS").unwrap());
        assert!(parse_verdict("  pass.\n").unwrap());
        assert!(!parse_verdict("**FAIL**").unwrap());
        assert!(matches!(
            parse_verdict("maybe"),
            Err(VerificationError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_completion_response_shape() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "PASS"},
                "finish_reason": "stop"
            }]
        }"#;
        let completion: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parse_verdict(&completion.choices[0].message.content).unwrap());
    }

    #[test]
    fn test_status_errors() {
        let url = "http://localhost:11434/v1/chat/completions";
        assert!(matches!(
            status_error(url, 401, None),
            VerificationError::InvalidApiKey
        ));
        assert!(matches!(
            status_error(url, 429, Some(12)),
            VerificationError::RateLimitExceeded { retry_after: 12 }
        ));
        assert!(matches!(
            status_error(url, 503, None),
            VerificationError::ServerError { status_code: 503 }
        ));
        match status_error(url, 404, None) {
            VerificationError::EndpointUnavailable { endpoint } => assert_eq!(endpoint, url),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_trims_url() {
        let config = VerifierConfig {
            kind: VerifierKind::Llm,
            api_url: Some("http://localhost:11434/v1/".to_string()),
            api_key: Some(String::new()),
            ..VerifierConfig::default()
        };
        let verifier = LlmJudgeVerifier::from_config(&config).unwrap();
        assert_eq!(verifier.api_url, "http://localhost:11434/v1");
        assert!(verifier.api_key.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_reported() {
        let verifier = LlmJudgeVerifier::new(
            "http://127.0.0.1:9/v1".to_string(),
            None,
            "test".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = verifier.verify("problem", "solution").await;
        assert!(matches!(
            result,
            Err(CoreError::Verification(
                VerificationError::EndpointUnavailable { .. } | VerificationError::RequestTimeout
            )) | Err(CoreError::Network(_))
        ));
    }
}
