//! Scoring engine backed by an OpenAI-compatible chat-completions API.

use crate::prompt::screening_prompt;
use crate::types::{FitLevel, ScreeningResult};
use crate::{ScoringEngine, ScreeningError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// The verdict as the model writes it, before validation.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    score: f64,
    fit: String,
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default)]
    recommendation: String,
}

/// Parse and validate the model's message content.
///
/// The score must be a whole number in 1..=10 and the fit one of the four
/// verdict labels.
pub fn parse_verdict(content: &str) -> Result<ScreeningResult, ScreeningError> {
    let raw: RawVerdict = serde_json::from_str(content.trim())
        .map_err(|e| ScreeningError::InvalidResponse(format!("not a verdict object: {e}")))?;

    if raw.score.fract() != 0.0 || !(1.0..=10.0).contains(&raw.score) {
        return Err(ScreeningError::InvalidResponse(format!(
            "score out of range: {}",
            raw.score
        )));
    }
    let fit: FitLevel = raw.fit.parse().map_err(ScreeningError::InvalidResponse)?;
    if fit == FitLevel::Error {
        return Err(ScreeningError::InvalidResponse(
            "model returned the error label".to_string(),
        ));
    }

    Ok(ScreeningResult {
        score: raw.score as u8,
        fit,
        summary: raw.summary,
        strengths: raw.strengths,
        gaps: raw.gaps,
        recommendation: raw.recommendation,
    })
}

/// Client for the chat-completions endpoint.
pub struct OpenAiScorer {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiScorer {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ScreeningError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Point the client at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, ScreeningError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!("Sending screening request to {} ({})", self.base_url, self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Chat completions API error {}: {}", status, body);
            return Err(ScreeningError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScreeningError::InvalidResponse("no message content".to_string()))
    }
}

impl ScoringEngine for OpenAiScorer {
    async fn score(
        &self,
        profile: &Value,
        job_description: &str,
    ) -> Result<ScreeningResult, ScreeningError> {
        let prompt = screening_prompt(profile, job_description);
        let content = self.complete(&prompt).await?;
        parse_verdict(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict() {
        let content = r#"{
            "score": 8,
            "fit": "Good Fit",
            "summary": "Backend engineer with five years of Rust.",
            "strengths": ["Rust", "Kafka"],
            "gaps": ["No team lead experience"],
            "recommendation": "Phone screen"
        }"#;

        let verdict = parse_verdict(content).unwrap();

        assert_eq!(verdict.score, 8);
        assert_eq!(verdict.fit, FitLevel::GoodFit);
        assert_eq!(verdict.strengths, vec!["Rust", "Kafka"]);
    }

    #[test]
    fn test_parse_verdict_rejects_bad_score() {
        let zero = r#"{"score": 0, "fit": "Not a Fit", "summary": ""}"#;
        let fractional = r#"{"score": 7.5, "fit": "Good Fit", "summary": ""}"#;

        assert!(matches!(parse_verdict(zero), Err(ScreeningError::InvalidResponse(_))));
        assert!(matches!(parse_verdict(fractional), Err(ScreeningError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_verdict_rejects_unknown_fit() {
        let unknown = r#"{"score": 5, "fit": "Maybe", "summary": ""}"#;
        let sentinel = r#"{"score": 5, "fit": "Error", "summary": ""}"#;

        assert!(parse_verdict(unknown).is_err());
        assert!(parse_verdict(sentinel).is_err());
        assert!(parse_verdict("Sure! Here is the JSON").is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: DEFAULT_TEMPERATURE,
        };

        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let scorer = OpenAiScorer::new("key").unwrap().with_base_url("http://localhost:8080/v1/");
        assert_eq!(scorer.base_url, "http://localhost:8080/v1");
    }
}
