use serde::{Deserialize, Serialize};

use super::{http_client, TextGenerator};
use crate::error::{Error, Result};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/completions";

/// Completion engine used when the caller does not choose one.
pub const DEFAULT_ENGINE: &str = "text-davinci-002";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// OpenAI completions client with a fixed engine.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    engine: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, engine: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            api_key: api_key.into(),
            engine: engine.into(),
        })
    }
}

impl TextGenerator for OpenAiClient {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String> {
        tracing::debug!(prompt, "requesting completion");
        let body = CompletionRequest {
            model: &self.engine,
            prompt,
            max_tokens: MAX_TOKENS,
            temperature,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };
        let response = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::remote("openai", format!("{status}: {body}")));
        }

        let parsed: CompletionResponse = response.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| Error::remote("openai", "completion returned no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = CompletionRequest {
            model: "text-davinci-002",
            prompt: "a prompt",
            max_tokens: MAX_TOKENS,
            temperature: 0.5,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "text-davinci-002");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn test_response_shape_deserializes() {
        let parsed: CompletionResponse = serde_json::from_str(
            r#"{"id": "cmpl-1", "choices": [{"text": "\n\nA Quiet Harbor", "index": 0}]}"#,
        )
        .unwrap();

        assert_eq!(parsed.choices[0].text, "\n\nA Quiet Harbor");
    }
}
