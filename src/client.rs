use crate::config::Config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// A synchronous text-generation service.
///
/// The pipeline depends only on this narrow contract; the HTTP client is
/// injected at construction so tests can substitute a mock.
pub trait Generator {
    /// Requests a single completion for the given system and user messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] if the external call fails; the error is
    /// propagated, never retried.
    fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// Request body for the chat-completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    n: u8,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat-completions API.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Blocking client for an OpenAI-style chat-completions API.
///
/// Requests one completion (`n = 1`) at a fixed temperature and token
/// budget; the response content is trimmed before return.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    stop: Option<Vec<String>>,
}

impl OpenAiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration carries no API key.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("generation service API key is not set"))?;

        Ok(Self {
            http: reqwest::blocking::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            stop: None,
        })
    }

    /// Sets an optional stop sequence list. No stop sequence by default.
    #[must_use]
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl Generator for OpenAiClient {
    fn generate(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            n: 1,
            max_tokens: self.max_tokens,
            stop: self.stop.as_deref(),
        };

        debug!("Requesting completion from {} (model {})", url, self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::service(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::service(format!("HTTP {status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::service(format!("malformed response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::service("response contained no choices"))?;

        Ok(content.trim().to_string())
    }
}

/// Deterministic generator for tests.
///
/// Returns scripted responses in FIFO order, falling back to a default
/// response once the script is exhausted. Errors can be scripted too, to
/// exercise abort paths.
pub struct MockGenerator {
    default_response: String,
    script: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockGenerator {
    /// Creates a mock that answers every call with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues a scripted response for the next unanswered call.
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(Ok(response.into()));
    }

    /// Queues a scripted error for the next unanswered call.
    pub fn push_error(&self, error: Error) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(Err(error));
    }

    /// Returns the number of generate calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock calls lock").len()
    }

    /// Returns the recorded (system, user) message pairs.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("mock calls lock").clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Generator for MockGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .expect("mock calls lock")
            .push((system.to_string(), user.to_string()));

        match self.script.lock().expect("mock script lock").pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_default_response() {
        let mock = MockGenerator::new("stała odpowiedź");
        assert_eq!(mock.generate("sys", "user").unwrap(), "stała odpowiedź");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_mock_scripted_responses_in_order() {
        let mock = MockGenerator::default();
        mock.push_response("pierwsza");
        mock.push_response("druga");

        assert_eq!(mock.generate("s", "u").unwrap(), "pierwsza");
        assert_eq!(mock.generate("s", "u").unwrap(), "druga");
        assert_eq!(mock.generate("s", "u").unwrap(), "");
    }

    #[test]
    fn test_mock_scripted_error() {
        let mock = MockGenerator::default();
        mock.push_error(Error::service("quota exceeded"));

        let err = mock.generate("s", "u").unwrap_err();
        assert!(err.is_service());
    }

    #[test]
    fn test_mock_records_messages() {
        let mock = MockGenerator::default();
        mock.generate("instrukcja", "treść").unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "instrukcja");
        assert_eq!(calls[0].1, "treść");
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = Config::builder().build().unwrap();
        let result = OpenAiClient::from_config(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_construction_with_key() {
        let config = Config::builder()
            .api_key("sk-test")
            .api_base("https://api.openai.com/v1/")
            .build()
            .unwrap();

        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_request_serialization_skips_absent_stop() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage {
                role: "system",
                content: "s",
            }],
            temperature: 0.5,
            n: 1,
            max_tokens: 2000,
            stop: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["n"], 1);
        assert!(json.get("stop").is_none());
    }
}
