use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ui::settings::LlmSettings;

/// One completion request: persona instruction plus task prompt.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub model: &'a str,
}

/// Anything that turns a persona + prompt into text.
pub trait CompletionProvider: Send {
    fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

#[derive(Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("completion response contained no message"))
    }
}

/// Blocking client for any OpenAI-compatible chat completions endpoint.
pub struct ChatClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
}

impl ChatClient {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            temperature: settings.temperature,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    pub fn test_connection(&self) -> Result<String> {
        let resp: serde_json::Value = self
            .authorize(self.http.get(self.url("models")))
            .send()?
            .error_for_status()?
            .json()?;

        Ok(format!(
            "Connected ({} models available)",
            resp["data"].as_array().map(|a| a.len()).unwrap_or(0)
        ))
    }
}

impl CompletionProvider for ChatClient {
    fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let body = ChatCompletionRequest {
            model: request.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage { role: "system", content: request.system },
                ChatMessage { role: "user", content: request.prompt },
            ],
        };

        debug!(
            model = request.model,
            system_len = request.system.len(),
            prompt_len = request.prompt.len(),
            "sending completion request"
        );

        let resp = self
            .authorize(self.http.post(self.url("chat/completions")))
            .json(&body)
            .send()
            .context("completion request failed")?
            .error_for_status()?
            .json::<ChatCompletionResponse>()
            .context("malformed completion response")?;

        resp.into_text()
    }
}
