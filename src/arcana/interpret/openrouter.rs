use super::{clean_response, prompt, InterpretationRequest, Interpreter};
use crate::error::{ArcanaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
const MAX_TOKENS: u32 = 2500;
const TEMPERATURE: f32 = 0.7;

/// Hosted chat-completions backend.
pub struct OpenRouterInterpreter {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenRouterInterpreter {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads the API key from `OPENROUTER_API_KEY`.
    pub fn from_env(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ArcanaError::interpretation(format!("{} is not set", API_KEY_ENV)))?;
        Ok(Self::new(base_url, model, api_key))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| ArcanaError::interpretation(format!("AI service unreachable: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body_text, "chat completion request rejected");
            return Err(ArcanaError::interpretation(format!(
                "AI service error ({})",
                status.as_u16()
            )));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            ArcanaError::interpretation(format!("could not parse AI service response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Interpreter for OpenRouterInterpreter {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn interpret(&self, request: &InterpretationRequest) -> Result<String> {
        let system = prompt::system_message(request.language);
        let user = prompt::user_message(request);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        self.send_request(&body).await
    }

    async fn health_check(&self) -> Result<String> {
        Ok(format!(
            "{} is set; requests go to {} with model `{}`",
            API_KEY_ENV,
            self.endpoint(),
            self.model
        ))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| clean_response(&content))
        .unwrap_or_default();
    if text.is_empty() {
        return Err(ArcanaError::interpretation(
            "AI service returned no content in the response",
        ));
    }
    Ok(text)
}
