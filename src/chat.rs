// Chat collaborator: role-tagged messages go to a hosted model, one text comes back.
// No retries and no streaming: one request yields one reply or one error.

use crate::config::ProviderConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Shown when the provider answered without any text.
pub const EMPTY_REPLY: &str = "No response received.";
/// Shown in the conversation when a turn failed.
pub const FAILURE_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Starter prompts offered before the first message.
pub const PROMPT_SUGGESTIONS: [&str; 6] = [
    "Generate a travel itinerary",
    "Explain quantum computing",
    "Write a Python script",
    "Suggest music playlists",
    "Summarize a research paper",
    "Creative writing prompts",
];

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Nothing to send (rejected before any network call).
    #[error("No messages provided")]
    EmptyConversation,
    /// Body present but not a list of `{role, content}` messages.
    #[error("Invalid messages: {0}")]
    InvalidRequest(String),
    /// Credentials absent; names the variable that should hold them.
    #[error("{0} not configured")]
    MissingCredentials(String),
    /// The provider call itself failed.
    #[error("Failed to fetch response: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Anything that turns a conversation into the next assistant reply.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

/// OpenAI-compatible chat completions client (Groq by default).
pub struct GroqClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    /// Fails with a configuration error when no API key is set.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ChatError> {
        let api_key = config.api_key()?.to_string();
        Ok(Self {
            http: Client::new(),
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let body = CompletionRequest { model: &self.model, messages };
        debug!(model = %self.model, turns = messages.len(), "requesting completion");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Provider(format!("{status}: {text}")));
        }

        let parsed = response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());
        Ok(text)
    }
}

/// Reject empty conversations before anything leaves the process.
pub fn validate(messages: &[ChatMessage]) -> Result<(), ChatError> {
    if messages.is_empty() {
        return Err(ChatError::EmptyConversation);
    }
    Ok(())
}

/// Validate, check credentials, then make exactly one provider call.
pub async fn complete(config: &ProviderConfig, messages: &[ChatMessage]) -> Result<String, ChatError> {
    validate(messages)?;
    let client = GroqClient::from_config(config)?;
    client.complete(messages).await
}

/// A conversation: the full history is sent on every turn.
pub struct ChatSession<P: CompletionProvider> {
    provider: P,
    history: Vec<ChatMessage>,
}

impl<P: CompletionProvider> ChatSession<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, history: Vec::new() }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Add the prompt, ask for a reply, record it. A failed call records the
    /// generic failure reply instead; earlier turns are never lost.
    pub async fn send(&mut self, prompt: impl Into<String>) -> &ChatMessage {
        self.history.push(ChatMessage::user(prompt));

        let reply = match self.provider.complete(&self.history).await {
            Ok(text) => text,
            Err(e) => {
                error!("chat turn failed: {e}");
                FAILURE_REPLY.to_string()
            }
        };
        self.history.push(ChatMessage::assistant(reply));
        &self.history[self.history.len() - 1]
    }
}
