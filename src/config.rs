// Provider configuration for the chat collaborator.
// Values come from CLI flags, falling back to the environment
// (`GROQ_API_KEY`, `GROQ_BASE_URL`, `GROQ_MODEL`), then to defaults.

use crate::chat::ChatError;
use clap::Args;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ProviderConfig {
    #[cfg(test)]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// The credential, or a configuration error when it is absent or blank.
    pub fn api_key(&self) -> Result<&str, ChatError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ChatError::MissingCredentials(API_KEY_VAR.to_string()))
    }
}

/// Provider flags shared by the `chat` and `serve` subcommands.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// API key for the completion provider
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible base URL
    #[arg(long, env = "GROQ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model used for completions
    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

impl From<ProviderArgs> for ProviderConfig {
    fn from(args: ProviderArgs) -> Self {
        Self {
            api_key: args.api_key,
            base_url: args.base_url.trim_end_matches('/').to_string(),
            model: args.model,
        }
    }
}
