pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/*

llmswitch: one call-site for several LLM backends. the backend is
picked once from the environment, every call is a single round trip,
and every backend answers with the same response shape.

llmswitch/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and the Provider enum
│   ├── main.rs         # Demo binary
│   ├── error.rs        # Error type shared by every layer
│   ├── config.rs       # ProviderConfig + environment loader
│   ├── client.rs       # Assistant facade (ask / chat)
│   ├── request.rs      # Message / AiResponse contract
│   └── providers/
│       ├── mod.rs      # AiProvider trait + factory
│       ├── http.rs     # Single-exchange helpers
│       ├── openai.rs
│       ├── anthropic.rs
│       ├── ollama.rs
│       └── github.rs
└── tests/

*/

pub use client::{Assistant, AssistantResponse};
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use providers::{create_provider, create_provider_named, AiProvider};
pub use request::{AiResponse, Message, Role, Usage};

/// Backends llmswitch knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider
{
  /// OpenAI chat completions (GPT-4o, GPT-4o-mini, ...)
  OpenAi
  ,
  /// Anthropic messages API (Claude models)
  Anthropic
  ,
  /// Local Ollama server, unauthenticated
  Ollama
  ,
  /// GitHub Models inference gateway, PAT as bearer token
  GitHub
}

impl Provider
{   pub const ALL: [Provider; 4] = [
      Provider::OpenAi
    , Provider::Anthropic
    , Provider::Ollama
    , Provider::GitHub
    ];

    /// Selector value as written in `AI_PROVIDER`
    pub fn as_str(&self) -> &'static str
    {   match self
        {   Provider::OpenAi => "openai"
          , Provider::Anthropic => "anthropic"
          , Provider::Ollama => "ollama"
          , Provider::GitHub => "github"
        }
    }

    pub fn default_model(&self) -> &'static str
    {   match self
        {   Provider::OpenAi => "gpt-4o-mini"
          , Provider::Anthropic => "claude-3-haiku-20240307"
          , Provider::Ollama => "mistral"
          , Provider::GitHub => "gpt-4o-mini"
        }
    }

    pub fn default_base_url(&self) -> &'static str
    {   match self
        {   Provider::OpenAi => "https://api.openai.com/v1"
          , Provider::Anthropic => "https://api.anthropic.com"
          , Provider::Ollama => "http://localhost:11434"
          , Provider::GitHub => "https://models.github.ai/inference"
        }
    }

    /// Whether a call cannot be placed without `AI_API_KEY`
    pub fn requires_api_key(&self) -> bool
    {   !matches!(self, Provider::Ollama)
    }
}

impl Default for Provider
{   fn default() -> Self
    {   Provider::OpenAi
    }
}

impl fmt::Display for Provider
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   let label = match self
        {   Provider::OpenAi => "OpenAI"
          , Provider::Anthropic => "Anthropic"
          , Provider::Ollama => "Ollama"
          , Provider::GitHub => "GitHub Models"
        };
        f.write_str(label)
    }
}

impl FromStr for Provider
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self>
    {   let wanted = s.trim().to_ascii_lowercase();
        Provider::ALL
          .iter()
          .copied()
          .find(|p| p.as_str() == wanted)
          .ok_or_else(|| Error::UnsupportedBackend(s.to_string()))
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn selector_is_case_insensitive()
    {   assert_eq!("OpenAI".parse::<Provider>().ok(), Some(Provider::OpenAi));
        assert_eq!(" Anthropic ".parse::<Provider>().ok(), Some(Provider::Anthropic));
        assert_eq!("GITHUB".parse::<Provider>().ok(), Some(Provider::GitHub));
    }

    #[test]
    fn unknown_selector_names_value()
    {   let err = "gemini".parse::<Provider>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedBackend(ref s) if s == "gemini"));
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn only_local_backend_skips_credentials()
    {   for p in Provider::ALL
        {   assert_eq!(p.requires_api_key(), p != Provider::Ollama);
        }
    }
}
