//! Provider configuration and the environment loader

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PROVIDER_VAR: &str = "AI_PROVIDER";
pub const API_KEY_VAR: &str = "AI_API_KEY";
pub const MODEL_VAR: &str = "AI_MODEL";
pub const BASE_URL_VAR: &str = "AI_BASE_URL";
pub const TEMPERATURE_VAR: &str = "AI_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "AI_MAX_TOKENS";
pub const TIMEOUT_VAR: &str = "AI_TIMEOUT_SECS";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved settings for one backend. Built once, then handed by value
/// to the adapter that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig
{   /// Backend selector
    pub provider: crate::Provider
  , /// Secret for authenticated backends
    pub api_key: Option<String>
  , /// Backend-specific model id
    pub model: String
  , /// Endpoint override, backend default when absent
    pub base_url: Option<String>
  , /// Sampling temperature
    pub temperature: f32
  , /// Cap on generated tokens
    pub max_tokens: u32
  , /// Deadline for one request/response exchange
    pub timeout: Duration
}

impl ProviderConfig
{   /// Defaults for `provider` with no credential
    pub fn new(provider: crate::Provider) -> Self
    {   ProviderConfig
        {   provider
          , api_key: None
          , model: provider.default_model().to_string()
          , base_url: None
          , temperature: DEFAULT_TEMPERATURE
          , max_tokens: DEFAULT_MAX_TOKENS
          , timeout: DEFAULT_TIMEOUT
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self
    {   self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self
    {   self.timeout = timeout;
        self
    }

    /// Endpoint to talk to, without a trailing slash
    pub fn endpoint(&self) -> String
    {   self.base_url
          .as_deref()
          .unwrap_or_else(|| self.provider.default_base_url())
          .trim_end_matches('/')
          .to_string()
    }

    /// Credential for authenticated backends, failing with the setting
    /// to fix when it is absent
    pub fn require_api_key(&self) -> crate::error::Result<String>
    {   match self.api_key.as_deref().map(str::trim)
        {   Some(key) if !key.is_empty() => Ok(key.to_string())
          , _ => {
              log::error!("No API key for {}", self.provider);
              Err(crate::error::Error::MissingApiKey
              {   provider: self.provider
                , key: API_KEY_VAR
              })
            }
        }
    }

    /// Load from the process environment
    pub fn from_env() -> Self
    {   load_with(|key| std::env::var(key).ok())
    }
}

/// Resolve a configuration from an arbitrary key lookup. Every field is
/// resolved on its own; absent, empty or unparsable values take the
/// documented default.
pub fn load_with<F>(lookup: F) -> ProviderConfig
where
  F: Fn(&str) -> Option<String>
{   let get = |key: &str| {
      lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    };

    let provider = match get(PROVIDER_VAR)
    {   None => crate::Provider::default()
      , Some(raw) => match raw.parse::<crate::Provider>()
        {   Ok(p) => p
          , Err(_) => {
              warn!(
                "Unknown {} '{}', falling back to {}",
                PROVIDER_VAR, raw, crate::Provider::default().as_str()
              );
              crate::Provider::default()
            }
        }
    };

    let api_key = get(API_KEY_VAR);
    let model = get(MODEL_VAR)
      .unwrap_or_else(|| provider.default_model().to_string());
    let base_url = get(BASE_URL_VAR);

    let temperature = parse_or(
      get(TEMPERATURE_VAR), TEMPERATURE_VAR, DEFAULT_TEMPERATURE
    , |t: &f32| t.is_finite() && *t >= 0.0
    );
    let max_tokens = parse_or(
      get(MAX_TOKENS_VAR), MAX_TOKENS_VAR, DEFAULT_MAX_TOKENS
    , |n: &u32| *n > 0
    );
    let timeout_secs = parse_or(
      get(TIMEOUT_VAR), TIMEOUT_VAR, DEFAULT_TIMEOUT.as_secs()
    , |n: &u64| *n > 0
    );

    if api_key.is_none() && provider.requires_api_key()
    {   warn!(
          "No API key provided for {}. Set {} environment variable.",
          provider.as_str(), API_KEY_VAR
        );
    }

    let config = ProviderConfig
    {   provider
      , api_key
      , model
      , base_url
      , temperature
      , max_tokens
      , timeout: Duration::from_secs(timeout_secs)
    };
    debug!(
      "Resolved config: provider={} model={} temperature={} max_tokens={}",
      config.provider.as_str(), config.model,
      config.temperature, config.max_tokens
    );
    config
}

fn parse_or<T, V>(
  raw: Option<String>
, key: &str
, default: T
, valid: V
) -> T
where
  T: std::str::FromStr + std::fmt::Display + Copy
, V: Fn(&T) -> bool
{   match raw
    {   None => default
      , Some(raw) => match raw.parse::<T>()
        {   Ok(v) if valid(&v) => v
          , _ => {
              warn!("Invalid {} '{}', using {}", key, raw, default);
              default
            }
        }
    }
}
