//! One request/response exchange, shared by every adapter

use log::{error, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::{Error, Result};

/// Client with the configured deadline applied
pub fn build_client(
  timeout: Duration
, user_agent: Option<&str>
) -> Result<reqwest::Client>
{   let mut builder = reqwest::Client::builder().timeout(timeout);
    if let Some(agent) = user_agent
    {   builder = builder.user_agent(agent);
    }
    builder.build().map_err(|e| {
      error!("Failed to build HTTP client: {}", e);
      Error::InvalidConfiguration(e.to_string())
    })
}

/// POST `body` as JSON and return the raw success body.
///
/// Backend error payloads become [`Error::Backend`] with the backend's own
/// text and transport failures pass through untouched. Decoding is left to
/// [`parse_body`] so shape errors can carry the raw text.
pub async fn exchange<B>(
  provider: crate::Provider
, request: reqwest::RequestBuilder
, body: &B
, timeout: Duration
) -> Result<String>
where
  B: Serialize + ?Sized
{   if log::log_enabled!(log::Level::Trace)
    {   trace!(
          "{} request: {}",
          provider,
          serde_json::to_string(body).unwrap_or_default()
        );
    }

    let response = request
      .json(body)
      .send()
      .await
      .map_err(|e| transport_error(provider, e, timeout))?;

    let status = response.status();
    trace!("{} response status: {}", provider, status);

    let text = response
      .text()
      .await
      .map_err(|e| transport_error(provider, e, timeout))?;
    trace!("{} response body: {}", provider, text);

    if let Some(message) = backend_error_message(&text)
    {   error!("{} API error: {}", provider, message);
        return Err(Error::Backend { provider, message });
    }

    if !status.is_success()
    {   error!("{} API error ({}): {}", provider, status, text);
        let message = if text.trim().is_empty()
        {   format!("HTTP {}", status)
        } else
        {   text
        };
        return Err(Error::Backend { provider, message });
    }

    Ok(text)
}

/// Decode a success body, keeping the raw text on failure
pub fn parse_body<T: DeserializeOwned>(
  provider: crate::Provider
, text: &str
) -> Result<T>
{   serde_json::from_str(text).map_err(|e| {
      error!("Parse error from {}: {}", provider, e);
      Error::Parse
      {   provider
        , reason: e.to_string()
        , body: text.to_string()
      }
    })
}

/// Missing generated text on an otherwise valid body
pub fn missing_field(
  provider: crate::Provider
, what: &str
, text: &str
) -> Error
{   error!("{} response has no {}", provider, what);
    Error::Parse
    {   provider
      , reason: format!("no {} in response", what)
      , body: text.to_string()
    }
}

/// Extract `error.message` (or a bare `error` string) from a JSON body
pub fn backend_error_message(text: &str) -> Option<String>
{   let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let err = value.get("error")?;
    match err
    {   serde_json::Value::Null => None
      , serde_json::Value::String(s) => Some(s.clone())
      , serde_json::Value::Object(map) => Some(
          map.get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string())
        )
      , other => Some(other.to_string())
    }
}

fn transport_error(
  provider: crate::Provider
, e: reqwest::Error
, timeout: Duration
) -> Error
{   if e.is_timeout()
    {   error!("{} request timed out after {:?}", provider, timeout);
        Error::Timeout(timeout)
    } else
    {   error!("HTTP error talking to {}: {}", provider, e);
        Error::Transport(e)
    }
}
