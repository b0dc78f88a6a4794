use std::fmt;
use std::time::Duration;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error type for llmswitch operations
#[derive(Debug)]
pub enum Error
{   /// Backend needs a credential and none was configured
    MissingApiKey
    {   provider: crate::Provider
      , key: &'static str
    }
  , /// Configuration could not be turned into a working client
    InvalidConfiguration(String)
  , /// Backend selector not in the known set
    UnsupportedBackend(String)
  , /// Connection, DNS or TLS failure from the HTTP layer
    Transport(reqwest::Error)
  , /// Request did not finish within the configured deadline
    Timeout(Duration)
  , /// Backend answered with its own error payload
    Backend
    {   provider: crate::Provider
      , message: String
    }
  , /// Response body did not have the expected shape
    Parse
    {   provider: crate::Provider
      , reason: String
      , body: String
    }
  , /// Caller input cannot form a completion request
    InvalidRequest(String)
  , /// Failure raised through the assistant facade
    Assistant(Box<Error>)
}

impl Error
{   /// Wrap a failure with the assistant prefix
    pub fn assistant(inner: Error) -> Self
    {   Error::Assistant(Box::new(inner))
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey { provider, key } => {
              write!(f,
                "{} requires an API key. Set the {} environment variable.",
                provider, key
              )
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::UnsupportedBackend(name) => {
              write!(f, "Unsupported AI provider: {}", name)
            }
          , Error::Transport(e) => {
              write!(f, "HTTP error: {}", e)
            }
          , Error::Timeout(after) => {
              write!(f, "Request timed out after {:?}", after)
            }
          , Error::Backend { provider, message } => {
              write!(f, "{} API error: {}", provider, message)
            }
          , Error::Parse { provider, reason, body } => {
              write!(f,
                "Failed to parse {} response ({}): {}",
                provider, reason, body
              )
            }
          , Error::InvalidRequest(msg) => {
              write!(f, "Invalid request: {}", msg)
            }
          , Error::Assistant(inner) => {
              write!(f, "Assistant error: {}", inner)
            }
        }
    }
}

impl std::error::Error for Error
{   fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {   match self
        {   Error::Transport(e) => Some(e)
          , Error::Assistant(inner) => Some(inner.as_ref())
          , _ => None
        }
    }
}
