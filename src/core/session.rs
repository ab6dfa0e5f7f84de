//! Startup settings resolution.
//!
//! Everything the classifier needs from the outside world is resolved once
//! into an immutable [`Session`] and passed down explicitly.

use std::error::Error;
use std::fmt;

use crate::core::config::{Config, ConfigError};
use crate::core::constants::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::label::LabelPolicy;

#[derive(Clone)]
pub struct Session {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub label_policy: LabelPolicy,
}

// Keep the key out of debug output and logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("label_policy", &self.label_policy)
            .finish()
    }
}

/// Command-line values that take precedence over env and config.
#[derive(Debug, Default, Clone)]
pub struct SessionOverrides {
    pub model: Option<String>,
    pub lenient: bool,
}

#[derive(Debug)]
pub enum SessionError {
    MissingApiKey,
    Config(ConfigError),
}

impl SessionError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingApiKey => write!(
                f,
                "Error: '{API_KEY_ENV}' environment variable not set.\nPlease set your API key and try again:\n   export {API_KEY_ENV}=\"your-api-key-here\""
            ),
            SessionError::Config(err) => write!(f, "Error: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::MissingApiKey => None,
            SessionError::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::Config(err)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve a session. Precedence is flag, then environment, then config file,
/// then built-in default. The API key comes only from the environment.
pub fn resolve_session(
    config: &Config,
    overrides: &SessionOverrides,
) -> Result<Session, SessionError> {
    let api_key = non_empty_env(API_KEY_ENV).ok_or(SessionError::MissingApiKey)?;

    let base_url = non_empty_env(BASE_URL_ENV)
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let model = overrides
        .model
        .clone()
        .filter(|model| !model.trim().is_empty())
        .or_else(|| config.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let label_policy = if overrides.lenient || config.lenient_labels.unwrap_or(false) {
        LabelPolicy::Lenient
    } else {
        LabelPolicy::Strict
    };

    Ok(Session {
        api_key,
        base_url,
        model,
        label_policy,
    })
}
