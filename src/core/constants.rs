//! Shared constants used across the application

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Optional environment override for the API base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Tracing filter directive, read at startup.
pub const LOG_ENV: &str = "EMOTION_AGENT_LOG";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Sampling temperature for every classification request. Not configurable.
pub const TEMPERATURE: f32 = 0.2;
