//! The external completion service boundary.
//!
//! [`CompletionService`] is the seam the classifier talks to; [`GeminiClient`]
//! is the production implementation over the `generateContent` REST endpoint.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::api::{GenerateContentRequest, GenerateContentResponse};
use crate::core::session::Session;
use crate::utils::url::model_method_url;

/// Failures from a single completion call. No variant is retried.
#[derive(Debug)]
pub enum CompletionError {
    /// Connection, TLS, or transport failure before a status was received.
    Network(reqwest::Error),
    /// 401/403: the key was rejected.
    Auth { status: u16, message: String },
    /// 429: quota or rate limit exceeded.
    RateLimited { message: String },
    /// Any other non-success status.
    Api { status: u16, message: String },
    /// A success status with a body that is not a `generateContent` response.
    Malformed(serde_json::Error),
}

impl CompletionError {
    /// Short stable name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Network(_) => "network",
            CompletionError::Auth { .. } => "auth",
            CompletionError::RateLimited { .. } => "rate_limited",
            CompletionError::Api { .. } => "api",
            CompletionError::Malformed(_) => "malformed",
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let message = summarize_error_body(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Auth {
                status: status.as_u16(),
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited { message },
            _ => CompletionError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Network(err) => write!(f, "Network error: {err}"),
            CompletionError::Auth { status, message } => {
                write!(f, "Authentication failed ({status}): {message}")
            }
            CompletionError::RateLimited { message } => {
                write!(f, "Rate limit exceeded (429): {message}")
            }
            CompletionError::Api { status, message } => {
                write!(f, "API request failed with status {status}: {message}")
            }
            CompletionError::Malformed(err) => write!(f, "Malformed response: {err}"),
        }
    }
}

impl Error for CompletionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CompletionError::Network(err) => Some(err),
            CompletionError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Network(err)
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()))?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Reduce an error body to one line: the JSON `error.message` when present,
/// otherwise the trimmed body.
pub fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .as_ref()
        .and_then(extract_error_summary)
        .unwrap_or_else(|| trimmed.to_string())
}

/// A text-completion backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `prompt` and return the generated text, or `None` when the
    /// service answered successfully without any text.
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<Option<String>, CompletionError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, session: &Session) -> Self {
        Self {
            client,
            endpoint: model_method_url(&session.base_url, &session.model, "generateContent"),
            api_key: session.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<Option<String>, CompletionError> {
        let request = GenerateContentRequest::single_prompt(prompt, temperature);
        debug!(endpoint = %self.endpoint, temperature, "sending generateContent request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::from_status(status, &body));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(CompletionError::Malformed)?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            debug!(reason, "prompt was blocked");
        }

        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::label::LabelPolicy;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP request with a canned response and hand back
    /// the raw request text.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buffer = vec![0_u8; 16 * 1024];
            loop {
                let n = stream.read(&mut buffer).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/v1beta/"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn client_for(base_url: String) -> GeminiClient {
        let session = Session {
            api_key: "test-key".to_string(),
            base_url,
            model: "gemini-test".to_string(),
            label_policy: LabelPolicy::Strict,
        };
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        GeminiClient::new(client, &session)
    }

    #[tokio::test]
    async fn returns_candidate_text_and_sends_expected_request() {
        let (base_url, server) = one_shot_server(
            "200 OK",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Happy\n"}]}}]}"#,
        )
        .await;
        let client = client_for(base_url);

        let text = client.complete("PROMPT", 0.2).await.unwrap();
        assert_eq!(text.as_deref(), Some("Happy\n"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-test:generateContent HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""generationConfig":{"temperature":0.2}"#));
        assert!(request.contains(r#""text":"PROMPT""#));
    }

    #[tokio::test]
    async fn empty_candidates_is_none() {
        let (base_url, server) = one_shot_server("200 OK", r#"{"candidates":[]}"#).await;
        let client = client_for(base_url);

        assert!(client.complete("PROMPT", 0.2).await.unwrap().is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn status_codes_map_to_typed_errors() {
        let cases: [(&'static str, &'static str); 4] = [
            ("401 Unauthorized", "auth"),
            ("403 Forbidden", "auth"),
            ("429 Too Many Requests", "rate_limited"),
            ("500 Internal Server Error", "api"),
        ];

        for (status_line, expected_kind) in cases {
            let (base_url, server) = one_shot_server(
                status_line,
                r#"{"error":{"code":1,"message":"API key   not valid","status":"X"}}"#,
            )
            .await;
            let client = client_for(base_url);

            let err = client.complete("PROMPT", 0.2).await.unwrap_err();
            assert_eq!(err.kind(), expected_kind, "status {status_line}");
            assert!(
                err.to_string().contains("API key not valid"),
                "status {status_line}: {err}"
            );
            server.await.unwrap();
        }
    }

    #[tokio::test]
    async fn non_json_success_is_malformed() {
        let (base_url, server) = one_shot_server("200 OK", "<html>oops</html>").await;
        let client = client_for(base_url);

        let err = client.complete("PROMPT", 0.2).await.unwrap_err();
        assert!(matches!(err, CompletionError::Malformed(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}"));
        let err = client.complete("PROMPT", 0.2).await.unwrap_err();
        assert_eq!(err.kind(), "network");
        assert!(err.source().is_some());
    }

    #[test]
    fn summarize_error_body_variants() {
        assert_eq!(
            summarize_error_body(r#"{"error":{"message":"quota\n exhausted"}}"#),
            "quota exhausted"
        );
        assert_eq!(summarize_error_body(r#"{"error":"bad key"}"#), "bad key");
        assert_eq!(summarize_error_body(r#"{"message":"nope"}"#), "nope");
        assert_eq!(
            summarize_error_body(r#"{"status":"failed"}"#),
            r#"{"status":"failed"}"#
        );
        assert_eq!(summarize_error_body("  plain failure \n"), "plain failure");
        assert_eq!(summarize_error_body("   "), "<empty body>");
    }
}
