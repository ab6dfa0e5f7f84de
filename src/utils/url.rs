//! URL utilities for building Gemini endpoint addresses
//!
//! Base URLs may come from the environment or a config file with or without
//! trailing slashes; everything here normalizes before joining.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use emotion_agent::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/v1beta///"), "https://example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct the URL of a model method such as `generateContent`
///
/// Accepts the model either bare (`gemini-1.5-flash`) or in resource form
/// (`models/gemini-1.5-flash`).
///
/// # Examples
///
/// ```
/// use emotion_agent::utils::url::model_method_url;
///
/// assert_eq!(
///     model_method_url("https://example.com/v1beta/", "gemini-1.5-flash", "generateContent"),
///     "https://example.com/v1beta/models/gemini-1.5-flash:generateContent"
/// );
/// ```
pub fn model_method_url(base_url: &str, model: &str, method: &str) -> String {
    let base = normalize_base_url(base_url);
    let model = model.trim_matches('/');
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{base}/models/{model}:{method}")
}
