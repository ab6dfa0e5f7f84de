//! Emotion vocabulary and classification outcomes.

use std::fmt;
use std::str::FromStr;

pub const INVALID_INPUT: &str = "invalid_input";
pub const NO_RESPONSE: &str = "no_response";
pub const ERROR: &str = "error";
pub const UNRECOGNIZED_LABEL: &str = "unrecognized_label";

/// The closed set of labels the model is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Disgusted,
    Fearful,
}

impl Emotion {
    /// All labels, in the order they are listed in the prompt.
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Disgusted,
        Emotion::Fearful,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Disgusted => "disgusted",
            Emotion::Fearful => "fearful",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEmotion(pub String);

impl fmt::Display for UnknownEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a known emotion label", self.0)
    }
}

impl std::error::Error for UnknownEmotion {}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == s)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// How to treat model output that is not one of [`Emotion::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// Map anything off-vocabulary to [`Outcome::UnrecognizedLabel`].
    #[default]
    Strict,
    /// Pass the normalized word through unchanged.
    Lenient,
}

/// Result of one classification. Never an error: failures are sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Emotion(Emotion),
    /// Off-vocabulary word accepted under [`LabelPolicy::Lenient`].
    Unlisted(String),
    /// Off-vocabulary word rejected under [`LabelPolicy::Strict`].
    UnrecognizedLabel(String),
    InvalidInput,
    NoResponse,
    Error,
}

impl Outcome {
    /// Build an outcome from raw model text: trim, lowercase, then apply `policy`.
    pub fn from_model_text(raw: &str, policy: LabelPolicy) -> Self {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Outcome::NoResponse;
        }
        match normalized.parse::<Emotion>() {
            Ok(emotion) => Outcome::Emotion(emotion),
            Err(UnknownEmotion(word)) => match policy {
                LabelPolicy::Strict => Outcome::UnrecognizedLabel(word),
                LabelPolicy::Lenient => Outcome::Unlisted(word),
            },
        }
    }

    /// The label string printed to the user.
    pub fn label(&self) -> &str {
        match self {
            Outcome::Emotion(emotion) => emotion.as_str(),
            Outcome::Unlisted(word) => word,
            Outcome::UnrecognizedLabel(_) => UNRECOGNIZED_LABEL,
            Outcome::InvalidInput => INVALID_INPUT,
            Outcome::NoResponse => NO_RESPONSE,
            Outcome::Error => ERROR,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Outcome::Emotion(_) | Outcome::Unlisted(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Uppercase the first character and leave the rest as-is.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
