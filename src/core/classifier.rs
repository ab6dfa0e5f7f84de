use tracing::{debug, warn};

use crate::core::completion::CompletionService;
use crate::core::constants::TEMPERATURE;
use crate::core::label::{LabelPolicy, Outcome};
use crate::core::prompt::build_prompt;

/// Labels the emotion of single sentences through a [`CompletionService`].
///
/// Each call is independent: one request, no retries, no shared state beyond
/// the service handle and label policy fixed at construction.
pub struct EmotionClassifier<S> {
    service: S,
    policy: LabelPolicy,
}

impl<S: CompletionService> EmotionClassifier<S> {
    pub fn new(service: S, policy: LabelPolicy) -> Self {
        Self { service, policy }
    }

    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    #[cfg(test)]
    pub(crate) fn service_for_test(&self) -> &S {
        &self.service
    }

    /// Classify `text`. Never fails; problems are reported as sentinel outcomes.
    pub async fn classify(&self, text: &str) -> Outcome {
        if text.trim().is_empty() {
            return Outcome::InvalidInput;
        }

        let prompt = build_prompt(text);
        match self.service.complete(&prompt, TEMPERATURE).await {
            Ok(Some(raw)) => {
                let outcome = Outcome::from_model_text(&raw, self.policy);
                if let Outcome::UnrecognizedLabel(word) = &outcome {
                    warn!(label = %word, "model answered outside the label set");
                }
                debug!(outcome = %outcome, "classified");
                outcome
            }
            Ok(None) => Outcome::NoResponse,
            Err(err) => {
                eprintln!("An error occurred for text '{text}': {err}");
                warn!(kind = err.kind(), error = %err, "completion request failed");
                Outcome::Error
            }
        }
    }
}
