use crate::core::label::Emotion;

/// Build the classification prompt for `sentence`.
///
/// The sentence is embedded verbatim inside double quotes; the label list
/// comes from [`Emotion::ALL`] so the prompt and the validator cannot drift.
pub fn build_prompt(sentence: &str) -> String {
    let mut prompt = String::from(
        "Analyze the emotion expressed in the following sentence and respond with a single, lowercase word from the list:\n",
    );
    for emotion in Emotion::ALL {
        prompt.push_str("- ");
        prompt.push_str(emotion.as_str());
        prompt.push('\n');
    }
    prompt.push_str(&format!("\nSentence: \"{sentence}\"\nEmotion:\n"));
    prompt
}
