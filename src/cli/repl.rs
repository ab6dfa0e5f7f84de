//! Line-oriented interactive loop.
//!
//! Reads one sentence per line, classifies it, prints the label, and stops on
//! an empty line, `exit`, end of input, or interrupt.

use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::core::classifier::EmotionClassifier;
use crate::core::completion::CompletionService;
use crate::core::label::capitalize;

pub const BANNER: &str = "Emotion Detection Agent. Enter a sentence to predict its emotion.";
pub const HINT: &str = "Type 'exit' or press Enter on an empty line to quit.";
pub const PROMPT: &str = "\nEnter a sentence: ";
pub const GOODBYE: &str = "Exiting the program. Goodbye!";

/// Why the loop stopped. Every variant is a clean exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Empty line or `exit`.
    Command,
    EndOfInput,
    Interrupted,
}

/// True for lines that end the session: blank, or `exit` in any case.
pub fn is_exit_command(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("exit")
}

pub fn format_prediction(label: &str) -> String {
    format!("Predicted Emotion: {}", capitalize(label))
}

/// Run the loop until a terminal condition. `interrupt` resolves when the
/// user asks to stop (Ctrl+C in production); it is raced against both the
/// pending read and any in-flight classification.
pub async fn run_repl<S, R, W, F>(
    classifier: &EmotionClassifier<S>,
    input: R,
    out: &mut W,
    interrupt: F,
) -> io::Result<LoopExit>
where
    S: CompletionService,
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let mut lines = input.lines();

    writeln!(out, "{BANNER}")?;
    writeln!(out, "{HINT}")?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut interrupt => {
                writeln!(out, "\n{GOODBYE}")?;
                return Ok(LoopExit::Interrupted);
            }
        };

        let Some(line) = line else {
            writeln!(out, "\n{GOODBYE}")?;
            return Ok(LoopExit::EndOfInput);
        };

        if is_exit_command(&line) {
            writeln!(out, "{GOODBYE}")?;
            return Ok(LoopExit::Command);
        }

        let outcome = tokio::select! {
            outcome = classifier.classify(&line) => outcome,
            _ = &mut interrupt => {
                writeln!(out, "\n{GOODBYE}")?;
                return Ok(LoopExit::Interrupted);
            }
        };
        debug!(outcome = %outcome, sentinel = outcome.is_sentinel(), "prediction");

        writeln!(out, "{}", format_prediction(outcome.label()))?;
    }
}
