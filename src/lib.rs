//! emotion-agent is a terminal tool that asks a Gemini model which emotion a
//! sentence expresses.
//!
//! The crate is organized around a small set of layers:
//! - [`core`] owns the label vocabulary, prompt, completion-service boundary,
//!   classifier policy, and startup session resolution.
//! - [`cli`] parses arguments and runs the interactive loop.
//! - [`api`] defines the `generateContent` wire payloads.
//! - [`utils`] holds URL construction and logging setup.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
