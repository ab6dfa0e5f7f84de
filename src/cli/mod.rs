//! Command-line interface parsing and startup
//!
//! Resolves the session before anything interactive happens, so a missing
//! credential exits before the first prompt is shown.

pub mod repl;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::cli::repl::run_repl;
use crate::core::classifier::EmotionClassifier;
use crate::core::completion::GeminiClient;
use crate::core::config::Config;
use crate::core::constants::{API_KEY_ENV, BASE_URL_ENV, LOG_ENV};
use crate::core::session::{resolve_session, SessionOverrides};
use crate::utils::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "emotion-agent", version)]
#[command(about = "Predict the emotion of a sentence using the Gemini API")]
#[command(
    long_about = "emotion-agent reads sentences from standard input, asks a Gemini model \
which of seven emotions (neutral, happy, sad, angry, surprised, disgusted, fearful) \
each one expresses, and prints the answer.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY      Your Gemini API key (required)\n\
  GEMINI_BASE_URL     Custom API base URL (optional)\n\
  EMOTION_AGENT_LOG   Diagnostic log filter, e.g. debug (optional, defaults to warn)\n\n\
Controls:\n\
  Enter a sentence    Print its predicted emotion\n\
  exit / empty line   Quit\n\
  Ctrl+C / Ctrl+D     Quit"
)]
pub struct Args {
    /// Model to use instead of the configured default
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print whatever word the model answers, even if it is not a known emotion
    #[arg(long)]
    pub lenient: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main());
    // A stdin read parked on a blocking thread would otherwise hold up shutdown.
    runtime.shutdown_background();
    result
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    let overrides = SessionOverrides {
        model: args.model,
        lenient: args.lenient,
    };
    let session = match resolve_session(&config, &overrides) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    };
    info!(?session, "session resolved");

    let client = GeminiClient::new(reqwest::Client::new(), &session);
    info!(endpoint = client.endpoint(), "using endpoint");
    let classifier = EmotionClassifier::new(client, session.label_policy);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let exit = run_repl(&classifier, stdin, &mut stdout, interrupted()).await?;
    info!(?exit, policy = ?classifier.policy(), "session ended");

    Ok(())
}

async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; rely on exit/EOF instead.
        std::future::pending::<()>().await;
    }
}

/// Environment variables the binary reads.
pub fn environment_variables() -> [&'static str; 3] {
    [API_KEY_ENV, BASE_URL_ENV, LOG_ENV]
}
