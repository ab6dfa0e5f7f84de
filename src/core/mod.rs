pub mod classifier;
pub mod completion;
pub mod config;
pub mod constants;
pub mod label;
pub mod prompt;
pub mod session;
