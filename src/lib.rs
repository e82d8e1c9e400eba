//! Part-of-Speech Grammar Learner
//!
//! Learns which orderings of grammatical-category labels make a sentence,
//! and checks new text against what it learned.
//!
//! This library provides functionality for:
//! - Tagging raw text into per-sentence label sequences (lexicon or pre-tagged input)
//! - Inducing a deterministic finite-state grammar from rejected sequences
//! - Matching label sequences against the grammar, in process or through CLIPS
//! - Exporting the grammar as a CLIPS rule program, Graphviz DOT or JSON
//! - Summarising test passes sentence by sentence

pub mod automaton;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod session;
pub mod tagger;

pub use config::Config;
pub use error::{Error, Result};
pub use session::Session;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level. Logs go to stderr.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
