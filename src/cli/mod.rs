//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::automaton::ExportFormat;
use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod interactive;
pub mod output;

/// Part-of-speech grammar learner CLI
#[derive(Parser, Debug)]
#[command(name = "pos-grammar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config; RUST_LOG takes precedence over both)
    #[arg(long, global = true, env = "POS_GRAMMAR_LOG")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Learn the sentence structures of the given texts
    Learn {
        /// Text files to learn from
        files: Vec<PathBuf>,

        /// Learn from this text instead of (or in addition to) files
        #[arg(short, long)]
        text: Option<String>,

        /// Export destination (overrides config)
        #[arg(long)]
        export: Option<PathBuf>,

        /// Export format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Check texts against the grammar
    Test {
        /// Text files to test
        files: Vec<PathBuf>,

        /// Test this text instead of (or in addition to) files
        #[arg(short, long)]
        text: Option<String>,

        /// Files to learn from before testing
        #[arg(short, long)]
        learn: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Print the grammar, optionally after learning from files
    Export {
        /// Files to learn from before exporting
        #[arg(short, long)]
        learn: Vec<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "clips")]
        format: ExportFormat,
    },

    /// Menu-driven session: learn and test until exit
    Interactive,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON output
    Json,
}

/// Execute the CLI command. Returns whether every text was handled successfully.
pub async fn execute(args: Cli, config: Config) -> Result<bool> {
    match args.command {
        Commands::Learn { .. } => commands::learn::execute(args, config),
        Commands::Test { .. } => commands::test::execute(args, config).await,
        Commands::Export { learn, format } => commands::export::execute(learn, format, config),
        Commands::Interactive => commands::interactive::execute(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["pos-grammar", "learn", "corpus.txt", "--format", "dot"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from([
            "pos-grammar",
            "test",
            "--learn",
            "corpus.txt",
            "--text",
            "John is happy.",
            "--output",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Test {
                learn, text, output, ..
            } => {
                assert_eq!(learn, vec![PathBuf::from("corpus.txt")]);
                assert_eq!(text.as_deref(), Some("John is happy."));
                assert_eq!(output, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        let cli = Cli::try_parse_from(["pos-grammar", "export", "--format", "xml"]);
        assert!(cli.is_err());
    }
}
