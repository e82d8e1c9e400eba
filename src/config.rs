//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::automaton::{AutomatonStore, CANONICAL_SEED, ExportFormat, Vocabulary};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub grammar: GrammarConfig,

    #[serde(default)]
    pub tagger: TaggerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Seed grammar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Seed transitions as `<from> <label> <to>` rule strings
    #[serde(default = "default_seed")]
    pub seed: Vec<String>,
}

/// Tagger kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaggerKind {
    /// Built-in or file-based lexicon tagger over raw text
    #[default]
    Lexicon,
    /// Input is already annotated as word/TAG
    Pretagged,
}

/// Tagger configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaggerConfig {
    #[serde(default)]
    pub kind: TaggerKind,

    /// Path to a JSON lexicon model (built-in model when absent)
    pub model: Option<PathBuf>,

    /// Labels accepted in addition to the Penn Treebank tag set
    #[serde(default)]
    pub extra_labels: Vec<String>,
}

/// Execution backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EngineBackend {
    #[default]
    InProcess,
    Clips,
}

/// Execution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub backend: EngineBackend,

    /// CLIPS executable
    #[serde(default = "default_clips_binary")]
    pub clips_binary: PathBuf,

    /// Bound on a single CLIPS invocation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of sentences evaluated at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// Rule export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Rewrite the export file after every learning pass
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_export_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub format: ExportFormat,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_seed() -> Vec<String> {
    CANONICAL_SEED.iter().map(|r| r.to_string()).collect()
}

fn default_clips_binary() -> PathBuf {
    PathBuf::from("clips")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_concurrency() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_export_path() -> PathBuf {
    PathBuf::from("commands.clp")
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: EngineBackend::default(),
            clips_binary: default_clips_binary(),
            timeout_secs: default_timeout_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_export_path(),
            format: ExportFormat::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./pos-grammar.toml
    /// 2. ~/.pos-grammar/config.toml
    /// 3. /etc/pos-grammar/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("pos-grammar.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pos-grammar").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/pos-grammar/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Reject values that would make the session unusable
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_concurrency == 0 {
            return Err(Error::Config(
                "engine.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.engine.timeout_secs == 0 {
            return Err(Error::Config(
                "engine.timeout_secs must be at least 1".to_string(),
            ));
        }
        self.seed_store()?;
        Ok(())
    }

    /// Build the initial store from the configured seed
    pub fn seed_store(&self) -> Result<AutomatonStore> {
        AutomatonStore::from_rules(&self.grammar.seed)
            .map_err(|e| Error::Config(format!("Invalid seed grammar: {}", e)))
    }

    /// The label alphabet: Penn Treebank plus configured extras
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::penn_treebank().with_extra(self.tagger.extra_labels.iter().cloned())
    }
}
