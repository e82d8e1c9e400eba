//! Engine module - deciding whether a label sequence is accepted
//!
//! The in-process engine walks the store directly. The CLIPS engine hands the
//! exported rule program to an external rule evaluator and reads back its verdict.

use crate::automaton::{AutomatonStore, Label};
use crate::config::{EngineBackend, EngineConfig};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod clips;
pub mod in_process;

pub use clips::ClipsEngine;
pub use in_process::InProcessEngine;

/// Verdict of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success => f.write_str("SUCCESS"),
            Verdict::Failure => f.write_str("FAILURE"),
        }
    }
}

/// Execution engine trait
///
/// Any failure to obtain a verdict is an `EngineInvocation` error, never a `Failure`.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn evaluate(&self, store: &AutomatonStore, labels: &[Label]) -> Result<Verdict>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Create an engine instance based on configuration
pub fn create_engine(config: &EngineConfig) -> Arc<dyn ExecutionEngine> {
    match config.backend {
        EngineBackend::InProcess => Arc::new(InProcessEngine),
        EngineBackend::Clips => Arc::new(ClipsEngine::new(
            config.clips_binary.clone(),
            config.timeout(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Success.to_string(), "SUCCESS");
        assert_eq!(Verdict::from(false), Verdict::Failure);
        assert!(Verdict::from(true).is_success());
    }

    #[test]
    fn test_create_engine() {
        let engine = create_engine(&EngineConfig::default());
        assert_eq!(engine.name(), "in-process");

        let config = EngineConfig {
            backend: EngineBackend::Clips,
            ..Default::default()
        };
        assert_eq!(create_engine(&config).name(), "clips");
    }
}
