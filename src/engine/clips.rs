//! CLIPS subprocess engine

use super::{ExecutionEngine, Verdict};
use crate::automaton::export::{self, CLIPS_OUTPUT_FILE};
use crate::automaton::{AutomatonStore, Label};
use crate::error::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;

/// File name of the rule program inside the scratch directory
pub const CLIPS_PROGRAM_FILE: &str = "commands.clp";

static RESULT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RESULT: (\S*)").expect("valid result regex"));

/// Runs `<binary> -f commands.clp` in a fresh scratch directory per evaluation
#[derive(Debug, Clone)]
pub struct ClipsEngine {
    binary: PathBuf,
    timeout: Duration,
}

impl ClipsEngine {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: resolve_binary(binary.into()),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

/// Relative paths such as `./clips` are anchored to our working directory,
/// since the child runs inside the scratch directory. Bare names go through PATH.
fn resolve_binary(binary: PathBuf) -> PathBuf {
    if binary.is_relative()
        && binary.components().count() > 1
        && let Ok(cwd) = std::env::current_dir()
    {
        return cwd.join(binary);
    }
    binary
}

/// Read the verdict from the dribble output. The first `RESULT:` line wins.
pub fn parse_output(output: &str) -> Result<Verdict> {
    let captures = RESULT_LINE
        .captures(output)
        .ok_or_else(|| Error::engine("no RESULT line in CLIPS output"))?;
    match &captures[1] {
        "SUCCESS" => Ok(Verdict::Success),
        "FAILURE" => Ok(Verdict::Failure),
        other => Err(Error::engine(format!("unrecognised CLIPS result '{}'", other))),
    }
}

#[async_trait]
impl ExecutionEngine for ClipsEngine {
    async fn evaluate(&self, store: &AutomatonStore, labels: &[Label]) -> Result<Verdict> {
        let scratch = tempfile::tempdir()
            .map_err(|e| Error::engine(format!("failed to create scratch directory: {}", e)))?;

        let program = export::to_clips(store.export(), Some(labels));
        tokio::fs::write(scratch.path().join(CLIPS_PROGRAM_FILE), program)
            .await
            .map_err(|e| Error::engine(format!("failed to write CLIPS program: {}", e)))?;

        let run = Command::new(&self.binary)
            .arg("-f")
            .arg(CLIPS_PROGRAM_FILE)
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, run).await {
            Err(_) => {
                return Err(Error::engine(format!(
                    "CLIPS did not finish within {:?}",
                    self.timeout
                )));
            }
            Ok(Err(e)) => {
                return Err(Error::engine(format!(
                    "failed to run {:?}: {}",
                    self.binary, e
                )));
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(Error::engine(format!(
                "CLIPS exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let dribble = tokio::fs::read_to_string(scratch.path().join(CLIPS_OUTPUT_FILE))
            .await
            .map_err(|e| Error::engine(format!("failed to read CLIPS output: {}", e)))?;

        parse_output(&dribble)
    }

    fn name(&self) -> &'static str {
        "clips"
    }
}
