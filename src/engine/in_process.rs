use super::{ExecutionEngine, Verdict};
use crate::Result;
use crate::automaton::{self, AutomatonStore, Label};
use async_trait::async_trait;

/// Evaluates sequences with the deterministic matcher. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessEngine;

#[async_trait]
impl ExecutionEngine for InProcessEngine {
    async fn evaluate(&self, store: &AutomatonStore, labels: &[Label]) -> Result<Verdict> {
        let outcome = automaton::trace(labels, store);
        if let automaton::MatchOutcome::Rejected(reason) = &outcome {
            tracing::trace!("Rejected: {:?}", reason);
        }
        Ok(Verdict::from(outcome.is_accepted()))
    }

    fn name(&self) -> &'static str {
        "in-process"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::labels;

    #[tokio::test]
    async fn test_in_process_verdicts() {
        let store = AutomatonStore::canonical();
        let engine = InProcessEngine;

        let verdict = engine
            .evaluate(&store, &labels(["NNP", "VBZ", "JJ", "."]))
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Success);

        let verdict = engine
            .evaluate(&store, &labels(["NNP", "VBZ", "."]))
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Failure);
    }
}
