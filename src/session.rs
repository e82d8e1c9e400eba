//! Learning and testing session
//!
//! The session owns the grammar for its whole lifetime. Learning mutates it
//! strictly in input order; testing evaluates sentences concurrently against
//! an immutable snapshot and reassembles results by input index.

use crate::automaton::{self, AutomatonStore, ExportFormat, Transition, Vocabulary};
use crate::engine::{self, ExecutionEngine};
use crate::error::{Error, Result};
use crate::report::{SentenceOutcome, SessionReport};
use crate::tagger::{self, LabelSequenceProvider, TaggedSentence};
use crate::Config;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Where and how the grammar is written after each learning pass
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
}

/// What learning did with one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum LearnOutcome {
    /// Already accepted, nothing added
    AlreadyAccepted,
    /// New transitions added
    Learned(Vec<String>),
    /// Learning was refused and the grammar left unchanged
    Rejected(String),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LearnSummary {
    pub sentences: Vec<(String, LearnOutcome)>,
}

impl LearnSummary {
    pub fn learned(&self) -> usize {
        self.count(|o| matches!(o, LearnOutcome::Learned(_)))
    }

    pub fn already_accepted(&self) -> usize {
        self.count(|o| matches!(o, LearnOutcome::AlreadyAccepted))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, LearnOutcome::Rejected(_)))
    }

    pub fn added_transitions(&self) -> usize {
        self.sentences
            .iter()
            .map(|(_, o)| match o {
                LearnOutcome::Learned(rules) => rules.len(),
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&LearnOutcome) -> bool) -> usize {
        self.sentences.iter().filter(|(_, o)| pred(o)).count()
    }

    /// Human-readable summary
    pub fn render(&self) -> String {
        let mut out = format!(
            "Learned {} of {} sentences ({} new rules, {} already accepted).\n",
            self.learned(),
            self.sentences.len(),
            self.added_transitions(),
            self.already_accepted()
        );
        for (text, outcome) in &self.sentences {
            if let LearnOutcome::Rejected(reason) = outcome {
                out.push_str(&format!("Could not learn: {} ({})\n", text, reason));
            }
        }
        out
    }
}

pub struct Session {
    store: Arc<AutomatonStore>,
    provider: Box<dyn LabelSequenceProvider>,
    engine: Arc<dyn ExecutionEngine>,
    vocabulary: Vocabulary,
    export: Option<ExportTarget>,
    max_concurrency: usize,
}

impl Session {
    pub fn new(
        store: AutomatonStore,
        provider: Box<dyn LabelSequenceProvider>,
        engine: Arc<dyn ExecutionEngine>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            provider,
            engine,
            vocabulary: Vocabulary::default(),
            export: None,
            max_concurrency: 8,
        }
    }

    /// Build a session from configuration. Every error here is fatal.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = config.seed_store()?;
        let provider = tagger::create_provider(&config.tagger)?;
        let engine = engine::create_engine(&config.engine);
        tracing::debug!(
            "Session with {} seed rules, {} engine",
            store.len(),
            engine.name()
        );

        let export = config.export.enabled.then(|| ExportTarget {
            path: config.export.path.clone(),
            format: config.export.format,
        });

        Ok(Self::new(store, provider, engine)
            .with_vocabulary(config.vocabulary())
            .with_max_concurrency(config.engine.max_concurrency)
            .with_export(export))
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_export(mut self, export: Option<ExportTarget>) -> Self {
        self.export = export;
        self
    }

    pub fn set_export(&mut self, export: Option<ExportTarget>) {
        self.export = export;
    }

    pub fn store(&self) -> &AutomatonStore {
        &self.store
    }

    /// Immutable view of the grammar as it is now
    pub fn snapshot(&self) -> Arc<AutomatonStore> {
        Arc::clone(&self.store)
    }

    /// Tag `text` and check every label against the vocabulary
    pub fn tag(&self, text: &str) -> Result<Vec<TaggedSentence>> {
        let sentences = self.provider.tag(text)?;
        tagger::validate(&sentences, &self.vocabulary)?;
        Ok(sentences)
    }

    /// Learn every sentence of `text`, then export the grammar
    pub fn learn_text(&mut self, text: &str) -> Result<LearnSummary> {
        let sentences = self.tag(text)?;
        let summary = self.learn_sentences(&sentences);
        tracing::info!(
            "Learning pass: {} sentences, {} learned, {} new rules, {} refused",
            sentences.len(),
            summary.learned(),
            summary.added_transitions(),
            summary.rejected()
        );
        self.export()?;
        Ok(summary)
    }

    /// Learn sentences one at a time, in order. Later sentences see earlier additions.
    pub fn learn_sentences(&mut self, sentences: &[TaggedSentence]) -> LearnSummary {
        // Copy-on-write: snapshots held by running tests keep the old grammar
        let store = Arc::make_mut(&mut self.store);
        let mut summary = LearnSummary::default();

        for sentence in sentences {
            let outcome = if automaton::accepts(&sentence.labels, store) {
                LearnOutcome::AlreadyAccepted
            } else {
                match automaton::extend(&sentence.labels, store) {
                    Ok(added) => {
                        tracing::debug!(
                            "Learned '{}' with {} new rules",
                            sentence.text,
                            added.len()
                        );
                        LearnOutcome::Learned(added.iter().map(Transition::to_string).collect())
                    }
                    Err(e) => {
                        tracing::warn!("Could not learn '{}': {}", sentence.text, e);
                        LearnOutcome::Rejected(e.to_string())
                    }
                }
            };
            summary.sentences.push((sentence.text.clone(), outcome));
        }

        summary
    }

    /// Write the grammar to the export target, if any
    pub fn export(&self) -> Result<()> {
        match &self.export {
            Some(target) => automaton::export::write_to(&self.store, target.format, &target.path),
            None => Ok(()),
        }
    }

    /// Evaluate every sentence of `text` against the current grammar
    pub async fn test_text(&self, text: &str) -> Result<SessionReport> {
        let sentences = self.tag(text)?;
        let report = self.test_sentences(sentences).await;
        tracing::info!(
            "Test pass: {}/{} sentences accepted",
            report.total() - report.failures().len() - report.errors().len(),
            report.total()
        );
        Ok(report)
    }

    /// Evaluate sentences concurrently; the report keeps input order
    pub async fn test_sentences(&self, sentences: Vec<TaggedSentence>) -> SessionReport {
        let store = self.snapshot();
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, sentence) in sentences.iter().enumerate() {
            let store = Arc::clone(&store);
            let engine = Arc::clone(&self.engine);
            let permits = Arc::clone(&permits);
            let labels = sentence.labels.clone();

            tasks.spawn(async move {
                let verdict = match permits.acquire_owned().await {
                    Ok(_permit) => engine.evaluate(&store, &labels).await,
                    Err(e) => Err(Error::engine(e.to_string())),
                };
                (index, verdict)
            });
        }

        let mut outcomes: Vec<Option<SentenceOutcome>> = vec![None; sentences.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(verdict))) => outcomes[index] = Some(verdict.into()),
                Ok((index, Err(e))) => {
                    tracing::warn!("Could not evaluate '{}': {}", sentences[index].text, e);
                    outcomes[index] = Some(SentenceOutcome::Error(e.to_string()));
                }
                Err(e) => tracing::warn!("Evaluation task failed: {}", e),
            }
        }

        SessionReport::new(
            sentences
                .into_iter()
                .zip(outcomes)
                .map(|(sentence, outcome)| {
                    let outcome = outcome.unwrap_or_else(|| {
                        SentenceOutcome::Error("evaluation task failed".to_string())
                    });
                    (sentence.text, outcome)
                })
                .collect(),
        )
    }
}
