//! Tagger module - turning raw text into label sequences
//!
//! This module provides a trait-based abstraction over part-of-speech tagging
//! so the grammar code only ever sees ordered label sequences per sentence.

use crate::automaton::{Label, Vocabulary};
use crate::config::{TaggerConfig, TaggerKind};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub mod lexicon;
pub mod pretagged;

pub use lexicon::{LexiconModel, LexiconTagger};
pub use pretagged::PreTaggedReader;

/// One sentence of input with its label sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSentence {
    /// Sentence tokens joined by single spaces
    pub text: String,
    pub labels: Vec<Label>,
}

impl TaggedSentence {
    pub fn new(text: impl Into<String>, labels: Vec<Label>) -> Self {
        Self {
            text: text.into(),
            labels,
        }
    }
}

/// Label sequence provider trait
///
/// Implementations:
/// - `LexiconTagger`: dictionary and suffix based tagging of raw text
/// - `PreTaggedReader`: reads text already annotated as `word/TAG`
pub trait LabelSequenceProvider: Send + Sync {
    /// Split `text` into sentences and label every token
    fn tag(&self, text: &str) -> Result<Vec<TaggedSentence>>;
}

/// Create a provider based on configuration. Model load failures are fatal.
pub fn create_provider(config: &TaggerConfig) -> Result<Box<dyn LabelSequenceProvider>> {
    match config.kind {
        TaggerKind::Lexicon => {
            let model = match &config.model {
                Some(path) => LexiconModel::from_file(path)?,
                None => LexiconModel::builtin()?,
            };
            Ok(Box::new(LexiconTagger::new(model)))
        }
        TaggerKind::Pretagged => Ok(Box::new(PreTaggedReader::new())),
    }
}

/// Reject labels outside the vocabulary and texts without any sentence
pub fn validate(sentences: &[TaggedSentence], vocabulary: &Vocabulary) -> Result<()> {
    if sentences.is_empty() {
        return Err(Error::tagging("no sentences found in input"));
    }
    for sentence in sentences {
        if let Some(label) = sentence.labels.iter().find(|l| !vocabulary.contains(l)) {
            return Err(Error::tagging(format!(
                "label '{}' is not in the vocabulary (sentence: '{}')",
                label, sentence.text
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::labels;

    #[test]
    fn test_validate_rejects_unknown_label() {
        let sentences = vec![TaggedSentence::new("x y", labels(["NN", "BOGUS"]))];
        let err = validate(&sentences, &Vocabulary::default()).unwrap_err();
        assert!(matches!(err, Error::Tagging(_)));
        assert!(err.to_string().contains("BOGUS"));
    }

    #[test]
    fn test_validate_rejects_empty_input() {
        assert!(validate(&[], &Vocabulary::default()).is_err());
    }

    #[test]
    fn test_create_pretagged_provider() {
        let config = TaggerConfig {
            kind: TaggerKind::Pretagged,
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        let sentences = provider.tag("John/NNP runs/VBZ ./.").unwrap();
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let config = TaggerConfig {
            model: Some("/nonexistent/model.json".into()),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.is_fatal());
    }
}
