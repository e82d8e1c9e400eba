//! Reader for text already annotated as `word/TAG`

use super::{LabelSequenceProvider, TaggedSentence};
use crate::automaton::Label;
use crate::error::{Error, Result};

/// Reads whitespace-separated `word/TAG` tokens. A sentence ends after every
/// token tagged with the terminator label (`.` by default).
#[derive(Debug, Clone)]
pub struct PreTaggedReader {
    terminator: Label,
}

impl Default for PreTaggedReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PreTaggedReader {
    pub fn new() -> Self {
        Self {
            terminator: Label::new("."),
        }
    }
}

impl LabelSequenceProvider for PreTaggedReader {
    fn tag(&self, text: &str) -> Result<Vec<TaggedSentence>> {
        let mut sentences = Vec::new();
        let mut words: Vec<&str> = Vec::new();
        let mut labels = Vec::new();

        for token in text.split_whitespace() {
            // Split at the last slash so words like "and/or" keep theirs
            let (word, tag) = token
                .rsplit_once('/')
                .filter(|(w, t)| !w.is_empty() && !t.is_empty())
                .ok_or_else(|| {
                    Error::tagging(format!("token '{}' is not of the form word/TAG", token))
                })?;

            let label = Label::new(tag);
            let ends_sentence = label == self.terminator;
            words.push(word);
            labels.push(label);

            if ends_sentence {
                sentences.push(TaggedSentence::new(
                    words.join(" "),
                    std::mem::take(&mut labels),
                ));
                words.clear();
            }
        }

        if !labels.is_empty() {
            sentences.push(TaggedSentence::new(words.join(" "), labels));
        }

        Ok(sentences)
    }
}
