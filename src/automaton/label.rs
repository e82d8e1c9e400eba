//! Label representation and the fixed alphabet

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Penn Treebank part-of-speech tags, including punctuation tags.
pub const PENN_TREEBANK_TAGS: &[&str] = &[
    "CC", "CD", "DT", "EX", "FW", "IN", "JJ", "JJR", "JJS", "LS", "MD", "NN", "NNS", "NNP",
    "NNPS", "PDT", "POS", "PRP", "PRP$", "RB", "RBR", "RBS", "RP", "SYM", "TO", "UH", "VB",
    "VBD", "VBG", "VBN", "VBP", "VBZ", "WDT", "WP", "WP$", "WRB", ".", ",", ":", "$", "#", "``",
    "''", "-LRB-", "-RRB-",
];

/// A grammatical-category symbol. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Arc<str>);

impl Label {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(Arc::from(tag.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Build a label sequence from string tags
pub fn labels<I, S>(tags: I) -> Vec<Label>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter().map(Label::new).collect()
}

/// The finite set of labels the grammar may use
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tags: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::penn_treebank()
    }
}

impl Vocabulary {
    pub fn penn_treebank() -> Self {
        Self {
            tags: PENN_TREEBANK_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Extend the vocabulary with extra tags
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.tags.contains(label.as_str())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_equality() {
        assert_eq!(Label::new("NNP"), Label::from("NNP"));
        assert_ne!(Label::new("NN"), Label::new("NNP"));
        assert_eq!(Label::new(".").to_string(), ".");
    }

    #[test]
    fn test_vocabulary_membership() {
        let vocab = Vocabulary::penn_treebank();
        assert!(vocab.contains(&Label::new("VBZ")));
        assert!(vocab.contains(&Label::new(".")));
        assert!(!vocab.contains(&Label::new("XYZ")));

        let vocab = vocab.with_extra(["XYZ"]);
        assert!(vocab.contains(&Label::new("XYZ")));
        assert_eq!(vocab.len(), PENN_TREEBANK_TAGS.len() + 1);
    }
}
