//! Dictionary and suffix based tagger

use super::{LabelSequenceProvider, TaggedSentence};
use crate::automaton::Label;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const BUILTIN_MODEL: &str = include_str!("../../models/default-lexicon.json");

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)*|\w+(?:['\-]\w+)*|[^\w\s]").expect("valid token regex")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.,]\d+)*$").expect("valid number regex"));

/// Tagging model: exact word lookup, ordered suffix rules and a fallback tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconModel {
    /// Lower-cased word -> tag
    #[serde(default)]
    pub lexicon: HashMap<String, String>,

    /// `(suffix, tag)` pairs, first match wins
    #[serde(default)]
    pub suffixes: Vec<(String, String)>,

    #[serde(default = "default_tag")]
    pub default_tag: String,
}

fn default_tag() -> String {
    "NN".to_string()
}

impl LexiconModel {
    /// Load a model from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|e| Error::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The model bundled with the crate
    pub fn builtin() -> Result<Self> {
        serde_json::from_str(BUILTIN_MODEL).map_err(|e| Error::ModelLoad {
            path: PathBuf::from("<builtin>"),
            message: e.to_string(),
        })
    }

    /// Tag a single word token
    fn tag_word(&self, word: &str) -> &str {
        if let Some(tag) = self.lexicon.get(&word.to_lowercase()) {
            return tag;
        }
        if NUMBER.is_match(word) {
            return "CD";
        }
        if word.chars().next().is_some_and(char::is_uppercase) {
            return "NNP";
        }
        let lower = word.to_lowercase();
        self.suffixes
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() && lower.ends_with(suffix.as_str()))
            .map(|(_, tag)| tag.as_str())
            .unwrap_or(self.default_tag.as_str())
    }
}

/// Penn Treebank tag of a punctuation token
fn punctuation_tag(token: &str) -> &'static str {
    match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "-" => ":",
        "\"" | "`" => "``",
        "'" => "''",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "$" => "$",
        "#" => "#",
        _ => "SYM",
    }
}

/// Tokenizes raw text and labels each token with the model
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    model: LexiconModel,
}

impl LexiconTagger {
    pub fn new(model: LexiconModel) -> Self {
        Self { model }
    }

    fn tag_token<'a>(&'a self, token: &str) -> &'a str {
        if token.chars().all(|c| !c.is_alphanumeric() && c != '_') {
            punctuation_tag(token)
        } else {
            self.model.tag_word(token)
        }
    }
}

impl LabelSequenceProvider for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedSentence>> {
        let mut sentences = Vec::new();
        let mut words: Vec<&str> = Vec::new();
        let mut labels = Vec::new();

        for token in TOKEN.find_iter(text).map(|m| m.as_str()) {
            let tag = self.tag_token(token);
            words.push(token);
            labels.push(Label::new(tag));

            if tag == "." {
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

        tracing::debug!("Tagged {} sentences", sentences.len());
        Ok(sentences)
    }
}
