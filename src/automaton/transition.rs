//! Transition representation

use crate::automaton::{Label, StateId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A labelled edge between two states
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateId,
    pub label: Label,
    pub to: StateId,
}

impl Transition {
    pub fn new(from: StateId, label: impl Into<Label>, to: StateId) -> Self {
        Self {
            from,
            label: label.into(),
            to,
        }
    }
}

/// Rule syntax shared with the CLIPS program: `<from> <label> <to>`
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.label, self.to)
    }
}

impl FromStr for Transition {
    type Err = Error;

    fn from_str(rule: &str) -> Result<Self> {
        let parts: Vec<&str> = rule.split_whitespace().collect();
        let [from, label, to] = parts.as_slice() else {
            return Err(Error::invalid_rule(format!(
                "expected '<from> <label> <to>', got '{}'",
                rule
            )));
        };

        let from: StateId = from.parse()?;
        let to: StateId = to.parse()?;
        if from.is_end() {
            return Err(Error::invalid_rule(format!(
                "END cannot have outgoing transitions: '{}'",
                rule
            )));
        }

        Ok(Self::new(from, Label::new(label), to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule() {
        let t: Transition = "START NNP 1".parse().unwrap();
        assert_eq!(t, Transition::new(StateId::Start, "NNP", StateId::Node(1)));

        let t: Transition = "3 . END".parse().unwrap();
        assert_eq!(t.to, StateId::End);
        assert_eq!(t.to_string(), "3 . END");
    }

    #[test]
    fn test_parse_invalid_rules() {
        assert!("START NNP".parse::<Transition>().is_err());
        assert!("START NNP 1 2".parse::<Transition>().is_err());
        assert!("END . 4".parse::<Transition>().is_err());
        assert!("x NNP 1".parse::<Transition>().is_err());
    }
}
