//! State representation

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A node of the learned automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateId {
    /// Where every walk begins
    Start,
    /// The only accepting state. Never has outgoing transitions.
    End,
    /// Intermediate state, numbered in allocation order
    Node(u64),
}

impl StateId {
    pub fn is_start(&self) -> bool {
        matches!(self, StateId::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, StateId::End)
    }

    pub fn node_number(&self) -> Option<u64> {
        match self {
            StateId::Node(n) => Some(*n),
            _ => None,
        }
    }

    /// Graphviz fill color
    pub fn color(&self) -> &'static str {
        match self {
            StateId::Start => "lightblue",
            StateId::End => "green",
            StateId::Node(_) => "lightgray",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateId::Start => f.write_str("START"),
            StateId::End => f.write_str("END"),
            StateId::Node(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for StateId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "START" => Ok(StateId::Start),
            "END" => Ok(StateId::End),
            other => other
                .parse::<u64>()
                .map(StateId::Node)
                .map_err(|_| Error::invalid_rule(format!("'{}' is not a state", other))),
        }
    }
}
