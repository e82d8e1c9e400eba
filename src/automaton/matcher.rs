//! Deterministic traversal of the grammar

use crate::automaton::{AutomatonStore, Label, StateId};

/// Why a sequence was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing to consume, so END was never reached
    Empty,
    /// No transition leaves `state` on `label` (the label at `position`)
    MissingTransition {
        position: usize,
        state: StateId,
        label: Label,
    },
    /// The whole sequence was consumed but the walk stopped short of END
    NotAtEnd { state: StateId },
}

/// Result of one walk through the grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Accepted,
    Rejected(Rejection),
}

impl MatchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MatchOutcome::Accepted)
    }
}

/// Walk state: labels still to consume and the current state
#[derive(Debug, Clone)]
pub struct Trace<'a> {
    remaining: &'a [Label],
    current: StateId,
}

impl<'a> Trace<'a> {
    pub fn new(labels: &'a [Label]) -> Self {
        Self::from_state(StateId::Start, labels)
    }

    pub fn from_state(current: StateId, labels: &'a [Label]) -> Self {
        Self {
            remaining: labels,
            current,
        }
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn remaining(&self) -> &'a [Label] {
        self.remaining
    }

    /// Consume one label. Returns `false` when no transition exists for it.
    pub fn step(&mut self, store: &AutomatonStore) -> bool {
        let Some((label, rest)) = self.remaining.split_first() else {
            return false;
        };
        match store.lookup(self.current, label) {
            Some(next) => {
                self.current = next;
                self.remaining = rest;
                true
            }
            None => false,
        }
    }

    /// Follow existing transitions as far as they go
    pub fn run(&mut self, store: &AutomatonStore) {
        while !self.remaining.is_empty() && self.step(store) {}
    }
}

/// Walk `labels` from START and report the outcome.
///
/// The first missing transition ends the walk; nothing after it is consumed.
pub fn trace(labels: &[Label], store: &AutomatonStore) -> MatchOutcome {
    if labels.is_empty() {
        return MatchOutcome::Rejected(Rejection::Empty);
    }

    let mut walk = Trace::new(labels);
    walk.run(store);

    if let Some(label) = walk.remaining().first() {
        return MatchOutcome::Rejected(Rejection::MissingTransition {
            position: labels.len() - walk.remaining().len(),
            state: walk.current(),
            label: label.clone(),
        });
    }

    if walk.current().is_end() {
        MatchOutcome::Accepted
    } else {
        MatchOutcome::Rejected(Rejection::NotAtEnd {
            state: walk.current(),
        })
    }
}

/// Whether the grammar accepts `labels`
pub fn accepts(labels: &[Label], store: &AutomatonStore) -> bool {
    trace(labels, store).is_accepted()
}
