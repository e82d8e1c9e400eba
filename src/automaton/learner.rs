//! Grammar induction
//!
//! Extends the store with the transitions needed to accept a rejected label
//! sequence, reusing existing states where the remaining labels can still be
//! completed from them. The reuse rule is a heuristic: the resulting automaton
//! is deterministic but not minimal.

use crate::automaton::matcher::Trace;
use crate::automaton::{AutomatonStore, Label, StateId, Transition};
use crate::error::{Error, Result};

/// Pending transitions layered over a read-only store
struct Draft<'a> {
    base: &'a AutomatonStore,
    pending: AutomatonStore,
    next_node: u64,
}

impl<'a> Draft<'a> {
    fn new(base: &'a AutomatonStore) -> Self {
        Self {
            base,
            pending: AutomatonStore::new(),
            next_node: base.next_node(),
        }
    }

    fn lookup(&self, from: StateId, label: &Label) -> Option<StateId> {
        self.base
            .lookup(from, label)
            .or_else(|| self.pending.lookup(from, label))
    }

    fn allocate(&mut self) -> Result<StateId> {
        let id = StateId::Node(self.next_node);
        self.next_node = self.next_node.checked_add(1).ok_or_else(|| {
            Error::invalid_rule(format!("no state id left after {}", self.next_node))
        })?;
        Ok(id)
    }

    fn add(&mut self, transition: Transition) -> Result<()> {
        self.pending.append(transition).map(|_| ())
    }

    /// Follow transitions of the store and of `pending` from `state` over `labels`.
    ///
    /// Returns the state reached and how many labels were consumed.
    fn walk(
        &self,
        pending: &AutomatonStore,
        state: StateId,
        labels: &[Label],
    ) -> (StateId, usize) {
        let mut walk = Trace::from_state(state, labels);
        loop {
            let Some(label) = walk.remaining().first() else {
                break;
            };
            if walk.step(self.base) {
                continue;
            }
            match pending.lookup(walk.current(), label) {
                Some(next) => walk = Trace::from_state(next, &walk.remaining()[1..]),
                None => break,
            }
        }
        (walk.current(), labels.len() - walk.remaining().len())
    }

    /// Whether adding `edge` lets its target take over `suffix`.
    ///
    /// The walk runs with `edge` already in place, since the suffix may loop
    /// back through it. The target is usable if the walk ends exactly at END,
    /// or stops at a non-final state where the missing transitions can still
    /// be added.
    fn is_compatible(&self, edge: &Transition, suffix: &[Label]) -> bool {
        let mut trial = self.pending.clone();
        if trial.append(edge.clone()).is_err() {
            return false;
        }
        let (reached, consumed) = self.walk(&trial, edge.to, suffix);
        if consumed == suffix.len() {
            reached.is_end()
        } else {
            !reached.is_end()
        }
    }

    /// First state, in insertion order, that already branches on `suffix[0]`
    /// and stays compatible with the whole suffix once `from -label->` leads to it.
    fn find_reusable(&self, from: StateId, label: &Label, suffix: &[Label]) -> Option<StateId> {
        let lookahead = suffix.first()?;
        self.base
            .transitions_with_label(lookahead)
            .chain(self.pending.transitions_with_label(lookahead))
            .map(|t| t.from)
            .find(|&candidate| {
                self.is_compatible(&Transition::new(from, label.clone(), candidate), suffix)
            })
    }
}

/// Extend `store` so that it accepts `labels`.
///
/// Returns the transitions that were added, in insertion order. An already
/// accepted sequence adds nothing. On error the store is left unchanged.
pub fn extend(labels: &[Label], store: &mut AutomatonStore) -> Result<Vec<Transition>> {
    if labels.is_empty() {
        return Err(Error::EmptySequence);
    }

    let mut draft = Draft::new(store);
    let mut prev = StateId::Start;
    let last = labels.len() - 1;

    for (i, label) in labels.iter().enumerate() {
        let next = match draft.lookup(prev, label) {
            Some(existing) if i == last && !existing.is_end() => {
                return Err(Error::AutomatonConflict {
                    from: prev,
                    label: label.clone(),
                    existing,
                    attempted: StateId::End,
                });
            }
            Some(StateId::End) if i < last => {
                return Err(Error::AutomatonConflict {
                    from: prev,
                    label: label.clone(),
                    existing: StateId::End,
                    attempted: StateId::Node(draft.next_node),
                });
            }
            Some(existing) => existing,
            None => {
                let next = if i == last {
                    StateId::End
                } else if let Some(reused) = draft.find_reusable(prev, label, &labels[i + 1..]) {
                    tracing::debug!("Reusing state {} for '{}' after {}", reused, label, prev);
                    reused
                } else {
                    draft.allocate()?
                };
                draft.add(Transition::new(prev, label.clone(), next))?;
                next
            }
        };
        prev = next;
    }

    let added = draft.pending.export().to_vec();
    store.append_all(added.clone())?;
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{accepts, labels};

    fn rules(store: &AutomatonStore) -> Vec<String> {
        store.export().iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_accepted_sequence_adds_nothing() {
        let mut store = AutomatonStore::canonical();
        let added = extend(&labels(["NNP", "VBZ", "JJ", "."]), &mut store).unwrap();
        assert!(added.is_empty());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_missing_adjective_adds_one_transition() {
        let mut store = AutomatonStore::canonical();
        let seq = labels(["NNP", "VBZ", "."]);
        assert!(!accepts(&seq, &store));

        let added = extend(&seq, &mut store).unwrap();
        assert_eq!(added, vec![Transition::new(StateId::Node(2), ".", StateId::End)]);
        assert!(accepts(&seq, &store));
        assert!(accepts(&labels(["NNP", "VBZ", "JJ", "."]), &store));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_reuses_downstream_state() {
        let mut store = AutomatonStore::canonical();
        let seq = labels(["DT", "NN", "VBZ", "JJ", "."]);
        extend(&seq, &mut store).unwrap();

        assert_eq!(
            rules(&store)[4..],
            ["START DT 4".to_string(), "4 NN 1".to_string()]
        );
        assert!(accepts(&seq, &store));
    }

    #[test]
    fn test_reuse_may_generalize_with_loop() {
        let mut store = AutomatonStore::canonical();
        extend(&labels(["NNP", "VBZ", "RB", "JJ", "."]), &mut store).unwrap();

        assert_eq!(rules(&store).last().unwrap(), "2 RB 2");
        assert!(accepts(&labels(["NNP", "VBZ", "RB", "RB", "JJ", "."]), &store));
    }

    #[test]
    fn test_reuses_partially_compatible_state() {
        let mut store = AutomatonStore::from_rules(&["START DT 1", "1 NN 2", "2 . END"]).unwrap();
        let seq = labels(["PRP", "NN", "MD"]);
        extend(&seq, &mut store).unwrap();

        assert_eq!(rules(&store)[3..], ["START PRP 1".to_string(), "2 MD END".to_string()]);
        assert!(accepts(&seq, &store));
    }

    #[test]
    fn test_skips_incompatible_state_and_allocates() {
        let mut store = AutomatonStore::from_rules(&["START DT 1", "1 NN END"]).unwrap();
        let seq = labels(["PRP", "NN", "VBZ", "."]);
        let added = extend(&seq, &mut store).unwrap();

        let added: Vec<String> = added.iter().map(|t| t.to_string()).collect();
        assert_eq!(added, ["START PRP 2", "2 NN 3", "3 VBZ 4", "4 . END"]);
        assert_eq!(store.next_node(), 5);
        assert!(accepts(&seq, &store));
    }

    #[test]
    fn test_rejects_reuse_that_loops_back_through_new_edge() {
        let mut store = AutomatonStore::canonical();
        let seq = labels(["NNP", "VBZ", "DT", "VBZ", "DT"]);
        let added = extend(&seq, &mut store).unwrap();

        let added: Vec<String> = added.iter().map(|t| t.to_string()).collect();
        assert_eq!(added, ["2 DT 4", "4 VBZ 5", "5 DT END"]);
        assert!(accepts(&seq, &store));
        assert!(accepts(&labels(["NNP", "VBZ", "JJ", "."]), &store));
    }

    #[test]
    fn test_reuse_checked_with_pending_edges() {
        let mut store =
            AutomatonStore::from_rules(&["START x 1", "1 y END", "START z 2", "2 y END"]).unwrap();
        let seq = labels(["x", "L", "x", "L", "z"]);
        let added = extend(&seq, &mut store).unwrap();

        let added: Vec<String> = added.iter().map(|t| t.to_string()).collect();
        assert_eq!(added, ["1 L 3", "3 x 1", "3 z END"]);
        assert!(accepts(&seq, &store));
        assert!(accepts(&labels(["z", "y"]), &store));
    }

    #[test]
    fn test_state_numbers_exhausted() {
        let max = format!("START DT {}", u64::MAX - 1);
        let mut store = AutomatonStore::from_rules(&[max.as_str()]).unwrap();
        let err = extend(&labels(["PRP", "NN", "."]), &mut store).unwrap_err();
        assert!(matches!(err, Error::InvalidRule(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_conflict_on_prefix_leaves_store_unchanged() {
        let mut store = AutomatonStore::canonical();
        let err = extend(&labels(["NNP"]), &mut store).unwrap_err();
        assert!(matches!(
            err,
            Error::AutomatonConflict {
                existing: StateId::Node(1),
                attempted: StateId::End,
                ..
            }
        ));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_conflict_past_end_leaves_store_unchanged() {
        let mut store = AutomatonStore::canonical();
        let before = store.next_node();
        let err = extend(&labels(["NNP", "VBZ", "JJ", ".", "NN", "."]), &mut store).unwrap_err();
        assert!(matches!(
            err,
            Error::AutomatonConflict {
                existing: StateId::End,
                ..
            }
        ));
        assert_eq!(store.len(), 4);
        assert_eq!(store.next_node(), before);
    }

    #[test]
    fn test_empty_sequence_cannot_be_learned() {
        let mut store = AutomatonStore::canonical();
        assert!(matches!(
            extend(&[], &mut store),
            Err(Error::EmptySequence)
        ));
    }

    #[test]
    fn test_learns_into_empty_store() {
        let mut store = AutomatonStore::new();
        let seq = labels(["PRP", "VBD", "."]);
        let added = extend(&seq, &mut store).unwrap();
        let added: Vec<String> = added.iter().map(|t| t.to_string()).collect();
        assert_eq!(added, ["START PRP 1", "1 VBD 2", "2 . END"]);
        assert!(accepts(&seq, &store));
    }
}
