//! Append-only transition store

use crate::automaton::{Label, StateId, Transition};
use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap};

/// Canonical noun-verb-adjective-terminator pattern used when no seed is configured
pub const CANONICAL_SEED: &[&str] = &["START NNP 1", "1 VBZ 2", "2 JJ 3", "3 . END"];

/// The grammar: an ordered, append-only set of transitions.
///
/// Two indexes are kept in step with `transitions`:
/// - `index` answers `(from, label) -> to` lookups in O(1).
/// - `by_label` lists, in insertion order, every transition carrying a label.
///   The learner uses it to find existing branches for a lookahead label.
#[derive(Debug, Clone, Default)]
pub struct AutomatonStore {
    transitions: Vec<Transition>,
    index: HashMap<(StateId, Label), StateId>,
    by_label: HashMap<Label, Vec<usize>>,
    next_node: u64,
}

impl AutomatonStore {
    pub fn new() -> Self {
        Self {
            next_node: 1,
            ..Default::default()
        }
    }

    /// Store seeded with [`CANONICAL_SEED`]
    pub fn canonical() -> Self {
        let mut store = Self::new();
        for transition in [
            Transition::new(StateId::Start, "NNP", StateId::Node(1)),
            Transition::new(StateId::Node(1), "VBZ", StateId::Node(2)),
            Transition::new(StateId::Node(2), "JJ", StateId::Node(3)),
            Transition::new(StateId::Node(3), ".", StateId::End),
        ] {
            store.push(transition);
        }
        store
    }

    /// Build a store from rule strings such as `"START NNP 1"`
    pub fn from_rules<S: AsRef<str>>(rules: &[S]) -> Result<Self> {
        let transitions = rules
            .iter()
            .map(|r| r.as_ref().parse())
            .collect::<Result<Vec<Transition>>>()?;
        Self::with_seed(transitions)
    }

    pub fn with_seed(seed: impl IntoIterator<Item = Transition>) -> Result<Self> {
        let mut store = Self::new();
        store.append_all(seed.into_iter().collect())?;
        Ok(store)
    }

    /// Target of the transition leaving `from` on `label`, if any
    pub fn lookup(&self, from: StateId, label: &Label) -> Option<StateId> {
        self.index.get(&(from, label.clone())).copied()
    }

    /// Append one transition.
    ///
    /// Returns `Ok(false)` when the identical transition is already present.
    /// A different target for an existing `(from, label)` is an `AutomatonConflict`.
    pub fn append(&mut self, transition: Transition) -> Result<bool> {
        if self.check(&transition)? {
            return Ok(false);
        }
        self.push(transition);
        Ok(true)
    }

    /// Append a batch atomically: either every transition is added or none is.
    ///
    /// Returns the number of transitions actually added.
    pub fn append_all(&mut self, batch: Vec<Transition>) -> Result<usize> {
        let mut staged: HashMap<(StateId, Label), StateId> = HashMap::new();
        let mut fresh = Vec::with_capacity(batch.len());

        for transition in batch {
            if self.check(&transition)? {
                continue;
            }
            let key = (transition.from, transition.label.clone());
            match staged.get(&key) {
                Some(&existing) if existing == transition.to => continue,
                Some(&existing) => {
                    return Err(Error::AutomatonConflict {
                        from: transition.from,
                        label: transition.label,
                        existing,
                        attempted: transition.to,
                    });
                }
                None => {
                    staged.insert(key, transition.to);
                    fresh.push(transition);
                }
            }
        }

        let added = fresh.len();
        for transition in fresh {
            self.push(transition);
        }
        Ok(added)
    }

    /// Validate a transition against the store. `Ok(true)` means it is already present.
    fn check(&self, transition: &Transition) -> Result<bool> {
        if [transition.from, transition.to]
            .iter()
            .any(|s| s.node_number() == Some(u64::MAX))
        {
            return Err(Error::invalid_rule(format!(
                "state number out of range: '{}'",
                transition
            )));
        }
        if transition.from.is_end() {
            return Err(Error::invalid_rule(format!(
                "END cannot have outgoing transitions: '{}'",
                transition
            )));
        }
        match self.lookup(transition.from, &transition.label) {
            Some(existing) if existing == transition.to => Ok(true),
            Some(existing) => Err(Error::AutomatonConflict {
                from: transition.from,
                label: transition.label.clone(),
                existing,
                attempted: transition.to,
            }),
            None => Ok(false),
        }
    }

    /// Record a transition that has already passed `check`
    fn push(&mut self, transition: Transition) {
        for state in [transition.from, transition.to] {
            if let Some(n) = state.node_number() {
                self.next_node = self.next_node.max(n + 1);
            }
        }

        let position = self.transitions.len();
        self.index
            .insert((transition.from, transition.label.clone()), transition.to);
        self.by_label
            .entry(transition.label.clone())
            .or_default()
            .push(position);
        self.transitions.push(transition);
    }

    /// Transitions carrying `label`, in insertion order
    pub fn transitions_with_label<'a>(
        &'a self,
        label: &Label,
    ) -> impl Iterator<Item = &'a Transition> + use<'a> {
        self.by_label
            .get(label)
            .into_iter()
            .flatten()
            .map(move |&i| &self.transitions[i])
    }

    /// All transitions in insertion order
    pub fn export(&self) -> &[Transition] {
        &self.transitions
    }

    /// Smallest intermediate state number that has never been used
    pub fn next_node(&self) -> u64 {
        self.next_node
    }

    /// Every state mentioned by some transition
    pub fn states(&self) -> BTreeSet<StateId> {
        self.transitions
            .iter()
            .flat_map(|t| [t.from, t.to])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
