//! Automaton module - the learned grammar, its traversal and its induction

pub mod export;
pub mod label;
pub mod learner;
pub mod matcher;
pub mod state;
pub mod store;
pub mod transition;

// Re-export key types
pub use export::ExportFormat;
pub use label::{Label, Vocabulary, labels};
pub use learner::extend;
pub use matcher::{MatchOutcome, Rejection, Trace, accepts, trace};
pub use state::StateId;
pub use store::{AutomatonStore, CANONICAL_SEED};
pub use transition::Transition;
