//! Grammar export
//!
//! Renders the transition list as a CLIPS rule program (the format consumed
//! by the out-of-process engine), as a Graphviz digraph, or as JSON.

use crate::automaton::{AutomatonStore, Label, StateId, Transition};
use crate::error::{Error, Result};
use clap::ValueEnum;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// CLIPS rule program
    #[default]
    Clips,
    /// DOT format (Graphviz)
    Dot,
    /// JSON transition list
    Json,
}

/// Name of the file the CLIPS program dribbles its output to
pub const CLIPS_OUTPUT_FILE: &str = "output.txt";

const CLIPS_RULES: &str = r#"(defrule apply_end_rule
  (rule ?prev ?first END)
  ?s <- (sentence ?prev ?first)
  =>
  (assert (sentence END))

  (retract ?s)
)

(defrule apply_rule
  (rule ?prev ?first ?next)
  ?s <- (sentence ?prev ?first $?rest)
  =>
  (assert (sentence ?next $?rest))

  (retract ?s)
)

(defrule success
  ?s <- (sentence END)
  =>
  (printout t "RESULT: SUCCESS" crlf)

  (retract ?s)
)

(defrule failure
  ?s <- (sentence $?)
  =>
  (printout t "RESULT: FAILURE" crlf)

  (retract ?s)
)
"#;

/// Render the CLIPS program, optionally asserting one sentence under test
pub fn to_clips(transitions: &[Transition], sentence: Option<&[Label]>) -> String {
    let mut out = String::from("(deffacts facts\n");
    for transition in transitions {
        out.push_str(&format!("  (rule {})\n", transition));
    }
    out.push_str(")\n\n");
    out.push_str(CLIPS_RULES);
    out.push_str("\n(reset)\n\n");

    if let Some(labels) = sentence {
        out.push_str("(assert (sentence START");
        for label in labels {
            out.push(' ');
            out.push_str(label.as_str());
        }
        out.push_str("))\n\n");
    }

    out.push_str(&format!("(dribble-on {})\n\n", CLIPS_OUTPUT_FILE));
    out.push_str("(run)\n\n(dribble-off)\n\n(exit)\n");
    out
}

/// Build a petgraph view of the grammar. Node weights are states, edge weights labels.
pub fn to_graph(store: &AutomatonStore) -> StableGraph<StateId, Label> {
    let mut graph = StableGraph::new();
    let mut nodes: HashMap<StateId, NodeIndex> = HashMap::new();

    for transition in store.export() {
        let from = *nodes
            .entry(transition.from)
            .or_insert_with(|| graph.add_node(transition.from));
        let to = *nodes
            .entry(transition.to)
            .or_insert_with(|| graph.add_node(transition.to));
        graph.add_edge(from, to, transition.label.clone());
    }

    graph
}

/// Export to DOT format for Graphviz
pub fn to_dot(store: &AutomatonStore) -> String {
    let graph = to_graph(store);

    let mut dot = "digraph Grammar {\n".to_string();
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=circle, style=filled];\n\n");

    for idx in graph.node_indices() {
        if let Some(state) = graph.node_weight(idx) {
            let shape = if state.is_end() { "doublecircle" } else { "circle" };
            dot.push_str(&format!(
                "  \"{}\" [shape={}, fillcolor=\"{}\"];\n",
                state,
                shape,
                state.color()
            ));
        }
    }

    dot.push('\n');

    for edge_idx in graph.edge_indices() {
        if let Some((from_idx, to_idx)) = graph.edge_endpoints(edge_idx)
            && let (Some(from), Some(to), Some(label)) = (
                graph.node_weight(from_idx),
                graph.node_weight(to_idx),
                graph.edge_weight(edge_idx),
            )
        {
            let label = label.as_str().replace('"', "\\\"");
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                from, to, label
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

#[derive(Serialize)]
struct JsonRule<'a> {
    from: String,
    label: &'a str,
    to: String,
}

/// Export the ordered transition list as JSON
pub fn to_json(store: &AutomatonStore) -> Result<String> {
    let rules: Vec<JsonRule<'_>> = store
        .export()
        .iter()
        .map(|t| JsonRule {
            from: t.from.to_string(),
            label: t.label.as_str(),
            to: t.to.to_string(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rules)?)
}

/// Render the grammar in the requested format
pub fn render(store: &AutomatonStore, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Clips => Ok(to_clips(store.export(), None)),
        ExportFormat::Dot => Ok(to_dot(store)),
        ExportFormat::Json => to_json(store),
    }
}

/// Overwrite `path` with the rendered grammar
pub fn write_to(store: &AutomatonStore, format: ExportFormat, path: &Path) -> Result<()> {
    let rendered = render(store, format)?;
    std::fs::write(path, rendered).map_err(|e| Error::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("Exported {} rules to {:?}", store.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::labels;

    #[test]
    fn test_clips_program_lists_rules_in_order() {
        let store = AutomatonStore::canonical();
        let program = to_clips(store.export(), None);

        let expected = concat!(
            "(deffacts facts\n",
            "  (rule START NNP 1)\n",
            "  (rule 1 VBZ 2)\n",
            "  (rule 2 JJ 3)\n",
            "  (rule 3 . END)\n",
            ")\n",
        );
        assert!(program.starts_with(expected));
        assert!(program.contains("(defrule apply_end_rule"));
        assert!(program.contains("(dribble-on output.txt)"));
        assert!(!program.contains("(assert (sentence"));
    }

    #[test]
    fn test_clips_program_with_sentence() {
        let store = AutomatonStore::canonical();
        let sentence = labels(["NNP", "VBZ", "."]);
        let program = to_clips(store.export(), Some(&sentence));

        assert!(program.contains("(assert (sentence START NNP VBZ .))"));
        let reset = program.find("(reset)").unwrap();
        let assertion = program.find("(assert (sentence START").unwrap();
        let run = program.find("(run)").unwrap();
        assert!(reset < assertion && assertion < run);
    }

    #[test]
    fn test_to_graph() {
        let graph = to_graph(&AutomatonStore::canonical());
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_to_dot_output() {
        let dot = to_dot(&AutomatonStore::canonical());
        assert!(dot.contains("digraph Grammar"));
        assert!(dot.contains("\"START\" -> \"1\" [label=\"NNP\"]"));
        assert!(dot.contains("\"END\" [shape=doublecircle"));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&AutomatonStore::canonical()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 4);
        assert_eq!(value[3]["from"], "3");
        assert_eq!(value[3]["label"], ".");
        assert_eq!(value[3]["to"], "END");
    }

    #[test]
    fn test_write_to_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.clp");
        std::fs::write(&path, "stale").unwrap();

        write_to(&AutomatonStore::canonical(), ExportFormat::Clips, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("(deffacts facts"));
    }

    #[test]
    fn test_write_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("commands.clp");
        let err = write_to(&AutomatonStore::canonical(), ExportFormat::Clips, &path).unwrap_err();
        assert!(err.is_fatal());
    }
}
