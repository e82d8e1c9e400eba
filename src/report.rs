//! Aggregation of per-sentence verdicts into a session summary

use crate::engine::Verdict;
use serde::Serialize;

/// Outcome of evaluating one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum SentenceOutcome {
    Success,
    Failure,
    /// The engine could not produce a verdict
    Error(String),
}

impl From<Verdict> for SentenceOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Success => SentenceOutcome::Success,
            Verdict::Failure => SentenceOutcome::Failure,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceResult {
    pub text: String,
    pub outcome: SentenceOutcome,
}

/// Summary of a test pass, in input order
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub results: Vec<SentenceResult>,
}

impl SessionReport {
    /// `results` must already be in original input order
    pub fn new(results: Vec<(String, SentenceOutcome)>) -> Self {
        Self {
            results: results
                .into_iter()
                .map(|(text, outcome)| SentenceResult { text, outcome })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True only when every sentence succeeded
    pub fn all_passed(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.outcome == SentenceOutcome::Success)
    }

    /// Sentences rejected by the grammar, in input order
    pub fn failures(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.outcome == SentenceOutcome::Failure)
            .map(|r| r.text.as_str())
            .collect()
    }

    /// Sentences the engine could not evaluate, with the reason
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                SentenceOutcome::Error(reason) => Some((r.text.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Human-readable summary
    pub fn render(&self) -> String {
        if self.all_passed() {
            return "Text successfully parsed!\n".to_string();
        }

        let mut out = String::from("Text parsing failed.\n");

        let failures = self.failures();
        if !failures.is_empty() {
            out.push_str(&format!(
                "Failed to parse {}/{} sentences:\n",
                failures.len(),
                self.total()
            ));
            for text in failures {
                out.push_str(text);
                out.push('\n');
            }
        }

        let errors = self.errors();
        if !errors.is_empty() {
            out.push_str(&format!(
                "Could not evaluate {}/{} sentences:\n",
                errors.len(),
                self.total()
            ));
            for (text, reason) in errors {
                out.push_str(&format!("{} ({})\n", text, reason));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: &[(&str, SentenceOutcome)]) -> SessionReport {
        SessionReport::new(
            outcomes
                .iter()
                .map(|(t, o)| (t.to_string(), o.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_all_passed() {
        let r = report(&[
            ("John is happy .", SentenceOutcome::Success),
            ("Mary is tall .", SentenceOutcome::Success),
        ]);
        assert!(r.all_passed());
        assert_eq!(r.render(), "Text successfully parsed!\n");
    }

    #[test]
    fn test_one_failure_of_three() {
        let r = report(&[
            ("John is happy .", SentenceOutcome::Success),
            ("John is .", SentenceOutcome::Failure),
            ("Mary is tall .", SentenceOutcome::Success),
        ]);
        assert!(!r.all_passed());
        assert_eq!(r.failures(), vec!["John is ."]);
        assert_eq!(
            r.render(),
            "Text parsing failed.\nFailed to parse 1/3 sentences:\nJohn is .\n"
        );
    }

    #[test]
    fn test_failures_keep_input_order() {
        let r = report(&[
            ("b", SentenceOutcome::Failure),
            ("a", SentenceOutcome::Success),
            ("c", SentenceOutcome::Failure),
        ]);
        assert_eq!(r.failures(), vec!["b", "c"]);
    }

    #[test]
    fn test_errors_are_not_failures() {
        let r = report(&[
            ("John is happy .", SentenceOutcome::Success),
            ("Mary sings .", SentenceOutcome::Error("timed out".into())),
        ]);
        assert!(!r.all_passed());
        assert!(r.failures().is_empty());
        assert_eq!(r.errors(), vec![("Mary sings .", "timed out")]);

        let rendered = r.render();
        assert!(!rendered.contains("Failed to parse"));
        assert!(rendered.contains("Could not evaluate 1/2 sentences:\nMary sings . (timed out)\n"));
    }

    #[test]
    fn test_json_shape() {
        let r = report(&[("x", SentenceOutcome::Error("boom".into()))]);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["results"][0]["outcome"]["status"], "error");
        assert_eq!(value["results"][0]["outcome"]["detail"], "boom");
    }
}
