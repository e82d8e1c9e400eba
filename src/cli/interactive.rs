//! Menu-driven session
//!
//! Repeats: choose Learn / Test / Exit, choose Type / File, then run the
//! chosen pass on the text. Local errors are printed and the loop goes on.

use crate::session::Session;
use crate::{Error, Result};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Learn,
    Test,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputSource {
    Type,
    File,
}

const DEFAULT_INPUT_FILE: &str = "./input.txt";

/// Where the menu reads its answers from
pub trait LineSource {
    /// Show `prompt` and read one trimmed line. `None` on end of input.
    fn read_line(&mut self, prompt: &str, out: &mut impl Write) -> Result<Option<String>>;

    /// Whether `out` is a terminal that understands colours
    fn styled(&self) -> bool {
        false
    }
}

/// Buffered input without line editing, for pipes and redirected files
pub struct PlainInput<R>(pub R);

impl<R: BufRead> LineSource for PlainInput<R> {
    fn read_line(&mut self, prompt: &str, out: &mut impl Write) -> Result<Option<String>> {
        write!(out, "{}", prompt)?;
        out.flush()?;

        let mut line = String::new();
        if self.0.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Line editor with history for interactive terminals
pub struct TerminalInput {
    editor: DefaultEditor,
}

impl TerminalInput {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| Error::custom(format!("Could not open the terminal: {}", e)))?;
        Ok(Self { editor })
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str, out: &mut impl Write) -> Result<Option<String>> {
        out.flush()?;
        match self.editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(Error::custom(format!("Could not read input: {}", e))),
        }
    }

    fn styled(&self) -> bool {
        true
    }
}

/// Write one line, coloured when the output is a terminal
fn write_styled(out: &mut impl Write, styled: bool, color: Color, text: &str) -> Result<()> {
    if styled {
        queue!(out, SetForegroundColor(color), Print(text), ResetColor, Print("\n"))?;
    } else {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

/// Ask until the answer names one of `choices` (by number or name prefix)
fn prompt_choice<T: Copy>(
    input: &mut impl LineSource,
    out: &mut impl Write,
    message: &str,
    choices: &[(&str, T)],
) -> Result<Option<T>> {
    loop {
        write_styled(out, input.styled(), Color::Cyan, &format!("? {}", message))?;
        for (i, (name, _)) in choices.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, name)?;
        }

        let Some(answer) = input.read_line("> ", out)? else {
            return Ok(None);
        };
        let answer = answer.to_lowercase();

        let picked = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| choices.get(i))
            .or_else(|| {
                choices.iter().find(|(name, _)| {
                    !answer.is_empty() && name.to_lowercase().starts_with(&answer)
                })
            });

        match picked {
            Some((_, value)) => return Ok(Some(*value)),
            None => write_styled(
                out,
                input.styled(),
                Color::Yellow,
                "Please pick one of the listed options.",
            )?,
        }
    }
}

/// Ask for a line of text, falling back to `default` on an empty answer
fn prompt_text(
    input: &mut impl LineSource,
    out: &mut impl Write,
    message: &str,
    default: Option<&str>,
) -> Result<Option<String>> {
    let prompt = match default {
        Some(default) => format!("? {} ({}) ", message, default),
        None => format!("? {} ", message),
    };

    Ok(input.read_line(&prompt, out)?.map(|answer| match default {
        Some(default) if answer.is_empty() => default.to_string(),
        _ => answer,
    }))
}

/// Run the menu loop until Exit or end of input. Only fatal errors are returned.
pub async fn run(
    session: &mut Session,
    input: &mut impl LineSource,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        let action = prompt_choice(
            input,
            out,
            "What do you want to do?",
            &[
                ("Learn", Action::Learn),
                ("Test", Action::Test),
                ("Exit", Action::Exit),
            ],
        )?;
        let action = match action {
            Some(Action::Exit) | None => return Ok(()),
            Some(action) => action,
        };

        let Some(source) = prompt_choice(
            input,
            out,
            "How do you want to input the text?",
            &[("Type", InputSource::Type), ("File", InputSource::File)],
        )?
        else {
            return Ok(());
        };

        let text = match source {
            InputSource::Type => prompt_text(input, out, "Enter the text:", None)?,
            InputSource::File => {
                let Some(path) =
                    prompt_text(input, out, "Enter the file:", Some(DEFAULT_INPUT_FILE))?
                else {
                    return Ok(());
                };
                match std::fs::read_to_string(&path) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        let message = format!("Could not read {}: {}", path, e);
                        write_styled(out, input.styled(), Color::Red, &message)?;
                        continue;
                    }
                }
            }
        };
        let Some(text) = text else {
            return Ok(());
        };

        let result = match action {
            Action::Learn => session.learn_text(&text).map(|summary| summary.render()),
            Action::Test => session.test_text(&text).await.map(|report| report.render()),
            Action::Exit => unreachable!("exit handled above"),
        };

        match result {
            Ok(rendered) => write!(out, "{}", rendered)?,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => write_styled(out, input.styled(), Color::Red, &format!("Error: {}", e))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonStore;
    use crate::engine::InProcessEngine;
    use crate::tagger::PreTaggedReader;
    use std::io::Cursor;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(
            AutomatonStore::canonical(),
            Box::new(PreTaggedReader::new()),
            Arc::new(InProcessEngine),
        )
    }

    async fn run_script(session: &mut Session, script: &str) -> String {
        let mut input = PlainInput(Cursor::new(script.as_bytes().to_vec()));
        let mut out = Vec::new();
        run(session, &mut input, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_learn_then_test_by_typing() {
        let mut session = session();
        let out = run_script(
            &mut session,
            "1\n1\nJohn/NNP is/VBZ ./.\ntest\ntype\nJohn/NNP is/VBZ ./.\nexit\n",
        )
        .await;

        assert!(out.contains("Learned 1 of 1 sentences"));
        assert!(out.contains("Text successfully parsed!"));
        assert_eq!(session.store().len(), 5);
    }

    #[tokio::test]
    async fn test_reports_failures() {
        let mut session = session();
        let out = run_script(&mut session, "t\nt\nJohn/NNP is/VBZ ./.\n").await;
        assert!(out.contains("Failed to parse 1/1 sentences:\nJohn is .\n"));
    }

    #[tokio::test]
    async fn test_invalid_choice_reprompts() {
        let mut session = session();
        let out = run_script(&mut session, "9\nbogus\n3\n").await;
        assert_eq!(out.matches("Please pick one of the listed options.").count(), 2);
    }

    #[tokio::test]
    async fn test_local_errors_keep_loop_alive() {
        let mut session = session();
        let out = run_script(
            &mut session,
            "learn\nfile\n/nonexistent/input.txt\nlearn\ntype\nJohn/BOGUS\nexit\n",
        )
        .await;
        assert!(out.contains("Could not read /nonexistent/input.txt"));
        assert!(out.contains("Error: Tagging error"));
    }

    #[tokio::test]
    async fn test_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "Mary/NNP is/VBZ tall/JJ ./.").unwrap();

        let mut session = session();
        let script = format!("test\nfile\n{}\n", path.display());
        let out = run_script(&mut session, &script).await;
        assert!(out.contains("Text successfully parsed!"));
    }

    /// Scripted answers on an output that accepts colours
    struct StyledScript(PlainInput<Cursor<Vec<u8>>>);

    impl LineSource for StyledScript {
        fn read_line(&mut self, prompt: &str, out: &mut impl Write) -> Result<Option<String>> {
            self.0.read_line(prompt, out)
        }

        fn styled(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_plain_output_has_no_colour_codes() {
        let mut session = session();
        let out = run_script(&mut session, "learn\ntype\nJohn/BOGUS\nexit\n").await;
        assert!(out.contains("Error: Tagging error"));
        assert!(!out.contains('\x1b'));
    }

    #[tokio::test]
    async fn test_styled_output_colours_errors() {
        let mut session = session();
        let script = "learn\ntype\nJohn/BOGUS\nexit\n";
        let mut input = StyledScript(PlainInput(Cursor::new(script.as_bytes().to_vec())));
        let mut out = Vec::new();
        run(&mut session, &mut input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Error: Tagging error"));
        assert!(out.contains('\x1b'));
    }

    #[test]
    fn test_plain_input_echoes_prompt_and_trims() {
        let mut input = PlainInput(Cursor::new(b"  learn  \n".to_vec()));
        let mut out = Vec::new();
        let line = input.read_line("> ", &mut out).unwrap();
        assert_eq!(line.as_deref(), Some("learn"));
        assert_eq!(out, b"> ");
        assert_eq!(input.read_line("> ", &mut out).unwrap(), None);
    }
}
