//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::session::Session;
use crate::{Config, Result, bail, cli::Cli};
use std::path::PathBuf;

/// A named piece of input text
struct Input {
    source: String,
    text: String,
}

/// Read every file, then the inline text, in that order
fn gather_inputs(files: &[PathBuf], text: Option<String>) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    for path in files {
        let text = std::fs::read_to_string(path)?;
        inputs.push(Input {
            source: path.display().to_string(),
            text,
        });
    }
    if let Some(text) = text {
        inputs.push(Input {
            source: "<text>".to_string(),
            text,
        });
    }
    if inputs.is_empty() {
        bail!("No input given: pass one or more files or --text");
    }
    Ok(inputs)
}

/// Learn each corpus file in order. Local errors are reported and skipped.
fn learn_files(session: &mut Session, files: &[PathBuf]) -> Result<bool> {
    let mut ok = true;
    for path in files {
        tracing::info!("Learning from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        match session.learn_text(&text) {
            Ok(summary) => tracing::info!("{:?}: {}", path, summary.render().trim_end()),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::error!("Failed to learn {:?}: {}", path, e);
                ok = false;
            }
        }
    }
    Ok(ok)
}

/// Learn command implementation
pub mod learn {
    use super::*;
    use crate::cli::{Commands, output};
    use crate::session::ExportTarget;

    /// Execute the learn command
    pub fn execute(args: Cli, config: Config) -> Result<bool> {
        let (files, text, export, format, output_format) = match args.command {
            Commands::Learn {
                files,
                text,
                export,
                format,
                output,
            } => (files, text, export, format, output),
            _ => unreachable!("learn::execute called with wrong command"),
        };

        let inputs = gather_inputs(&files, text)?;
        let mut session = Session::from_config(&config)?;

        if export.is_some() || format.is_some() {
            session.set_export(Some(ExportTarget {
                path: export.unwrap_or_else(|| config.export.path.clone()),
                format: format.unwrap_or(config.export.format),
            }));
        }

        let mut ok = true;
        for input in inputs {
            match session.learn_text(&input.text) {
                Ok(summary) => output::output_learn(
                    &mut std::io::stdout(),
                    &input.source,
                    &summary,
                    output_format,
                )?,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!("Failed to learn {}: {}", input.source, e);
                    ok = false;
                }
            }
        }

        tracing::info!("Grammar now has {} rules", session.store().len());
        Ok(ok)
    }
}

/// Test command implementation
pub mod test {
    use super::*;
    use crate::cli::{Commands, output};

    /// Execute the test command
    pub async fn execute(args: Cli, config: Config) -> Result<bool> {
        let (files, text, learn, output_format) = match args.command {
            Commands::Test {
                files,
                text,
                learn,
                output,
            } => (files, text, learn, output),
            _ => unreachable!("test::execute called with wrong command"),
        };

        let inputs = gather_inputs(&files, text)?;
        let mut session = Session::from_config(&config)?;
        let mut ok = learn_files(&mut session, &learn)?;

        for input in inputs {
            match session.test_text(&input.text).await {
                Ok(report) => {
                    ok &= report.all_passed();
                    output::output_report(
                        &mut std::io::stdout(),
                        &input.source,
                        &report,
                        output_format,
                    )?;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!("Failed to test {}: {}", input.source, e);
                    ok = false;
                }
            }
        }

        Ok(ok)
    }
}

/// Export command implementation
pub mod export {
    use super::*;
    use crate::automaton::{ExportFormat, export};

    /// Execute the export command
    pub fn execute(learn: Vec<PathBuf>, format: ExportFormat, config: Config) -> Result<bool> {
        let mut session = Session::from_config(&config)?;
        // Print only; leave the configured export file alone
        session.set_export(None);

        let ok = learn_files(&mut session, &learn)?;
        print!("{}", export::render(session.store(), format)?);
        Ok(ok)
    }
}

/// Interactive command implementation
pub mod interactive {
    use super::*;

    use crate::cli::interactive::{self, PlainInput, TerminalInput};
    use std::io::IsTerminal;

    /// Execute the interactive command
    pub async fn execute(config: Config) -> Result<bool> {
        let mut session = Session::from_config(&config)?;
        let mut stdout = std::io::stdout();

        if std::io::stdin().is_terminal() {
            let mut input = TerminalInput::new()?;
            interactive::run(&mut session, &mut input, &mut stdout).await?;
        } else {
            let mut input = PlainInput(std::io::stdin().lock());
            interactive::run(&mut session, &mut input, &mut stdout).await?;
        }
        Ok(true)
    }
}
