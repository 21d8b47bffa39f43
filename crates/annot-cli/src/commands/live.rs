//! Live command - edit patterns interactively with background re-extraction.
//!
//! Every pattern edit submits a fresh request to the extraction session;
//! the single-flight worker aborts the superseded run, so typing quickly
//! only ever costs one extraction.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;

use annot_core::{
    AnnotationType, ExtractError, ExtractionRequest, ExtractionSession, RunOutput, SessionObserver,
};

use super::extract::format_text;
use super::load_config;

/// Arguments for the live command.
#[derive(Args)]
pub struct LiveArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Annotation type definition (JSON)
    #[arg(short, long)]
    type_def: PathBuf,
}

struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_progress(&self, percent: u8) {
        eprint!("\r  extracting {:>3}%", percent);
        let _ = io::stderr().flush();
    }

    fn on_committed(&self, output: &RunOutput) {
        eprintln!();
        let truncated = if output.is_truncated() {
            format!(" (of {})", output.total_candidates)
        } else {
            String::new()
        };
        println!(
            "{} {} candidates{}, {} records ({}ms)",
            style("✓").green(),
            output.groups.len(),
            truncated,
            output.record_count(),
            output.processing_time_ms
        );
    }

    fn on_error(&self, error: &ExtractError) {
        eprintln!();
        eprintln!("{} {}", style("✗").red(), error);
    }
}

pub async fn run(args: LiveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut annotation = AnnotationType::from_file(&args.type_def)?;
    let text = fs::read_to_string(&args.input)?;

    println!(
        "{} Editing patterns for '{}' over {} ({} bytes)",
        style("ℹ").blue(),
        annotation.name,
        args.input.display(),
        text.len()
    );
    println!("  Commands: master <regex> | field <n> <regex> | run | show | quit");

    let session = ExtractionSession::new(Arc::new(ConsoleObserver));
    let preview = Some(config.extraction.max_preview_candidates);

    let submit = |annotation: &AnnotationType| {
        session.request(ExtractionRequest {
            text: text.clone(),
            annotation: annotation.clone(),
            preview_limit: preview,
        });
    };

    // Initial run with the definition as loaded.
    submit(&annotation);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            ("quit", _) | ("q", _) => break,
            ("run", _) => submit(&annotation),
            ("show", _) => match session.committed() {
                Some(output) => print!("{}", format_text(&output)),
                None => println!("{} No completed run yet", style("ℹ").blue()),
            },
            ("master", pattern) => {
                annotation.set_pattern(0, pattern);
                submit(&annotation);
            }
            ("field", rest) => match parse_field_edit(rest, annotation.fields.len()) {
                Ok((index, pattern)) => {
                    annotation.set_pattern(index, pattern);
                    submit(&annotation);
                }
                Err(message) => eprintln!("{} {}", style("✗").red(), message),
            },
            _ => {
                println!("  Commands: master <regex> | field <n> <regex> | run | show | quit");
            }
        }
    }

    session.shutdown();
    Ok(())
}

/// Parse `"<n> <regex>"` into a pattern-set index and pattern. `n` is the
/// 1-based field number, which is also its pattern-set slot.
fn parse_field_edit(rest: &str, field_count: usize) -> Result<(usize, &str), String> {
    let (number, pattern) = rest.split_once(' ').unwrap_or((rest, ""));
    let number: usize = number
        .parse()
        .map_err(|_| format!("not a field number: {number}"))?;

    if number == 0 || number > field_count {
        return Err(format!("field number out of range: 1..={field_count}"));
    }
    Ok((number, pattern))
}
