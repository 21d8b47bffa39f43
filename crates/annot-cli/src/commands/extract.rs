//! Extract command - run annotation extraction over a single text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use annot_core::{
    run_extraction, AnnotConfig, AnnotationType, CancelToken, ExtractionRequest, RunOutcome,
    RunOutput,
};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Annotation type definition (JSON)
    #[arg(short, long)]
    type_def: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Preview mode: cap candidates at the configured maximum
    #[arg(long)]
    preview: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Resolve the output format from the flag or the config default.
pub fn resolve_format(flag: Option<OutputFormat>, config: &AnnotConfig) -> OutputFormat {
    flag.unwrap_or_else(|| match config.output.default_format.as_str() {
        "csv" => OutputFormat::Csv,
        "text" => OutputFormat::Text,
        _ => OutputFormat::Json,
    })
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let annotation = AnnotationType::from_file(&args.type_def)?;
    let text = fs::read_to_string(&args.input)?;

    info!("Extracting from {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}%")
            .unwrap()
            .progress_chars("##-"),
    );

    let request = ExtractionRequest {
        text,
        annotation,
        preview_limit: args
            .preview
            .then_some(config.extraction.max_preview_candidates),
    };

    let progress = pb.clone();
    let outcome = run_extraction(&request, &CancelToken::new(), &move |percent: u8| {
        progress.set_position(u64::from(percent));
    })?;

    pb.finish_and_clear();

    let RunOutcome::Completed(output) = outcome else {
        anyhow::bail!("extraction was cancelled");
    };

    if output.is_truncated() {
        println!(
            "{} Showing {} of {} candidates (preview)",
            style("ℹ").blue(),
            output.groups.len(),
            output.total_candidates
        );
    }

    let format = resolve_format(args.format, &config);
    let rendered = format_output(&output, format, config.output.pretty_json)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    println!(
        "{} {} candidates, {} records in {}ms",
        style("✓").green(),
        output.groups.len(),
        output.record_count(),
        output.processing_time_ms
    );

    debug!("Total time: {:?}", start.elapsed());

    Ok(())
}

/// Render a run output in the requested format.
pub fn format_output(
    output: &RunOutput,
    format: OutputFormat,
    pretty_json: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty_json => Ok(serde_json::to_string_pretty(&output.groups)?),
        OutputFormat::Json => Ok(serde_json::to_string(&output.groups)?),
        OutputFormat::Csv => format_csv(output),
        OutputFormat::Text => Ok(format_text(output)),
    }
}

fn format_csv(output: &RunOutput) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Header: candidate column plus the field names in schema order.
    let mut header = vec!["candidate".to_string()];
    if let Some(group) = output.groups.iter().find(|g| !g.records.is_empty()) {
        header.extend(group.records[0].entries().iter().map(|e| e.name.clone()));
    }
    wtr.write_record(&header)?;

    for group in &output.groups {
        for record in &group.records {
            let mut row = vec![group.candidate.clone()];
            row.extend(record.entries().iter().map(|e| e.value.clone()));
            wtr.write_record(&row)?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Plain text rendering, also used by the live command's `show`.
pub fn format_text(output: &RunOutput) -> String {
    let mut out = String::new();

    for (i, group) in output.groups.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, group.candidate));
        for record in &group.records {
            let line = record
                .entries()
                .iter()
                .map(|e| format!("{}={}", e.name, e.value))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(&format!("    {}\n", line));
        }
    }

    out
}
