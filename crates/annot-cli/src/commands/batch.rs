//! Batch command - run one annotation type over many text files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use annot_core::{
    run_extraction, AnnotationType, CancelToken, ExtractionRequest, NullSink, RunOutcome, RunOutput,
};

use super::extract::{format_output, resolve_format, OutputFormat};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Annotation type definition (JSON)
    #[arg(short, long)]
    type_def: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    output: Option<RunOutput>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let format = resolve_format(args.format, &config);

    let annotation = AnnotationType::from_file(&args.type_def)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let cancel = CancelToken::new();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_file(&path, &annotation, &cancel) {
            Ok(output) => {
                results.push(FileResult {
                    path,
                    output: Some(output),
                    error: None,
                });
            }
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), message);
                    results.push(FileResult {
                        path,
                        output: None,
                        error: Some(message),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    // Write per-file outputs
    for result in &results {
        if let (Some(output), Some(output_dir)) = (&result.output, &args.output_dir) {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("annotations");

            let extension = match format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", stem, extension));
            fs::write(
                &output_path,
                format_output(output, format, config.output.pretty_json)?,
            )?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let succeeded = results.iter().filter(|r| r.output.is_some()).count();
    let failed = results.len() - succeeded;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(succeeded).green(),
        style(failed).red()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in results.iter().filter(|r| r.error.is_some()) {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(
    path: &PathBuf,
    annotation: &AnnotationType,
    cancel: &CancelToken,
) -> anyhow::Result<RunOutput> {
    let text = fs::read_to_string(path)?;

    // Batch extraction is a commit run: no preview truncation.
    let request = ExtractionRequest {
        text,
        annotation: annotation.clone(),
        preview_limit: None,
    };

    match run_extraction(&request, cancel, &NullSink)? {
        RunOutcome::Completed(output) => Ok(output),
        RunOutcome::Aborted => anyhow::bail!("extraction was cancelled"),
    }
}

fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "candidates",
        "records",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(output) = &result.output {
            wtr.write_record([
                filename,
                "success",
                &output.groups.len().to_string(),
                &output.record_count().to_string(),
                &output.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
