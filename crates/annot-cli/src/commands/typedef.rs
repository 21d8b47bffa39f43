//! Typedef command - create and check annotation type definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use annot_core::{AnnotationType, ExtractError, Field};

/// Arguments for the typedef command.
#[derive(Args)]
pub struct TypedefArgs {
    #[command(subcommand)]
    command: TypedefCommand,
}

#[derive(Subcommand)]
enum TypedefCommand {
    /// Create a new definition file
    New(NewArgs),

    /// Check a definition file for schema and pattern problems
    Check {
        /// Definition file (JSON)
        def: PathBuf,
    },
}

#[derive(Args)]
struct NewArgs {
    /// Type name
    name: String,

    /// Field descriptors (name, name:type, or name:type=default)
    #[arg(short, long = "field")]
    fields: Vec<String>,

    /// Master pattern
    #[arg(short, long)]
    master: Option<String>,

    /// Field patterns, aligned to --field order
    #[arg(short, long = "pattern")]
    patterns: Vec<String>,

    /// Output path (default: <name>.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: TypedefArgs) -> anyhow::Result<()> {
    match args.command {
        TypedefCommand::New(new_args) => new_definition(new_args),
        TypedefCommand::Check { def } => check_definition(&def),
    }
}

fn new_definition(args: NewArgs) -> anyhow::Result<()> {
    let mut annotation = AnnotationType::new(&args.name);

    for spec in &args.fields {
        annotation.fields.push(Field::parse(spec)?);
    }

    annotation
        .patterns
        .push(args.master.unwrap_or_default());
    annotation.patterns.extend(args.patterns.iter().cloned());

    if let Err(e) = annotation.validate() {
        anyhow::bail!("definition is invalid: {}", describe(&e, &annotation));
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", args.name)));

    if output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    annotation.save(&output)?;
    println!(
        "{} Wrote '{}' with {} fields to {}",
        style("✓").green(),
        annotation.name,
        annotation.fields.len(),
        output.display()
    );

    Ok(())
}

fn check_definition(path: &PathBuf) -> anyhow::Result<()> {
    let annotation = AnnotationType::from_file(path)?;

    if let Err(e) = annotation.validate() {
        anyhow::bail!("{}: {}", path.display(), describe(&e, &annotation));
    }

    let set = annotation
        .field_patterns()
        .iter()
        .take(annotation.fields.len())
        .filter(|p| !p.is_empty())
        .count();

    println!(
        "{} '{}' is valid: {} fields, master pattern {}, {} field patterns set",
        style("✓").green(),
        annotation.name,
        annotation.fields.len(),
        if annotation.master_pattern().is_empty() {
            "unset"
        } else {
            "set"
        },
        set
    );

    Ok(())
}

/// Point at the offending pattern by name rather than raw index.
fn describe(error: &ExtractError, annotation: &AnnotationType) -> String {
    match error {
        ExtractError::PatternSyntax { index: 0, message } => {
            format!("master pattern: {message}")
        }
        ExtractError::PatternSyntax { index, message } => {
            let field = annotation
                .fields
                .get(index - 1)
                .map(|f| f.name.as_str())
                .unwrap_or("?");
            format!("pattern for field '{field}' (index {index}): {message}")
        }
        other => other.to_string(),
    }
}
