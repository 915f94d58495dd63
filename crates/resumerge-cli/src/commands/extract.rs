//! Extract command - pull fields out of a single resume.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use resumerge_core::resume::normalize;
use resumerge_core::{load_source, Extraction, RulesetChoice, SourceContent};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Built-in ruleset to use instead of the configured one
    #[arg(short, long)]
    ruleset: Option<String>,

    /// List fields that could not be extracted
    #[arg(long)]
    show_missing: bool,
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

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(name) = &args.ruleset {
        config.extraction.ruleset = RulesetChoice::from_name(name)?;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let source = load_source(&args.input);
    let text = match source.content {
        SourceContent::Text(text) => text,
        SourceContent::DecodeFailed(reason) => {
            anyhow::bail!("Could not read {}: {}", source.id, reason)
        }
    };

    let extractor = config.extraction.extractor()?;
    let mut extraction = extractor.extract(&text);
    extraction.record = normalize(extraction.record);

    let output = format_extraction(&extraction, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_missing && !extraction.missing_fields.is_empty() {
        eprintln!();
        eprintln!("{}", style("Fields not found:").yellow());
        for miss in &extraction.missing_fields {
            eprintln!("  - {} ({})", miss.field, miss.reason);
        }
    }

    info!("Extraction took {}ms", extraction.processing_time_ms);

    Ok(())
}

fn format_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&extraction.record)?),
        OutputFormat::Csv => format_csv(extraction),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_csv(extraction: &Extraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(extraction.record.iter().map(|(field, _)| field.as_str()))?;
    wtr.write_record(extraction.record.iter().map(|(_, value)| value.unwrap_or("")))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &Extraction) -> String {
    let mut output = String::new();

    for (field, value) in extraction.record.iter() {
        match value {
            Some(value) if value.contains('\n') => {
                output.push_str(&format!("{}:\n", field));
                for line in value.lines() {
                    output.push_str(&format!("  {}\n", line));
                }
            }
            Some(value) => output.push_str(&format!("{}: {}\n", field, value)),
            None => output.push_str(&format!("{}: -\n", field)),
        }
    }

    output
}
