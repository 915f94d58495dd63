//! Update command - process resumes and append new ones to the sheet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use resumerge_core::{
    load_source, Pipeline, RecordStore, ResumergeConfig, RulesetChoice, RunOutcome, Source,
};

use super::config::load_config;

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Resume files, folders or glob patterns
    inputs: Vec<String>,

    /// Sheet to update (default from config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Built-in ruleset to use instead of the configured one
    #[arg(short, long)]
    ruleset: Option<String>,

    /// Write a per-file CSV report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Show what would be added without writing the sheet
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: UpdateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(name) = &args.ruleset {
        config.extraction.ruleset = RulesetChoice::from_name(name)?;
    }
    if let Some(store) = &args.store {
        config.store.path = store.clone();
    }

    let files = collect_inputs(&args.inputs, &config)?;
    let Some(outcome) = apply(&files, &config, args.dry_run)? else {
        return Ok(());
    };

    if let Some(report_path) = &args.report {
        write_report(report_path, &outcome)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    Ok(())
}

/// Resolve command-line inputs into resume files.
///
/// Folders are scanned one level deep for accepted extensions, in name order.
/// Inputs with glob characters are expanded. Any other path that does not
/// exist is kept so it is reported as a failed file.
pub fn collect_inputs(inputs: &[String], config: &ResumergeConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && config.input.accepts(p))
                .collect();
            found.sort();
            debug!("Selected {} files from folder {}", found.len(), path.display());
            files.extend(found);
        } else if path.is_file() || !is_pattern(input) {
            files.push(path.to_path_buf());
        } else {
            let matched: Vec<PathBuf> = glob(input)?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file() && config.input.accepts(p))
                .collect();
            if matched.is_empty() {
                warn!("No files match {}", input);
            }
            files.extend(matched);
        }
    }

    Ok(files)
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Run the pipeline over `files` and print the outcome.
///
/// Returns `None` when there was nothing to process.
pub fn apply(
    files: &[PathBuf],
    config: &ResumergeConfig,
    dry_run: bool,
) -> anyhow::Result<Option<RunOutcome>> {
    if files.is_empty() {
        println!("{} No resumes uploaded.", style("ℹ").blue());
        return Ok(None);
    }

    let start = Instant::now();
    let store = config.store.open()?;
    let pipeline = Pipeline::from_config(config)?;

    // A broken sheet fails the run before any file is decoded
    let existing = store.load()?.map_or(0, |records| records.len());
    debug!("{} records already in {}", existing, store.path().display());

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let sources: Vec<Source> = files
        .iter()
        .map(|path| {
            let source = load_source(path);
            pb.inc(1);
            source
        })
        .collect();
    pb.finish_and_clear();

    let outcome = if dry_run {
        pipeline.preview(&store, sources)?
    } else {
        pipeline.run(&store, sources)?
    };

    print_outcome(&outcome, store.path(), dry_run);
    debug!("Update took {:?}", start.elapsed());

    Ok(Some(outcome))
}

fn print_outcome(outcome: &RunOutcome, store_path: &Path, dry_run: bool) {
    println!();
    if dry_run {
        println!(
            "{} Dry run: {} ({} not written)",
            style("ℹ").blue(),
            outcome.summary,
            store_path.display()
        );
    } else {
        println!("{} {}", style("✓").green(), outcome.status_line());
        println!(
            "   {} records in {}",
            outcome.collection.len(),
            store_path.display()
        );
    }

    if !outcome.report.duplicates.is_empty() {
        println!();
        println!("{}", style("Already processed:").yellow());
        for dup in &outcome.report.duplicates {
            println!("  - {} ({})", dup.source_id, dup.key);
        }
    }

    if !outcome.report.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &outcome.report.failures {
            println!("  - {}: {}", failure.source_id, failure.reason);
        }
    }
}

fn write_report(path: &Path, outcome: &RunOutcome) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let processed_at = Local::now().to_rfc3339();

    wtr.write_record(["processed_at", "source", "status", "detail"])?;

    for id in &outcome.report.accepted {
        wtr.write_record([processed_at.as_str(), id.as_str(), "added", ""])?;
    }
    for dup in &outcome.report.duplicates {
        wtr.write_record([
            processed_at.as_str(),
            dup.source_id.as_str(),
            "duplicate",
            dup.key.as_str(),
        ])?;
    }
    for failure in &outcome.report.failures {
        wtr.write_record([
            processed_at.as_str(),
            failure.source_id.as_str(),
            "failed",
            failure.reason.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
