//! Run a meta-analysis on a CSV of study summaries
//!
//! ```text
//! cargo run --example run_meta_analysis -- <studies.csv> [config.json] [table.csv]
//! ```
//!
//! Set `RUST_LOG=meta_pooling=trace` to follow the fail-safe N search.

use anyhow::{Context, Result};
use meta_analysis::{io, MetaAnalysis, MetaAnalysisConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/studies.csv"));
    let config = match args.next() {
        Some(path) => MetaAnalysisConfig::from_json_file(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => MetaAnalysisConfig::default(),
    };
    let export = args.next();

    let records = io::read_records_from_path(&input)
        .with_context(|| format!("reading studies from {}", input.display()))?;
    tracing::info!(records = records.len(), method = %config.method, "loaded studies");

    let report = MetaAnalysis::new(config)?.run(&records)?;

    println!("{:<24} {:>9} {:>9} {:>9} {:>8}  Role", "Author", "d", "CI95inf", "CI95sup", "Weight");
    for row in &report.table {
        println!(
            "{:<24} {:>9.3} {:>9.3} {:>9.3} {:>8.2}  {}{}",
            row.author,
            row.d,
            row.ci_lower,
            row.ci_upper,
            row.weight,
            row.role,
            if row.pooled { "" } else { " (not pooled)" }
        );
    }

    println!();
    for (author, share) in report.weight_shares() {
        println!("{author:<24} {share:>6.2}%");
    }

    println!();
    println!("{}", report);

    if let Some(path) = export {
        io::write_study_table_to_path(&report.table, &path)
            .with_context(|| format!("writing study table to {path}"))?;
        tracing::info!(path = %path, "study table written");
    }

    Ok(())
}
