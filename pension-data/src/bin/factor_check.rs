use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pension_data::AgeFactorLoader;
use tracing_subscriber::EnvFilter;

/// Check an age factor CSV file before using it for estimates.
///
/// The CSV file should have the following columns:
/// - age: The owner age (e.g., 65), or `max` for the overflow row
/// - life: Lifetime monthly payout per 100,000,000 of land value
/// - term5: 5-year term monthly payout per 100,000,000 of land value
/// - term10: 10-year term monthly payout per 100,000,000 of land value
/// - term15: 15-year term monthly payout per 100,000,000 of land value
#[derive(Parser, Debug)]
#[command(name = "pension-factor-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing age factor data
    #[arg(short, long)]
    file: PathBuf,

    /// Exit with an error when a factor decreases as age increases
    #[arg(short, long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn")))
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("Checking age factors in: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = AgeFactorLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let table = AgeFactorLoader::build(&records).context("Invalid age factor table")?;

    println!(
        "Ages {} to {} ({} rows) plus overflow row.",
        table.min_age(),
        table.max_age(),
        table.len()
    );

    let violations = table.monotonic_violations();
    for violation in &violations {
        println!(
            "  age {}: {} drops from {} to {}",
            violation.age, violation.kind, violation.previous, violation.current
        );
    }

    if violations.is_empty() {
        println!("Every factor is non-decreasing with age.");
    } else if args.strict {
        anyhow::bail!("{} factor(s) decrease with age", violations.len());
    } else {
        println!("{} factor(s) decrease with age.", violations.len());
    }

    Ok(())
}
