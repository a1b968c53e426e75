use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error, info};

use pension_cli::config::AppConfig;
use pension_cli::{app, csv_loader, logging, render, utils};
use pension_core::ValuationMethod;
use pension_core::intake::EstimationRequest;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Farmland pension payout estimator.
///
/// Estimates the monthly lifetime and fixed-term payouts for a farmland
/// pension from the owner's age and the declared land value.
#[derive(Debug, Parser)]
#[command(name = "farmland-pension", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Age factor CSV to use instead of the built-in table.
    /// Overrides `tables.factors` from the config file.
    #[arg(long, global = true)]
    factors: Option<PathBuf>,

    /// Log filter, e.g. `info` or `pension_core=debug`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate payouts for a single owner.
    Estimate {
        /// Owner's date of birth (YYYY-MM-DD).
        #[arg(long)]
        birth_date: Option<NaiveDate>,

        /// Declared land value, e.g. "500,000,000".
        #[arg(long)]
        land_value: Option<String>,

        /// How the land value was obtained.
        #[arg(long, value_enum, default_value_t = CliValuationMethod::Public)]
        method: CliValuationMethod,

        /// Elect the spouse-succession (survivor) option.
        #[arg(long)]
        survivor: bool,

        /// Spouse's date of birth (YYYY-MM-DD). Required with --survivor.
        #[arg(long)]
        spouse_birth_date: Option<NaiveDate>,

        /// Date ages are computed against. Defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Estimate payouts for every applicant in a CSV file.
    Batch {
        /// Applicant CSV file.
        #[arg(long)]
        file: PathBuf,

        /// Write results here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Date ages are computed against. Defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print the active age factor table.
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliValuationMethod {
    Public,
    Appraised,
}

impl From<CliValuationMethod> for ValuationMethod {
    fn from(method: CliValuationMethod) -> Self {
        match method {
            CliValuationMethod::Public => ValuationMethod::Public,
            CliValuationMethod::Appraised => ValuationMethod::Appraised,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    if let Some(level) = cli.log_level.as_deref().or(config.logging.level.as_deref()) {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }

    let result = run(cli, config);
    if let Err(e) = &result {
        error!("command failed: {e:#}");
    }
    logging::disable_file_logging();

    result
}

fn run(
    cli: Cli,
    config: AppConfig,
) -> Result<()> {
    let factors_path = cli.factors.as_deref().or(config.tables.factors.as_deref());
    let table = app::load_factor_table(factors_path).context("Failed to load age factor table")?;
    let estimator =
        app::build_estimator(&table, config.estimator).context("Invalid estimator settings")?;
    debug!(?estimator, "estimator ready");

    match cli.command {
        Command::Estimate {
            birth_date,
            land_value,
            method,
            survivor,
            spouse_birth_date,
            today,
        } => {
            let land_value = match land_value.as_deref() {
                Some(text) => utils::parse_land_value(text)?,
                None => None,
            };
            let request = EstimationRequest {
                owner_birth_date: birth_date,
                land_value,
                valuation_method: method.into(),
                has_survivor_election: survivor,
                spouse_birth_date,
            };
            let today = today.unwrap_or_else(|| Local::now().date_naive());

            let report = app::estimate_request(&estimator, &request, today)?;
            print!("{}", render::render_report(&report));
        }
        Command::Batch {
            file,
            output,
            today,
        } => {
            let requests = csv_loader::load_from_file(&file)
                .with_context(|| format!("Failed to load applicants: {}", file.display()))?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());

            let rows = app::estimate_batch(&estimator, &requests, today);

            match output {
                Some(path) => {
                    let out = File::create(&path)
                        .with_context(|| format!("Failed to create: {}", path.display()))?;
                    app::write_batch_csv(out, &rows)?;
                    info!(path = %path.display(), "batch results written");
                }
                None => app::write_batch_csv(io::stdout().lock(), &rows)?,
            }
        }
        Command::Table => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(render::render_table(estimator.table()).as_bytes())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn estimate_flags_parse() {
        let cli = Cli::try_parse_from([
            "farmland-pension",
            "estimate",
            "--birth-date",
            "1960-03-14",
            "--land-value",
            "500,000,000",
            "--method",
            "appraised",
            "--survivor",
            "--spouse-birth-date",
            "1962-07-01",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Estimate {
                birth_date,
                land_value,
                method,
                survivor,
                ..
            } => {
                assert_eq!(birth_date, NaiveDate::from_ymd_opt(1960, 3, 14));
                assert_eq!(land_value.as_deref(), Some("500,000,000"));
                assert_eq!(ValuationMethod::from(method), ValuationMethod::Appraised);
                assert!(survivor);
            }
            other => panic!("expected estimate, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_file() {
        assert!(Cli::try_parse_from(["farmland-pension", "batch"]).is_err());
    }
}
