use clap::{Parser, Subcommand};
use lm_core::{LmError, Uncertainty};
use lm_data::DataError;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lm")]
#[command(about = "labmeasure - reduction of laboratory measurement data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a value with significant digits matched to its uncertainty
    Format {
        /// Measured value
        #[arg(allow_hyphen_values = true)]
        value: f64,
        /// Standard uncertainty of the value
        #[arg(short, long)]
        err: Option<f64>,
        /// Name printed before the value
        #[arg(short, long, default_value = "x")]
        name: String,
        /// Unit printed after the value
        #[arg(short, long, default_value = "")]
        unit: String,
        /// Rescale to an SI prefix (k, m, µ, ...)
        #[arg(long)]
        prefix: bool,
    },
    /// Mean, empirical standard deviation and standard deviation of the mean
    Stats {
        /// Sample readings
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<f64>,
        /// Name printed before the results
        #[arg(short, long, default_value = "x")]
        name: String,
    },
    /// Deviation of two values in units of their combined uncertainty
    Sigma {
        #[arg(allow_hyphen_values = true)]
        v1: f64,
        dv1: f64,
        #[arg(allow_hyphen_values = true)]
        v2: f64,
        #[arg(default_value_t = 0.0)]
        dv2: f64,
        /// Name printed before the deviation
        #[arg(short, long, default_value = "x")]
        name: String,
    },
    /// Evaluate a measurement sheet (YAML, or JSON by extension)
    Sheet {
        /// Path to the sheet file
        path: PathBuf,
        /// Print the fits as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Input(#[from] LmError),

    #[error("{0}")]
    Data(#[from] DataError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Format {
            value,
            err,
            name,
            unit,
            prefix,
        } => cmd_format(&name, value, err, &unit, prefix),
        Commands::Stats { values, name } => cmd_stats(&name, &values),
        Commands::Sigma {
            v1,
            dv1,
            v2,
            dv2,
            name,
        } => cmd_sigma(&name, v1, dv1, v2, dv2),
        Commands::Sheet { path, json } => cmd_sheet(&path, json),
    }
}

fn cmd_format(name: &str, value: f64, err: Option<f64>, unit: &str, prefix: bool) -> CliResult<()> {
    let uncertainty = match err {
        Some(e) => Uncertainty::known(e)?,
        None => Uncertainty::Absent,
    };
    println!(
        "{}",
        lm_format::format_value_unit(name, value, uncertainty, unit, prefix)
    );
    Ok(())
}

fn cmd_stats(name: &str, values: &[f64]) -> CliResult<()> {
    debug!(n = values.len(), "sample statistics");
    let mean = lm_stats::mean(values)?;
    println!("{}", lm_format::format_value(name, mean, Uncertainty::Absent));
    if values.len() >= 2 {
        let m = lm_stats::mean_measurement(values)?;
        let s = lm_stats::std_dev_empirical(values)?;
        println!("  n = {}", values.len());
        println!("  σ (empirical): {}", lm_format::general(s));
        println!("  σ (of mean):   {}", lm_format::general(m.sigma()));
        println!("{}", lm_format::format_measurement(name, &m));
    }
    Ok(())
}

fn cmd_sigma(name: &str, v1: f64, dv1: f64, v2: f64, dv2: f64) -> CliResult<()> {
    Uncertainty::known(dv1)?;
    Uncertainty::known(dv2)?;
    println!("{}", lm_stats::sigma_deviation(name, v1, dv1, v2, dv2));
    Ok(())
}

fn cmd_sheet(path: &Path, json: bool) -> CliResult<()> {
    let sheet = lm_data::load(path)?;
    let report = lm_data::evaluate_sheet(&sheet)?;
    debug!(
        fits = report.fits.len(),
        comparisons = report.comparisons.len(),
        "sheet evaluated"
    );
    if json {
        println!("{}", report.fits_json()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
