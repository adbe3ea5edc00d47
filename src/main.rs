//! `xtalval` command-line interface.
//!
//! ```bash
//! xtalval board.toml --thresholds strict.toml --precision 2
//! xtalval board.toml --json
//! xtalval --schema
//! ```
//!
//! Exit status is 0 on PASS, 1 on FAIL and 2 when the input cannot be
//! validated at all.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use xtalval::format::DEFAULT_PRECISION;
use xtalval::input::InputFile;
use xtalval::report::Report;
use xtalval::schema::ParameterGroup;
use xtalval::{get_schema, Thresholds, Validator};

#[derive(Parser, Debug)]
#[command(name = "xtalval")]
#[command(about = "Validate a crystal oscillator circuit against its datasheet limits")]
#[command(version)]
struct Cli {
    /// TOML file with the crystal, circuit and measurement parameters
    #[arg(value_name = "INPUT", required_unless_present = "schema")]
    input: Option<PathBuf>,

    /// TOML file overriding the classification thresholds
    #[arg(short, long, value_name = "FILE")]
    thresholds: Option<PathBuf>,

    /// Decimal places in the text report
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: usize,

    /// Print the outcome as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Print the parameter catalog and exit
    #[arg(long)]
    schema: bool,

    /// Log every normalized parameter and derived value
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if cli.schema {
        print_schema(cli.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    let thresholds = match &cli.thresholds {
        Some(path) => Thresholds::from_path(path)
            .with_context(|| format!("loading thresholds from {}", path.display()))?,
        None => Thresholds::default(),
    };
    let validator = Validator::new(get_schema(), thresholds)?;

    let input = cli
        .input
        .as_deref()
        .context("an input file is required")?;
    let outcome = validate_file(&validator, input)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", Report::new(&outcome, cli.precision)?);
    }

    Ok(if outcome.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn validate_file(
    validator: &Validator<'_>,
    path: &Path,
) -> Result<xtalval::ValidationOutcome> {
    let file = InputFile::from_path(path)
        .with_context(|| format!("reading input file {}", path.display()))?;
    debug!(path = %path.display(), parameters = file.parameters.len(), "Input file loaded");

    let raw_inputs = file
        .raw_inputs(validator.schema())
        .with_context(|| format!("resolving parameters in {}", path.display()))?;

    let outcome = validator
        .validate_and_calculate(&raw_inputs)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(outcome)
}

fn print_schema(json: bool) -> Result<()> {
    let schema = get_schema();
    if json {
        let specs: Vec<_> = schema.iter().collect();
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    for group in [
        ParameterGroup::Crystal,
        ParameterGroup::Circuit,
        ParameterGroup::Measurement,
    ] {
        println!("{}", group.title());
        for spec in schema.group(group) {
            println!(
                "  {:<14} {:<24} [{}] {}",
                spec.key.as_str(),
                spec.display_name,
                spec.acceptable_units.join(", "),
                spec.description
            );
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_required_without_schema() {
        assert!(Cli::try_parse_from(["xtalval"]).is_err());
        assert!(Cli::try_parse_from(["xtalval", "--schema"]).is_ok());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["xtalval", "board.toml"]).unwrap();
        assert_eq!(cli.precision, DEFAULT_PRECISION);
        assert!(!cli.json);
        assert!(cli.thresholds.is_none());
    }

    #[test]
    fn test_missing_input_file_is_an_error() {
        let validator = Validator::default();
        let err = validate_file(&validator, Path::new("does/not/exist.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("reading input file"));
    }
}
