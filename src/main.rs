//! KELLY: two-way betting stake allocation
//!
//! Entry point. Loads configuration, initialises structured logging,
//! parses both odds, validates the request, and prints the allocation
//! (or a side-by-side comparison of every strategy).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, error};

use kelly::config::{AppConfig, DEFAULT_CONFIG_FILE};
use kelly::types::{CalculationInput, Method};
use kelly::{compare, parse_odds, validate_comparison, validate_with, ComparisonOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "kelly")]
#[command(version, about = "Optimal betting stake calculator for two-way markets", long_about = None)]
#[command(after_help = "ODDS FORMATS:\n  Decimal:     2.5, 3.85\n  Percentage:  39%, 26%\n  Fractional:  3/2, 5/2\n  American:    +250, -150")]
struct Cli {
    /// Odds for option A (decimal, percentage, fractional or American)
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    odds_a: String,

    /// Odds for option B
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    odds_b: String,

    /// Total amount to allocate
    #[arg(short = 't', long)]
    total: f64,

    /// Calculation method: arbitrage, kelly, proportional
    #[arg(short, long)]
    method: Option<String>,

    /// Estimated win probability for option A (Kelly only)
    #[arg(long)]
    prob_a: Option<f64>,

    /// Estimated win probability for option B (Kelly only)
    #[arg(long)]
    prob_b: Option<f64>,

    /// Label for option A
    #[arg(long)]
    name_a: Option<String>,

    /// Label for option B
    #[arg(long)]
    name_b: Option<String>,

    /// Currency symbol
    #[arg(short, long)]
    currency: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Compare all calculation methods
    #[arg(long)]
    compare: bool,

    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,
}

fn main() {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    if let Err(e) = run(Cli::parse()) {
        error!(error = %e, "Calculation failed");
        eprintln!("✗ {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = AppConfig::load_or_default(&cli.config)?;
    let defaults = &cfg.defaults;

    let odds_a = parse_odds(&cli.odds_a).context("Error parsing odds A")?;
    let odds_b = parse_odds(&cli.odds_b).context("Error parsing odds B")?;

    let method = Method::from(cli.method.as_deref().unwrap_or(&defaults.method));
    let input = CalculationInput::new(method, odds_a, odds_b, cli.total)
        .with_probabilities(cli.prob_a, cli.prob_b)
        .with_names(
            cli.name_a.unwrap_or_else(|| defaults.name_a.clone()),
            cli.name_b.unwrap_or_else(|| defaults.name_b.clone()),
        )
        .with_currency(cli.currency.unwrap_or_else(|| defaults.currency.clone()));

    let format = match cli.format {
        Some(f) => f,
        None => OutputFormat::from_str(&defaults.output, true)
            .map_err(|e| anyhow::anyhow!("Invalid output format in config: {e}"))?,
    };

    debug!(?input, ?format, compare = cli.compare, "Request built");

    if cli.compare {
        validate_comparison(&input, &cfg.validation).context("Validation error")?;
        return print_comparison(&input, format);
    }

    validate_with(&input, &cfg.validation).context("Validation error")?;
    let result = kelly::calculate(&input).context("Calculation error")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => println!("{result}"),
    }
    Ok(())
}

fn print_comparison(input: &CalculationInput, format: OutputFormat) -> Result<()> {
    let entries = compare(input);

    if format == OutputFormat::Json {
        let computed: Vec<_> = entries
            .iter()
            .filter_map(|e| match &e.outcome {
                ComparisonOutcome::Computed(r) => Some(r),
                _ => None,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&computed)?);
        return Ok(());
    }

    for entry in &entries {
        match &entry.outcome {
            ComparisonOutcome::Computed(result) => println!("{result}\n"),
            ComparisonOutcome::Skipped(reason) => {
                println!("─── {} (skipped: {reason}) ───\n", entry.strategy.title())
            }
            ComparisonOutcome::Failed(e) => {
                println!("─── {} (error: {e}) ───\n", entry.strategy.title())
            }
        }
    }
    Ok(())
}

/// Initialise the `tracing` subscriber. Logs go to stderr so stdout only
/// carries the result.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kelly=info"));

    let json_logging = std::env::var("KELLY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
