//! Titanic EDA - command-line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use titanic_eda::{EdaConfig, EdaPipeline, FallbackSource, OutputMode};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis of the Titanic passenger dataset",
    long_about = "Loads the Titanic passenger CSV, profiles data quality, imputes missing \
                  values, derives age/fare buckets and renders a survival overview chart.\n\n\
                  If the input file does not exist, the seaborn reference dataset is used \
                  instead (downloaded once and cached).\n\n\
                  EXAMPLES:\n  \
                  titanic-eda -i data/train.csv\n  \
                  titanic-eda -i data/train.csv --no-open -o charts/\n  \
                  titanic-eda --fallback data/titanic_reference.csv --json"
)]
struct Args {
    /// Path to the passenger CSV
    #[arg(short, long)]
    input: Option<String>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Directory the chart is written to
    #[arg(short, long)]
    output: Option<String>,

    /// Fallback dataset: a local CSV path or an http(s) URL
    #[arg(long)]
    fallback: Option<String>,

    /// Number of rows in the head preview
    #[arg(long)]
    head_rows: Option<usize>,

    /// Do not open the chart after rendering
    #[arg(long)]
    no_open: bool,

    /// Print the run summary as JSON instead of the text report
    ///
    /// Disables logging so stdout only contains JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over
/// `--log-level`.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> Result<EdaConfig> {
    let mut builder = EdaConfig::builder();

    if let Some(path) = &args.config {
        let base = EdaConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?;
        builder = builder.base(base);
    }
    if let Some(input) = &args.input {
        builder = builder.input_path(input);
    }
    if let Some(output) = &args.output {
        builder = builder.output_dir(output);
    }
    if let Some(fallback) = &args.fallback {
        builder = builder.fallback(FallbackSource::parse(fallback));
    }
    if let Some(rows) = args.head_rows {
        builder = builder.head_rows(rows);
    }
    if args.no_open || args.json {
        builder = builder.open_chart(false);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    info!("Input: {}", config.input_path.display());

    let output = if args.json {
        OutputMode::Silent
    } else {
        OutputMode::Console
    };
    let outcome = EdaPipeline::new(config, output)
        .run()
        .context("EDA run failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome.report())?;
        println!("{}", json);
    }

    Ok(())
}
