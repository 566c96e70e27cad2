mod errors;
mod parser;
mod runner;
mod writer;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for dashboard results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Print panels and previews to standard output (human-readable)
    Stdout,
    /// Output results in JSON format
    Json,
    /// Output styled HTML panels
    Html,
}

/// Placeholder datasets served by the mock analytics provider
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MockDataset {
    /// Low/medium/high/critical slices
    Risk,
    /// Breach categories
    Breach,
    /// Per-user weekday activity
    Weekly,
    /// Random daily severity counts
    Timeline,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a CSV file and show its first rows
    Preview {
        /// CSV file to upload
        file: String,
    },
    /// Show the dashboard panels for a CSV export or a statistics JSON document
    Stats {
        /// CSV activity export, or a JSON document with --from-json
        file: String,
        /// Read precomputed activity statistics instead of a CSV export
        #[arg(long)]
        from_json: bool,
    },
    /// Print a placeholder dataset
    Mock {
        #[arg(value_enum)]
        dataset: MockDataset,
        /// Number of days for the timeline dataset
        #[arg(long)]
        days: Option<usize>,
    },
    /// Watch a drop folder and report every CSV file placed in it
    Watch {
        /// Directory to watch
        dir: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "riskdash",
    version,
    about = "RiskDash CLI - user activity risk dashboard for CSV exports",
    long_about = "RiskDash loads CSV exports of monitored user activity, previews their rows \
                  and computes the dashboard panels: total activities, high risk count, \
                  breaches, approximate active users and the average risk score.\n\n\
                  Example usage:\n  \
                  riskdash --output json stats activity.csv"
)]
pub struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "stdout", global = true)]
    output: OutputFormat,

    /// Write JSON or HTML output to this file or directory
    #[arg(long, value_name = "PATH", global = true)]
    output_file: Option<String>,

    /// Enable debug logging and detailed error backtraces
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "riskdash=debug,riskdash_core=debug"
    } else {
        "riskdash=info,riskdash_core=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let args = Args::parse();

    // Enable backtraces in debug mode
    if args.debug {
        // SAFETY: no other thread exists yet
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    init_tracing(args.debug);

    match runner::run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            if std::env::var("RUST_BACKTRACE").is_ok() {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {:#}", err);
                eprintln!("\nHint: Run with --debug flag for detailed stack traces");
            }
            std::process::exit(1);
        }
    }
}
