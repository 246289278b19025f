mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::aggregate::AggregateArgs;
use commands::summarize::SummarizeArgs;

/// Loan amortisation schedules and multi-loan aggregation
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Loan amortisation schedules and multi-loan aggregation",
    long_about = "Computes closed-form amortisation schedules for amortized and \
                  interest-only loans: periodic payment, payment-by-payment \
                  principal/interest breakdown and totals. Loans are read from \
                  JSON or YAML files, piped JSON, or flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log solver details to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a single loan: payment, schedule and totals
    Summarize(SummarizeArgs),
    /// Combine the schedules of several loans
    Aggregate(AggregateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summarize(args) => commands::summarize::run_summarize(args),
        Commands::Aggregate(args) => commands::aggregate::run_aggregate(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
