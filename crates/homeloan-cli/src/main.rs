mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::export::ExportArgs;
use commands::mortgage::CalculateArgs;

/// Fixed-rate mortgage and installment calculations
#[derive(Parser)]
#[command(
    name = "homeloan",
    version,
    about = "Fixed-rate mortgage and installment calculations",
    long_about = "A CLI for fixed-rate amortization with decimal precision. \
                  Computes the monthly payment, overpayment and the full \
                  month-by-month schedule, and exports the schedule as a \
                  workbook file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the payment summary and amortization schedule
    Calculate(CalculateArgs),
    /// Write the schedule workbook to a CSV file
    Export(ExportArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::mortgage::run_calculate(args),
        Commands::Export(args) => commands::export::run_export(args),
        Commands::Version => {
            println!("homeloan {}", env!("CARGO_PKG_VERSION"));
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
