//! Inventrak CLI - credential and offline reporting tools.
//!
//! # Usage
//!
//! ```bash
//! # Hash a password for INVENTRAK_CREDENTIALS
//! inventrak hash-password -e owner@example.com -p 'correct horse'
//!
//! # Low-stock report for the seed catalog
//! inventrak low-stock
//!
//! # Sales report over an exported transaction file
//! inventrak sales-report -f sales.json --period monthly --date 2026-03-31
//! ```
//!
//! # Commands
//!
//! - `hash-password` - Print an `email=hash` credential entry
//! - `low-stock` - Print the low-stock report as JSON
//! - `sales-report` - Print a daily or monthly sales report as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inventrak_core::reports::Period;

mod commands;

#[derive(Parser)]
#[command(name = "inventrak")]
#[command(author, version, about = "Inventrak CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a password into a credential entry
    HashPassword {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Plain-text password
        #[arg(short, long)]
        password: String,
    },
    /// Print the low-stock report for the seed catalog
    LowStock,
    /// Summarize transactions from a JSON file
    SalesReport {
        /// JSON array of transactions
        #[arg(short, long)]
        file: PathBuf,

        /// `daily` or `monthly`
        #[arg(long, default_value = "daily")]
        period: Period,

        /// Report date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Number of top sellers to list
        #[arg(short, long, default_value_t = 3)]
        top: usize,
    },
}

#[allow(clippy::print_stdout)]
fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, commands::CommandError> {
    match cli.command {
        Commands::HashPassword { email, password } => {
            commands::credentials::hash_entry(&email, &password)
        }
        Commands::LowStock => commands::report::low_stock(),
        Commands::SalesReport {
            file,
            period,
            date,
            top,
        } => {
            let as_of = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
            commands::report::sales(&file, period, as_of, top)
        }
    }
}
