use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "darfcalc")]
#[command(
    version,
    about = "Brazilian swing-trade capital gains calculator with monthly DARF reports"
)]
#[command(
    long_about = "Track buy/sell operations in B3-listed securities (stocks, BDRs/ETFs, FIIs) \
and compute the monthly capital gains tax due, with the R$20.000 stock exemption and \
per-category loss carryforward."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Override the operation store location (default: ~/.darfcalc/operations.json)
    #[arg(long = "data-file", global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a buy/sell operation
    Add {
        /// Ticker symbol (e.g. PETR4)
        ticker: String,

        /// buy or sell (compra/venda also accepted)
        side: String,

        /// Number of units
        quantity: String,

        /// Unit price (plain or Brazilian notation)
        price: String,

        /// Trade date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Total fees (corretagem e emolumentos)
        #[arg(long, default_value = "0")]
        fees: String,

        /// Tax category: STOCK, BDR_ETF or FII (detected from the ticker when omitted)
        #[arg(long)]
        category: Option<String>,
    },

    /// List the stored operation history
    List,

    /// Import operations from a CSV file
    Import {
        /// Path to the CSV file
        file: String,

        /// Preview only, don't save to the store
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Monthly tax report with custody and carried losses
    Report,

    /// Current custody (per-ticker quantity and average cost)
    Custody,

    /// Outstanding carried-loss balances
    Losses,

    /// Remove the most recently recorded operation
    RemoveLast,

    /// Delete the entire operation history
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}
