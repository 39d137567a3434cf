use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use itertools::Itertools;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use darfcalc::cli::{formatters, Cli, Commands};
use darfcalc::importers;
use darfcalc::store::{self, AssetCategory, Operation, Side};
use darfcalc::tax;
use darfcalc::tickers;
use darfcalc::utils::parse_decimal_flexible;
use darfcalc::validation;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let data_file = cli.data_file.clone();

    match cli.command {
        Commands::Add {
            ticker,
            side,
            quantity,
            price,
            date,
            fees,
            category,
        } => handle_add(data_file, ticker, side, quantity, price, date, fees, category),
        Commands::List => handle_list(data_file),
        Commands::Import { file, dry_run } => handle_import(data_file, &file, dry_run),
        Commands::Report => handle_report(data_file, cli.json),
        Commands::Custody => handle_custody(data_file, cli.json),
        Commands::Losses => handle_losses(data_file, cli.json),
        Commands::RemoveLast => handle_remove_last(data_file),
        Commands::Clear { yes } => handle_clear(data_file, yes),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_add(
    data_file: Option<PathBuf>,
    ticker: String,
    side: String,
    quantity: String,
    price: String,
    date: String,
    fees: String,
    category: Option<String>,
) -> Result<()> {
    let ticker = ticker.trim().to_ascii_uppercase();
    let side = Side::from_str(&side)
        .map_err(|_| anyhow!("unknown side '{}', expected buy or sell", side))?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .context(format!("invalid date '{}', expected YYYY-MM-DD", date))?;
    let quantity = parse_decimal_flexible(&quantity).context("invalid quantity")?;
    let unit_price = parse_decimal_flexible(&price).context("invalid price")?;
    let fees = parse_decimal_flexible(&fees).context("invalid fees")?;

    let category = resolve_category(category.as_deref(), &ticker)?;

    let operation = Operation {
        id: store::next_operation_id(),
        date,
        ticker,
        side,
        category,
        quantity,
        unit_price,
        fees,
    };

    let mut operations = store::load_operations(data_file.clone())?;
    validation::check_new_operation(&operations, &operation)?;
    operations.push(operation.clone());
    store::save_operations(data_file, &operations)?;

    println!(
        "{} Recorded {} {} {} @ {} on {} ({})",
        "✓".green().bold(),
        operation.side,
        operation.quantity,
        operation.ticker,
        darfcalc::utils::format_brl(operation.unit_price),
        operation.date.format("%d/%m/%Y"),
        operation.category,
    );
    Ok(())
}

/// Explicit `--category` wins; otherwise detect from the ticker suffix.
fn resolve_category(explicit: Option<&str>, ticker: &str) -> Result<AssetCategory> {
    if let Some(text) = explicit {
        return AssetCategory::from_str(text)
            .map_err(|_| anyhow!("unknown category '{}', expected STOCK, BDR_ETF or FII", text));
    }
    tickers::detect_category(ticker).ok_or_else(|| {
        anyhow!(
            "could not detect a category for '{}'; pass --category STOCK|BDR_ETF|FII",
            ticker
        )
    })
}

fn handle_list(data_file: Option<PathBuf>) -> Result<()> {
    let operations = store::load_operations(data_file)?;
    if operations.is_empty() {
        println!("No operations recorded.");
        return Ok(());
    }

    let ordered: Vec<Operation> = operations
        .iter()
        .cloned()
        .sorted_by_key(|op| op.date)
        .collect();
    println!("{}", formatters::format_operations_table(&ordered));
    println!("{} operation(s)", ordered.len());
    Ok(())
}

fn handle_import(data_file: Option<PathBuf>, file: &str, dry_run: bool) -> Result<()> {
    info!("Importing operations from: {}", file);

    let raw_operations = importers::import_csv(file)?;
    println!(
        "\n{} Found {} operations\n",
        "✓".green().bold(),
        raw_operations.len()
    );

    let mut operations = store::load_operations(data_file.clone())?;
    let mut accepted = Vec::new();
    let mut imported = 0;
    let mut errors = 0;

    for raw in &raw_operations {
        let category = match raw.category {
            Some(c) => c,
            None => match tickers::detect_category(&raw.ticker) {
                Some(c) => c,
                None => {
                    eprintln!(
                        "Skipping {}: no category in file and none detectable from the ticker",
                        raw.ticker
                    );
                    errors += 1;
                    continue;
                }
            },
        };

        let operation = Operation {
            id: store::next_operation_id(),
            date: raw.date,
            ticker: raw.ticker.clone(),
            side: raw.side,
            category,
            quantity: raw.quantity,
            unit_price: raw.unit_price,
            fees: raw.fees,
        };

        match validation::check_new_operation(&operations, &operation) {
            Ok(()) => {
                operations.push(operation.clone());
                accepted.push(operation);
                imported += 1;
            }
            Err(e) => {
                eprintln!("Rejected {} {}: {}", operation.ticker, operation.date, e);
                errors += 1;
            }
        }
    }

    if !accepted.is_empty() {
        println!("{}", formatters::format_operations_table(&accepted));
    }

    if dry_run {
        println!("\n{} Dry run - no changes saved", "ℹ".blue().bold());
        return Ok(());
    }

    store::save_operations(data_file, &operations)?;

    println!("\n{} Import complete!", "✓".green().bold());
    println!("  Imported: {}", imported.to_string().green());
    if errors > 0 {
        println!("  Rejected: {}", errors.to_string().red());
    }
    Ok(())
}

fn handle_report(data_file: Option<PathBuf>, json: bool) -> Result<()> {
    let operations = store::load_operations(data_file)?;
    let report = tax::calculate(&operations)?;

    if json {
        println!("{}", formatters::format_report_json(&report)?);
        return Ok(());
    }

    if report.months.is_empty() {
        println!("No operations recorded.");
        return Ok(());
    }

    println!("{}", formatters::format_report_table(&report));

    let flags = formatters::format_darf_flags(&report);
    if !flags.is_empty() {
        println!("\n{}", flags);
    }

    if !report.custody.is_empty() {
        println!("\nCustody:");
        println!("{}", formatters::format_custody_table(&report.custody));
    }

    println!("\n{}", formatters::format_losses(&report.loss_pools));
    Ok(())
}

fn handle_custody(data_file: Option<PathBuf>, json: bool) -> Result<()> {
    let operations = store::load_operations(data_file)?;
    let report = tax::calculate(&operations)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.custody)?);
    } else if report.custody.is_empty() {
        println!("No open positions.");
    } else {
        println!("{}", formatters::format_custody_table(&report.custody));
    }
    Ok(())
}

fn handle_losses(data_file: Option<PathBuf>, json: bool) -> Result<()> {
    let operations = store::load_operations(data_file)?;
    let report = tax::calculate(&operations)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.loss_pools)?);
    } else {
        println!("{}", formatters::format_losses(&report.loss_pools));
    }
    Ok(())
}

fn handle_remove_last(data_file: Option<PathBuf>) -> Result<()> {
    let mut operations = store::load_operations(data_file.clone())?;
    match operations.pop() {
        Some(removed) => {
            store::save_operations(data_file, &operations)?;
            println!(
                "{} Removed {} {} {} dated {}",
                "✓".green().bold(),
                removed.side,
                removed.quantity,
                removed.ticker,
                removed.date.format("%d/%m/%Y"),
            );
            Ok(())
        }
        None => {
            println!("No operations to remove.");
            Ok(())
        }
    }
}

fn handle_clear(data_file: Option<PathBuf>, yes: bool) -> Result<()> {
    if !yes {
        bail!("this deletes the entire operation history; pass --yes to confirm");
    }
    store::save_operations(data_file, &[])?;
    println!("{} Operation history cleared", "✓".green().bold());
    Ok(())
}
