//! CSV import of operation histories
//!
//! Parses brokerage-style CSV exports into operations. Headers are mapped
//! by name (English or Portuguese), the delimiter is sniffed from the
//! header line, and bad rows are skipped with a warning rather than
//! aborting the whole import.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::store::{AssetCategory, Side};
use crate::utils::parse_decimal_flexible;

/// One parsed CSV row, before category defaulting and validation.
#[derive(Debug, Clone)]
pub struct RawOperation {
    pub date: NaiveDate,
    pub ticker: String,
    pub side: Side,
    /// Missing in most broker exports; defaulted from the ticker later
    pub category: Option<AssetCategory>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub fees: Decimal,
}

/// Parse a CSV file of operations.
pub fn import_csv<P: AsRef<Path>>(file_path: P) -> Result<Vec<RawOperation>> {
    let path = file_path.as_ref();
    info!("Parsing operations CSV: {:?}", path);

    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read CSV file {:?}", path))?;
    let delimiter = sniff_delimiter(&contents);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers = reader.headers().context("Failed to read CSV headers")?.clone();
    debug!("CSV headers: {:?}", headers);

    let columns = map_columns(&headers)?;

    let mut operations = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.context("Failed to read CSV record")?;
        // Header is line 1
        let line = idx + 2;

        match parse_row(&record, &columns) {
            Ok(op) => operations.push(op),
            Err(e) => warn!("Skipping line {}: {}", line, e),
        }
    }

    info!("Parsed {} operations from CSV", operations.len());
    Ok(operations)
}

/// Brazilian exports often use semicolons; fall back to commas.
fn sniff_delimiter(contents: &str) -> u8 {
    match contents.lines().next() {
        Some(first) if first.contains(';') => b';',
        _ => b',',
    }
}

#[derive(Debug)]
struct ColumnMapping {
    date: usize,
    ticker: usize,
    side: usize,
    quantity: usize,
    price: usize,
    category: Option<usize>,
    fees: Option<usize>,
}

fn map_columns(headers: &csv::StringRecord) -> Result<ColumnMapping> {
    let mut date = None;
    let mut ticker = None;
    let mut side = None;
    let mut quantity = None;
    let mut price = None;
    let mut category = None;
    let mut fees = None;

    for (idx, header) in headers.iter().enumerate() {
        match header.trim().to_ascii_lowercase().as_str() {
            "date" | "data" => date = Some(idx),
            "ticker" | "ativo" | "codigo" | "código" => ticker = Some(idx),
            "side" | "tipo" | "operacao" | "operação" => side = Some(idx),
            "quantity" | "qty" | "quantidade" | "qtd" => quantity = Some(idx),
            "price" | "unit_price" | "preco" | "preço" | "preco unitario" => price = Some(idx),
            "category" | "categoria" => category = Some(idx),
            "fees" | "taxas" | "custos" => fees = Some(idx),
            _ => debug!("Ignoring CSV column '{}'", header),
        }
    }

    Ok(ColumnMapping {
        date: date.ok_or_else(|| anyhow!("missing date column"))?,
        ticker: ticker.ok_or_else(|| anyhow!("missing ticker column"))?,
        side: side.ok_or_else(|| anyhow!("missing side/tipo column"))?,
        quantity: quantity.ok_or_else(|| anyhow!("missing quantity column"))?,
        price: price.ok_or_else(|| anyhow!("missing price column"))?,
        category,
        fees,
    })
}

fn parse_row(record: &csv::StringRecord, columns: &ColumnMapping) -> Result<RawOperation> {
    let field = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| anyhow!("missing field {}", idx))
    };

    let date = parse_date(field(columns.date)?)?;

    let ticker = field(columns.ticker)?.to_ascii_uppercase();
    if ticker.is_empty() {
        return Err(anyhow!("empty ticker"));
    }

    let side_text = field(columns.side)?;
    let side =
        Side::from_str(side_text).map_err(|_| anyhow!("unknown side '{}'", side_text))?;

    let category = match columns.category {
        Some(idx) => {
            let text = field(idx)?;
            if text.is_empty() {
                None
            } else {
                Some(
                    AssetCategory::from_str(text)
                        .map_err(|_| anyhow!("unknown category '{}'", text))?,
                )
            }
        }
        None => None,
    };

    let quantity = parse_decimal_flexible(field(columns.quantity)?)?;
    let unit_price = parse_decimal_flexible(field(columns.price)?)?;
    let fees = match columns.fees {
        Some(idx) => {
            let text = field(idx)?;
            if text.is_empty() {
                Decimal::ZERO
            } else {
                parse_decimal_flexible(text)?
            }
        }
        None => Decimal::ZERO,
    };

    Ok(RawOperation {
        date,
        ticker,
        side,
        category,
        quantity,
        unit_price,
        fees,
    })
}

/// Accepts ISO (`2025-01-05`) and Brazilian (`05/01/2025`) dates.
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| anyhow!("invalid date '{}'", s))
}
