//! Formatting and parsing helpers shared by the CLI
//!
//! Currency display follows Brazilian locale conventions: `.` for
//! thousands, `,` for decimals.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Format as Brazilian Real: `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    format!("R$ {}", format_decimal_br(value))
}

/// Number only, Brazilian locale: `1.234,56`.
pub fn format_decimal_br(value: Decimal) -> String {
    let rounded = value.abs().round_dp(2);
    let text = format!("{:.2}", rounded);
    let (integer, decimals) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if value < Decimal::ZERO { "-" } else { "" };
    format!("{}{},{}", sign, grouped, decimals)
}

/// Parse a decimal that may use either Brazilian (`1.234,56`) or plain
/// (`1234.56`) notation. An `R$` prefix is tolerated.
pub fn parse_decimal_flexible(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().trim_start_matches("R$").trim();
    if cleaned.is_empty() {
        return Err(anyhow!("empty number"));
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };

    Decimal::from_str(&normalized).map_err(|_| anyhow!("invalid number '{}'", s))
}
