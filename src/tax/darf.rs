use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

/// Revenue code for swing-trade capital gains (operações comuns).
pub const DARF_CODE: &str = "6015";

/// A DARF under R$10,00 is not collected on its own; the Receita carries
/// it into the next month's payment.
pub fn below_minimum(tax_due: Decimal) -> bool {
    tax_due > Decimal::ZERO && tax_due < Decimal::from(10)
}

/// DARF payment deadline for a reference month (`YYYY-MM`): the last day
/// of the following month, pulled back to Friday when it lands on a
/// weekend. Bank holidays are out of scope.
pub fn due_date(month: &str) -> Result<NaiveDate> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .context(format!("invalid month '{}', expected YYYY-MM", month))?;

    // Last day of the month after the reference month
    let (year, due_month) = match first.month() {
        11 => (first.year() + 1, 1),
        12 => (first.year() + 1, 2),
        m => (first.year(), m + 2),
    };
    let last_day = NaiveDate::from_ymd_opt(year, due_month, 1)
        .and_then(|d| d.pred_opt())
        .context("date out of range")?;

    let adjusted = match last_day.weekday() {
        Weekday::Sat => last_day.pred_opt().context("date out of range")?,
        Weekday::Sun => last_day
            .pred_opt()
            .and_then(|d| d.pred_opt())
            .context("date out of range")?,
        _ => last_day,
    };

    Ok(adjusted)
}
