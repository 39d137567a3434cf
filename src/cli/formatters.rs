//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of tax calculation from presentation.

use colored::Colorize;
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};

use crate::store::Operation;
use crate::tax::{below_minimum, due_date, LossPools, Position, TaxReport, DARF_CODE};
use crate::utils::{format_brl, format_decimal_br};

/// Render the monthly tax table.
pub fn format_report_table(report: &TaxReport) -> String {
    #[derive(Tabled)]
    struct MonthRow {
        #[tabled(rename = "Month")]
        month: String,
        #[tabled(rename = "Profit/Loss")]
        profit: String,
        #[tabled(rename = "Stock Sales")]
        sales: String,
        #[tabled(rename = "Tax Due")]
        tax: String,
        #[tabled(rename = "DARF")]
        darf: String,
        #[tabled(rename = "Due Date")]
        due: String,
    }

    let rows: Vec<MonthRow> = report
        .months
        .iter()
        .map(|m| {
            let darf = if m.darf_required {
                if below_minimum(m.tax_due) {
                    format!("{} (below R$10 minimum)", DARF_CODE)
                } else {
                    DARF_CODE.to_string()
                }
            } else {
                "-".to_string()
            };
            let due = if m.darf_required {
                due_date(&m.month)
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_else(|_| "-".to_string())
            } else {
                "-".to_string()
            };
            MonthRow {
                month: m.month.clone(),
                profit: format_brl(m.total_profit),
                sales: format_brl(m.stock_sales),
                tax: format_brl(m.tax_due),
                darf,
                due,
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render the custody snapshot.
pub fn format_custody_table(custody: &BTreeMap<String, Position>) -> String {
    #[derive(Tabled)]
    struct CustodyRow {
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Average Cost")]
        average_cost: String,
        #[tabled(rename = "Position Cost")]
        total: String,
    }

    let rows: Vec<CustodyRow> = custody
        .iter()
        .map(|(ticker, p)| CustodyRow {
            ticker: ticker.clone(),
            quantity: format_decimal_br(p.quantity),
            average_cost: format_brl(p.average_cost),
            total: format_brl(p.quantity * p.average_cost),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render the outstanding loss pools.
pub fn format_losses(pools: &LossPools) -> String {
    format!(
        "Carried losses:\n  Stocks + BDR/ETF: {}\n  FII:              {}",
        format_brl(pools.general),
        format_brl(pools.fii)
    )
}

/// Render the stored history.
pub fn format_operations_table(operations: &[Operation]) -> String {
    #[derive(Tabled)]
    struct OperationRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Side")]
        side: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "Fees")]
        fees: String,
    }

    let rows: Vec<OperationRow> = operations
        .iter()
        .map(|op| OperationRow {
            date: op.date.format("%d/%m/%Y").to_string(),
            ticker: op.ticker.clone(),
            side: op.side.as_str().to_string(),
            category: op.category.as_str().to_string(),
            quantity: format_decimal_br(op.quantity),
            price: format_brl(op.unit_price),
            fees: format_brl(op.fees),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line month summary with a colored DARF flag, printed under the table.
pub fn format_darf_flags(report: &TaxReport) -> String {
    report
        .months
        .iter()
        .filter(|m| m.darf_required)
        .map(|m| {
            format!(
                "{} {}: {} due",
                "DARF".red().bold(),
                m.month,
                format_brl(m.tax_due)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `--json` output: the whole report, pretty-printed.
pub fn format_report_json(report: &TaxReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
