use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::TaxError;
use crate::store::{AssetCategory, Operation};
use crate::validation::check_well_formed;

use super::cost_basis::{Ledger, Position};
use super::loss_carryforward::LossPools;
use super::swing_trade::{resolve_months, MonthlyBucket, MonthlyTaxResult};

/// Complete output of one computation run: the monthly tax results plus the
/// two end-of-run snapshots the UI needs (custody and outstanding losses).
/// Exposing the snapshots here keeps callers out of the engine's internals.
#[derive(Debug, Clone, Serialize)]
pub struct TaxReport {
    pub months: Vec<MonthlyTaxResult>,
    pub custody: BTreeMap<String, Position>,
    pub loss_pools: LossPools,
}

/// Compute the full monthly tax report from an operation history.
///
/// Pure function of its input: the history is sorted by date internally
/// (stable on ties), replayed through a fresh average-cost ledger, grouped
/// into monthly buckets and resolved in ascending month order. Calling it
/// twice on the same list, in any order, yields identical output.
pub fn calculate(operations: &[Operation]) -> Result<TaxReport, TaxError> {
    for op in operations {
        check_well_formed(op)?;
    }

    let mut ordered: Vec<&Operation> = operations.iter().collect();
    ordered.sort_by_key(|op| op.date);

    let mut ledger = Ledger::new();
    let mut buckets: BTreeMap<String, MonthlyBucket> = BTreeMap::new();

    for op in ordered {
        // Every month with at least one operation gets a bucket, so a
        // buy-only month still shows up in the report (with zero tax).
        let bucket = buckets
            .entry(op.date.format("%Y-%m").to_string())
            .or_default();

        if let Some(event) = ledger.apply(op) {
            match event.category {
                AssetCategory::Stock => {
                    bucket.stock_profit += event.profit;
                    bucket.stock_sales += event.proceeds;
                }
                AssetCategory::BdrEtf => bucket.bdr_etf_profit += event.profit,
                AssetCategory::Fii => bucket.fii_profit += event.profit,
            }
        }
    }

    debug!("aggregated {} month(s) from {} operation(s)", buckets.len(), operations.len());

    let (months, loss_pools) = resolve_months(&buckets);

    Ok(TaxReport {
        months,
        custody: ledger.into_custody(),
        loss_pools,
    })
}
