use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::loss_carryforward::{offset_against_pool, LossPools};

/// Monthly sales-proceeds ceiling below which stock gains are exempt.
pub fn stock_exemption_limit() -> Decimal {
    Decimal::from(20_000)
}

/// 15% rate for the general lane (stocks + BDRs/ETFs).
pub fn general_rate() -> Decimal {
    Decimal::new(15, 2)
}

/// 20% rate for the FII lane.
pub fn fii_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Realized results accumulated for one calendar month, split into the
/// three category lanes. `stock_sales` tracks gross STOCK proceeds only
/// and exists purely for the exemption test.
#[derive(Debug, Clone, Default)]
pub struct MonthlyBucket {
    pub stock_profit: Decimal,
    pub stock_sales: Decimal,
    pub bdr_etf_profit: Decimal,
    pub fii_profit: Decimal,
}

/// Tax outcome for one month with at least one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTaxResult {
    /// YYYY-MM
    pub month: String,
    /// Realized profit/loss across all three lanes, exemption-independent
    pub total_profit: Decimal,
    /// Gross STOCK sale proceeds in the month
    pub stock_sales: Decimal,
    pub tax_due: Decimal,
    /// Whether a DARF must be paid for this month
    pub darf_required: bool,
}

/// Walk the months in ascending order, applying the exemption, the two
/// rates and the two independent loss pools.
///
/// The general lane is deliberately asymmetric: the R$20.000 exemption
/// removes small-volume stock gains from the taxable base, but a net
/// monthly loss in the lane is still recognized and carried forward. The
/// loss test therefore runs on the unclipped stock+BDR/ETF result, while
/// the taxable candidate uses the exemption-clipped stock portion.
pub fn resolve_months(
    buckets: &BTreeMap<String, MonthlyBucket>,
) -> (Vec<MonthlyTaxResult>, LossPools) {
    let mut pools = LossPools::default();
    let mut results = Vec::with_capacity(buckets.len());

    for (month, bucket) in buckets {
        // General lane: stocks + BDRs/ETFs at 15%
        let stock_taxable = if bucket.stock_sales > stock_exemption_limit() {
            bucket.stock_profit
        } else {
            Decimal::ZERO
        };
        let combined = bucket.stock_profit + bucket.bdr_etf_profit;
        let candidate = (stock_taxable + bucket.bdr_etf_profit).max(Decimal::ZERO);
        let general_base = offset_against_pool(combined, candidate, &mut pools.general);
        let general_tax = general_base * general_rate();

        // FII lane: 20%, no exemption
        let fii_candidate = bucket.fii_profit.max(Decimal::ZERO);
        let fii_base = offset_against_pool(bucket.fii_profit, fii_candidate, &mut pools.fii);
        let fii_tax = fii_base * fii_rate();

        let tax_due = general_tax + fii_tax;

        debug!(
            %month,
            %general_base,
            %fii_base,
            %tax_due,
            general_pool = %pools.general,
            fii_pool = %pools.fii,
            "resolved month"
        );

        results.push(MonthlyTaxResult {
            month: month.clone(),
            total_profit: bucket.stock_profit + bucket.bdr_etf_profit + bucket.fii_profit,
            stock_sales: bucket.stock_sales,
            tax_due,
            darf_required: tax_due > Decimal::ZERO,
        });
    }

    (results, pools)
}
