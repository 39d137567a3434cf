use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::store::{AssetCategory, Operation, Side};

/// Per-ticker position tracked with the weighted-average cost method.
/// Each purchase blends into a single running average unit cost; a sale
/// leaves the average untouched and only reduces quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Position {
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

/// Realized result of one sale, consumed by the monthly aggregation.
#[derive(Debug, Clone)]
pub struct SaleEvent {
    /// YYYY-MM key of the sale date
    pub month: String,
    pub category: AssetCategory,
    /// Gross sale value (quantity x unit price), before fees
    pub proceeds: Decimal,
    /// Realized profit/loss: net sale value minus average-cost basis
    pub profit: Decimal,
}

/// Average-cost inventory ledger for one computation run.
///
/// Owned by a single `calculate` call, reset to empty at the start of the
/// run and applied strictly in chronological order. The ledger does not
/// reject a sale exceeding the held quantity: the position goes negative
/// and later sales keep using the last known average cost. The guard
/// against that lives in `validation`, before operations enter the history.
#[derive(Debug, Default)]
pub struct Ledger {
    positions: HashMap<String, Position>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one operation. Buys reshape the average cost; sells realize a
    /// profit/loss event against it.
    ///
    /// Buy: `avg = (qty*avg + txQty*price + fees) / (qty + txQty)` - fees
    /// are capitalized into the cost basis.
    /// Sell: `profit = (txQty*price - fees) - txQty*avg`.
    pub fn apply(&mut self, op: &Operation) -> Option<SaleEvent> {
        let position = self.positions.entry(op.ticker.clone()).or_default();

        match op.side {
            Side::Buy => {
                let new_quantity = position.quantity + op.quantity;
                let total_cost = position.quantity * position.average_cost
                    + op.quantity * op.unit_price
                    + op.fees;
                // A position driven negative by an unguarded oversell can
                // make new_quantity non-positive; keep the stale average
                // rather than divide by it.
                if new_quantity > Decimal::ZERO {
                    position.average_cost = total_cost / new_quantity;
                }
                position.quantity = new_quantity;
                None
            }
            Side::Sell => {
                let proceeds = op.quantity * op.unit_price;
                let cost_basis = op.quantity * position.average_cost;
                let profit = proceeds - op.fees - cost_basis;
                position.quantity -= op.quantity;

                Some(SaleEvent {
                    month: op.date.format("%Y-%m").to_string(),
                    category: op.category,
                    proceeds,
                    profit,
                })
            }
        }
    }

    /// End-of-run custody snapshot, ordered by ticker. Fully closed
    /// positions are dropped; a negative quantity (unguarded oversell) is
    /// kept visible.
    pub fn into_custody(self) -> BTreeMap<String, Position> {
        self.positions
            .into_iter()
            .filter(|(_, p)| p.quantity != Decimal::ZERO)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn op(side: Side, qty: Decimal, price: Decimal, fees: Decimal) -> Operation {
        Operation {
            id: "t".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ticker: "PETR4".to_string(),
            side,
            category: AssetCategory::Stock,
            quantity: qty,
            unit_price: price,
            fees,
        }
    }

    #[test]
    fn test_buy_sets_average_cost_with_fees_capitalized() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(100), dec!(10), dec!(5)));

        let custody = ledger.into_custody();
        let pos = &custody["PETR4"];
        assert_eq!(pos.quantity, dec!(100));
        // (100*10 + 5) / 100
        assert_eq!(pos.average_cost, dec!(10.05));
    }

    #[test]
    fn test_two_buys_blend_into_weighted_average() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(100), dec!(10), dec!(1)));
        ledger.apply(&op(Side::Buy, dec!(50), dec!(20), dec!(2)));

        let custody = ledger.into_custody();
        let pos = &custody["PETR4"];
        // (100*10+1 + 50*20+2) / 150
        assert_eq!(pos.average_cost, dec!(2003) / dec!(150));
        assert_eq!(pos.quantity, dec!(150));
    }

    #[test]
    fn test_sell_realizes_profit_and_keeps_average() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(1000), dec!(10), Decimal::ZERO));
        let event = ledger
            .apply(&op(Side::Sell, dec!(500), dec!(15), Decimal::ZERO))
            .unwrap();

        assert_eq!(event.proceeds, dec!(7500));
        assert_eq!(event.profit, dec!(2500));
        assert_eq!(event.month, "2025-01");

        let custody = ledger.into_custody();
        let pos = &custody["PETR4"];
        assert_eq!(pos.quantity, dec!(500));
        assert_eq!(pos.average_cost, dec!(10));
    }

    #[test]
    fn test_sell_fees_reduce_profit_not_basis() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(100), dec!(10), Decimal::ZERO));
        let event = ledger
            .apply(&op(Side::Sell, dec!(40), dec!(12), dec!(5)))
            .unwrap();

        // (40*12 - 5) - 40*10
        assert_eq!(event.profit, dec!(75));
        assert_eq!(event.proceeds, dec!(480));
    }

    #[test]
    fn test_oversell_goes_negative_with_stale_average() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(10), dec!(10), Decimal::ZERO));
        let event = ledger
            .apply(&op(Side::Sell, dec!(20), dec!(12), Decimal::ZERO))
            .unwrap();

        // Cost basis still uses the last known average of 10
        assert_eq!(event.profit, dec!(40));

        let custody = ledger.into_custody();
        let pos = &custody["PETR4"];
        assert_eq!(pos.quantity, dec!(-10));
        assert_eq!(pos.average_cost, dec!(10));
    }

    #[test]
    fn test_closed_position_dropped_from_custody() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(100), dec!(10), Decimal::ZERO));
        ledger.apply(&op(Side::Sell, dec!(100), dec!(12), Decimal::ZERO));
        assert!(ledger.into_custody().is_empty());
    }

    #[test]
    fn test_tickers_tracked_independently() {
        let mut ledger = Ledger::new();
        ledger.apply(&op(Side::Buy, dec!(100), dec!(10), Decimal::ZERO));

        let mut other = op(Side::Buy, dec!(50), dec!(30), Decimal::ZERO);
        other.ticker = "VALE3".to_string();
        ledger.apply(&other);

        let custody = ledger.into_custody();
        assert_eq!(custody["PETR4"].average_cost, dec!(10));
        assert_eq!(custody["VALE3"].average_cost, dec!(30));
    }
}
