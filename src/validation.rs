//! Input-boundary validation
//!
//! Checks an operation before it is accepted into the stored history.
//! This is where an oversell is caught: the engine itself never rejects
//! one (it would just drive the position negative), so `add` and `import`
//! must run every candidate through here first.

use rust_decimal::Decimal;

use crate::error::TaxError;
use crate::store::{Operation, Side};

/// Field-level checks that need no history context.
pub fn check_well_formed(op: &Operation) -> Result<(), TaxError> {
    if op.ticker.trim().is_empty() {
        return Err(TaxError::InvalidOperation("ticker must not be blank".to_string()));
    }
    if op.quantity <= Decimal::ZERO {
        return Err(TaxError::InvalidOperation(format!(
            "quantity must be positive, got {}",
            op.quantity
        )));
    }
    if op.unit_price < Decimal::ZERO {
        return Err(TaxError::InvalidOperation(format!(
            "unit price must not be negative, got {}",
            op.unit_price
        )));
    }
    if op.fees < Decimal::ZERO {
        return Err(TaxError::InvalidOperation(format!(
            "fees must not be negative, got {}",
            op.fees
        )));
    }
    Ok(())
}

/// Validate a candidate operation against the existing history.
///
/// A sell may not exceed the quantity held on its date, counting every
/// operation up to and including that date. Quantity sums are order
/// independent, so no replay through the ledger is needed here.
pub fn check_new_operation(history: &[Operation], candidate: &Operation) -> Result<(), TaxError> {
    check_well_formed(candidate)?;

    if candidate.side == Side::Sell {
        let held = held_quantity_at(history, &candidate.ticker, candidate);
        if candidate.quantity > held {
            return Err(TaxError::InsufficientInventory {
                ticker: candidate.ticker.clone(),
                requested: candidate.quantity,
                held,
            });
        }
    }

    Ok(())
}

fn held_quantity_at(history: &[Operation], ticker: &str, candidate: &Operation) -> Decimal {
    history
        .iter()
        .filter(|op| op.ticker == ticker && op.date <= candidate.date)
        .fold(Decimal::ZERO, |held, op| match op.side {
            Side::Buy => held + op.quantity,
            Side::Sell => held - op.quantity,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AssetCategory;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn op(date: (i32, u32, u32), side: Side, qty: Decimal) -> Operation {
        Operation {
            id: "t".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            ticker: "PETR4".to_string(),
            side,
            category: AssetCategory::Stock,
            quantity: qty,
            unit_price: dec!(10),
            fees: Decimal::ZERO,
        }
    }

    #[test]
    fn test_sell_within_held_quantity_passes() {
        let history = vec![op((2025, 1, 5), Side::Buy, dec!(100))];
        let sell = op((2025, 1, 20), Side::Sell, dec!(100));
        assert!(check_new_operation(&history, &sell).is_ok());
    }

    #[test]
    fn test_oversell_rejected() {
        let history = vec![op((2025, 1, 5), Side::Buy, dec!(100))];
        let sell = op((2025, 1, 20), Side::Sell, dec!(150));
        let err = check_new_operation(&history, &sell).unwrap_err();
        assert!(matches!(err, TaxError::InsufficientInventory { .. }));
    }

    #[test]
    fn test_oversell_check_respects_dates() {
        // The buy happens after the sell date, so it does not count
        let history = vec![op((2025, 2, 5), Side::Buy, dec!(100))];
        let sell = op((2025, 1, 20), Side::Sell, dec!(50));
        assert!(check_new_operation(&history, &sell).is_err());
    }

    #[test]
    fn test_earlier_sells_reduce_held_quantity() {
        let history = vec![
            op((2025, 1, 5), Side::Buy, dec!(100)),
            op((2025, 1, 10), Side::Sell, dec!(80)),
        ];
        let sell = op((2025, 1, 20), Side::Sell, dec!(30));
        assert!(check_new_operation(&history, &sell).is_err());

        let smaller = op((2025, 1, 20), Side::Sell, dec!(20));
        assert!(check_new_operation(&history, &smaller).is_ok());
    }

    #[test]
    fn test_other_tickers_do_not_count() {
        let mut other = op((2025, 1, 5), Side::Buy, dec!(100));
        other.ticker = "VALE3".to_string();
        let sell = op((2025, 1, 20), Side::Sell, dec!(10));
        assert!(check_new_operation(&[other], &sell).is_err());
    }

    #[test]
    fn test_buy_never_needs_inventory() {
        let buy = op((2025, 1, 5), Side::Buy, dec!(100));
        assert!(check_new_operation(&[], &buy).is_ok());
    }

    #[test]
    fn test_malformed_candidate_rejected() {
        let zero_qty = op((2025, 1, 5), Side::Buy, dec!(0));
        assert!(check_new_operation(&[], &zero_qty).is_err());

        let mut negative_fees = op((2025, 1, 5), Side::Buy, dec!(10));
        negative_fees.fees = dec!(-1);
        assert!(check_new_operation(&[], &negative_fees).is_err());
    }
}
