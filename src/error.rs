//! Error handling for darfcalc
//!
//! Defines the boundary error types and a unified Result alias using
//! anyhow for context chaining at the application layer.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised at the input boundary, before an operation reaches the
/// tax engine. The engine itself is total over well-formed input.
#[derive(Error, Debug)]
pub enum TaxError {
    /// Malformed operation (non-positive quantity, negative price/fees,
    /// blank ticker). Rejecting a non-positive buy quantity here is what
    /// keeps the average-cost division safe.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A sale larger than the quantity held on its date. The engine would
    /// happily produce a negative position, so this is caught before the
    /// operation is accepted into the history.
    #[error("insufficient inventory for {ticker}: selling {requested} but only {held} held")]
    InsufficientInventory {
        ticker: String,
        requested: Decimal,
        held: Decimal,
    },
}

/// Result type alias for darfcalc operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = TaxError::InvalidOperation("quantity must be positive".to_string());
        assert_eq!(err.to_string(), "invalid operation: quantity must be positive");
    }

    #[test]
    fn test_insufficient_inventory_names_the_ticker() {
        let err = TaxError::InsufficientInventory {
            ticker: "PETR4".to_string(),
            requested: dec!(200),
            held: dec!(150),
        };
        let msg = err.to_string();
        assert!(msg.contains("PETR4"));
        assert!(msg.contains("200"));
        assert!(msg.contains("150"));
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(anyhow::anyhow!("original error"))
            .context("failed to load operations");
        match result {
            Err(e) => {
                assert!(e.to_string().contains("failed to load operations"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("original error"));
            }
            Ok(_) => panic!("expected error"),
        }
    }
}
