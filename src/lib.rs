//! darfcalc - Brazilian swing-trade capital gains calculator
//!
//! Computes the monthly capital gains tax (DARF) of an individual investor
//! from a buy/sell operation history: weighted-average cost basis per
//! ticker, the R$20.000 monthly stock exemption, 15%/20% category rates
//! and per-category loss carryforward. The `tax` module is the pure
//! engine; `store`, `importers`, `tickers` and `cli` are the surrounding
//! application.

pub mod cli;
pub mod error;
pub mod importers;
pub mod store;
pub mod tax;
pub mod tickers;
pub mod utils;
pub mod validation;
