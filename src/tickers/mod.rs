//! Ticker -> category lookup
//!
//! Supplies a default tax category for a B3 ticker from its numeric
//! suffix. This is only a convenience for data entry: the engine consumes
//! whatever category is attached to each operation.

use crate::store::AssetCategory;

/// ETFs that share the `11` suffix with FIIs and would otherwise be
/// misclassified.
const KNOWN_ETFS: &[&str] = &[
    "BOVA11", "IVVB11", "SMAL11", "XINA11", "HASH11", "GOLD11", "NASD11", "BOVV11",
];

/// Detect the default category from B3 ticker conventions:
/// `34`/`35`/`39` are BDRs, `11` is a fund quota (FII, or ETF for the
/// known list), `3`-`6` are ordinary/preferred stock.
pub fn detect_category(ticker: &str) -> Option<AssetCategory> {
    let upper = ticker.trim().to_ascii_uppercase();
    if upper.len() < 5 {
        return None;
    }

    if KNOWN_ETFS.contains(&upper.as_str()) {
        return Some(AssetCategory::BdrEtf);
    }

    let suffix: String = upper.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    let suffix: String = suffix.chars().rev().collect();

    match suffix.as_str() {
        "34" | "35" | "39" => Some(AssetCategory::BdrEtf),
        "11" => Some(AssetCategory::Fii),
        "3" | "4" | "5" | "6" => Some(AssetCategory::Stock),
        _ => None,
    }
}
