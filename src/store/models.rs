use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset categories relevant for swing-trade taxation.
///
/// The category decides which tax lane a sale falls into: stocks share the
/// 15% lane (and the R$20.000 monthly exemption) with BDRs/ETFs, FIIs have
/// their own 20% lane with no exemption.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Brazilian stocks (ações) - 15% rate, R$20k monthly sales exemption
    #[serde(rename = "STOCK")]
    Stock,
    /// BDRs and ETFs - 15% rate, no exemption
    #[serde(rename = "BDR_ETF")]
    BdrEtf,
    /// Real estate funds (FII) - 20% rate, no exemption
    #[serde(rename = "FII")]
    Fii,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Stock => "STOCK",
            AssetCategory::BdrEtf => "BDR_ETF",
            AssetCategory::Fii => "FII",
        }
    }
}

impl FromStr for AssetCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STOCK" | "ACAO" | "AÇÃO" => Ok(AssetCategory::Stock),
            "BDR_ETF" | "BDR" | "ETF" => Ok(AssetCategory::BdrEtf),
            "FII" | "REIT" => Ok(AssetCategory::Fii),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation side (buy or sell)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Side {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "COMPRA" | "C" => Ok(Side::Buy),
            "SELL" | "VENDA" | "V" => Ok(Side::Sell),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single buy/sell operation as entered by the user or imported from a
/// brokerage statement. The stored history is a flat list of these; the
/// engine sorts by date itself, so insertion order does not matter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    pub id: String,
    pub date: NaiveDate,
    pub ticker: String,
    pub side: Side,
    pub category: AssetCategory,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Brokerage and exchange fees (corretagem e emolumentos)
    pub fees: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_category_round_trips_through_str() {
        for cat in [AssetCategory::Stock, AssetCategory::BdrEtf, AssetCategory::Fii] {
            assert_eq!(AssetCategory::from_str(cat.as_str()), Ok(cat));
        }
    }

    #[test]
    fn test_category_accepts_aliases() {
        assert_eq!(AssetCategory::from_str("reit"), Ok(AssetCategory::Fii));
        assert_eq!(AssetCategory::from_str("bdr"), Ok(AssetCategory::BdrEtf));
        assert_eq!(AssetCategory::from_str("etf"), Ok(AssetCategory::BdrEtf));
        assert_eq!(AssetCategory::from_str("acao"), Ok(AssetCategory::Stock));
        assert!(AssetCategory::from_str("CRYPTO").is_err());
    }

    #[test]
    fn test_side_accepts_portuguese() {
        assert_eq!(Side::from_str("compra"), Ok(Side::Buy));
        assert_eq!(Side::from_str("VENDA"), Ok(Side::Sell));
        assert!(Side::from_str("hold").is_err());
    }

    #[test]
    fn test_operation_serializes_with_wire_category_strings() {
        let op = Operation {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            ticker: "PETR4".to_string(),
            side: Side::Buy,
            category: AssetCategory::Stock,
            quantity: dec!(100),
            unit_price: dec!(10.50),
            fees: dec!(1.20),
        };

        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains("\"side\":\"BUY\""));
        assert!(json.contains("\"category\":\"STOCK\""));
        assert!(json.contains("\"date\":\"2025-01-05\""));

        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}
