use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type EntityId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub standard_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// A price observed at a store for one package of a product on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: EntityId,
    pub product_id: EntityId,
    pub store_id: EntityId,
    pub price: f64,
    pub packaging_size: f64,
    pub packaging_unit: String,
    #[serde(
        default = "default_conversion_factor",
        deserialize_with = "conversion_factor_or_default"
    )]
    pub conversion_factor: f64,
    pub date: NaiveDate,
}

fn default_conversion_factor() -> f64 {
    1.0
}

/// Blank CSV cells and JSON nulls fall back to the default factor.
fn conversion_factor_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_conversion_factor))
}

/// How much of a product is needed, and in which unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: EntityId,
    pub product_id: EntityId,
    pub required_quantity: f64,
    pub required_unit: String,
}

/// A prescription joined with its product; `product` is `None` when the
/// reference does not resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrescription {
    pub prescription: Prescription,
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuote {
    pub quote: Quote,
    pub store: Store,
}

/// A quote with its normalized costs for one prescription.
#[derive(Debug, Clone, PartialEq)]
pub struct CostedQuote {
    pub quote: Quote,
    pub store: Store,
    pub unit_cost: f64,
    pub total_cost: f64,
}

/// A quote left out of the comparison because its cost could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedQuote {
    pub quote: Quote,
    pub store: Store,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Winner,
    Loser,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Winner => write!(f, "Winner"),
            Standing::Loser => write!(f, "Loser"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedQuote {
    /// 1-based.
    pub rank: usize,
    pub standing: Standing,
    pub costed: CostedQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// One winning quote per product.
    #[default]
    Winner,
    /// Every quote per product, ranked.
    Full,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::Winner => write!(f, "winner"),
            ReportMode::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum UnitMatching {
    #[default]
    Exact,
    CaseInsensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Json,
    Toml,
    /// A directory holding `products.csv`, `stores.csv`, `quotes.csv` and
    /// `prescriptions.csv`.
    Csv,
}

impl SnapshotFormat {
    /// Picks the format from the file extension; anything else is taken to be
    /// a CSV table directory.
    pub fn from_path(path: &str) -> Self {
        match std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => SnapshotFormat::Json,
            Some("toml") => SnapshotFormat::Toml,
            _ => SnapshotFormat::Csv,
        }
    }
}

/// Per-prescription result of a report run, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutcome {
    ProductNotFound {
        product_id: EntityId,
    },
    IncompatibleUnit {
        product: Product,
        required_unit: String,
    },
    FetchFailed {
        product: Product,
        reason: String,
    },
    NoQuotes {
        product: Product,
    },
    NoValidQuotes {
        product: Product,
        rejected: Vec<RejectedQuote>,
    },
    Priced {
        product: Product,
        prescription: Prescription,
        ranking: Vec<RankedQuote>,
        rejected: Vec<RejectedQuote>,
    },
}

impl ProductOutcome {
    pub fn winner(&self) -> Option<&CostedQuote> {
        match self {
            ProductOutcome::Priced { ranking, .. } => ranking.first().map(|r| &r.costed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_format_from_path() {
        assert_eq!(SnapshotFormat::from_path("data/snap.json"), SnapshotFormat::Json);
        assert_eq!(SnapshotFormat::from_path("data/snap.TOML"), SnapshotFormat::Toml);
        assert_eq!(SnapshotFormat::from_path("data/tables"), SnapshotFormat::Csv);
    }

    #[test]
    fn test_quote_conversion_factor_defaults_to_one() {
        let quote: Quote = serde_json::from_str(
            r#"{"id":1,"product_id":1,"store_id":1,"price":50.0,
                "packaging_size":25.0,"packaging_unit":"KG","date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(quote.conversion_factor, 1.0);
        assert_eq!(quote.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_null_conversion_factor_defaults_to_one() {
        let quote: Quote = serde_json::from_str(
            r#"{"id":1,"product_id":1,"store_id":1,"price":50.0,"packaging_size":25.0,
                "packaging_unit":"KG","conversion_factor":null,"date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(quote.conversion_factor, 1.0);
    }
}
