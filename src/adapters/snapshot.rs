use crate::domain::model::{Prescription, Product, Quote, Store};
use crate::utils::error::{RankerError, Result};
use crate::utils::validation::{
    validate_finite, validate_non_empty_string, validate_positive_amount, validate_unique,
    Validate,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const PRODUCTS_TABLE: &str = "products.csv";
pub const STORES_TABLE: &str = "stores.csv";
pub const QUOTES_TABLE: &str = "quotes.csv";
pub const PRESCRIPTIONS_TABLE: &str = "prescriptions.csv";

/// Everything a report run reads, loaded at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub prescriptions: Vec<Prescription>,
}

/// Raw bytes of the four CSV tables.
pub struct CsvTables<'a> {
    pub products: &'a [u8],
    pub stores: &'a [u8],
    pub quotes: &'a [u8],
    pub prescriptions: &'a [u8],
}

impl Snapshot {
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_csv_tables(tables: CsvTables<'_>) -> Result<Self> {
        Ok(Self {
            products: read_csv_table(tables.products)?,
            stores: read_csv_table(tables.stores)?,
            quotes: read_csv_table(tables.quotes)?,
            prescriptions: read_csv_table(tables.prescriptions)?,
        })
    }
}

fn read_csv_table<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

impl Validate for Snapshot {
    fn validate(&self) -> Result<()> {
        validate_unique("product id", self.products.iter().map(|p| p.id), |id| {
            id.to_string()
        })?;
        validate_unique("store id", self.stores.iter().map(|s| s.id), |id| {
            id.to_string()
        })?;
        validate_unique("quote id", self.quotes.iter().map(|q| q.id), |id| {
            id.to_string()
        })?;
        validate_unique(
            "prescription id",
            self.prescriptions.iter().map(|p| p.id),
            |id| id.to_string(),
        )?;

        for product in &self.products {
            validate_non_empty_string("product.name", &product.name)?;
            validate_non_empty_string("product.standard_unit", &product.standard_unit)?;
        }
        validate_unique(
            "product name",
            self.products.iter().map(|p| p.name.as_str()),
            |name| name.to_string(),
        )?;

        for store in &self.stores {
            validate_non_empty_string("store.name", &store.name)?;
            validate_non_empty_string("store.address", &store.address)?;
        }
        validate_unique(
            "store name",
            self.stores.iter().map(|s| s.name.as_str()),
            |name| name.to_string(),
        )?;
        validate_unique(
            "store address",
            self.stores.iter().map(|s| s.address.as_str()),
            |address| address.to_string(),
        )?;
        validate_unique(
            "store phone",
            self.stores
                .iter()
                .filter(|s| !s.phone.is_empty())
                .map(|s| s.phone.as_str()),
            |phone| phone.to_string(),
        )?;

        let product_ids: HashSet<u32> = self.products.iter().map(|p| p.id).collect();
        let store_ids: HashSet<u32> = self.stores.iter().map(|s| s.id).collect();

        for quote in &self.quotes {
            if !product_ids.contains(&quote.product_id) {
                return Err(RankerError::SnapshotError {
                    message: format!(
                        "quote #{} references unknown product {}",
                        quote.id, quote.product_id
                    ),
                });
            }
            if !store_ids.contains(&quote.store_id) {
                return Err(RankerError::SnapshotError {
                    message: format!(
                        "quote #{} references unknown store {}",
                        quote.id, quote.store_id
                    ),
                });
            }
            validate_positive_amount("quote.price", quote.price)?;
            // Zero or negative package sizes are left for the cost normalizer
            // to report against the quote.
            validate_finite("quote.packaging_size", quote.packaging_size)?;
            validate_finite("quote.conversion_factor", quote.conversion_factor)?;
            validate_non_empty_string("quote.packaging_unit", &quote.packaging_unit)?;
        }

        for prescription in &self.prescriptions {
            validate_positive_amount("prescription.required_quantity", prescription.required_quantity)?;
            validate_non_empty_string("prescription.required_unit", &prescription.required_unit)?;
            if !product_ids.contains(&prescription.product_id) {
                tracing::warn!(
                    "Prescription #{} references unknown product {}; it will be reported as not found",
                    prescription.id,
                    prescription.product_id
                );
            }
        }

        tracing::debug!(
            "Snapshot valid: {} products, {} stores, {} quotes, {} prescriptions",
            self.products.len(),
            self.stores.len(),
            self.quotes.len(),
            self.prescriptions.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TOML_SNAPSHOT: &str = r#"
[[products]]
id = 1
name = "Soybean"
standard_unit = "KG"

[[stores]]
id = 1
name = "Farm1"
address = "Road 1"
phone = "555-0001"

[[stores]]
id = 2
name = "Farm2"
address = "Road 2"

[[quotes]]
id = 1
product_id = 1
store_id = 1
price = 50.0
packaging_size = 25.0
packaging_unit = "KG"
date = "2024-03-01"

[[quotes]]
id = 2
product_id = 1
store_id = 2
price = 90.0
packaging_size = 50.0
packaging_unit = "KG"
conversion_factor = 1.0
date = "2024-03-01"

[[prescriptions]]
id = 1
product_id = 1
required_quantity = 100.0
required_unit = "KG"
"#;

    #[test]
    fn test_toml_snapshot() {
        let snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.stores[1].phone, "");
        assert_eq!(snapshot.quotes[0].conversion_factor, 1.0);
        assert_eq!(
            snapshot.quotes[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_csv_tables() {
        let products = b"id,name,standard_unit\n1,Soybean,KG\n2,Corn,KG\n";
        let stores = b"id,name,address,phone\n1,Farm1,Road 1,\n2,Farm2,Road 2,555-0002\n";
        let quotes = b"id,product_id,store_id,price,packaging_size,packaging_unit,date\n\
                       1,1,1,50.0,25,KG,2024-03-01\n\
                       2,1,2,90.0,50,KG,2024-03-01\n";
        let prescriptions = b"id,product_id,required_quantity,required_unit\n1,1,100,KG\n";

        let snapshot = Snapshot::from_csv_tables(CsvTables {
            products,
            stores,
            quotes,
            prescriptions,
        })
        .unwrap();

        assert_eq!(snapshot.products.len(), 2);
        assert_eq!(snapshot.stores[0].phone, "");
        assert_eq!(snapshot.quotes[1].price, 90.0);
        assert_eq!(snapshot.quotes[1].conversion_factor, 1.0);
        assert_eq!(snapshot.prescriptions[0].required_quantity, 100.0);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_csv_blank_conversion_factor_defaults_to_one() {
        let products = b"id,name,standard_unit\n1,Soybean,KG\n";
        let stores = b"id,name,address,phone\n1,Farm1,Road 1,\n";
        let quotes = b"id,product_id,store_id,price,packaging_size,packaging_unit,conversion_factor,date\n\
                       1,1,1,50.0,25.0,KG,,2024-03-01\n\
                       2,1,1,90.0,1.0,BAG,50,2024-03-01\n";
        let prescriptions = b"id,product_id,required_quantity,required_unit\n1,1,100,KG\n";

        let snapshot = Snapshot::from_csv_tables(CsvTables {
            products,
            stores,
            quotes,
            prescriptions,
        })
        .unwrap();

        assert_eq!(snapshot.quotes[0].conversion_factor, 1.0);
        assert_eq!(snapshot.quotes[1].conversion_factor, 50.0);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_duplicate_store_phone_rejected() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.stores[1].phone = "555-0001".to_string();
        let err = snapshot.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate store phone: 555-0001"));
    }

    #[test]
    fn test_blank_store_phones_may_repeat() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.stores[0].phone = String::new();
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_duplicate_product_name_rejected() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.products.push(Product {
            id: 2,
            name: "Soybean".to_string(),
            standard_unit: "KG".to_string(),
        });
        let err = snapshot.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate product name: Soybean"));
    }

    #[test]
    fn test_quote_with_unknown_store_rejected() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.quotes[0].store_id = 9;
        let err = snapshot.validate().unwrap_err().to_string();
        assert!(err.contains("quote #1 references unknown store 9"));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.quotes[1].price = 0.0;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_zero_packaging_size_passes_validation() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.quotes[1].packaging_size = 0.0;
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_dangling_prescription_passes_validation() {
        let mut snapshot = Snapshot::from_toml_str(TOML_SNAPSHOT).unwrap();
        snapshot.prescriptions[0].product_id = 77;
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_json_snapshot_missing_tables_default_to_empty() {
        let snapshot = Snapshot::from_json_slice(br#"{"products": []}"#).unwrap();
        assert!(snapshot.quotes.is_empty());
        assert!(snapshot.prescriptions.is_empty());
    }
}
