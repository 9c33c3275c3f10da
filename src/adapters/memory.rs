use crate::adapters::snapshot::Snapshot;
use crate::domain::model::{EntityId, Product, ResolvedPrescription, Store, StoreQuote};
use crate::domain::ports::QuoteRepository;
use crate::utils::error::{RankerError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Serves report queries from a loaded [`Snapshot`]. Lookups are indexed by
/// id; quote order follows the snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    snapshot: Snapshot,
    products: HashMap<EntityId, usize>,
    stores: HashMap<EntityId, usize>,
}

impl SnapshotRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        let products = snapshot
            .products
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();
        let stores = snapshot
            .stores
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.id, idx))
            .collect();

        Self {
            snapshot,
            products,
            stores,
        }
    }

    fn product(&self, id: EntityId) -> Option<&Product> {
        self.products.get(&id).map(|&idx| &self.snapshot.products[idx])
    }

    fn store(&self, id: EntityId) -> Option<&Store> {
        self.stores.get(&id).map(|&idx| &self.snapshot.stores[idx])
    }
}

impl QuoteRepository for SnapshotRepository {
    fn find_all_prescriptions(&self) -> Result<Vec<ResolvedPrescription>> {
        Ok(self
            .snapshot
            .prescriptions
            .iter()
            .map(|prescription| ResolvedPrescription {
                prescription: prescription.clone(),
                product: self.product(prescription.product_id).cloned(),
            })
            .collect())
    }

    fn find_quotes(&self, product_id: EntityId, date: NaiveDate) -> Result<Vec<StoreQuote>> {
        self.snapshot
            .quotes
            .iter()
            .filter(|quote| quote.product_id == product_id && quote.date == date)
            .map(|quote| -> Result<StoreQuote> {
                let store = self
                    .store(quote.store_id)
                    .ok_or(RankerError::MissingReference {
                        entity: "Store",
                        id: quote.store_id,
                    })?;
                Ok(StoreQuote {
                    quote: quote.clone(),
                    store: store.clone(),
                })
            })
            .collect()
    }
}
