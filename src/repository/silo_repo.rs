// ==========================================
// Grain Receiving - Silo Repository
// ==========================================
// Store key: silos_dat
// Stored order is significant: it is the default cascade order.
// ==========================================

use crate::domain::silo::Silo;
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::KeyValueStore;
use crate::repository::table::{Record, Table};
use std::sync::Arc;

pub const SILOS_KEY: &str = "silos_dat";

impl Record for Silo {
    const STORE_KEY: &'static str = SILOS_KEY;
    const ENTITY: &'static str = "Silo";

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

// ==========================================
// SiloRepository
// ==========================================
pub struct SiloRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SiloRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> RepositoryResult<Table<Silo>> {
        Table::load(self.store.as_ref())
    }

    pub fn save(&self, table: &Table<Silo>) -> RepositoryResult<()> {
        table.save(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::kv_store::InMemoryKvStore;

    fn silo(id: &str, product: &str) -> Silo {
        Silo {
            id: id.to_string(),
            name: format!("SILO {}", id),
            product_code: product.to_string(),
            stock_kg: 0.0,
            capacity_kg: 1000.0,
        }
    }

    #[test]
    fn test_load_keeps_stored_order() {
        let repo = SiloRepository::new(Arc::new(InMemoryKvStore::new()));
        repo.save(&Table::from_rows(vec![
            silo("S3", "SOJA"),
            silo("S1", "MAIZ"),
            silo("S2", "SOJA"),
        ]))
        .unwrap();

        let ids: Vec<String> = repo.load().unwrap().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec!["S3", "S1", "S2"]);
    }
}
