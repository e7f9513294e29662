// ==========================================
// Grain Receiving - Master Data Repository
// ==========================================
// Store keys: productos_dat, rubros_dat, rubrosXproducto_dat
// Read by the receiving flow; written by seeding and tests only.
// ==========================================

use crate::domain::master::{Product, QualityRange, QualityRubric};
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::KeyValueStore;
use crate::repository::table::{Record, Table};
use std::sync::Arc;

pub const PRODUCTS_KEY: &str = "productos_dat";
pub const RUBRICS_KEY: &str = "rubros_dat";
pub const QUALITY_RANGES_KEY: &str = "rubrosXproducto_dat";

impl Record for Product {
    const STORE_KEY: &'static str = PRODUCTS_KEY;
    const ENTITY: &'static str = "Product";

    fn record_id(&self) -> String {
        self.code.clone()
    }
}

impl Record for QualityRubric {
    const STORE_KEY: &'static str = RUBRICS_KEY;
    const ENTITY: &'static str = "QualityRubric";

    fn record_id(&self) -> String {
        self.code.clone()
    }
}

impl Record for QualityRange {
    const STORE_KEY: &'static str = QUALITY_RANGES_KEY;
    const ENTITY: &'static str = "QualityRange";

    fn record_id(&self) -> String {
        format!("{}-{}", self.product_code, self.rubric_code)
    }
}

// ==========================================
// MasterDataRepository
// ==========================================
pub struct MasterDataRepository {
    store: Arc<dyn KeyValueStore>,
}

impl MasterDataRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn products(&self) -> RepositoryResult<Vec<Product>> {
        Ok(Table::<Product>::load(self.store.as_ref())?.into_rows())
    }

    pub fn find_product(&self, code: &str) -> RepositoryResult<Option<Product>> {
        Ok(Table::<Product>::load(self.store.as_ref())?.get(code).cloned())
    }

    pub fn rubrics(&self) -> RepositoryResult<Vec<QualityRubric>> {
        Ok(Table::<QualityRubric>::load(self.store.as_ref())?.into_rows())
    }

    pub fn quality_ranges(&self) -> RepositoryResult<Vec<QualityRange>> {
        Ok(Table::<QualityRange>::load(self.store.as_ref())?.into_rows())
    }

    /// Ranges that apply to one product, in stored order.
    pub fn ranges_for_product(&self, product_code: &str) -> RepositoryResult<Vec<QualityRange>> {
        Ok(self
            .quality_ranges()?
            .into_iter()
            .filter(|r| r.product_code == product_code)
            .collect())
    }

    pub fn save_products(&self, products: Vec<Product>) -> RepositoryResult<()> {
        Table::from_rows(products).save(self.store.as_ref())
    }

    pub fn save_rubrics(&self, rubrics: Vec<QualityRubric>) -> RepositoryResult<()> {
        Table::from_rows(rubrics).save(self.store.as_ref())
    }

    pub fn save_quality_ranges(&self, ranges: Vec<QualityRange>) -> RepositoryResult<()> {
        Table::from_rows(ranges).save(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductStatus;
    use crate::repository::kv_store::InMemoryKvStore;

    #[test]
    fn test_ranges_for_product() {
        let repo = MasterDataRepository::new(Arc::new(InMemoryKvStore::new()));
        let range = |prod: &str, rub: &str| QualityRange {
            product_code: prod.to_string(),
            rubric_code: rub.to_string(),
            min: 0.0,
            max: 10.0,
        };
        repo.save_quality_ranges(vec![
            range("SOJA", "HUM"),
            range("MAIZ", "HUM"),
            range("SOJA", "CE"),
        ])
        .unwrap();

        let soja = repo.ranges_for_product("SOJA").unwrap();
        assert_eq!(soja.len(), 2);
        assert_eq!(soja[1].rubric_code, "CE");
    }

    #[test]
    fn test_find_product() {
        let repo = MasterDataRepository::new(Arc::new(InMemoryKvStore::new()));
        repo.save_products(vec![Product {
            code: "SOJA".to_string(),
            name: "SOJA".to_string(),
            status: ProductStatus::Active,
        }])
        .unwrap();

        assert!(repo.find_product("SOJA").unwrap().is_some());
        assert!(repo.find_product("TRIGO").unwrap().is_none());
    }
}
