// ==========================================
// Grain Receiving - Operation Repository
// ==========================================
// Store key: operaciones_dat
// No business rules here; state transitions live in the engine.
// ==========================================

use crate::domain::operation::Operation;
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::KeyValueStore;
use crate::repository::table::{Record, Table};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

pub const OPERATIONS_KEY: &str = "operaciones_dat";

impl Record for Operation {
    const STORE_KEY: &'static str = OPERATIONS_KEY;
    const ENTITY: &'static str = "Operation";

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

// ==========================================
// OperationRepository
// ==========================================
pub struct OperationRepository {
    store: Arc<dyn KeyValueStore>,
}

impl OperationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load every operation.
    ///
    /// Records written by the browser console carry no id; they get one
    /// here, written back right away so later loads see the same ids.
    pub fn load(&self) -> RepositoryResult<Table<Operation>> {
        let mut table: Table<Operation> = Table::load(self.store.as_ref())?;

        let mut assigned = 0usize;
        for op in table.rows_mut().iter_mut() {
            if op.id.trim().is_empty() {
                op.id = uuid::Uuid::new_v4().to_string();
                assigned += 1;
            }
        }
        if assigned > 0 {
            table.save(self.store.as_ref())?;
            info!(assigned, "assigned ids to legacy operation records");
        }

        Ok(table)
    }

    pub fn save(&self, table: &Table<Operation>) -> RepositoryResult<()> {
        table.save(self.store.as_ref())
    }

    /// Operations whose quota falls on `date`, in stored order.
    pub fn list_by_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Operation>> {
        Ok(self
            .load()?
            .iter()
            .filter(|op| op.quota_date == date)
            .cloned()
            .collect())
    }

    /// The non-terminal operation for a plate on a quota date, if any.
    pub fn find_active(&self, plate: &str, date: NaiveDate) -> RepositoryResult<Option<Operation>> {
        Ok(self
            .load()?
            .find(|op| !op.is_terminal() && op.matches(plate, date))
            .cloned())
    }
}
