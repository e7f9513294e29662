// ==========================================
// Grain Receiving - Unit of Work
// ==========================================
// Collects several table payloads and writes them in a single
// KeyValueStore::set_many call. Closing a weighing writes the
// operation table and the silo table through one of these, so the
// store never holds a completed truck without its silo stock (or
// the reverse).
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::KeyValueStore;
use crate::repository::table::{Record, Table};
use tracing::debug;

pub struct UnitOfWork<'a> {
    store: &'a dyn KeyValueStore,
    staged: Vec<(String, String)>,
}

impl<'a> UnitOfWork<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    /// Serialize `table` and stage it; staging the same key twice keeps the last one.
    pub fn stage<T: Record>(&mut self, table: &Table<T>) -> RepositoryResult<&mut Self> {
        let payload = table.encode()?;
        self.staged.retain(|(key, _)| key != T::STORE_KEY);
        self.staged.push((T::STORE_KEY.to_string(), payload));
        Ok(self)
    }

    pub fn staged_keys(&self) -> Vec<&str> {
        self.staged.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Write everything staged as one unit.
    pub fn commit(self) -> RepositoryResult<()> {
        debug!(keys = ?self.staged_keys(), "committing unit of work");
        if self.staged.is_empty() {
            return Ok(());
        }
        self.store.set_many(&self.staged)
    }
}
