// ==========================================
// Grain Receiving - In-Memory Table
// ==========================================
// Every entity is stored as one JSON array under one store key.
// Table<T> is that array loaded into memory: ordered (stored order is
// kept, the silo cascade depends on it), addressable by record id.
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

// ==========================================
// Trait: Record
// ==========================================
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Store key holding the whole array
    const STORE_KEY: &'static str;

    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Identifier, unique within the table
    fn record_id(&self) -> String;
}

// ==========================================
// Table<T>
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T: Record> {
    rows: Vec<T>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// Decode a stored payload; a missing key is an empty table.
    pub fn decode(raw: Option<&str>) -> RepositoryResult<Self> {
        match raw {
            None => Ok(Self::default()),
            Some(text) if text.trim().is_empty() => Ok(Self::default()),
            Some(text) => {
                let rows: Vec<T> =
                    serde_json::from_str(text).map_err(|e| RepositoryError::MalformedPayload {
                        key: T::STORE_KEY.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Self { rows })
            }
        }
    }

    pub fn encode(&self) -> RepositoryResult<String> {
        Ok(serde_json::to_string(&self.rows)?)
    }

    /// Read the table from the store.
    pub fn load(store: &dyn KeyValueStore) -> RepositoryResult<Self> {
        let raw = store.get(T::STORE_KEY)?;
        Self::decode(raw.as_deref())
    }

    /// Write the whole table back under its key.
    pub fn save(&self, store: &dyn KeyValueStore) -> RepositoryResult<()> {
        store.set(T::STORE_KEY, &self.encode()?)
    }

    // ==========================================
    // Queries
    // ==========================================

    pub fn list(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.record_id() == id)
    }

    pub fn find<P>(&self, predicate: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.iter().find(|r| predicate(r))
    }

    // ==========================================
    // Mutations
    // ==========================================

    /// Apply `f` to the record with `id`; NotFound when absent.
    pub fn update<F, R>(&mut self, id: &str, f: F) -> RepositoryResult<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.record_id() == id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: T::ENTITY.to_string(),
                id: id.to_string(),
            })?;
        Ok(f(row))
    }

    /// Append a record; its id must not exist yet.
    pub fn insert(&mut self, row: T) -> RepositoryResult<()> {
        let id = row.record_id();
        if self.get(&id).is_some() {
            return Err(RepositoryError::DuplicateRecord {
                entity: T::ENTITY.to_string(),
                id,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Mutable access for bulk fix-ups (used when loading legacy payloads).
    pub(crate) fn rows_mut(&mut self) -> &mut Vec<T> {
        &mut self.rows
    }

    /// In-place access without changing row count or order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::kv_store::InMemoryKvStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Bin {
        code: String,
        level: i32,
    }

    impl Record for Bin {
        const STORE_KEY: &'static str = "bins_dat";
        const ENTITY: &'static str = "Bin";

        fn record_id(&self) -> String {
            self.code.clone()
        }
    }

    fn bin(code: &str, level: i32) -> Bin {
        Bin {
            code: code.to_string(),
            level,
        }
    }

    #[test]
    fn test_missing_key_is_empty_table() {
        let store = InMemoryKvStore::new();
        let table: Table<Bin> = Table::load(&store).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_update_and_not_found() {
        let mut table = Table::from_rows(vec![bin("B1", 1), bin("B2", 2)]);
        let level = table.update("B2", |b| {
            b.level += 10;
            b.level
        });
        assert_eq!(level.unwrap(), 12);

        let missing = table.update("B9", |b| b.level);
        assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut table = Table::from_rows(vec![bin("B1", 1)]);
        assert!(table.insert(bin("B2", 0)).is_ok());
        assert!(matches!(
            table.insert(bin("B1", 5)),
            Err(RepositoryError::DuplicateRecord { .. })
        ));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let store = InMemoryKvStore::new();
        let table = Table::from_rows(vec![bin("B3", 3), bin("B1", 1), bin("B2", 2)]);
        table.save(&store).unwrap();

        let loaded: Table<Bin> = Table::load(&store).unwrap();
        let codes: Vec<&str> = loaded.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["B3", "B1", "B2"]);
    }

    #[test]
    fn test_malformed_payload() {
        let result: RepositoryResult<Table<Bin>> = Table::decode(Some("{not json"));
        match result {
            Err(RepositoryError::MalformedPayload { key, .. }) => assert_eq!(key, "bins_dat"),
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }
}
