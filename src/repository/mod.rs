// ==========================================
// Grain Receiving - Repository Layer
// ==========================================
// Rule: repositories hold no business logic.
// ==========================================
// Every entity lives as a JSON array under a fixed store key
// (the keys the browser console used). Repositories load those
// arrays into Tables and write them back; combined writes go
// through UnitOfWork.
// ==========================================

pub mod error;
pub mod kv_store;
pub mod master_repo;
pub mod operation_repo;
pub mod silo_repo;
pub mod table;
pub mod unit_of_work;

// Re-exports
pub use error::{RepositoryError, RepositoryResult};
pub use kv_store::{InMemoryKvStore, KeyValueStore, SqliteKvStore};
pub use master_repo::{MasterDataRepository, PRODUCTS_KEY, QUALITY_RANGES_KEY, RUBRICS_KEY};
pub use operation_repo::{OperationRepository, OPERATIONS_KEY};
pub use silo_repo::{SiloRepository, SILOS_KEY};
pub use table::{Record, Table};
pub use unit_of_work::UnitOfWork;
