// ==========================================
// Grain Receiving - Application State
// ==========================================
// Wires one shared store into the repositories, the config manager
// and the per-station APIs.
// ==========================================

use std::sync::Arc;

use crate::api::{IntakeApi, QualityApi, ReportApi, SiloApi, WeighingApi};
use crate::config::config_manager::ConfigManager;
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::{KeyValueStore, SqliteKvStore};
use crate::repository::master_repo::MasterDataRepository;
use crate::repository::operation_repo::OperationRepository;
use crate::repository::silo_repo::SiloRepository;

pub const DB_PATH_ENV: &str = "GRAIN_RECEIVING_DB_PATH";

pub struct AppState {
    pub db_path: String,
    pub store: Arc<dyn KeyValueStore>,

    // ===== Shared services =====
    pub config_manager: Arc<ConfigManager>,
    pub master_repo: Arc<MasterDataRepository>,

    // ===== Station APIs =====
    pub intake_api: Arc<IntakeApi>,
    pub quality_api: Arc<QualityApi>,
    pub weighing_api: Arc<WeighingApi>,
    pub silo_api: Arc<SiloApi>,
    pub report_api: Arc<ReportApi>,
}

impl AppState {
    /// Opens (or creates) the SQLite store at `db_path`.
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!(db_path = %db_path, "initializing app state");
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::new(&db_path)?);
        Ok(Self::with_store(db_path, store))
    }

    /// Builds the state over any store; tests pass an in-memory one.
    pub fn with_store(db_path: String, store: Arc<dyn KeyValueStore>) -> Self {
        let operation_repo = Arc::new(OperationRepository::new(store.clone()));
        let silo_repo = Arc::new(SiloRepository::new(store.clone()));
        let master_repo = Arc::new(MasterDataRepository::new(store.clone()));
        let config_manager = Arc::new(ConfigManager::new(store.clone()));

        let intake_api = Arc::new(IntakeApi::new(operation_repo.clone(), master_repo.clone()));
        let quality_api = Arc::new(QualityApi::new(operation_repo.clone(), master_repo.clone()));
        let weighing_api = Arc::new(WeighingApi::new(
            store.clone(),
            operation_repo.clone(),
            silo_repo.clone(),
            master_repo.clone(),
            config_manager.clone(),
        ));
        let silo_api = Arc::new(SiloApi::new(
            silo_repo,
            operation_repo.clone(),
            master_repo.clone(),
        ));
        let report_api = Arc::new(ReportApi::new(operation_repo, master_repo.clone()));

        Self {
            db_path,
            store,
            config_manager,
            master_repo,
            intake_api,
            quality_api,
            weighing_api,
            silo_api,
            report_api,
        }
    }
}

/// Store location: `GRAIN_RECEIVING_DB_PATH`, else the user data dir.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./grain_receiving.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("grain-receiving");
        // best-effort: opening the store reports a missing directory anyway
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("grain_receiving.db");
        }
    }
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::kv_store::InMemoryKvStore;

    #[test]
    fn test_with_store_wires_every_api() {
        let state = AppState::with_store(":memory:".to_string(), Arc::new(InMemoryKvStore::new()));
        assert!(state.silo_api.list_silos().unwrap().is_empty());
        assert!(state.config_manager.load_facility_config().is_ok());
    }
}
