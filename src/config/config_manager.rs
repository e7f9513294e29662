// ==========================================
// Grain Receiving - Configuration Manager
// ==========================================
// Storage: store key `config_dat`, a JSON object of string -> string
// Missing or unparsable values fall back to the defaults below.
// ==========================================

use crate::domain::types::SiloOrder;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::kv_store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

pub const CONFIG_KEY: &str = "config_dat";

// ===== Config keys =====
pub const KEY_SOFT_CEILING_KG: &str = "weighing.soft_ceiling_kg";
pub const KEY_CONFIRM_MULTI_SILO: &str = "distribution.confirm_multi_silo";
pub const KEY_SILO_ORDER: &str = "distribution.silo_order";

// ===== Defaults =====
pub const DEFAULT_SOFT_CEILING_KG: f64 = 60_000.0;
pub const DEFAULT_CONFIRM_MULTI_SILO: bool = true;

// ==========================================
// FacilityConfig - typed view used by the engines
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityConfig {
    /// Gross/tare readings above this need an explicit acknowledgment
    pub soft_ceiling_kg: f64,
    /// Split loads need operator confirmation before commit
    pub confirm_multi_silo: bool,
    /// Cascade order across the silos of a product
    pub silo_order: SiloOrder,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            soft_ceiling_kg: DEFAULT_SOFT_CEILING_KG,
            confirm_multi_silo: DEFAULT_CONFIRM_MULTI_SILO,
            silo_order: SiloOrder::default(),
        }
    }
}

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_map(&self) -> RepositoryResult<BTreeMap<String, String>> {
        match self.store.get(CONFIG_KEY)? {
            None => Ok(BTreeMap::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| RepositoryError::MalformedPayload {
                key: CONFIG_KEY.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Raw value for `key`, if set.
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    // ==========================================
    // Typed getters
    // ==========================================

    pub fn get_soft_ceiling_kg(&self) -> RepositoryResult<f64> {
        let raw = self.get_config_or_default(KEY_SOFT_CEILING_KG, "")?;
        if raw.is_empty() {
            return Ok(DEFAULT_SOFT_CEILING_KG);
        }
        match parse_soft_ceiling(&raw) {
            Ok(v) => Ok(v),
            Err(message) => {
                warn!(key = KEY_SOFT_CEILING_KG, value = %raw, %message, "falling back to default");
                Ok(DEFAULT_SOFT_CEILING_KG)
            }
        }
    }

    pub fn get_confirm_multi_silo(&self) -> RepositoryResult<bool> {
        let raw = self.get_config_or_default(KEY_CONFIRM_MULTI_SILO, "")?;
        if raw.is_empty() {
            return Ok(DEFAULT_CONFIRM_MULTI_SILO);
        }
        match parse_bool(&raw) {
            Some(v) => Ok(v),
            None => {
                warn!(key = KEY_CONFIRM_MULTI_SILO, value = %raw, "falling back to default");
                Ok(DEFAULT_CONFIRM_MULTI_SILO)
            }
        }
    }

    pub fn get_silo_order(&self) -> RepositoryResult<SiloOrder> {
        let raw = self.get_config_or_default(KEY_SILO_ORDER, "")?;
        if raw.is_empty() {
            return Ok(SiloOrder::default());
        }
        match SiloOrder::from_str(&raw) {
            Some(v) => Ok(v),
            None => {
                warn!(key = KEY_SILO_ORDER, value = %raw, "falling back to default");
                Ok(SiloOrder::default())
            }
        }
    }

    /// Everything the weighing flow needs, read once.
    pub fn load_facility_config(&self) -> RepositoryResult<FacilityConfig> {
        Ok(FacilityConfig {
            soft_ceiling_kg: self.get_soft_ceiling_kg()?,
            confirm_multi_silo: self.get_confirm_multi_silo()?,
            silo_order: self.get_silo_order()?,
        })
    }

    // ==========================================
    // Updates
    // ==========================================

    /// Set one value. Known keys are validated before anything is written.
    pub fn update_config(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let invalid = |message: String| RepositoryError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
            message,
        };

        match key {
            KEY_SOFT_CEILING_KG => {
                parse_soft_ceiling(value).map_err(invalid)?;
            }
            KEY_CONFIRM_MULTI_SILO => {
                parse_bool(value).ok_or_else(|| invalid("expected true/false".to_string()))?;
            }
            KEY_SILO_ORDER => {
                SiloOrder::from_str(value).ok_or_else(|| {
                    invalid("expected STORED, ID_ASC or MOST_FREE_FIRST".to_string())
                })?;
            }
            _ => {}
        }

        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.trim().to_string());
        self.store.set(CONFIG_KEY, &serde_json::to_string(&map)?)?;

        info!(key, value, "config updated");
        Ok(())
    }

    /// All stored config values as a JSON object string.
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        Ok(serde_json::to_string(&self.read_map()?)?)
    }
}

fn parse_soft_ceiling(raw: &str) -> Result<f64, String> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| "expected a number".to_string())?;
    if !v.is_finite() || v <= 0.0 {
        return Err("must be a positive number".to_string());
    }
    Ok(v)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::kv_store::InMemoryKvStore;

    fn manager() -> ConfigManager {
        ConfigManager::new(Arc::new(InMemoryKvStore::new()))
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = manager().load_facility_config().unwrap();
        assert_eq!(config, FacilityConfig::default());
        assert_eq!(config.soft_ceiling_kg, 60_000.0);
        assert!(config.confirm_multi_silo);
        assert_eq!(config.silo_order, SiloOrder::Stored);
    }

    #[test]
    fn test_update_and_read_back() {
        let m = manager();
        m.update_config(KEY_SOFT_CEILING_KG, "45000").unwrap();
        m.update_config(KEY_CONFIRM_MULTI_SILO, "false").unwrap();
        m.update_config(KEY_SILO_ORDER, "most_free_first").unwrap();

        let config = m.load_facility_config().unwrap();
        assert_eq!(config.soft_ceiling_kg, 45_000.0);
        assert!(!config.confirm_multi_silo);
        assert_eq!(config.silo_order, SiloOrder::MostFreeFirst);
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let m = manager();
        assert!(matches!(
            m.update_config(KEY_SOFT_CEILING_KG, "-5"),
            Err(RepositoryError::InvalidConfigValue { .. })
        ));
        assert!(m.update_config(KEY_SILO_ORDER, "RANDOM").is_err());
        assert_eq!(m.get_config_snapshot().unwrap(), "{}");
    }

    #[test]
    fn test_unparsable_stored_value_falls_back() {
        let store = Arc::new(InMemoryKvStore::new());
        store
            .set(CONFIG_KEY, r#"{"weighing.soft_ceiling_kg":"lots"}"#)
            .unwrap();
        let m = ConfigManager::new(store);
        assert_eq!(m.get_soft_ceiling_kg().unwrap(), DEFAULT_SOFT_CEILING_KG);
    }
}
