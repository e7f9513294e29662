// ==========================================
// Grain Receiving - Configuration Layer
// ==========================================

pub mod config_manager;

pub use config_manager::{
    ConfigManager, FacilityConfig, CONFIG_KEY, DEFAULT_CONFIRM_MULTI_SILO,
    DEFAULT_SOFT_CEILING_KG, KEY_CONFIRM_MULTI_SILO, KEY_SILO_ORDER, KEY_SOFT_CEILING_KG,
};
