// ==========================================
// Grain Receiving - Core Library
// ==========================================
// Quota intake, gate, quality, weighbridge and silo stock for a
// grain-receiving facility. State lives in a key-value store of
// JSON arrays (SQLite on disk).
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - entities and types
pub mod domain;

// Repository - store access
pub mod repository;

// Engine - business rules
pub mod engine;

// Configuration
pub mod config;

// SQLite connection setup and schema
pub mod db;

// Logging
pub mod logging;

// API - station operations
pub mod api;

// App - wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    DistributionEntry, DistributionPlan, Operation, OperationState, Product, ProductStatus,
    QualityRange, QualityRubric, Silo, SiloCapacity, SiloOrder, WeighingStep,
};

pub use engine::{
    OperationLifecycle, QualityEvaluator, ReportBuilder, SiloAllocator, StockLedger,
    WeighingEngine,
};

pub use api::{ApiError, ApiResult, IntakeApi, QualityApi, ReportApi, SiloApi, WeighingApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Grain Receiving";
