// ==========================================
// Grain Receiving - API Error Types
// ==========================================
// What the operator sees. Engine rule violations and store failures
// are folded into one taxonomy; every variant names the values that
// caused it.
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Scale readings
    // ==========================================
    #[error("invalid weight: {value} (must be a positive number)")]
    InvalidWeight { value: f64 },

    /// Soft: repeat the call with the acknowledgment set to proceed.
    #[error("weight {weight_kg}kg is above {ceiling_kg}kg; confirm to record it anyway")]
    WeightTooHighWarning { weight_kg: f64, ceiling_kg: f64 },

    #[error("tare {tare_kg}kg is not lower than gross {gross_kg}kg; correct the gross reading")]
    TareExceedsGross { gross_kg: f64, tare_kg: f64 },

    // ==========================================
    // Silo capacity and stock
    // ==========================================
    #[error("insufficient capacity: net={net_kg}kg, available={total_available_kg}kg")]
    InsufficientCapacity { net_kg: f64, total_available_kg: f64 },

    #[error("insufficient stock in silo {silo_id}: requested={requested_kg}kg, stock={stock_kg}kg")]
    InsufficientStock {
        silo_id: String,
        requested_kg: f64,
        stock_kg: f64,
    },

    #[error("distribution plan is out of date: {0}")]
    StaleDistributionPlan(String),

    // ==========================================
    // Intake and lifecycle
    // ==========================================
    #[error("invalid plate: {0}")]
    InvalidPlate(String),

    #[error("plate {plate} already holds a quota for {date}")]
    DuplicateQuota { plate: String, date: String },

    #[error("product {0} is inactive or unknown")]
    InactiveProduct(String),

    #[error("invalid state transition: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("quality analysis incomplete, missing: {}", .missing.join(", "))]
    IncompleteQualityAnalysis { missing: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ==========================================
    // Store
    // ==========================================
    #[error("store error: {0}")]
    StoreError(String),

    #[error("store transaction failed: {0}")]
    StoreTransactionError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// True for warnings the operator may override and retry.
    pub fn is_acknowledgeable(&self) -> bool {
        matches!(self, ApiError::WeightTooHighWarning { .. })
    }
}

// ==========================================
// From EngineError
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidWeight { value } => ApiError::InvalidWeight { value },
            EngineError::WeightTooHigh {
                weight_kg,
                ceiling_kg,
            } => ApiError::WeightTooHighWarning {
                weight_kg,
                ceiling_kg,
            },
            EngineError::TareExceedsGross { gross_kg, tare_kg } => {
                ApiError::TareExceedsGross { gross_kg, tare_kg }
            }
            EngineError::InsufficientCapacity {
                net_kg,
                total_available_kg,
                ..
            } => ApiError::InsufficientCapacity {
                net_kg,
                total_available_kg,
            },
            EngineError::InsufficientStock {
                silo_id,
                requested_kg,
                stock_kg,
            } => ApiError::InsufficientStock {
                silo_id,
                requested_kg,
                stock_kg,
            },
            EngineError::StalePlan(msg) => ApiError::StaleDistributionPlan(msg),
            EngineError::AllocationInvariant(msg) => ApiError::InternalError(msg),
            EngineError::InvalidStateTransition { from, to } => ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            },
            EngineError::IncompleteQualityAnalysis { missing } => {
                ApiError::IncompleteQualityAnalysis { missing }
            }
            EngineError::InvalidQualityValue { rubric_code, value } => {
                ApiError::InvalidInput(format!("rubric {} value {}", rubric_code, value))
            }
        }
    }
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DuplicateRecord { entity, id } => {
                ApiError::InternalError(format!("duplicate {}(id={})", entity, id))
            }
            RepositoryError::LockError(msg) => ApiError::StoreError(format!("lock failed: {}", msg)),
            RepositoryError::StoreQueryError(msg) => ApiError::StoreError(msg),
            RepositoryError::StoreTransactionError(msg) => ApiError::StoreTransactionError(msg),
            RepositoryError::MalformedPayload { key, message } => {
                ApiError::StoreError(format!("{} is malformed: {}", key, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::StoreError(msg),
            RepositoryError::InvalidConfigValue {
                key,
                value,
                message,
            } => ApiError::InvalidConfig(format!("{}={} ({})", key, value, message)),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;
