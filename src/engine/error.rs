// ==========================================
// Grain Receiving - Engine Error Types
// ==========================================
// Business-rule violations raised by the engines. Every variant
// carries the values needed to explain the rejection to the operator.
// ==========================================

use crate::domain::types::OperationState;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== Scale readings =====
    #[error("invalid weight: {value} (must be a positive number)")]
    InvalidWeight { value: f64 },

    #[error("weight {weight_kg}kg is above the {ceiling_kg}kg ceiling; acknowledgment required")]
    WeightTooHigh { weight_kg: f64, ceiling_kg: f64 },

    #[error("tare {tare_kg}kg must be lower than gross {gross_kg}kg; correct the gross reading")]
    TareExceedsGross { gross_kg: f64, tare_kg: f64 },

    // ===== Silo capacity =====
    #[error("insufficient capacity for {product_code}: net={net_kg}kg, available={total_available_kg}kg")]
    InsufficientCapacity {
        product_code: String,
        net_kg: f64,
        total_available_kg: f64,
    },

    #[error("insufficient stock in silo {silo_id}: requested={requested_kg}kg, stock={stock_kg}kg")]
    InsufficientStock {
        silo_id: String,
        requested_kg: f64,
        stock_kg: f64,
    },

    #[error("distribution plan is stale: {0}")]
    StalePlan(String),

    #[error("allocation invariant broken: {0}")]
    AllocationInvariant(String),

    // ===== Lifecycle =====
    #[error("invalid state transition: from={from} to={to}")]
    InvalidStateTransition {
        from: OperationState,
        to: OperationState,
    },

    // ===== Quality =====
    #[error("quality analysis incomplete, missing rubrics: {}", .missing.join(", "))]
    IncompleteQualityAnalysis { missing: Vec<String> },

    #[error("invalid value for rubric {rubric_code}: {value}")]
    InvalidQualityValue { rubric_code: String, value: f64 },
}

/// Result alias
pub type EngineResult<T> = Result<T, EngineError>;
