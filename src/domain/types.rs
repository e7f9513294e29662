// ==========================================
// Grain Receiving - Domain Type Definitions
// ==========================================
// Closed enumerations for every state code the console stored as a
// bare string. Serialized forms match the stored JSON payloads.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Operation State
// ==========================================
// Lifecycle: PENDING -> ARRIVED -> QUALITY_OK -> GROSS_RECORDED -> COMPLETED
//                               \-> REJECTED
// Stored format: one-letter codes (P/A/C/B/F/R)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    #[serde(rename = "P")]
    Pending, // quota granted, truck not at the gate yet
    #[serde(rename = "A")]
    Arrived, // at the gate, waiting for sampling
    #[serde(rename = "C")]
    QualityOk, // sampled and accepted
    #[serde(rename = "B")]
    GrossRecorded, // loaded weight on the scale
    #[serde(rename = "F")]
    Completed, // tare recorded, load distributed
    #[serde(rename = "R")]
    Rejected, // failed quality
}

impl OperationState {
    /// Terminal states never leave their state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationState::Completed | OperationState::Rejected)
    }

    /// One-letter code used in the stored payloads
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OperationState::Pending => "P",
            OperationState::Arrived => "A",
            OperationState::QualityOk => "C",
            OperationState::GrossRecorded => "B",
            OperationState::Completed => "F",
            OperationState::Rejected => "R",
        }
    }

    /// Parses either the stored letter or the display name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "P" | "PENDING" => Some(OperationState::Pending),
            "A" | "ARRIVED" => Some(OperationState::Arrived),
            "C" | "QUALITY_OK" => Some(OperationState::QualityOk),
            "B" | "GROSS_RECORDED" => Some(OperationState::GrossRecorded),
            "F" | "COMPLETED" => Some(OperationState::Completed),
            "R" | "REJECTED" => Some(OperationState::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationState::Pending => write!(f, "PENDING"),
            OperationState::Arrived => write!(f, "ARRIVED"),
            OperationState::QualityOk => write!(f, "QUALITY_OK"),
            OperationState::GrossRecorded => write!(f, "GROSS_RECORDED"),
            OperationState::Completed => write!(f, "COMPLETED"),
            OperationState::Rejected => write!(f, "REJECTED"),
        }
    }
}

// ==========================================
// Product Status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "B")]
    Inactive,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "ACTIVE"),
            ProductStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

// ==========================================
// Weighing Step
// ==========================================
// Which scale reading a truck in the weighing queue is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeighingStep {
    Gross,
    Tare,
}

impl fmt::Display for WeighingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeighingStep::Gross => write!(f, "GROSS"),
            WeighingStep::Tare => write!(f, "TARE"),
        }
    }
}

// ==========================================
// Silo Order (cascade tie-break)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiloOrder {
    /// Master-data order, as the silos were registered
    Stored,
    /// Ascending by silo id
    IdAsc,
    /// Largest free space first; equal free space keeps stored order
    MostFreeFirst,
}

impl Default for SiloOrder {
    fn default() -> Self {
        SiloOrder::Stored
    }
}

impl fmt::Display for SiloOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl SiloOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "STORED" => Some(SiloOrder::Stored),
            "ID_ASC" => Some(SiloOrder::IdAsc),
            "MOST_FREE_FIRST" => Some(SiloOrder::MostFreeFirst),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SiloOrder::Stored => "STORED",
            SiloOrder::IdAsc => "ID_ASC",
            SiloOrder::MostFreeFirst => "MOST_FREE_FIRST",
        }
    }
}
