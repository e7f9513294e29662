// ==========================================
// Grain Receiving - Operation Domain Model
// ==========================================
// One record per truck / quota day / product.
// Created by quota intake, mutated in place by every downstream
// station, never deleted (it is also the report record).
// ==========================================

use crate::domain::types::OperationState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Operation - truck delivery operation
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    // ===== Identity =====
    #[serde(default)]
    pub id: String, // surrogate key (UUID v4)
    #[serde(rename = "patente")]
    pub plate: String, // vehicle plate, uppercase as entered
    #[serde(rename = "codprod")]
    pub product_code: String,
    #[serde(rename = "fechacup")]
    pub quota_date: NaiveDate,

    // ===== Lifecycle =====
    #[serde(rename = "estado")]
    pub state: OperationState,

    // ===== Scale readings (KG) =====
    #[serde(rename = "bruto", default)]
    pub gross_kg: f64,
    #[serde(rename = "tara", default)]
    pub tare_kg: f64,
}

impl Operation {
    /// Builds a freshly granted quota (PENDING, no readings).
    pub fn new_quota(plate: &str, product_code: &str, quota_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            plate: plate.trim().to_uppercase(),
            product_code: product_code.to_string(),
            quota_date,
            state: OperationState::Pending,
            gross_kg: 0.0,
            tare_kg: 0.0,
        }
    }

    /// Plate used for comparisons: uppercase, no whitespace anywhere.
    pub fn normalized_plate(&self) -> String {
        normalize_plate(&self.plate)
    }

    /// True when this record answers to the given plate and date.
    pub fn matches(&self, plate: &str, quota_date: NaiveDate) -> bool {
        self.quota_date == quota_date && self.normalized_plate() == normalize_plate(plate)
    }

    /// Net delivered weight; only meaningful once completed.
    pub fn net_kg(&self) -> Option<f64> {
        if self.state == OperationState::Completed {
            Some(self.gross_kg - self.tare_kg)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Normalizes a plate for comparison purposes.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
