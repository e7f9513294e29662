// ==========================================
// Grain Receiving - Master Data
// ==========================================
// Products, quality rubrics and per-product rubric ranges.
// Maintained by administration; read-only for the receiving flow.
// ==========================================

use crate::domain::types::ProductStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// Product
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado", default)]
    pub status: ProductStatus,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

// ==========================================
// QualityRubric - measured parameter (humidity, foreign matter...)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRubric {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

// ==========================================
// QualityRange - accepted [min, max] of one rubric for one product
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRange {
    #[serde(rename = "codigoprod")]
    pub product_code: String,
    #[serde(rename = "codigorub")]
    pub rubric_code: String,
    #[serde(rename = "valmin")]
    pub min: f64,
    #[serde(rename = "valmax")]
    pub max: f64,
}

impl QualityRange {
    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Product name for display, falling back to the code.
pub fn product_display_name(products: &[Product], code: &str) -> String {
    products
        .iter()
        .find(|p| p.code == code)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("CODE: {}", code))
}
