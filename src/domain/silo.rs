// ==========================================
// Grain Receiving - Silo Domain Model
// ==========================================
// Invariant: 0 <= stock_kg <= capacity_kg at all times.
// Stock changes only through the allocation commit and stock-out.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Silo - physical storage unit
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Silo {
    #[serde(rename = "codsil")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codprod")]
    pub product_code: String, // the single product it holds

    #[serde(rename = "stock", default)]
    pub stock_kg: f64,
    #[serde(rename = "capacidad", default)]
    pub capacity_kg: f64, // fixed ceiling
}

// ==========================================
// Trait: SiloCapacity
// ==========================================
// Capacity checks shared by the allocator and the stock ledger
pub trait SiloCapacity {
    /// Free space left (never negative)
    fn free_kg(&self) -> f64;

    /// True when `weight_kg` fits without passing capacity
    fn can_receive(&self, weight_kg: f64) -> bool;

    /// True when `weight_kg` can be taken out without going below zero
    fn can_release(&self, weight_kg: f64) -> bool;

    /// Fill level in percent, capped at 100
    fn fill_percent(&self) -> f64;
}

impl SiloCapacity for Silo {
    fn free_kg(&self) -> f64 {
        (self.capacity_kg - self.stock_kg).max(0.0)
    }

    fn can_receive(&self, weight_kg: f64) -> bool {
        weight_kg >= 0.0 && self.stock_kg + weight_kg <= self.capacity_kg
    }

    fn can_release(&self, weight_kg: f64) -> bool {
        weight_kg >= 0.0 && weight_kg <= self.stock_kg
    }

    fn fill_percent(&self) -> f64 {
        if self.capacity_kg <= 0.0 {
            return 0.0;
        }
        ((self.stock_kg / self.capacity_kg) * 100.0).min(100.0)
    }
}

impl Silo {
    /// Checks the ledger invariant on this silo.
    pub fn is_consistent(&self) -> bool {
        self.stock_kg >= 0.0 && self.stock_kg <= self.capacity_kg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silo(stock: f64, capacity: f64) -> Silo {
        Silo {
            id: "S1".to_string(),
            name: "SILO 1".to_string(),
            product_code: "SOJA".to_string(),
            stock_kg: stock,
            capacity_kg: capacity,
        }
    }

    #[test]
    fn test_free_kg() {
        assert_eq!(silo(900.0, 1000.0).free_kg(), 100.0);
        assert_eq!(silo(1000.0, 1000.0).free_kg(), 0.0);
    }

    #[test]
    fn test_can_receive_boundaries() {
        let s = silo(900.0, 1000.0);
        assert!(s.can_receive(100.0));
        assert!(!s.can_receive(100.5));
        assert!(!s.can_receive(-1.0));
    }

    #[test]
    fn test_can_release_boundaries() {
        let s = silo(300.0, 1000.0);
        assert!(s.can_release(300.0));
        assert!(!s.can_release(300.1));
    }

    #[test]
    fn test_fill_percent() {
        assert_eq!(silo(250.0, 1000.0).fill_percent(), 25.0);
        assert_eq!(silo(10.0, 0.0).fill_percent(), 0.0);
    }

    #[test]
    fn test_deserializes_console_payload() {
        let raw = r#"{"codsil":"S1","nombre":"SILO NORTE","codprod":"SOJA","stock":900,"capacidad":1000}"#;
        let s: Silo = serde_json::from_str(raw).unwrap();
        assert_eq!(s.name, "SILO NORTE");
        assert_eq!(s.free_kg(), 100.0);
        assert!(s.is_consistent());
    }
}
