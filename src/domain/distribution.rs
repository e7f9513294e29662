// ==========================================
// Grain Receiving - Distribution Plan
// ==========================================
// Output of the cascade allocator: how one truck's net load is
// split across the silos of its product. Pure data; building a plan
// never touches the silo ledger.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DistributionEntry - one silo's share of the load
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub silo_id: String,
    pub silo_name: String,
    pub portion_kg: f64,
    pub stock_before_kg: f64, // used to detect a stale plan at commit
    pub stock_after_kg: f64,
}

// ==========================================
// DistributionPlan
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPlan {
    // ===== Operation being closed =====
    pub operation_id: String,
    pub plate: String,
    pub product_code: String,
    pub gross_kg: f64,
    pub tare_kg: f64,
    pub net_kg: f64,

    // ===== Allocation =====
    pub total_available_kg: f64,
    pub entries: Vec<DistributionEntry>, // in cascade order
}

impl DistributionPlan {
    /// Sum of all portions; equals `net_kg` for any plan the allocator builds.
    pub fn distributed_kg(&self) -> f64 {
        self.entries.iter().map(|e| e.portion_kg).sum()
    }

    pub fn silos_affected(&self) -> usize {
        self.entries.len()
    }

    /// Whether the operator must confirm before commit.
    ///
    /// Split loads need confirmation when the policy is enabled; a load
    /// that fits in a single silo never does.
    pub fn requires_confirmation(&self, confirm_multi_silo: bool) -> bool {
        confirm_multi_silo && self.entries.len() > 1
    }

    /// Human-readable distribution log, one line per silo.
    pub fn log_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{}: +{}kg", e.silo_name, e.portion_kg))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, portion: f64) -> DistributionEntry {
        DistributionEntry {
            silo_id: name.to_string(),
            silo_name: name.to_string(),
            portion_kg: portion,
            stock_before_kg: 0.0,
            stock_after_kg: portion,
        }
    }

    fn plan(entries: Vec<DistributionEntry>) -> DistributionPlan {
        let net = entries.iter().map(|e| e.portion_kg).sum();
        DistributionPlan {
            operation_id: "op-1".to_string(),
            plate: "AAA123".to_string(),
            product_code: "SOJA".to_string(),
            gross_kg: net + 100.0,
            tare_kg: 100.0,
            net_kg: net,
            total_available_kg: net,
            entries,
        }
    }

    #[test]
    fn test_confirmation_policy() {
        let single = plan(vec![entry("S1", 500.0)]);
        assert!(!single.requires_confirmation(true));

        let split = plan(vec![entry("S1", 100.0), entry("S2", 400.0)]);
        assert!(split.requires_confirmation(true));
        assert!(!split.requires_confirmation(false));
    }

    #[test]
    fn test_log_lines() {
        let split = plan(vec![entry("S1", 100.0), entry("S2", 400.0)]);
        assert_eq!(split.log_lines(), vec!["S1: +100kg", "S2: +400kg"]);
        assert_eq!(split.distributed_kg(), 500.0);
    }
}
