// ==========================================
// Grain Receiving - Silo Stock Ledger
// ==========================================
// Stock enters through the distribution commit and leaves only through
// manual stock-out. Both keep 0 <= stock <= capacity.
// ==========================================

use crate::domain::silo::{Silo, SiloCapacity};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{info, instrument};

pub struct StockLedger;

impl StockLedger {
    /// Takes `amount_kg` out of `silo`; returns the new stock.
    #[instrument(skip(silo), fields(silo_id = %silo.id, stock_kg = silo.stock_kg))]
    pub fn withdraw(silo: &mut Silo, amount_kg: f64) -> EngineResult<f64> {
        if !amount_kg.is_finite() || amount_kg <= 0.0 {
            return Err(EngineError::InvalidWeight { value: amount_kg });
        }
        if !silo.can_release(amount_kg) {
            return Err(EngineError::InsufficientStock {
                silo_id: silo.id.clone(),
                requested_kg: amount_kg,
                stock_kg: silo.stock_kg,
            });
        }

        silo.stock_kg -= amount_kg;
        info!(amount_kg, remaining_kg = silo.stock_kg, "stock-out registered");
        Ok(silo.stock_kg)
    }

    /// Ids of silos whose stock is outside [0, capacity].
    pub fn inconsistent_silos(silos: &[Silo]) -> Vec<String> {
        silos
            .iter()
            .filter(|s| !s.is_consistent())
            .map(|s| s.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silo(stock: f64) -> Silo {
        Silo {
            id: "S1".to_string(),
            name: "SILO 1".to_string(),
            product_code: "SOJA".to_string(),
            stock_kg: stock,
            capacity_kg: 1000.0,
        }
    }

    #[test]
    fn test_withdraw_whole_stock() {
        let mut s = silo(300.0);
        assert_eq!(StockLedger::withdraw(&mut s, 300.0).unwrap(), 0.0);
    }

    #[test]
    fn test_withdraw_more_than_stock() {
        let mut s = silo(300.0);
        let err = StockLedger::withdraw(&mut s, 301.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientStock {
                silo_id: "S1".to_string(),
                requested_kg: 301.0,
                stock_kg: 300.0
            }
        );
        assert_eq!(s.stock_kg, 300.0);
    }

    #[test]
    fn test_withdraw_rejects_non_positive() {
        let mut s = silo(300.0);
        assert!(StockLedger::withdraw(&mut s, 0.0).is_err());
        assert!(StockLedger::withdraw(&mut s, f64::NAN).is_err());
        assert_eq!(s.stock_kg, 300.0);
    }

    #[test]
    fn test_inconsistent_silos() {
        let mut over = silo(0.0);
        over.id = "S2".to_string();
        over.stock_kg = 1200.0;
        assert_eq!(StockLedger::inconsistent_silos(&[silo(10.0), over]), vec!["S2"]);
    }
}
