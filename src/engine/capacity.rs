// ==========================================
// Grain Receiving - Capacity Validation
// ==========================================
// Facility-wide free space for a product: the sum of free space over
// every silo holding it. A load is admitted only when it fits whole.
// ==========================================

use crate::domain::silo::{Silo, SiloCapacity};
use crate::engine::error::{EngineError, EngineResult};

/// Free space across all silos of `product_code`. Read-only.
pub fn total_available_kg(silos: &[Silo], product_code: &str) -> f64 {
    silos
        .iter()
        .filter(|s| s.product_code == product_code)
        .map(|s| s.free_kg())
        .sum()
}

/// Fails with `InsufficientCapacity` when `net_kg` does not fit.
///
/// Returns the total available on success so callers can report it.
pub fn validate_capacity(net_kg: f64, product_code: &str, silos: &[Silo]) -> EngineResult<f64> {
    let total = total_available_kg(silos, product_code);
    if net_kg > total {
        return Err(EngineError::InsufficientCapacity {
            product_code: product_code.to_string(),
            net_kg,
            total_available_kg: total,
        });
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silo(id: &str, product: &str, stock: f64, capacity: f64) -> Silo {
        Silo {
            id: id.to_string(),
            name: id.to_string(),
            product_code: product.to_string(),
            stock_kg: stock,
            capacity_kg: capacity,
        }
    }

    #[test]
    fn test_total_only_counts_matching_product() {
        let silos = vec![
            silo("S1", "SOJA", 900.0, 1000.0),
            silo("S2", "MAIZ", 0.0, 5000.0),
            silo("S3", "SOJA", 0.0, 400.0),
        ];
        assert_eq!(total_available_kg(&silos, "SOJA"), 500.0);
        assert_eq!(total_available_kg(&silos, "TRIGO"), 0.0);
    }

    #[test]
    fn test_read_is_repeatable() {
        let silos = vec![silo("S1", "SOJA", 100.0, 1000.0)];
        let first = total_available_kg(&silos, "SOJA");
        let second = total_available_kg(&silos, "SOJA");
        assert_eq!(first, second);
        assert_eq!(silos[0].stock_kg, 100.0);
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let silos = vec![silo("S1", "SOJA", 900.0, 1000.0)];
        assert_eq!(validate_capacity(100.0, "SOJA", &silos).unwrap(), 100.0);
    }

    #[test]
    fn test_one_kg_short_is_rejected() {
        let silos = vec![silo("S1", "SOJA", 999.0, 1000.0)];
        assert_eq!(
            validate_capacity(50.0, "SOJA", &silos).unwrap_err(),
            EngineError::InsufficientCapacity {
                product_code: "SOJA".to_string(),
                net_kg: 50.0,
                total_available_kg: 1.0
            }
        );
    }
}
