// ==========================================
// Grain Receiving - Silo Allocation Engine
// ==========================================
// Cascade fill: walk the product's silos in the configured order,
// put min(free, remaining) into each, stop when nothing remains.
// Hard rule: a silo never goes above its capacity.
// ==========================================
// Two phases:
//   propose    - pure, builds a DistributionPlan from a silo snapshot
//   apply_plan - re-checks the plan against current silos, then mutates
// ==========================================

use crate::domain::distribution::{DistributionEntry, DistributionPlan};
use crate::domain::operation::Operation;
use crate::domain::silo::{Silo, SiloCapacity};
use crate::domain::types::SiloOrder;
use crate::engine::capacity::validate_capacity;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, info, instrument};

/// Tolerance for comparing KG amounts that went through float sums.
pub const WEIGHT_EPSILON_KG: f64 = 1e-6;

// ==========================================
// SiloAllocator
// ==========================================
pub struct SiloAllocator {
    order: SiloOrder,
}

impl SiloAllocator {
    pub fn new(order: SiloOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SiloOrder {
        self.order
    }

    /// Silos holding `product_code`, in the order the cascade visits them.
    ///
    /// Sorts are stable, so equal keys keep the stored order.
    pub fn cascade_order<'a>(&self, silos: &'a [Silo], product_code: &str) -> Vec<&'a Silo> {
        let mut matching: Vec<&Silo> = silos
            .iter()
            .filter(|s| s.product_code == product_code)
            .collect();

        match self.order {
            SiloOrder::Stored => {}
            SiloOrder::IdAsc => matching.sort_by(|a, b| a.id.cmp(&b.id)),
            SiloOrder::MostFreeFirst => {
                matching.sort_by(|a, b| b.free_kg().total_cmp(&a.free_kg()))
            }
        }
        matching
    }

    // ==========================================
    // Phase 1: propose
    // ==========================================

    /// Builds the distribution of `op`'s net load for the given tare.
    ///
    /// The tare must already be validated against the gross reading.
    /// `silos` is only read.
    #[instrument(skip(self, op, silos), fields(
        operation_id = %op.id,
        product_code = %op.product_code,
        order = %self.order
    ))]
    pub fn propose(
        &self,
        op: &Operation,
        tare_kg: f64,
        silos: &[Silo],
    ) -> EngineResult<DistributionPlan> {
        let net_kg = op.gross_kg - tare_kg;
        let total_available_kg = validate_capacity(net_kg, &op.product_code, silos)?;

        let mut remaining = net_kg;
        let mut entries = Vec::new();

        for silo in self.cascade_order(silos, &op.product_code) {
            if remaining <= 0.0 {
                break;
            }
            let free = silo.free_kg();
            if free <= 0.0 {
                debug!(silo_id = %silo.id, "silo full, skipped");
                continue;
            }

            let portion = free.min(remaining);
            entries.push(DistributionEntry {
                silo_id: silo.id.clone(),
                silo_name: silo.name.clone(),
                portion_kg: portion,
                stock_before_kg: silo.stock_kg,
                stock_after_kg: silo.stock_kg + portion,
            });
            remaining -= portion;
        }

        if remaining.abs() > WEIGHT_EPSILON_KG {
            return Err(EngineError::AllocationInvariant(format!(
                "{}kg left undistributed out of {}kg",
                remaining, net_kg
            )));
        }

        let plan = DistributionPlan {
            operation_id: op.id.clone(),
            plate: op.plate.clone(),
            product_code: op.product_code.clone(),
            gross_kg: op.gross_kg,
            tare_kg,
            net_kg,
            total_available_kg,
            entries,
        };

        let distributed = plan.distributed_kg();
        if (distributed - net_kg).abs() > WEIGHT_EPSILON_KG {
            return Err(EngineError::AllocationInvariant(format!(
                "portions sum to {}kg, net is {}kg",
                distributed, net_kg
            )));
        }

        info!(
            net_kg,
            total_available_kg,
            silos_affected = plan.silos_affected(),
            "distribution proposed"
        );
        Ok(plan)
    }

    // ==========================================
    // Phase 2: apply
    // ==========================================

    /// Adds every portion of `plan` to `silos`.
    ///
    /// All entries are checked before any silo is touched: the portions
    /// must add up to gross minus tare with each silo named once, and each
    /// silo must still exist, still hold the plan's product, still have the
    /// stock the plan was built from, and have room for its portion.
    pub fn apply_plan(plan: &DistributionPlan, silos: &mut [Silo]) -> EngineResult<()> {
        let expected_net = plan.gross_kg - plan.tare_kg;
        if (plan.net_kg - expected_net).abs() > WEIGHT_EPSILON_KG {
            return Err(EngineError::AllocationInvariant(format!(
                "plan net {}kg does not match gross {}kg - tare {}kg",
                plan.net_kg, plan.gross_kg, plan.tare_kg
            )));
        }
        let distributed = plan.distributed_kg();
        if (distributed - plan.net_kg).abs() > WEIGHT_EPSILON_KG {
            return Err(EngineError::AllocationInvariant(format!(
                "portions sum to {}kg, net is {}kg",
                distributed, plan.net_kg
            )));
        }

        let mut targets = Vec::with_capacity(plan.entries.len());

        for entry in &plan.entries {
            if plan.entries.iter().filter(|e| e.silo_id == entry.silo_id).count() > 1 {
                return Err(EngineError::AllocationInvariant(format!(
                    "silo {} appears more than once in the plan",
                    entry.silo_id
                )));
            }
            let idx = silos
                .iter()
                .position(|s| s.id == entry.silo_id)
                .ok_or_else(|| {
                    EngineError::StalePlan(format!("silo {} no longer exists", entry.silo_id))
                })?;
            let silo = &silos[idx];

            if silo.product_code != plan.product_code {
                return Err(EngineError::StalePlan(format!(
                    "silo {} now holds {}",
                    silo.id, silo.product_code
                )));
            }
            if (silo.stock_kg - entry.stock_before_kg).abs() > WEIGHT_EPSILON_KG {
                return Err(EngineError::StalePlan(format!(
                    "silo {} stock changed: planned from {}kg, now {}kg",
                    silo.id, entry.stock_before_kg, silo.stock_kg
                )));
            }
            if entry.portion_kg <= 0.0 || !silo.can_receive(entry.portion_kg) {
                return Err(EngineError::AllocationInvariant(format!(
                    "silo {} cannot take {}kg (stock={}kg, capacity={}kg)",
                    silo.id, entry.portion_kg, silo.stock_kg, silo.capacity_kg
                )));
            }
            targets.push(idx);
        }

        for (entry, idx) in plan.entries.iter().zip(targets) {
            let silo = &mut silos[idx];
            silo.stock_kg += entry.portion_kg;
            info!(
                silo_id = %silo.id,
                portion_kg = entry.portion_kg,
                stock_kg = silo.stock_kg,
                "{}: +{}kg",
                silo.name,
                entry.portion_kg
            );
        }
        Ok(())
    }
}

impl Default for SiloAllocator {
    fn default() -> Self {
        Self::new(SiloOrder::default())
    }
}
