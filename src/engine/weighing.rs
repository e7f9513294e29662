// ==========================================
// Grain Receiving - Weighing Engine
// ==========================================
// Gross: QUALITY_OK -> GROSS_RECORDED, may be corrected afterwards
// Tare: validated against gross, yields the net load
// Readings above the soft ceiling need an explicit acknowledgment.
// ==========================================
// Stateless apart from the ceiling; never touches the silo ledger.
// ==========================================

use crate::domain::operation::Operation;
use crate::domain::types::OperationState;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lifecycle::OperationLifecycle;
use tracing::{info, instrument, warn};

pub struct WeighingEngine {
    soft_ceiling_kg: f64,
}

impl WeighingEngine {
    pub fn new(soft_ceiling_kg: f64) -> Self {
        Self { soft_ceiling_kg }
    }

    pub fn soft_ceiling_kg(&self) -> f64 {
        self.soft_ceiling_kg
    }

    // ==========================================
    // Reading validation
    // ==========================================

    /// A reading must be a finite number strictly above zero.
    pub fn validate_weight(weight_kg: f64) -> EngineResult<f64> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(EngineError::InvalidWeight { value: weight_kg });
        }
        Ok(weight_kg)
    }

    /// Soft limit: fails with `WeightTooHigh` unless the operator acknowledged it.
    pub fn check_soft_ceiling(&self, weight_kg: f64, acknowledged: bool) -> EngineResult<()> {
        if weight_kg > self.soft_ceiling_kg {
            if !acknowledged {
                return Err(EngineError::WeightTooHigh {
                    weight_kg,
                    ceiling_kg: self.soft_ceiling_kg,
                });
            }
            warn!(
                weight_kg,
                ceiling_kg = self.soft_ceiling_kg,
                "reading above soft ceiling accepted by operator"
            );
        }
        Ok(())
    }

    fn validate_reading(&self, weight_kg: f64, acknowledged: bool) -> EngineResult<f64> {
        let w = Self::validate_weight(weight_kg)?;
        self.check_soft_ceiling(w, acknowledged)?;
        Ok(w)
    }

    // ==========================================
    // Gross
    // ==========================================

    /// Records the loaded weight and moves the operation to GROSS_RECORDED.
    ///
    /// Nothing on `op` changes when validation fails.
    #[instrument(skip(self, op), fields(operation_id = %op.id, plate = %op.plate))]
    pub fn record_gross(
        &self,
        op: &mut Operation,
        weight_kg: f64,
        acknowledged: bool,
    ) -> EngineResult<()> {
        OperationLifecycle::require_state(
            op,
            OperationState::QualityOk,
            OperationState::GrossRecorded,
        )?;
        let w = self.validate_reading(weight_kg, acknowledged)?;

        op.gross_kg = w;
        OperationLifecycle::transition(op, OperationState::GrossRecorded)?;
        info!(gross_kg = w, "gross recorded");
        Ok(())
    }

    /// Replaces the gross reading of an operation waiting for its tare.
    #[instrument(skip(self, op), fields(operation_id = %op.id, plate = %op.plate))]
    pub fn correct_gross(
        &self,
        op: &mut Operation,
        weight_kg: f64,
        acknowledged: bool,
    ) -> EngineResult<()> {
        OperationLifecycle::require_state(
            op,
            OperationState::GrossRecorded,
            OperationState::GrossRecorded,
        )?;
        let w = self.validate_reading(weight_kg, acknowledged)?;

        let previous = op.gross_kg;
        op.gross_kg = w;
        info!(previous_kg = previous, gross_kg = w, "gross corrected");
        Ok(())
    }

    // ==========================================
    // Tare
    // ==========================================

    /// Validates a tare reading and returns the net load.
    ///
    /// Order: positive number first, then strictly below gross.
    pub fn validate_tare(&self, op: &Operation, tare_kg: f64) -> EngineResult<f64> {
        OperationLifecycle::require_state(
            op,
            OperationState::GrossRecorded,
            OperationState::Completed,
        )?;
        let tare = Self::validate_weight(tare_kg)?;
        if tare >= op.gross_kg {
            return Err(EngineError::TareExceedsGross {
                gross_kg: op.gross_kg,
                tare_kg: tare,
            });
        }
        Ok(op.gross_kg - tare)
    }

    /// Stores the tare and closes the operation.
    ///
    /// Callers run this only after the distribution for the same tare
    /// has been applied to the silos.
    pub fn complete(&self, op: &mut Operation, tare_kg: f64) -> EngineResult<f64> {
        let net = self.validate_tare(op, tare_kg)?;
        op.tare_kg = tare_kg;
        OperationLifecycle::transition(op, OperationState::Completed)?;
        Ok(net)
    }
}

impl Default for WeighingEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SOFT_CEILING_KG)
    }
}
