// ==========================================
// Grain Receiving - Weighbridge API
// ==========================================
// Gross:  QUALITY_OK -> GROSS_RECORDED (no silo change)
// Tare:   validate -> capacity -> cascade plan -> commit
// Commit writes operations and silos in one combined store write.
// ==========================================
// A plan spanning several silos is returned for confirmation when the
// facility policy asks for it; the caller commits it explicitly or
// simply drops it (dropping writes nothing).
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{ConfigManager, FacilityConfig};
use crate::domain::distribution::DistributionPlan;
use crate::domain::master::product_display_name;
use crate::domain::operation::Operation;
use crate::domain::types::{OperationState, WeighingStep};
use crate::engine::lifecycle::{OperationLifecycle, Station};
use crate::engine::silo_allocator::{SiloAllocator, WEIGHT_EPSILON_KG};
use crate::engine::stock_ledger::StockLedger;
use crate::engine::weighing::WeighingEngine;
use crate::repository::kv_store::KeyValueStore;
use crate::repository::master_repo::MasterDataRepository;
use crate::repository::operation_repo::OperationRepository;
use crate::repository::silo_repo::SiloRepository;
use crate::repository::table::Table;
use crate::repository::unit_of_work::UnitOfWork;

// ==========================================
// View types
// ==========================================

/// One row of the weighbridge work list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighingQueueEntry {
    pub operation_id: String,
    pub plate: String,
    pub product_code: String,
    pub product_name: String,
    pub state: OperationState,
    pub pending_step: WeighingStep,
    pub gross_kg: f64,
}

/// A proposed distribution and whether it needs operator confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TareProposal {
    pub plan: DistributionPlan,
    pub requires_confirmation: bool,
}

/// Result of entering a tare reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TareOutcome {
    /// Distribution applied, operation COMPLETED.
    Completed {
        operation: Operation,
        plan: DistributionPlan,
    },
    /// Nothing written yet; commit the plan once the operator agrees.
    ConfirmationRequired(DistributionPlan),
}

// ==========================================
// WeighingApi
// ==========================================
pub struct WeighingApi {
    store: Arc<dyn KeyValueStore>,
    operation_repo: Arc<OperationRepository>,
    silo_repo: Arc<SiloRepository>,
    master_repo: Arc<MasterDataRepository>,
    config_manager: Arc<ConfigManager>,
}

impl WeighingApi {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        operation_repo: Arc<OperationRepository>,
        silo_repo: Arc<SiloRepository>,
        master_repo: Arc<MasterDataRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            store,
            operation_repo,
            silo_repo,
            master_repo,
            config_manager,
        }
    }

    fn facility_config(&self) -> ApiResult<FacilityConfig> {
        Ok(self.config_manager.load_facility_config()?)
    }

    /// Id of today's weighing-queue operation for `plate`.
    fn queued_operation_id(
        table: &Table<Operation>,
        plate: &str,
        today: NaiveDate,
    ) -> ApiResult<String> {
        table
            .find(|op| {
                op.matches(plate, today)
                    && OperationLifecycle::is_visible_to(op, Station::Weighing, today)
            })
            .map(|op| op.id.clone())
            .ok_or_else(|| {
                ApiError::NotFound(format!("truck {} in the weighing queue on {}", plate, today))
            })
    }

    // ==========================================
    // Queue
    // ==========================================

    pub fn list_queue(&self, today: NaiveDate) -> ApiResult<Vec<WeighingQueueEntry>> {
        let table = self.operation_repo.load()?;
        let products = self.master_repo.products()?;

        Ok(
            OperationLifecycle::station_queue(table.iter(), Station::Weighing, today)
                .into_iter()
                .filter_map(|op| {
                    OperationLifecycle::pending_weighing_step(op).map(|step| WeighingQueueEntry {
                        operation_id: op.id.clone(),
                        plate: op.plate.clone(),
                        product_code: op.product_code.clone(),
                        product_name: product_display_name(&products, &op.product_code),
                        state: op.state,
                        pending_step: step,
                        gross_kg: op.gross_kg,
                    })
                })
                .collect(),
        )
    }

    // ==========================================
    // Gross
    // ==========================================

    /// Records the loaded weight. `acknowledged` overrides the soft ceiling.
    #[instrument(skip(self))]
    pub fn record_gross(
        &self,
        plate: &str,
        today: NaiveDate,
        weight_kg: f64,
        acknowledged: bool,
    ) -> ApiResult<Operation> {
        let engine = WeighingEngine::new(self.facility_config()?.soft_ceiling_kg);
        let mut table = self.operation_repo.load()?;
        let id = Self::queued_operation_id(&table, plate, today)?;

        let op = table.update(&id, |op| {
            engine
                .record_gross(op, weight_kg, acknowledged)
                .map(|_| op.clone())
        })??;
        self.operation_repo.save(&table)?;
        Ok(op)
    }

    /// Revises the gross of a truck still waiting for its tare.
    #[instrument(skip(self))]
    pub fn correct_gross(
        &self,
        plate: &str,
        today: NaiveDate,
        weight_kg: f64,
        acknowledged: bool,
    ) -> ApiResult<Operation> {
        let engine = WeighingEngine::new(self.facility_config()?.soft_ceiling_kg);
        let mut table = self.operation_repo.load()?;
        let id = Self::queued_operation_id(&table, plate, today)?;

        let op = table.update(&id, |op| {
            engine
                .correct_gross(op, weight_kg, acknowledged)
                .map(|_| op.clone())
        })??;
        self.operation_repo.save(&table)?;
        Ok(op)
    }

    // ==========================================
    // Tare: propose
    // ==========================================

    /// Validates the tare and builds the distribution. Writes nothing.
    #[instrument(skip(self))]
    pub fn propose_tare(
        &self,
        plate: &str,
        today: NaiveDate,
        tare_kg: f64,
    ) -> ApiResult<TareProposal> {
        let config = self.facility_config()?;
        let table = self.operation_repo.load()?;
        let id = Self::queued_operation_id(&table, plate, today)?;
        let op = table
            .get(&id)
            .ok_or_else(|| ApiError::NotFound(format!("operation {}", id)))?;

        let engine = WeighingEngine::new(config.soft_ceiling_kg);
        engine.validate_tare(op, tare_kg)?;

        let silos = self.silo_repo.load()?;
        let plan = SiloAllocator::new(config.silo_order).propose(op, tare_kg, silos.list())?;
        let requires_confirmation = plan.requires_confirmation(config.confirm_multi_silo);

        Ok(TareProposal {
            plan,
            requires_confirmation,
        })
    }

    // ==========================================
    // Tare: commit
    // ==========================================

    /// Applies a plan: silo stock, tare and COMPLETED land in one write.
    ///
    /// The plan is checked against the current store first; if the
    /// operation or any affected silo changed since it was proposed, the
    /// truck left today's weighing queue, or the portions no longer add up
    /// to gross minus tare, the commit fails with `StaleDistributionPlan`
    /// and nothing is written.
    #[instrument(skip(self, plan), fields(
        operation_id = %plan.operation_id,
        net_kg = plan.net_kg,
        silos = plan.entries.len()
    ))]
    pub fn commit_distribution(
        &self,
        plan: &DistributionPlan,
        today: NaiveDate,
    ) -> ApiResult<Operation> {
        let engine = WeighingEngine::new(self.facility_config()?.soft_ceiling_kg);
        let mut operations = self.operation_repo.load()?;
        let mut silos = self.silo_repo.load()?;

        let current = operations.get(&plan.operation_id).ok_or_else(|| {
            ApiError::StaleDistributionPlan(format!("operation {} no longer exists", plan.operation_id))
        })?;
        if current.state != OperationState::GrossRecorded
            || current.product_code != plan.product_code
            || (current.gross_kg - plan.gross_kg).abs() > WEIGHT_EPSILON_KG
        {
            warn!(state = %current.state, gross_kg = current.gross_kg, "operation changed since proposal");
            return Err(ApiError::StaleDistributionPlan(format!(
                "operation {} is {} with gross {}kg",
                current.id, current.state, current.gross_kg
            )));
        }
        if !OperationLifecycle::is_visible_to(current, Station::Weighing, today) {
            warn!(quota_date = %current.quota_date, %today, "operation left the weighing queue");
            return Err(ApiError::StaleDistributionPlan(format!(
                "operation {} has quota date {}, not {}",
                current.id, current.quota_date, today
            )));
        }

        let net_kg = current.gross_kg - plan.tare_kg;
        let distributed_kg = plan.distributed_kg();
        if (plan.net_kg - net_kg).abs() > WEIGHT_EPSILON_KG
            || (distributed_kg - net_kg).abs() > WEIGHT_EPSILON_KG
        {
            warn!(net_kg, distributed_kg, "plan does not distribute the net load");
            return Err(ApiError::StaleDistributionPlan(format!(
                "plan distributes {}kg of a {}kg net load",
                distributed_kg, net_kg
            )));
        }

        SiloAllocator::apply_plan(plan, silos.as_mut_slice())?;
        let broken: Vec<String> = StockLedger::inconsistent_silos(silos.list())
            .into_iter()
            .filter(|id| plan.entries.iter().any(|e| &e.silo_id == id))
            .collect();
        if !broken.is_empty() {
            return Err(ApiError::InternalError(format!(
                "silos out of bounds after distribution: {}",
                broken.join(", ")
            )));
        }

        let operation = operations.update(&plan.operation_id, |op| {
            engine.complete(op, plan.tare_kg).map(|_| op.clone())
        })??;

        let mut uow = UnitOfWork::new(self.store.as_ref());
        uow.stage(&operations)?.stage(&silos)?;
        uow.commit()?;

        info!(
            plate = %operation.plate,
            distribution = ?plan.log_lines(),
            "weighing completed"
        );
        Ok(operation)
    }

    /// Tare entry as the scale operator sees it.
    ///
    /// Plans that need no confirmation are committed right away.
    pub fn record_tare(
        &self,
        plate: &str,
        today: NaiveDate,
        tare_kg: f64,
    ) -> ApiResult<TareOutcome> {
        let proposal = self.propose_tare(plate, today, tare_kg)?;
        if proposal.requires_confirmation {
            info!(
                plate,
                silos = proposal.plan.silos_affected(),
                "split distribution awaiting confirmation"
            );
            return Ok(TareOutcome::ConfirmationRequired(proposal.plan));
        }

        let operation = self.commit_distribution(&proposal.plan, today)?;
        Ok(TareOutcome::Completed {
            operation,
            plan: proposal.plan,
        })
    }
}
