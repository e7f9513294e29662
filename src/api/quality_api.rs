// ==========================================
// Grain Receiving - Quality Inspection API
// ==========================================
// ARRIVED trucks are sampled once; the verdict moves them to
// QUALITY_OK (on to the scale) or REJECTED (terminal).
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::operation::Operation;
use crate::domain::types::OperationState;
use crate::engine::lifecycle::{OperationLifecycle, Station};
use crate::engine::quality::{QualityEvaluator, RubricResult};
use crate::repository::master_repo::MasterDataRepository;
use crate::repository::operation_repo::OperationRepository;

/// Verdict row shown to the inspector, with the rubric's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricVerdictView {
    pub rubric_code: String,
    pub rubric_name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityOutcome {
    pub operation: Operation,
    pub accepted: bool,
    pub rubrics: Vec<RubricVerdictView>,
}

pub struct QualityApi {
    operation_repo: Arc<OperationRepository>,
    master_repo: Arc<MasterDataRepository>,
}

impl QualityApi {
    pub fn new(
        operation_repo: Arc<OperationRepository>,
        master_repo: Arc<MasterDataRepository>,
    ) -> Self {
        Self {
            operation_repo,
            master_repo,
        }
    }

    /// Today's trucks waiting for sampling.
    pub fn list_quality_queue(&self, today: NaiveDate) -> ApiResult<Vec<Operation>> {
        let table = self.operation_repo.load()?;
        Ok(OperationLifecycle::station_queue(table.iter(), Station::Quality, today)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Evaluates the sample and records the verdict on the operation.
    ///
    /// Nothing is written when a rubric value is missing.
    #[instrument(skip(self, values), fields(rubrics = values.len()))]
    pub fn register_quality(
        &self,
        plate: &str,
        today: NaiveDate,
        values: &BTreeMap<String, f64>,
    ) -> ApiResult<QualityOutcome> {
        let mut table = self.operation_repo.load()?;
        let (id, product_code) = table
            .find(|op| {
                op.matches(plate, today)
                    && OperationLifecycle::is_visible_to(op, Station::Quality, today)
            })
            .map(|op| (op.id.clone(), op.product_code.clone()))
            .ok_or_else(|| {
                ApiError::NotFound(format!("arrived truck {} on {}", plate, today))
            })?;

        let ranges = self.master_repo.ranges_for_product(&product_code)?;
        let verdict = QualityEvaluator::evaluate(&ranges, values)?;

        let next = if verdict.accepted {
            OperationState::QualityOk
        } else {
            OperationState::Rejected
        };
        let operation = table.update(&id, |op| {
            OperationLifecycle::transition(op, next).map(|_| op.clone())
        })??;
        self.operation_repo.save(&table)?;

        info!(
            operation_id = %operation.id,
            accepted = verdict.accepted,
            failed = verdict.failed_count(),
            "quality registered"
        );

        let rubric_names = self.master_repo.rubrics()?;
        let rubrics = verdict
            .results
            .into_iter()
            .map(|r: RubricResult| {
                let rubric_name = rubric_names
                    .iter()
                    .find(|rb| rb.code == r.rubric_code)
                    .map(|rb| rb.name.clone())
                    .unwrap_or_else(|| r.rubric_code.clone());
                RubricVerdictView {
                    rubric_code: r.rubric_code,
                    rubric_name,
                    value: r.value,
                    min: r.min,
                    max: r.max,
                    passed: r.passed,
                }
            })
            .collect();

        Ok(QualityOutcome {
            operation,
            accepted: verdict.accepted,
            rubrics,
        })
    }
}
