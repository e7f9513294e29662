// ==========================================
// Grain Receiving - Report API
// ==========================================

use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::engine::report::{ReceivingReport, ReportBuilder, ReportPeriod};
use crate::repository::master_repo::MasterDataRepository;
use crate::repository::operation_repo::OperationRepository;

pub struct ReportApi {
    operation_repo: Arc<OperationRepository>,
    master_repo: Arc<MasterDataRepository>,
}

impl ReportApi {
    pub fn new(
        operation_repo: Arc<OperationRepository>,
        master_repo: Arc<MasterDataRepository>,
    ) -> Self {
        Self {
            operation_repo,
            master_repo,
        }
    }

    /// Receiving summary for one quota day or for the whole history.
    pub fn receiving_report(&self, period: ReportPeriod) -> ApiResult<ReceivingReport> {
        let operations = self.operation_repo.load()?;
        let products = self.master_repo.products()?;
        Ok(ReportBuilder::build(period, operations.list(), &products))
    }
}
