// ==========================================
// Grain Receiving - Silo Monitoring API
// ==========================================
// Occupancy view, manual stock-out and the rejection list.
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::ApiResult;
use crate::domain::master::product_display_name;
use crate::domain::operation::Operation;
use crate::domain::silo::{Silo, SiloCapacity};
use crate::domain::types::OperationState;
use crate::engine::stock_ledger::StockLedger;
use crate::repository::master_repo::MasterDataRepository;
use crate::repository::operation_repo::OperationRepository;
use crate::repository::silo_repo::SiloRepository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiloOccupancy {
    pub silo_id: String,
    pub silo_name: String,
    pub product_code: String,
    pub product_name: String,
    pub stock_kg: f64,
    pub capacity_kg: f64,
    pub free_kg: f64,
    pub fill_percent: f64,
}

impl SiloOccupancy {
    fn from_silo(silo: &Silo, product_name: String) -> Self {
        Self {
            silo_id: silo.id.clone(),
            silo_name: silo.name.clone(),
            product_code: silo.product_code.clone(),
            product_name,
            stock_kg: silo.stock_kg,
            capacity_kg: silo.capacity_kg,
            free_kg: silo.free_kg(),
            fill_percent: silo.fill_percent(),
        }
    }
}

pub struct SiloApi {
    silo_repo: Arc<SiloRepository>,
    operation_repo: Arc<OperationRepository>,
    master_repo: Arc<MasterDataRepository>,
}

impl SiloApi {
    pub fn new(
        silo_repo: Arc<SiloRepository>,
        operation_repo: Arc<OperationRepository>,
        master_repo: Arc<MasterDataRepository>,
    ) -> Self {
        Self {
            silo_repo,
            operation_repo,
            master_repo,
        }
    }

    /// Every silo in stored order.
    pub fn list_silos(&self) -> ApiResult<Vec<SiloOccupancy>> {
        let products = self.master_repo.products()?;
        Ok(self
            .silo_repo
            .load()?
            .iter()
            .map(|s| SiloOccupancy::from_silo(s, product_display_name(&products, &s.product_code)))
            .collect())
    }

    /// Manual stock-out. Touches no operation.
    #[instrument(skip(self))]
    pub fn stock_out(&self, silo_id: &str, amount_kg: f64) -> ApiResult<SiloOccupancy> {
        let mut silos = self.silo_repo.load()?;
        let silo = silos.update(silo_id, |silo| {
            StockLedger::withdraw(silo, amount_kg).map(|_| silo.clone())
        })??;
        self.silo_repo.save(&silos)?;

        let products = self.master_repo.products()?;
        Ok(SiloOccupancy::from_silo(
            &silo,
            product_display_name(&products, &silo.product_code),
        ))
    }

    /// Rejected trucks, for one quota day or all of them.
    pub fn list_rejections(&self, date: Option<NaiveDate>) -> ApiResult<Vec<Operation>> {
        let operations = match date {
            Some(d) => self.operation_repo.list_by_date(d)?,
            None => self.operation_repo.load()?.list().to_vec(),
        };
        Ok(operations
            .into_iter()
            .filter(|op| op.state == OperationState::Rejected)
            .collect())
    }
}
