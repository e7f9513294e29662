// ==========================================
// Grain Receiving - Quota Intake & Gate API
// ==========================================
// grant_quota:  creates a PENDING operation for a plate/product/day
// mark_arrived: the truck shows up at the gate on its quota day
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::operation::Operation;
use crate::domain::types::OperationState;
use crate::engine::lifecycle::{OperationLifecycle, Station};
use crate::repository::master_repo::MasterDataRepository;
use crate::repository::operation_repo::OperationRepository;

pub const MIN_PLATE_LEN: usize = 6;

// Old format `AAA 123` and Mercosur `AA 123 BB`, one optional space per gap
static PLATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([A-Z]{3}\s?\d{3}|[A-Z]{2}\s?\d{3}\s?[A-Z]{2})$")
        .expect("plate pattern is a valid regex")
});

/// Checks plate length and format.
pub fn validate_plate(plate: &str) -> ApiResult<()> {
    if plate.chars().count() < MIN_PLATE_LEN {
        return Err(ApiError::InvalidPlate(format!(
            "{} (at least {} characters)",
            plate, MIN_PLATE_LEN
        )));
    }
    if !PLATE_PATTERN.is_match(plate) {
        return Err(ApiError::InvalidPlate(format!(
            "{} (expected AAA 123 or AA 123 BB)",
            plate
        )));
    }
    Ok(())
}

// ==========================================
// IntakeApi
// ==========================================
pub struct IntakeApi {
    operation_repo: Arc<OperationRepository>,
    master_repo: Arc<MasterDataRepository>,
}

impl IntakeApi {
    pub fn new(
        operation_repo: Arc<OperationRepository>,
        master_repo: Arc<MasterDataRepository>,
    ) -> Self {
        Self {
            operation_repo,
            master_repo,
        }
    }

    /// Grants a quota.
    ///
    /// Fails on a malformed plate, on a plate that already holds an open
    /// quota that day, and on unknown or inactive products.
    #[instrument(skip(self))]
    pub fn grant_quota(
        &self,
        plate: &str,
        product_code: &str,
        quota_date: NaiveDate,
    ) -> ApiResult<Operation> {
        let plate = plate.trim();
        validate_plate(plate)?;

        if self.operation_repo.find_active(plate, quota_date)?.is_some() {
            warn!(plate, %quota_date, "duplicate quota refused");
            return Err(ApiError::DuplicateQuota {
                plate: plate.to_uppercase(),
                date: quota_date.to_string(),
            });
        }

        match self.master_repo.find_product(product_code)? {
            Some(product) if product.is_active() => {}
            _ => return Err(ApiError::InactiveProduct(product_code.to_string())),
        }

        let op = Operation::new_quota(plate, product_code, quota_date);
        let mut table = self.operation_repo.load()?;
        table.insert(op.clone())?;
        self.operation_repo.save(&table)?;

        info!(operation_id = %op.id, plate = %op.plate, product_code, %quota_date, "quota granted");
        Ok(op)
    }

    /// Today's quotas whose truck has not arrived yet.
    pub fn list_gate_queue(&self, today: NaiveDate) -> ApiResult<Vec<Operation>> {
        let table = self.operation_repo.load()?;
        Ok(OperationLifecycle::station_queue(table.iter(), Station::Gate, today)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Registers the truck at the gate: PENDING -> ARRIVED.
    #[instrument(skip(self))]
    pub fn mark_arrived(&self, plate: &str, today: NaiveDate) -> ApiResult<Operation> {
        let mut table = self.operation_repo.load()?;
        let id = table
            .find(|op| op.matches(plate, today) && OperationLifecycle::is_visible_to(op, Station::Gate, today))
            .map(|op| op.id.clone())
            .ok_or_else(|| {
                ApiError::NotFound(format!("pending quota for plate {} on {}", plate, today))
            })?;

        let op = table.update(&id, |op| {
            OperationLifecycle::transition(op, OperationState::Arrived).map(|_| op.clone())
        })??;
        self.operation_repo.save(&table)?;
        Ok(op)
    }
}
