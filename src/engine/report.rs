// ==========================================
// Grain Receiving - Receiving Report
// ==========================================
// Counts over one quota day (or every day):
//   received   = not PENDING and not REJECTED
//   compliance = received / quotas, whole percent
// Per product: net totals only count COMPLETED operations.
// ==========================================

use crate::domain::master::Product;
use crate::domain::operation::Operation;
use crate::domain::types::OperationState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which quota days a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    Day(NaiveDate),
    AllDates,
}

impl ReportPeriod {
    pub fn includes(&self, op: &Operation) -> bool {
        match self {
            ReportPeriod::Day(date) => op.quota_date == *date,
            ReportPeriod::AllDates => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_code: String,
    pub product_name: String,
    pub operations: usize,
    pub rejected: usize,
    pub completed: usize,
    pub net_total_kg: f64,
    pub net_average_kg: f64, // rounded to whole KG, 0 when nothing completed
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivingReport {
    pub period: ReportPeriod,
    pub quotas: usize,
    pub received: usize,
    pub rejected: usize,
    pub compliance_percent: u32,
    pub products: Vec<ProductSummary>, // one per product, master-data order
}

pub struct ReportBuilder;

impl ReportBuilder {
    pub fn build(
        period: ReportPeriod,
        operations: &[Operation],
        products: &[Product],
    ) -> ReceivingReport {
        let selected: Vec<&Operation> = operations.iter().filter(|op| period.includes(op)).collect();

        let quotas = selected.len();
        let received = selected
            .iter()
            .filter(|op| !matches!(op.state, OperationState::Pending | OperationState::Rejected))
            .count();
        let rejected = selected
            .iter()
            .filter(|op| op.state == OperationState::Rejected)
            .count();

        let compliance_percent = if quotas > 0 {
            ((received as f64 / quotas as f64) * 100.0).round() as u32
        } else {
            0
        };

        let products = products
            .iter()
            .map(|product| Self::summarize_product(product, &selected))
            .collect();

        ReceivingReport {
            period,
            quotas,
            received,
            rejected,
            compliance_percent,
            products,
        }
    }

    fn summarize_product(product: &Product, selected: &[&Operation]) -> ProductSummary {
        let ops: Vec<&&Operation> = selected
            .iter()
            .filter(|op| op.product_code == product.code)
            .collect();

        let rejected = ops
            .iter()
            .filter(|op| op.state == OperationState::Rejected)
            .count();
        let nets: Vec<f64> = ops.iter().filter_map(|op| op.net_kg()).collect();
        let net_total_kg: f64 = nets.iter().sum();
        let net_average_kg = if nets.is_empty() {
            0.0
        } else {
            (net_total_kg / nets.len() as f64).round()
        };

        ProductSummary {
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            operations: ops.len(),
            rejected,
            completed: nets.len(),
            net_total_kg,
            net_average_kg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductStatus;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn op(product: &str, state: OperationState, gross: f64, tare: f64, date: NaiveDate) -> Operation {
        let mut op = Operation::new_quota("AAA123", product, date);
        op.state = state;
        op.gross_kg = gross;
        op.tare_kg = tare;
        op
    }

    fn products() -> Vec<Product> {
        vec![
            Product {
                code: "SOJA".to_string(),
                name: "SOJA".to_string(),
                status: ProductStatus::Active,
            },
            Product {
                code: "MAIZ".to_string(),
                name: "MAIZ".to_string(),
                status: ProductStatus::Active,
            },
        ]
    }

    #[test]
    fn test_daily_counts() {
        let ops = vec![
            op("SOJA", OperationState::Completed, 30_000.0, 10_000.0, day()),
            op("SOJA", OperationState::Completed, 25_000.0, 10_000.0, day()),
            op("SOJA", OperationState::Rejected, 0.0, 0.0, day()),
            op("MAIZ", OperationState::Pending, 0.0, 0.0, day()),
            op("MAIZ", OperationState::Arrived, 0.0, 0.0, day()),
            op("MAIZ", OperationState::Completed, 40_000.0, 10_000.0, day().succ_opt().unwrap()),
        ];
        let report = ReportBuilder::build(ReportPeriod::Day(day()), &ops, &products());

        assert_eq!(report.quotas, 5);
        assert_eq!(report.received, 3);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.compliance_percent, 60);

        let soja = &report.products[0];
        assert_eq!(soja.operations, 3);
        assert_eq!(soja.rejected, 1);
        assert_eq!(soja.net_total_kg, 35_000.0);
        assert_eq!(soja.net_average_kg, 17_500.0);

        let maiz = &report.products[1];
        assert_eq!(maiz.operations, 2);
        assert_eq!(maiz.net_total_kg, 0.0);
        assert_eq!(maiz.net_average_kg, 0.0);
    }

    #[test]
    fn test_all_dates() {
        let ops = vec![
            op("MAIZ", OperationState::Completed, 40_000.0, 10_000.0, day()),
            op("MAIZ", OperationState::Completed, 40_000.0, 10_000.0, day().succ_opt().unwrap()),
        ];
        let report = ReportBuilder::build(ReportPeriod::AllDates, &ops, &products());
        assert_eq!(report.quotas, 2);
        assert_eq!(report.compliance_percent, 100);
        assert_eq!(report.products[1].net_total_kg, 60_000.0);
    }

    #[test]
    fn test_empty_day() {
        let report = ReportBuilder::build(ReportPeriod::Day(day()), &[], &products());
        assert_eq!(report.quotas, 0);
        assert_eq!(report.compliance_percent, 0);
    }
}
