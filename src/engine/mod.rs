// ==========================================
// Grain Receiving - Engine Layer
// ==========================================
// Business rules only: engines work on loaded records and never read
// or write the store themselves.
// ==========================================

pub mod capacity;
pub mod error;
pub mod lifecycle;
pub mod quality;
pub mod report;
pub mod silo_allocator;
pub mod stock_ledger;
pub mod weighing;

pub use capacity::{total_available_kg, validate_capacity};
pub use error::{EngineError, EngineResult};
pub use lifecycle::{OperationLifecycle, Station};
pub use quality::{QualityEvaluator, QualityVerdict, RubricResult};
pub use report::{ProductSummary, ReceivingReport, ReportBuilder, ReportPeriod};
pub use silo_allocator::{SiloAllocator, WEIGHT_EPSILON_KG};
pub use stock_ledger::StockLedger;
pub use weighing::WeighingEngine;
