// ==========================================
// Grain Receiving - API Layer
// ==========================================
// One API object per station. Each call loads what it needs from the
// store, runs the engines and writes back on success only.
// ==========================================

pub mod error;
pub mod intake_api;
pub mod quality_api;
pub mod report_api;
pub mod silo_api;
pub mod weighing_api;

// Re-exports
pub use error::{ApiError, ApiResult};
pub use intake_api::{validate_plate, IntakeApi};
pub use quality_api::{QualityApi, QualityOutcome, RubricVerdictView};
pub use report_api::ReportApi;
pub use silo_api::{SiloApi, SiloOccupancy};
pub use weighing_api::{TareOutcome, TareProposal, WeighingApi, WeighingQueueEntry};
