// ==========================================
// Grain Receiving - Domain Layer
// ==========================================
// Entities, value types and capacity rules.
// No storage access, no engine logic.
// ==========================================

pub mod distribution;
pub mod master;
pub mod operation;
pub mod silo;
pub mod types;

// Re-exports
pub use distribution::{DistributionEntry, DistributionPlan};
pub use master::{product_display_name, Product, QualityRange, QualityRubric};
pub use operation::{normalize_plate, Operation};
pub use silo::{Silo, SiloCapacity};
pub use types::{OperationState, ProductStatus, SiloOrder, WeighingStep};
