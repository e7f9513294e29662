// ==========================================
// Test helpers
// ==========================================
// Store setup (temp SQLite file or in-memory), master data fixtures
// and shortcuts that walk a truck up to a given lifecycle stage.
// ==========================================
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use grain_receiving::app::AppState;
use grain_receiving::domain::{
    Operation, Product, ProductStatus, QualityRange, QualityRubric, Silo,
};
use grain_receiving::repository::{
    InMemoryKvStore, OperationRepository, SiloRepository, Table,
};

/// Temp SQLite-backed state.
///
/// # Returns
/// - NamedTempFile: keep it alive for the duration of the test
/// - AppState
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();
    let state = AppState::new(db_path)?;
    Ok((temp_file, state))
}

pub fn in_memory_state() -> AppState {
    AppState::with_store(":memory:".to_string(), Arc::new(InMemoryKvStore::new()))
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

// ==========================================
// Fixtures
// ==========================================

pub fn silo(id: &str, name: &str, product: &str, stock: f64, capacity: f64) -> Silo {
    Silo {
        id: id.to_string(),
        name: name.to_string(),
        product_code: product.to_string(),
        stock_kg: stock,
        capacity_kg: capacity,
    }
}

fn product(code: &str, status: ProductStatus) -> Product {
    Product {
        code: code.to_string(),
        name: format!("{} GRANO", code),
        status,
    }
}

fn range(product: &str, rubric: &str, min: f64, max: f64) -> QualityRange {
    QualityRange {
        product_code: product.to_string(),
        rubric_code: rubric.to_string(),
        min,
        max,
    }
}

/// SOJA and MAIZ active, TRIGO inactive.
/// SOJA is graded on HUM [0, 14] and CE [0, 1]; MAIZ only on HUM [0, 15].
pub fn seed_master_data(state: &AppState) {
    state
        .master_repo
        .save_products(vec![
            product("SOJA", ProductStatus::Active),
            product("MAIZ", ProductStatus::Active),
            product("TRIGO", ProductStatus::Inactive),
        ])
        .unwrap();
    state
        .master_repo
        .save_rubrics(vec![
            QualityRubric {
                code: "HUM".to_string(),
                name: "HUMEDAD".to_string(),
            },
            QualityRubric {
                code: "CE".to_string(),
                name: "CUERPOS EXTRANOS".to_string(),
            },
        ])
        .unwrap();
    state
        .master_repo
        .save_quality_ranges(vec![
            range("SOJA", "HUM", 0.0, 14.0),
            range("SOJA", "CE", 0.0, 1.0),
            range("MAIZ", "HUM", 0.0, 15.0),
        ])
        .unwrap();
}

pub fn set_silos(state: &AppState, silos: Vec<Silo>) {
    SiloRepository::new(state.store.clone())
        .save(&Table::from_rows(silos))
        .unwrap();
}

pub fn load_silos(state: &AppState) -> Vec<Silo> {
    SiloRepository::new(state.store.clone())
        .load()
        .unwrap()
        .into_rows()
}

pub fn load_operation(state: &AppState, id: &str) -> Operation {
    OperationRepository::new(state.store.clone())
        .load()
        .unwrap()
        .get(id)
        .cloned()
        .unwrap()
}

pub fn passing_sample() -> BTreeMap<String, f64> {
    [("HUM".to_string(), 12.0), ("CE".to_string(), 0.5)]
        .into_iter()
        .collect()
}

// ==========================================
// Lifecycle shortcuts
// ==========================================

/// Quota granted, arrived and accepted: ready for the gross reading.
pub fn truck_at_scale(state: &AppState, plate: &str, product: &str) -> Operation {
    state.intake_api.grant_quota(plate, product, today()).unwrap();
    state.intake_api.mark_arrived(plate, today()).unwrap();
    let outcome = state
        .quality_api
        .register_quality(plate, today(), &passing_sample())
        .unwrap();
    assert!(outcome.accepted);
    outcome.operation
}

/// Like `truck_at_scale`, with the gross already recorded.
pub fn truck_loaded(state: &AppState, plate: &str, product: &str, gross_kg: f64) -> Operation {
    truck_at_scale(state, plate, product);
    state
        .weighing_api
        .record_gross(plate, today(), gross_kg, true)
        .unwrap()
}
