// ==========================================
// Grain Receiving - Demo Store Seeder
// ==========================================
// Usage: seed_demo_store [db_path]
// Backs up an existing store, then writes demo master data, silos and
// a handful of quotas for today.
// ==========================================

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, Utc};

use grain_receiving::app::{get_default_db_path, AppState};
use grain_receiving::domain::{Product, ProductStatus, QualityRange, QualityRubric, Silo};
use grain_receiving::repository::{SiloRepository, Table};

fn main() -> anyhow::Result<()> {
    grain_receiving::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    backup_and_reset(&db_path)?;

    let state = AppState::new(db_path.clone())
        .with_context(|| format!("cannot open store at {}", db_path))?;

    state.master_repo.save_products(products())?;
    state.master_repo.save_rubrics(rubrics())?;
    state.master_repo.save_quality_ranges(ranges())?;
    SiloRepository::new(Arc::clone(&state.store)).save(&Table::from_rows(silos()))?;

    let today = Utc::now().date_naive();
    for (plate, product) in [("AAA 123", "SOJA"), ("AB 123 CD", "SOJA"), ("MZR 456", "MAIZ")] {
        state.intake_api.grant_quota(plate, product, today)?;
    }

    eprintln!("Seeded {}", db_path);
    for silo in state.silo_api.list_silos()? {
        eprintln!(
            "  {} ({}) {:.0}/{:.0} kg",
            silo.silo_name, silo.product_name, silo.stock_kg, silo.capacity_kg
        );
    }
    Ok(())
}

fn backup_and_reset(db_path: &str) -> anyhow::Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn products() -> Vec<Product> {
    [("SOJA", "SOJA", ProductStatus::Active), ("MAIZ", "MAIZ", ProductStatus::Active), ("TRIGO", "TRIGO", ProductStatus::Inactive)]
        .into_iter()
        .map(|(code, name, status)| Product {
            code: code.to_string(),
            name: name.to_string(),
            status,
        })
        .collect()
}

fn rubrics() -> Vec<QualityRubric> {
    [("HUM", "HUMEDAD"), ("CE", "CUERPOS EXTRANOS"), ("PH", "PESO HECTOLITRICO")]
        .into_iter()
        .map(|(code, name)| QualityRubric {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

fn ranges() -> Vec<QualityRange> {
    [
        ("SOJA", "HUM", 0.0, 13.5),
        ("SOJA", "CE", 0.0, 1.0),
        ("MAIZ", "HUM", 0.0, 14.5),
        ("MAIZ", "CE", 0.0, 1.5),
        ("MAIZ", "PH", 69.0, 80.0),
    ]
    .into_iter()
    .map(|(product, rubric, min, max)| QualityRange {
        product_code: product.to_string(),
        rubric_code: rubric.to_string(),
        min,
        max,
    })
    .collect()
}

fn silos() -> Vec<Silo> {
    [
        ("S1", "SILO NORTE", "SOJA", 180_000.0, 200_000.0),
        ("S2", "SILO SUR", "SOJA", 0.0, 200_000.0),
        ("S3", "SILO ESTE", "MAIZ", 50_000.0, 300_000.0),
    ]
    .into_iter()
    .map(|(id, name, product, stock, capacity)| Silo {
        id: id.to_string(),
        name: name.to_string(),
        product_code: product.to_string(),
        stock_kg: stock,
        capacity_kg: capacity,
    })
    .collect()
}
