// ==========================================
// Grain Receiving - Console Entry Point
// ==========================================
// Opens the store and prints today's weighing queue and the silo
// occupancy. `--json-logs` switches log output to JSON lines.
// ==========================================

use anyhow::Context;
use grain_receiving::app::{get_default_db_path, AppState};
use grain_receiving::logging;

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|a| a == "--json-logs") {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(version = grain_receiving::VERSION, "{}", grain_receiving::APP_NAME);

    let db_path = get_default_db_path();
    let state = AppState::new(db_path.clone())
        .with_context(|| format!("cannot open store at {}", db_path))?;

    // Quota dates are UTC calendar days
    let today = chrono::Utc::now().date_naive();

    let queue = state.weighing_api.list_queue(today)?;
    println!("Weighing queue for {} ({} trucks)", today, queue.len());
    for entry in &queue {
        println!(
            "  {:<10} {:<20} {:<15} next={}",
            entry.plate,
            entry.product_name,
            entry.state.to_string(),
            entry.pending_step
        );
    }

    println!();
    println!("Silos");
    for silo in state.silo_api.list_silos()? {
        println!(
            "  {:<12} {:<20} {:>12.0} / {:>12.0} kg  {:>5.1}%",
            silo.silo_name, silo.product_name, silo.stock_kg, silo.capacity_kg, silo.fill_percent
        );
    }

    Ok(())
}
