// ==========================================
// Store atomicity tests
// ==========================================
// Closing a weighing writes operations and silos together. A failure
// on either key must leave both as they were.
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use grain_receiving::api::ApiError;
use grain_receiving::app::AppState;
use grain_receiving::domain::OperationState;
use grain_receiving::repository::{KeyValueStore, SqliteKvStore, OPERATIONS_KEY, SILOS_KEY};
use test_helpers::*;

fn sqlite_state() -> (Arc<Mutex<Connection>>, AppState) {
    let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
    let store = SqliteKvStore::from_connection(conn.clone()).unwrap();
    let state = AppState::with_store(":memory:".to_string(), Arc::new(store));
    (conn, state)
}

fn block_key(conn: &Arc<Mutex<Connection>>, key: &str) {
    let sql = format!(
        r#"
        CREATE TRIGGER block_insert BEFORE INSERT ON kv_store WHEN NEW.key = '{key}'
        BEGIN SELECT RAISE(ABORT, 'write blocked'); END;
        CREATE TRIGGER block_update BEFORE UPDATE ON kv_store WHEN NEW.key = '{key}'
        BEGIN SELECT RAISE(ABORT, 'write blocked'); END;
        "#
    );
    conn.lock().unwrap().execute_batch(&sql).unwrap();
}

#[test]
fn test_set_many_is_all_or_nothing() {
    let (conn, state) = sqlite_state();
    state.store.set("a_dat", "[1]").unwrap();
    block_key(&conn, "b_dat");

    let result = state.store.set_many(&[
        ("a_dat".to_string(), "[2]".to_string()),
        ("b_dat".to_string(), "[2]".to_string()),
    ]);
    assert!(result.is_err());
    assert_eq!(state.store.get("a_dat").unwrap().as_deref(), Some("[1]"));
    assert_eq!(state.store.get("b_dat").unwrap(), None);
}

#[test]
fn test_failed_silo_write_keeps_operation_open() {
    let (conn, state) = sqlite_state();
    seed_master_data(&state);
    set_silos(&state, vec![silo("S1", "SILO NORTE", "SOJA", 0.0, 50_000.0)]);
    let op = truck_loaded(&state, "AAA 123", "SOJA", 30_000.0);

    let operations_before = state.store.get(OPERATIONS_KEY).unwrap();
    let silos_before = state.store.get(SILOS_KEY).unwrap();
    block_key(&conn, SILOS_KEY);

    let err = state
        .weighing_api
        .record_tare("AAA 123", today(), 10_000.0)
        .unwrap_err();
    assert!(matches!(err, ApiError::StoreTransactionError(_)));

    assert_eq!(state.store.get(OPERATIONS_KEY).unwrap(), operations_before);
    assert_eq!(state.store.get(SILOS_KEY).unwrap(), silos_before);
    assert_eq!(load_operation(&state, &op.id).state, OperationState::GrossRecorded);
}
