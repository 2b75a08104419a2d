#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use fee_ledger::{
    config::ConfigManager,
    core::{services::IncomeModel, LedgerManager},
    domain::{Ledger, TransactionDraft},
    storage::{LedgerPersistence, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// File-backed manager and config manager rooted in an isolated directory.
pub fn setup_test_env() -> (LedgerManager, ConfigManager) {
    let config_manager =
        ConfigManager::with_base_dir(temp_base()).expect("create config manager for temp dir");
    let config = config_manager.load().expect("default config");
    let persistence = config_manager
        .persistence(&config)
        .expect("create file persistence");
    let manager = LedgerManager::open(persistence, config.income_model);
    (manager, config_manager)
}

pub fn memory_manager(model: IncomeModel) -> LedgerManager {
    LedgerManager::open(LedgerPersistence::new(Box::new(MemoryStore::new())), model)
}

/// Two lists with names, statuses and transactions of both kinds.
pub fn seeded_ledger() -> Ledger {
    let mut manager = memory_manager(IncomeModel::Transactions);
    let dues = manager.create_list("Class Dues", Some(500.0), None).unwrap();
    for name in ["Ada", "Bola", "Chidi"] {
        manager.add_name(dues.as_str(), name).unwrap();
    }
    let first = manager.ledger().find_list(dues.as_str()).unwrap().names[0]
        .id
        .clone();
    manager
        .toggle_name_status(dues.as_str(), first.as_str())
        .unwrap();
    manager
        .add_transaction(
            dues.as_str(),
            TransactionDraft::income(1500.0)
                .with_category("Dues")
                .on("2024-03-01"),
        )
        .unwrap();

    let trip = manager.create_list("Excursion", Some(2500.0), None).unwrap();
    manager.add_name(trip.as_str(), "Dayo").unwrap();
    manager
        .add_transaction(
            trip.as_str(),
            TransactionDraft::expense(4000.0)
                .with_category("Bus")
                .on("2024-04-10")
                .with_description("Deposit"),
        )
        .unwrap();
    manager.ledger().clone()
}
