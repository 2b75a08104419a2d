//! Ledger operations: CRUD services, import normalization, and the manager
//! that ties them to persistence.

pub mod import;
pub mod ledger_manager;
pub mod services;

pub use ledger_manager::{LedgerManager, SyncOutcome};
