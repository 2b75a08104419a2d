//! Local key-value stores and the ledger persistence adapter built on them.

pub mod json_backend;
pub mod memory;
pub mod persistence;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// String documents addressed by a fixed key, in the manner of browser local storage.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use persistence::{LedgerPersistence, RemoteMirror, LEDGER_KEY, LEGACY_LISTS_KEY};
